//! Othello board representation and rules.
//!
//! This module provides the game rules for 8x8 Othello/Reversi:
//! - Legal move generation by directional scanning from the mover's stones
//! - Flip (capture) resolution when a stone is placed
//! - Terminal and winner detection
//!
//! Boards are small `Copy` values. Applying a move leaves the board it was
//! applied to untouched and returns a new one.

use std::fmt;

use thiserror::Error;

use crate::constants::{BOARDSIZE, DIRECTIONS, N};

/// One of the two players. Black moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Occupancy sign used by the evaluator: +1 for Black, -1 for White.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Side::Black => 1,
            Side::White => -1,
        }
    }

    /// Parse a color name ("b", "black", "w", "white"), ignoring case.
    pub fn parse(s: &str) -> Option<Side> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" | "x" => Some(Side::Black),
            "w" | "white" | "o" => Some(Side::White),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => write!(f, "black"),
            Side::White => write!(f, "white"),
        }
    }
}

/// A (row, col) coordinate, both in `0..N`.
pub type Point = (usize, usize);

/// A move: a stone placed on a point, or a pass when no capture exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Place(Point),
    Pass,
}

impl Move {
    /// Shorthand for `Move::Place((row, col))`.
    #[inline]
    pub fn at(row: usize, col: usize) -> Move {
        Move::Place((row, col))
    }

    #[inline]
    pub fn is_pass(self) -> bool {
        self == Move::Pass
    }

    #[inline]
    pub fn point(self) -> Option<Point> {
        match self {
            Move::Place(pt) => Some(pt),
            Move::Pass => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place((row, col)) => write!(f, "{}{}", (b'a' + *col as u8) as char, row + 1),
            Move::Pass => write!(f, "pass"),
        }
    }
}

/// State of a game as read off a board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Running,
    Win(Side),
    Draw,
}

/// Rejection of a move the rules do not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move {mv} for {side}")]
    Illegal { mv: Move, side: Side },
    #[error("point ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },
}

/// Failure to read a coordinate or a board diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid coordinate {0:?}")]
    Coord(String),
    #[error("invalid board row {0:?}")]
    Row(String),
}

/// An 8x8 Othello board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Side>; BOARDSIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting position: white on d4/e5, black on e4/d5.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.set(3, 3, Some(Side::White));
        board.set(3, 4, Some(Side::Black));
        board.set(4, 3, Some(Side::Black));
        board.set(4, 4, Some(Side::White));
        board
    }

    /// A board with no stones.
    pub fn empty() -> Self {
        Self {
            cells: [None; BOARDSIZE],
        }
    }

    /// Build a board from eight rows of `X` (black), `O` (white) and `.`.
    /// Whitespace inside a row is ignored.
    pub fn from_rows(rows: &[&str; N]) -> Result<Self, ParseError> {
        let mut board = Self::empty();
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != N {
                return Err(ParseError::Row(line.to_string()));
            }
            for (col, ch) in cells.into_iter().enumerate() {
                let cell = match ch {
                    'X' | 'x' | 'B' | 'b' => Some(Side::Black),
                    'O' | 'o' | 'W' | 'w' => Some(Side::White),
                    '.' | '-' => None,
                    _ => return Err(ParseError::Row(line.to_string())),
                };
                board.set(row, col, cell);
            }
        }
        Ok(board)
    }

    #[inline]
    fn idx(row: usize, col: usize) -> usize {
        row * N + col
    }

    /// The stone at (row, col), `None` for empty or off-board.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Side> {
        if row >= N || col >= N {
            return None;
        }
        self.cells[Self::idx(row, col)]
    }

    /// Overwrite a single cell. Used for setting up positions.
    pub fn set(&mut self, row: usize, col: usize, cell: Option<Side>) {
        self.cells[Self::idx(row, col)] = cell;
    }

    /// Number of stones of the given side.
    pub fn count(&self, side: Side) -> usize {
        self.cells.iter().filter(|&&c| c == Some(side)).count()
    }

    /// Number of occupied cells.
    pub fn stones(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of empty cells.
    pub fn empties(&self) -> usize {
        BOARDSIZE - self.stones()
    }

    /// Step one cell from `pt` in direction `dir`, or `None` at the edge.
    #[inline]
    fn step(pt: Point, dir: (isize, isize)) -> Option<Point> {
        let row = pt.0.checked_add_signed(dir.0)?;
        let col = pt.1.checked_add_signed(dir.1)?;
        (row < N && col < N).then_some((row, col))
    }

    /// Scan from an occupied `origin` along `dir` for a capturing placement.
    ///
    /// Yields the first empty cell reached, but only if at least one opposing
    /// stone was crossed before it.
    fn discover_move(&self, origin: Point, dir: (isize, isize)) -> Option<Point> {
        let me = self.get(origin.0, origin.1)?;
        let mut seen_opp = false;
        let mut cur = origin;

        while let Some(next) = Self::step(cur, dir) {
            match self.get(next.0, next.1) {
                None => return seen_opp.then_some(next),
                Some(s) if s == me => return None,
                Some(_) => seen_opp = true,
            }
            cur = next;
        }
        None
    }

    /// All legal placements for `side`, in row-major order.
    ///
    /// Empty when the side has no capture available; the caller must then
    /// pass. A side with stones but no captures is not the same as a side
    /// with no stones, though both give an empty list here.
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        let mut targets = [false; BOARDSIZE];

        for row in 0..N {
            for col in 0..N {
                if self.get(row, col) != Some(side) {
                    continue;
                }
                for dir in DIRECTIONS {
                    if let Some((r, c)) = self.discover_move((row, col), dir) {
                        targets[Self::idx(r, c)] = true;
                    }
                }
            }
        }

        targets
            .iter()
            .enumerate()
            .filter(|&(_, &hit)| hit)
            .map(|(i, _)| Move::at(i / N, i % N))
            .collect()
    }

    /// Whether `side` has at least one capturing placement.
    pub fn has_legal_move(&self, side: Side) -> bool {
        (0..N)
            .flat_map(|row| (0..N).map(move |col| (row, col)))
            .any(|pt| !self.flips(pt, side).is_empty())
    }

    /// Stones that `side` would flip by playing at `pt`.
    ///
    /// Empty if `pt` is occupied or captures nothing, i.e. if it is not a
    /// legal placement.
    pub fn flips(&self, pt: Point, side: Side) -> Vec<Point> {
        let mut flips = Vec::new();
        if self.get(pt.0, pt.1).is_some() || pt.0 >= N || pt.1 >= N {
            return flips;
        }

        for dir in DIRECTIONS {
            let mut run = Vec::new();
            let mut cur = pt;
            while let Some(next) = Self::step(cur, dir) {
                match self.get(next.0, next.1) {
                    None => break,
                    Some(s) if s == side => {
                        flips.extend_from_slice(&run);
                        break;
                    }
                    Some(_) => run.push(next),
                }
                cur = next;
            }
        }
        flips
    }

    /// Whether `mv` may be played by `side` here.
    ///
    /// A pass is legal only when `side` has no placement.
    pub fn is_legal(&self, mv: Move, side: Side) -> bool {
        match mv {
            Move::Place(pt) => !self.flips(pt, side).is_empty(),
            Move::Pass => !self.has_legal_move(side),
        }
    }

    /// Apply `mv` for `side` and return the resulting board.
    ///
    /// A pass returns the board unchanged; the caller still toggles the side
    /// to move.
    ///
    /// # Errors
    /// - [`MoveError::OutOfBounds`] if the point is off the board
    /// - [`MoveError::Illegal`] if the placement captures nothing, the cell is
    ///   occupied, or a pass is attempted while a placement exists
    pub fn play(&self, mv: Move, side: Side) -> Result<Board, MoveError> {
        match mv {
            Move::Pass => {
                if self.has_legal_move(side) {
                    return Err(MoveError::Illegal { mv, side });
                }
                Ok(*self)
            }
            Move::Place((row, col)) => {
                if row >= N || col >= N {
                    return Err(MoveError::OutOfBounds { row, col });
                }
                let flips = self.flips((row, col), side);
                if flips.is_empty() {
                    return Err(MoveError::Illegal { mv, side });
                }
                Ok(self.commit((row, col), side, &flips))
            }
        }
    }

    /// Apply a move already known to be legal (drawn from `legal_moves`).
    pub(crate) fn apply_legal(&self, mv: Move, side: Side) -> Board {
        match mv {
            Move::Pass => *self,
            Move::Place(pt) => {
                let flips = self.flips(pt, side);
                debug_assert!(!flips.is_empty(), "illegal move {mv} for {side}");
                self.commit(pt, side, &flips)
            }
        }
    }

    fn commit(&self, pt: Point, side: Side, flips: &[Point]) -> Board {
        let mut next = *self;
        next.set(pt.0, pt.1, Some(side));
        for &(r, c) in flips {
            next.set(r, c, Some(side));
        }
        next
    }

    /// Every successor of this position for `side`.
    ///
    /// One (move, board) pair per legal move, or a single pass pair with the
    /// unchanged board when `side` has no placement.
    pub fn successors(&self, side: Side) -> Vec<(Move, Board)> {
        let moves = self.legal_moves(side);
        if moves.is_empty() {
            return vec![(Move::Pass, *self)];
        }
        moves
            .into_iter()
            .map(|mv| (mv, self.apply_legal(mv, side)))
            .collect()
    }

    /// True when neither side can place a stone.
    pub fn is_terminal(&self) -> bool {
        !self.has_legal_move(Side::Black) && !self.has_legal_move(Side::White)
    }

    /// Outcome by stone count. `Running` while either side can still move.
    pub fn winner(&self) -> GameOutcome {
        if !self.is_terminal() {
            return GameOutcome::Running;
        }
        let black = self.count(Side::Black);
        let white = self.count(Side::White);
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => GameOutcome::Win(Side::Black),
            std::cmp::Ordering::Less => GameOutcome::Win(Side::White),
            std::cmp::Ordering::Equal => GameOutcome::Draw,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..N {
            write!(f, " {}", (b'a' + col as u8) as char)?;
        }
        writeln!(f)?;
        for row in 0..N {
            write!(f, "{}", row + 1)?;
            for col in 0..N {
                let ch = match self.get(row, col) {
                    Some(Side::Black) => 'X',
                    Some(Side::White) => 'O',
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parse a coordinate such as `"d3"` (column letter, row number) or `"pass"`.
pub fn parse_coord(s: &str) -> Result<Move, ParseError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("pass") {
        return Ok(Move::Pass);
    }

    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return Err(ParseError::Coord(s.to_string()));
    }

    let col = bytes[0].to_ascii_lowercase().wrapping_sub(b'a') as usize;
    let row = bytes[1].wrapping_sub(b'1') as usize;
    if row >= N || col >= N {
        return Err(ParseError::Coord(s.to_string()));
    }
    Ok(Move::at(row, col))
}
