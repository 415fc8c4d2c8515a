//! Moves and their text representation

use crate::types::{Coord, CoordParseError};

use arrayvec::ArrayVec;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::slice;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a move in coordinate notation
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(CoordParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(CoordParseError),
}

/// Move of a piece from one square to another
///
/// The move doesn't know which piece is moved, so it is meaningful only together with
/// a board. Moves are written in coordinate notation, like `e2e4`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    src: Coord,
    dst: Coord,
}

impl Move {
    #[inline]
    pub const fn new(src: Coord, dst: Coord) -> Move {
        Move { src, dst }
    }

    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(ParseError::BadLength);
        }
        let src = Coord::from_str(&s[0..2]).map_err(ParseError::BadSrc)?;
        let dst = Coord::from_str(&s[2..4]).map_err(ParseError::BadDst)?;
        Ok(Move { src, dst })
    }
}

/// No piece has more than 27 destinations, and there are at most 64 pieces.
const MAX_MOVES: usize = 64 * 27;

/// List of moves
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, MAX_MOVES>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, MAX_MOVES>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}
