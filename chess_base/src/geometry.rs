use crate::types::{Color, Coord, Rank};
use derive_more::{Add, Neg, Sub};

/// Offset between two squares, in rows and columns
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Add, Sub, Neg)]
pub struct Delta {
    pub row: isize,
    pub col: isize,
}

impl Delta {
    pub const ZERO: Delta = Delta { row: 0, col: 0 };

    pub const fn new(row: isize, col: isize) -> Delta {
        Delta { row, col }
    }

    /// Offset which leads from `src` to `dst`
    pub fn between(src: Coord, dst: Coord) -> Delta {
        Delta::from(dst) - Delta::from(src)
    }

    pub const fn abs(self) -> Delta {
        Delta {
            row: self.row.abs(),
            col: self.col.abs(),
        }
    }

    /// Unit step in the direction of `self` along each axis
    pub const fn signum(self) -> Delta {
        Delta {
            row: self.row.signum(),
            col: self.col.signum(),
        }
    }

    pub const fn is_zero(self) -> bool {
        self.row == 0 && self.col == 0
    }
}

impl From<Coord> for Delta {
    fn from(c: Coord) -> Delta {
        Delta::new(c.row() as isize, c.col() as isize)
    }
}

/// Row offset of a single forward pawn step for color `c`
pub const fn pawn_forward(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}

pub const fn double_move_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

pub const fn double_move_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R4,
        Color::Black => Rank::R5,
    }
}

pub const fn back_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}
