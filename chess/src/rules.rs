//! Geometric movement rules for each kind of piece
//!
//! A rule answers a single question: may the piece standing on `src` go to `dst` on the
//! given board? It knows nothing about the side to move or about checks. The answer is
//! tri-state:
//!
//! - `None` if `src` is empty or the piece there is not of the rule's kind,
//! - `Some(false)` if the move is geometrically illegal or blocked,
//! - `Some(true)` otherwise.
//!
//! A destination occupied by a piece of the same color is never legal. A destination
//! occupied by an enemy piece is a capture, which is legal only if the piece is allowed
//! to attack that square.

use crate::board::Board;
use crate::geometry::{self, Delta};
use crate::types::{Color, Coord, Piece};

/// Movement rule for a single kind of piece
pub trait MoveRule {
    /// Kind of the piece this rule applies to
    fn piece(&self) -> Piece;

    /// Returns `true` if a piece of color `side` standing on `src` may go to `dst`
    ///
    /// Unlike [`MoveRule::can_move()`], this function doesn't look at the contents of
    /// `src`, so it can be reused by rules which are composed from other ones.
    fn allows(&self, b: &Board, src: Coord, dst: Coord, side: Color) -> bool;

    #[inline]
    fn can_move(&self, b: &Board, src: Coord, dst: Coord) -> Option<bool> {
        let cell = b.get(src);
        if cell.piece() != Some(self.piece()) {
            return None;
        }
        let side = cell.color()?;
        Some(self.allows(b, src, dst, side))
    }
}

/// Destination is either empty or holds an enemy piece
#[inline]
fn is_target(b: &Board, dst: Coord, side: Color) -> bool {
    b.get(dst).color() != Some(side)
}

/// Checks that all the squares strictly between `src` and `dst` are empty
///
/// `src` and `dst` must lie on the same line or diagonal and be distinct.
fn is_path_clear(b: &Board, src: Coord, dst: Coord) -> bool {
    let step = Delta::between(src, dst).signum();
    let mut cur = src;
    loop {
        cur = match cur.try_shift(step) {
            Some(c) => c,
            None => return false,
        };
        if cur == dst {
            return true;
        }
        if b.get(cur).is_occupied() {
            return false;
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PawnRule;

impl MoveRule for PawnRule {
    fn piece(&self) -> Piece {
        Piece::Pawn
    }

    fn allows(&self, b: &Board, src: Coord, dst: Coord, side: Color) -> bool {
        let delta = Delta::between(src, dst);
        let is_forward = delta.row == geometry::pawn_forward(side);
        let target = b.get(dst);
        if target.is_occupied() {
            return delta.col.abs() == 1 && is_forward && target.is_enemy_of(side);
        }

        if delta.col != 0 {
            return false;
        }
        if is_forward {
            return true;
        }
        // The square in between is not checked here.
        src.rank() == geometry::double_move_src_rank(side)
            && dst.rank() == geometry::double_move_dst_rank(side)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RookRule;

impl MoveRule for RookRule {
    fn piece(&self) -> Piece {
        Piece::Rook
    }

    fn allows(&self, b: &Board, src: Coord, dst: Coord, side: Color) -> bool {
        let delta = Delta::between(src, dst);
        if delta.is_zero() || (delta.row != 0 && delta.col != 0) {
            return false;
        }
        is_path_clear(b, src, dst) && is_target(b, dst, side)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BishopRule;

impl MoveRule for BishopRule {
    fn piece(&self) -> Piece {
        Piece::Bishop
    }

    fn allows(&self, b: &Board, src: Coord, dst: Coord, side: Color) -> bool {
        let delta = Delta::between(src, dst).abs();
        if delta.is_zero() || delta.row != delta.col {
            return false;
        }
        is_path_clear(b, src, dst) && is_target(b, dst, side)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct KnightRule;

impl MoveRule for KnightRule {
    fn piece(&self) -> Piece {
        Piece::Knight
    }

    fn allows(&self, b: &Board, src: Coord, dst: Coord, side: Color) -> bool {
        let delta = Delta::between(src, dst).abs();
        matches!((delta.row, delta.col), (1, 2) | (2, 1)) && is_target(b, dst, side)
    }
}

/// Queen moves either as a rook or as a bishop
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct QueenRule {
    rook: RookRule,
    bishop: BishopRule,
}

impl MoveRule for QueenRule {
    fn piece(&self) -> Piece {
        Piece::Queen
    }

    fn allows(&self, b: &Board, src: Coord, dst: Coord, side: Color) -> bool {
        self.bishop.allows(b, src, dst, side) || self.rook.allows(b, src, dst, side)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct KingRule;

impl MoveRule for KingRule {
    fn piece(&self) -> Piece {
        Piece::King
    }

    fn allows(&self, b: &Board, src: Coord, dst: Coord, side: Color) -> bool {
        let delta = Delta::between(src, dst).abs();
        delta.row <= 1 && delta.col <= 1 && is_target(b, dst, side)
    }
}

/// Table of movement rules, keyed by piece kind
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pawn: PawnRule,
    king: KingRule,
    knight: KnightRule,
    bishop: BishopRule,
    rook: RookRule,
    queen: QueenRule,
}

impl RuleSet {
    pub const fn new() -> RuleSet {
        RuleSet {
            pawn: PawnRule,
            king: KingRule,
            knight: KnightRule,
            bishop: BishopRule,
            rook: RookRule,
            queen: QueenRule {
                rook: RookRule,
                bishop: BishopRule,
            },
        }
    }

    /// Returns the rule for piece kind `p`
    pub fn get(&self, p: Piece) -> &dyn MoveRule {
        match p {
            Piece::Pawn => &self.pawn,
            Piece::King => &self.king,
            Piece::Knight => &self.knight,
            Piece::Bishop => &self.bishop,
            Piece::Rook => &self.rook,
            Piece::Queen => &self.queen,
        }
    }

    /// Iterates over all the rules
    pub fn iter(&self) -> impl Iterator<Item = &dyn MoveRule> + '_ {
        Piece::iter().map(move |p| self.get(p))
    }

    /// Applies the rule matching the piece on `src`
    ///
    /// Returns `None` only if `src` is empty.
    #[inline]
    pub fn can_move(&self, b: &Board, src: Coord, dst: Coord) -> Option<bool> {
        let piece = b.get(src).piece()?;
        self.get(piece).can_move(b, src, dst)
    }
}
