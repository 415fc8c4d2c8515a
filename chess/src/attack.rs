//! Detection of attacks on the king

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::rules::RuleSet;
use crate::types::{Color, Coord, Piece};

use log::trace;

/// How the king square is scanned for attackers
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CheckScan {
    /// Every enemy piece is probed with the king's movement rule against the attack board
    ///
    /// Only enemy kings can pass this probe, so the check is detected only when the enemy
    /// king stands next to ours.
    #[default]
    KingProximity,
    /// Every enemy piece is probed with its own movement rule
    Full,
}

/// Finds out whether the king of the given color is attacked
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct AttackDetector {
    rules: RuleSet,
    scan: CheckScan,
}

impl AttackDetector {
    pub const fn new(scan: CheckScan) -> AttackDetector {
        AttackDetector {
            rules: RuleSet::new(),
            scan,
        }
    }

    #[inline]
    pub fn scan(&self) -> CheckScan {
        self.scan
    }

    #[inline]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Builds the attack board for the king of color `c`
    ///
    /// Each enemy piece is probed by every rule with a zero-length move onto its own square,
    /// and is copied onto the attack board if some rule accepts the probe. Since a piece
    /// can never land on a square occupied by its own color, no probe succeeds, and the
    /// result always equals `b`.
    pub fn attack_board(&self, b: &Board, c: Color) -> Board {
        let mut res = *b;
        for (p, cell) in b.occupied() {
            if cell.color() == Some(c) {
                continue;
            }
            if self.rules.iter().any(|r| r.can_move(b, p, p) == Some(true)) {
                res.put(p, cell);
            }
        }
        res
    }

    /// Returns all the enemy pieces found to attack the king of color `c`
    ///
    /// If there is no king of color `c`, the result is empty.
    pub fn checkers(&self, b: &Board, c: Color) -> Bitboard {
        let king = match b.king_pos(c) {
            Some(king) => king,
            None => return Bitboard::EMPTY,
        };
        let res: Bitboard = match self.scan {
            CheckScan::KingProximity => {
                let attack = self.attack_board(b, c);
                let rule = self.rules.get(Piece::King);
                self.enemies(b, c)
                    .filter(|&p| rule.can_move(&attack, p, king) == Some(true))
                    .collect()
            }
            CheckScan::Full => self
                .enemies(b, c)
                .filter(|&p| self.rules.can_move(b, p, king) == Some(true))
                .collect(),
        };
        trace!("checkers of {} king on {}: {}", c.as_long_str(), king, res);
        res
    }

    /// Returns `true` if the king of color `c` is attacked
    #[inline]
    pub fn is_check(&self, b: &Board, c: Color) -> bool {
        self.checkers(b, c).is_nonempty()
    }

    fn enemies<'a>(&self, b: &'a Board, c: Color) -> impl Iterator<Item = Coord> + 'a {
        b.occupied()
            .filter(move |(_, cell)| cell.is_enemy_of(c))
            .map(|(p, _)| p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;
    use std::str::FromStr;

    const PROXIMITY: AttackDetector = AttackDetector::new(CheckScan::KingProximity);
    const FULL: AttackDetector = AttackDetector::new(CheckScan::Full);

    fn c(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn board(placement: &str) -> Board {
        Board::from_placement(placement).unwrap()
    }

    #[test]
    fn test_adjacent_kings() {
        let b = board("8/8/8/3k4/3K4/8/8/8");
        for det in [PROXIMITY, FULL] {
            assert!(det.is_check(&b, Color::White));
            assert!(det.is_check(&b, Color::Black));
            assert_eq!(det.checkers(&b, Color::White), Bitboard::from_coord(c("d5")));
            assert_eq!(det.checkers(&b, Color::Black), Bitboard::from_coord(c("d4")));
        }

        let b = board("8/8/8/2k5/8/4K3/8/8");
        assert!(!PROXIMITY.is_check(&b, Color::White));
        assert!(!PROXIMITY.is_check(&b, Color::Black));
    }

    #[test]
    fn test_ranged_attacks() {
        // Queen on an open file
        let b = board("4k3/8/8/8/8/8/8/K3Q3");
        assert!(!PROXIMITY.is_check(&b, Color::Black));
        assert!(FULL.is_check(&b, Color::Black));
        assert_eq!(FULL.checkers(&b, Color::Black), Bitboard::from_coord(c("e1")));

        // Knight
        let b = board("4k3/8/3N4/8/8/8/8/K7");
        assert!(!PROXIMITY.is_check(&b, Color::Black));
        assert!(FULL.is_check(&b, Color::Black));

        // Pawn
        let b = board("8/8/8/4k3/3P4/8/8/K7");
        assert!(!PROXIMITY.is_check(&b, Color::Black));
        assert!(FULL.is_check(&b, Color::Black));

        // Blocked rook
        let b = board("4k3/8/8/4n3/8/8/8/K3R3");
        assert!(!FULL.is_check(&b, Color::Black));
    }

    #[test]
    fn test_double_check() {
        let b = board("4k3/8/3N4/8/8/8/8/K3R3");
        assert_eq!(
            FULL.checkers(&b, Color::Black),
            Bitboard::EMPTY.with(c("d6")).with(c("e1"))
        );
        assert!(PROXIMITY.checkers(&b, Color::Black).is_empty());
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        for det in [PROXIMITY, FULL] {
            assert!(!det.is_check(&b, Color::White));
            assert!(!det.is_check(&b, Color::Black));
        }
    }

    #[test]
    fn test_no_king() {
        let b = board("8/8/8/8/8/8/8/4Q3");
        assert!(!FULL.is_check(&b, Color::Black));
        assert!(!PROXIMITY.is_check(&b, Color::Black));
        assert!(!FULL.is_check(&b, Color::White));
    }

    #[test]
    fn test_attack_board() {
        for b in [
            Board::initial(),
            board("8/8/8/3k4/3K4/8/8/8"),
            board("r3k2r/ppp2ppp/2n1bn2/3qp3/3PP3/2N1BN2/PPP2PPP/R2QK2R"),
        ] {
            assert_eq!(PROXIMITY.attack_board(&b, Color::White), b);
            assert_eq!(PROXIMITY.attack_board(&b, Color::Black), b);
        }
        let mut b = Board::empty();
        b.put(c("a1"), Cell::from_parts(Color::Black, Piece::Queen));
        assert_eq!(FULL.attack_board(&b, Color::White), b);
    }
}
