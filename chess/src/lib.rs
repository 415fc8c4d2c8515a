//! # chessrule
//!
//! Move legality and check detection on a plain 8x8 chess board.
//!
//! The crate answers a single question: may this piece go from one square to another right
//! now? [`Game`] owns the [`Board`] and the side to move and is the only thing which mutates
//! the position. Each kind of piece has its own geometric rule in [`rules`], and [`attack`]
//! decides whether a king is attacked after a move.
//!
//! Castling, en passant, promotion, checkmate and draw detection are not handled.
//!
//! # Example
//!
//! ```
//! use chessrule::{Game, Color};
//!
//! let mut game = Game::new();
//! game.make_move_str("e2e4").unwrap();
//! game.make_move_str("e7e5").unwrap();
//! assert_eq!(game.side(), Color::White);
//! assert!(game.make_move_str("e4e5").is_err());
//! ```

pub mod attack;
pub mod board;
pub mod game;
pub mod moves;
pub mod rules;

pub use chessrule_base::{bitboard, geometry, types};

pub use attack::{AttackDetector, CheckScan};
pub use bitboard::Bitboard;
pub use board::Board;
pub use game::{Game, GameOptions, MoveError, VetoSide};
pub use moves::{Move, MoveList};
pub use rules::{MoveRule, RuleSet};
pub use types::{Cell, Color, Coord, File, Piece, Rank};
