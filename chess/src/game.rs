//! Game state: the board together with the side to move

use crate::attack::{AttackDetector, CheckScan};
use crate::bitboard::Bitboard;
use crate::board::{Board, PlacementParseError};
use crate::moves::{self, Move, MoveList};
use crate::types::{Cell, Color, ColorParseError, Coord};

use std::str::FromStr;

use log::{debug, info, trace};
use thiserror::Error;

/// Whose king is examined after a move
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VetoSide {
    /// A move is rejected if it leaves the king of the opponent (i.e. the side which is
    /// going to move next) attacked
    #[default]
    Opponent,
    /// A move is rejected if it leaves the mover's own king attacked
    Mover,
}

/// Options for [`Game`]
///
/// The default options reproduce the classic behavior of this engine: the attack scan
/// is [`CheckScan::KingProximity`] and the king examined after the move is the opponent's.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GameOptions {
    pub scan: CheckScan,
    pub veto: VetoSide,
}

/// Reason why a move was rejected
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// Coordinates are outside of the board
    #[error("coordinates out of range")]
    OutOfRange,
    /// There is no piece on the source square
    #[error("no piece on {0}")]
    EmptySource(Coord),
    /// The piece has color which is not to move now
    #[error("{} is not to move", .0.as_long_str())]
    WrongSide(Color),
    /// No rule applies to the piece on the source square
    #[error("no rule for the piece on {0}")]
    NotApplicable(Coord),
    /// The piece cannot go from `src` to `dst`
    #[error("piece on {src} cannot go to {dst}")]
    Illegal { src: Coord, dst: Coord },
    /// After the move, the king of the given color is attacked
    #[error("{} king would be attacked", .0.as_long_str())]
    Check(Color),
}

/// Error making a move given in coordinate notation
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveStrError {
    #[error("cannot parse move: {0}")]
    Parse(#[from] moves::ParseError),
    #[error("cannot make move: {0}")]
    Move(#[from] MoveError),
}

/// Error parsing [`Game`] from text
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PositionParseError {
    /// Text doesn't have board part
    #[error("board not specified")]
    NoBoard,
    /// Error parsing board
    #[error("bad board: {0}")]
    Board(#[from] PlacementParseError),
    /// Error parsing move side
    #[error("bad move side: {0}")]
    Side(#[from] ColorParseError),
    /// Text contains extra data
    #[error("extra data in position")]
    ExtraData,
}

/// Chess game
///
/// Owns the board and the side to move. The only way to change the position is to make a move
/// with [`Game::make_move()`] (or one of its variants), which either commits fully or leaves
/// the game untouched.
///
/// # Example
///
/// ```
/// # use chessrule::{Game, Color, Coord};
/// #
/// let mut game = Game::new();
/// let e2 = Coord::from_row_col(6, 4).unwrap();
/// let e4 = Coord::from_row_col(4, 4).unwrap();
/// assert!(game.try_move(e2, e4));
/// assert_eq!(game.side(), Color::Black);
/// assert!(!game.try_move_rc(1, 4, 8, 4));
/// assert!(game.make_move_str("e7e5").is_ok());
/// assert_eq!(game.board().as_placement(), "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    side: Color,
    options: GameOptions,
    detector: AttackDetector,
}

impl Game {
    /// Creates a game in the initial position with default options
    pub fn new() -> Game {
        Game::with_options(GameOptions::default())
    }

    /// Creates a game in the initial position with the given options
    pub fn with_options(options: GameOptions) -> Game {
        Game::from_board(Board::initial(), Color::White, options)
    }

    /// Creates a game from an arbitrary board
    ///
    /// The board is not validated, so it may contain any number of kings.
    pub fn from_board(board: Board, side: Color, options: GameOptions) -> Game {
        Game {
            board,
            side,
            options,
            detector: AttackDetector::new(options.scan),
        }
    }

    /// Parses a game from piece placement and optional side to move, like
    /// `"8/8/8/3k4/3K4/8/8/8 b"`
    ///
    /// Does the same as [`Game::from_str`]. If side to move is absent, White moves first.
    pub fn from_fen(s: &str) -> Result<Game, PositionParseError> {
        Game::from_str(s)
    }

    /// Puts the pieces into the initial position and gives the move to White
    ///
    /// Options are kept.
    pub fn reset(&mut self) {
        self.board = Board::initial();
        self.side = Color::White;
        info!("game reset to the initial position");
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn options(&self) -> GameOptions {
        self.options
    }

    pub fn set_options(&mut self, options: GameOptions) {
        self.options = options;
        self.detector = AttackDetector::new(options.scan);
    }

    #[inline]
    pub fn detector(&self) -> &AttackDetector {
        &self.detector
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.board.get(c)
    }

    /// Returns the contents of the square at `(row, col)`, or `None` if it is off the board
    #[inline]
    pub fn get_rc(&self, row: usize, col: usize) -> Option<Cell> {
        self.board.get_rc(row, col)
    }

    /// Returns `true` if the king of the side to move is attacked
    #[inline]
    pub fn is_check(&self) -> bool {
        self.detector.is_check(&self.board, self.side)
    }

    /// Moves the piece from `src` to `dst`
    ///
    /// The move is rejected if there is no piece on `src`, if the piece is not of the side
    /// to move, if its movement rule forbids the move, or if the king watched according to
    /// [`GameOptions::veto`] ends up attacked. On rejection, neither the board nor the side to
    /// move is changed.
    pub fn make_move(&mut self, src: Coord, dst: Coord) -> Result<(), MoveError> {
        match self.apply(src, dst) {
            Ok(()) => {
                debug!("moved {}{}, {} to move", src, dst, self.side.as_long_str());
                Ok(())
            }
            Err(e) => {
                debug!("rejected {}{}: {}", src, dst, e);
                Err(e)
            }
        }
    }

    /// Same as [`Game::make_move()`], but only tells whether the move succeeded
    #[inline]
    pub fn try_move(&mut self, src: Coord, dst: Coord) -> bool {
        self.make_move(src, dst).is_ok()
    }

    /// Same as [`Game::make_move()`], but takes `(row, col)` pairs
    ///
    /// Returns [`MoveError::OutOfRange`] if any coordinate is off the board.
    pub fn make_move_rc(
        &mut self,
        src_row: usize,
        src_col: usize,
        dst_row: usize,
        dst_col: usize,
    ) -> Result<(), MoveError> {
        match (
            Coord::from_row_col(src_row, src_col),
            Coord::from_row_col(dst_row, dst_col),
        ) {
            (Some(src), Some(dst)) => self.make_move(src, dst),
            _ => Err(MoveError::OutOfRange),
        }
    }

    #[inline]
    pub fn try_move_rc(
        &mut self,
        src_row: usize,
        src_col: usize,
        dst_row: usize,
        dst_col: usize,
    ) -> bool {
        self.make_move_rc(src_row, src_col, dst_row, dst_col)
            .is_ok()
    }

    /// Makes a move given in coordinate notation, like `e2e4`
    pub fn make_move_str(&mut self, s: &str) -> Result<(), MoveStrError> {
        let mv = Move::from_str(s)?;
        self.make_move(mv.src(), mv.dst())?;
        Ok(())
    }

    /// Returns all the squares `dst` such that the move from `src` to `dst` would succeed now
    pub fn destinations(&self, src: Coord) -> Bitboard {
        if self.board.get(src).color() != Some(self.side) {
            return Bitboard::EMPTY;
        }
        Coord::iter()
            .filter(|&dst| self.clone().apply(src, dst).is_ok())
            .collect()
    }

    /// Returns all the moves which would succeed now
    pub fn legal_moves(&self) -> MoveList {
        let mut res = MoveList::new();
        for (src, _) in self.board.occupied() {
            for dst in self.destinations(src) {
                res.push(Move::new(src, dst));
            }
        }
        res
    }

    fn apply(&mut self, src: Coord, dst: Coord) -> Result<(), MoveError> {
        let cell = self.board.get(src);
        let color = cell.color().ok_or(MoveError::EmptySource(src))?;
        if color != self.side {
            return Err(MoveError::WrongSide(color));
        }
        let verdict = self.detector.rules().can_move(&self.board, src, dst);
        trace!("rule verdict for {} {}{}: {:?}", cell, src, dst, verdict);
        match verdict {
            Some(true) => {}
            Some(false) => return Err(MoveError::Illegal { src, dst }),
            None => return Err(MoveError::NotApplicable(src)),
        }

        #[cfg(feature = "selftest")]
        let snapshot = self.board;
        let captured = self.board.get(dst);
        self.board.put(dst, cell);
        self.board.put(src, Cell::EMPTY);

        let next = self.side.inv();
        let watched = match self.options.veto {
            VetoSide::Opponent => next,
            VetoSide::Mover => self.side,
        };
        if self.detector.is_check(&self.board, watched) {
            self.board.put(src, cell);
            self.board.put(dst, captured);
            #[cfg(feature = "selftest")]
            assert_eq!(self.board, snapshot, "board not restored after {}{}", src, dst);
            trace!("reverted {}{}", src, dst);
            return Err(MoveError::Check(watched));
        }

        self.side = next;
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

impl FromStr for Game {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Game, Self::Err> {
        type Error = PositionParseError;

        let mut iter = s.split_ascii_whitespace().fuse();
        let board = Board::from_str(iter.next().ok_or(Error::NoBoard)?)?;
        let side = match iter.next() {
            Some(s) => Color::from_str(s)?,
            None => Color::White,
        };
        if iter.next().is_some() {
            return Err(Error::ExtraData);
        }
        Ok(Game::from_board(board, side, GameOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Piece;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn c(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn game(fen: &str, options: GameOptions) -> Game {
        let mut g = Game::from_fen(fen).unwrap();
        g.set_options(options);
        g
    }

    const FULL_OPPONENT: GameOptions = GameOptions {
        scan: CheckScan::Full,
        veto: VetoSide::Opponent,
    };

    const FULL_MOVER: GameOptions = GameOptions {
        scan: CheckScan::Full,
        veto: VetoSide::Mover,
    };

    #[test]
    fn test_opening() {
        let mut g = Game::new();
        assert_eq!(g.side(), Color::White);
        assert!(g.try_move_rc(6, 4, 4, 4));
        assert_eq!(g.side(), Color::Black);
        assert_eq!(g.get_rc(4, 4), Some(Cell::from_parts(Color::White, Piece::Pawn)));
        assert_eq!(g.get_rc(6, 4), Some(Cell::EMPTY));

        assert!(g.try_move_rc(1, 4, 3, 4));
        assert_eq!(g.side(), Color::White);
        assert_eq!(g.get_rc(3, 4), Some(Cell::from_parts(Color::Black, Piece::Pawn)));
        assert_eq!(g.get_rc(1, 4), Some(Cell::EMPTY));

        assert_eq!(g.make_move_str("g1f3"), Ok(()));
        assert_eq!(g.make_move_str("b8c6"), Ok(()));
        assert_eq!(
            g.board().as_placement(),
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"
        );
    }

    #[test]
    fn test_rejections() {
        let mut g = Game::new();
        let before = g.clone();

        assert_eq!(
            g.make_move(c("e7"), c("e5")),
            Err(MoveError::WrongSide(Color::Black))
        );
        assert_eq!(g.make_move(c("e4"), c("e5")), Err(MoveError::EmptySource(c("e4"))));
        assert_eq!(
            g.make_move(c("e2"), c("e5")),
            Err(MoveError::Illegal {
                src: c("e2"),
                dst: c("e5")
            })
        );
        assert_eq!(
            g.make_move(c("e2"), c("e2")),
            Err(MoveError::Illegal {
                src: c("e2"),
                dst: c("e2")
            })
        );
        assert_eq!(g.make_move_rc(6, 4, 8, 4), Err(MoveError::OutOfRange));
        assert_eq!(g.make_move_rc(6, 8, 4, 4), Err(MoveError::OutOfRange));
        assert!(!g.try_move_rc(usize::MAX, 0, 0, 0));
        assert!(matches!(g.make_move_str("e2"), Err(MoveStrError::Parse(_))));
        assert!(matches!(g.make_move_str("a1a3"), Err(MoveStrError::Move(_))));

        assert_eq!(g, before);
    }

    #[test]
    fn test_knight_and_capture() {
        let mut g = game("1n2k3/8/8/8/8/8/8/4K2R b", GameOptions::default());
        assert!(!g.try_move(c("b8"), c("b7")));
        assert!(g.try_move(c("b8"), c("c6")));
        assert!(g.try_move(c("h1"), c("h8")));
        assert!(g.try_move(c("c6"), c("e5")));
        // The black king stands in the way
        assert!(!g.try_move(c("h8"), c("a8")));
        assert!(g.try_move(c("h8"), c("h5")));
        assert!(g.try_move(c("e8"), c("f7")));
        assert!(g.try_move(c("h5"), c("e5")));
        assert_eq!(g.get(c("e5")), Cell::from_parts(Color::White, Piece::Rook));
        assert_eq!(g.board().occupied().count(), 3);
    }

    #[test]
    fn test_kings_cannot_meet() {
        let mut g = game("8/8/8/3k4/8/3K4/8/8 w", GameOptions::default());
        let before = g.clone();
        assert_eq!(g.make_move(c("d3"), c("d4")), Err(MoveError::Check(Color::Black)));
        assert_eq!(g, before);
        assert!(g.try_move(c("d3"), c("c3")));
        assert_eq!(g.make_move(c("d5"), c("d4")), Err(MoveError::Check(Color::White)));
        assert!(g.try_move(c("d5"), c("e5")));
    }

    #[test]
    fn test_revert_restores_capture() {
        let mut g = game("8/8/8/3k4/4p3/4K3/8/8 w", GameOptions::default());
        let before = g.clone();
        assert_eq!(g.make_move(c("e3"), c("e4")), Err(MoveError::Check(Color::Black)));
        assert_eq!(g, before);
        assert_eq!(g.get(c("e4")), Cell::from_parts(Color::Black, Piece::Pawn));
    }

    #[test]
    fn test_ranged_check_is_ignored() {
        // Queen gives check along the open file, but the default scan doesn't see it
        let mut g = game("4k3/8/8/8/8/8/8/K3Q3 b", GameOptions::default());
        assert!(!g.is_check());
        assert!(g.try_move(c("e8"), c("e7")));
    }

    #[test]
    fn test_veto_side() {
        let fen = "4k3/8/8/8/8/8/8/R3K3 w";

        let mut g = game(fen, GameOptions::default());
        assert!(g.try_move(c("a1"), c("a8")));

        let mut g = game(fen, FULL_OPPONENT);
        assert_eq!(g.make_move(c("a1"), c("a8")), Err(MoveError::Check(Color::Black)));
        assert!(g.try_move(c("a1"), c("a7")));

        let mut g = game(fen, FULL_MOVER);
        assert!(g.try_move(c("a1"), c("a8")));
        assert!(g.is_check());
        // Black must get out of check
        assert_eq!(g.make_move(c("e8"), c("d8")), Err(MoveError::Check(Color::Black)));
        assert_eq!(g.make_move(c("e8"), c("e7")), Ok(()));
    }

    #[test]
    fn test_destinations() {
        let g = Game::new();
        assert_eq!(
            g.destinations(c("g1")),
            Bitboard::EMPTY.with(c("f3")).with(c("h3"))
        );
        assert_eq!(
            g.destinations(c("e2")),
            Bitboard::EMPTY.with(c("e3")).with(c("e4"))
        );
        assert!(g.destinations(c("e7")).is_empty());
        assert!(g.destinations(c("e4")).is_empty());
        assert!(g.destinations(c("e1")).is_empty());
        assert_eq!(g.legal_moves().len(), 20);

        let g = game("8/8/8/3k4/8/3K4/8/8 w", GameOptions::default());
        assert_eq!(g.destinations(c("d3")).len(), 5);
        assert!(!g.destinations(c("d3")).has(c("d4")));
    }

    #[test]
    fn test_reset() {
        let mut g = game("8/8/8/3k4/8/3K4/8/8 b", FULL_MOVER);
        g.reset();
        assert_eq!(g.board(), &Board::initial());
        assert_eq!(g.side(), Color::White);
        assert_eq!(g.options(), FULL_MOVER);
        assert_eq!(g.detector().scan(), CheckScan::Full);
    }

    #[test]
    fn test_from_fen() {
        let g = Game::from_fen("8/8/8/3k4/3K4/8/8/8 b").unwrap();
        assert_eq!(g.side(), Color::Black);
        assert_eq!(g.options(), GameOptions::default());
        let g = Game::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        assert_eq!(g, Game::new());

        assert_eq!(Game::from_fen(""), Err(PositionParseError::NoBoard));
        assert_eq!(
            Game::from_fen("8/8/8/3k4/3K4/8/8/8 x"),
            Err(PositionParseError::Side(ColorParseError::UnexpectedChar('x')))
        );
        assert_eq!(
            Game::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq"),
            Err(PositionParseError::ExtraData)
        );
        assert_eq!(
            Game::from_fen("8/8/8 w"),
            Err(PositionParseError::Board(PlacementParseError::Underflow))
        );
    }

    fn check_random_game(options: GameOptions, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut g = Game::with_options(options);
        let mut made = 0;
        for _ in 0..1000 {
            let legal = g.legal_moves();
            if legal.is_empty() {
                g.reset();
                continue;
            }
            let (src, dst) = if rng.gen_bool(0.5) {
                let mv = legal[rng.gen_range(0..legal.len())];
                (mv.src(), mv.dst())
            } else {
                (
                    Coord::from_index(rng.gen_range(0..64)),
                    Coord::from_index(rng.gen_range(0..64)),
                )
            };

            let before = g.clone();
            let expected = legal.contains(&Move::new(src, dst));
            let ok = g.try_move(src, dst);
            assert_eq!(ok, expected, "move {}{} in {}", src, dst, before.board());
            if !ok {
                assert_eq!(g, before);
                continue;
            }
            made += 1;
            assert_eq!(g.side(), before.side().inv());
            assert_eq!(g.get(dst), before.get(src));
            assert_eq!(g.get(src), Cell::EMPTY);
            for p in Coord::iter() {
                if p != src && p != dst {
                    assert_eq!(g.get(p), before.get(p));
                }
            }
        }
        assert!(made > 100);
    }

    #[test]
    fn test_random_games() {
        check_random_game(GameOptions::default(), 42);
        check_random_game(FULL_OPPONENT, 43);
        check_random_game(FULL_MOVER, 44);
    }
}
