//! Board and related things

use crate::types::{Cell, Color, Coord, File, Piece, Rank};

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Error parsing the piece placement (i.e. the first field of FEN)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Chess board
///
/// The board is just an 8x8 grid of [`Cell`]s and is the only source of truth about the pieces.
/// Row 0 is the back rank of Black and row 7 is the back rank of White.
///
/// The board does not validate its contents. It may contain any number of kings (including
/// zero) if it was edited with [`Board::put()`] or parsed from text.
///
/// # Example
///
/// ```
/// # use chessrule::{Board, Cell, Color, Coord, Piece};
/// #
/// let mut board = Board::empty();
/// let e1 = Coord::from_row_col(7, 4).unwrap();
/// board.put(e1, Cell::from_parts(Color::White, Piece::King));
/// assert_eq!(board.as_placement(), "8/8/8/8/8/8/8/4K3");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Cell; 64],
}

impl Board {
    /// Returns a board without any pieces
    #[inline]
    pub const fn empty() -> Board {
        Board {
            cells: [Cell::EMPTY; 64],
        }
    }

    /// Returns a board with the initial position
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for file in File::iter() {
            res.put2(file, Rank::R2, Cell::from_parts(Color::White, Piece::Pawn));
            res.put2(file, Rank::R7, Cell::from_parts(Color::Black, Piece::Pawn));
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            res.put2(File::A, rank, Cell::from_parts(color, Piece::Rook));
            res.put2(File::B, rank, Cell::from_parts(color, Piece::Knight));
            res.put2(File::C, rank, Cell::from_parts(color, Piece::Bishop));
            res.put2(File::D, rank, Cell::from_parts(color, Piece::Queen));
            res.put2(File::E, rank, Cell::from_parts(color, Piece::King));
            res.put2(File::F, rank, Cell::from_parts(color, Piece::Bishop));
            res.put2(File::G, rank, Cell::from_parts(color, Piece::Knight));
            res.put2(File::H, rank, Cell::from_parts(color, Piece::Rook));
        }
        res
    }

    /// Parses a board from piece placement
    ///
    /// Does the same as [`Board::from_str`].
    #[inline]
    pub fn from_placement(s: &str) -> Result<Board, PlacementParseError> {
        Board::from_str(s)
    }

    /// Returns the contents of the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    /// Returns the contents of the square at `(row, col)`, or `None` if any of
    /// them is out of range
    #[inline]
    pub fn get_rc(&self, row: usize, col: usize) -> Option<Cell> {
        Coord::from_row_col(row, col).map(|c| self.get(c))
    }

    /// Puts `cell` to the square with coordinate `c`
    #[inline]
    pub fn put(&mut self, c: Coord, cell: Cell) {
        self.cells[c.index()] = cell;
    }

    /// Puts `cell` to the square with file `file` and rank `rank`
    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Coord::from_parts(file, rank), cell);
    }

    /// Returns the grid as rows, row 0 first
    pub fn cells(&self) -> [[Cell; 8]; 8] {
        let mut rows = [[Cell::EMPTY; 8]; 8];
        for c in Coord::iter() {
            rows[c.row()][c.col()] = self.get(c);
        }
        rows
    }

    /// Iterates over all the occupied squares in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        Coord::iter()
            .map(|c| (c, self.get(c)))
            .filter(|(_, cell)| cell.is_occupied())
    }

    /// Returns the first square (in row-major order) holding the king of color `c`
    ///
    /// Returns `None` if there is no such king.
    pub fn king_pos(&self, c: Color) -> Option<Coord> {
        let king = Cell::from_parts(c, Piece::King);
        Coord::iter().find(|&p| self.get(p) == king)
    }

    /// Wraps the board to allow pretty-printing with the given style `Style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use chessrule::{Board, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    ///  |abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    ///
    /// let res = r#"
    /// 8│♜♞♝♛♚♝♞♜
    /// 7│♟♟♟♟♟♟♟♟
    /// 6│........
    /// 5│........
    /// 4│........
    /// 3│........
    /// 2│♙♙♙♙♙♙♙♙
    /// 1│♖♘♗♕♔♗♘♖
    /// ─┼────────
    ///  │abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Utf8).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }

    /// Converts the board into piece placement string
    ///
    /// Does the same as `Board::to_string()`.
    #[inline]
    pub fn as_placement(&self) -> String {
        self.to_string()
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

impl FromStr for Board {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        type Error = PlacementParseError;

        let mut file = 0_usize;
        let mut rank = 0_usize;
        let mut pos = 0_usize;
        let mut res = Board::empty();
        for ch in s.chars() {
            match ch {
                '1'..='8' => {
                    let add = (u32::from(ch) - u32::from('0')) as usize;
                    if file + add > 8 {
                        return Err(Error::RankOverflow(Rank::from_index(rank)));
                    }
                    file += add;
                    pos += add;
                }
                '/' => {
                    if file < 8 {
                        return Err(Error::RankUnderflow(Rank::from_index(rank)));
                    }
                    rank += 1;
                    file = 0;
                    if rank >= 8 {
                        return Err(Error::Overflow);
                    }
                }
                _ => {
                    if file >= 8 {
                        return Err(Error::RankOverflow(Rank::from_index(rank)));
                    }
                    let cell = match Cell::from_char(ch) {
                        Some(cell) if cell.is_occupied() => cell,
                        _ => return Err(Error::UnexpectedChar(ch)),
                    };
                    res.cells[pos] = cell;
                    file += 1;
                    pos += 1;
                }
            };
        }

        if file < 8 {
            return Err(Error::RankUnderflow(Rank::from_index(rank)));
        }
        if rank < 7 {
            return Err(Error::Underflow);
        }
        Ok(res)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            if rank.index() != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                let cell = self.get2(file, rank);
                if cell.is_free() {
                    empty += 1;
                    continue;
                }
                if empty != 0 {
                    write!(f, "{}", (b'0' + empty) as char)?;
                    empty = 0;
                }
                write!(f, "{}", cell)?;
            }
            if empty != 0 {
                write!(f, "{}", (b'0' + empty) as char)?;
            }
        }
        Ok(())
    }
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;

    fn cell(c: Cell) -> char;

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                write!(f, "{}", Self::cell(b.get2(file, rank)))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, " {}", Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';

    fn cell(c: Cell) -> char {
        c.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';

    fn cell(c: Cell) -> char {
        c.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}
