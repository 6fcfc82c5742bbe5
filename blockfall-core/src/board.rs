use std::{fmt, mem};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, SeqAccess, Visitor},
    ser::SerializeTuple,
};

pub const COLS: usize = 10;
pub const ROWS: usize = 20;

#[repr(u8)]
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    /// Spawn-orientation footprint. Matrices are not padded to squares,
    /// `I` really is a single row.
    pub fn shape(self) -> Vec<Vec<bool>> {
        match self {
            Self::I => vec![vec![true, true, true, true]],
            Self::O => vec![vec![true, true], vec![true, true]],
            Self::T => vec![vec![false, true, false], vec![true, true, true]],
            Self::S => vec![vec![false, true, true], vec![true, true, false]],
            Self::Z => vec![vec![true, true, false], vec![false, true, true]],
            Self::J => vec![vec![true, false, false], vec![true, true, true]],
            Self::L => vec![vec![false, false, true], vec![true, true, true]],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::I => "I",
            Self::O => "O",
            Self::T => "T",
            Self::S => "S",
            Self::Z => "Z",
            Self::J => "J",
            Self::L => "L",
        }
    }
}

/// The falling piece: owned copy of its shape matrix plus the matrix's
/// top-left corner in board coordinates. `y` may be negative while part
/// of the matrix sits above the top edge.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub grid: Vec<Vec<bool>>,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            grid: kind.shape(),
            x: 3,
            y: 0,
        }
    }

    /// 90° clockwise: `new[i][j] = old[rows - 1 - j][i]`.
    fn rotated(&self) -> Vec<Vec<bool>> {
        let rows = self.grid.len();
        let cols = self.grid[0].len();
        (0..cols)
            .map(|i| (0..rows).rev().map(|r| self.grid[r][i]).collect())
            .collect()
    }
}

pub type Row = [Option<PieceKind>; COLS];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub grid: [Row; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self {
            grid: [[None; COLS]; ROWS],
        }
    }
}

impl Board {
    /// True if any occupied cell of the piece leaves the field
    /// horizontally, reaches past the bottom row, or overlaps a settled
    /// cell. Cells above row 0 are never checked, so a piece may
    /// overlap the top edge.
    pub fn collides(&self, piece: &Piece) -> bool {
        for (r, row) in piece.grid.iter().enumerate() {
            for (c, filled) in row.iter().enumerate() {
                if !*filled {
                    continue;
                }
                let x = piece.x + c as i8;
                let y = piece.y + r as i8;
                if !(0..COLS as i8).contains(&x) || y >= ROWS as i8 {
                    return true;
                }
                if y >= 0 && self.grid[y as usize][x as usize].is_some() {
                    return true;
                }
            }
        }
        false
    }

    /// Writes the piece's kind into every occupied cell at its current
    /// position. Rows above the top edge are clipped. Placement is not
    /// re-checked here.
    pub fn merge(&mut self, piece: &Piece) {
        for (r, row) in piece.grid.iter().enumerate() {
            for (c, filled) in row.iter().enumerate() {
                let y = piece.y + r as i8;
                if !*filled || y < 0 {
                    continue;
                }
                self.grid[y as usize][(piece.x + c as i8) as usize] = Some(piece.kind);
            }
        }
    }

    /// Drops every full row, keeping the relative order of the
    /// survivors and padding back to full height with empty rows on
    /// top. Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self) -> u32 {
        let kept: Vec<Row> = self
            .grid
            .iter()
            .copied()
            .filter(|row| !row.iter().all(Option::is_some))
            .collect();
        let cleared = ROWS - kept.len();
        let mut grid = [[None; COLS]; ROWS];
        grid[cleared..].copy_from_slice(&kept);
        self.grid = grid;
        cleared as u32
    }

    /// Tentatively applies the offset. Returns if movement was a
    /// success; on collision the piece is reverted.
    pub fn try_move(&self, piece: &mut Piece, dx: i8, dy: i8) -> bool {
        piece.x += dx;
        piece.y += dy;
        if self.collides(piece) {
            piece.x -= dx;
            piece.y -= dy;
            return false;
        }
        true
    }

    /// Rotates the piece clockwise, restoring the previous orientation
    /// if the result collides. No wall kicks: a rotation blocked by a
    /// wall or the stack simply fails.
    pub fn rotate(&self, piece: &mut Piece) -> bool {
        let rotated = piece.rotated();
        let prev = mem::replace(&mut piece.grid, rotated);
        if self.collides(piece) {
            piece.grid = prev;
            return false;
        }
        true
    }
}

// The wire form is a flat tuple of all cells, row-major.
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut cells = serializer.serialize_tuple(ROWS * COLS)?;
        for row in &self.grid {
            for cell in row {
                cells.serialize_element(cell)?;
            }
        }
        cells.end()
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BoardVisitor;

        impl<'de> Visitor<'de> for BoardVisitor {
            type Value = Board;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "a tuple of {} cells", ROWS * COLS)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Board, A::Error> {
                let mut board = Board::default();
                for (i, cell) in board.grid.iter_mut().flatten().enumerate() {
                    *cell = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                Ok(board)
            }
        }

        deserializer.deserialize_tuple(ROWS * COLS, BoardVisitor)
    }
}
