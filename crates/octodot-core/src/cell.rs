#![forbid(unsafe_code)]

//! The 8-dot cell: one byte of dots, one glyph in the U+2800 block.
//!
//! Every cell is a 2 × 4 grid of dots. The byte ↔ glyph mapping is a plain
//! offset from [`BRAILLE_BASE`], so the codec is a bijection over all 256
//! values.
//!
//! ```text
//!   col 0  col 1
//!  ┌─────┬─────┐
//!  │  1  │  4  │  row 0
//!  │  2  │  5  │  row 1
//!  │  3  │  6  │  row 2
//!  │  7  │  8  │  row 3
//!  └─────┴─────┘
//! ```
//!
//! Dot *n* is bit *n − 1* of the byte.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use bitflags::bitflags;

/// First code point of the 8-dot block (the empty cell).
pub const BRAILLE_BASE: u32 = 0x2800;

/// Last code point of the 8-dot block (all dots raised).
pub const BRAILLE_LAST: u32 = BRAILLE_BASE + 0xFF;

bitflags! {
    /// Raised dots of a cell, one bit per dot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
    pub struct Dots: u8 {
        /// Top-left.
        const DOT1 = 0x01;
        /// Second row, left.
        const DOT2 = 0x02;
        /// Third row, left.
        const DOT3 = 0x04;
        /// Top-right.
        const DOT4 = 0x08;
        /// Second row, right.
        const DOT5 = 0x10;
        /// Third row, right.
        const DOT6 = 0x20;
        /// Bottom-left (extended row).
        const DOT7 = 0x40;
        /// Bottom-right (extended row).
        const DOT8 = 0x80;
    }
}

/// Every dot of the left column (`⡇`).
pub const LEFT_COLUMN: Dots = Dots::DOT1
    .union(Dots::DOT2)
    .union(Dots::DOT3)
    .union(Dots::DOT7);

/// Every dot of the right column (`⢸`).
pub const RIGHT_COLUMN: Dots = Dots::DOT4
    .union(Dots::DOT5)
    .union(Dots::DOT6)
    .union(Dots::DOT8);

// Bit index per (column, row):
// dot 1 (0,0) = bit 0    dot 4 (1,0) = bit 3
// dot 2 (0,1) = bit 1    dot 5 (1,1) = bit 4
// dot 3 (0,2) = bit 2    dot 6 (1,2) = bit 5
// dot 7 (0,3) = bit 6    dot 8 (1,3) = bit 7
const DOT_BITS: [[u8; 4]; 2] = [[0, 1, 2, 6], [3, 4, 5, 7]];

// Inverse of DOT_BITS: (column, row) per bit index.
const BIT_POSITIONS: [(u8, u8); 8] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 1),
    (1, 2),
    (0, 3),
    (1, 3),
];

/// A dot coordinate inside a cell's 2 × 4 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DotPosition {
    col: u8,
    row: u8,
}

impl DotPosition {
    /// Number of columns in a cell.
    pub const COLS: u8 = 2;
    /// Number of rows in a cell.
    pub const ROWS: u8 = 4;

    /// All eight positions in bit order.
    pub const ALL: [DotPosition; 8] = [
        Self::from_bit(0),
        Self::from_bit(1),
        Self::from_bit(2),
        Self::from_bit(3),
        Self::from_bit(4),
        Self::from_bit(5),
        Self::from_bit(6),
        Self::from_bit(7),
    ];

    /// Create a position, clamping `col` to 0..=1 and `row` to 0..=3.
    #[inline]
    pub const fn new(col: u8, row: u8) -> Self {
        let col = if col > 1 { 1 } else { col };
        let row = if row > 3 { 3 } else { row };
        Self { col, row }
    }

    /// Create a position, or `None` when either coordinate is out of range.
    #[inline]
    pub const fn checked(col: u8, row: u8) -> Option<Self> {
        if col < Self::COLS && row < Self::ROWS {
            Some(Self { col, row })
        } else {
            None
        }
    }

    /// Position of bit `bit` (taken modulo 8).
    #[inline]
    pub const fn from_bit(bit: u8) -> Self {
        let (col, row) = BIT_POSITIONS[(bit & 7) as usize];
        Self { col, row }
    }

    /// Column, 0 (left) or 1 (right).
    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Row, 0 (top) through 3 (bottom).
    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Bit index of this position in the dot byte.
    #[inline]
    pub const fn bit(self) -> u8 {
        DOT_BITS[self.col as usize][self.row as usize]
    }

    /// Single-dot mask for this position.
    #[inline]
    pub const fn mask(self) -> Dots {
        Dots::from_bits_retain(1 << self.bit())
    }

    /// Conventional dot number, 1 through 8.
    #[inline]
    pub const fn dot_number(self) -> u8 {
        self.bit() + 1
    }
}

/// One 8-dot cell.
///
/// Immutable value type; the glyph is always `BRAILLE_BASE + dots`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "u8", into = "u8")
)]
pub struct Cell {
    dots: Dots,
}

impl Cell {
    /// No dots raised.
    pub const EMPTY: Cell = Cell::from_bits(0);
    /// All eight dots raised.
    pub const FULL: Cell = Cell::from_bits(0xFF);

    /// Cell from a raw dot byte.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            dots: Dots::from_bits_retain(bits),
        }
    }

    /// Cell from a dot set.
    #[inline]
    pub const fn from_dots(dots: Dots) -> Self {
        Self { dots }
    }

    /// Cell with exactly the given positions raised.
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = DotPosition>,
    {
        positions
            .into_iter()
            .fold(Self::EMPTY, |cell, pos| cell.with(pos))
    }

    /// Raw dot byte.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.dots.bits()
    }

    /// Dot set.
    #[inline]
    pub const fn dots(self) -> Dots {
        self.dots
    }

    /// Glyph for this cell.
    #[inline]
    pub const fn glyph(self) -> char {
        // Every offset 0..=255 from U+2800 is a valid scalar value.
        match char::from_u32(BRAILLE_BASE + self.dots.bits() as u32) {
            Some(ch) => ch,
            None => ' ',
        }
    }

    /// Decode a glyph, or `None` when it lies outside the 8-dot block.
    #[inline]
    pub const fn from_glyph(ch: char) -> Option<Self> {
        let code = ch as u32;
        if code >= BRAILLE_BASE && code <= BRAILLE_LAST {
            Some(Self::from_bits((code - BRAILLE_BASE) as u8))
        } else {
            None
        }
    }

    /// Decode a glyph, treating anything outside the block as the empty cell.
    #[inline]
    pub const fn from_glyph_lossy(ch: char) -> Self {
        match Self::from_glyph(ch) {
            Some(cell) => cell,
            None => Self::EMPTY,
        }
    }

    /// `true` when no dot is raised.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.dots.is_empty()
    }

    /// Number of raised dots (0–8).
    #[inline]
    pub const fn dot_count(self) -> u32 {
        self.dots.bits().count_ones()
    }

    /// Raised dot numbers (1-indexed), ascending.
    pub fn dot_pattern(self) -> Vec<u8> {
        (0..8u8)
            .filter(|bit| self.bits() & (1 << bit) != 0)
            .map(|bit| bit + 1)
            .collect()
    }

    /// `true` when the dot at `pos` is raised.
    #[inline]
    pub const fn contains(self, pos: DotPosition) -> bool {
        self.dots.contains(pos.mask())
    }

    /// This cell with `pos` raised as well.
    #[inline]
    #[must_use]
    pub const fn with(self, pos: DotPosition) -> Self {
        Self {
            dots: self.dots.union(pos.mask()),
        }
    }

    /// Raised positions in bit order.
    pub fn positions(self) -> impl Iterator<Item = DotPosition> {
        DotPosition::ALL
            .into_iter()
            .filter(move |pos| self.contains(*pos))
    }

    /// Number of dots that differ between two cells.
    #[inline]
    pub const fn hamming(self, other: Cell) -> u32 {
        (self.bits() ^ other.bits()).count_ones()
    }
}

impl From<u8> for Cell {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.bits()
    }
}

impl From<Dots> for Cell {
    fn from(dots: Dots) -> Self {
        Self::from_dots(dots)
    }
}

impl BitOr for Cell {
    type Output = Cell;

    fn bitor(self, rhs: Cell) -> Cell {
        Cell::from_dots(self.dots | rhs.dots)
    }
}

impl BitOrAssign for Cell {
    fn bitor_assign(&mut self, rhs: Cell) {
        self.dots |= rhs.dots;
    }
}

impl BitOr<Dots> for Cell {
    type Output = Cell;

    fn bitor(self, rhs: Dots) -> Cell {
        Cell::from_dots(self.dots | rhs)
    }
}

impl BitOrAssign<Dots> for Cell {
    fn bitor_assign(&mut self, rhs: Dots) {
        self.dots |= rhs;
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Byte → cell. Total.
#[inline]
pub const fn encode_byte(byte: u8) -> Cell {
    Cell::from_bits(byte)
}

/// Cell → byte. Total, inverse of [`encode_byte`].
#[inline]
pub const fn decode_cell(cell: Cell) -> u8 {
    cell.bits()
}

/// `true` when `ch` lies in the 256-glyph block.
#[inline]
pub const fn is_glyph(ch: char) -> bool {
    Cell::from_glyph(ch).is_some()
}
