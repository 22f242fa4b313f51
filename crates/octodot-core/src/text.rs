#![forbid(unsafe_code)]

//! Text ↔ cell codec.
//!
//! Letters, digits and common code punctuation go through a fixed table.
//! Some punctuation takes two cells (`(` is `⠐⠣`). Everything else falls back
//! to the raw code point: below 256 it is used directly as the dot byte,
//! above that it is reduced modulo 256.
//!
//! # Lossy cases
//!
//! - Code points ≥ 256 share cells with other characters and cannot be
//!   recovered.
//! - Decoding is greedy: a two-cell table entry is tried before single cells,
//!   so some adjacent pairs of single-cell characters decode as one
//!   punctuation mark (`` `a `` decodes as `@`, two spaces as a tab).
//! - Space and newline share the empty cell, which decodes as space.
//! - Direct-fallback bytes can collide with table cells (`'\r'` is `0x0D`,
//!   the cell for `m`).

use std::fmt;

use crate::cell::Cell;

/// Table entry for `ch`, if it has one.
const fn table_entry(ch: char) -> Option<&'static [u8]> {
    let cells: &'static [u8] = match ch {
        'a' => &[0x01],
        'b' => &[0x03],
        'c' => &[0x09],
        'd' => &[0x19],
        'e' => &[0x11],
        'f' => &[0x0B],
        'g' => &[0x1B],
        'h' => &[0x13],
        'i' => &[0x0A],
        'j' => &[0x1A],
        'k' => &[0x05],
        'l' => &[0x07],
        'm' => &[0x0D],
        'n' => &[0x1D],
        'o' => &[0x15],
        'p' => &[0x0F],
        'q' => &[0x1F],
        'r' => &[0x17],
        's' => &[0x0E],
        't' => &[0x1E],
        'u' => &[0x25],
        'v' => &[0x27],
        'w' => &[0x3A],
        'x' => &[0x2D],
        'y' => &[0x3D],
        'z' => &[0x35],

        // Uppercase: lowercase pattern plus dot 7.
        'A' => &[0x41],
        'B' => &[0x43],
        'C' => &[0x49],
        'D' => &[0x59],
        'E' => &[0x51],
        'F' => &[0x4B],
        'G' => &[0x5B],
        'H' => &[0x53],
        'I' => &[0x4A],
        'J' => &[0x5A],
        'K' => &[0x45],
        'L' => &[0x47],
        'M' => &[0x4D],
        'N' => &[0x5D],
        'O' => &[0x55],
        'P' => &[0x4F],
        'Q' => &[0x5F],
        'R' => &[0x57],
        'S' => &[0x4E],
        'T' => &[0x5E],
        'U' => &[0x65],
        'V' => &[0x67],
        'W' => &[0x7A],
        'X' => &[0x6D],
        'Y' => &[0x7D],
        'Z' => &[0x75],

        // Digits: a–j pattern plus dot 8.
        '0' => &[0x9A],
        '1' => &[0x81],
        '2' => &[0x83],
        '3' => &[0x89],
        '4' => &[0x99],
        '5' => &[0x91],
        '6' => &[0x8B],
        '7' => &[0x9B],
        '8' => &[0x93],
        '9' => &[0x8A],

        ' ' => &[0x00],
        '.' => &[0x32],
        ',' => &[0x02],
        ':' => &[0x12],
        ';' => &[0x06],
        '!' => &[0x16],
        '?' => &[0x26],
        '\'' => &[0x04],
        '"' => &[0x10, 0x02],
        '`' => &[0x08],

        '(' => &[0x10, 0x23],
        ')' => &[0x10, 0x1C],
        '[' => &[0x28, 0x23],
        ']' => &[0x28, 0x1C],
        '{' => &[0x38, 0x23],
        '}' => &[0x38, 0x1C],
        '<' => &[0x10, 0x2A],
        '>' => &[0x10, 0x15],

        '+' => &[0x10, 0x16],
        '-' => &[0x24],
        '*' => &[0x10, 0x14],
        '/' => &[0x38, 0x0C],
        '\\' => &[0x38, 0x21],
        '=' => &[0x10, 0x36],
        '%' => &[0x28, 0x34],
        '&' => &[0x08, 0x2F],
        '|' => &[0x38, 0x33],
        '^' => &[0x08, 0x22],
        '~' => &[0x08, 0x14],

        '@' => &[0x08, 0x01],
        '#' => &[0x28, 0x3C],
        '$' => &[0x08, 0x0E],
        '_' => &[0x28, 0x24],
        '\n' => &[0x00],
        '\t' => &[0x00, 0x00],
        _ => return None,
    };
    Some(cells)
}

/// Character for a two-cell table entry.
const fn decode_pair(first: u8, second: u8) -> Option<char> {
    let ch = match (first, second) {
        (0x10, 0x02) => '"',
        (0x10, 0x23) => '(',
        (0x10, 0x1C) => ')',
        (0x28, 0x23) => '[',
        (0x28, 0x1C) => ']',
        (0x38, 0x23) => '{',
        (0x38, 0x1C) => '}',
        (0x10, 0x2A) => '<',
        (0x10, 0x15) => '>',
        (0x10, 0x16) => '+',
        (0x10, 0x14) => '*',
        (0x38, 0x0C) => '/',
        (0x38, 0x21) => '\\',
        (0x10, 0x36) => '=',
        (0x28, 0x34) => '%',
        (0x08, 0x2F) => '&',
        (0x38, 0x33) => '|',
        (0x08, 0x22) => '^',
        (0x08, 0x14) => '~',
        (0x08, 0x01) => '@',
        (0x28, 0x3C) => '#',
        (0x08, 0x0E) => '$',
        (0x28, 0x24) => '_',
        (0x00, 0x00) => '\t',
        _ => return None,
    };
    Some(ch)
}

/// Character for a single-cell table entry.
const fn decode_single(bits: u8) -> Option<char> {
    let ch = match bits {
        0x01 => 'a',
        0x03 => 'b',
        0x09 => 'c',
        0x19 => 'd',
        0x11 => 'e',
        0x0B => 'f',
        0x1B => 'g',
        0x13 => 'h',
        0x0A => 'i',
        0x1A => 'j',
        0x05 => 'k',
        0x07 => 'l',
        0x0D => 'm',
        0x1D => 'n',
        0x15 => 'o',
        0x0F => 'p',
        0x1F => 'q',
        0x17 => 'r',
        0x0E => 's',
        0x1E => 't',
        0x25 => 'u',
        0x27 => 'v',
        0x3A => 'w',
        0x2D => 'x',
        0x3D => 'y',
        0x35 => 'z',
        0x41 => 'A',
        0x43 => 'B',
        0x49 => 'C',
        0x59 => 'D',
        0x51 => 'E',
        0x4B => 'F',
        0x5B => 'G',
        0x53 => 'H',
        0x4A => 'I',
        0x5A => 'J',
        0x45 => 'K',
        0x47 => 'L',
        0x4D => 'M',
        0x5D => 'N',
        0x55 => 'O',
        0x4F => 'P',
        0x5F => 'Q',
        0x57 => 'R',
        0x4E => 'S',
        0x5E => 'T',
        0x65 => 'U',
        0x67 => 'V',
        0x7A => 'W',
        0x6D => 'X',
        0x7D => 'Y',
        0x75 => 'Z',
        0x9A => '0',
        0x81 => '1',
        0x83 => '2',
        0x89 => '3',
        0x99 => '4',
        0x91 => '5',
        0x8B => '6',
        0x9B => '7',
        0x93 => '8',
        0x8A => '9',
        0x00 => ' ',
        0x32 => '.',
        0x02 => ',',
        0x12 => ':',
        0x06 => ';',
        0x16 => '!',
        0x26 => '?',
        0x04 => '\'',
        0x08 => '`',
        0x24 => '-',
        _ => return None,
    };
    Some(ch)
}

/// Fallback cell for a character without a table entry.
#[inline]
const fn fallback_cell(ch: char) -> Cell {
    // Below 256 this is the code point itself; above it, the low byte.
    Cell::from_bits((ch as u32 % 256) as u8)
}

/// An ordered run of cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodedSeq {
    cells: Vec<Cell>,
}

impl EncodedSeq {
    /// Empty sequence.
    pub const fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Read a glyph string, one cell per char. Chars outside the block
    /// become empty cells.
    pub fn from_glyphs(glyphs: &str) -> Self {
        glyphs.chars().map(Cell::from_glyph_lossy).collect()
    }

    /// The cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Take the cells.
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` when there are no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Append a cell.
    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Mean raised dots per cell (0.0 for an empty sequence).
    pub fn dot_density(&self) -> f64 {
        dot_density(&self.cells)
    }
}

impl From<Vec<Cell>> for EncodedSeq {
    fn from(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

impl FromIterator<Cell> for EncodedSeq {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl AsRef<[Cell]> for EncodedSeq {
    fn as_ref(&self) -> &[Cell] {
        &self.cells
    }
}

impl fmt::Display for EncodedSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.glyph())?;
        }
        Ok(())
    }
}

/// Encode text to cells. Never fails; lossy above U+00FF.
pub fn encode(text: &str) -> EncodedSeq {
    let mut seq = EncodedSeq {
        cells: Vec::with_capacity(text.len()),
    };
    for ch in text.chars() {
        match table_entry(ch) {
            Some(cells) => seq
                .cells
                .extend(cells.iter().copied().map(Cell::from_bits)),
            None => {
                if ch as u32 > 0xFF {
                    crate::trace!(code_point = u32::from(ch), "modulo fallback");
                }
                seq.cells.push(fallback_cell(ch));
            }
        }
    }
    seq
}

/// Decode cells to text using greedy longest-match.
pub fn decode(seq: &EncodedSeq) -> String {
    decode_cells(seq.cells())
}

/// Decode a cell slice to text using greedy longest-match.
pub fn decode_cells(cells: &[Cell]) -> String {
    let mut out = String::with_capacity(cells.len());
    let mut i = 0;
    while i < cells.len() {
        if let Some(next) = cells.get(i + 1)
            && let Some(ch) = decode_pair(cells[i].bits(), next.bits())
        {
            out.push(ch);
            i += 2;
            continue;
        }
        let bits = cells[i].bits();
        out.push(decode_single(bits).unwrap_or(bits as char));
        i += 1;
    }
    out
}

/// Encode text straight to a glyph string.
pub fn encode_text(text: &str) -> String {
    encode(text).to_string()
}

/// Decode a glyph string. Runs of glyphs are decoded with the greedy table
/// policy; chars outside the block pass through unchanged.
pub fn decode_text(glyphs: &str) -> String {
    let mut out = String::with_capacity(glyphs.len());
    let mut run: Vec<Cell> = Vec::new();
    for ch in glyphs.chars() {
        match Cell::from_glyph(ch) {
            Some(cell) => run.push(cell),
            None => {
                out.push_str(&decode_cells(&run));
                run.clear();
                out.push(ch);
            }
        }
    }
    out.push_str(&decode_cells(&run));
    out
}

/// `true` when `text` is non-empty and every char is in the 256-glyph block.
pub fn is_encoded(text: &str) -> bool {
    !text.is_empty() && text.chars().all(crate::cell::is_glyph)
}

/// Mean raised dots per cell (0.0 for no cells).
pub fn dot_density(cells: &[Cell]) -> f64 {
    if cells.is_empty() {
        return 0.0;
    }
    let total: u32 = cells.iter().map(|c| c.dot_count()).sum();
    f64::from(total) / cells.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(seq: &EncodedSeq) -> Vec<u8> {
        seq.cells().iter().map(|c| c.bits()).collect()
    }

    #[test]
    fn abc_uses_table_values() {
        let seq = encode("abc");
        assert_eq!(bits(&seq), vec![0x01, 0x03, 0x09]);
        assert_eq!(seq.to_string(), "⠁⠃⠉");
        assert_eq!(decode(&seq), "abc");
    }

    #[test]
    fn uppercase_and_digits() {
        assert_eq!(bits(&encode("A")), vec![0x41]);
        assert_eq!(bits(&encode("Z")), vec![0x75]);
        assert_eq!(bits(&encode("0")), vec![0x9A]);
        assert_eq!(bits(&encode("9")), vec![0x8A]);
        assert_eq!(decode(&encode("Hello42")), "Hello42");
    }

    #[test]
    fn two_cell_punctuation() {
        assert_eq!(encode_text("("), "⠐⠣");
        assert_eq!(encode_text(")"), "⠐⠜");
        assert_eq!(encode_text("\""), "⠐⠂");
        assert_eq!(decode_text("⠐⠣⠐⠜"), "()");
    }

    #[test]
    fn code_roundtrip() {
        let src = "fn main() { let x = a[1] + b; }";
        assert_eq!(decode(&encode(src)), src);
    }

    #[test]
    fn greedy_decode_merges_backtick_pairs() {
        // '`' followed by 'a' is indistinguishable from '@'.
        assert_eq!(decode(&encode("`a")), "@");
        assert_eq!(decode(&encode("  ")), "\t");
    }

    #[test]
    fn newline_decodes_as_space() {
        assert_eq!(encode_text("\n"), "⠀");
        assert_eq!(decode_text("⠀"), " ");
    }

    #[test]
    fn direct_fallback_below_256() {
        // '\u{e9}' (é) is not in the table.
        let seq = encode("\u{e9}");
        assert_eq!(bits(&seq), vec![0xE9]);
        assert_eq!(decode(&seq), "\u{e9}");
    }

    #[test]
    fn modulo_fallback_above_255() {
        // U+4E2D mod 256 = 0x2D, the cell for 'x'.
        let seq = encode("\u{4E2D}");
        assert_eq!(bits(&seq), vec![0x2D]);
        assert_eq!(decode(&seq), "x");
    }

    #[test]
    fn decode_passes_foreign_chars_through() {
        assert_eq!(decode_text("⠁?⠃"), "a?b");
        assert_eq!(decode_text(""), "");
    }

    #[test]
    fn decode_unmapped_glyph_as_byte() {
        // 0x7F has no table entry.
        assert_eq!(decode_text("\u{287F}"), "\u{7f}");
    }

    #[test]
    fn is_encoded_detects_glyph_runs() {
        assert!(is_encoded("⠁⠃⠉"));
        assert!(is_encoded("⠀"));
        assert!(!is_encoded("abc"));
        assert!(!is_encoded("⠁b"));
        assert!(!is_encoded(""));
    }

    #[test]
    fn density() {
        assert_eq!(dot_density(&[]), 0.0);
        let seq = EncodedSeq::from_glyphs("⠁⣿");
        assert!((seq.dot_density() - 4.5).abs() < 1e-12);
    }

    #[test]
    fn from_glyphs_is_lossy_for_foreign_chars() {
        let seq = EncodedSeq::from_glyphs("⠁x⣿");
        assert_eq!(bits(&seq), vec![0x01, 0x00, 0xFF]);
    }

    #[test]
    fn every_table_entry_roundtrips_alone() {
        for ch in (0u8..=127).map(char::from) {
            if let Some(cells) = table_entry(ch) {
                let decoded = decode(&encode(&ch.to_string()));
                let expected = if ch == '\n' { ' ' } else { ch };
                assert_eq!(decoded, expected.to_string(), "char {ch:?} cells {cells:?}");
            }
        }
    }
}
