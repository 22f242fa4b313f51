#![forbid(unsafe_code)]

//! Dot transitions between adjacent cells.
//!
//! A transition splits the dots of two neighbouring cells into those that
//! appeared, disappeared or persisted, and classifies the change into one
//! [`FlowDirection`] by a fixed priority cascade:
//!
//! | Priority | Direction  | Condition                                              |
//! |----------|------------|--------------------------------------------------------|
//! | 1        | `Pulse`    | dots both appeared and disappeared, in equal numbers   |
//! | 2        | `Expand`   | spread(appeared) > spread(disappeared) + 0.5           |
//! | 3        | `Contract` | spread(disappeared) > spread(appeared) + 0.5           |
//! | 4        | `Up`/`Down`| vertical centroid shift beyond ±0.3 (negative is up)   |
//! | 5        | `Stable`   | otherwise                                              |
//!
//! Coordinates are `(col, row)` with row 0 at the top of the cell.

use std::fmt;
use std::str::FromStr;

use octodot_core::{Cell, DotPosition};
use smallvec::SmallVec;

use crate::record::RecordError;

/// Centroid of a cell with no raised dots: the middle of the grid.
pub const EMPTY_CENTROID: (f64, f64) = (0.5, 1.5);

const SPREAD_MARGIN: f64 = 0.5;
const VERTICAL_THRESHOLD: f64 = 0.3;
const SPIKE_THRESHOLD: i32 = 2;

/// How dots move between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum FlowDirection {
    /// Centroid moved toward row 0.
    Up,
    /// Centroid moved toward row 3.
    Down,
    /// New dots are more spread out than the ones that left.
    Expand,
    /// Departing dots were more spread out than the new ones.
    Contract,
    /// No significant movement.
    Stable,
    /// As many dots switched on as switched off.
    Pulse,
}

impl FlowDirection {
    /// Every direction, in declaration order.
    pub const ALL: [FlowDirection; 6] = [
        Self::Up,
        Self::Down,
        Self::Expand,
        Self::Contract,
        Self::Stable,
        Self::Pulse,
    ];

    /// Flow-sequence symbol.
    pub const fn symbol(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
            Self::Expand => '◇',
            Self::Contract => '◆',
            Self::Stable => '─',
            Self::Pulse => '◐',
        }
    }

    /// Direction for a flow-sequence symbol.
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '↑' => Some(Self::Up),
            '↓' => Some(Self::Down),
            '◇' => Some(Self::Expand),
            '◆' => Some(Self::Contract),
            '─' => Some(Self::Stable),
            '◐' => Some(Self::Pulse),
            _ => None,
        }
    }

    /// Upper-case name used in persisted records.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Expand => "EXPAND",
            Self::Contract => "CONTRACT",
            Self::Stable => "STABLE",
            Self::Pulse => "PULSE",
        }
    }
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FlowDirection {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| RecordError::UnknownDirection(s.to_string()))
    }
}

/// Per-transition rhythm symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RhythmMark {
    /// The transition was a pulse.
    Pulse,
    /// More than two dots changed in net count.
    Spike,
    /// Anything else.
    Quiet,
}

impl RhythmMark {
    /// Rhythm-pattern symbol.
    pub const fn symbol(self) -> char {
        match self {
            Self::Pulse => '●',
            Self::Spike => '◐',
            Self::Quiet => '○',
        }
    }
}

type Positions = SmallVec<[DotPosition; 8]>;

/// Mean `(col, row)` of the given positions, or [`EMPTY_CENTROID`].
pub fn centroid(positions: &[DotPosition]) -> (f64, f64) {
    if positions.is_empty() {
        return EMPTY_CENTROID;
    }
    let n = positions.len() as f64;
    let (x, y) = positions.iter().fold((0.0, 0.0), |(x, y), p| {
        (x + f64::from(p.col()), y + f64::from(p.row()))
    });
    (x / n, y / n)
}

/// Mean distance from the centroid. Zero for fewer than two positions.
pub fn spread(positions: &[DotPosition]) -> f64 {
    if positions.len() < 2 {
        return 0.0;
    }
    let (cx, cy) = centroid(positions);
    let total: f64 = positions
        .iter()
        .map(|p| (f64::from(p.col()) - cx).hypot(f64::from(p.row()) - cy))
        .sum();
    total / positions.len() as f64
}

/// Classify a transition from its appeared and disappeared dots and the
/// centroid shift `(dx, dy)`.
pub fn classify(appeared: Cell, disappeared: Cell, shift: (f64, f64)) -> FlowDirection {
    let (n_in, n_out) = (appeared.dot_count(), disappeared.dot_count());
    if n_in > 0 && n_out > 0 && n_in == n_out {
        return FlowDirection::Pulse;
    }

    let spread_in = spread(&appeared.positions().collect::<Positions>());
    let spread_out = spread(&disappeared.positions().collect::<Positions>());
    if spread_in > spread_out + SPREAD_MARGIN {
        return FlowDirection::Expand;
    }
    if spread_out > spread_in + SPREAD_MARGIN {
        return FlowDirection::Contract;
    }

    let dy = shift.1;
    if dy.abs() > VERTICAL_THRESHOLD {
        return if dy < 0.0 {
            FlowDirection::Up
        } else {
            FlowDirection::Down
        };
    }
    FlowDirection::Stable
}

/// The change from one cell to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotTransition {
    /// Dots raised in the second cell only.
    pub appeared: Cell,
    /// Dots raised in the first cell only.
    pub disappeared: Cell,
    /// Dots raised in both.
    pub persisted: Cell,
    /// Dot count of the second cell minus the first.
    pub energy_delta: i32,
    /// Centroid of the second cell minus the first, as `(dx, dy)`.
    pub centroid_shift: (f64, f64),
    /// Classified movement.
    pub flow: FlowDirection,
}

impl DotTransition {
    /// Compute the transition from `from` to `to`.
    pub fn between(from: Cell, to: Cell) -> Self {
        let (a, b) = (from.bits(), to.bits());
        let appeared = Cell::from_bits(b & !a);
        let disappeared = Cell::from_bits(a & !b);

        let (x1, y1) = centroid(&from.positions().collect::<Positions>());
        let (x2, y2) = centroid(&to.positions().collect::<Positions>());
        let centroid_shift = (x2 - x1, y2 - y1);

        Self {
            appeared,
            disappeared,
            persisted: Cell::from_bits(a & b),
            energy_delta: to.dot_count() as i32 - from.dot_count() as i32,
            centroid_shift,
            flow: classify(appeared, disappeared, centroid_shift),
        }
    }

    /// Rhythm symbol for this transition.
    pub fn rhythm(&self) -> RhythmMark {
        if self.flow == FlowDirection::Pulse {
            RhythmMark::Pulse
        } else if self.energy_delta.abs() > SPIKE_THRESHOLD {
            RhythmMark::Spike
        } else {
            RhythmMark::Quiet
        }
    }
}
