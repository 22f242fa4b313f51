#![forbid(unsafe_code)]

//! Boxed text view of a flow signature.

use unicode_width::UnicodeWidthStr;

use crate::signature::FlowSignature;

/// Chars of each field shown before truncation.
pub const FIELD_WIDTH: usize = 40;

/// Display columns between the box borders, excluding the one-space margins.
const INNER: usize = 51;

const ENERGY_BARS: [char; 5] = ['▁', '▂', '▃', '▄', '▅'];

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn row(content: &str) -> String {
    let pad = INNER.saturating_sub(content.width());
    format!("│ {content}{} │", " ".repeat(pad))
}

fn rule(left: char, right: char) -> String {
    format!("{left}{}{right}", "─".repeat(INNER + 2))
}

/// Energy contour as bars, one per cell, up to [`FIELD_WIDTH`] cells.
pub fn energy_bars(contour: &[f64]) -> String {
    contour
        .iter()
        .take(FIELD_WIDTH)
        .map(|e| {
            let level = (e * 4.0).max(0.0) as usize;
            ENERGY_BARS[level.min(ENERGY_BARS.len() - 1)]
        })
        .collect()
}

/// Render `sig` as a boxed report.
pub fn flow_report(sig: &FlowSignature) -> String {
    let source = sig.source.to_string();
    let lines = [
        rule('┌', '┐'),
        row("TEMPORAL DOT-FLOW SIGNATURE"),
        rule('├', '┤'),
        row(&format!("Source:   {}", truncate(&source, FIELD_WIDTH))),
        row(&format!("Flow:     {}", truncate(&sig.flow_sequence, FIELD_WIDTH))),
        row(&format!("Rhythm:   {}", truncate(&sig.rhythm_pattern, FIELD_WIDTH))),
        row(&format!("Dominant: {}", sig.dominant_flow)),
        rule('├', '┤'),
        row("Energy Contour:"),
        row(&energy_bars(&sig.energy_contour)),
        rule('└', '┘'),
    ];
    lines.join("\n")
}
