//! Compiles a pattern grid into the engine's textual mini-notation.

use crate::pattern::Pattern;

/// Rest token in the engine's mini-notation.
pub const REST: &str = "~";

/// First line of every compiled program.
pub const HEADER: &str = "// Generated by the gridbeat step sequencer";

/// Placeholder emitted when the whole grid is silent: the compiler never
/// produces a program with zero playable events.
pub const FALLBACK_KIT: &str = "RolandTR808";
pub const FALLBACK_NOTATION: &str = "bd sd";

/// Map one boolean row to mini-notation step tokens.
///
/// Returns `None` for an all-false row so the caller can omit the instrument
/// entirely instead of emitting a line of rests. A row with every cell active
/// collapses to the `sound*N` repetition shorthand; the two spellings are
/// musically equivalent, the shorthand is just shorter.
pub fn row_to_notation(row: &[bool], sound: &str) -> Option<String> {
    if row.iter().all(|cell| !cell) {
        return None;
    }
    if row.iter().all(|cell| *cell) {
        return Some(format!("{}*{}", sound, row.len()));
    }
    Some(
        row.iter()
            .map(|cell| if *cell { sound } else { REST })
            .collect::<Vec<_>>()
            .join(" "),
    )
}

// Integral BPM values render without a trailing ".0" so the output matches
// what a slider-driven integer BPM produced historically.
fn format_bpm(bpm: f64) -> String {
    if bpm.fract() == 0.0 {
        format!("{}", bpm as i64)
    } else {
        format!("{bpm}")
    }
}

/// Compile the full grid into a program for the external engine.
///
/// Output is byte-identical for identical `(pattern, kit, bpm)` inputs: rows
/// are visited in catalog order and nothing else feeds the text.
pub fn compile(pattern: &Pattern, kit: &str, bpm: f64) -> String {
    let bpm_text = format_bpm(bpm);
    let mut lines = vec![
        HEADER.to_string(),
        format!("setcps({bpm_text}/60/4)  // {bpm_text} BPM"),
        String::new(),
        "stack(".to_string(),
    ];

    let voices: Vec<String> = pattern
        .iter_rows()
        .filter_map(|(inst, row)| {
            row_to_notation(row, inst.sound)
                .map(|notation| format!("  s(\"{notation}\").bank(\"{kit}\")"))
        })
        .collect();

    if voices.is_empty() {
        lines.push("  // No steps active yet".to_string());
        lines.push(format!("  s(\"{FALLBACK_NOTATION}\").bank(\"{FALLBACK_KIT}\")"));
    } else {
        lines.push(voices.join(",\n"));
    }

    lines.push(")".to_string());
    lines.join("\n")
}
