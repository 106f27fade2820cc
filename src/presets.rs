use once_cell::sync::Lazy;
use serde::Serialize;

use crate::errors::GridError;
use crate::instruments::instrument_index;
use crate::pattern::{Pattern, DEFAULT_STEP_COUNT};

/// Catalog entry handed to the UI's preset picker.
#[derive(Debug, Clone, Serialize)]
pub struct PresetInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// Preset rows are authored as 16-char step strings: `x` = hit, `.` = rest.
/// Only non-silent rows are listed; instruments missing from a preset stay
/// all-false when loaded, so presets authored against an older, smaller
/// catalog keep working after the catalog grows.
struct PresetDef {
    id: &'static str,
    name: &'static str,
    rows: &'static [(&'static str, &'static str)],
}

const PRESET_DEFS: [PresetDef; 10] = [
    PresetDef {
        id: "trap",
        name: "Trap",
        rows: &[
            ("kick", "x.....x...x....."),
            ("snare", "....x.......x..."),
            ("clap", "....x.......x..."),
            ("hihat", "xxxxxxxxxxxxxxxx"),
            ("openhat", "...............x"),
        ],
    },
    PresetDef {
        id: "house",
        name: "House",
        rows: &[
            ("kick", "x...x...x...x..."),
            ("clap", "....x.......x..."),
            ("hihat", "..x...x...x...x."),
            ("openhat", "...............x"),
            ("shaker", "xxxxxxxxxxxxxxxx"),
        ],
    },
    PresetDef {
        id: "dembow",
        name: "Dembow",
        rows: &[
            ("kick", "x...x...x...x..."),
            ("snare", "...x..x....x..x."),
            ("hihat", ".x.x.x.x.x.x.x.x"),
            ("rim", "...x.......x...."),
        ],
    },
    PresetDef {
        id: "drill",
        name: "Drill",
        rows: &[
            ("kick", "x.....x..x......"),
            ("snare", "....x.......x..."),
            ("hihat", "x.xx.xx.xx.xx.x."),
            ("openhat", ".......x.......x"),
        ],
    },
    PresetDef {
        id: "breakbeat",
        name: "Breakbeat",
        rows: &[
            ("kick", "x.......x.x....."),
            ("snare", "....x.......x..x"),
            ("hihat", "xxxxxxxxxxxxxxxx"),
            ("openhat", "......x.......x."),
            ("hitom", ".............x.."),
            ("lotom", "..............x."),
            ("crash", "x..............."),
        ],
    },
    PresetDef {
        id: "techno",
        name: "Techno",
        rows: &[
            ("kick", "x...x...x...x..."),
            ("clap", "....x.......x..."),
            ("hihat", "xxxxxxxxxxxxxxxx"),
            ("openhat", "..x...x...x...x."),
            ("rim", "..x...x...x...x."),
        ],
    },
    PresetDef {
        id: "reggaeton",
        name: "Reggaeton",
        rows: &[
            ("kick", "x...x...x...x..."),
            ("snare", "...x..x....x..x."),
            ("hihat", "x.x.x.x.x.x.x.x."),
            ("openhat", ".......x.......x"),
            ("perc", "...x.......x...."),
        ],
    },
    PresetDef {
        id: "hiphop",
        name: "Hip-Hop",
        rows: &[
            ("kick", "x.......x.....x."),
            ("snare", "....x.......x..."),
            ("hihat", "x.x.x.x.x.x.x.x."),
            ("openhat", ".......x........"),
            ("shaker", ".x.x.x.x.x.x.x.x"),
        ],
    },
    PresetDef {
        id: "disco",
        name: "Disco",
        rows: &[
            ("kick", "x...x...x...x..."),
            ("snare", "....x.......x..."),
            ("hihat", "x.x.x.x.x.x.x.x."),
            ("openhat", ".x.x.x.x.x.x.x.x"),
            ("shaker", "xxxxxxxxxxxxxxxx"),
        ],
    },
    PresetDef {
        id: "dnb",
        name: "DnB",
        rows: &[
            ("kick", "x.........x....."),
            ("snare", "....x.........x."),
            ("hihat", "xxxxxxxxxxxxxxxx"),
            ("openhat", "......x.......x."),
            ("crash", "x..............."),
        ],
    },
];

fn parse_steps(steps: &str) -> Vec<bool> {
    steps
        .chars()
        .map(|ch| match ch {
            'x' => true,
            '.' => false,
            other => panic!("bad step char {other:?} in preset data"),
        })
        .collect()
}

/// Preset grids parsed once, each sized to the current catalog.
static PRESETS: Lazy<Vec<(&'static str, Pattern)>> = Lazy::new(|| {
    PRESET_DEFS
        .iter()
        .map(|def| {
            let mut pattern = Pattern::empty(DEFAULT_STEP_COUNT);
            for (instrument_id, steps) in def.rows {
                let idx = instrument_index(instrument_id)
                    .unwrap_or_else(|| panic!("preset {} names unknown instrument {}", def.id, instrument_id));
                let cells = parse_steps(steps);
                assert_eq!(
                    cells.len(),
                    DEFAULT_STEP_COUNT,
                    "preset {} row {} has the wrong length",
                    def.id,
                    instrument_id
                );
                pattern.set_row_unchecked(idx, cells);
            }
            (def.id, pattern)
        })
        .collect()
});

/// Static preset catalog, stable ordering.
pub fn list() -> Vec<PresetInfo> {
    PRESET_DEFS
        .iter()
        .map(|def| PresetInfo {
            id: def.id,
            name: def.name,
        })
        .collect()
}

/// Deep copy of the named preset's grid, or `UnknownPreset`.
pub fn load(id: &str) -> Result<Pattern, GridError> {
    PRESETS
        .iter()
        .find(|(preset_id, _)| *preset_id == id)
        .map(|(_, pattern)| pattern.clone())
        .ok_or_else(|| GridError::UnknownPreset(id.to_string()))
}
