use std::collections::HashSet;

use serde::Serialize;

use crate::errors::GridError;

/// Coarse grouping used by the UI layer to lay out pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fundamental,
    Hihat,
    Tom,
    Cymbal,
    Perc,
    Extra,
}

/// One entry of the fixed instrument catalog.
///
/// `sound` is the default engine sound token the instrument maps to
/// (`bd`, `sd`, `hh`, ...). The catalog's declared order is the canonical
/// order everywhere: row storage, compiled output, event iteration.
#[derive(Debug, Clone, Serialize)]
pub struct Instrument {
    pub id: &'static str,
    pub name: &'static str,
    pub sound: &'static str,
    pub category: Category,
}

pub const INSTRUMENTS: [Instrument; 16] = [
    Instrument { id: "kick", name: "KICK", sound: "bd", category: Category::Fundamental },
    Instrument { id: "snare", name: "SNARE", sound: "sd", category: Category::Fundamental },
    Instrument { id: "clap", name: "CLAP", sound: "cp", category: Category::Fundamental },
    Instrument { id: "hihat", name: "HH", sound: "hh", category: Category::Hihat },
    Instrument { id: "openhat", name: "OH", sound: "oh", category: Category::Hihat },
    Instrument { id: "hitom", name: "HI-TOM", sound: "ht", category: Category::Tom },
    Instrument { id: "midtom", name: "MID-TOM", sound: "mt", category: Category::Tom },
    Instrument { id: "lotom", name: "LO-TOM", sound: "lt", category: Category::Tom },
    Instrument { id: "crash", name: "CRASH", sound: "cr", category: Category::Cymbal },
    Instrument { id: "ride", name: "RIDE", sound: "rd", category: Category::Cymbal },
    Instrument { id: "rim", name: "RIM", sound: "rim", category: Category::Perc },
    Instrument { id: "cowbell", name: "COWBELL", sound: "cb", category: Category::Perc },
    Instrument { id: "perc", name: "PERC", sound: "perc", category: Category::Perc },
    Instrument { id: "shaker", name: "SHAKE", sound: "sh", category: Category::Perc },
    Instrument { id: "tom", name: "TOM", sound: "tom", category: Category::Tom },
    Instrument { id: "misc", name: "MISC", sound: "misc", category: Category::Extra },
];

pub fn instrument(id: &str) -> Option<&'static Instrument> {
    INSTRUMENTS.iter().find(|inst| inst.id == id)
}

pub fn instrument_index(id: &str) -> Option<usize> {
    INSTRUMENTS.iter().position(|inst| inst.id == id)
}

/// A named sample bank. The id doubles as the `.bank(...)` qualifier in
/// compiled output; lowercased it prefixes resolved sound keys.
#[derive(Debug, Clone, Serialize)]
pub struct Kit {
    pub id: &'static str,
    pub name: &'static str,
    pub brand: &'static str,
    pub year: u16,
    pub style: &'static str,
}

/// Kits verified to carry all of `REQUIRED_SOUNDS`.
pub const KITS: [Kit; 12] = [
    Kit { id: "RolandTR808", name: "TR-808", brand: "Roland", year: 1980, style: "Hip-hop, Trap, Reggaeton" },
    Kit { id: "RolandTR909", name: "TR-909", brand: "Roland", year: 1983, style: "House, Techno, Trance" },
    Kit { id: "RolandTR707", name: "TR-707", brand: "Roland", year: 1984, style: "Electro, Synthpop" },
    Kit { id: "RolandTR606", name: "TR-606", brand: "Roland", year: 1981, style: "Acid, Electro" },
    Kit { id: "LinnDrum", name: "LinnDrum", brand: "Linn", year: 1982, style: "Prince, 80s Pop" },
    Kit { id: "OberheimDMX", name: "DMX", brand: "Oberheim", year: 1981, style: "Electro, Hip-hop" },
    Kit { id: "EmuDrumulator", name: "Drumulator", brand: "E-mu", year: 1983, style: "Electro, Industrial" },
    Kit { id: "BossDR110", name: "DR-110", brand: "Boss", year: 1983, style: "Minimal, Industrial" },
    Kit { id: "KorgKR55", name: "KR-55", brand: "Korg", year: 1979, style: "Disco, Classic" },
    Kit { id: "KorgDDM110", name: "DDM-110", brand: "Korg", year: 1984, style: "Lo-fi" },
    Kit { id: "AlesisHR16", name: "HR-16", brand: "Alesis", year: 1987, style: "Digital, Clean" },
    Kit { id: "CasioRZ1", name: "RZ-1", brand: "Casio", year: 1986, style: "Lo-fi, Hip-hop" },
];

/// Sounds a kit must provide to be usable with the sequencer.
pub const REQUIRED_SOUNDS: [&str; 4] = ["bd", "sd", "hh", "cp"];

/// Key a `(kit, sound)` pair resolves to in the host's sample store.
pub fn sound_key(kit: &str, sound: &str) -> String {
    format!("{}_{}", kit.to_ascii_lowercase(), sound)
}

/// Check a kit against the set of sample keys the host actually loaded.
pub fn kit_is_valid(loaded: &HashSet<String>, kit_id: &str) -> bool {
    REQUIRED_SOUNDS
        .iter()
        .all(|sound| loaded.contains(&sound_key(kit_id, sound)))
}

/// Maps an instrument to a playable sound key for a given kit.
///
/// Resolution happens at dispatch time, so a kit change between steps takes
/// effect on the next trigger without touching scheduler state.
pub trait SoundResolver {
    fn resolve(&self, kit: &str, instrument: &Instrument) -> Result<String, GridError>;
}

/// Resolver that trusts the catalog mapping unconditionally. Suitable when
/// the host guarantees every kit is fully loaded before playback.
#[derive(Debug, Default)]
pub struct CatalogResolver;

impl SoundResolver for CatalogResolver {
    fn resolve(&self, kit: &str, instrument: &Instrument) -> Result<String, GridError> {
        Ok(sound_key(kit, instrument.sound))
    }
}

/// Resolver backed by the sample keys that finished loading. Instruments
/// whose sound is missing from the set report `UnresolvedSound`.
#[derive(Debug, Default)]
pub struct LoadedKit {
    keys: HashSet<String>,
}

impl LoadedKit {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, key: String) {
        self.keys.insert(key);
    }

    pub fn is_complete(&self, kit_id: &str) -> bool {
        kit_is_valid(&self.keys, kit_id)
    }
}

impl SoundResolver for LoadedKit {
    fn resolve(&self, kit: &str, instrument: &Instrument) -> Result<String, GridError> {
        let key = sound_key(kit, instrument.sound);
        if self.keys.contains(&key) {
            Ok(key)
        } else {
            Err(GridError::UnresolvedSound {
                kit: kit.to_string(),
                instrument: instrument.id.to_string(),
            })
        }
    }
}
