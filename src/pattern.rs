use crate::errors::GridError;
use crate::instruments::{instrument_index, Instrument, INSTRUMENTS};

pub const DEFAULT_STEP_COUNT: usize = 16;

/// Immutable step grid: one row of boolean cells per catalog instrument.
///
/// Rows are stored in catalog order, so every instrument has exactly one row
/// and every row has exactly `step_count` cells by construction. Mutations
/// (`toggle`, `clear`) return a new snapshot; the scheduler and the UI can
/// hold onto old snapshots without ever observing a torn write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    step_count: usize,
    rows: Vec<Vec<bool>>,
}

impl Pattern {
    /// All-silent pattern with `step_count` cells per row.
    pub fn empty(step_count: usize) -> Self {
        assert!(step_count > 0, "pattern needs at least one step");
        Self {
            step_count,
            rows: vec![vec![false; step_count]; INSTRUMENTS.len()],
        }
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn row(&self, instrument_id: &str) -> Option<&[bool]> {
        instrument_index(instrument_id).map(|idx| self.rows[idx].as_slice())
    }

    pub fn cell(&self, instrument_id: &str, step: usize) -> Option<bool> {
        self.row(instrument_id)?.get(step).copied()
    }

    /// Rows paired with their catalog instrument, in catalog order.
    pub fn iter_rows(&self) -> impl Iterator<Item = (&'static Instrument, &[bool])> {
        INSTRUMENTS
            .iter()
            .zip(self.rows.iter())
            .map(|(inst, row)| (inst, row.as_slice()))
    }

    pub fn is_silent(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|cell| !cell))
    }

    /// New snapshot with the single cell negated. The input is untouched on
    /// error: an unknown instrument or an out-of-range step reports
    /// `InvalidIndex`.
    pub fn toggle(&self, instrument_id: &str, step: usize) -> Result<Pattern, GridError> {
        let idx = instrument_index(instrument_id).ok_or_else(|| GridError::InvalidIndex {
            instrument: instrument_id.to_string(),
            step,
        })?;
        if step >= self.step_count {
            return Err(GridError::InvalidIndex {
                instrument: instrument_id.to_string(),
                step,
            });
        }

        let mut next = self.clone();
        next.rows[idx][step] = !next.rows[idx][step];
        Ok(next)
    }

    /// Equivalent to `empty` with the same step count.
    pub fn clear(&self) -> Pattern {
        Pattern::empty(self.step_count)
    }

    pub(crate) fn set_row_unchecked(&mut self, catalog_index: usize, cells: Vec<bool>) {
        debug_assert_eq!(cells.len(), self.step_count);
        self.rows[catalog_index] = cells;
    }

    /// Build a pattern from a JSON map of `instrument id -> [bool; N]`.
    ///
    /// Instruments absent from the map stay silent; unknown keys, non-array
    /// rows, non-boolean cells, and wrong-length rows are rejected before any
    /// row is applied.
    pub fn from_config(value: &serde_json::Value, step_count: usize) -> Result<Pattern, GridError> {
        let map = value
            .as_object()
            .ok_or_else(|| GridError::InvalidConfig("pattern must be an object".to_string()))?;

        let mut pattern = Pattern::empty(step_count);
        for (key, row_value) in map {
            let idx = instrument_index(key)
                .ok_or_else(|| GridError::InvalidConfig(format!("unknown instrument {key:?}")))?;
            let cells = row_value
                .as_array()
                .ok_or_else(|| GridError::InvalidConfig(format!("row {key:?} must be an array")))?;
            if cells.len() != step_count {
                return Err(GridError::InvalidConfig(format!(
                    "row {key:?} must have {step_count} steps, got {}",
                    cells.len()
                )));
            }

            let mut row = Vec::with_capacity(step_count);
            for cell in cells {
                row.push(cell.as_bool().ok_or_else(|| {
                    GridError::InvalidConfig(format!("row {key:?} holds a non-boolean cell"))
                })?);
            }
            pattern.set_row_unchecked(idx, row);
        }
        Ok(pattern)
    }

    /// JSON map of `instrument id -> [bool; N]`, the inverse of `from_config`.
    pub fn to_config(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (inst, row) in self.iter_rows() {
            map.insert(
                inst.id.to_string(),
                serde_json::Value::from(row.to_vec()),
            );
        }
        serde_json::Value::Object(map)
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::empty(DEFAULT_STEP_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_pattern_shape() {
        for step_count in [1, 8, 16, 32] {
            let pattern = Pattern::empty(step_count);
            assert_eq!(pattern.step_count(), step_count);
            for (_, row) in pattern.iter_rows() {
                assert_eq!(row.len(), step_count);
                assert!(row.iter().all(|cell| !cell));
            }
        }
    }

    #[test]
    fn test_double_toggle_is_identity() {
        let pattern = Pattern::empty(16);
        let once = pattern.toggle("snare", 4).unwrap();
        assert_eq!(once.cell("snare", 4), Some(true));

        let twice = once.toggle("snare", 4).unwrap();
        assert_eq!(twice, pattern);
    }

    #[test]
    fn test_toggle_does_not_mutate_input() {
        let pattern = Pattern::empty(16);
        let _ = pattern.toggle("kick", 0).unwrap();
        assert!(pattern.is_silent());
    }

    #[test]
    fn test_toggle_rejects_bad_step() {
        let pattern = Pattern::empty(16);
        assert_eq!(
            pattern.toggle("kick", 16),
            Err(GridError::InvalidIndex {
                instrument: "kick".to_string(),
                step: 16,
            })
        );
    }

    #[test]
    fn test_toggle_rejects_unknown_instrument() {
        let pattern = Pattern::empty(16);
        assert!(matches!(
            pattern.toggle("guitar", 0),
            Err(GridError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn test_clear_equals_empty() {
        let pattern = Pattern::empty(16)
            .toggle("kick", 0)
            .unwrap()
            .toggle("hihat", 2)
            .unwrap();
        assert_eq!(pattern.clear(), Pattern::empty(16));
    }

    #[test]
    fn test_config_round_trip() {
        let pattern = Pattern::empty(4)
            .toggle("kick", 0)
            .unwrap()
            .toggle("clap", 2)
            .unwrap();

        let config = pattern.to_config();
        let restored = Pattern::from_config(&config, 4).unwrap();
        assert_eq!(restored, pattern);
    }

    #[test]
    fn test_config_absent_instruments_stay_silent() {
        let config = json!({ "kick": [true, false, false, false] });
        let pattern = Pattern::from_config(&config, 4).unwrap();
        assert_eq!(pattern.cell("kick", 0), Some(true));
        assert!(pattern.row("snare").unwrap().iter().all(|cell| !cell));
    }

    #[test]
    fn test_config_rejections() {
        assert!(matches!(
            Pattern::from_config(&json!([1, 2, 3]), 16),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            Pattern::from_config(&json!({ "guitar": [true] }), 1),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            Pattern::from_config(&json!({ "kick": [true, false] }), 16),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            Pattern::from_config(&json!({ "kick": [1, 0] }), 2),
            Err(GridError::InvalidConfig(_))
        ));
    }
}
