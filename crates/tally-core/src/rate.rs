//! Billing rates and preset resolution.

use serde::{Deserialize, Serialize};

use crate::types::PresetId;

/// A billing rate: cost charged per block of minutes.
///
/// `minutes_per_unit <= 0` is a sentinel for "cost undefined"; accrual
/// treats it as zero cost and never divides by it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    pub cost_per_unit: f64,
    pub minutes_per_unit: f64,
}

impl Rate {
    pub const fn new(cost_per_unit: f64, minutes_per_unit: f64) -> Self {
        Self {
            cost_per_unit,
            minutes_per_unit,
        }
    }
}

impl Default for Rate {
    /// The out-of-the-box rate: 50 per 10 minutes.
    fn default() -> Self {
        Self::new(50.0, 10.0)
    }
}

/// A named rate override selectable per entity.
///
/// Preset names are labels, not keys; uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePreset {
    pub id: PresetId,
    pub name: String,
    #[serde(flatten)]
    pub rate: Rate,
}

/// Resolves the effective rate for an entity.
///
/// Returns the matching preset's rate when `preset_id` is set and found,
/// otherwise the default rate. A dangling preset reference (e.g., after the
/// preset was deleted) silently degrades to the default; there is no error
/// path.
#[must_use]
pub fn resolve(preset_id: Option<&PresetId>, default_rate: Rate, presets: &[GamePreset]) -> Rate {
    preset_id
        .and_then(|id| presets.iter().find(|p| &p.id == id))
        .map_or(default_rate, |p| p.rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(id: &str, cost: f64, minutes: f64) -> GamePreset {
        GamePreset {
            id: PresetId::new(id).unwrap(),
            name: format!("preset {id}"),
            rate: Rate::new(cost, minutes),
        }
    }

    #[test]
    fn resolve_prefers_matching_preset() {
        let presets = vec![preset("a", 80.0, 15.0), preset("b", 30.0, 5.0)];
        let id = PresetId::new("b").unwrap();
        let rate = resolve(Some(&id), Rate::default(), &presets);
        assert_eq!(rate, Rate::new(30.0, 5.0));
    }

    #[test]
    fn resolve_without_preset_returns_default() {
        let rate = resolve(None, Rate::new(40.0, 20.0), &[preset("a", 80.0, 15.0)]);
        assert_eq!(rate, Rate::new(40.0, 20.0));
    }

    #[test]
    fn resolve_dangling_preset_falls_back_to_default() {
        let id = PresetId::new("deleted").unwrap();
        let rate = resolve(Some(&id), Rate::default(), &[preset("a", 80.0, 15.0)]);
        assert_eq!(rate, Rate::default());
    }

    #[test]
    fn preset_serializes_with_flat_rate_fields() {
        let p = preset("a", 80.0, 15.0);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["costPerUnit"], 80.0);
        assert_eq!(json["minutesPerUnit"], 15.0);
        assert!(json.get("rate").is_none());
    }
}
