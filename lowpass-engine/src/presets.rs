//! Preset lookup: `preset id -> FilterParameters`.
//!
//! The filter core knows nothing about presets. A host resolves an id through
//! a [`PresetLookup`] and pushes the result into its parameter store.
//!
//! Two sources ship here:
//! - [`FactoryPresets`] : the built-in table
//! - [`PresetBank`]     : user banks loaded from JSON, optionally layered over the factory table

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{info, warn};
use lowpass_core::filter::FilterParameters;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::params::{ParamId, SharedParams};

const CURRENT_FORMAT_VERSION: u32 = 1;

pub trait PresetLookup {
    fn find(&self, id: i32) -> Option<FilterParameters>;

    fn preset(&self, id: i32) -> Result<FilterParameters> {
        self.find(id).ok_or(EngineError::UnknownPreset(id))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FactoryPreset {
    pub id: i32,
    pub name: &'static str,
    pub params: FilterParameters,
}

pub static FACTORY_PRESETS: [FactoryPreset; 2] = [
    FactoryPreset { id: 0, name: "Preset One", params: FilterParameters::new(200.0, -5.0) },
    FactoryPreset { id: 1, name: "Preset Two", params: FilterParameters::new(1_000.0, 10.0) },
];

/// The built-in preset table.
#[derive(Copy, Clone, Debug, Default)]
pub struct FactoryPresets;

impl FactoryPresets {
    pub fn iter(&self) -> impl Iterator<Item = &'static FactoryPreset> {
        FACTORY_PRESETS.iter()
    }
}

impl PresetLookup for FactoryPresets {
    fn find(&self, id: i32) -> Option<FilterParameters> {
        FACTORY_PRESETS.iter().find(|p| p.id == id).map(|p| p.params)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Preset {
    pub id: i32,
    pub name: String,
    pub params: FilterParameters,
}

/// A set of named presets with unique ids.
#[derive(Clone, Debug, Default)]
pub struct PresetBank {
    presets: Vec<Preset>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SerializedPreset {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_hz: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resonance_db: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SerializedPresetBank {
    #[serde(default)]
    pub version: u32,
    pub presets: Vec<SerializedPreset>,
}

impl PresetBank {
    /// A bank holding the factory presets.
    pub fn factory() -> Self {
        Self {
            presets: FACTORY_PRESETS
                .iter()
                .map(|p| Preset { id: p.id, name: p.name.to_string(), params: p.params })
                .collect(),
        }
    }

    pub fn from_serialized(data: SerializedPresetBank) -> Result<Self> {
        if data.version > CURRENT_FORMAT_VERSION {
            warn!(
                "preset bank format version {} is newer than {}; reading known fields only",
                data.version, CURRENT_FORMAT_VERSION
            );
        }

        let mut seen = HashSet::new();
        let mut presets = Vec::with_capacity(data.presets.len());
        for sp in data.presets {
            if !seen.insert(sp.id) {
                return Err(EngineError::DuplicatePreset(sp.id));
            }
            let params = FilterParameters::new(
                sp.cutoff_hz.unwrap_or(ParamId::Cutoff.info().default),
                sp.resonance_db.unwrap_or(ParamId::Resonance.info().default),
            );
            presets.push(Preset { id: sp.id, name: sp.name, params });
        }
        Ok(Self { presets })
    }

    pub fn to_serialized(&self) -> SerializedPresetBank {
        SerializedPresetBank {
            version: CURRENT_FORMAT_VERSION,
            presets: self
                .presets
                .iter()
                .map(|p| SerializedPreset {
                    id: p.id,
                    name: p.name.clone(),
                    cutoff_hz: Some(p.params.cutoff_hz),
                    resonance_db: Some(p.params.resonance_db),
                })
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_serialized(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_serialized())?)
    }

    /// Load a bank from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bank = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!("loaded {} presets from {}", bank.len(), path.display());
        Ok(bank)
    }

    /// Add the factory presets whose ids this bank does not already use.
    #[must_use]
    pub fn with_factory(mut self) -> Self {
        for fp in FactoryPresets.iter() {
            if self.get(fp.id).is_none() {
                self.presets.push(Preset { id: fp.id, name: fp.name.to_string(), params: fp.params });
            }
        }
        self
    }

    pub fn get(&self, id: i32) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl PresetLookup for PresetBank {
    fn find(&self, id: i32) -> Option<FilterParameters> {
        self.get(id).map(|p| p.params)
    }
}

impl SharedParams {
    /// Resolve `id` through `lookup` and make it the current setting.
    pub fn apply_preset(&self, lookup: &impl PresetLookup, id: i32) -> Result<FilterParameters> {
        let params = lookup.preset(id)?;
        self.set_parameters(params);
        info!(
            "preset {id} applied: cutoff {} Hz, resonance {} dB",
            params.cutoff_hz, params.resonance_db
        );
        Ok(params)
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSource;

    #[test]
    fn factory_table() {
        assert_eq!(FactoryPresets.preset(0).unwrap(), FilterParameters::new(200.0, -5.0));
        assert_eq!(FactoryPresets.preset(1).unwrap(), FilterParameters::new(1_000.0, 10.0));
        assert!(matches!(FactoryPresets.preset(2), Err(EngineError::UnknownPreset(2))));
        assert_eq!(FactoryPresets.iter().map(|p| p.name).collect::<Vec<_>>(), ["Preset One", "Preset Two"]);
    }

    #[test]
    fn apply_preset_updates_shared_params() {
        let params = SharedParams::default();
        params.apply_preset(&FactoryPresets, 1).unwrap();
        assert_eq!(params.filter_parameters(), FilterParameters::new(1_000.0, 10.0));

        assert!(params.apply_preset(&FactoryPresets, -1).is_err());
        assert_eq!(params.filter_parameters(), FilterParameters::new(1_000.0, 10.0));
    }

    #[test]
    fn json_bank_fills_missing_fields_with_defaults() {
        let bank = PresetBank::from_json_str(
            r#"{
                "version": 1,
                "presets": [
                    { "id": 10, "name": "Dark", "cutoff_hz": 300.0, "resonance_db": 3.0 },
                    { "id": 11, "name": "Only cutoff", "cutoff_hz": 5000.0 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(bank.len(), 2);
        assert_eq!(bank.preset(10).unwrap(), FilterParameters::new(300.0, 3.0));
        assert_eq!(bank.preset(11).unwrap(), FilterParameters::new(5_000.0, 0.0));
        assert_eq!(bank.get(11).unwrap().name, "Only cutoff");
    }

    #[test]
    fn json_bank_rejects_duplicates_and_garbage() {
        let dup = r#"{ "presets": [ { "id": 1, "name": "a" }, { "id": 1, "name": "b" } ] }"#;
        assert!(matches!(PresetBank::from_json_str(dup), Err(EngineError::DuplicatePreset(1))));
        assert!(matches!(PresetBank::from_json_str("{ nope"), Err(EngineError::Parse(_))));
    }

    #[test]
    fn bank_serialization_keeps_presets() {
        let bank = PresetBank::factory();
        let back = PresetBank::from_json_str(&bank.to_json_string().unwrap()).unwrap();
        assert_eq!(back.iter().collect::<Vec<_>>(), bank.iter().collect::<Vec<_>>());
    }

    #[test]
    fn user_bank_overrides_factory_ids() {
        let bank = PresetBank::from_json_str(
            r#"{ "presets": [ { "id": 0, "name": "Mine", "cutoff_hz": 80.0 } ] }"#,
        )
        .unwrap()
        .with_factory();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(0).unwrap().name, "Mine");
        assert_eq!(bank.preset(1).unwrap(), FilterParameters::new(1_000.0, 10.0));
    }

    #[test]
    fn load_reads_file_and_reports_missing() {
        let path = std::env::temp_dir().join(format!("lowpass-bank-{}.json", std::process::id()));
        fs::write(&path, PresetBank::factory().to_json_string().unwrap()).unwrap();
        let bank = PresetBank::load(&path).unwrap();
        assert_eq!(bank.len(), 2);
        fs::remove_file(&path).unwrap();

        assert!(matches!(PresetBank::load(&path), Err(EngineError::Io(_))));
    }
}
