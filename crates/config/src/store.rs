// Operator state storage
// Files live under ~/.config/assetlink/ (or an explicit base dir in tests)

use std::fs;
use std::path::PathBuf;

use assetlink_core::{ReconciledUnits, UnitMappings};

/// JSON-file store for operator-confirmed reconciliation state.
#[derive(Debug, Clone)]
pub struct MappingStore {
    base: PathBuf,
}

impl MappingStore {
    /// Store under the platform config directory.
    pub fn new() -> Self {
        let base = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("assetlink");
        Self { base }
    }

    /// Store under an explicit directory (tests, portable setups).
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    fn load_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
        let raw = fs::read_to_string(self.path(name)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save_json<T: serde::Serialize>(&self, name: &str, value: &T) -> Result<(), String> {
        fs::create_dir_all(&self.base).map_err(|e| e.to_string())?;
        let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
        fs::write(self.path(name), json).map_err(|e| e.to_string())
    }

    pub fn load_mappings(&self) -> UnitMappings {
        self.load_json("unit_mappings.json").unwrap_or_default()
    }

    pub fn save_mappings(&self, mappings: &UnitMappings) -> Result<(), String> {
        self.save_json("unit_mappings.json", mappings)
    }

    pub fn load_reconciled(&self) -> ReconciledUnits {
        self.load_json("reconciled_units.json").unwrap_or_default()
    }

    pub fn save_reconciled(&self, reconciled: &ReconciledUnits) -> Result<(), String> {
        self.save_json("reconciled_units.json", reconciled)
    }

    /// Operator-curated external unit names missing from the feed; they
    /// extend the suggestion candidates.
    pub fn load_extra_units(&self) -> Vec<String> {
        self.load_json("extra_units.json").unwrap_or_default()
    }

    pub fn save_extra_units(&self, units: &[String]) -> Result<(), String> {
        self.save_json("extra_units.json", &units)
    }
}

impl Default for MappingStore {
    fn default() -> Self {
        Self::new()
    }
}
