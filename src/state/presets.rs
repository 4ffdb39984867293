use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{PlannerError, Result};
use crate::models::Preferences;

/// Named preference snapshots, keyed by lowercase name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetStore {
    presets: BTreeMap<String, Preferences>,
}

impl PresetStore {
    /// Load presets from a JSON object. A missing file is an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let raw: BTreeMap<String, Preferences> = serde_json::from_str(&content)?;
        Ok(Self {
            presets: raw.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect(),
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.presets)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Preferences> {
        self.presets
            .get(&name.trim().to_lowercase())
            .ok_or_else(|| PlannerError::PresetNotFound(name.to_string()))
    }

    /// Store a validated snapshot, replacing any preset with the same name.
    pub fn insert(&mut self, name: &str, prefs: Preferences) -> Result<()> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return Err(PlannerError::InvalidInput("preset name is empty".to_string()));
        }
        prefs.validate()?;
        self.presets.insert(key, prefs);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Preferences> {
        self.presets
            .remove(&name.trim().to_lowercase())
            .ok_or_else(|| PlannerError::PresetNotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Diet, Profile};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = PresetStore::load(dir.path().join("presets.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_load_case_insensitive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("presets.json");

        let prefs = Preferences {
            diet: Diet::Vegan,
            profile: Profile::Cut,
            ..Preferences::default()
        };
        let mut store = PresetStore::default();
        store.insert("Lean Week", prefs.clone()).unwrap();
        store.save(&path).unwrap();

        let loaded = PresetStore::load(&path).unwrap();
        assert_eq!(loaded.get("LEAN WEEK").unwrap(), &prefs);
        assert_eq!(loaded.names(), vec!["lean week"]);
        assert!(matches!(loaded.get("other"), Err(PlannerError::PresetNotFound(_))));
    }

    #[test]
    fn test_insert_rejects_invalid() {
        let mut store = PresetStore::default();
        let bad = Preferences {
            days: 0,
            ..Preferences::default()
        };
        assert!(store.insert("bad", bad).is_err());
        assert!(store.insert("  ", Preferences::default()).is_err());
        assert!(store.remove("bad").is_err());
    }
}
