//! Shadow copies of the last saved per-symbol configuration.
//!
//! One JSON file per symbol under the cache directory, written after every
//! confirmed config update and read only at form-initialization time. A
//! pure offline fallback: the files have no authority over server truth.

use crate::core::Symbol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowConfig {
    pub symbol: Symbol,
    pub shares_outstanding: f64,
    pub eth_holdings: f64,
    pub saved_at: DateTime<Utc>,
}

pub struct ShadowStore {
    dir: PathBuf,
}

impl ShadowStore {
    pub fn new(dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, symbol: Symbol) -> PathBuf {
        self.dir.join(format!("config_{}.json", symbol.as_str()))
    }

    /// Overwrite the symbol's shadow file wholesale.
    pub fn save(&self, config: &ShadowConfig) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(config)?;
        fs::write(self.path_for(config.symbol), json)?;
        Ok(())
    }

    pub fn load(&self, symbol: Symbol) -> Result<Option<ShadowConfig>, StoreError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ShadowStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ShadowStore::new(dir.path().join("cache")).unwrap();
        (dir, store)
    }

    fn shadow(symbol: Symbol, shares: f64, eth: f64) -> ShadowConfig {
        ShadowConfig {
            symbol,
            shares_outstanding: shares,
            eth_holdings: eth,
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = store();
        let written = shadow(Symbol::Sbet, 129_038_060.0, 521_939.0);
        store.save(&written).unwrap();

        let read = store.load(Symbol::Sbet).unwrap().unwrap();
        assert_eq!(read, written);
    }

    #[test]
    fn test_load_missing_is_none() {
        let (_dir, store) = store();
        assert!(store.load(Symbol::Bmnr).unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let (_dir, store) = store();
        store.save(&shadow(Symbol::Bmnr, 1.0, 2.0)).unwrap();
        store.save(&shadow(Symbol::Bmnr, 121_700_000.0, 833_137.0)).unwrap();

        let read = store.load(Symbol::Bmnr).unwrap().unwrap();
        assert_eq!(read.shares_outstanding, 121_700_000.0);
        assert_eq!(read.eth_holdings, 833_137.0);
    }

    #[test]
    fn test_files_are_keyed_by_symbol() {
        let (_dir, store) = store();
        store.save(&shadow(Symbol::Sbet, 1.0, 2.0)).unwrap();
        assert!(store.load(Symbol::Bmnr).unwrap().is_none());
        assert!(store.dir.join("config_SBET.json").exists());
    }
}
