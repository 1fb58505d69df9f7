use std::{collections::BTreeMap, convert::TryFrom, fs, io::ErrorKind, path::PathBuf};

use anyhow::{Context, Result};

pub const HIGH_SCORE_KEY: &str = "highScore";

/// A slot for one named integer that outlives the process.
pub trait HighScoreStore {
    fn get(&self) -> Result<Option<u32>>;
    fn set(&mut self, score: u32) -> Result<()>;
}

/// Keeps the high score in a small JSON object on disk. Other keys in the
/// file are left alone.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    fn read_map(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn get(&self) -> Result<Option<u32>> {
        let map = self.read_map()?;
        Ok(map.get(HIGH_SCORE_KEY).and_then(|v| v.as_u64()).and_then(|v| u32::try_from(v).ok()))
    }

    fn set(&mut self, score: u32) -> Result<()> {
        // A corrupt file gets replaced rather than blocking the save
        let mut map = self.read_map().unwrap_or_default();
        map.insert(HIGH_SCORE_KEY.to_string(), score.into());

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            }
        }

        let text = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, text).with_context(|| format!("writing {}", self.path.display()))
    }
}
