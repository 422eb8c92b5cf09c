//! Game configuration from `PLANET_REPAIR_*` environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use crate::core::{GameSession, QuestionBank, Scene};
use crate::types::REVEAL_DELAY_MS;

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub bank: Arc<QuestionBank>,
    pub scene: Arc<Scene>,
    pub seed: u32,
    pub reveal_delay_ms: u32,
    pub log_path: Option<PathBuf>,
}

impl GameConfig {
    /// Read the environment, loading catalog and scene files when named.
    pub fn from_env() -> Result<Self> {
        let bank = match non_empty_var("PLANET_REPAIR_QUESTIONS") {
            Some(path) => load_bank(Path::new(&path))?,
            None => QuestionBank::builtin().context("built-in question catalog is invalid")?,
        };
        let scene = match non_empty_var("PLANET_REPAIR_SCENE") {
            Some(path) => load_scene(Path::new(&path))?,
            None => Scene::reference(),
        };
        let seed = match non_empty_var("PLANET_REPAIR_SEED") {
            Some(s) => s
                .parse()
                .with_context(|| format!("PLANET_REPAIR_SEED is not a u32: {}", s))?,
            None => seed_from_clock(),
        };
        let reveal_delay_ms = match non_empty_var("PLANET_REPAIR_REVEAL_MS") {
            Some(s) => s
                .parse()
                .with_context(|| format!("PLANET_REPAIR_REVEAL_MS is not a u32: {}", s))?,
            None => REVEAL_DELAY_MS,
        };

        Ok(Self {
            bank: Arc::new(bank),
            scene: Arc::new(scene),
            seed,
            reveal_delay_ms,
            log_path: non_empty_var("PLANET_REPAIR_LOG_PATH").map(PathBuf::from),
        })
    }

    pub fn new_session(&self) -> GameSession {
        GameSession::new(Arc::clone(&self.bank), Arc::clone(&self.scene), self.seed)
    }
}

pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read question catalog {}", path.display()))?;
    QuestionBank::from_json_str(&json)
        .with_context(|| format!("invalid question catalog {}", path.display()))
}

pub fn load_scene(path: &Path) -> Result<Scene> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene {}", path.display()))?;
    Scene::from_json_str(&json).with_context(|| format!("invalid scene {}", path.display()))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn seed_from_clock() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
