//! Game setup loaded from a YAML scenario file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{GameError, GameResult};

pub const MIN_ROUND_COUNT: u32 = 10;
pub const MAX_ROUND_COUNT: u32 = 1000;
pub const MIN_MAP_WIDTH: u32 = 3;
pub const MIN_MAP_HEIGHT: u32 = 2;
pub const MAX_PLAYER_NAME_LEN: usize = 12;
pub const MAX_PLAYERS: usize = 8;

fn default_rounds() -> u32 {
    30
}

fn default_map_width() -> u32 {
    30
}

fn default_map_height() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub seed: u64,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub generator: GeneratorKind,
    pub players: Vec<PlayerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_width")]
    pub width: u32,
    #[serde(default = "default_map_height")]
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: default_map_width(),
            height: default_map_height(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    #[default]
    Noise,
    Weighted,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    /// Display color; defaults to the palette entry for the join position.
    #[serde(default)]
    pub color: Option<String>,
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("failed to parse scenario")
    }

    pub fn validate(&self) -> GameResult<()> {
        if !(MIN_ROUND_COUNT..=MAX_ROUND_COUNT).contains(&self.rounds) {
            return Err(GameError::InvalidScenario(format!(
                "round count {} outside [{MIN_ROUND_COUNT}, {MAX_ROUND_COUNT}]",
                self.rounds
            )));
        }
        if self.map.width < MIN_MAP_WIDTH {
            return Err(GameError::InvalidScenario(format!(
                "map width {} below minimum {MIN_MAP_WIDTH}",
                self.map.width
            )));
        }
        if self.map.height < MIN_MAP_HEIGHT {
            return Err(GameError::InvalidScenario(format!(
                "map height {} below minimum {MIN_MAP_HEIGHT}",
                self.map.height
            )));
        }
        if self.players.is_empty() {
            return Err(GameError::InvalidScenario("at least one player required".into()));
        }
        if self.players.len() > MAX_PLAYERS {
            return Err(GameError::InvalidScenario(format!(
                "at most {MAX_PLAYERS} players supported"
            )));
        }
        for (i, player) in self.players.iter().enumerate() {
            if player.name.is_empty() {
                return Err(GameError::InvalidScenario("player name can't be empty".into()));
            }
            if player.name.len() > MAX_PLAYER_NAME_LEN {
                return Err(GameError::InvalidScenario(format!(
                    "player name too long: {}",
                    player.name
                )));
            }
            for other in &self.players[..i] {
                if other.name == player.name {
                    return Err(GameError::InvalidScenario(format!(
                        "player name taken: {}",
                        player.name
                    )));
                }
                if other.color.is_some() && other.color == player.color {
                    return Err(GameError::InvalidScenario(format!(
                        "player color taken: {}",
                        player.color.as_deref().unwrap_or_default()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Loads scenario files relative to a base directory.
pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Scenario::from_yaml(&text)
    }
}
