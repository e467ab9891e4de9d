use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, GameError};
use crate::inventory::Quota;
use crate::types::CandyKind;

/// Parameters fixed for the whole game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub name: String,
    pub description: String,
    pub group_size: usize,
    pub candies_per_player: usize,
    pub quota: Quota,
    pub time_limit_secs: u32,
    pub max_players: usize,
    pub exchange_period_ms: u64,
    pub random_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "classic".to_string(),
            description: "Seven groups of four, two of each candy per group".to_string(),
            group_size: 4,
            candies_per_player: 2,
            quota: Quota::uniform(2),
            time_limit_secs: 5 * 60,
            max_players: 28,
            exchange_period_ms: 100,
            random_seed: None,
        }
    }
}

impl GameConfig {
    pub fn exchange_period(&self) -> Duration {
        Duration::from_millis(self.exchange_period_ms)
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(u64::from(self.time_limit_secs))
    }

    /// Candies held between all members of one group.
    pub fn candies_per_group(&self) -> usize {
        self.group_size * self.candies_per_player
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.group_size < 2 {
            return Err(GameError::InvalidConfig(format!(
                "group size must be at least 2, got {}",
                self.group_size
            )));
        }
        if self.candies_per_player == 0 {
            return Err(GameError::InvalidConfig(
                "players must hold at least one candy".to_string(),
            ));
        }
        if self.quota.total() as usize > self.candies_per_group() {
            return Err(GameError::InvalidConfig(format!(
                "quota needs {} candies but a group only holds {}",
                self.quota.total(),
                self.candies_per_group()
            )));
        }
        if self.time_limit_secs == 0 {
            return Err(GameError::InvalidConfig(
                "time limit must be positive".to_string(),
            ));
        }
        if self.exchange_period_ms == 0 {
            return Err(GameError::InvalidConfig(
                "exchange period must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a `.yaml`/`.yml` or JSON file and validate it.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
            _ => serde_json::from_str(&contents)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let text = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            _ => serde_json::to_string_pretty(self)?,
        };
        std::fs::write(path, text)?;
        Ok(())
    }
}

impl fmt::Display for GameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Game: {}", self.name)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "  Group size: {}", self.group_size)?;
        writeln!(f, "  Candies per player: {}", self.candies_per_player)?;
        writeln!(f, "  Quota per group: {}", self.quota)?;
        writeln!(
            f,
            "  Time limit: {:02}:{:02}",
            self.time_limit_secs / 60,
            self.time_limit_secs % 60
        )?;
        writeln!(f, "  Max players: {}", self.max_players)?;
        write!(f, "  Exchange period: {} ms", self.exchange_period_ms)
    }
}

pub fn create_standard_presets() -> HashMap<String, GameConfig> {
    let mut presets = HashMap::new();

    presets.insert("classic".to_string(), GameConfig::default());

    let quick = GameConfig {
        name: "quick".to_string(),
        description: "Three groups and a one minute clock".to_string(),
        max_players: 12,
        time_limit_secs: 60,
        ..GameConfig::default()
    };
    presets.insert("quick".to_string(), quick);

    // Every candy a group holds is needed; there is no slack.
    let scarce = GameConfig {
        name: "scarce".to_string(),
        description: "Quota uses every candy the group holds".to_string(),
        quota: Quota::new([
            (CandyKind::Lemon, 3),
            (CandyKind::Pear, 3),
            (CandyKind::Egg, 2),
        ]),
        ..GameConfig::default()
    };
    presets.insert("scarce".to_string(), scarce);

    presets
}
