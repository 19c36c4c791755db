use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub local_user_id: String,
    pub enabled: bool,
    pub reply_delay_ms: u64,
    pub min_replies: usize,
    pub max_replies: usize,
    pub timestamp_step_ms: u64,
    pub max_post_chars: usize,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            local_user_id: "1".to_string(),
            enabled: true,
            reply_delay_ms: 200,
            min_replies: 1,
            max_replies: 3,
            timestamp_step_ms: 100,
            max_post_chars: 280,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                EngineConfig::default()
            }
        } else {
            EngineConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(enabled) = env::var("ENGAGEMENT_ENABLED") {
            match enabled.trim().to_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => self.enabled = true,
                "0" | "false" | "off" | "no" => self.enabled = false,
                _ => {}
            }
        }
        if let Ok(delay) = env::var("ENGAGEMENT_DELAY_MS") {
            if let Ok(value) = delay.parse::<u64>() {
                self.reply_delay_ms = value;
            }
        }
        if let Ok(seed) = env::var("ENGAGEMENT_SEED") {
            if let Ok(value) = seed.parse::<u64>() {
                self.seed = Some(value);
            }
        }
        if let Ok(user_id) = env::var("LOCAL_USER_ID") {
            if !user_id.trim().is_empty() {
                self.local_user_id = user_id;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ENGINE_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/engine.toml")))
}

