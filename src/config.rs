// Configuration module for reading Simulator.toml
// This module provides OOP-style configuration management for the simulator

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::rules::Settings;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub simulation: SimulationConfig,
    pub settings: SettingsConfig,
    pub debug: DebugConfig,
}

/// HTTP listener settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub body_limit_bytes: usize,
}

/// Which ruleset and map every request is simulated with
#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    pub ruleset: String,
    pub map: String,
    /// Fixed random seed; drawn at startup when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Game parameters handed to the ruleset and map
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    pub food_spawn_chance: i32,
    pub minimum_food: i32,
    pub hazard_damage_per_turn: i32,
    pub shrink_every_n_turns: i32,
}

impl SettingsConfig {
    /// Combines these parameters with a concrete seed
    pub fn to_settings(&self, seed: u64) -> Settings {
        Settings {
            food_spawn_chance: self.food_spawn_chance,
            minimum_food: self.minimum_food,
            hazard_damage_per_turn: self.hazard_damage_per_turn,
            shrink_every_n_turns: self.shrink_every_n_turns,
            seed,
        }
    }
}

/// Journal configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Simulator.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Simulator.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Simulator.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in Simulator.toml
    pub fn default_hardcoded() -> Self {
        let settings = Settings::default();
        Config {
            server: ServerConfig {
                address: "0.0.0.0".to_string(),
                port: 8090,
                body_limit_bytes: 1024 * 1024,
            },
            simulation: SimulationConfig {
                ruleset: crate::rules::STANDARD.to_string(),
                map: crate::maps::STANDARD.to_string(),
                seed: None,
            },
            settings: SettingsConfig {
                food_spawn_chance: settings.food_spawn_chance,
                minimum_food: settings.minimum_food,
                hazard_damage_per_turn: settings.hazard_damage_per_turn,
                shrink_every_n_turns: settings.shrink_every_n_turns,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "simulations.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Simulator.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_toml_can_be_parsed() {
        let result = Config::from_file("Simulator.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Simulator.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_file_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Simulator.toml").expect("Simulator.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        assert_eq!(file_config.server.port, hardcoded_config.server.port);
        assert_eq!(
            file_config.server.body_limit_bytes,
            hardcoded_config.server.body_limit_bytes
        );
        assert_eq!(file_config.simulation.ruleset, hardcoded_config.simulation.ruleset);
        assert_eq!(file_config.simulation.map, hardcoded_config.simulation.map);
        assert_eq!(file_config.simulation.seed, hardcoded_config.simulation.seed);
        assert_eq!(
            file_config.settings.to_settings(0),
            hardcoded_config.settings.to_settings(0)
        );
        assert_eq!(file_config.debug.enabled, hardcoded_config.debug.enabled);
    }

    #[test]
    fn test_configured_names_are_registered() {
        let config = Config::from_file("Simulator.toml").expect("Simulator.toml should be parseable");
        assert!(crate::rules::RULESET_NAMES.contains(&config.simulation.ruleset.as_str()));
        assert!(crate::maps::MAP_NAMES.contains(&config.simulation.map.as_str()));
    }

    #[test]
    fn test_seed_is_optional() {
        let config: Config = toml::from_str(
            r#"
            [server]
            address = "127.0.0.1"
            port = 9000
            body_limit_bytes = 10

            [simulation]
            ruleset = "solo"
            map = "empty"
            seed = 42

            [settings]
            food_spawn_chance = 0
            minimum_food = 0
            hazard_damage_per_turn = 100
            shrink_every_n_turns = 5

            [debug]
            enabled = false
            log_file_path = "x.jsonl"
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.settings.to_settings(42).hazard_damage_per_turn, 100);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
