/***************************************/
/*        3rd party libraries          */
/***************************************/
use clap::{Arg, ArgMatches, Command};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub building: BuildingConfig,
    pub passengers: PassengerConfig,
    pub display: DisplayConfig,
}

/**
 * Fixed properties of the building for one run.
 *
 * # Fields
 * - `total_levels`:    Number of floors, the car sweeps `0..=total_levels - 1`.
 * - `max_capacity`:    Number of passengers the car may hold at once.
 * - `move_duration`:   Milliseconds the car needs to travel one floor.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BuildingConfig {
    pub total_levels: u8,
    pub max_capacity: usize,
    pub move_duration: u64,
}

impl BuildingConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.move_duration)
    }

    pub fn top_floor(&self) -> u8 {
        self.total_levels - 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_levels < 2 {
            return Err(ConfigError::invalid(
                "building.total_levels",
                "the car needs at least two floors to travel between",
            ));
        }
        if self.max_capacity == 0 {
            return Err(ConfigError::invalid(
                "building.max_capacity",
                "must admit at least one passenger",
            ));
        }
        if self.move_duration == 0 {
            return Err(ConfigError::invalid(
                "building.move_duration",
                "must be at least one millisecond",
            ));
        }
        Ok(())
    }
}

impl Default for BuildingConfig {
    fn default() -> Self {
        BuildingConfig {
            total_levels: 10,
            max_capacity: 3,
            move_duration: 2000,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PassengerConfig {
    pub count: usize,
    pub seed: Option<u64>,
}

impl Default for PassengerConfig {
    fn default() -> Self {
        PassengerConfig {
            count: 10,
            seed: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Text,
    Json,
    Off,
}

impl FromStr for DisplayMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(DisplayMode::Text),
            "json" => Ok(DisplayMode::Json),
            "off" => Ok(DisplayMode::Off),
            other => Err(ConfigError::invalid(
                "display.mode",
                format!("unknown mode '{}', expected text, json or off", other),
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
}

/// Values given on the command line. Anything set here wins over the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub passengers: Option<usize>,
    pub seed: Option<u64>,
    pub move_duration: Option<u64>,
    pub display: Option<DisplayMode>,
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn cli() -> Command<'static> {
    Command::new("elevator-sim")
        .about("Simulates a single elevator car shared by concurrent passengers")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .takes_value(true)
                .value_name("PATH")
                .default_value(DEFAULT_CONFIG_PATH)
                .help("Path to the TOML configuration file"),
        )
        .arg(
            Arg::new("passengers")
                .long("passengers")
                .short('n')
                .takes_value(true)
                .value_name("COUNT")
                .help("Number of passengers to generate"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .takes_value(true)
                .value_name("SEED")
                .help("Seed for reproducible passenger generation"),
        )
        .arg(
            Arg::new("move-duration")
                .long("move-duration")
                .takes_value(true)
                .value_name("MS")
                .help("Milliseconds the car needs to travel one floor"),
        )
        .arg(
            Arg::new("display")
                .long("display")
                .takes_value(true)
                .value_name("MODE")
                .possible_values(["text", "json", "off"])
                .help("How the building is rendered"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log passenger transitions at debug level"),
        )
}

pub fn overrides_from_matches(matches: &ArgMatches) -> Result<Overrides, ConfigError> {
    Ok(Overrides {
        passengers: parse_arg(matches, "passengers")?,
        seed: parse_arg(matches, "seed")?,
        move_duration: parse_arg(matches, "move-duration")?,
        display: matches
            .value_of("display")
            .map(DisplayMode::from_str)
            .transpose()?,
    })
}

/// Reads the configuration file, falling back to the defaults if it does not exist.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        warn!(
            "Configuration file {} not found, using default settings",
            path.display()
        );
        return Ok(Config::default());
    }

    let config_str = fs::read_to_string(path)?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(config_str)?)
}

impl Config {
    pub fn with_overrides(mut self, overrides: &Overrides) -> Config {
        if let Some(count) = overrides.passengers {
            self.passengers.count = count;
        }
        if let Some(seed) = overrides.seed {
            self.passengers.seed = Some(seed);
        }
        if let Some(move_duration) = overrides.move_duration {
            self.building.move_duration = move_duration;
        }
        if let Some(mode) = overrides.display {
            self.display.mode = mode;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.building.validate()
    }
}

/***************************************/
/*          Private functions          */
/***************************************/
fn parse_arg<T: FromStr>(matches: &ArgMatches, name: &'static str) -> Result<Option<T>, ConfigError> {
    match matches.value_of(name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::invalid(name, format!("'{}' is not a valid number", raw))),
        None => Ok(None),
    }
}
