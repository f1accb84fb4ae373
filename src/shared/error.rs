/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use super::structs::PassengerId;

/***************************************/
/*            Error types              */
/***************************************/
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Contract violations and lifecycle failures of the simulation core.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Cannot build the simulation: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid passenger {id}: {reason}")]
    InvalidPassenger { id: PassengerId, reason: String },

    #[error("Passenger {0} is already registered")]
    DuplicatePassenger(PassengerId),

    #[error("Passenger {id} is not waiting at floor {floor}")]
    NotWaiting { id: PassengerId, floor: u8 },

    #[error("Passenger {0} is not on board")]
    NotOnboard(PassengerId),

    #[error("Car is full ({capacity} occupants), passenger {id} cannot board")]
    CapacityExceeded { id: PassengerId, capacity: usize },

    #[error("Elevator shut down before passenger {0} finished the trip")]
    ShutDown(PassengerId),

    #[error("Registry invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Thread {0} panicked")]
    TaskPanicked(String),

    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
