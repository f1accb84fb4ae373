pub mod error;
pub mod macros;
pub mod structs;

pub use error::{ConfigError, Result, SimError};
pub use structs::BuildingSnapshot;
pub use structs::Direction;
pub use structs::Location;
pub use structs::Passenger;
pub use structs::PassengerId;
pub use structs::Rider;
pub use structs::{TripEvent, TripKind};
