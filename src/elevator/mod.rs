pub mod car;
pub mod driver;
mod driver_tests;

pub use car::{Car, CarState};
pub use driver::ElevatorDriver;
