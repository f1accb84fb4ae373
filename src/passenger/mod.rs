pub mod generator;
pub mod task;
mod task_tests;

pub use generator::PassengerGenerator;
pub use task::PassengerTask;
