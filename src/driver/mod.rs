//! Radio driver abstraction layer

pub mod radio_driver;
pub mod sim_driver;

pub use radio_driver::{RadioDriver, ScanCallback, ScanOutcome};
pub use sim_driver::{DriverOp, ScanBehavior, SimEnvironment, SimNetwork, SimulatedRadio};
