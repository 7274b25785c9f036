pub mod container;
pub mod identity;
pub mod registry;
pub mod telemetry;
