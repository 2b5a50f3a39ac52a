//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the reconciliation core and the outside
//! world: the fan-out channel, the cloud agent and the light driver.

pub mod cloud;
pub mod output;
pub mod publisher;

pub use cloud::CloudReporter;
pub use output::LightOutput;
pub use publisher::ChangePublisher;
