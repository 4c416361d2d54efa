pub mod entitlement;
pub mod fallback;
pub mod library;
pub mod look_generator;
pub mod profile;
pub mod providers;

pub use entitlement::{EntitlementGate, EntitlementOracle, StaticEntitlements};
pub use library::LookLibrary;
pub use look_generator::{FallbackReason, Generation, LookGenerator, LookSource};
pub use profile::ProfileService;
