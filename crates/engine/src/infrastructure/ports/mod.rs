//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Record storage (in-memory today, swappable for a database)
//! - Portrait blob storage (filesystem today)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::*;

// =============================================================================
// External Storage Ports
// =============================================================================
pub use external::PortraitStore;
#[cfg(test)]
pub use external::MockPortraitStore;

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};
#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Errors
// =============================================================================
pub use error::{BlobError, RepoError};
