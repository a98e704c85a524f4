//! Core types for flatconf.
//!
//! This crate contains:
//! - The parsed document tree (`Node`, `Scalar`)
//! - Published entries and environment-variable naming
//! - The `Publisher` trait implemented by output backends
//! - The entitlement check seam

pub mod entitlement;
pub mod entry;
pub mod error;
pub mod node;
pub mod publisher;

pub use entitlement::{Entitlement, EntitlementCheck};
pub use entry::{PublishedEntry, env_var_name};
pub use error::{Error, Result};
pub use node::{Node, Scalar};
pub use publisher::{MemoryPublisher, Publisher};
