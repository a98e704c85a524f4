//! Configuration flattening for flatconf.
//!
//! This crate handles:
//! - Loading YAML, JSON and KDL documents into a `Node` tree
//! - Flattening the tree into dotted keys
//! - `$(name)` interpolation against earlier keys
//! - Key filtering and rewriting
//! - Driving the flatten, resolve and publish pipeline

pub mod document;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod interpolate;
pub mod pipeline;

pub use document::Format;
pub use error::{ConfigError, ConfigResult};
pub use filter::{KeyFilter, KeyMatch, filter_and_rewrite};
pub use flatten::{FlatEntry, FlatValue, Flatten, flatten};
pub use interpolate::{ResolvedMapping, interpolate, resolve};
pub use pipeline::{publish, published_entries, resolve_document};
