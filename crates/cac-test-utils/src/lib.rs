//! Shared test utilities for the configuration-as-code workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`layer`]: [`TestLayer`] temporary storage roots with file assertions
//! - [`fixtures`]: tree and renderer constructors

pub mod fixtures;
pub mod layer;

pub use fixtures::{renderer, tree};
pub use layer::TestLayer;
