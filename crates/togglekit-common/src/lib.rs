//! # Togglekit Common
//!
//! Shared types and path helpers for the togglekit feature-toggle client.
//!
//! This crate provides the validated application-name newtype and the store
//! path conventions used by the other crates in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod paths;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use paths::*;
pub use types::*;
