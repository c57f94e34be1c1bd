//! # Togglekit
//!
//! Polling feature-toggle client backed by an etcd key-value tree.
//!
//! A [`ToggleClient`] fetches the toggle tree for one application from the
//! store, flattens it into an immutable [`FlagSnapshot`], and serves
//! lock-free boolean lookups while a background task refreshes the snapshot
//! on a fixed interval.
//!
//! ```no_run
//! # async fn demo() -> Result<(), togglekit::ClientError> {
//! let client = togglekit::ToggleClient::new(
//!     vec!["http://127.0.0.1:2379".to_string()],
//!     "checkout",
//!     30,
//! )?;
//! client.initialise().await?;
//!
//! if client.get_or_default("new-payment-flow", false) {
//!     // take the new path
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod snapshot;

pub use client::{RefreshOutcome, ToggleClient};
pub use error::{ClientError, ClientResult};
pub use snapshot::{parse_tree, parse_value, FlagSnapshot, SnapshotCache};

// Re-export the pieces callers need to construct or fake a gateway.
pub use togglekit_common::{AppName, InvalidAppName};
pub use togglekit_store::{EtcdStore, Node, StoreError, StoreGateway};
