//! # Togglekit Store
//!
//! Store gateway for the togglekit feature-toggle client.
//!
//! This crate defines the [`StoreGateway`] trait the cache core consumes, the
//! raw key-value node tree returned by the store, and [`EtcdStore`], an HTTP
//! client for the etcd v2 keys API.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod etcd;
pub mod gateway;
pub mod tree;

pub use error::*;
pub use etcd::*;
pub use gateway::*;
pub use tree::*;
