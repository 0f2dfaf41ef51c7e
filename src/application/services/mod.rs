//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (Transport) but are themselves
//! concrete structs, not traits.

mod tree_store;

pub use tree_store::{
    RequestKey, RequestStatus, StoreOptions, TreeStore, LOCALES_PATH, NODES_PATH, NODE_PATH,
};
