//! Face Profiler Contact Directory Library
//!
//! This library crate defines the modules that make up the contact directory service.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The service is composed as **RPC layer -> Directory**:
//!
//! - **`directory`**: The data layer. Owns contacts, their phone numbers and the id counters
//!   behind a single reader/writer lock, with no knowledge of the wire protocol.
//! - **`rpc`**: The request-handling layer. Implements every operation as one atomic step
//!   against the directory, maps missing entities to not-found failures, and serves the
//!   paced, cancellable search stream over HTTP/JSON.
//! - **`config`**: Command-line and environment configuration of the server.

pub mod config;
pub mod directory;
pub mod rpc;
