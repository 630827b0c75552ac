//! Contact Directory Module
//!
//! The data layer of the service. It owns the contact records, their nested phone numbers
//! and the id counters, and knows nothing about how requests arrive.
//!
//! ## Core Concepts
//! - **Contacts**: Profile records (tenant, user, address, email, face data) identified by a
//!   monotonically allocated `ContactId`.
//! - **Phone numbers**: Typed entries owned by exactly one contact. Their `NumberId` is
//!   allocated from a single directory-wide counter.
//! - **Locking**: One reader/writer lock guards the whole store, so each operation performed
//!   under a guard is atomic.
//!
//! ## Submodules
//! - **`types`**: Domain types (`Contact`, `PhoneNumber`, ids, `ContactFields`).
//! - **`repository`**: `ContactStore` and its lock-guarded handle `ContactRepository`.
//! - **`error`**: `DirectoryError`, the not-found failures raised by operations.

pub mod error;
pub mod repository;
pub mod types;
