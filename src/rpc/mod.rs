//! RPC Request Handling Module
//!
//! Exposes the contact directory to clients. Each operation validates its input, runs as a
//! single atomic step against the repository, and reports missing entities as not-found
//! failures.
//!
//! ## Operations
//! - **Contacts**: `CreateNewContact`, `GetAllContacts`, `GetContact`, `UpdateContact`, `DeleteContact`.
//! - **Phone numbers**: `AddPhoneNumber`, `GetPhoneNumber`, `UpdatePhoneNumber`, `DeletePhoneNumber`.
//! - **Search**: `SearchContacts`, a paced stream of matching contacts that stops as soon as
//!   the caller goes away or the server shuts down.
//!
//! ## Submodules
//! - **`service`**: `ContactService`, the operation logic and the search filter.
//! - **`streams`**: Registry of live search streams and their cancellation tokens.
//! - **`protocol`**: Endpoints and wire DTOs.
//! - **`handlers`**: Axum handlers and the router.
//! - **`error`**: Conversion of directory failures into HTTP error responses.

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod service;
pub mod streams;
