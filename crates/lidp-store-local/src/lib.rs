//! # lidp-store-local
//!
//! Local durable expiring store for lite-idp, backed by redb.
//!
//! Entries live in a single database file with two tables: one for payloads
//! and one for each key's absolute expiry. Both are written in the same
//! transaction, and reads consult the expiry before touching the payload.
//!
//! Expired entries are never swept. They stay on disk until the same key is
//! written again, so the file grows with the number of sessions ever issued.
//! Operators running this backend under heavy use should plan for that or
//! switch to the networked backend.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod store;

pub use store::{LocalStore, DEFAULT_PATH};
