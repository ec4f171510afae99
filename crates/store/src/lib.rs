//! Data store layer for campuscare-rs.
//!
//! The hosted document database is an external collaborator: this crate owns
//! the [`DataStore`] gateway trait describing the collection operations the
//! core depends on, the document shapes of the two persisted collections
//! (`users` and `complaints`), and typed repositories over the gateway. An
//! in-memory reference backend, [`MemoryStore`], stands in for the remote
//! store in tests and embedded use.

pub mod entities;
pub mod gateway;
pub mod memory;
pub mod repositories;

pub use gateway::{ChangeStream, DataStore, Document, Fields, StoreChange};
pub use memory::MemoryStore;
