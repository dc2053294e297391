//! Inventory record store.
//!
//! This crate owns the stock `Record` type, its four-line text encoding, the
//! storage seam (`Backend`) and the `Store` that keeps records in insertion
//! order and persists them according to a `Durability` policy.

pub mod backend;
pub mod codec;
pub mod record;
pub mod store;

pub use backend::{Backend, FileBackend, InMemoryBackend, StorageError};
pub use codec::{CodecError, Decoded, RecordReader, decode, encode, write_record};
pub use record::Record;
pub use store::{Durability, Items, Store};
