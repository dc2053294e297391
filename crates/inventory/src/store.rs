//! Ordered, file-persisted record store.
//!
//! Records are kept in insertion order and looked up by linear scan. Ids are
//! not required to be unique; every lookup resolves to the first match.

use stockfile_core::{DomainError, DomainResult, Entity, ItemId};

use crate::backend::{Backend, StorageError};
use crate::codec::{decode, encode};
use crate::record::Record;

/// When the store writes its records to the backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Durability {
    /// Save after every successful add/update/remove.
    #[default]
    EveryMutation,
    /// Save only on `commit`, `close`, or drop.
    OnExit,
}

/// Record store bound to one backend.
///
/// Opening loads the backend once. A store with unsaved changes saves itself
/// when dropped, so every exit path persists it; `close` is the same save
/// with the outcome returned to the caller.
#[derive(Debug)]
pub struct Store<B: Backend> {
    backend: B,
    records: Vec<Record>,
    durability: Durability,
    dirty: bool,
}

impl<B: Backend> Store<B> {
    /// Load every readable record from `backend`.
    ///
    /// Nothing stored yet means an empty store. A malformed or truncated tail
    /// is dropped and the records before it are kept.
    pub fn open(backend: B, durability: Durability) -> Result<Self, StorageError> {
        let records = match backend.load()? {
            None => Vec::new(),
            Some(contents) => {
                let decoded = decode(&contents);
                if let Some(err) = &decoded.error {
                    tracing::warn!(
                        error = %err,
                        kept = decoded.records.len(),
                        "ignoring unreadable data at end of inventory"
                    );
                }
                decoded.records
            }
        };

        tracing::info!(records = records.len(), ?durability, "inventory loaded");

        Ok(Self {
            backend,
            records,
            durability,
            dirty: false,
        })
    }

    /// True when in-memory records differ from what was last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.records.iter().position(|r| r.has_id(id))
    }

    /// Append a record. Duplicate ids are accepted.
    pub fn add(&mut self, record: Record) {
        if self.position(record.id()).is_some() {
            tracing::debug!(id = %record.id(), "adding record with an id already in use");
        }
        tracing::debug!(id = %record.id(), "record added");
        self.records.push(record);
        self.mutated();
    }

    /// Overwrite quantity and price of the first record with `id`.
    pub fn update(&mut self, id: ItemId, quantity: i64, unit_price: f64) -> DomainResult<&Record> {
        let idx = self.position(id).ok_or_else(DomainError::not_found)?;

        let record = &mut self.records[idx];
        record.set_quantity(quantity);
        record.set_unit_price(unit_price);
        tracing::debug!(%id, quantity, unit_price, "record updated");

        self.mutated();
        Ok(&self.records[idx])
    }

    /// Remove and return the first record with `id`; later records shift down.
    pub fn remove(&mut self, id: ItemId) -> DomainResult<Record> {
        let idx = self.position(id).ok_or_else(DomainError::not_found)?;
        let removed = self.records.remove(idx);
        tracing::debug!(%id, "record removed");

        self.mutated();
        Ok(removed)
    }

    /// First record with `id`.
    pub fn find(&self, id: ItemId) -> DomainResult<&Record> {
        self.records
            .iter()
            .find(|r| r.has_id(id))
            .ok_or_else(DomainError::not_found)
    }

    /// Traverse every record in order, or `None` when the store is empty.
    ///
    /// Each call starts a fresh traversal.
    pub fn list_all(&self) -> Option<Items<'_>> {
        if self.records.is_empty() {
            None
        } else {
            Some(Items(self.records.iter()))
        }
    }

    /// Write all records to the backend now.
    pub fn commit(&mut self) -> Result<(), StorageError> {
        self.backend.store(&encode(&self.records))?;
        self.dirty = false;
        tracing::debug!(records = self.records.len(), "inventory saved");
        Ok(())
    }

    /// Final save, reporting its outcome.
    ///
    /// The save is attempted once; a failure is returned, not retried on drop.
    pub fn close(mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        let result = self.commit();
        self.dirty = false;
        result
    }

    fn mutated(&mut self) {
        self.dirty = true;
        if self.durability == Durability::EveryMutation {
            if let Err(err) = self.commit() {
                tracing::error!(error = %err, "failed to save inventory; will retry on next save");
            }
        }
    }
}

impl<B: Backend> Drop for Store<B> {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(err) = self.commit() {
                tracing::error!(error = %err, "failed to save inventory on shutdown");
            }
        }
    }
}

/// One-shot traversal returned by [`Store::list_all`].
#[derive(Debug, Clone)]
pub struct Items<'a>(core::slice::Iter<'a, Record>);

impl<'a> Iterator for Items<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Items<'_> {}

impl core::iter::FusedIterator for Items<'_> {}
