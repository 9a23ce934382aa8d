// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Object-partition semantics layered over the storage capability.
//!
//! This is where the gateway's naming rules live: per-partition uniqueness,
//! conflict-safe rename and share, and the copy-then-delete composition with
//! its partial-failure policy. The backend supplies the atomic conditional
//! primitives; this layer never does a check-then-act of its own.
//!
//! ## Partial-failure policy for rename/share
//!
//! Both operations are link-then-delete. When the link succeeds but the
//! source delete fails, the fresh link is removed again and the operation
//! fails with a store inconsistency error. A successful call therefore never
//! leaves the identifier present in both places, and a failed call leaves the
//! source untouched (or reports the inconsistency if even the rollback
//! failed).

use std::io::Read;
use std::sync::Arc;

use super::backend::{ObjectKey, ObjectMeta, Partition, PartitionFilter, StoreBackend, StoreError};

/// The private/public namespace manager.
#[derive(Clone)]
pub struct ObjectPartition {
    backend: Arc<dyn StoreBackend>,
}

impl ObjectPartition {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    /// Store a new object. Fails with `AlreadyExists` if the identifier is
    /// taken in the target partition; the same identifier in the other
    /// partition is unaffected.
    pub fn put(
        &self,
        identifier: &str,
        partition: Partition,
        data: &mut dyn Read,
    ) -> Result<ObjectMeta, StoreError> {
        validate_identifier(identifier)?;
        let key = ObjectKey::new(identifier, partition);
        let size = self.backend.create(&key, data)?;
        Ok(ObjectMeta {
            identifier: identifier.to_string(),
            partition,
            size,
        })
    }

    /// List objects, optionally filtered to one partition. Output is sorted
    /// by identifier (then partition) so a single call is stable.
    pub fn list(&self, filter: PartitionFilter) -> Result<Vec<ObjectMeta>, StoreError> {
        let mut objects = match filter {
            PartitionFilter::Private => self.backend.list(Partition::Private)?,
            PartitionFilter::Public => self.backend.list(Partition::Public)?,
            PartitionFilter::Both => {
                let mut all = self.backend.list(Partition::Private)?;
                all.extend(self.backend.list(Partition::Public)?);
                all
            }
        };
        objects.sort_by(|a, b| {
            a.identifier
                .cmp(&b.identifier)
                .then(a.partition.cmp(&b.partition))
        });
        Ok(objects)
    }

    /// Metadata without the body, for HEAD-style checks.
    pub fn stat(&self, identifier: &str, partition: Partition) -> Result<ObjectMeta, StoreError> {
        validate_identifier(identifier)?;
        self.backend.stat(&ObjectKey::new(identifier, partition))
    }

    /// Open an object for incremental reading, together with its metadata.
    pub fn open(
        &self,
        identifier: &str,
        partition: Partition,
    ) -> Result<(ObjectMeta, Box<dyn Read + Send>), StoreError> {
        validate_identifier(identifier)?;
        let key = ObjectKey::new(identifier, partition);
        let meta = self.backend.stat(&key)?;
        let reader = self.backend.open(&key)?;
        Ok((meta, reader))
    }

    /// Change an object's identifier within its partition.
    ///
    /// Renaming an object to its own name is a success no-op (provided the
    /// object exists). The conflict check on the new identifier is atomic
    /// via the backend's `link`.
    pub fn rename(
        &self,
        identifier: &str,
        partition: Partition,
        new_identifier: &str,
    ) -> Result<ObjectMeta, StoreError> {
        validate_identifier(identifier)?;
        validate_identifier(new_identifier)?;

        if identifier == new_identifier {
            return self.backend.stat(&ObjectKey::new(identifier, partition));
        }

        let from = ObjectKey::new(identifier, partition);
        let to = ObjectKey::new(new_identifier, partition);
        self.relocate(&from, &to)
    }

    /// Move an object to the other partition, preserving its identifier.
    /// Fails with `AlreadyExists` if the destination partition already holds
    /// that identifier; never silently overwrites.
    pub fn share(
        &self,
        identifier: &str,
        from_partition: Partition,
    ) -> Result<ObjectMeta, StoreError> {
        validate_identifier(identifier)?;
        let from = ObjectKey::new(identifier, from_partition);
        let to = ObjectKey::new(identifier, from_partition.other());
        self.relocate(&from, &to)
    }

    /// Remove an object from its partition.
    pub fn delete(&self, identifier: &str, partition: Partition) -> Result<(), StoreError> {
        validate_identifier(identifier)?;
        self.backend.delete(&ObjectKey::new(identifier, partition))
    }

    /// Link-then-delete with rollback on a failed delete.
    fn relocate(&self, from: &ObjectKey, to: &ObjectKey) -> Result<ObjectMeta, StoreError> {
        self.backend.link(from, to)?;

        if let Err(delete_err) = self.backend.delete(from) {
            tracing::error!(
                identifier = %from.identifier,
                error = %delete_err,
                "source delete failed after link; rolling back"
            );
            return match self.backend.delete(to) {
                Ok(()) => Err(StoreError::Inconsistent(format!(
                    "relocation of '{}' aborted: source delete failed, copy rolled back",
                    from.identifier
                ))),
                Err(rollback_err) => {
                    tracing::error!(
                        identifier = %from.identifier,
                        error = %rollback_err,
                        "rollback failed; identifier now exists in both locations"
                    );
                    Err(StoreError::Inconsistent(format!(
                        "relocation of '{}' left two copies behind",
                        from.identifier
                    )))
                }
            };
        }

        self.backend.stat(to)
    }
}

/// Identifiers are flat names within a partition: non-empty, no path
/// separators, no dot components, and within a sane length bound.
fn validate_identifier(identifier: &str) -> Result<(), StoreError> {
    if identifier.is_empty()
        || identifier.len() > 255
        || identifier == "."
        || identifier == ".."
        || identifier.contains('/')
        || identifier.contains('\\')
        || identifier.contains('\0')
    {
        return Err(StoreError::InvalidIdentifier);
    }
    Ok(())
}
