// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! The storage capability the gateway is built against, and its filesystem
//! implementation.
//!
//! The [`StoreBackend`] trait models the durable provider as a small set of
//! flat-key operations. The two conditional primitives carry the concurrency
//! story: [`StoreBackend::create`] fails if the key already exists, and
//! [`StoreBackend::link`] fails if the destination already exists. Every
//! conflict check in the gateway is expressed through one of these two, never
//! as a separate existence probe followed by a write.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::paths::StoragePaths;

/// One of the two disjoint object namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Private,
    Public,
}

impl Partition {
    pub fn as_str(self) -> &'static str {
        match self {
            Partition::Private => "private",
            Partition::Public => "public",
        }
    }

    /// The opposite partition; `share` moves objects across this boundary.
    pub fn other(self) -> Self {
        match self {
            Partition::Private => Partition::Public,
            Partition::Public => Partition::Private,
        }
    }
}

/// Listing filter: one partition or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PartitionFilter {
    Private,
    Public,
    #[default]
    Both,
}

/// Address of an object: identifier plus the partition it lives in.
/// Uniqueness is per partition; the same identifier may exist in both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey {
    pub identifier: String,
    pub partition: Partition,
}

impl ObjectKey {
    pub fn new(identifier: impl Into<String>, partition: Partition) -> Self {
        Self {
            identifier: identifier.into(),
            partition,
        }
    }
}

/// Name and size of a stored object. The store keeps no other metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ObjectMeta {
    pub identifier: String,
    pub partition: Partition,
    pub size: u64,
}

/// Errors from the storage capability.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found")]
    NotFound,
    #[error("object already exists")]
    AlreadyExists,
    #[error("invalid object identifier")]
    InvalidIdentifier,
    /// Copy-then-delete left the namespace in a state the gateway could not
    /// roll back. Surfaced to the caller rather than hidden.
    #[error("store inconsistency: {0}")]
    Inconsistent(String),
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound,
            io::ErrorKind::AlreadyExists => StoreError::AlreadyExists,
            _ => StoreError::Io(e),
        }
    }
}

/// The capability contract with the durable store.
///
/// No transactional multi-key operations are assumed; rename and share are
/// composed from `link` + `delete` by the partition layer above.
pub trait StoreBackend: Send + Sync {
    /// Write a new object, failing with `AlreadyExists` if the key is taken.
    /// The existence check and the write are one atomic operation. Returns
    /// the number of bytes written.
    fn create(&self, key: &ObjectKey, data: &mut dyn Read) -> Result<u64, StoreError>;

    /// Open an object for incremental reading.
    fn open(&self, key: &ObjectKey) -> Result<Box<dyn Read + Send>, StoreError>;

    /// Metadata without transferring the body.
    fn stat(&self, key: &ObjectKey) -> Result<ObjectMeta, StoreError>;

    /// Make the object readable under a second key without copying bytes,
    /// failing with `AlreadyExists` if the destination key is taken. This is
    /// the copy half of rename/share.
    fn link(&self, from: &ObjectKey, to: &ObjectKey) -> Result<(), StoreError>;

    /// Remove an object.
    fn delete(&self, key: &ObjectKey) -> Result<(), StoreError>;

    /// All objects in one partition. Ordering is unspecified here; the
    /// partition layer sorts for stable output.
    fn list(&self, partition: Partition) -> Result<Vec<ObjectMeta>, StoreError>;
}

/// Filesystem-backed store.
///
/// `create` uses `O_CREAT|O_EXCL` and `link` uses `hard_link`, both atomic
/// conditional operations at the filesystem level, so concurrent requests
/// touching the same identifier resolve to exactly one winner.
#[derive(Debug, Clone)]
pub struct FsBackend {
    paths: StoragePaths,
}

impl FsBackend {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    /// Create both partition directories. Idempotent.
    pub fn initialize(&self) -> Result<(), StoreError> {
        fs::create_dir_all(self.paths.partition_dir(Partition::Private))?;
        fs::create_dir_all(self.paths.partition_dir(Partition::Public))?;
        Ok(())
    }

    /// Write-read-delete probe used by the health endpoint.
    pub fn health_check(&self) -> Result<(), StoreError> {
        let probe = self.paths.root().join(".health_check");
        fs::write(&probe, b"ok")?;
        let read = fs::read(&probe)?;
        fs::remove_file(&probe)?;
        if read != b"ok" {
            return Err(StoreError::Inconsistent(
                "health probe read back wrong data".to_string(),
            ));
        }
        Ok(())
    }
}

impl StoreBackend for FsBackend {
    fn create(&self, key: &ObjectKey, data: &mut dyn Read) -> Result<u64, StoreError> {
        let path = self.paths.object(&key.identifier, key.partition);

        // create_new is the atomic create-if-absent primitive.
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;

        let mut writer = BufWriter::new(file);
        let size = match io::copy(data, &mut writer).and_then(|n| writer.flush().map(|_| n)) {
            Ok(n) => n,
            Err(e) => {
                // A partial object must not survive as a phantom conflict.
                let _ = fs::remove_file(&path);
                return Err(StoreError::Io(e));
            }
        };
        Ok(size)
    }

    fn open(&self, key: &ObjectKey) -> Result<Box<dyn Read + Send>, StoreError> {
        let file = File::open(self.paths.object(&key.identifier, key.partition))?;
        Ok(Box::new(file))
    }

    fn stat(&self, key: &ObjectKey) -> Result<ObjectMeta, StoreError> {
        let meta = fs::metadata(self.paths.object(&key.identifier, key.partition))?;
        if !meta.is_file() {
            return Err(StoreError::NotFound);
        }
        Ok(ObjectMeta {
            identifier: key.identifier.clone(),
            partition: key.partition,
            size: meta.len(),
        })
    }

    fn link(&self, from: &ObjectKey, to: &ObjectKey) -> Result<(), StoreError> {
        fs::hard_link(
            self.paths.object(&from.identifier, from.partition),
            self.paths.object(&to.identifier, to.partition),
        )?;
        Ok(())
    }

    fn delete(&self, key: &ObjectKey) -> Result<(), StoreError> {
        fs::remove_file(self.paths.object(&key.identifier, key.partition))?;
        Ok(())
    }

    fn list(&self, partition: Partition) -> Result<Vec<ObjectMeta>, StoreError> {
        let dir = self.paths.partition_dir(partition);
        let mut objects = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            let Some(identifier) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            objects.push(ObjectMeta {
                identifier,
                partition,
                size: meta.len(),
            });
        }
        Ok(objects)
    }
}
