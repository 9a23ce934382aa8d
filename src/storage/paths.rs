// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Path layout for the filesystem-backed object store.
//!
//! Each partition is a flat directory under the store root; an object key
//! `(identifier, partition)` maps to `<root>/<partition>/<identifier>`.

use std::path::{Path, PathBuf};

use super::Partition;

/// Path utilities for the partitioned store layout.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one partition's objects.
    pub fn partition_dir(&self, partition: Partition) -> PathBuf {
        self.root.join(partition.as_str())
    }

    /// Path of a single object. The identifier must already be validated as
    /// a flat name (no separators, no dot components).
    pub fn object(&self, identifier: &str, partition: Partition) -> PathBuf {
        self.partition_dir(partition).join(identifier)
    }
}
