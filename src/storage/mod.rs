// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Partitioned object storage: the backend capability and the namespace
//! semantics built on top of it.

pub mod backend;
pub mod partition;
pub mod paths;

pub use backend::{
    FsBackend, ObjectKey, ObjectMeta, Partition, PartitionFilter, StoreBackend, StoreError,
};
pub use partition::ObjectPartition;
pub use paths::StoragePaths;
