// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-terminus PDR repository.
//!
//! [`RepositoryStore`] is an immutable-once-published, handle-ordered set of
//! records. [`SharedRepository`] publishes it to readers:
//!
//! - **Single writer**: only a successful acquisition replaces the store
//! - **Atomic swap**: `ArcSwap` exchanges the whole store in one step
//! - **Snapshot reads**: readers hold an `Arc` to a complete store and never
//!   observe a partially built one

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::builder::{RawRecord, RecordBatch};
use crate::pdr::{record_type, valid_terminus_locator_tid};
use crate::repo_info::RepositoryInfo;
use crate::{RecordHandle, Tid};

/// PDR catalog of one terminus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryStore {
    tid: Tid,
    /// Repository info the records were fetched under.
    info: Option<RepositoryInfo>,
    records: BTreeMap<RecordHandle, RawRecord>,
}

impl RepositoryStore {
    /// Empty store for `tid`.
    pub fn new(tid: Tid) -> Self {
        Self {
            tid,
            info: None,
            records: BTreeMap::new(),
        }
    }

    /// Store holding every record of `batch`.
    pub fn from_batch(tid: Tid, info: RepositoryInfo, batch: RecordBatch) -> Self {
        let mut store = Self::new(tid);
        store.info = Some(info);
        for (handle, record) in batch {
            store.add(handle, record);
        }
        store
    }

    /// Add a record, replacing any record with the same handle.
    pub fn add(&mut self, handle: RecordHandle, record: RawRecord) -> Option<RawRecord> {
        self.records.insert(handle, record)
    }

    #[inline]
    pub fn tid(&self) -> Tid {
        self.tid
    }

    /// Repository info from the acquisition that built this store.
    pub fn info(&self) -> Option<&RepositoryInfo> {
        self.info.as_ref()
    }

    pub fn record_count(&self) -> u32 {
        self.records.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total bytes held across all records.
    pub fn repository_size(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn get(&self, handle: RecordHandle) -> Option<&[u8]> {
        self.records.get(&handle).map(Vec::as_slice)
    }

    pub fn contains(&self, handle: RecordHandle) -> bool {
        self.records.contains_key(&handle)
    }

    /// Records in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordHandle, &[u8])> {
        self.records.iter().map(|(&h, r)| (h, r.as_slice()))
    }

    /// Lowest handle in the store.
    pub fn first_handle(&self) -> Option<RecordHandle> {
        self.records.keys().next().copied()
    }

    /// Handle following `handle`, for GetPDR-style traversal.
    pub fn next_handle(&self, handle: RecordHandle) -> Option<RecordHandle> {
        use std::ops::Bound::{Excluded, Unbounded};
        self.records
            .range((Excluded(handle), Unbounded))
            .next()
            .map(|(&h, _)| h)
    }

    /// Records of PDR type `pdr_type`, in handle order.
    pub fn find_by_type(&self, pdr_type: u8) -> impl Iterator<Item = (RecordHandle, &[u8])> {
        self.iter()
            .filter(move |(_, record)| record_type(record) == Some(pdr_type))
    }

    /// Handle and TID of the valid Terminus Locator PDR, if any.
    pub fn terminus_locator(&self) -> Option<(RecordHandle, Tid)> {
        self.iter()
            .find_map(|(handle, record)| valid_terminus_locator_tid(record).map(|tid| (handle, tid)))
    }
}

/// Published repository of one terminus.
#[derive(Debug)]
pub struct SharedRepository {
    inner: ArcSwap<RepositoryStore>,
}

impl SharedRepository {
    /// Start with an empty store for `tid`.
    pub fn new(tid: Tid) -> Self {
        Self {
            inner: ArcSwap::from_pointee(RepositoryStore::new(tid)),
        }
    }

    /// Snapshot of the current store.
    pub fn load(&self) -> Arc<RepositoryStore> {
        self.inner.load_full()
    }

    /// Publish `store`, returning the one it replaced.
    pub fn replace(&self, store: RepositoryStore) -> Arc<RepositoryStore> {
        self.inner.swap(Arc::new(store))
    }
}
