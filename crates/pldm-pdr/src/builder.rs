// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Repository walk: fetch every record by following the peer's handle chain.
//!
//! The walk starts at handle 0 ("first record") and follows each
//! `next_record_handle` until the peer returns 0. Two independent limits
//! also end it: the record count the peer declared, and the configured
//! `max_record_handles` chain length. A handle seen earlier in the same walk
//! ends it as well, since following it would only repeat records.
//!
//! Any record failure fails the whole walk; there is no partial batch.

use std::collections::{BTreeMap, HashSet};

use crate::error::{Error, Result};
use crate::pdr::PdrHeader;
use crate::requester::Requester;
use crate::transfer::fetch_record;
use crate::transport::Transport;
use crate::RecordHandle;

/// Bytes of one reassembled PDR.
pub type RawRecord = Vec<u8>;

/// Records fetched in one acquisition pass, not yet committed.
pub type RecordBatch = BTreeMap<RecordHandle, RawRecord>;

/// Why the handle walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// Peer returned next handle 0.
    EndOfChain,
    /// As many records as the peer declared have been fetched.
    RecordCountReached,
    /// Configured chain length reached.
    ChainLimitReached,
    /// Peer pointed back at a handle already fetched.
    Cycle(RecordHandle),
}

/// Limits on one repository walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Record count from the repository info.
    pub record_count_hint: u32,
    /// Longest handle chain to follow.
    pub max_record_handles: u32,
}

impl WalkLimits {
    /// Check the limits after `consumed` records, given the next handle.
    fn check(&self, consumed: u32, next: RecordHandle, visited: &HashSet<RecordHandle>) -> Option<WalkEnd> {
        if next == 0 {
            Some(WalkEnd::EndOfChain)
        } else if consumed >= self.record_count_hint {
            Some(WalkEnd::RecordCountReached)
        } else if consumed >= self.max_record_handles {
            Some(WalkEnd::ChainLimitReached)
        } else if visited.contains(&next) {
            Some(WalkEnd::Cycle(next))
        } else {
            None
        }
    }
}

/// Fetch the peer's records into a fresh batch.
pub async fn build_batch<T: Transport>(
    requester: &Requester<'_, T>,
    record_count_hint: u32,
    largest_record_size: u32,
) -> Result<RecordBatch> {
    let tid = requester.tid();
    let limits = WalkLimits {
        record_count_hint,
        max_record_handles: requester.config().max_record_handles,
    };

    let mut batch = RecordBatch::new();
    // first record when its header carries no handle either
    let mut unkeyed: Option<RawRecord> = None;
    let mut visited = HashSet::new();
    let mut handle: RecordHandle = 0;
    let mut consumed: u32 = 0;

    let end = loop {
        let record = fetch_record(requester, handle, largest_record_size)
            .await
            .map_err(|source| Error::Record {
                tid,
                handle,
                source,
            })?;
        visited.insert(handle);
        consumed += 1;

        if record.data.is_empty() {
            log::debug!("[pdr] TID {}: record {} is empty, skipped", tid, handle);
        } else {
            match batch_key(handle, &record.data) {
                Some(key) => {
                    batch.insert(key, record.data);
                }
                None => unkeyed = Some(record.data),
            }
        }

        if let Some(end) = limits.check(consumed, record.next_record_handle, &visited) {
            break end;
        }
        handle = record.next_record_handle;
    };

    match end {
        WalkEnd::EndOfChain | WalkEnd::RecordCountReached => log::debug!(
            "[pdr] TID {}: walk ended ({:?}) after {} records",
            tid,
            end,
            consumed
        ),
        WalkEnd::ChainLimitReached | WalkEnd::Cycle(_) => log::warn!(
            "[pdr] TID {}: walk stopped early ({:?}) after {} records",
            tid,
            end,
            consumed
        ),
    }

    if let Some(record) = unkeyed {
        match free_key(&batch) {
            Some(key) => {
                log::debug!("[pdr] TID {}: unnumbered first record stored as {}", tid, key);
                batch.insert(key, record);
            }
            None => log::warn!("[pdr] TID {}: no free handle for unnumbered first record", tid),
        }
    }

    Ok(batch)
}

/// Key under which a fetched record is stored.
///
/// Records are keyed by the handle that was requested. Handle 0 only means
/// "first record", so that record takes the handle from its own header.
/// `None` when the header carries 0 too; the record is keyed by
/// [`free_key`] once the walk is over and no later handle can collide.
fn batch_key(requested: RecordHandle, record: &[u8]) -> Option<RecordHandle> {
    if requested != 0 {
        return Some(requested);
    }
    PdrHeader::parse(record)
        .map(|header| header.record_handle)
        .filter(|&handle| handle != 0)
}

/// Handle above every key in `batch`, or the lowest unused one above 0.
fn free_key(batch: &RecordBatch) -> Option<RecordHandle> {
    match batch.keys().next_back() {
        None => Some(1),
        Some(last) => last
            .checked_add(1)
            .or_else(|| (1..=RecordHandle::MAX).find(|key| !batch.contains_key(key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_end_of_chain_wins() {
        let limits = WalkLimits {
            record_count_hint: 1,
            max_record_handles: 1,
        };
        assert_eq!(
            limits.check(1, 0, &HashSet::new()),
            Some(WalkEnd::EndOfChain)
        );
    }

    #[test]
    fn test_walk_limits_are_independent() {
        let visited = HashSet::from([0, 1]);

        let hint = WalkLimits {
            record_count_hint: 2,
            max_record_handles: 100,
        };
        assert_eq!(hint.check(2, 5, &visited), Some(WalkEnd::RecordCountReached));
        assert_eq!(hint.check(1, 5, &visited), None);

        let chain = WalkLimits {
            record_count_hint: 100,
            max_record_handles: 2,
        };
        assert_eq!(chain.check(2, 5, &visited), Some(WalkEnd::ChainLimitReached));

        let open = WalkLimits {
            record_count_hint: 100,
            max_record_handles: 100,
        };
        assert_eq!(open.check(2, 1, &visited), Some(WalkEnd::Cycle(1)));
        assert_eq!(open.check(2, 5, &visited), None);
    }

    #[test]
    fn test_batch_key() {
        let header = PdrHeader {
            record_handle: 0x20,
            version: 1,
            pdr_type: 2,
            record_change_number: 0,
            data_length: 0,
        };
        assert_eq!(batch_key(7, &header.to_bytes()), Some(7));
        assert_eq!(batch_key(0, &header.to_bytes()), Some(0x20));

        let unnumbered = PdrHeader {
            record_handle: 0,
            ..header
        };
        assert_eq!(batch_key(0, &unnumbered.to_bytes()), None);
        assert_eq!(batch_key(3, &unnumbered.to_bytes()), Some(3));
    }

    #[test]
    fn test_free_key() {
        assert_eq!(free_key(&RecordBatch::new()), Some(1));

        let batch = RecordBatch::from([(1, vec![1]), (4, vec![4])]);
        assert_eq!(free_key(&batch), Some(5));

        let full_top = RecordBatch::from([(1, vec![1]), (RecordHandle::MAX, vec![2])]);
        assert_eq!(free_key(&full_top), Some(2));
    }
}
