// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Terminus Locator PDR policy.
//!
//! A terminus may expose at most one valid Terminus Locator PDR. The one it
//! exposes is rewritten to carry the TID this controller assigned to the
//! terminus before the record is stored. A second valid locator rejects the
//! whole batch.
//!
//! The "already accepted" flag lives in [`PolicyState`], owned by a single
//! acquisition. Nothing carries over between batches or termini.

use crate::builder::RecordBatch;
use crate::error::{Error, Result};
use crate::pdr::{pdr_type, record_type, TerminusLocatorPdr};
use crate::{RecordHandle, Tid};

/// Per-batch policy state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyState {
    /// Handle of the valid Terminus Locator accepted so far.
    pub terminus_locator: Option<RecordHandle>,
}

/// Apply the policy to `batch` on behalf of terminus `tid`.
///
/// On error the batch may be partly rewritten and must be discarded.
pub fn apply(batch: &mut RecordBatch, tid: Tid, state: &mut PolicyState) -> Result<()> {
    for (&handle, record) in batch.iter_mut() {
        if record_type(record) != Some(pdr_type::TERMINUS_LOCATOR) {
            continue;
        }

        let len = record.len();
        let mut locator = TerminusLocatorPdr::new(record).ok_or_else(|| {
            log::error!(
                "[pdr] TID {}: Terminus Locator PDR {} too short ({} bytes)",
                tid,
                handle,
                len
            );
            Error::MalformedRecord { tid, handle, len }
        })?;

        if !locator.is_valid() {
            continue;
        }

        if let Some(first) = state.terminus_locator {
            log::error!(
                "[pdr] TID {}: multiple valid Terminus Locator PDRs found ({} and {})",
                tid,
                first,
                handle
            );
            return Err(Error::DuplicateTerminusLocator { tid, handle });
        }

        log::debug!(
            "[pdr] TID {}: Terminus Locator PDR {} rewritten (peer TID {})",
            tid,
            handle,
            locator.tid()
        );
        locator.set_tid(tid);
        state.terminus_locator = Some(handle);
    }
    Ok(())
}

/// Apply the policy with fresh state, returning the accepted locator handle.
pub fn apply_terminus_locator_policy(
    batch: &mut RecordBatch,
    tid: Tid,
) -> Result<Option<RecordHandle>> {
    let mut state = PolicyState::default();
    apply(batch, tid, &mut state)?;
    Ok(state.terminus_locator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdr::{terminus_locator_fixture, PdrHeader, TERMINUS_LOCATOR_MIN_SIZE};

    fn sensor(handle: RecordHandle) -> Vec<u8> {
        let header = PdrHeader {
            record_handle: handle,
            version: 1,
            pdr_type: pdr_type::NUMERIC_SENSOR,
            record_change_number: 0,
            data_length: 4,
        };
        let mut record = header.to_bytes().to_vec();
        record.extend_from_slice(&[1, 2, 3, 4]);
        record
    }

    #[test]
    fn test_rewrites_valid_locator() {
        let mut batch = RecordBatch::from([
            (1, sensor(1)),
            (2, terminus_locator_fixture(2, true, 0x00)),
        ]);
        let accepted = apply_terminus_locator_policy(&mut batch, 0x12).unwrap();
        assert_eq!(accepted, Some(2));
        assert_eq!(batch[&2][13], 0x12);
        assert_eq!(batch[&1], sensor(1));
    }

    #[test]
    fn test_invalid_locators_untouched() {
        let mut batch = RecordBatch::from([
            (1, terminus_locator_fixture(1, false, 0x33)),
            (2, terminus_locator_fixture(2, false, 0x44)),
        ]);
        assert_eq!(apply_terminus_locator_policy(&mut batch, 9).unwrap(), None);
        assert_eq!(batch[&1][13], 0x33);
        assert_eq!(batch[&2][13], 0x44);
    }

    #[test]
    fn test_duplicate_valid_locator_rejected() {
        let mut batch = RecordBatch::from([
            (1, terminus_locator_fixture(1, true, 0)),
            (5, terminus_locator_fixture(5, true, 0)),
        ]);
        assert_eq!(
            apply_terminus_locator_policy(&mut batch, 3),
            Err(Error::DuplicateTerminusLocator { tid: 3, handle: 5 })
        );
    }

    #[test]
    fn test_state_does_not_leak_between_batches() {
        let mut first = RecordBatch::from([(1, terminus_locator_fixture(1, true, 0))]);
        let mut second = RecordBatch::from([(1, terminus_locator_fixture(1, true, 0))]);
        assert!(apply_terminus_locator_policy(&mut first, 1).is_ok());
        assert!(apply_terminus_locator_policy(&mut second, 2).is_ok());
        assert_eq!(second[&1][13], 2);
    }

    #[test]
    fn test_short_locator_is_malformed() {
        let mut record = terminus_locator_fixture(4, true, 0);
        record.truncate(TERMINUS_LOCATOR_MIN_SIZE - 1);
        let mut batch = RecordBatch::from([(4, record)]);
        assert_eq!(
            apply_terminus_locator_policy(&mut batch, 3),
            Err(Error::MalformedRecord {
                tid: 3,
                handle: 4,
                len: TERMINUS_LOCATOR_MIN_SIZE - 1
            })
        );
    }

    #[test]
    fn test_shared_state_across_calls() {
        let mut state = PolicyState::default();
        let mut first = RecordBatch::from([(1, terminus_locator_fixture(1, true, 0))]);
        let mut second = RecordBatch::from([(2, terminus_locator_fixture(2, true, 0))]);
        apply(&mut first, 1, &mut state).unwrap();
        assert!(matches!(
            apply(&mut second, 1, &mut state),
            Err(Error::DuplicateTerminusLocator { handle: 2, .. })
        ));
    }
}
