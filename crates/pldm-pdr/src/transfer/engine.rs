// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multipart GetPDR transfer for a single record handle.
//!
//! [`MultipartTransfer`] is the state machine; it never touches the
//! transport. [`fetch_record`] drives it over a [`Requester`].
//!
//! ```text
//!                 Start                     Middle
//! RequestingFirst ------> RequestingNext <---------+
//!        |                  |    |                 |
//!        | StartAndEnd      |    +-----------------+
//!        v                  | End (CRC ok)
//!     Complete <------------+
//!
//! any error, CRC mismatch, size or round-trip limit -> Failed
//! ```
//!
//! On failure the accumulated bytes are dropped; no partial record ever
//! leaves this module.

use crate::codec::platform::{GetPdrRequest, TransferOpFlag};
use crate::crc;
use crate::error::{ExchangeError, RecordError};
use crate::pdr::PdrHeader;
use crate::requester::Requester;
use crate::transport::Transport;
use crate::RecordHandle;

use super::fragment::Fragment;

/// Transfer state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    RequestingFirst,
    RequestingNext,
    Complete,
    Failed,
}

/// Ephemeral per-record transfer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferState {
    pub op: TransferOpFlag,
    pub transfer_handle: u32,
    /// Captured once the PDR header has arrived, echoed on every GetNextPart.
    pub record_change_number: u16,
    /// The full PDR header is in `accumulated`.
    pub header_seen: bool,
    pub accumulated: Vec<u8>,
    pub complete: bool,
}

impl Default for TransferState {
    fn default() -> Self {
        Self {
            op: TransferOpFlag::GetFirstPart,
            transfer_handle: 0,
            record_change_number: 0,
            header_seen: false,
            accumulated: Vec::new(),
            complete: false,
        }
    }
}

/// Transfer limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLimits {
    /// Largest record the peer declared in its repository info.
    pub largest_record_size: usize,
    /// Round trips allowed before the record is abandoned.
    pub max_round_trips: usize,
    /// Record data bytes requested per exchange.
    pub request_count: u16,
}

/// A reassembled record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRecord {
    pub data: Vec<u8>,
    /// Peer's next record handle, 0 when none remain.
    pub next_record_handle: RecordHandle,
    pub record_change_number: u16,
}

/// Reassembly of one record.
#[derive(Debug)]
pub struct MultipartTransfer {
    record_handle: RecordHandle,
    limits: TransferLimits,
    state: TransferState,
    phase: TransferPhase,
    round_trips: usize,
}

impl MultipartTransfer {
    pub fn new(record_handle: RecordHandle, limits: TransferLimits) -> Self {
        Self {
            record_handle,
            limits,
            state: TransferState::default(),
            phase: TransferPhase::RequestingFirst,
            round_trips: 0,
        }
    }

    #[inline]
    pub fn phase(&self) -> TransferPhase {
        self.phase
    }

    #[inline]
    pub fn state(&self) -> &TransferState {
        &self.state
    }

    #[inline]
    pub fn round_trips(&self) -> usize {
        self.round_trips
    }

    /// Request for the next part of the record.
    pub fn next_request(&self) -> GetPdrRequest {
        GetPdrRequest {
            record_handle: self.record_handle,
            data_transfer_handle: self.state.transfer_handle,
            transfer_op_flag: self.state.op,
            request_count: self.limits.request_count,
            record_change_number: self.state.record_change_number,
        }
    }

    /// Abandon the transfer, dropping everything accumulated so far.
    pub fn fail(&mut self, error: RecordError) -> RecordError {
        self.phase = TransferPhase::Failed;
        self.state.accumulated = Vec::new();
        self.state.complete = false;
        error
    }

    /// Apply one decoded response.
    ///
    /// Returns the finished record once the last fragment has validated,
    /// `None` while more parts are needed.
    pub fn on_fragment(&mut self, fragment: Fragment) -> Result<Option<CompletedRecord>, RecordError> {
        let expect_first = match self.phase {
            TransferPhase::RequestingFirst => true,
            TransferPhase::RequestingNext => false,
            TransferPhase::Complete | TransferPhase::Failed => {
                return Err(RecordError::UnexpectedTransferFlag {
                    flag: fragment.transfer_flag,
                    phase: self.phase,
                })
            }
        };

        self.round_trips += 1;
        let flag = fragment.transfer_flag;
        if flag.is_first() != expect_first {
            return Err(self.fail(RecordError::UnexpectedTransferFlag {
                flag,
                phase: self.phase,
            }));
        }

        self.state.accumulated.extend_from_slice(&fragment.payload);
        if self.state.accumulated.len() > self.limits.largest_record_size {
            return Err(self.fail(RecordError::RecordTooLarge {
                size: self.state.accumulated.len(),
                limit: self.limits.largest_record_size,
            }));
        }

        // the header may span several parts when the request count is small
        if !self.state.header_seen {
            if let Some(header) = PdrHeader::parse(&self.state.accumulated) {
                self.state.record_change_number = header.record_change_number;
                self.state.header_seen = true;
            }
        }

        self.state.transfer_handle = fragment.next_transfer_handle;

        if flag.is_last() {
            // an empty record carries no header
            if !self.state.header_seen && !self.state.accumulated.is_empty() {
                let len = self.state.accumulated.len();
                return Err(self.fail(RecordError::MissingHeader { len }));
            }
            if let Some(expected) = fragment.crc {
                if !crc::verify(&self.state.accumulated, expected) {
                    let computed = crc::crc8(&self.state.accumulated);
                    return Err(self.fail(RecordError::ChecksumMismatch { expected, computed }));
                }
            }
            self.state.complete = true;
            self.phase = TransferPhase::Complete;
            return Ok(Some(CompletedRecord {
                data: std::mem::take(&mut self.state.accumulated),
                next_record_handle: fragment.next_record_handle,
                record_change_number: self.state.record_change_number,
            }));
        }

        if self.round_trips >= self.limits.max_round_trips {
            return Err(self.fail(RecordError::TransferLimitExceeded {
                limit: self.limits.max_round_trips,
            }));
        }

        self.state.op = TransferOpFlag::GetNextPart;
        self.phase = TransferPhase::RequestingNext;
        Ok(None)
    }
}

/// Fetch and reassemble the record at `record_handle`.
pub async fn fetch_record<T: Transport>(
    requester: &Requester<'_, T>,
    record_handle: RecordHandle,
    largest_record_size: u32,
) -> Result<CompletedRecord, RecordError> {
    let tid = requester.tid();
    let config = requester.config();
    let mut transfer = MultipartTransfer::new(
        record_handle,
        TransferLimits {
            largest_record_size: largest_record_size as usize,
            max_round_trips: config.multipart_transfer_limit,
            request_count: config.request_count(),
        },
    );

    let result = loop {
        let request = transfer.next_request();
        let response = match requester.exchange("GetPDR", |iid| request.encode(iid)).await {
            Ok(response) => response,
            Err(e) => break Err(transfer.fail(e.into())),
        };

        let fragment = match Fragment::interpret(&response) {
            Ok(fragment) => fragment,
            Err(e) => break Err(transfer.fail(ExchangeError::Decode(e).into())),
        };

        log::trace!(
            "[pdr] TID {}: GetPDR record={} flag={:?} len={} next_record={} next_transfer={:#x}",
            tid,
            record_handle,
            fragment.transfer_flag,
            fragment.payload.len(),
            fragment.next_record_handle,
            fragment.next_transfer_handle
        );

        match transfer.on_fragment(fragment) {
            Ok(Some(record)) => break Ok(record),
            Ok(None) => continue,
            Err(e) => break Err(e),
        }
    };

    match &result {
        Ok(record) => log::debug!(
            "[pdr] TID {}: record {} complete ({} bytes, {} round trips, change number {})",
            tid,
            record_handle,
            record.data.len(),
            transfer.round_trips(),
            record.record_change_number
        ),
        Err(e) => log::warn!(
            "[pdr] TID {}: multipart transfer of record {} failed, discarding: {}",
            tid,
            record_handle,
            e
        ),
    }
    result
}
