// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for PDR acquisition.
//!
//! Nothing here is fatal to the host process. A failed acquisition leaves
//! the terminus with its previous repository and may be retried later.

use crate::codec::{CodecError, TransferFlag};
use crate::repo_info::RepositoryState;
use crate::transfer::TransferPhase;
use crate::transport::TransportError;
use crate::{RecordHandle, Tid};

/// Result type for acquisition operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure categories, for callers deciding how to report or retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response or malformed envelope.
    TransportFailure,
    /// Peer sent structurally invalid data or a failure completion code.
    DecodeFailure,
    /// Reassembled record failed its CRC.
    ChecksumMismatch,
    /// Too many fragments or an oversized record.
    ResourceLimitExceeded,
    /// Batch violates a record policy (duplicate or malformed special record).
    PolicyViolation,
    /// Peer repository is updating, failed, or in an unknown state.
    RepositoryUnavailable,
    /// Peer has, or yielded, no records.
    EmptyRepository,
}

/// One request/response exchange failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Request could not be encoded.
    #[error("request encode failed: {0}")]
    Encode(CodecError),

    /// Response could not be decoded or carried a failure completion code.
    #[error("response decode failed: {0}")]
    Decode(CodecError),
}

impl ExchangeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::TransportFailure,
            Self::Encode(_) | Self::Decode(_) => ErrorKind::DecodeFailure,
        }
    }
}

/// Reassembly of a single record failed; the partial record was discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// Completed record too short to hold the common PDR header.
    #[error("record holds {len} bytes, too short for a PDR header")]
    MissingHeader { len: usize },

    /// Fragment position contradicts the transfer so far (e.g. `Middle` first).
    #[error("unexpected transfer flag {flag:?} in {phase:?}")]
    UnexpectedTransferFlag {
        flag: TransferFlag,
        phase: TransferPhase,
    },

    /// CRC carried by the `End` fragment does not match the record.
    #[error("checksum mismatch: peer sent {expected:#04x}, computed {computed:#04x}")]
    ChecksumMismatch { expected: u8, computed: u8 },

    /// Peer kept the transfer open past the round-trip limit.
    #[error("transfer not complete after {limit} round trips")]
    TransferLimitExceeded { limit: usize },

    /// Accumulated bytes exceed the largest record size the peer declared.
    #[error("record grew to {size} bytes, largest declared record is {limit}")]
    RecordTooLarge { size: usize, limit: usize },
}

impl RecordError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Exchange(e) => e.kind(),
            Self::MissingHeader { .. } | Self::UnexpectedTransferFlag { .. } => {
                ErrorKind::DecodeFailure
            }
            Self::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            Self::TransferLimitExceeded { .. } | Self::RecordTooLarge { .. } => {
                ErrorKind::ResourceLimitExceeded
            }
        }
    }
}

/// Acquisition of a terminus repository failed; no store was committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// GetPDRRepositoryInfo exchange failed.
    #[error("repository info unavailable for TID {tid}: {source}")]
    InfoUnavailable {
        tid: Tid,
        #[source]
        source: ExchangeError,
    },

    /// Peer repository is not in the Available state.
    #[error("repository of TID {tid} is not available (state {state:?})")]
    RepositoryNotAvailable { tid: Tid, state: RepositoryState },

    /// Peer reports zero records.
    #[error("repository of TID {tid} reports no records")]
    EmptyRepository { tid: Tid },

    /// A record could not be fetched; the whole batch is discarded.
    #[error("record {handle} of TID {tid} could not be fetched: {source}")]
    Record {
        tid: Tid,
        handle: RecordHandle,
        #[source]
        source: RecordError,
    },

    /// More than one valid Terminus Locator PDR in one batch.
    #[error("multiple valid Terminus Locator PDRs from TID {tid} (second at record {handle})")]
    DuplicateTerminusLocator { tid: Tid, handle: RecordHandle },

    /// A record too short to interpret as its declared type.
    #[error("record {handle} of TID {tid} is malformed ({len} bytes)")]
    MalformedRecord {
        tid: Tid,
        handle: RecordHandle,
        len: usize,
    },

    /// Peer claimed records but none were retrievable.
    #[error("no records committed for TID {tid} (peer reported {reported})")]
    NothingCommitted { tid: Tid, reported: u32 },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InfoUnavailable { source, .. } => source.kind(),
            Self::RepositoryNotAvailable { .. } => ErrorKind::RepositoryUnavailable,
            Self::EmptyRepository { .. } | Self::NothingCommitted { .. } => {
                ErrorKind::EmptyRepository
            }
            Self::Record { source, .. } => source.kind(),
            Self::DuplicateTerminusLocator { .. } | Self::MalformedRecord { .. } => {
                ErrorKind::PolicyViolation
            }
        }
    }

    /// Terminus the failure belongs to.
    pub fn tid(&self) -> Tid {
        match self {
            Self::InfoUnavailable { tid, .. }
            | Self::RepositoryNotAvailable { tid, .. }
            | Self::EmptyRepository { tid }
            | Self::Record { tid, .. }
            | Self::DuplicateTerminusLocator { tid, .. }
            | Self::MalformedRecord { tid, .. }
            | Self::NothingCommitted { tid, .. } => *tid,
        }
    }
}
