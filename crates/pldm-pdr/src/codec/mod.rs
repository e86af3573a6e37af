// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! PLDM wire codec for the Platform Monitoring and Control commands used by
//! PDR acquisition (DSP0240 message header, DSP0248 GetPDRRepositoryInfo and
//! GetPDR).
//!
//! All multi-byte fields are little-endian. Every decoder checks the buffer
//! length before reading a field; nothing here reinterprets a byte buffer as
//! a structured type.
//!
//! ```text
//! +--------+--------+---------+------------------------------+
//! | Rq|D|IID| Ver|Type| Command | Command body ...             |
//! +--------+--------+---------+------------------------------+
//!   byte 0   byte 1   byte 2
//! ```

pub mod header;
pub mod platform;

pub use header::{MessageHeader, MessageKind, HEADER_SIZE, MAX_INSTANCE_ID, PLDM_TYPE_PLATFORM};
pub use platform::{
    decode_get_pdr_repository_info_resp, decode_get_pdr_resp, encode_get_pdr_repository_info_req,
    GetPdrRequest, GetPdrResponse, PdrRepositoryInfoResp, TransferFlag, TransferOpFlag,
};

/// Completion codes (DSP0240 generic plus DSP0248 GetPDR specific).
pub mod completion {
    pub const SUCCESS: u8 = 0x00;
    pub const ERROR: u8 = 0x01;
    pub const ERROR_INVALID_DATA: u8 = 0x02;
    pub const ERROR_INVALID_LENGTH: u8 = 0x03;
    pub const ERROR_NOT_READY: u8 = 0x04;
    pub const ERROR_UNSUPPORTED_PLDM_CMD: u8 = 0x05;
    pub const ERROR_INVALID_PLDM_TYPE: u8 = 0x20;

    pub const INVALID_DATA_TRANSFER_HANDLE: u8 = 0x80;
    pub const INVALID_TRANSFER_OPERATION_FLAG: u8 = 0x81;
    pub const INVALID_RECORD_HANDLE: u8 = 0x82;
    pub const INVALID_RECORD_CHANGE_NUMBER: u8 = 0x83;
    pub const TRANSFER_TIMEOUT: u8 = 0x84;
    pub const REPOSITORY_UPDATE_IN_PROGRESS: u8 = 0x85;
}

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Output buffer cannot hold the encoded message or copied field.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Message ends before a fixed field or the declared payload.
    #[error("message truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    /// Message length disagrees with what its fields declare.
    #[error("invalid message length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Expected a response, got a request (or the reverse).
    #[error("unexpected message direction: expected {expected:?}")]
    UnexpectedDirection { expected: MessageKind },

    /// Header version bits are not 0.
    #[error("unsupported header version {0}")]
    UnsupportedHeaderVersion(u8),

    /// Message is not a PLDM Platform message.
    #[error("unexpected PLDM type {0:#04x}")]
    UnexpectedType(u8),

    /// Message carries another command.
    #[error("unexpected command {actual:#04x}, expected {expected:#04x}")]
    UnexpectedCommand { expected: u8, actual: u8 },

    /// Instance id does not fit in 5 bits.
    #[error("invalid instance id {0}")]
    InvalidInstanceId(u8),

    /// Transfer flag outside Start/Middle/End/StartAndEnd.
    #[error("invalid transfer flag {0:#04x}")]
    InvalidTransferFlag(u8),

    /// Transfer operation flag outside GetNextPart/GetFirstPart.
    #[error("invalid transfer operation flag {0:#04x}")]
    InvalidTransferOpFlag(u8),

    /// Record data too long for the 16-bit response count.
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    /// Peer answered with a non-success completion code.
    #[error("completion code {0:#04x}")]
    Completion(u8),
}

/// Ensure `buf` holds at least `needed` bytes.
#[inline]
pub(crate) fn ensure_len(buf: &[u8], needed: usize) -> Result<(), CodecError> {
    if buf.len() < needed {
        return Err(CodecError::Truncated {
            needed,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Read a little-endian u16 at `offset`. Caller has checked bounds.
#[inline]
pub(crate) fn le_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

/// Read a little-endian u32 at `offset`. Caller has checked bounds.
#[inline]
pub(crate) fn le_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}
