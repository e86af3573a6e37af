// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! GetPDRRepositoryInfo and GetPDR command layouts (DSP0248 section 26).
//!
//! Both directions are provided: the requester side is what acquisition
//! uses, the responder side lets a simulated terminus answer in tests.

use super::header::{MessageHeader, MessageKind};
use super::{completion, ensure_len, le_u16, le_u32, CodecError};

/// GetPDRRepositoryInfo command code.
pub const GET_PDR_REPOSITORY_INFO: u8 = 0x50;
/// GetPDR command code.
pub const GET_PDR: u8 = 0x51;

/// GetPDR request body size.
pub const GET_PDR_REQ_BYTES: usize = 13;
/// GetPDR response body size without record data and CRC.
pub const GET_PDR_MIN_RESP_BYTES: usize = 12;
/// GetPDRRepositoryInfo response body size.
pub const GET_PDR_REPOSITORY_INFO_RESP_BYTES: usize = 41;
/// timestamp104 size.
pub const TIMESTAMP104_SIZE: usize = 13;

/// Transfer operation flag of a GetPDR request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TransferOpFlag {
    GetNextPart = 0x00,
    GetFirstPart = 0x01,
}

impl TryFrom<u8> for TransferOpFlag {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::GetNextPart),
            0x01 => Ok(Self::GetFirstPart),
            other => Err(CodecError::InvalidTransferOpFlag(other)),
        }
    }
}

/// Position of a GetPDR response fragment within a multipart record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TransferFlag {
    Start = 0x01,
    Middle = 0x02,
    End = 0x04,
    StartAndEnd = 0x05,
}

impl TransferFlag {
    /// First fragment of a record.
    #[inline]
    pub fn is_first(self) -> bool {
        matches!(self, Self::Start | Self::StartAndEnd)
    }

    /// Last fragment of a record.
    #[inline]
    pub fn is_last(self) -> bool {
        matches!(self, Self::End | Self::StartAndEnd)
    }

    /// Only `End` fragments carry a transfer CRC on the wire.
    #[inline]
    pub fn carries_crc(self) -> bool {
        self == Self::End
    }
}

impl TryFrom<u8> for TransferFlag {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Start),
            0x02 => Ok(Self::Middle),
            0x04 => Ok(Self::End),
            0x05 => Ok(Self::StartAndEnd),
            other => Err(CodecError::InvalidTransferFlag(other)),
        }
    }
}

// ============================================================================
// GetPDRRepositoryInfo
// ============================================================================

/// Decoded GetPDRRepositoryInfo response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdrRepositoryInfoResp {
    pub repository_state: u8,
    pub update_time: [u8; TIMESTAMP104_SIZE],
    pub oem_update_time: [u8; TIMESTAMP104_SIZE],
    pub record_count: u32,
    pub repository_size: u32,
    pub largest_record_size: u32,
    pub data_transfer_handle_timeout: u8,
}

/// Encode a GetPDRRepositoryInfo request (header only).
pub fn encode_get_pdr_repository_info_req(instance_id: u8) -> Result<Vec<u8>, CodecError> {
    let mut msg = vec![0u8; MessageHeader::SIZE];
    MessageHeader::request(instance_id, GET_PDR_REPOSITORY_INFO)?.encode(&mut msg)?;
    Ok(msg)
}

/// Decode a GetPDRRepositoryInfo response.
///
/// A non-success completion code is reported as [`CodecError::Completion`]
/// regardless of how short the rest of the message is.
pub fn decode_get_pdr_repository_info_resp(
    msg: &[u8],
) -> Result<PdrRepositoryInfoResp, CodecError> {
    let body = response_body(msg, GET_PDR_REPOSITORY_INFO)?;

    ensure_len(body, GET_PDR_REPOSITORY_INFO_RESP_BYTES)?;
    if body.len() != GET_PDR_REPOSITORY_INFO_RESP_BYTES {
        return Err(CodecError::InvalidLength {
            expected: GET_PDR_REPOSITORY_INFO_RESP_BYTES,
            actual: body.len(),
        });
    }

    let mut update_time = [0u8; TIMESTAMP104_SIZE];
    update_time.copy_from_slice(&body[2..15]);
    let mut oem_update_time = [0u8; TIMESTAMP104_SIZE];
    oem_update_time.copy_from_slice(&body[15..28]);

    Ok(PdrRepositoryInfoResp {
        repository_state: body[1],
        update_time,
        oem_update_time,
        record_count: le_u32(body, 28),
        repository_size: le_u32(body, 32),
        largest_record_size: le_u32(body, 36),
        data_transfer_handle_timeout: body[40],
    })
}

/// Encode a successful GetPDRRepositoryInfo response.
pub fn encode_get_pdr_repository_info_resp(
    instance_id: u8,
    info: &PdrRepositoryInfoResp,
) -> Result<Vec<u8>, CodecError> {
    let mut msg = vec![0u8; MessageHeader::SIZE + GET_PDR_REPOSITORY_INFO_RESP_BYTES];
    MessageHeader::response(instance_id, GET_PDR_REPOSITORY_INFO)?.encode(&mut msg)?;

    let body = &mut msg[MessageHeader::SIZE..];
    body[0] = completion::SUCCESS;
    body[1] = info.repository_state;
    body[2..15].copy_from_slice(&info.update_time);
    body[15..28].copy_from_slice(&info.oem_update_time);
    body[28..32].copy_from_slice(&info.record_count.to_le_bytes());
    body[32..36].copy_from_slice(&info.repository_size.to_le_bytes());
    body[36..40].copy_from_slice(&info.largest_record_size.to_le_bytes());
    body[40] = info.data_transfer_handle_timeout;

    Ok(msg)
}

// ============================================================================
// GetPDR
// ============================================================================

/// GetPDR request fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetPdrRequest {
    pub record_handle: u32,
    pub data_transfer_handle: u32,
    pub transfer_op_flag: TransferOpFlag,
    pub request_count: u16,
    pub record_change_number: u16,
}

impl GetPdrRequest {
    /// Encode as a complete PLDM request message.
    pub fn encode(&self, instance_id: u8) -> Result<Vec<u8>, CodecError> {
        let mut msg = vec![0u8; MessageHeader::SIZE + GET_PDR_REQ_BYTES];
        MessageHeader::request(instance_id, GET_PDR)?.encode(&mut msg)?;

        let body = &mut msg[MessageHeader::SIZE..];
        body[0..4].copy_from_slice(&self.record_handle.to_le_bytes());
        body[4..8].copy_from_slice(&self.data_transfer_handle.to_le_bytes());
        body[8] = self.transfer_op_flag as u8;
        body[9..11].copy_from_slice(&self.request_count.to_le_bytes());
        body[11..13].copy_from_slice(&self.record_change_number.to_le_bytes());

        Ok(msg)
    }

    /// Decode a complete PLDM request message.
    pub fn decode(msg: &[u8]) -> Result<(MessageHeader, Self), CodecError> {
        let header = MessageHeader::decode(msg)?;
        header.expect(MessageKind::Request, GET_PDR)?;

        let body = &msg[MessageHeader::SIZE..];
        if body.len() != GET_PDR_REQ_BYTES {
            return Err(CodecError::InvalidLength {
                expected: GET_PDR_REQ_BYTES,
                actual: body.len(),
            });
        }

        Ok((
            header,
            Self {
                record_handle: le_u32(body, 0),
                data_transfer_handle: le_u32(body, 4),
                transfer_op_flag: TransferOpFlag::try_from(body[8])?,
                request_count: le_u16(body, 9),
                record_change_number: le_u16(body, 11),
            },
        ))
    }
}

/// GetPDR response fields, without the record data itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetPdrResponse {
    pub next_record_handle: u32,
    pub next_data_transfer_handle: u32,
    pub transfer_flag: TransferFlag,
    /// Number of record data bytes declared by the peer.
    pub response_count: u16,
    /// Present only when `transfer_flag` is `End`.
    pub transfer_crc: Option<u8>,
}

/// Decode a GetPDR response.
///
/// Record data is copied into `record_data` when it is non-empty. Passing
/// an empty slice decodes only the fixed fields, which tells the caller how
/// large a buffer the second pass needs.
pub fn decode_get_pdr_resp(msg: &[u8], record_data: &mut [u8]) -> Result<GetPdrResponse, CodecError> {
    let body = response_body(msg, GET_PDR)?;
    ensure_len(body, GET_PDR_MIN_RESP_BYTES)?;

    let next_record_handle = le_u32(body, 1);
    let next_data_transfer_handle = le_u32(body, 5);
    let transfer_flag = TransferFlag::try_from(body[9])?;
    let response_count = le_u16(body, 10);

    let data_end = GET_PDR_MIN_RESP_BYTES + response_count as usize;
    let expected = data_end + usize::from(transfer_flag.carries_crc());
    ensure_len(body, expected)?;
    if body.len() != expected {
        return Err(CodecError::InvalidLength {
            expected,
            actual: body.len(),
        });
    }

    if !record_data.is_empty() {
        let count = response_count as usize;
        if record_data.len() < count {
            return Err(CodecError::BufferTooSmall {
                needed: count,
                available: record_data.len(),
            });
        }
        record_data[..count].copy_from_slice(&body[GET_PDR_MIN_RESP_BYTES..data_end]);
    }

    let transfer_crc = transfer_flag.carries_crc().then(|| body[data_end]);

    Ok(GetPdrResponse {
        next_record_handle,
        next_data_transfer_handle,
        transfer_flag,
        response_count,
        transfer_crc,
    })
}

/// Encode a successful GetPDR response carrying `data`.
///
/// `response.response_count` is ignored; the count is taken from `data`.
pub fn encode_get_pdr_resp(
    instance_id: u8,
    response: &GetPdrResponse,
    data: &[u8],
) -> Result<Vec<u8>, CodecError> {
    let count = u16::try_from(data.len()).map_err(|_| CodecError::PayloadTooLarge(data.len()))?;
    let crc_len = usize::from(response.transfer_flag.carries_crc());

    let mut msg =
        vec![0u8; MessageHeader::SIZE + GET_PDR_MIN_RESP_BYTES + data.len() + crc_len];
    MessageHeader::response(instance_id, GET_PDR)?.encode(&mut msg)?;

    let body = &mut msg[MessageHeader::SIZE..];
    body[0] = completion::SUCCESS;
    body[1..5].copy_from_slice(&response.next_record_handle.to_le_bytes());
    body[5..9].copy_from_slice(&response.next_data_transfer_handle.to_le_bytes());
    body[9] = response.transfer_flag as u8;
    body[10..12].copy_from_slice(&count.to_le_bytes());
    body[GET_PDR_MIN_RESP_BYTES..GET_PDR_MIN_RESP_BYTES + data.len()].copy_from_slice(data);
    if crc_len == 1 {
        body[GET_PDR_MIN_RESP_BYTES + data.len()] = response.transfer_crc.unwrap_or_default();
    }

    Ok(msg)
}

/// Encode a response carrying only a completion code.
pub fn encode_completion_only_resp(
    instance_id: u8,
    command: u8,
    completion_code: u8,
) -> Result<Vec<u8>, CodecError> {
    let mut msg = vec![0u8; MessageHeader::SIZE + 1];
    MessageHeader::response(instance_id, command)?.encode(&mut msg)?;
    msg[MessageHeader::SIZE] = completion_code;
    Ok(msg)
}

/// Validate the header and completion code, returning the response body.
fn response_body(msg: &[u8], command: u8) -> Result<&[u8], CodecError> {
    let header = MessageHeader::decode(msg)?;
    header.expect(MessageKind::Response, command)?;

    let body = &msg[MessageHeader::SIZE..];
    ensure_len(body, 1)?;
    if body[0] != completion::SUCCESS {
        return Err(CodecError::Completion(body[0]));
    }
    Ok(body)
}
