// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! GetPDR response interpretation.
//!
//! The record-data length in a GetPDR response is chosen by the peer. The
//! response is decoded twice: once without a data buffer to learn the
//! declared length (which the decoder has already checked against the
//! message it actually holds), then again into a buffer of exactly that size.

use crate::codec::platform::{decode_get_pdr_resp, TransferFlag};
use crate::codec::CodecError;
use crate::pdr::PdrHeader;
use crate::RecordHandle;

/// One decoded GetPDR response fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Peer's next record, 0 when this is the last one.
    pub next_record_handle: RecordHandle,
    /// Continuation token for the next part of this record.
    pub next_transfer_handle: u32,
    pub transfer_flag: TransferFlag,
    /// Change number, when a first fragment holds the whole PDR header.
    pub record_change_number: Option<u16>,
    pub payload: Vec<u8>,
    /// Transfer CRC, carried only by `End` fragments.
    pub crc: Option<u8>,
}

impl Fragment {
    /// Decode a complete GetPDR response message.
    ///
    /// Fails on a non-success completion code or any structural problem; the
    /// caller discards the record in either case.
    pub fn interpret(response: &[u8]) -> Result<Self, CodecError> {
        let fixed = decode_get_pdr_resp(response, &mut [])?;

        let mut payload = vec![0u8; fixed.response_count as usize];
        let fields = decode_get_pdr_resp(response, &mut payload)?;

        Ok(Self {
            next_record_handle: fields.next_record_handle,
            next_transfer_handle: fields.next_data_transfer_handle,
            transfer_flag: fields.transfer_flag,
            record_change_number: Self::change_number(fields.transfer_flag, &payload),
            payload,
            crc: fields.transfer_crc,
        })
    }

    /// Record change number carried by a first fragment's PDR header.
    pub(crate) fn change_number(flag: TransferFlag, payload: &[u8]) -> Option<u16> {
        if !flag.is_first() {
            return None;
        }
        PdrHeader::parse(payload).map(|header| header.record_change_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::completion;
    use crate::codec::platform::{encode_completion_only_resp, encode_get_pdr_resp, GetPdrResponse, GET_PDR};

    #[test]
    fn test_interpret_middle_fragment() {
        let resp = GetPdrResponse {
            next_record_handle: 3,
            next_data_transfer_handle: 0x40,
            transfer_flag: TransferFlag::Middle,
            response_count: 0,
            transfer_crc: None,
        };
        let msg = encode_get_pdr_resp(0, &resp, &[0xAA; 20]).unwrap();

        let fragment = Fragment::interpret(&msg).unwrap();
        assert_eq!(fragment.next_record_handle, 3);
        assert_eq!(fragment.next_transfer_handle, 0x40);
        assert_eq!(fragment.transfer_flag, TransferFlag::Middle);
        assert_eq!(fragment.payload, vec![0xAA; 20]);
        assert_eq!(fragment.crc, None);
        assert_eq!(fragment.record_change_number, None);
    }

    #[test]
    fn test_interpret_start_fragment_change_number() {
        let header = PdrHeader {
            record_handle: 9,
            version: 1,
            pdr_type: 2,
            record_change_number: 0xBEEF,
            data_length: 30,
        };
        let resp = GetPdrResponse {
            next_record_handle: 10,
            next_data_transfer_handle: 12,
            transfer_flag: TransferFlag::Start,
            response_count: 0,
            transfer_crc: None,
        };
        let mut data = header.to_bytes().to_vec();
        data.extend_from_slice(&[0x11, 0x22]);
        let msg = encode_get_pdr_resp(0, &resp, &data).unwrap();

        let fragment = Fragment::interpret(&msg).unwrap();
        assert_eq!(fragment.record_change_number, Some(0xBEEF));
        assert_eq!(fragment.payload, data);
    }

    #[test]
    fn test_interpret_empty_payload() {
        let resp = GetPdrResponse {
            next_record_handle: 0,
            next_data_transfer_handle: 0,
            transfer_flag: TransferFlag::StartAndEnd,
            response_count: 0,
            transfer_crc: None,
        };
        let msg = encode_get_pdr_resp(0, &resp, &[]).unwrap();
        assert!(Fragment::interpret(&msg).unwrap().payload.is_empty());
    }

    #[test]
    fn test_interpret_end_fragment_crc() {
        let resp = GetPdrResponse {
            next_record_handle: 0,
            next_data_transfer_handle: 0,
            transfer_flag: TransferFlag::End,
            response_count: 0,
            transfer_crc: Some(0x3C),
        };
        let msg = encode_get_pdr_resp(0, &resp, &[1, 2]).unwrap();
        assert_eq!(Fragment::interpret(&msg).unwrap().crc, Some(0x3C));
    }

    #[test]
    fn test_interpret_failure_completion() {
        let msg = encode_completion_only_resp(0, GET_PDR, completion::ERROR_INVALID_DATA).unwrap();
        assert_eq!(
            Fragment::interpret(&msg),
            Err(CodecError::Completion(completion::ERROR_INVALID_DATA))
        );
    }

    #[test]
    fn test_interpret_oversized_claim() {
        let resp = GetPdrResponse {
            next_record_handle: 0,
            next_data_transfer_handle: 0,
            transfer_flag: TransferFlag::Start,
            response_count: 0,
            transfer_crc: None,
        };
        let mut msg = encode_get_pdr_resp(0, &resp, &[0u8; 4]).unwrap();
        msg[3 + 10] = 0xFF;
        msg[3 + 11] = 0xFF;
        assert!(matches!(
            Fragment::interpret(&msg),
            Err(CodecError::Truncated { .. })
        ));
    }
}
