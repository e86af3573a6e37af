// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simulated PLDM terminus serving a PDR repository over [`Transport`].

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use pldm_pdr::codec::platform::{
    encode_completion_only_resp, encode_get_pdr_repository_info_resp, encode_get_pdr_resp,
    GetPdrRequest, GetPdrResponse, PdrRepositoryInfoResp, TransferFlag, TransferOpFlag, GET_PDR,
    GET_PDR_REPOSITORY_INFO,
};
use pldm_pdr::codec::{completion, MessageHeader};
use pldm_pdr::crc::crc8;
use pldm_pdr::pdr::{pdr_type, PdrHeader};
use pldm_pdr::{Tid, Transport, TransportError};

/// Fault injection knobs.
#[derive(Debug, Default, Clone)]
pub struct Faults {
    /// Completion code returned for GetPDRRepositoryInfo.
    pub info_completion: Option<u8>,
    /// Drop every request (transport reports no response).
    pub no_response: bool,
    /// Send a wrong CRC for this record.
    pub corrupt_crc: Option<u32>,
    /// Never finish this record: answer every GetNextPart with `Middle`.
    pub endless: Option<u32>,
    /// Replace the next record handle reported after this record.
    pub next_override: HashMap<u32, u32>,
    /// Never answer once this many GetPDR requests have been served.
    pub hang_after: Option<usize>,
}

#[derive(Debug)]
pub struct SimState {
    pub repository_state: u8,
    /// Records in chain order.
    pub records: Vec<(u32, Vec<u8>)>,
    /// Largest record data bytes per response, on top of the request count.
    pub chunk: usize,
    pub record_count: Option<u32>,
    pub largest_record_size: Option<u32>,
    pub faults: Faults,
    /// Every GetPDR request received.
    pub get_pdr_requests: Vec<GetPdrRequest>,
    pub info_requests: usize,
}

/// A terminus with an in-memory PDR repository.
#[derive(Debug)]
pub struct SimulatedTerminus {
    pub tid: Tid,
    pub state: Mutex<SimState>,
}

impl SimulatedTerminus {
    pub fn new(tid: Tid, records: Vec<(u32, Vec<u8>)>) -> Self {
        Self {
            tid,
            state: Mutex::new(SimState {
                repository_state: 0,
                records,
                chunk: usize::MAX,
                record_count: None,
                largest_record_size: None,
                faults: Faults::default(),
                get_pdr_requests: Vec::new(),
                info_requests: 0,
            }),
        }
    }

    pub fn get_pdr_count(&self) -> usize {
        self.state.lock().get_pdr_requests.len()
    }

    pub fn info_count(&self) -> usize {
        self.state.lock().info_requests
    }

    fn respond(&self, request: &[u8]) -> Option<Result<Vec<u8>, TransportError>> {
        let mut state = self.state.lock();
        if state.faults.no_response {
            return Some(Err(TransportError::NoResponse {
                tid: self.tid,
                attempts: 3,
            }));
        }

        let header = MessageHeader::decode(request).expect("request header");
        match header.command {
            GET_PDR_REPOSITORY_INFO => {
                state.info_requests += 1;
                Some(Ok(state.repository_info(header.instance_id)))
            }
            GET_PDR => {
                let (_, req) = GetPdrRequest::decode(request).expect("GetPDR request");
                if let Some(limit) = state.faults.hang_after {
                    if state.get_pdr_requests.len() >= limit {
                        return None;
                    }
                }
                state.get_pdr_requests.push(req);
                Some(Ok(state.get_pdr(header.instance_id, &req)))
            }
            other => panic!("unexpected command {:#x}", other),
        }
    }
}

impl SimState {
    fn repository_info(&self, instance_id: u8) -> Vec<u8> {
        if let Some(cc) = self.faults.info_completion {
            return encode_completion_only_resp(instance_id, GET_PDR_REPOSITORY_INFO, cc).unwrap();
        }
        let largest = self.records.iter().map(|(_, r)| r.len()).max().unwrap_or(0) as u32;
        let size = self.records.iter().map(|(_, r)| r.len()).sum::<usize>() as u32;
        let info = PdrRepositoryInfoResp {
            repository_state: self.repository_state,
            update_time: [0; 13],
            oem_update_time: [0; 13],
            record_count: self.record_count.unwrap_or(self.records.len() as u32),
            repository_size: size,
            largest_record_size: self.largest_record_size.unwrap_or(largest),
            data_transfer_handle_timeout: 1,
        };
        encode_get_pdr_repository_info_resp(instance_id, &info).unwrap()
    }

    fn get_pdr(&self, instance_id: u8, req: &GetPdrRequest) -> Vec<u8> {
        let position = if req.record_handle == 0 {
            (!self.records.is_empty()).then_some(0)
        } else {
            self.records.iter().position(|(h, _)| *h == req.record_handle)
        };
        let Some(position) = position else {
            return encode_completion_only_resp(instance_id, GET_PDR, completion::INVALID_RECORD_HANDLE)
                .unwrap();
        };

        let (handle, record) = &self.records[position];
        let next_record_handle = self
            .faults
            .next_override
            .get(handle)
            .copied()
            .unwrap_or_else(|| self.records.get(position + 1).map_or(0, |(h, _)| *h));

        let offset = match req.transfer_op_flag {
            TransferOpFlag::GetFirstPart => 0,
            TransferOpFlag::GetNextPart => req.data_transfer_handle as usize,
        };

        if self.faults.endless == Some(*handle) && offset > 0 {
            let resp = GetPdrResponse {
                next_record_handle,
                next_data_transfer_handle: req.data_transfer_handle + 1,
                transfer_flag: TransferFlag::Middle,
                response_count: 0,
                transfer_crc: None,
            };
            return encode_get_pdr_resp(instance_id, &resp, &[0xEE]).unwrap();
        }

        let chunk = self.chunk.min(req.request_count as usize);
        let end = (offset + chunk).min(record.len());
        let last = end == record.len() && self.faults.endless != Some(*handle);
        let transfer_flag = match (offset == 0, last) {
            (true, true) => TransferFlag::StartAndEnd,
            (true, false) => TransferFlag::Start,
            (false, true) => TransferFlag::End,
            (false, false) => TransferFlag::Middle,
        };

        let mut crc = crc8(record);
        if self.faults.corrupt_crc == Some(*handle) {
            crc ^= 0xFF;
        }

        let resp = GetPdrResponse {
            next_record_handle,
            next_data_transfer_handle: if last { 0 } else { end as u32 },
            transfer_flag,
            response_count: 0,
            transfer_crc: Some(crc),
        };
        encode_get_pdr_resp(instance_id, &resp, &record[offset..end]).unwrap()
    }
}

impl Transport for SimulatedTerminus {
    fn send_receive(
        &self,
        tid: Tid,
        _timeout: Duration,
        _retry_count: u8,
        request: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send {
        let outcome = if tid == self.tid {
            self.respond(&request)
        } else {
            Some(Err(TransportError::Unreachable(tid)))
        };
        async move {
            match outcome {
                Some(result) => result,
                None => std::future::pending().await,
            }
        }
    }
}

/// A PDR of `pdr_type` with `body_len` body bytes.
pub fn pdr(handle: u32, pdr_type: u8, change_number: u16, body_len: usize) -> Vec<u8> {
    let header = PdrHeader {
        record_handle: handle,
        version: 1,
        pdr_type,
        record_change_number: change_number,
        data_length: body_len as u16,
    };
    let mut record = header.to_bytes().to_vec();
    record.extend((0..body_len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(handle as u8)));
    record
}

/// A Terminus Locator PDR.
pub fn terminus_locator(handle: u32, valid: bool, tid: u8) -> Vec<u8> {
    let mut record = pdr(handle, pdr_type::TERMINUS_LOCATOR, 0, 0);
    record[8] = 9; // data length
    record.extend_from_slice(&[0x01, 0x00, u8::from(valid), tid, 0x00, 0x00, 0x01, 0x01, 0x08]);
    record
}

/// A typical small repository: one locator and a mix of sensor records.
pub fn sample_repository() -> Vec<(u32, Vec<u8>)> {
    vec![
        (1, terminus_locator(1, true, 0x00)),
        (2, pdr(2, pdr_type::NUMERIC_SENSOR, 0x0101, 90)),
        (3, pdr(3, pdr_type::STATE_SENSOR, 0x0202, 12)),
        (7, pdr(7, pdr_type::NUMERIC_EFFECTER, 0x0303, 150)),
    ]
}
