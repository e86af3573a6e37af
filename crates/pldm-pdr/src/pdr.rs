// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked views over raw PDR bytes (DSP0248 section 28).
//!
//! Records arrive from the peer as opaque byte buffers. Fields are read and
//! written at fixed offsets only after the buffer has been checked to cover
//! them.
//!
//! ```text
//! Common PDR header (10 bytes)
//! 0..4   record handle          u32
//! 4      PDR header version     u8
//! 5      PDR type               u8
//! 6..8   record change number   u16
//! 8..10  data length            u16
//!
//! Terminus Locator PDR body
//! 10..12 PLDM terminus handle   u16
//! 12     validity               u8  (1 = valid)
//! 13     TID                    u8
//! 14..16 container id           u16
//! 16     locator type           u8
//! 17     locator value size     u8
//! 18..   locator value
//! ```

use crate::codec::{le_u16, le_u32};
use crate::RecordHandle;

/// PDR type codes (DSP0248 table 76).
pub mod pdr_type {
    pub const TERMINUS_LOCATOR: u8 = 1;
    pub const NUMERIC_SENSOR: u8 = 2;
    pub const NUMERIC_SENSOR_INITIALIZATION: u8 = 3;
    pub const STATE_SENSOR: u8 = 4;
    pub const STATE_SENSOR_INITIALIZATION: u8 = 5;
    pub const SENSOR_AUXILIARY_NAMES: u8 = 6;
    pub const NUMERIC_EFFECTER: u8 = 9;
    pub const STATE_EFFECTER: u8 = 11;
    pub const ENTITY_ASSOCIATION: u8 = 15;
    pub const ENTITY_AUXILIARY_NAMES: u8 = 16;
    pub const FRU_RECORD_SET: u8 = 20;
    pub const COMPACT_NUMERIC_SENSOR: u8 = 21;
}

/// Size of the common PDR header.
pub const PDR_HEADER_SIZE: usize = 10;

/// Terminus Locator `validity` value for a valid record.
pub const TL_PDR_VALID: u8 = 1;

const TL_VALIDITY_OFFSET: usize = 12;
const TL_TID_OFFSET: usize = 13;

/// Minimum Terminus Locator length covering the fields the policy touches.
pub const TERMINUS_LOCATOR_MIN_SIZE: usize = TL_TID_OFFSET + 1;

/// Common PDR header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdrHeader {
    pub record_handle: RecordHandle,
    pub version: u8,
    pub pdr_type: u8,
    pub record_change_number: u16,
    pub data_length: u16,
}

impl PdrHeader {
    /// Parse the header at the front of `record`.
    ///
    /// Returns `None` when `record` is shorter than [`PDR_HEADER_SIZE`].
    pub fn parse(record: &[u8]) -> Option<Self> {
        if record.len() < PDR_HEADER_SIZE {
            return None;
        }
        Some(Self {
            record_handle: le_u32(record, 0),
            version: record[4],
            pdr_type: record[5],
            record_change_number: le_u16(record, 6),
            data_length: le_u16(record, 8),
        })
    }

    /// Encode into a fresh 10-byte buffer.
    pub fn to_bytes(&self) -> [u8; PDR_HEADER_SIZE] {
        let mut buf = [0u8; PDR_HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.record_handle.to_le_bytes());
        buf[4] = self.version;
        buf[5] = self.pdr_type;
        buf[6..8].copy_from_slice(&self.record_change_number.to_le_bytes());
        buf[8..10].copy_from_slice(&self.data_length.to_le_bytes());
        buf
    }
}

/// Read the PDR type of `record`, if it has a complete header.
#[inline]
pub fn record_type(record: &[u8]) -> Option<u8> {
    PdrHeader::parse(record).map(|h| h.pdr_type)
}

/// Mutable view over a Terminus Locator PDR.
#[derive(Debug)]
pub struct TerminusLocatorPdr<'a> {
    bytes: &'a mut [u8],
}

impl<'a> TerminusLocatorPdr<'a> {
    /// Wrap `record` if it is a Terminus Locator long enough to reach the TID.
    pub fn new(record: &'a mut [u8]) -> Option<Self> {
        if record.len() < TERMINUS_LOCATOR_MIN_SIZE
            || record_type(record) != Some(pdr_type::TERMINUS_LOCATOR)
        {
            return None;
        }
        Some(Self { bytes: record })
    }

    /// Terminus handle assigned by the peer.
    pub fn terminus_handle(&self) -> u16 {
        le_u16(self.bytes, PDR_HEADER_SIZE)
    }

    /// Whether the peer marks this locator as valid.
    pub fn is_valid(&self) -> bool {
        self.bytes[TL_VALIDITY_OFFSET] == TL_PDR_VALID
    }

    pub fn tid(&self) -> u8 {
        self.bytes[TL_TID_OFFSET]
    }

    /// Overwrite the TID in place.
    pub fn set_tid(&mut self, tid: u8) {
        self.bytes[TL_TID_OFFSET] = tid;
    }
}

/// TID of `record` if it is a valid Terminus Locator PDR.
pub fn valid_terminus_locator_tid(record: &[u8]) -> Option<u8> {
    if record.len() < TERMINUS_LOCATOR_MIN_SIZE
        || record_type(record) != Some(pdr_type::TERMINUS_LOCATOR)
        || record[TL_VALIDITY_OFFSET] != TL_PDR_VALID
    {
        return None;
    }
    Some(record[TL_TID_OFFSET])
}

/// Build a Terminus Locator PDR for tests.
#[cfg(test)]
pub(crate) fn terminus_locator_fixture(handle: u32, valid: bool, tid: u8) -> Vec<u8> {
    let header = PdrHeader {
        record_handle: handle,
        version: 1,
        pdr_type: pdr_type::TERMINUS_LOCATOR,
        record_change_number: 0,
        data_length: 9,
    };
    let mut record = header.to_bytes().to_vec();
    record.extend_from_slice(&[0x01, 0x00]); // terminus handle
    record.push(u8::from(valid));
    record.push(tid);
    record.extend_from_slice(&[0x00, 0x00]); // container id
    record.push(0x01); // locator type: MCTP EID
    record.push(0x01);
    record.push(0x08); // EID
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_parse() {
        let record = [0x05, 0x00, 0x00, 0x00, 0x01, 0x02, 0x34, 0x12, 0x00, 0x00];
        let header = PdrHeader::parse(&record).unwrap();
        assert_eq!(header.record_handle, 5);
        assert_eq!(header.version, 1);
        assert_eq!(header.pdr_type, pdr_type::NUMERIC_SENSOR);
        assert_eq!(header.record_change_number, 0x1234);
        assert_eq!(header.data_length, 0);
        assert_eq!(header.to_bytes(), record);
    }

    #[test]
    fn test_header_too_short() {
        assert!(PdrHeader::parse(&[0u8; 9]).is_none());
        assert!(record_type(&[]).is_none());
    }

    #[test]
    fn test_terminus_locator_view() {
        let mut record = terminus_locator_fixture(1, true, 0x42);
        let mut view = TerminusLocatorPdr::new(&mut record).unwrap();
        assert!(view.is_valid());
        assert_eq!(view.tid(), 0x42);
        assert_eq!(view.terminus_handle(), 1);

        view.set_tid(9);
        assert_eq!(record[13], 9);
        assert_eq!(valid_terminus_locator_tid(&record), Some(9));
    }

    #[test]
    fn test_invalid_locator_has_no_tid() {
        let record = terminus_locator_fixture(1, false, 0x42);
        assert_eq!(valid_terminus_locator_tid(&record), None);
    }

    #[test]
    fn test_terminus_locator_rejects_short_or_wrong_type() {
        let mut record = terminus_locator_fixture(1, true, 0x42);
        record.truncate(TERMINUS_LOCATOR_MIN_SIZE - 1);
        assert!(TerminusLocatorPdr::new(&mut record).is_none());

        let mut record = terminus_locator_fixture(1, true, 0x42);
        record[5] = pdr_type::STATE_SENSOR;
        assert!(TerminusLocatorPdr::new(&mut record).is_none());
    }
}
