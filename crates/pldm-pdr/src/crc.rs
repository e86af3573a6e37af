// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CRC-8 checksum over reassembled PDR records.
//!
//! The final `End` fragment of a multipart GetPDR transfer carries a
//! one-byte CRC computed over the whole record. The algorithm is fixed by
//! DSP0248 and not configurable.
//!
//! # Parameters (CRC-8)
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | Polynomial | 0x07 |
//! | Init | 0x00 |
//! | RefIn | false |
//! | RefOut | false |
//! | XorOut | 0x00 |
//!
//! # Test Vector
//!
//! ```
//! use pldm_pdr::crc::crc8;
//!
//! // Standard test vector: "123456789" -> 0xF4
//! assert_eq!(crc8(b"123456789"), 0xF4);
//! ```

/// CRC-8 polynomial (x^8 + x^2 + x + 1).
const POLY: u8 = 0x07;

/// Initial value for CRC calculation.
const INIT: u8 = 0x00;

/// Precomputed lookup table, generated at compile time.
const CRC_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut j = 0;
        while j < 8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Calculate the CRC-8 of `data`.
#[inline]
#[must_use]
pub fn crc8(data: &[u8]) -> u8 {
    crc8_update(INIT, data)
}

/// Continue a CRC-8 computation with more data.
#[inline]
#[must_use]
pub fn crc8_update(crc: u8, data: &[u8]) -> u8 {
    data.iter()
        .fold(crc, |crc, &byte| CRC_TABLE[(crc ^ byte) as usize])
}

/// Check an assembled record buffer against the CRC supplied by the peer.
#[inline]
#[must_use]
pub fn verify(buffer: &[u8], expected: u8) -> bool {
    crc8(buffer) == expected
}
