// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use pldm_pdr::codec::platform::decode_get_pdr_resp;
use pldm_pdr::Fragment;

fuzz_target!(|data: &[u8]| {
    // Fixed fields only
    let _ = decode_get_pdr_resp(data, &mut []);

    // Undersized and oversized record buffers
    let mut small = [0u8; 8];
    let _ = decode_get_pdr_resp(data, &mut small);
    let mut large = vec![0u8; data.len()];
    let _ = decode_get_pdr_resp(data, &mut large);

    // Two-pass interpretation used by the transfer engine
    if let Ok(fragment) = Fragment::interpret(data) {
        assert!(fragment.payload.len() <= data.len());
    }
});
