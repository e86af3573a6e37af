// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use pldm_pdr::transfer::{MultipartTransfer, TransferLimits};
use pldm_pdr::Fragment;

const LIMITS: TransferLimits = TransferLimits {
    largest_record_size: 512,
    max_round_trips: 16,
    request_count: 52,
};

fuzz_target!(|data: &[u8]| {
    // Input is a sequence of length-prefixed GetPDR responses
    let mut transfer = MultipartTransfer::new(1, LIMITS);
    let mut rest = data;
    while let Some((&len, tail)) = rest.split_first() {
        let len = usize::from(len).min(tail.len());
        let (response, tail) = tail.split_at(len);
        rest = tail;

        let Ok(fragment) = Fragment::interpret(response) else {
            continue;
        };
        match transfer.on_fragment(fragment) {
            Ok(Some(record)) => {
                assert!(record.data.len() <= LIMITS.largest_record_size);
                break;
            }
            Ok(None) => assert!(transfer.round_trips() < LIMITS.max_round_trips),
            Err(_) => break,
        }
    }
});
