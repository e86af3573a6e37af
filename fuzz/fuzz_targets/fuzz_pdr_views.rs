// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use pldm_pdr::pdr::{record_type, valid_terminus_locator_tid, PdrHeader, TerminusLocatorPdr};
use pldm_pdr::policy::apply_terminus_locator_policy;
use pldm_pdr::RecordBatch;

fuzz_target!(|data: &[u8]| {
    let _ = PdrHeader::parse(data);
    let _ = record_type(data);
    let _ = valid_terminus_locator_tid(data);

    let mut record = data.to_vec();
    if let Some(mut locator) = TerminusLocatorPdr::new(&mut record) {
        let _ = locator.terminus_handle();
        locator.set_tid(0x0B);
    }

    // Split into records at every 0xFF byte and run the locator policy
    let mut batch = RecordBatch::new();
    for (handle, chunk) in data.split(|&b| b == 0xFF).enumerate() {
        batch.insert(handle as u32 + 1, chunk.to_vec());
    }
    let _ = apply_terminus_locator_policy(&mut batch, 0x0B);
});
