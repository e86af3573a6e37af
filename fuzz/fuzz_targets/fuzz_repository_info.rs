// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use pldm_pdr::codec::platform::{decode_get_pdr_repository_info_resp, GetPdrRequest};
use pldm_pdr::RepositoryInfo;

fuzz_target!(|data: &[u8]| {
    if let Ok(resp) = decode_get_pdr_repository_info_resp(data) {
        let _ = RepositoryInfo::from(resp);
    }

    let _ = GetPdrRequest::decode(data);
});
