// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multipart record transfer: response interpretation and reassembly.

mod engine;
mod fragment;

pub use engine::{
    fetch_record, CompletedRecord, MultipartTransfer, TransferLimits, TransferPhase, TransferState,
};
pub use fragment::Fragment;
