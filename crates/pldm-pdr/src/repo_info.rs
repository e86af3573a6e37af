// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! GetPDRRepositoryInfo handshake.

use std::time::Duration;

use crate::codec::platform::{
    decode_get_pdr_repository_info_resp, encode_get_pdr_repository_info_req,
    PdrRepositoryInfoResp, TIMESTAMP104_SIZE,
};
use crate::error::ExchangeError;
use crate::requester::Requester;
use crate::transport::Transport;

/// Repository state reported by the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryState {
    Available,
    Updating,
    Failed,
    /// Any value DSP0248 does not define.
    Unknown(u8),
}

impl From<u8> for RepositoryState {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Available,
            1 => Self::Updating,
            2 => Self::Failed,
            other => Self::Unknown(other),
        }
    }
}

/// Snapshot of the peer repository, fixed for one acquisition pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub state: RepositoryState,
    pub update_time: [u8; TIMESTAMP104_SIZE],
    pub oem_update_time: [u8; TIMESTAMP104_SIZE],
    pub record_count: u32,
    /// Total repository size in bytes.
    pub repository_size: u32,
    /// Size of the largest record in bytes.
    pub largest_record_size: u32,
    /// How long the peer keeps a data transfer handle valid.
    pub transfer_timeout: Duration,
}

impl From<PdrRepositoryInfoResp> for RepositoryInfo {
    fn from(resp: PdrRepositoryInfoResp) -> Self {
        Self {
            state: RepositoryState::from(resp.repository_state),
            update_time: resp.update_time,
            oem_update_time: resp.oem_update_time,
            record_count: resp.record_count,
            repository_size: resp.repository_size,
            largest_record_size: resp.largest_record_size,
            transfer_timeout: Duration::from_secs(u64::from(resp.data_transfer_handle_timeout)),
        }
    }
}

/// Fetch the peer's repository info in a single exchange.
///
/// No retry at this layer; the transport already retried on no-response.
pub async fn fetch_repository_info<T: Transport>(
    requester: &Requester<'_, T>,
) -> Result<RepositoryInfo, ExchangeError> {
    let tid = requester.tid();
    let response = requester
        .exchange("GetPDRRepositoryInfo", encode_get_pdr_repository_info_req)
        .await?;

    let info = decode_get_pdr_repository_info_resp(&response).map_err(|e| {
        log::error!("[pdr] TID {}: GetPDRRepositoryInfo decode failed: {}", tid, e);
        ExchangeError::Decode(e)
    })?;
    let info = RepositoryInfo::from(info);

    log::info!("[pdr] TID {}: GetPDRRepositoryInfo success", tid);
    log::debug!(
        "[pdr] TID {}: state={:?} records={} size={} largest={} transfer_timeout={:?}",
        tid,
        info.state,
        info.record_count,
        info.repository_size,
        info.largest_record_size,
        info.transfer_timeout
    );

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_wire() {
        assert_eq!(RepositoryState::from(0), RepositoryState::Available);
        assert_eq!(RepositoryState::from(1), RepositoryState::Updating);
        assert_eq!(RepositoryState::from(2), RepositoryState::Failed);
        assert_eq!(RepositoryState::from(7), RepositoryState::Unknown(7));
    }

    #[test]
    fn test_info_from_response() {
        let resp = PdrRepositoryInfoResp {
            repository_state: 1,
            update_time: [0; TIMESTAMP104_SIZE],
            oem_update_time: [0; TIMESTAMP104_SIZE],
            record_count: 12,
            repository_size: 900,
            largest_record_size: 120,
            data_transfer_handle_timeout: 3,
        };
        let info = RepositoryInfo::from(resp);
        assert_eq!(info.state, RepositoryState::Updating);
        assert_eq!(info.record_count, 12);
        assert_eq!(info.largest_record_size, 120);
        assert_eq!(info.transfer_timeout, Duration::from_secs(3));
    }
}
