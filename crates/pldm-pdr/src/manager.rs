// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-terminus PDR acquisition.
//!
//! ```text
//! GetPDRRepositoryInfo -> state Available? -> record_count > 0?
//!     -> walk handle chain (GetPDR, multipart) -> Terminus Locator policy
//!     -> swap in new RepositoryStore -> record count
//! ```
//!
//! Every step fails fast. The published store changes only in the final
//! swap, so a failed or cancelled acquisition leaves readers on the previous
//! store.

use std::sync::Arc;

use crate::builder::build_batch;
use crate::config::{ConfigError, PdrConfig};
use crate::error::{Error, Result};
use crate::policy::{self, PolicyState};
use crate::repo_info::{fetch_repository_info, RepositoryState};
use crate::requester::Requester;
use crate::store::{RepositoryStore, SharedRepository};
use crate::transport::{InstanceIdSource, Transport};
use crate::Tid;

/// PDR manager for one terminus.
pub struct PdrManager<T: Transport> {
    tid: Tid,
    transport: T,
    instance_ids: Arc<dyn InstanceIdSource>,
    config: Arc<PdrConfig>,
    repository: SharedRepository,
}

impl<T: Transport> PdrManager<T> {
    /// Manager for `tid`, rejecting a config that fails [`PdrConfig::validate`].
    pub fn new(
        tid: Tid,
        transport: T,
        instance_ids: Arc<dyn InstanceIdSource>,
        config: Arc<PdrConfig>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tid,
            transport,
            instance_ids,
            config,
            repository: SharedRepository::new(tid),
        })
    }

    #[inline]
    pub fn tid(&self) -> Tid {
        self.tid
    }

    /// Snapshot of the terminus repository as last committed.
    pub fn repository(&self) -> Arc<RepositoryStore> {
        self.repository.load()
    }

    /// Fetch the terminus repository and publish it.
    ///
    /// Returns the number of committed records. On error the previously
    /// published repository is left in place.
    pub async fn acquire_repository(&self) -> Result<u32> {
        let tid = self.tid;
        let requester = Requester::new(
            tid,
            &self.transport,
            self.instance_ids.as_ref(),
            &self.config,
        );

        let info = fetch_repository_info(&requester)
            .await
            .map_err(|source| Error::InfoUnavailable { tid, source })?;

        if info.state != RepositoryState::Available {
            log::warn!(
                "[pdr] TID {}: device PDR repository unavailable ({:?})",
                tid,
                info.state
            );
            return Err(Error::RepositoryNotAvailable {
                tid,
                state: info.state,
            });
        }
        if info.record_count == 0 {
            log::warn!("[pdr] TID {}: no PDR records to fetch", tid);
            return Err(Error::EmptyRepository { tid });
        }

        let mut batch = build_batch(&requester, info.record_count, info.largest_record_size).await?;

        let mut policy_state = PolicyState::default();
        policy::apply(&mut batch, tid, &mut policy_state)?;

        let reported = info.record_count;
        let store = RepositoryStore::from_batch(tid, info, batch);
        let fetched = store.record_count();
        if fetched == 0 {
            log::error!("[pdr] TID {}: no PDR records added to repository", tid);
            return Err(Error::NothingCommitted { tid, reported });
        }

        self.repository.replace(store);
        log::info!(
            "[pdr] TID {}: GetPDR success, {} records fetched out of {}",
            tid,
            fetched,
            reported
        );
        Ok(fetched)
    }
}
