// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One request/response exchange with a terminus.

use crate::codec::CodecError;
use crate::config::PdrConfig;
use crate::error::ExchangeError;
use crate::transport::{InstanceIdSource, Transport};
use crate::Tid;

/// Everything needed to talk to one terminus during one acquisition.
///
/// Borrowed for the duration of the acquisition; holds no state of its own
/// so concurrent acquisitions never share anything through it.
pub struct Requester<'a, T: Transport> {
    tid: Tid,
    transport: &'a T,
    instance_ids: &'a dyn InstanceIdSource,
    config: &'a PdrConfig,
}

impl<'a, T: Transport> Requester<'a, T> {
    pub fn new(
        tid: Tid,
        transport: &'a T,
        instance_ids: &'a dyn InstanceIdSource,
        config: &'a PdrConfig,
    ) -> Self {
        Self {
            tid,
            transport,
            instance_ids,
            config,
        }
    }

    #[inline]
    pub fn tid(&self) -> Tid {
        self.tid
    }

    #[inline]
    pub fn config(&self) -> &PdrConfig {
        self.config
    }

    /// Encode a request with a fresh instance id, send it and await the response.
    ///
    /// `command` is only used for logging.
    pub async fn exchange<F>(&self, command: &str, encode: F) -> Result<Vec<u8>, ExchangeError>
    where
        F: FnOnce(u8) -> Result<Vec<u8>, CodecError>,
    {
        let instance_id = self.instance_ids.next_instance_id(self.tid);
        let request = encode(instance_id).map_err(|e| {
            log::error!("[pdr] TID {}: {} request encode failed: {}", self.tid, command, e);
            ExchangeError::Encode(e)
        })?;

        self.transport
            .send_receive(
                self.tid,
                self.config.command_timeout(),
                self.config.command_retry_count,
                request,
            )
            .await
            .map_err(|e| {
                log::error!("[pdr] TID {}: failed to send {} request: {}", self.tid, command, e);
                ExchangeError::Transport(e)
            })
    }
}
