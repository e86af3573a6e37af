// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request/response transport and instance-id collaborators.
//!
//! The acquisition core only needs "send these bytes to terminus `tid`,
//! hand me the matching response or a failure". Correlation, per-exchange
//! timeout and retry on no-response belong to the [`Transport`]
//! implementation (typically an MCTP endpoint).
//!
//! Dropping a returned future abandons the exchange; the core relies on this
//! for cancellation.

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use dashmap::DashMap;

use crate::codec::MAX_INSTANCE_ID;
use crate::Tid;

/// Transport failure, opaque to the core beyond its description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No response after the transport's own retries.
    #[error("no response from TID {tid} after {attempts} attempt(s)")]
    NoResponse { tid: Tid, attempts: u8 },

    /// Response envelope could not be matched or was malformed.
    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),

    /// Terminus is not reachable on any bound transport.
    #[error("TID {0} is not reachable")]
    Unreachable(Tid),

    /// Any other transport-level failure.
    #[error("transport failure: {0}")]
    Other(String),
}

/// Message transport to PLDM termini.
pub trait Transport: Send + Sync {
    /// Send `request` to `tid` and resolve with the matching response.
    ///
    /// `timeout` bounds each attempt and `retry_count` is the number of
    /// additional attempts on no-response.
    fn send_receive(
        &self,
        tid: Tid,
        timeout: Duration,
        retry_count: u8,
        request: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn send_receive(
        &self,
        tid: Tid,
        timeout: Duration,
        retry_count: u8,
        request: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send {
        (**self).send_receive(tid, timeout, retry_count, request)
    }
}

/// Supplies the instance id carried in each request header.
pub trait InstanceIdSource: Send + Sync {
    /// Next instance id (0..=31) for an exchange with `tid`.
    fn next_instance_id(&self, tid: Tid) -> u8;
}

/// Per-terminus rolling instance id counter.
#[derive(Debug, Default)]
pub struct InstanceIdAllocator {
    counters: DashMap<Tid, AtomicU8>,
}

impl InstanceIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstanceIdSource for InstanceIdAllocator {
    fn next_instance_id(&self, tid: Tid) -> u8 {
        let counter = self.counters.entry(tid).or_insert_with(|| AtomicU8::new(0));
        let id = counter.fetch_add(1, Ordering::Relaxed);
        id & MAX_INSTANCE_ID
    }
}
