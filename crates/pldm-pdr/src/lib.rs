// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # pldm-pdr - PLDM Platform Data Record acquisition
//!
//! Management-controller side client that pulls a terminus's catalog of
//! Platform Data Records (PDRs, DSP0248) over a message transport and
//! assembles it into a per-terminus repository for sensor and inventory
//! code to query.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pldm_pdr::{InstanceIdAllocator, PdrConfig, PdrManager, Transport};
//!
//! # async fn run<T: Transport>(transport: T) -> Result<(), Box<dyn std::error::Error>> {
//! let manager = PdrManager::new(
//!     0x0B,
//!     transport,
//!     Arc::new(InstanceIdAllocator::new()),
//!     Arc::new(PdrConfig::default()),
//! )?;
//!
//! let count = manager.acquire_repository().await?;
//! let repo = manager.repository();
//! assert_eq!(repo.record_count(), count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |  PdrManager::acquire_repository                              |
//! |    repo_info -> builder -> policy -> store (ArcSwap publish) |
//! +--------------------------------------------------------------+
//! |  transfer: Fragment::interpret + MultipartTransfer + crc8    |
//! +--------------------------------------------------------------+
//! |  codec: PLDM header, GetPDRRepositoryInfo, GetPDR            |
//! +--------------------------------------------------------------+
//! |  Transport (external: MCTP, timeouts, retries)               |
//! +--------------------------------------------------------------+
//! ```
//!
//! Records supplied by the peer are never trusted: declared lengths are
//! checked against the bytes actually received, each record is bounded by
//! the peer's own largest-record declaration and a round-trip limit, and a
//! record that fails any check fails the whole acquisition.

pub mod association;
pub mod builder;
pub mod codec;
pub mod config;
pub mod crc;
pub mod error;
pub mod manager;
pub mod pdr;
pub mod policy;
pub mod repo_info;
pub mod requester;
pub mod store;
pub mod transfer;
pub mod transport;

/// PLDM terminus id.
pub type Tid = u8;

/// Peer-assigned PDR record handle; 0 means "no record" / "first record".
pub type RecordHandle = u32;

pub use association::AssociationRegistry;
pub use builder::{build_batch, RawRecord, RecordBatch};
pub use config::{ConfigError, PdrConfig};
pub use error::{Error, ErrorKind, ExchangeError, RecordError, Result};
pub use manager::PdrManager;
pub use repo_info::{fetch_repository_info, RepositoryInfo, RepositoryState};
pub use requester::Requester;
pub use store::{RepositoryStore, SharedRepository};
pub use transfer::{fetch_record, CompletedRecord, Fragment, MultipartTransfer, TransferPhase};
pub use transport::{InstanceIdAllocator, InstanceIdSource, Transport, TransportError};
