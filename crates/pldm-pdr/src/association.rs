// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Association path registry.
//!
//! Maps a terminus to the inventory path its sensors are associated with
//! when exposed to other software. Acquisition never reads or writes it.

use dashmap::DashMap;

use crate::Tid;

/// TID to association path.
#[derive(Debug, Default)]
pub struct AssociationRegistry {
    paths: DashMap<Tid, String>,
}

impl AssociationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Association path of `tid`, empty if none was set.
    pub fn get_path(&self, tid: Tid) -> String {
        self.paths
            .get(&tid)
            .map(|path| path.value().clone())
            .unwrap_or_default()
    }

    /// Set the association path of `tid`.
    pub fn set_path(&self, tid: Tid, path: impl Into<String>) {
        self.paths.insert(tid, path.into());
    }

    /// Forget `tid`, returning its path.
    pub fn remove(&self, tid: Tid) -> Option<String> {
        self.paths.remove(&tid).map(|(_, path)| path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tid_has_empty_path() {
        let registry = AssociationRegistry::new();
        assert_eq!(registry.get_path(4), "");
    }

    #[test]
    fn test_set_get_remove() {
        let registry = AssociationRegistry::new();
        registry.set_path(4, "/xyz/openbmc_project/inventory/system/board/baseboard");
        assert_eq!(
            registry.get_path(4),
            "/xyz/openbmc_project/inventory/system/board/baseboard"
        );

        registry.set_path(4, "/inventory/other");
        assert_eq!(registry.get_path(4), "/inventory/other");

        assert_eq!(registry.remove(4).as_deref(), Some("/inventory/other"));
        assert_eq!(registry.get_path(4), "");
    }
}
