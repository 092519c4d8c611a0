// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-entity discovery state machine.
//!
//! ```text
//!            Discovered          ChangedQos
//! Unknown ─────────────▶ Discovered ─────────▶ ChangedQos ──┐
//!    ▲                      │                   │  ▲        │ ChangedQos
//!    │                      │ Removed   Removed │  └────────┘
//!    │                      ▼                   ▼
//!    │                   Removed ◀──────────────┘
//!    │                      │ Discovered (new instance)
//!    │                      ▼
//!    │                   Discovered
//!    │
//! Ignored ── Discovered (after un-ignore) ──▶ Discovered
//! ```

use crate::info::DiscoveryStatus;

/// Discovery state the notifier keeps for one remote entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityState {
    /// Never announced (or record retired).
    #[default]
    Unknown,
    Discovered,
    ChangedQos,
    /// Left the domain; only a fresh announcement is accepted.
    Removed,
    /// Vetoed by the listener; all notifications are suppressed.
    Ignored,
}

impl EntityState {
    /// True while the entity is alive and matchable.
    pub fn is_alive(self) -> bool {
        matches!(self, EntityState::Discovered | EntityState::ChangedQos)
    }

    /// State after applying `status`, or `None` if the transition is illegal.
    #[must_use]
    pub fn apply(self, status: DiscoveryStatus) -> Option<EntityState> {
        use DiscoveryStatus as S;
        use EntityState as E;

        match (self, status) {
            (E::Unknown | E::Removed | E::Ignored, S::Discovered) => Some(E::Discovered),
            (E::Discovered | E::ChangedQos, S::ChangedQos) => Some(E::ChangedQos),
            (E::Discovered | E::ChangedQos, S::Removed) => Some(E::Removed),
            _ => None,
        }
    }
}
