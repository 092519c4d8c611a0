// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! QoS snapshots carried in discovery notifications.
//!
//! These are read-only copies of what a remote entity announced. Matching and
//! compatibility checks happen elsewhere; the listener only observes them.

use std::time::Duration;

/// Default participant lease duration (RTPS 9.6.2.2, 100 s).
pub const DEFAULT_LEASE_DURATION: Duration = Duration::from_secs(100);

/// Reliability policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reliability {
    /// Fire-and-forget (no ACKs, no retransmission)
    #[default]
    BestEffort,
    /// Reliable delivery with NACK-driven retransmission
    Reliable,
}

/// Durability policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Durability {
    /// No persistence (samples lost on writer crash)
    #[default]
    Volatile,
    /// Writer caches samples for late-joiners
    TransientLocal,
    /// Samples survive the writer
    Transient,
    /// Samples persisted to disk
    Persistent,
}

/// History policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum History {
    /// Keep last N samples
    KeepLast(u32),
    /// Keep all samples within resource limits
    KeepAll,
}

impl Default for History {
    fn default() -> Self {
        History::KeepLast(1)
    }
}

/// Participant QoS announced in SPDP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantQos {
    /// Lease after which a silent participant is removed.
    pub lease_duration: Duration,
    /// USER_DATA policy value.
    pub user_data: Vec<u8>,
    /// Property list (name, value) propagated with the participant.
    pub properties: Vec<(String, String)>,
}

impl Default for ParticipantQos {
    fn default() -> Self {
        Self {
            lease_duration: DEFAULT_LEASE_DURATION,
            user_data: Vec::new(),
            properties: Vec::new(),
        }
    }
}

impl ParticipantQos {
    /// Look up a propagated property by name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Endpoint QoS announced in SEDP for a remote reader or writer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndpointQos {
    pub reliability: Reliability,
    pub durability: Durability,
    pub history: History,
    /// PARTITION names; empty means the default partition.
    pub partitions: Vec<String>,
    /// USER_DATA policy value.
    pub user_data: Vec<u8>,
    /// OWNERSHIP_STRENGTH (writers only).
    pub ownership_strength: Option<i32>,
}

impl EndpointQos {
    /// Reliable + TransientLocal, the usual pairing for state topics.
    #[must_use]
    pub fn reliable_transient_local() -> Self {
        Self {
            reliability: Reliability::Reliable,
            durability: Durability::TransientLocal,
            ..Self::default()
        }
    }

    /// True if the endpoint keeps data for late joiners.
    pub fn is_durable(&self) -> bool {
        !matches!(self.durability, Durability::Volatile)
    }
}
