// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-entity records.
//!
//! Each remote entity owns a record holding its discovery state and a FIFO of
//! notifications waiting for delivery. The thread that finds the record idle
//! becomes its deliverer and drains the FIFO; other threads only enqueue.
//! Lock order is map shard, then record; a record lock is never held while a
//! listener runs or while the map is touched.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

#[cfg(feature = "security")]
use crate::info::ParticipantAuthenticationInfo;
use crate::info::{DiscoveryStatus, RemoteParticipantInfo, RemoteReaderInfo, RemoteWriterInfo};
use crate::guid::{EntityKind, GuidPrefix, GUID};

use super::state::EntityState;

/// A notification accepted by the state machine and waiting for its callback.
#[derive(Debug, Clone)]
pub(crate) enum Pending {
    Participant(RemoteParticipantInfo),
    Reader(RemoteReaderInfo),
    Writer(RemoteWriterInfo),
    #[cfg(feature = "security")]
    Authentication(ParticipantAuthenticationInfo),
}

impl Pending {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Pending::Participant(_) => "participant",
            Pending::Reader(_) => "reader",
            Pending::Writer(_) => "writer",
            #[cfg(feature = "security")]
            Pending::Authentication(_) => "authentication",
        }
    }
}

#[derive(Debug)]
pub(crate) struct EntityRecord {
    pub(crate) kind: EntityKind,
    pub(crate) state: EntityState,
    pub(crate) pending: VecDeque<Pending>,
    /// A thread is currently draining `pending`.
    pub(crate) delivering: bool,
    /// Last accepted reader/writer record, replayed as REMOVED when the owner
    /// participant goes away.
    pub(crate) announced: Option<Pending>,
}

impl EntityRecord {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            state: EntityState::Unknown,
            pending: VecDeque::new(),
            delivering: false,
            announced: None,
        }
    }

    fn is_idle(&self) -> bool {
        !self.delivering && self.pending.is_empty()
    }

    /// REMOVED notification for this endpoint built from its last announcement.
    pub(crate) fn removal_notice(&self) -> Option<Pending> {
        match self.announced.as_ref()? {
            Pending::Reader(info) => Some(Pending::Reader(
                info.clone().with_status(DiscoveryStatus::Removed),
            )),
            Pending::Writer(info) => Some(Pending::Writer(
                info.clone().with_status(DiscoveryStatus::Removed),
            )),
            _ => None,
        }
    }
}

pub(crate) type RecordSlot = Arc<Mutex<EntityRecord>>;

/// Records of every remote entity the notifier has seen.
#[derive(Debug, Default)]
pub(crate) struct EntityTable {
    records: DashMap<GUID, RecordSlot>,
}

impl EntityTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record for `guid`, created in `Unknown` state if absent.
    pub(crate) fn slot(&self, guid: GUID, kind: EntityKind) -> RecordSlot {
        Arc::clone(
            &*self
                .records
                .entry(guid)
                .or_insert_with(|| Arc::new(Mutex::new(EntityRecord::new(kind)))),
        )
    }

    pub(crate) fn get(&self, guid: &GUID) -> Option<RecordSlot> {
        self.records.get(guid).map(|entry| Arc::clone(&*entry))
    }

    pub(crate) fn state(&self, guid: &GUID) -> EntityState {
        self.get(guid)
            .map_or(EntityState::Unknown, |slot| slot.lock().state)
    }

    /// Drop the record of a removed (or never-announced) entity once nobody
    /// else holds it.
    ///
    /// `slot` is the caller's own handle, hence the expected count of two.
    /// Retiring a removed participant also drops the idle, no longer alive
    /// endpoint records it owned.
    pub(crate) fn retire_if_stale(&self, guid: &GUID, slot: &RecordSlot) -> bool {
        let mut was_removed = false;
        let retired = self
            .records
            .remove_if(guid, |_, stored| {
                if !Arc::ptr_eq(stored, slot) || Arc::strong_count(stored) != 2 {
                    return false;
                }
                let record = stored.lock();
                was_removed = record.state == EntityState::Removed;
                (was_removed || record.state == EntityState::Unknown) && record.is_idle()
            })
            .is_some();

        if retired && was_removed && guid.is_participant() {
            self.retire_endpoints_of(guid.prefix);
        }
        retired
    }

    fn retire_endpoints_of(&self, prefix: GuidPrefix) {
        self.records.retain(|guid, stored| {
            if guid.prefix != prefix || guid.is_participant() {
                return true;
            }
            // Someone is about to notify this endpoint; keep it.
            if Arc::strong_count(stored) > 1 {
                return true;
            }
            let record = stored.lock();
            record.state.is_alive() || !record.is_idle()
        });
    }

    /// Reader and writer records owned by `prefix`.
    pub(crate) fn endpoints_of(&self, prefix: GuidPrefix) -> Vec<(GUID, RecordSlot)> {
        self.records
            .iter()
            .filter(|entry| entry.key().prefix == prefix && !entry.key().is_participant())
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect()
    }

    /// Mark every record owned by `prefix` as ignored and drop queued events.
    ///
    /// Removed records keep their state so they can still retire.
    pub(crate) fn ignore_participant(&self, prefix: GuidPrefix) {
        let slots: Vec<RecordSlot> = self
            .records
            .iter()
            .filter(|entry| entry.key().prefix == prefix)
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for slot in slots {
            let mut record = slot.lock();
            if record.state != EntityState::Removed {
                record.state = EntityState::Ignored;
            }
            record.pending.clear();
        }
    }

    /// GUIDs of participants whose last delivered state is alive.
    pub(crate) fn alive_participants(&self) -> Vec<GUID> {
        let slots: Vec<(GUID, RecordSlot)> = self
            .records
            .iter()
            .filter(|entry| entry.key().is_participant())
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let mut alive: Vec<GUID> = slots
            .into_iter()
            .filter(|(_, slot)| slot.lock().state.is_alive())
            .map(|(guid, _)| guid)
            .collect();
        alive.sort();
        alive
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}
