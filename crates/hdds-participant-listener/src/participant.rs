// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handle to the local participant that produced a discovery event.
//!
//! One process may host several participants, so every callback receives the
//! `LocalParticipant` it belongs to. The handle is cheap to clone and exposes
//! the ignore operations a listener may call back into, even from inside a
//! callback.

use std::sync::Arc;

use dashmap::DashSet;

use crate::guid::{GuidPrefix, GUID};

/// Remote identities the local participant refuses to match.
///
/// Participants are ignored by GUID prefix (covering all of their endpoints),
/// readers and writers by full GUID.
#[derive(Debug, Default)]
pub struct IgnoreList {
    participants: DashSet<GuidPrefix>,
    endpoints: DashSet<GUID>,
}

impl IgnoreList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the prefix was not ignored before.
    pub fn ignore_participant(&self, prefix: GuidPrefix) -> bool {
        self.participants.insert(prefix)
    }

    /// Returns `true` if the endpoint was not ignored before.
    pub fn ignore_endpoint(&self, guid: GUID) -> bool {
        self.endpoints.insert(guid)
    }

    pub fn unignore_participant(&self, prefix: &GuidPrefix) -> bool {
        self.participants.remove(prefix).is_some()
    }

    pub fn unignore_endpoint(&self, guid: &GUID) -> bool {
        self.endpoints.remove(guid).is_some()
    }

    /// True if `guid` or its owning participant is ignored.
    pub fn is_ignored(&self, guid: &GUID) -> bool {
        self.participants.contains(&guid.prefix) || self.endpoints.contains(guid)
    }

    pub fn ignored_participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn ignored_endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}

#[derive(Debug)]
struct ParticipantInner {
    guid: GUID,
    name: String,
    domain_id: u32,
    ignore_list: Arc<IgnoreList>,
}

/// The local participant a notification belongs to.
#[derive(Debug, Clone)]
pub struct LocalParticipant {
    inner: Arc<ParticipantInner>,
}

impl LocalParticipant {
    /// Create a handle for the local participant identified by `prefix`.
    pub fn new(prefix: GuidPrefix, name: impl Into<String>, domain_id: u32) -> Self {
        Self {
            inner: Arc::new(ParticipantInner {
                guid: GUID::participant(prefix),
                name: name.into(),
                domain_id,
                ignore_list: Arc::new(IgnoreList::new()),
            }),
        }
    }

    pub fn guid(&self) -> GUID {
        self.inner.guid
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn domain_id(&self) -> u32 {
        self.inner.domain_id
    }

    /// Ignore a remote participant and everything it owns.
    ///
    /// Safe to call from inside a listener callback.
    pub fn ignore_participant(&self, guid: &GUID) -> bool {
        let added = self.inner.ignore_list.ignore_participant(guid.prefix);
        if added {
            log::info!("[participant] {} now ignores participant {}", self.inner.name, guid);
        }
        added
    }

    /// Ignore a single remote reader or writer.
    pub fn ignore_endpoint(&self, guid: &GUID) -> bool {
        let added = self.inner.ignore_list.ignore_endpoint(*guid);
        if added {
            log::info!("[participant] {} now ignores endpoint {}", self.inner.name, guid);
        }
        added
    }

    /// Lift a participant ignore; later announcements start a fresh lifecycle.
    pub fn unignore_participant(&self, guid: &GUID) -> bool {
        self.inner.ignore_list.unignore_participant(&guid.prefix)
    }

    pub fn unignore_endpoint(&self, guid: &GUID) -> bool {
        self.inner.ignore_list.unignore_endpoint(guid)
    }

    pub fn is_ignored(&self, guid: &GUID) -> bool {
        self.inner.ignore_list.is_ignored(guid)
    }

    /// True if `guid` belongs to this participant.
    pub fn is_local(&self, guid: &GUID) -> bool {
        guid.prefix == self.inner.guid.prefix
    }

    /// Entries currently ignored, shared by every clone of this handle.
    pub fn ignore_list(&self) -> &IgnoreList {
        &self.inner.ignore_list
    }
}

impl PartialEq for LocalParticipant {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for LocalParticipant {}
