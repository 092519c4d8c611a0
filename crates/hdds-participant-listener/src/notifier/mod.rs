// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery notifier.
//!
//! The bridge between the discovery protocol and the application listener.
//! The protocol reports every state change of a remote entity through one of
//! the `notify_*` methods; the notifier validates it against the entity's
//! state machine, applies the ignore list and delivers the callback.
//!
//! # Delivery guarantees
//!
//! - Notifications for one entity reach the listener in the order they were
//!   accepted, one at a time, exactly once.
//! - Notifications for different entities may be delivered concurrently.
//! - No notifier lock is held while a callback runs. A callback may call back
//!   into the notifier or the `LocalParticipant`; a notification for the entity
//!   it is handling is queued and delivered after it returns.
//! - A panicking callback is logged, counted and treated as `Decision::Accept`.
//! - When a participant is removed, each of its readers and writers still
//!   alive gets its own REMOVED callback before the participant's.

mod metrics;
mod state;
mod table;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::config::{CallbackMode, NotifierConfig};
use crate::error::{Error, Result};
use crate::guid::{EntityKind, GUID};
#[cfg(feature = "security")]
use crate::info::ParticipantAuthenticationInfo;
use crate::info::{DiscoveryStatus, RemoteParticipantInfo, RemoteReaderInfo, RemoteWriterInfo};
use crate::listener::{Decision, ParticipantListener};
use crate::name::String255;
use crate::participant::LocalParticipant;
use crate::xtypes::{
    SampleIdentity, TypeDiscovery, TypeIdentifierWithSize, TypeInformation, TypeResolutionEvent,
};

pub use metrics::{MetricsSnapshot, NotifierMetrics};
pub use state::EntityState;

use table::{EntityTable, Pending, RecordSlot};

/// What happened to a notification handed to the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The listener ran; carries its decision (`Accept` for plain callbacks).
    Delivered(Decision),
    /// Another callback for the same entity is running; this one is queued
    /// and will be delivered by that thread.
    Deferred,
    /// Dropped: ignored entity, local entity, or endpoint of a participant
    /// that is not alive.
    Suppressed,
    /// Accepted, but no listener is installed.
    NoListener,
}

impl Delivery {
    pub fn decision(self) -> Option<Decision> {
        match self {
            Delivery::Delivered(decision) => Some(decision),
            _ => None,
        }
    }
}

/// Installed listener.
struct ListenerSlot {
    listener: Arc<dyn ParticipantListener>,
}

/// Delivers discovery events of one local participant to its listener.
pub struct DiscoveryNotifier {
    participant: LocalParticipant,
    config: NotifierConfig,
    listener: ArcSwapOption<ListenerSlot>,
    table: EntityTable,
    metrics: Arc<NotifierMetrics>,
}

impl DiscoveryNotifier {
    pub fn new(participant: LocalParticipant, config: NotifierConfig) -> Self {
        log::debug!(
            "[notifier] created for {} ({}) mode={:?} self={}",
            participant.name(),
            participant.guid(),
            config.callback_mode,
            config.notify_self_discovery
        );
        Self {
            participant,
            config,
            listener: ArcSwapOption::empty(),
            table: EntityTable::new(),
            metrics: Arc::new(NotifierMetrics::new()),
        }
    }

    /// Create with a listener already installed.
    pub fn with_listener(
        participant: LocalParticipant,
        config: NotifierConfig,
        listener: Arc<dyn ParticipantListener>,
    ) -> Self {
        let notifier = Self::new(participant, config);
        notifier.set_listener(listener);
        notifier
    }

    /// Install or replace the listener.
    ///
    /// Callbacks already running finish on the previous listener.
    pub fn set_listener(&self, listener: Arc<dyn ParticipantListener>) {
        self.listener.store(Some(Arc::new(ListenerSlot { listener })));
    }

    /// Remove the listener. Entity state keeps advancing without it.
    pub fn clear_listener(&self) {
        self.listener.store(None);
    }

    pub fn has_listener(&self) -> bool {
        self.listener.load().is_some()
    }

    pub fn participant(&self) -> &LocalParticipant {
        &self.participant
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<NotifierMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Last accepted state of a remote entity.
    pub fn entity_state(&self, guid: &GUID) -> EntityState {
        if self.participant.is_ignored(guid) {
            return EntityState::Ignored;
        }
        self.table.state(guid)
    }

    /// Remote participants currently alive and not ignored, sorted by GUID.
    pub fn known_participants(&self) -> Vec<GUID> {
        let mut alive = self.table.alive_participants();
        alive.retain(|guid| !self.participant.is_ignored(guid));
        alive
    }

    // ------------------------------------------------------------------
    // Entity discovery
    // ------------------------------------------------------------------

    /// Report a remote participant state change.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidTransition` if the status does not follow the
    ///   participant's recorded state.
    /// - `Error::EntityKindMismatch` if the GUID is known as another kind.
    pub fn notify_participant(&self, info: RemoteParticipantInfo) -> Result<Delivery> {
        crate::trace_fn!("DiscoveryNotifier::notify_participant");
        let guid = info.guid();
        let status = info.status();
        self.submit(guid, EntityKind::Participant, Some(status), Pending::Participant(info))
    }

    /// Report a remote reader state change.
    ///
    /// A reader announced by a participant that is not alive is suppressed, as
    /// is a late update or removal of a reader already removed together with
    /// its participant.
    ///
    /// # Errors
    ///
    /// Same as `notify_participant`.
    pub fn notify_reader(&self, info: RemoteReaderInfo) -> Result<Delivery> {
        crate::trace_fn!("DiscoveryNotifier::notify_reader");
        let guid = info.guid();
        let status = info.status();
        if !self.owner_accepts(&guid, status) {
            return Ok(Delivery::Suppressed);
        }
        self.submit(guid, RemoteReaderInfo::KIND, Some(status), Pending::Reader(info))
    }

    /// Report a remote writer state change.
    ///
    /// # Errors
    ///
    /// Same as `notify_participant`.
    pub fn notify_writer(&self, info: RemoteWriterInfo) -> Result<Delivery> {
        crate::trace_fn!("DiscoveryNotifier::notify_writer");
        let guid = info.guid();
        let status = info.status();
        if !self.owner_accepts(&guid, status) {
            return Ok(Delivery::Suppressed);
        }
        self.submit(guid, RemoteWriterInfo::KIND, Some(status), Pending::Writer(info))
    }

    /// Report the outcome of an authentication handshake.
    ///
    /// Serialized with the participant's discovery callbacks but does not
    /// change its discovery state.
    ///
    /// # Errors
    ///
    /// `Error::EntityKindMismatch` if the GUID is known as another kind.
    #[cfg(feature = "security")]
    pub fn notify_authentication(&self, info: ParticipantAuthenticationInfo) -> Result<Delivery> {
        crate::trace_fn!("DiscoveryNotifier::notify_authentication");
        let guid = info.guid();
        self.submit(guid, EntityKind::Participant, None, Pending::Authentication(info))
    }

    /// Endpoint announcements need a live owner. Without one, updates and
    /// removals are only accepted while the endpoint itself is still alive.
    fn owner_accepts(&self, guid: &GUID, status: DiscoveryStatus) -> bool {
        if self.participant.is_local(guid) {
            return true;
        }
        let owner = guid.participant_guid();
        if self.table.state(&owner).is_alive() {
            return true;
        }
        if status != DiscoveryStatus::Discovered && self.table.state(guid).is_alive() {
            return true;
        }
        log::debug!(
            "[notifier] {:?} for {} {} of participant {} that is gone, ignoring",
            status,
            guid.entity_kind().as_str(),
            guid,
            owner
        );
        NotifierMetrics::bump(&self.metrics.suppressed);
        false
    }

    /// An endpoint update that lost the race with its owner's removal.
    fn removed_with_owner(&self, guid: &GUID, kind: EntityKind, status: DiscoveryStatus) -> bool {
        if kind == EntityKind::Participant || status == DiscoveryStatus::Discovered {
            return false;
        }
        if self.table.state(&guid.participant_guid()).is_alive() {
            return false;
        }
        log::debug!(
            "[notifier] {:?} for {} {} arrived after its participant left",
            status,
            kind.as_str(),
            guid
        );
        NotifierMetrics::bump(&self.metrics.suppressed);
        true
    }

    fn submit(
        &self,
        guid: GUID,
        kind: EntityKind,
        status: Option<DiscoveryStatus>,
        event: Pending,
    ) -> Result<Delivery> {
        if !self.config.notify_self_discovery && self.participant.is_local(&guid) {
            log::trace!("[notifier] self-discovery of {} suppressed", guid);
            NotifierMetrics::bump(&self.metrics.suppressed);
            return Ok(Delivery::Suppressed);
        }

        if self.participant.is_ignored(&guid) {
            log::debug!("[notifier] {} {} is ignored", kind.as_str(), guid);
            NotifierMetrics::bump(&self.metrics.suppressed);
            return Ok(Delivery::Suppressed);
        }

        let slot = self.table.slot(guid, kind);
        let deliver = {
            let mut record = slot.lock();

            if record.kind != kind {
                let expected = record.kind.as_str();
                drop(record);
                return Err(Error::EntityKindMismatch {
                    guid,
                    expected,
                    found: kind.as_str(),
                });
            }

            if let Some(status) = status {
                match record.state.apply(status) {
                    Some(next) => record.state = next,
                    None => {
                        let from = record.state;
                        drop(record);
                        if self.removed_with_owner(&guid, kind, status) {
                            self.table.retire_if_stale(&guid, &slot);
                            return Ok(Delivery::Suppressed);
                        }
                        NotifierMetrics::bump(&self.metrics.invalid_transitions);
                        log::warn!(
                            "[notifier] rejected {:?} for {} {} in state {:?}",
                            status,
                            kind.as_str(),
                            guid,
                            from
                        );
                        self.table.retire_if_stale(&guid, &slot);
                        return Err(Error::InvalidTransition {
                            guid,
                            from,
                            to: status,
                        });
                    }
                }
            }

            if matches!(event, Pending::Reader(_) | Pending::Writer(_)) {
                record.announced = Some(event.clone());
            }
            record.pending.push_back(event);
            if record.delivering {
                NotifierMetrics::bump(&self.metrics.deferred);
                log::debug!(
                    "[notifier] {} {} busy, queued ({} pending)",
                    kind.as_str(),
                    guid,
                    record.pending.len()
                );
                false
            } else {
                record.delivering = true;
                true
            }
        };

        if kind == EntityKind::Participant && status == Some(DiscoveryStatus::Removed) {
            self.remove_endpoints_of(guid);
        }

        if deliver {
            Ok(self.drain(guid, &slot))
        } else {
            Ok(Delivery::Deferred)
        }
    }

    /// Queue a REMOVED notification for every live reader and writer of a
    /// removed participant and deliver the ones nobody else is draining.
    fn remove_endpoints_of(&self, owner: GUID) {
        for (guid, slot) in self.table.endpoints_of(owner.prefix) {
            {
                let mut record = slot.lock();
                if !record.state.is_alive() {
                    continue;
                }
                let Some(notice) = record.removal_notice() else {
                    continue;
                };
                record.state = EntityState::Removed;
                record.pending.push_back(notice);
                if record.delivering {
                    NotifierMetrics::bump(&self.metrics.deferred);
                    continue;
                }
                record.delivering = true;
            }
            log::debug!(
                "[notifier] {} {} removed with participant {}",
                guid.entity_kind().as_str(),
                guid,
                owner
            );
            self.drain(guid, &slot);
        }
    }

    /// Deliver queued notifications of one entity until its queue is empty.
    ///
    /// Returns the outcome of the first one, which is the caller's own.
    fn drain(&self, guid: GUID, slot: &RecordSlot) -> Delivery {
        let mut first = None;

        loop {
            let event = {
                let mut record = slot.lock();
                match record.pending.pop_front() {
                    Some(event) => event,
                    None => {
                        record.delivering = false;
                        break;
                    }
                }
            };

            let outcome = if self.participant.is_ignored(&guid) {
                NotifierMetrics::bump(&self.metrics.suppressed);
                Delivery::Suppressed
            } else {
                self.dispatch(guid, event)
            };

            if outcome == Delivery::Delivered(Decision::Ignore) {
                self.apply_veto(guid, slot);
            }
            first.get_or_insert(outcome);
        }

        self.table.retire_if_stale(&guid, slot);
        first.unwrap_or(Delivery::Suppressed)
    }

    fn apply_veto(&self, guid: GUID, slot: &RecordSlot) {
        NotifierMetrics::bump(&self.metrics.vetoes);
        if guid.is_participant() {
            self.participant.ignore_participant(&guid);
            self.table.ignore_participant(guid.prefix);
        } else {
            self.participant.ignore_endpoint(&guid);
            let mut record = slot.lock();
            // A removed record must still retire.
            if record.state != EntityState::Removed {
                record.state = EntityState::Ignored;
            }
            record.pending.clear();
        }
    }

    fn dispatch(&self, guid: GUID, event: Pending) -> Delivery {
        let Some(slot) = self.listener.load_full() else {
            log::trace!("[notifier] no listener for {} {}", event.label(), guid);
            return Delivery::NoListener;
        };
        let listener = &slot.listener;
        let participant = &self.participant;
        let veto = self.config.callback_mode == CallbackMode::Veto;
        let label = event.label();

        log::debug!("[notifier] {} {} -> listener", label, guid);

        let result = panic::catch_unwind(AssertUnwindSafe(|| match event {
            Pending::Participant(info) => {
                NotifierMetrics::bump(&self.metrics.participant_callbacks);
                if veto {
                    listener.on_participant_discovery_with_veto(participant, info)
                } else {
                    listener.on_participant_discovery(participant, info);
                    Decision::Accept
                }
            }
            Pending::Reader(info) => {
                NotifierMetrics::bump(&self.metrics.reader_callbacks);
                if veto {
                    listener.on_reader_discovery_with_veto(participant, info)
                } else {
                    listener.on_reader_discovery(participant, info);
                    Decision::Accept
                }
            }
            Pending::Writer(info) => {
                NotifierMetrics::bump(&self.metrics.writer_callbacks);
                if veto {
                    listener.on_writer_discovery_with_veto(participant, info)
                } else {
                    listener.on_writer_discovery(participant, info);
                    Decision::Accept
                }
            }
            #[cfg(feature = "security")]
            Pending::Authentication(info) => {
                NotifierMetrics::bump(&self.metrics.authentication_callbacks);
                listener.on_participant_authentication(participant, info);
                Decision::Accept
            }
        }));

        match result {
            Ok(decision) => {
                if decision.is_ignore() {
                    log::info!("[notifier] listener vetoed {} {}", label, guid);
                }
                Delivery::Delivered(decision)
            }
            Err(payload) => {
                self.listener_panicked(label, &*payload);
                Delivery::Delivered(Decision::Accept)
            }
        }
    }

    // ------------------------------------------------------------------
    // Type resolution
    // ------------------------------------------------------------------

    /// Report a newly known type.
    ///
    /// # Errors
    ///
    /// `Error::TypeDiscoveryMismatch` if the topic / request identity pairing
    /// is inconsistent.
    pub fn notify_type_discovery(&self, discovery: TypeDiscovery<'_>) -> Result<Delivery> {
        crate::trace_fn!("DiscoveryNotifier::notify_type_discovery");
        discovery.validate()?;
        Ok(self.dispatch_type("type discovery", |listener, participant| {
            listener.on_type_discovery(participant, discovery)
        }))
    }

    /// Report a getTypeDependencies reply.
    pub fn notify_type_dependencies_reply(
        &self,
        request_sample_id: &SampleIdentity,
        dependencies: &[TypeIdentifierWithSize],
    ) -> Delivery {
        crate::trace_fn!("DiscoveryNotifier::notify_type_dependencies_reply");
        log::debug!(
            "[notifier] type dependencies reply for {} ({} types)",
            request_sample_id.writer_guid,
            dependencies.len()
        );
        self.dispatch_type("type dependencies", |listener, participant| {
            listener.on_type_dependencies_reply(participant, request_sample_id, dependencies)
        })
    }

    /// Report TypeInformation received with remote discovery data.
    pub fn notify_type_information_received(
        &self,
        topic_name: &String255,
        type_name: &String255,
        type_information: &TypeInformation,
    ) -> Delivery {
        crate::trace_fn!("DiscoveryNotifier::notify_type_information_received");
        self.dispatch_type("type information", |listener, participant| {
            listener.on_type_information_received(
                participant,
                topic_name,
                type_name,
                type_information,
            )
        })
    }

    /// Route any type resolution event to its callback.
    ///
    /// # Errors
    ///
    /// See `notify_type_discovery`.
    pub fn notify_type_event(&self, event: TypeResolutionEvent<'_>) -> Result<Delivery> {
        match event {
            TypeResolutionEvent::TypeDiscovered(discovery) => self.notify_type_discovery(discovery),
            TypeResolutionEvent::TypeDependenciesReply {
                request_sample_id,
                dependencies,
            } => Ok(self.notify_type_dependencies_reply(request_sample_id, dependencies)),
            TypeResolutionEvent::TypeInformationReceived {
                topic_name,
                type_name,
                type_information,
            } => Ok(self.notify_type_information_received(
                topic_name,
                type_name,
                type_information,
            )),
        }
    }

    fn dispatch_type<F>(&self, label: &'static str, call: F) -> Delivery
    where
        F: FnOnce(&dyn ParticipantListener, &LocalParticipant),
    {
        let Some(slot) = self.listener.load_full() else {
            log::trace!("[notifier] no listener for {}", label);
            return Delivery::NoListener;
        };

        NotifierMetrics::bump(&self.metrics.type_callbacks);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            call(slot.listener.as_ref(), &self.participant);
        }));

        if let Err(payload) = result {
            self.listener_panicked(label, &*payload);
        }
        Delivery::Delivered(Decision::Accept)
    }

    fn listener_panicked(&self, label: &str, payload: &(dyn Any + Send)) {
        NotifierMetrics::bump(&self.metrics.listener_panics);
        log::error!(
            "[notifier] listener panicked in {} callback: {}",
            label,
            panic_message(payload)
        );
    }
}

impl std::fmt::Debug for DiscoveryNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryNotifier")
            .field("participant", &self.participant.guid())
            .field("config", &self.config)
            .field("has_listener", &self.has_listener())
            .field("entities", &self.table.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic>"
    }
}
