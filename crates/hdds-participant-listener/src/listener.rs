// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Participant Listener Trait
//!
//! Callbacks through which the discovery engine reports remote participants,
//! readers, writers, authentication outcomes and type resolution to the
//! application.
//!
//! # Usage
//!
//! ```
//! use hdds_participant_listener::{
//!     Decision, LocalParticipant, ParticipantListener, RemoteParticipantInfo,
//! };
//!
//! struct OnlyRobots;
//!
//! impl ParticipantListener for OnlyRobots {
//!     fn on_participant_discovery_with_veto(
//!         &self,
//!         _participant: &LocalParticipant,
//!         info: RemoteParticipantInfo,
//!     ) -> Decision {
//!         if info.name().starts_with("robot") {
//!             Decision::Accept
//!         } else {
//!             Decision::Ignore
//!         }
//!     }
//! }
//! ```
//!
//! # Overload families
//!
//! Participant, reader and writer discovery each come in a plain and a
//! veto-capable form. The notifier's `CallbackMode` picks one family for its
//! whole lifetime; the other is never called.
//!
//! # Thread Safety
//!
//! Callbacks run on discovery threads. Notifications for one remote entity are
//! serialized, notifications for different entities may run concurrently, so
//! implementations must be `Send + Sync`. Callbacks may block; no notifier lock
//! is held while they run. A panic is caught, logged and treated as
//! `Decision::Accept`.

#[cfg(feature = "security")]
use crate::info::ParticipantAuthenticationInfo;
use crate::info::{RemoteParticipantInfo, RemoteReaderInfo, RemoteWriterInfo};
use crate::name::String255;
use crate::participant::LocalParticipant;
use crate::xtypes::{SampleIdentity, TypeDiscovery, TypeIdentifierWithSize, TypeInformation};

/// Answer of a veto-capable discovery callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Decision {
    /// Proceed with matching (default).
    #[default]
    Accept,
    /// Ignore the entity from now on: no matching, no further callbacks.
    Ignore,
}

impl Decision {
    pub fn is_ignore(self) -> bool {
        matches!(self, Decision::Ignore)
    }
}

/// Listener for discovery events of a local participant.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about. Veto-capable defaults accept.
pub trait ParticipantListener: Send + Sync {
    /// Called when a remote participant is discovered, changes its QoS or is
    /// removed.
    ///
    /// # Arguments
    ///
    /// * `participant` - Local participant that discovered the remote one
    /// * `info` - Remote participant record; the listener owns it
    fn on_participant_discovery(&self, participant: &LocalParticipant, info: RemoteParticipantInfo) {
        let _ = (participant, info);
    }

    /// Veto-capable form of `on_participant_discovery`.
    ///
    /// Returning `Decision::Ignore` ignores the remote participant and all of
    /// its readers and writers.
    fn on_participant_discovery_with_veto(
        &self,
        participant: &LocalParticipant,
        info: RemoteParticipantInfo,
    ) -> Decision {
        let _ = (participant, info);
        Decision::Accept
    }

    /// Called when a remote reader is discovered, changes its QoS or is removed.
    fn on_reader_discovery(&self, participant: &LocalParticipant, info: RemoteReaderInfo) {
        let _ = (participant, info);
    }

    /// Veto-capable form of `on_reader_discovery`; ignores only this reader.
    fn on_reader_discovery_with_veto(
        &self,
        participant: &LocalParticipant,
        info: RemoteReaderInfo,
    ) -> Decision {
        let _ = (participant, info);
        Decision::Accept
    }

    /// Called when a remote writer is discovered, changes its QoS or is removed.
    fn on_writer_discovery(&self, participant: &LocalParticipant, info: RemoteWriterInfo) {
        let _ = (participant, info);
    }

    /// Veto-capable form of `on_writer_discovery`; ignores only this writer.
    fn on_writer_discovery_with_veto(
        &self,
        participant: &LocalParticipant,
        info: RemoteWriterInfo,
    ) -> Decision {
        let _ = (participant, info);
        Decision::Accept
    }

    /// Called with the outcome of the authentication handshake.
    ///
    /// Informational only: rejection happens inside the handshake.
    #[cfg(feature = "security")]
    fn on_participant_authentication(
        &self,
        participant: &LocalParticipant,
        info: ParticipantAuthenticationInfo,
    ) {
        let _ = (participant, info);
    }

    /// Called when a type becomes known.
    ///
    /// `discovery` borrows engine data for the duration of the call; clone the
    /// identifier or object to keep them. The dynamic type handle is shared
    /// and may be kept as is.
    fn on_type_discovery(&self, participant: &LocalParticipant, discovery: TypeDiscovery<'_>) {
        let _ = (participant, discovery);
    }

    /// Called when the type lookup client receives a getTypeDependencies reply.
    ///
    /// The engine does not fetch the listed types; the application decides
    /// whether to request them.
    fn on_type_dependencies_reply(
        &self,
        participant: &LocalParticipant,
        request_sample_id: &SampleIdentity,
        dependencies: &[TypeIdentifierWithSize],
    ) {
        let _ = (participant, request_sample_id, dependencies);
    }

    /// Called when TypeInformation arrives with a remote participant's
    /// discovery data.
    fn on_type_information_received(
        &self,
        participant: &LocalParticipant,
        topic_name: &String255,
        type_name: &String255,
        type_information: &TypeInformation,
    ) {
        let _ = (participant, topic_name, type_name, type_information);
    }
}

/// Closure-based listener for veto-capable participant discovery.
///
/// Use this when participant filtering is the only event of interest.
///
/// # Example
///
/// ```
/// use hdds_participant_listener::{Decision, ParticipantDiscoveryFn};
///
/// let listener = ParticipantDiscoveryFn::new(|_participant, info| {
///     if info.domain_id() == 0 { Decision::Accept } else { Decision::Ignore }
/// });
/// # let _ = listener;
/// ```
pub struct ParticipantDiscoveryFn<F>
where
    F: Fn(&LocalParticipant, RemoteParticipantInfo) -> Decision + Send + Sync,
{
    callback: F,
}

impl<F> ParticipantDiscoveryFn<F>
where
    F: Fn(&LocalParticipant, RemoteParticipantInfo) -> Decision + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ParticipantListener for ParticipantDiscoveryFn<F>
where
    F: Fn(&LocalParticipant, RemoteParticipantInfo) -> Decision + Send + Sync,
{
    fn on_participant_discovery(&self, participant: &LocalParticipant, info: RemoteParticipantInfo) {
        let _ = (self.callback)(participant, info);
    }

    fn on_participant_discovery_with_veto(
        &self,
        participant: &LocalParticipant,
        info: RemoteParticipantInfo,
    ) -> Decision {
        (self.callback)(participant, info)
    }
}
