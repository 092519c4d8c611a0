// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HDDS Participant Listener
//!
//! Discovery event notification and veto contract between an RTPS discovery
//! engine and the application owning a participant.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use hdds_participant_listener::{
//!     CallbackMode, Decision, DiscoveryNotifier, DiscoveryStatus, GUID, LocalParticipant,
//!     NotifierConfig, ParticipantDiscoveryFn, RemoteParticipantInfo, Result,
//! };
//!
//! fn main() -> Result<()> {
//!     let local = LocalParticipant::new([1; 12], "my_app", 0);
//!     let config = NotifierConfig::builder().callback_mode(CallbackMode::Veto).build();
//!     let notifier = DiscoveryNotifier::new(local, config);
//!
//!     notifier.set_listener(Arc::new(ParticipantDiscoveryFn::new(|_local, info| {
//!         if info.name().starts_with("trusted") { Decision::Accept } else { Decision::Ignore }
//!     })));
//!
//!     // Called by the discovery protocol when SPDP announces a participant.
//!     let info = RemoteParticipantInfo::new(DiscoveryStatus::Discovered, GUID::participant([2; 12]))
//!         .with_name("stranger");
//!     let delivery = notifier.notify_participant(info)?;
//!     assert_eq!(delivery.decision(), Some(Decision::Ignore));
//!     assert!(notifier.participant().is_ignored(&GUID::participant([2; 12])));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                 Application (ParticipantListener)           |
//! +-------------------------------------------------------------+
//! |  DiscoveryNotifier: state machine | ignore list | dispatch  |
//! +-------------------------------------------------------------+
//! |    Discovery protocol (SPDP / SEDP / TypeLookup / Auth)     |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ParticipantListener`] | Callbacks the application implements |
//! | [`DiscoveryNotifier`] | Validates and delivers discovery notifications |
//! | [`LocalParticipant`] | Handle passed to every callback; owns the ignore list |
//! | [`RemoteParticipantInfo`] | Remote participant record |
//! | [`RemoteReaderInfo`] / [`RemoteWriterInfo`] | Remote endpoint records |
//! | [`TypeDiscovery`] | Type resolution arguments |
//!
//! ## Features
//!
//! - `xtypes` (default): MD5 equivalence hashes for type identifiers
//! - `security`: participant authentication callback
//! - `trace`: function-entry trace markers

/// Notifier configuration (callback family, self-discovery).
pub mod config;
/// Error type and result alias.
pub mod error;
/// RTPS GUIDs and entity kinds.
pub mod guid;
/// Discovery records handed to listeners.
pub mod info;
/// Listener trait and veto decision.
pub mod listener;
/// Compile-time optional trace markers.
pub mod logging;
/// Bounded topic and type names.
pub mod name;
/// Discovery notifier (state machine, serialized delivery).
pub mod notifier;
/// Local participant handle and ignore list.
pub mod participant;
/// QoS carried in discovery records.
pub mod qos;
/// XTypes surface used by type resolution callbacks.
pub mod xtypes;

pub use config::{CallbackMode, NotifierConfig, NotifierConfigBuilder};
pub use error::{Error, Result};
pub use guid::{EntityKind, GuidPrefix, GUID};
#[cfg(feature = "security")]
pub use info::{AuthenticationStatus, ParticipantAuthenticationInfo};
pub use info::{
    DiscoveryStatus, ParticipantLocators, RemoteParticipantInfo, RemoteReaderInfo,
    RemoteWriterInfo,
};
pub use listener::{Decision, ParticipantDiscoveryFn, ParticipantListener};
pub use name::String255;
pub use notifier::{Delivery, DiscoveryNotifier, EntityState, MetricsSnapshot, NotifierMetrics};
pub use participant::{IgnoreList, LocalParticipant};
pub use qos::{Durability, EndpointQos, History, ParticipantQos, Reliability};
pub use xtypes::{
    DynamicType, DynamicTypePtr, SampleIdentity, SequenceNumber, TypeDiscovery, TypeIdentifier,
    TypeIdentifierWithSize, TypeInformation, TypeObject, TypeResolutionEvent,
};
