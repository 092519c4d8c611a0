// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery info records handed to listeners.
//!
//! A record is built once by the discovery engine for a single state transition
//! and moved into the callback. Fields are private and only readable, so a
//! record never changes after construction; a listener that wants to keep one
//! simply keeps (or clones) the value it was given.

use std::net::SocketAddr;

use crate::error::{Error, Result};
use crate::guid::{EntityKind, GUID};
use crate::name::String255;
use crate::qos::{EndpointQos, ParticipantQos};
use crate::xtypes::TypeInformation;

/// Discovery state carried by participant, reader and writer records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryStatus {
    /// First announcement of the entity.
    Discovered,
    /// The entity re-announced with different QoS.
    ChangedQos,
    /// The entity left (graceful dispose or lease expiry).
    Removed,
}

/// Unicast and multicast locators announced by a participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantLocators {
    pub metatraffic_unicast: Vec<SocketAddr>,
    pub metatraffic_multicast: Vec<SocketAddr>,
    pub default_unicast: Vec<SocketAddr>,
    pub default_multicast: Vec<SocketAddr>,
}

impl ParticipantLocators {
    pub fn is_empty(&self) -> bool {
        self.metatraffic_unicast.is_empty()
            && self.metatraffic_multicast.is_empty()
            && self.default_unicast.is_empty()
            && self.default_multicast.is_empty()
    }
}

/// Remote participant as seen by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteParticipantInfo {
    status: DiscoveryStatus,
    guid: GUID,
    name: String,
    domain_id: u32,
    vendor_id: [u8; 2],
    locators: ParticipantLocators,
    qos: ParticipantQos,
}

impl RemoteParticipantInfo {
    /// Record for `guid` with empty locators and default QoS.
    ///
    /// The entity id of `guid` is forced to the participant entity id.
    pub fn new(status: DiscoveryStatus, guid: GUID) -> Self {
        Self {
            status,
            guid: guid.participant_guid(),
            name: String::new(),
            domain_id: 0,
            vendor_id: [0, 0],
            locators: ParticipantLocators::default(),
            qos: ParticipantQos::default(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_domain_id(mut self, domain_id: u32) -> Self {
        self.domain_id = domain_id;
        self
    }

    #[must_use]
    pub fn with_vendor_id(mut self, vendor_id: [u8; 2]) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    #[must_use]
    pub fn with_locators(mut self, locators: ParticipantLocators) -> Self {
        self.locators = locators;
        self
    }

    #[must_use]
    pub fn with_qos(mut self, qos: ParticipantQos) -> Self {
        self.qos = qos;
        self
    }

    /// Same record with another status, used when replaying a snapshot.
    #[must_use]
    pub fn with_status(mut self, status: DiscoveryStatus) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> DiscoveryStatus {
        self.status
    }

    pub fn guid(&self) -> GUID {
        self.guid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain_id(&self) -> u32 {
        self.domain_id
    }

    pub fn vendor_id(&self) -> [u8; 2] {
        self.vendor_id
    }

    pub fn locators(&self) -> &ParticipantLocators {
        &self.locators
    }

    pub fn qos(&self) -> &ParticipantQos {
        &self.qos
    }
}

/// Fields shared by reader and writer records.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EndpointRecord {
    status: DiscoveryStatus,
    guid: GUID,
    topic_name: String255,
    type_name: String255,
    qos: EndpointQos,
    unicast_locators: Vec<SocketAddr>,
    type_information: Option<TypeInformation>,
}

impl EndpointRecord {
    fn new(
        status: DiscoveryStatus,
        guid: GUID,
        topic_name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            status,
            guid,
            topic_name: String255::new(topic_name)?,
            type_name: String255::new(type_name)?,
            qos: EndpointQos::default(),
            unicast_locators: Vec::new(),
            type_information: None,
        })
    }
}

macro_rules! endpoint_info {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            record: EndpointRecord,
        }

        impl $name {
            /// Record for the endpoint `guid` on `topic_name`/`type_name`.
            ///
            /// # Errors
            ///
            /// - `Error::EntityKindMismatch` if the entity id of `guid` does not
            ///   name this kind of endpoint.
            /// - `Error::NameTooLong` if a name exceeds 255 bytes.
            pub fn new(
                status: DiscoveryStatus,
                guid: GUID,
                topic_name: impl Into<String>,
                type_name: impl Into<String>,
            ) -> Result<Self> {
                let found = guid.entity_kind();
                if found != Self::KIND {
                    return Err(Error::EntityKindMismatch {
                        guid,
                        expected: Self::KIND.as_str(),
                        found: found.as_str(),
                    });
                }
                Ok(Self {
                    record: EndpointRecord::new(status, guid, topic_name, type_name)?,
                })
            }

            /// Entity kind this record describes.
            pub const KIND: EntityKind = $kind;

            #[must_use]
            pub fn with_qos(mut self, qos: EndpointQos) -> Self {
                self.record.qos = qos;
                self
            }

            #[must_use]
            pub fn with_unicast_locators(mut self, locators: Vec<SocketAddr>) -> Self {
                self.record.unicast_locators = locators;
                self
            }

            #[must_use]
            pub fn with_type_information(mut self, type_information: TypeInformation) -> Self {
                self.record.type_information = Some(type_information);
                self
            }

            #[must_use]
            pub fn with_status(mut self, status: DiscoveryStatus) -> Self {
                self.record.status = status;
                self
            }

            pub fn status(&self) -> DiscoveryStatus {
                self.record.status
            }

            /// Endpoint GUID.
            pub fn guid(&self) -> GUID {
                self.record.guid
            }

            /// GUID of the owning remote participant.
            pub fn participant_guid(&self) -> GUID {
                self.record.guid.participant_guid()
            }

            pub fn topic_name(&self) -> &String255 {
                &self.record.topic_name
            }

            pub fn type_name(&self) -> &String255 {
                &self.record.type_name
            }

            pub fn qos(&self) -> &EndpointQos {
                &self.record.qos
            }

            pub fn unicast_locators(&self) -> &[SocketAddr] {
                &self.record.unicast_locators
            }

            pub fn type_information(&self) -> Option<&TypeInformation> {
                self.record.type_information.as_ref()
            }
        }
    };
}

endpoint_info!(
    /// Remote DataReader as seen by endpoint discovery.
    RemoteReaderInfo,
    EntityKind::Reader
);

endpoint_info!(
    /// Remote DataWriter as seen by endpoint discovery.
    RemoteWriterInfo,
    EntityKind::Writer
);

/// Outcome of the authentication handshake with a remote participant.
#[cfg(feature = "security")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticationStatus {
    Authorized,
    Unauthorized,
}

/// Authentication result for a remote participant.
#[cfg(feature = "security")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantAuthenticationInfo {
    status: AuthenticationStatus,
    guid: GUID,
}

#[cfg(feature = "security")]
impl ParticipantAuthenticationInfo {
    pub fn new(status: AuthenticationStatus, guid: GUID) -> Self {
        Self {
            status,
            guid: guid.participant_guid(),
        }
    }

    pub fn status(&self) -> AuthenticationStatus {
        self.status
    }

    pub fn guid(&self) -> GUID {
        self.guid
    }
}
