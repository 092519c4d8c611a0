// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RTPS GUID (Globally Unique Identifier) and entity classification.

use std::fmt;

/// 12-byte GUID prefix shared by a participant and all of its endpoints.
pub type GuidPrefix = [u8; 12];

/// Entity ID of the participant entity itself (RTPS 9.3.1.2).
pub const ENTITYID_PARTICIPANT: [u8; 4] = [0x00, 0x00, 0x01, 0xC1];

/// Entity ID used when the entity is not known.
pub const ENTITYID_UNKNOWN: [u8; 4] = [0x00, 0x00, 0x00, 0x00];

/// RTPS GUID (Globally Unique Identifier)
///
/// 16-byte identifier following DDS-RTPS v2.3 spec.
///
/// # Structure
/// - Prefix: 12 bytes (participant unique)
/// - Entity ID: 4 bytes (entity within participant)
///
/// # Display Format
/// Hex with dots: "01.0f.ac.10.00.00.00.00.00.00.00.01.00.00.01.c1"
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GUID {
    pub prefix: GuidPrefix,
    pub entity_id: [u8; 4],
}

impl GUID {
    /// Create GUID from raw bytes (16 bytes total)
    ///
    /// # Examples
    /// ```
    /// use hdds_participant_listener::GUID;
    ///
    /// let bytes = [1, 15, 172, 16, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 193];
    /// let guid = GUID::from_bytes(bytes);
    /// assert!(guid.is_participant());
    /// ```
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let mut prefix = [0u8; 12];
        let mut entity_id = [0u8; 4];
        prefix.copy_from_slice(&bytes[0..12]);
        entity_id.copy_from_slice(&bytes[12..16]);
        Self { prefix, entity_id }
    }

    /// Create GUID from separate prefix and entity ID
    pub const fn new(prefix: GuidPrefix, entity_id: [u8; 4]) -> Self {
        Self { prefix, entity_id }
    }

    /// GUID of the participant entity for `prefix`.
    pub const fn participant(prefix: GuidPrefix) -> Self {
        Self {
            prefix,
            entity_id: ENTITYID_PARTICIPANT,
        }
    }

    /// Convert GUID to 16-byte array
    pub fn as_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..12].copy_from_slice(&self.prefix);
        bytes[12..16].copy_from_slice(&self.entity_id);
        bytes
    }

    /// GUID_UNKNOWN (all zeros).
    pub const fn unknown() -> Self {
        Self {
            prefix: [0; 12],
            entity_id: ENTITYID_UNKNOWN,
        }
    }

    /// Check if GUID is GUID_UNKNOWN.
    pub fn is_unknown(&self) -> bool {
        self.prefix.iter().all(|&b| b == 0) && self.entity_id.iter().all(|&b| b == 0)
    }

    /// True if this GUID names a participant rather than an endpoint.
    pub fn is_participant(&self) -> bool {
        self.entity_id == ENTITYID_PARTICIPANT
    }

    /// GUID of the participant owning this entity.
    pub fn participant_guid(&self) -> GUID {
        GUID::participant(self.prefix)
    }

    /// Classify the entity from the entity-kind byte.
    pub fn entity_kind(&self) -> EntityKind {
        EntityKind::from_entity_id(self.entity_id)
    }
}

impl Default for GUID {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for GUID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.prefix.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        for byte in &self.entity_id {
            write!(f, ".{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GUID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GUID({})", self)
    }
}

/// Kind of remote entity, derived from the last entity-id byte.
///
/// # RTPS Spec (9.3.1)
/// - Participant: 0xC1
/// - Writer: 0x02, 0x03 (user-defined), 0xC2, 0xC3 (built-in)
/// - Reader: 0x04, 0x07 (user-defined), 0xC4, 0xC7 (built-in)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Participant,
    Reader,
    Writer,
    Unknown,
}

impl EntityKind {
    #[must_use]
    pub fn from_entity_id(entity_id: [u8; 4]) -> Self {
        match entity_id[3] {
            0xC1 => EntityKind::Participant,
            0x02 | 0x03 | 0xC2 | 0xC3 => EntityKind::Writer,
            0x04 | 0x07 | 0xC4 | 0xC7 => EntityKind::Reader,
            _ => EntityKind::Unknown,
        }
    }

    /// Lower-case name used in log lines and errors.
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Participant => "participant",
            EntityKind::Reader => "reader",
            EntityKind::Writer => "writer",
            EntityKind::Unknown => "unknown",
        }
    }
}
