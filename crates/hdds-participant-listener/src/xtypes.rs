// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XTypes values surfaced through type-resolution callbacks.
//!
//! Only the parts of DDS-XTypes v1.3 that cross the listener boundary are
//! modelled here: identifiers, opaque type objects, type information and the
//! shared dynamic type handle. Building and assigning types is out of scope.
//!
//! # Lifetimes
//!
//! `TypeResolutionEvent` borrows everything except the dynamic type, which is
//! reference counted (`DynamicTypePtr`) and may be kept after the callback
//! returns. Anything else a listener wants to keep must be cloned.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::guid::GUID;
use crate::name::String255;

// ============================================================================
// Request correlation
// ============================================================================

/// RTPS sequence number (64-bit, split high/low on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceNumber(pub i64);

impl SequenceNumber {
    /// SEQUENCENUMBER_UNKNOWN: high = -1, low = 0.
    pub const UNKNOWN: SequenceNumber = SequenceNumber(-1_i64 << 32);

    pub const fn new(high: i32, low: u32) -> Self {
        Self(((high as i64) << 32) | low as i64)
    }

    pub const fn high(self) -> i32 {
        (self.0 >> 32) as i32
    }

    pub const fn low(self) -> u32 {
        self.0 as u32
    }
}

/// Identity of a sample: writer GUID + sequence number.
///
/// Used as the correlation id between a type-lookup request and its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleIdentity {
    /// GUID of the DataWriter that sent the sample
    pub writer_guid: GUID,
    /// Sequence number assigned by the writer
    pub sequence_number: SequenceNumber,
}

impl SampleIdentity {
    pub const fn new(writer_guid: GUID, sequence_number: SequenceNumber) -> Self {
        Self {
            writer_guid,
            sequence_number,
        }
    }

    /// The invalid sentinel (`GUID_UNKNOWN`, `SEQUENCENUMBER_UNKNOWN`).
    pub const fn unknown() -> Self {
        Self {
            writer_guid: GUID::unknown(),
            sequence_number: SequenceNumber::UNKNOWN,
        }
    }

    /// True unless this is the invalid sentinel.
    pub fn is_valid(&self) -> bool {
        !(self.writer_guid.is_unknown() && self.sequence_number == SequenceNumber::UNKNOWN)
    }
}

impl Default for SampleIdentity {
    fn default() -> Self {
        Self::unknown()
    }
}

// ============================================================================
// Type identifiers
// ============================================================================

/// EquivalenceHash - 14-byte MD5 hash for TypeIdentifier
///
/// Per DDS-XTypes v1.3 section 7.3.4.8: MD5 of the CDR serialization of the
/// TypeObject, truncated to 14 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EquivalenceHash([u8; 14]);

impl EquivalenceHash {
    pub const fn from_bytes(bytes: [u8; 14]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 14] {
        &self.0
    }

    pub const fn zero() -> Self {
        Self([0u8; 14])
    }

    /// Compute from a serialized TypeObject.
    #[cfg(feature = "xtypes")]
    pub fn compute(serialized: &[u8]) -> Self {
        use md5::{Digest, Md5};

        let digest = Md5::digest(serialized);
        let mut bytes = [0u8; 14];
        bytes.copy_from_slice(&digest[..14]);
        Self(bytes)
    }

    /// Placeholder without the `xtypes` feature: always the zero hash.
    #[cfg(not(feature = "xtypes"))]
    pub fn compute(_serialized: &[u8]) -> Self {
        Self::zero()
    }
}

impl fmt::Debug for EquivalenceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EquivalenceHash(")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

/// Which equivalence relation a hash was computed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EquivalenceKind {
    Minimal = 0xF1,
    Complete = 0xF2,
}

/// Primitive TypeKind values (DDS-XTypes 7.2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum TypeKind {
    TK_BOOLEAN = 0x01,
    TK_BYTE = 0x02,
    TK_INT16 = 0x03,
    TK_INT32 = 0x04,
    TK_INT64 = 0x05,
    TK_UINT16 = 0x06,
    TK_UINT32 = 0x07,
    TK_UINT64 = 0x08,
    TK_FLOAT32 = 0x09,
    TK_FLOAT64 = 0x0A,
    TK_INT8 = 0x0C,
    TK_UINT8 = 0x0D,
    TK_CHAR8 = 0x10,
}

/// TypeIdentifier - uniquely identifies a DDS type.
///
/// Primitives and strings are identified directly; constructed types by the
/// equivalence hash of their TypeObject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeIdentifier {
    Primitive(TypeKind),
    /// `string<bound>` with bound <= 255 (0 = unbounded)
    StringSmall { bound: u8 },
    /// `string<bound>` with bound > 255
    StringLarge { bound: u32 },
    /// Hash of the MinimalTypeObject
    Minimal(EquivalenceHash),
    /// Hash of the CompleteTypeObject
    Complete(EquivalenceHash),
}

impl TypeIdentifier {
    /// Identifier of a constructed type, derived from its TypeObject.
    pub fn for_type_object(object: &TypeObject) -> Self {
        let hash = EquivalenceHash::compute(&object.serialized);
        match object.kind {
            EquivalenceKind::Minimal => TypeIdentifier::Minimal(hash),
            EquivalenceKind::Complete => TypeIdentifier::Complete(hash),
        }
    }

    /// True for hash-based identifiers that need a TypeObject to resolve.
    pub fn is_hashed(&self) -> bool {
        matches!(
            self,
            TypeIdentifier::Minimal(_) | TypeIdentifier::Complete(_)
        )
    }
}

/// Serialized TypeObject, kept opaque at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeObject {
    pub kind: EquivalenceKind,
    /// CDR2 serialization of the Minimal/Complete TypeObject.
    pub serialized: Vec<u8>,
}

impl TypeObject {
    pub fn new(kind: EquivalenceKind, serialized: Vec<u8>) -> Self {
        Self { kind, serialized }
    }
}

/// TypeIdentifier plus the serialized size of its TypeObject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeIdentifierWithSize {
    pub type_id: TypeIdentifier,
    pub typeobject_serialized_size: u32,
}

impl TypeIdentifierWithSize {
    pub fn new(type_id: TypeIdentifier, typeobject_serialized_size: u32) -> Self {
        Self {
            type_id,
            typeobject_serialized_size,
        }
    }
}

/// A type and (a possibly partial list of) the types it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeIdentifierWithDependencies {
    pub typeid_with_size: TypeIdentifierWithSize,
    /// Total dependency count; -1 when unknown.
    pub dependent_typeid_count: i32,
    pub dependent_typeids: Vec<TypeIdentifierWithSize>,
}

impl TypeIdentifierWithDependencies {
    /// A type with no known dependencies.
    pub fn standalone(typeid_with_size: TypeIdentifierWithSize) -> Self {
        Self {
            typeid_with_size,
            dependent_typeid_count: 0,
            dependent_typeids: Vec::new(),
        }
    }

    /// True if the announcement lists fewer dependencies than exist.
    pub fn is_partial(&self) -> bool {
        self.dependent_typeid_count < 0
            || self.dependent_typeids.len() < self.dependent_typeid_count as usize
    }
}

/// TypeInformation (PID_TYPE_INFORMATION) piggybacked on discovery data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInformation {
    pub minimal: TypeIdentifierWithDependencies,
    pub complete: TypeIdentifierWithDependencies,
}

// ============================================================================
// Dynamic types
// ============================================================================

/// Member of a dynamic struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicMember {
    pub name: String,
    pub member_id: u32,
    pub type_id: TypeIdentifier,
}

/// Runtime type built from a resolved TypeObject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicType {
    pub name: String,
    pub type_id: TypeIdentifier,
    pub members: Vec<DynamicMember>,
}

/// Shared handle to a dynamic type; may outlive the callback.
pub type DynamicTypePtr = Arc<DynamicType>;

// ============================================================================
// Type resolution events
// ============================================================================

/// Arguments of a type discovery notification.
///
/// A type is discovered either through discovery-time data typing (topic set,
/// request identity is the sentinel) or through the TypeLookup service (valid
/// request identity, empty topic). The constructors enforce that pairing.
#[derive(Debug, Clone)]
pub struct TypeDiscovery<'a> {
    request_sample_id: &'a SampleIdentity,
    topic: &'a str,
    identifier: &'a TypeIdentifier,
    object: Option<&'a TypeObject>,
    dynamic_type: Option<DynamicTypePtr>,
}

static UNKNOWN_SAMPLE_IDENTITY: SampleIdentity = SampleIdentity::unknown();

impl<'a> TypeDiscovery<'a> {
    /// Type learnt from a remote endpoint announcement on `topic`.
    pub fn from_discovery_time_typing(
        topic: &'a String255,
        identifier: &'a TypeIdentifier,
        object: Option<&'a TypeObject>,
        dynamic_type: Option<DynamicTypePtr>,
    ) -> Result<Self> {
        if topic.is_empty() {
            return Err(Error::TypeDiscoveryMismatch {
                reason: "discovery-time typing requires a topic name",
            });
        }
        Ok(Self {
            request_sample_id: &UNKNOWN_SAMPLE_IDENTITY,
            topic: topic.as_str(),
            identifier,
            object,
            dynamic_type,
        })
    }

    /// Type resolved by the TypeLookup service in reply to `request_sample_id`.
    pub fn from_type_lookup(
        request_sample_id: &'a SampleIdentity,
        identifier: &'a TypeIdentifier,
        object: Option<&'a TypeObject>,
        dynamic_type: Option<DynamicTypePtr>,
    ) -> Result<Self> {
        if !request_sample_id.is_valid() {
            return Err(Error::TypeDiscoveryMismatch {
                reason: "type lookup requires a valid request identity",
            });
        }
        Ok(Self {
            request_sample_id,
            topic: "",
            identifier,
            object,
            dynamic_type,
        })
    }

    /// Request identity; the sentinel for discovery-time typing.
    pub fn request_sample_id(&self) -> &'a SampleIdentity {
        self.request_sample_id
    }

    /// Topic name; empty for type lookup.
    pub fn topic(&self) -> &'a str {
        self.topic
    }

    pub fn identifier(&self) -> &'a TypeIdentifier {
        self.identifier
    }

    pub fn object(&self) -> Option<&'a TypeObject> {
        self.object
    }

    /// Shared handle; clone it to keep the type after the callback.
    pub fn dynamic_type(&self) -> Option<&DynamicTypePtr> {
        self.dynamic_type.as_ref()
    }

    /// True if the type came from discovery-time data typing.
    pub fn is_discovery_time(&self) -> bool {
        !self.topic.is_empty()
    }

    /// Re-check the topic/request pairing.
    pub(crate) fn validate(&self) -> Result<()> {
        match (self.topic.is_empty(), self.request_sample_id.is_valid()) {
            (false, false) | (true, true) => Ok(()),
            (false, true) => Err(Error::TypeDiscoveryMismatch {
                reason: "topic set together with a valid request identity",
            }),
            (true, false) => Err(Error::TypeDiscoveryMismatch {
                reason: "neither topic nor request identity set",
            }),
        }
    }
}

/// Result of the distributed type system surfaced to the listener.
#[derive(Debug, Clone)]
pub enum TypeResolutionEvent<'a> {
    /// A type became known (discovery-time typing or TypeLookup reply).
    TypeDiscovered(TypeDiscovery<'a>),
    /// Reply to getTypeDependencies: types the client still has to fetch.
    TypeDependenciesReply {
        request_sample_id: &'a SampleIdentity,
        dependencies: &'a [TypeIdentifierWithSize],
    },
    /// TypeInformation received while discovering a remote participant.
    TypeInformationReceived {
        topic_name: &'a String255,
        type_name: &'a String255,
        type_information: &'a TypeInformation,
    },
}
