// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type for the discovery notification layer.
//!
//! None of these errors originate inside a listener. Listener failures are
//! isolated at the dispatch boundary and never surface here; the variants below
//! describe contract violations by the discovery protocol feeding the notifier.

use std::fmt;

use crate::guid::GUID;
use crate::info::DiscoveryStatus;
use crate::notifier::EntityState;

/// Errors returned by `DiscoveryNotifier` and record constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested notification is not a legal transition for the entity.
    InvalidTransition {
        /// Remote entity the notification was for.
        guid: GUID,
        /// State the notifier had recorded.
        from: EntityState,
        /// Status carried by the rejected notification.
        to: DiscoveryStatus,
    },
    /// A GUID previously notified as one entity kind was reused for another
    /// (e.g. a reader GUID announced as a writer).
    EntityKindMismatch {
        /// Remote entity the notification was for.
        guid: GUID,
        /// Kind recorded on first discovery.
        expected: &'static str,
        /// Kind carried by the rejected notification.
        found: &'static str,
    },
    /// Type discovery carried both a topic name and a valid request identity,
    /// or neither.
    TypeDiscoveryMismatch {
        /// Human-readable description of the violated pairing.
        reason: &'static str,
    },
    /// Topic or type name exceeds the 255-byte bound.
    NameTooLong {
        /// Length of the rejected name in bytes.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTransition { guid, from, to } => write!(
                f,
                "Invalid discovery transition for {}: {:?} -> {:?}",
                guid, from, to
            ),
            Error::EntityKindMismatch {
                guid,
                expected,
                found,
            } => write!(
                f,
                "Entity kind mismatch for {}: known as {}, notified as {}",
                guid, expected, found
            ),
            Error::TypeDiscoveryMismatch { reason } => {
                write!(f, "Type discovery mismatch: {}", reason)
            }
            Error::NameTooLong { len, max } => {
                write!(f, "Name too long: {} bytes (max {})", len, max)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenient alias for notifier results.
pub type Result<T> = core::result::Result<T, Error>;
