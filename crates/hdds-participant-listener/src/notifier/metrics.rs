// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Notifier metrics.
//!
//! Atomic counters for delivered callbacks, vetoes, suppressed and deferred
//! notifications, rejected transitions and listener panics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Notifier metrics.
#[derive(Debug, Default)]
pub struct NotifierMetrics {
    /// Participant callbacks delivered.
    pub participant_callbacks: AtomicU64,
    /// Reader callbacks delivered.
    pub reader_callbacks: AtomicU64,
    /// Writer callbacks delivered.
    pub writer_callbacks: AtomicU64,
    /// Authentication callbacks delivered.
    pub authentication_callbacks: AtomicU64,
    /// Type-resolution callbacks delivered.
    pub type_callbacks: AtomicU64,
    /// Callbacks that answered `Decision::Ignore`.
    pub vetoes: AtomicU64,
    /// Notifications dropped for ignored, local or unknown-owner entities.
    pub suppressed: AtomicU64,
    /// Notifications queued behind an in-flight callback for the same entity.
    pub deferred: AtomicU64,
    /// Notifications rejected by the state machine.
    pub invalid_transitions: AtomicU64,
    /// Listener callbacks that panicked.
    pub listener_panics: AtomicU64,
}

/// Plain copy of `NotifierMetrics` at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub participant_callbacks: u64,
    pub reader_callbacks: u64,
    pub writer_callbacks: u64,
    pub authentication_callbacks: u64,
    pub type_callbacks: u64,
    pub vetoes: u64,
    pub suppressed: u64,
    pub deferred: u64,
    pub invalid_transitions: u64,
    pub listener_panics: u64,
}

impl NotifierMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            participant_callbacks: self.participant_callbacks.load(Ordering::Relaxed),
            reader_callbacks: self.reader_callbacks.load(Ordering::Relaxed),
            writer_callbacks: self.writer_callbacks.load(Ordering::Relaxed),
            authentication_callbacks: self.authentication_callbacks.load(Ordering::Relaxed),
            type_callbacks: self.type_callbacks.load(Ordering::Relaxed),
            vetoes: self.vetoes.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            deferred: self.deferred.load(Ordering::Relaxed),
            invalid_transitions: self.invalid_transitions.load(Ordering::Relaxed),
            listener_panics: self.listener_panics.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl MetricsSnapshot {
    /// Callbacks actually invoked on the listener.
    pub fn total_callbacks(&self) -> u64 {
        self.participant_callbacks
            + self.reader_callbacks
            + self.writer_callbacks
            + self.authentication_callbacks
            + self.type_callbacks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot() {
        let metrics = NotifierMetrics::new();
        NotifierMetrics::bump(&metrics.participant_callbacks);
        NotifierMetrics::bump(&metrics.reader_callbacks);
        NotifierMetrics::bump(&metrics.reader_callbacks);
        NotifierMetrics::bump(&metrics.vetoes);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.participant_callbacks, 1);
        assert_eq!(snapshot.reader_callbacks, 2);
        assert_eq!(snapshot.vetoes, 1);
        assert_eq!(snapshot.total_callbacks(), 3);
        assert_eq!(snapshot.listener_panics, 0);
    }
}
