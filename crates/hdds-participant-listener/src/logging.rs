// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Logging helpers.
//!
//! Regular diagnostics go straight through the `log` facade with a bracketed
//! subsystem prefix (`[notifier]`, `[listener]`). The only macro defined here is
//! `trace_fn!`, a function-entry marker that compiles to nothing unless the
//! `trace` feature is enabled.
//!
//! ## Example
//!
//! ```ignore
//! fn deliver(&self) {
//!     crate::trace_fn!("DiscoveryNotifier::deliver");
//!     log::debug!("[notifier] delivering {} event(s)", n);
//! }
//! ```

/// Function entry trace marker.
///
/// Logs `[ENTER:FNC] function_name` at `trace` level when the `trace` feature
/// is enabled.
#[macro_export]
#[cfg(feature = "trace")]
macro_rules! trace_fn {
    ($fn_name:expr) => {
        log::trace!("[ENTER:FNC] {}", $fn_name);
    };
}

/// No-op trace macro (when trace feature disabled).
#[macro_export]
#[cfg(not(feature = "trace"))]
macro_rules! trace_fn {
    ($fn_name:expr) => {};
}
