// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Notifier configuration.
//!
//! # Environment Variables
//!
//! `HDDS_DISCOVERY_CALLBACK_MODE=<notify|veto>` - Select the callback family
//! `HDDS_DISCOVERY_NOTIFY_SELF=<1|true>` - Deliver events about the local participant

use std::str::FromStr;

/// Environment variable selecting the callback family.
pub const ENV_CALLBACK_MODE: &str = "HDDS_DISCOVERY_CALLBACK_MODE";

/// Environment variable enabling self-discovery notifications.
pub const ENV_NOTIFY_SELF: &str = "HDDS_DISCOVERY_NOTIFY_SELF";

/// Which discovery overload family the notifier invokes.
///
/// Exactly one family is used for the lifetime of a notifier, so a listener
/// never receives both the plain and the veto-capable call for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackMode {
    /// `on_*_discovery`: pure notification, the engine always accepts.
    #[default]
    Notify,
    /// `on_*_discovery_with_veto`: the listener may return `Decision::Ignore`.
    Veto,
}

impl FromStr for CallbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notify" | "plain" => Ok(CallbackMode::Notify),
            "veto" | "ignore" => Ok(CallbackMode::Veto),
            other => Err(format!("Unknown callback mode: {}", other)),
        }
    }
}

/// Configuration for `DiscoveryNotifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotifierConfig {
    /// Callback family for participant, reader and writer discovery.
    pub callback_mode: CallbackMode,
    /// Deliver events whose GUID prefix equals the local participant's.
    pub notify_self_discovery: bool,
}

impl NotifierConfig {
    #[must_use]
    pub fn builder() -> NotifierConfigBuilder {
        NotifierConfigBuilder::default()
    }

    /// Create from environment variables, falling back to defaults.
    ///
    /// Unparseable values are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup(ENV_CALLBACK_MODE) {
            match val.parse::<CallbackMode>() {
                Ok(mode) => config.callback_mode = mode,
                Err(e) => log::warn!("[config] {}={}: {}", ENV_CALLBACK_MODE, val, e),
            }
        }

        if let Some(val) = lookup(ENV_NOTIFY_SELF) {
            config.notify_self_discovery = matches!(
                val.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config
    }
}

/// Builder for `NotifierConfig`.
#[derive(Debug, Clone, Default)]
pub struct NotifierConfigBuilder {
    config: NotifierConfig,
}

impl NotifierConfigBuilder {
    #[must_use]
    pub fn callback_mode(mut self, mode: CallbackMode) -> Self {
        self.config.callback_mode = mode;
        self
    }

    #[must_use]
    pub fn notify_self_discovery(mut self, enabled: bool) -> Self {
        self.config.notify_self_discovery = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> NotifierConfig {
        self.config
    }
}
