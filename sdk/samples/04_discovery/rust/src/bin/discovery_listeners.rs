// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HDDS Sample: Discovery Listeners
//!
//! Demonstrates **discovery event monitoring and filtering** - tracking when
//! participants and endpoints join or leave the domain, and refusing the ones
//! the application does not trust.
//!
//! ## Discovery Events
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │ Callback                      │ Trigger                 │ Veto?   │
//! ├───────────────────────────────┼─────────────────────────┼─────────┤
//! │ on_participant_discovery      │ SPDP announce / lease   │ yes     │
//! │ on_reader_discovery           │ SEDP reader announce    │ yes     │
//! │ on_writer_discovery           │ SEDP writer announce    │ yes     │
//! │ on_participant_authentication │ Security handshake      │ no      │
//! │ on_type_information_received  │ TypeInformation in SEDP │ no      │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Event Timeline
//!
//! ```text
//! Time ──────────────────────────────────────────────────────▶
//!
//! ┌────────────────────────────────────────────────────────────┐
//! │ [SPDP]  PARTICIPANT_DISCOVERED(sensor-hub)   -> accepted   │
//! │ [SPDP]  PARTICIPANT_DISCOVERED(rogue-node)   -> ignored    │
//! │ [SEDP]  WRITER_DISCOVERED(sensor-hub, "SensorTopic")       │
//! │ [SEDP]  WRITER_DISCOVERED(rogue-node, ...)   -> suppressed │
//! │ [SPDP]  PARTICIPANT_REMOVED(sensor-hub)  <- lease expired  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Running the Sample
//!
//! ```bash
//! RUST_LOG=debug cargo run --bin discovery_listeners
//! HDDS_DISCOVERY_CALLBACK_MODE=notify cargo run --bin discovery_listeners
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hdds_participant_listener::xtypes::{EquivalenceKind, TypeIdentifierWithDependencies};
use hdds_participant_listener::{
    AuthenticationStatus, CallbackMode, Decision, DiscoveryNotifier, DiscoveryStatus, GUID,
    LocalParticipant, NotifierConfig, ParticipantAuthenticationInfo, ParticipantListener,
    RemoteParticipantInfo, RemoteReaderInfo, RemoteWriterInfo, String255, TypeIdentifier,
    TypeIdentifierWithSize, TypeInformation, TypeObject,
};

/// Keeps a live view of the domain and refuses untrusted participants.
struct TopologyMonitor {
    participants: AtomicU32,
    endpoints: AtomicU32,
}

impl TopologyMonitor {
    fn new() -> Self {
        Self {
            participants: AtomicU32::new(0),
            endpoints: AtomicU32::new(0),
        }
    }

    fn track(counter: &AtomicU32, status: DiscoveryStatus) {
        match status {
            DiscoveryStatus::Discovered => {
                counter.fetch_add(1, Ordering::Relaxed);
            }
            DiscoveryStatus::Removed => {
                counter.fetch_sub(1, Ordering::Relaxed);
            }
            DiscoveryStatus::ChangedQos => {}
        }
    }
}

impl ParticipantListener for TopologyMonitor {
    fn on_participant_discovery(&self, _local: &LocalParticipant, info: RemoteParticipantInfo) {
        Self::track(&self.participants, info.status());
        println!("[PARTICIPANT] {:?} {} ({})", info.status(), info.name(), info.guid());
    }

    fn on_participant_discovery_with_veto(
        &self,
        local: &LocalParticipant,
        info: RemoteParticipantInfo,
    ) -> Decision {
        if info.name().starts_with("rogue") || info.domain_id() != local.domain_id() {
            println!("[PARTICIPANT] {:?} {} -> IGNORED", info.status(), info.name());
            return Decision::Ignore;
        }
        self.on_participant_discovery(local, info);
        Decision::Accept
    }

    fn on_reader_discovery(&self, _local: &LocalParticipant, info: RemoteReaderInfo) {
        Self::track(&self.endpoints, info.status());
        println!(
            "[READER]      {:?} topic={} type={} reliability={:?}",
            info.status(),
            info.topic_name(),
            info.type_name(),
            info.qos().reliability
        );
    }

    fn on_reader_discovery_with_veto(
        &self,
        local: &LocalParticipant,
        info: RemoteReaderInfo,
    ) -> Decision {
        self.on_reader_discovery(local, info);
        Decision::Accept
    }

    fn on_writer_discovery(&self, _local: &LocalParticipant, info: RemoteWriterInfo) {
        Self::track(&self.endpoints, info.status());
        println!(
            "[WRITER]      {:?} topic={} type={}",
            info.status(),
            info.topic_name(),
            info.type_name()
        );
    }

    fn on_writer_discovery_with_veto(
        &self,
        local: &LocalParticipant,
        info: RemoteWriterInfo,
    ) -> Decision {
        self.on_writer_discovery(local, info);
        Decision::Accept
    }

    fn on_participant_authentication(
        &self,
        _local: &LocalParticipant,
        info: ParticipantAuthenticationInfo,
    ) {
        println!("[AUTH]        {} {:?}", info.guid(), info.status());
    }

    fn on_type_information_received(
        &self,
        _local: &LocalParticipant,
        topic_name: &String255,
        type_name: &String255,
        type_information: &TypeInformation,
    ) {
        println!(
            "[TYPE]        {} uses {} ({} dependencies)",
            topic_name,
            type_name,
            type_information.complete.dependent_typeid_count
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== HDDS Discovery Listeners Sample ===\n");

    let mut config = NotifierConfig::from_env();
    if std::env::var(hdds_participant_listener::config::ENV_CALLBACK_MODE).is_err() {
        config.callback_mode = CallbackMode::Veto;
    }
    println!("Callback mode: {:?}\n", config.callback_mode);

    let local = LocalParticipant::new([0x01; 12], "DiscoveryListeners", 0);
    let monitor = Arc::new(TopologyMonitor::new());
    let notifier = Arc::new(DiscoveryNotifier::with_listener(
        local,
        config,
        monitor.clone(),
    ));

    let hub = GUID::participant([0x10; 12]);
    let rogue = GUID::participant([0x66; 12]);

    // SPDP thread: participant announcements and authentication.
    let spdp = {
        let notifier = Arc::clone(&notifier);
        thread::spawn(move || -> hdds_participant_listener::Result<()> {
            notifier.notify_authentication(ParticipantAuthenticationInfo::new(
                AuthenticationStatus::Authorized,
                hub,
            ))?;
            notifier.notify_participant(
                RemoteParticipantInfo::new(DiscoveryStatus::Discovered, hub)
                    .with_name("sensor-hub")
                    .with_vendor_id([0x01, 0xAA]),
            )?;
            notifier.notify_participant(
                RemoteParticipantInfo::new(DiscoveryStatus::Discovered, rogue).with_name("rogue-node"),
            )?;
            Ok(())
        })
    };
    spdp.join().map_err(|_| "SPDP thread panicked")??;

    // SEDP: endpoints of both remote participants.
    let object = TypeObject::new(EquivalenceKind::Complete, b"struct SensorReading".to_vec());
    let type_id = TypeIdentifier::for_type_object(&object);
    let type_information = TypeInformation {
        minimal: TypeIdentifierWithDependencies::standalone(TypeIdentifierWithSize::new(
            type_id.clone(),
            24,
        )),
        complete: TypeIdentifierWithDependencies::standalone(TypeIdentifierWithSize::new(
            type_id,
            object.serialized.len() as u32,
        )),
    };

    let sensor_writer = RemoteWriterInfo::new(
        DiscoveryStatus::Discovered,
        GUID::new(hub.prefix, [0, 0, 1, 0x02]),
        "SensorTopic",
        "SensorReading",
    )?
    .with_type_information(type_information.clone());
    let command_reader = RemoteReaderInfo::new(
        DiscoveryStatus::Discovered,
        GUID::new(hub.prefix, [0, 0, 2, 0x04]),
        "CommandTopic",
        "Command",
    )?;
    let rogue_writer = RemoteWriterInfo::new(
        DiscoveryStatus::Discovered,
        GUID::new(rogue.prefix, [0, 0, 1, 0x02]),
        "SensorTopic",
        "SensorReading",
    )?;

    notifier.notify_writer(sensor_writer)?;
    notifier.notify_type_information_received(
        &String255::new("SensorTopic")?,
        &String255::new("SensorReading")?,
        &type_information,
    );
    notifier.notify_reader(command_reader)?;
    let delivery = notifier.notify_writer(rogue_writer)?;
    println!("[SEDP]        rogue writer: {:?}", delivery);

    println!(
        "\nLive topology: {} participant(s), {} endpoint(s)",
        monitor.participants.load(Ordering::Relaxed),
        monitor.endpoints.load(Ordering::Relaxed)
    );

    // Lease expiry: endpoints go first, then the participant.
    thread::sleep(Duration::from_millis(100));
    notifier.notify_reader(
        RemoteReaderInfo::new(
            DiscoveryStatus::Removed,
            GUID::new(hub.prefix, [0, 0, 2, 0x04]),
            "CommandTopic",
            "Command",
        )?,
    )?;
    notifier.notify_writer(
        RemoteWriterInfo::new(
            DiscoveryStatus::Removed,
            GUID::new(hub.prefix, [0, 0, 1, 0x02]),
            "SensorTopic",
            "SensorReading",
        )?,
    )?;
    notifier.notify_participant(
        RemoteParticipantInfo::new(DiscoveryStatus::Removed, hub).with_name("sensor-hub"),
    )?;

    let metrics = notifier.metrics().snapshot();
    let ignored = notifier.participant().ignore_list();
    println!(
        "\nDone: {} callbacks, {} vetoed, {} suppressed, {} participant(s) ignored",
        metrics.total_callbacks(),
        metrics.vetoes,
        metrics.suppressed,
        ignored.ignored_participant_count()
    );
    Ok(())
}
