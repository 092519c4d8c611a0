// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::too_many_lines)] // Example/test code

//! Discovery notification integration tests
//!
//! Drives a `DiscoveryNotifier` the way the SPDP/SEDP/TypeLookup layers do and
//! checks what the application listener observes.

use hdds_participant_listener::xtypes::{
    EquivalenceKind, TypeIdentifierWithDependencies, TypeKind,
};
use hdds_participant_listener::{
    CallbackMode, Decision, Delivery, DiscoveryNotifier, DiscoveryStatus, DynamicType,
    EntityState, Error, LocalParticipant, NotifierConfig, ParticipantListener, ParticipantQos,
    RemoteParticipantInfo, RemoteReaderInfo, RemoteWriterInfo, SampleIdentity, SequenceNumber,
    String255, TypeDiscovery, TypeIdentifier, TypeIdentifierWithSize, TypeInformation,
    TypeObject, TypeResolutionEvent, GUID,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Listener that records every callback as a short line.
#[derive(Default)]
struct Journal {
    lines: Mutex<Vec<String>>,
    participants: Mutex<Vec<RemoteParticipantInfo>>,
    veto_prefix: Option<u8>,
    veto_topic: Option<&'static str>,
}

impl Journal {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    fn push(&self, line: String) {
        self.lines.lock().push(line);
    }
}

impl ParticipantListener for Journal {
    fn on_participant_discovery(&self, _local: &LocalParticipant, info: RemoteParticipantInfo) {
        self.push(format!("P {:?} {}", info.status(), info.name()));
        self.participants.lock().push(info);
    }

    fn on_participant_discovery_with_veto(
        &self,
        _local: &LocalParticipant,
        info: RemoteParticipantInfo,
    ) -> Decision {
        self.push(format!("P! {:?} {}", info.status(), info.name()));
        let vetoed = self.veto_prefix == Some(info.guid().prefix[0]);
        self.participants.lock().push(info);
        if vetoed {
            Decision::Ignore
        } else {
            Decision::Accept
        }
    }

    fn on_reader_discovery(&self, _local: &LocalParticipant, info: RemoteReaderInfo) {
        self.push(format!("R {:?} {}", info.status(), info.topic_name()));
    }

    fn on_reader_discovery_with_veto(
        &self,
        _local: &LocalParticipant,
        info: RemoteReaderInfo,
    ) -> Decision {
        self.push(format!("R! {:?} {}", info.status(), info.topic_name()));
        if self.veto_topic == Some(info.topic_name().as_str()) {
            Decision::Ignore
        } else {
            Decision::Accept
        }
    }

    fn on_writer_discovery(&self, _local: &LocalParticipant, info: RemoteWriterInfo) {
        self.push(format!("W {:?} {}", info.status(), info.topic_name()));
    }

    fn on_writer_discovery_with_veto(
        &self,
        _local: &LocalParticipant,
        info: RemoteWriterInfo,
    ) -> Decision {
        self.push(format!("W! {:?} {}", info.status(), info.topic_name()));
        Decision::Accept
    }

    fn on_type_discovery(&self, _local: &LocalParticipant, discovery: TypeDiscovery<'_>) {
        let origin = if discovery.is_discovery_time() {
            format!("topic={}", discovery.topic())
        } else {
            format!("request={}", discovery.request_sample_id().sequence_number.0)
        };
        let dynamic = discovery
            .dynamic_type()
            .map_or_else(|| "-".to_string(), |t| t.name.clone());
        self.push(format!("T {} {}", origin, dynamic));
    }

    fn on_type_dependencies_reply(
        &self,
        _local: &LocalParticipant,
        request_sample_id: &SampleIdentity,
        dependencies: &[TypeIdentifierWithSize],
    ) {
        self.push(format!(
            "D {} {}",
            request_sample_id.sequence_number.0,
            dependencies.len()
        ));
    }

    fn on_type_information_received(
        &self,
        _local: &LocalParticipant,
        topic_name: &String255,
        type_name: &String255,
        type_information: &TypeInformation,
    ) {
        self.push(format!(
            "I {} {} partial={}",
            topic_name,
            type_name,
            type_information.complete.is_partial()
        ));
    }
}

fn notifier(mode: CallbackMode, journal: &Arc<Journal>) -> DiscoveryNotifier {
    let notifier = DiscoveryNotifier::new(
        LocalParticipant::new([0xAA; 12], "integration", 0),
        NotifierConfig::builder().callback_mode(mode).build(),
    );
    notifier.set_listener(journal.clone());
    notifier
}

fn participant(prefix: u8, status: DiscoveryStatus) -> RemoteParticipantInfo {
    RemoteParticipantInfo::new(status, GUID::participant([prefix; 12]))
        .with_name(format!("remote-{}", prefix))
        .with_domain_id(0)
}

fn reader(prefix: u8, key: u8, topic: &str, status: DiscoveryStatus) -> RemoteReaderInfo {
    RemoteReaderInfo::new(status, GUID::new([prefix; 12], [0, 0, key, 0x04]), topic, "Msg")
        .expect("names fit")
}

fn writer(prefix: u8, key: u8, topic: &str, status: DiscoveryStatus) -> RemoteWriterInfo {
    RemoteWriterInfo::new(status, GUID::new([prefix; 12], [0, 0, key, 0x02]), topic, "Msg")
        .expect("names fit")
}

#[test]
fn test_full_lifecycle_in_order() {
    use DiscoveryStatus::{ChangedQos, Discovered, Removed};

    let journal = Arc::new(Journal::default());
    let notifier = notifier(CallbackMode::Notify, &journal);

    notifier.notify_participant(participant(2, Discovered)).expect("p discovered");
    notifier.notify_reader(reader(2, 1, "chatter", Discovered)).expect("r discovered");
    notifier.notify_writer(writer(2, 2, "chatter", Discovered)).expect("w discovered");
    notifier.notify_participant(participant(2, ChangedQos)).expect("p qos");
    notifier.notify_reader(reader(2, 1, "chatter", ChangedQos)).expect("r qos");
    notifier.notify_reader(reader(2, 1, "chatter", Removed)).expect("r removed");
    notifier.notify_writer(writer(2, 2, "chatter", Removed)).expect("w removed");
    notifier.notify_participant(participant(2, Removed)).expect("p removed");

    assert_eq!(
        journal.lines(),
        vec![
            "P Discovered remote-2",
            "R Discovered chatter",
            "W Discovered chatter",
            "P ChangedQos remote-2",
            "R ChangedQos chatter",
            "R Removed chatter",
            "W Removed chatter",
            "P Removed remote-2",
        ]
    );
    assert!(notifier.known_participants().is_empty());

    let snapshot = notifier.metrics().snapshot();
    assert_eq!(snapshot.participant_callbacks, 3);
    assert_eq!(snapshot.reader_callbacks, 3);
    assert_eq!(snapshot.writer_callbacks, 2);
    assert_eq!(snapshot.invalid_transitions, 0);
}

#[test]
fn test_endpoints_leave_with_their_participant() {
    use DiscoveryStatus::{ChangedQos, Discovered, Removed};

    let journal = Arc::new(Journal::default());
    let notifier = notifier(CallbackMode::Notify, &journal);

    notifier.notify_participant(participant(2, Discovered)).expect("p discovered");
    notifier.notify_reader(reader(2, 1, "chatter", Discovered)).expect("r discovered");
    notifier.notify_reader(reader(2, 1, "chatter", ChangedQos)).expect("r qos");
    notifier.notify_writer(writer(2, 2, "pose", Discovered)).expect("w discovered");
    notifier.notify_writer(writer(2, 2, "pose", Removed)).expect("w removed");

    // Lease expiry: the live reader is removed before its participant.
    notifier.notify_participant(participant(2, Removed)).expect("p removed");

    // SEDP cleanup reported afterwards by the protocol.
    for late in [
        notifier.notify_reader(reader(2, 1, "chatter", Removed)),
        notifier.notify_writer(writer(2, 2, "pose", Removed)),
    ] {
        assert_eq!(late, Ok(Delivery::Suppressed));
    }

    // Same prefix announced again: a new instance with fresh endpoints.
    notifier.notify_participant(participant(2, Discovered)).expect("p rediscovered");
    notifier.notify_reader(reader(2, 1, "chatter", Discovered)).expect("r rediscovered");

    assert_eq!(
        journal.lines(),
        vec![
            "P Discovered remote-2",
            "R Discovered chatter",
            "R ChangedQos chatter",
            "W Discovered pose",
            "W Removed pose",
            "R Removed chatter",
            "P Removed remote-2",
            "P Discovered remote-2",
            "R Discovered chatter",
        ]
    );

    let removals = journal
        .lines()
        .iter()
        .filter(|line| line.as_str() == "R Removed chatter")
        .count();
    assert_eq!(removals, 1);
    assert_eq!(
        notifier.entity_state(&GUID::new([2; 12], [0, 0, 1, 0x04])),
        EntityState::Discovered
    );
    assert_eq!(notifier.metrics().snapshot().invalid_transitions, 0);
}

#[test]
fn test_endpoint_removal_uses_veto_family() {
    let journal = Arc::new(Journal::default());
    let notifier = notifier(CallbackMode::Veto, &journal);

    notifier
        .notify_participant(participant(3, DiscoveryStatus::Discovered))
        .expect("valid");
    notifier
        .notify_writer(writer(3, 1, "pose", DiscoveryStatus::Discovered))
        .expect("valid");
    notifier
        .notify_participant(participant(3, DiscoveryStatus::Removed))
        .expect("valid");

    assert_eq!(
        journal.lines(),
        vec![
            "P! Discovered remote-3",
            "W! Discovered pose",
            "W! Removed pose",
            "P! Removed remote-3",
        ]
    );
    assert_eq!(
        notifier.entity_state(&GUID::new([3; 12], [0, 0, 1, 0x02])),
        EntityState::Unknown
    );
}

#[test]
fn test_participant_announce_update_timeout() {
    let journal = Arc::new(Journal::default());
    let notifier = notifier(CallbackMode::Notify, &journal);
    let p1 = GUID::participant([0x31; 12]);

    notifier
        .notify_participant(RemoteParticipantInfo::new(DiscoveryStatus::Discovered, p1))
        .expect("announce");
    notifier
        .notify_participant(
            RemoteParticipantInfo::new(DiscoveryStatus::ChangedQos, p1).with_qos(ParticipantQos {
                lease_duration: Duration::from_secs(5),
                ..ParticipantQos::default()
            }),
        )
        .expect("qos update");
    notifier
        .notify_participant(RemoteParticipantInfo::new(DiscoveryStatus::Removed, p1))
        .expect("lease expired");

    let seen = journal.participants.lock();
    let statuses: Vec<_> = seen.iter().map(RemoteParticipantInfo::status).collect();
    assert_eq!(
        statuses,
        vec![
            DiscoveryStatus::Discovered,
            DiscoveryStatus::ChangedQos,
            DiscoveryStatus::Removed
        ]
    );
    assert!(seen.iter().all(|info| info.guid() == p1));
    assert_eq!(seen[0].qos(), &ParticipantQos::default());
    assert_eq!(seen[1].qos().lease_duration, Duration::from_secs(5));
}

#[test]
fn test_callback_family_is_exclusive() {
    for mode in [CallbackMode::Notify, CallbackMode::Veto] {
        let journal = Arc::new(Journal::default());
        let notifier = notifier(mode, &journal);

        notifier
            .notify_participant(participant(3, DiscoveryStatus::Discovered))
            .expect("valid");
        notifier
            .notify_writer(writer(3, 1, "pose", DiscoveryStatus::Discovered))
            .expect("valid");

        let lines = journal.lines();
        assert_eq!(lines.len(), 2, "one callback per event in {:?}", mode);
        let vetoable = lines.iter().filter(|line| line.contains('!')).count();
        match mode {
            CallbackMode::Notify => assert_eq!(vetoable, 0),
            CallbackMode::Veto => assert_eq!(vetoable, 2),
        }
    }
}

#[test]
fn test_participant_veto_hides_its_endpoints() {
    let journal = Arc::new(Journal {
        veto_prefix: Some(4),
        ..Journal::default()
    });
    let notifier = notifier(CallbackMode::Veto, &journal);

    let delivery = notifier
        .notify_participant(participant(4, DiscoveryStatus::Discovered))
        .expect("valid");
    assert_eq!(delivery, Delivery::Delivered(Decision::Ignore));

    notifier
        .notify_participant(participant(5, DiscoveryStatus::Discovered))
        .expect("valid");

    for delivery in [
        notifier
            .notify_reader(reader(4, 1, "secrets", DiscoveryStatus::Discovered))
            .expect("valid"),
        notifier
            .notify_writer(writer(4, 2, "secrets", DiscoveryStatus::Discovered))
            .expect("valid"),
        notifier
            .notify_participant(participant(4, DiscoveryStatus::ChangedQos))
            .expect("valid"),
        notifier
            .notify_participant(participant(4, DiscoveryStatus::Removed))
            .expect("valid"),
    ] {
        assert_eq!(delivery, Delivery::Suppressed);
    }

    notifier
        .notify_reader(reader(5, 1, "public", DiscoveryStatus::Discovered))
        .expect("valid");

    assert_eq!(
        journal.lines(),
        vec![
            "P! Discovered remote-4",
            "P! Discovered remote-5",
            "R! Discovered public",
        ]
    );
    assert_eq!(notifier.known_participants(), vec![GUID::participant([5; 12])]);
    assert_eq!(
        notifier.entity_state(&GUID::new([4; 12], [0, 0, 1, 0x04])),
        EntityState::Ignored
    );
    let ignored = notifier.participant().ignore_list();
    assert_eq!(ignored.ignored_participant_count(), 1);
    assert_eq!(ignored.ignored_endpoint_count(), 0);
}

#[test]
fn test_endpoint_veto_is_scoped() {
    let journal = Arc::new(Journal {
        veto_topic: Some("debug"),
        ..Journal::default()
    });
    let notifier = notifier(CallbackMode::Veto, &journal);

    notifier
        .notify_participant(participant(6, DiscoveryStatus::Discovered))
        .expect("valid");
    let vetoed = notifier
        .notify_reader(reader(6, 1, "debug", DiscoveryStatus::Discovered))
        .expect("valid");
    assert_eq!(vetoed.decision(), Some(Decision::Ignore));

    let suppressed = notifier
        .notify_reader(reader(6, 1, "debug", DiscoveryStatus::Removed))
        .expect("valid");
    assert_eq!(suppressed, Delivery::Suppressed);

    notifier
        .notify_reader(reader(6, 2, "telemetry", DiscoveryStatus::Discovered))
        .expect("valid");
    notifier
        .notify_writer(writer(6, 3, "debug", DiscoveryStatus::Discovered))
        .expect("valid");

    assert_eq!(
        journal.lines(),
        vec![
            "P! Discovered remote-6",
            "R! Discovered debug",
            "R! Discovered telemetry",
            "W! Discovered debug",
        ]
    );
    assert_eq!(notifier.known_participants(), vec![GUID::participant([6; 12])]);
}

#[test]
fn test_unignore_restarts_lifecycle() {
    let journal = Arc::new(Journal {
        veto_prefix: Some(7),
        ..Journal::default()
    });
    let notifier = notifier(CallbackMode::Veto, &journal);
    let remote = GUID::participant([7; 12]);

    notifier
        .notify_participant(participant(7, DiscoveryStatus::Discovered))
        .expect("valid");
    assert_eq!(notifier.entity_state(&remote), EntityState::Ignored);

    assert!(notifier.participant().unignore_participant(&remote));
    let delivery = notifier
        .notify_participant(participant(7, DiscoveryStatus::Discovered))
        .expect("fresh announcement after unignore");
    assert_eq!(delivery.decision(), Some(Decision::Ignore));
    assert_eq!(journal.lines().len(), 2);
}

#[test]
fn test_records_outlive_notifier() {
    let journal = Arc::new(Journal::default());
    {
        let notifier = notifier(CallbackMode::Notify, &journal);
        notifier
            .notify_participant(participant(8, DiscoveryStatus::Discovered).with_vendor_id([0x01, 0x10]))
            .expect("valid");
    }

    let kept = journal.participants.lock();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name(), "remote-8");
    assert_eq!(kept[0].vendor_id(), [0x01, 0x10]);
    assert_eq!(kept[0].guid(), GUID::participant([8; 12]));
}

#[test]
fn test_protocol_errors_surface() {
    let journal = Arc::new(Journal::default());
    let notifier = notifier(CallbackMode::Notify, &journal);

    let err = notifier
        .notify_participant(participant(9, DiscoveryStatus::Removed))
        .expect_err("removed before discovered");
    assert_eq!(
        err,
        Error::InvalidTransition {
            guid: GUID::participant([9; 12]),
            from: EntityState::Unknown,
            to: DiscoveryStatus::Removed,
        }
    );
    assert!(journal.lines().is_empty());
}

#[test]
fn test_listener_swap() {
    let notifier = DiscoveryNotifier::new(
        LocalParticipant::new([0xAA; 12], "integration", 0),
        NotifierConfig::default(),
    );
    assert!(!notifier.has_listener());
    assert_eq!(
        notifier
            .notify_participant(participant(10, DiscoveryStatus::Discovered))
            .expect("valid"),
        Delivery::NoListener
    );

    let journal = Arc::new(Journal::default());
    notifier.set_listener(journal.clone());
    notifier
        .notify_participant(participant(10, DiscoveryStatus::ChangedQos))
        .expect("state advanced without listener");
    notifier.clear_listener();
    notifier
        .notify_participant(participant(10, DiscoveryStatus::Removed))
        .expect("valid");

    assert_eq!(journal.lines(), vec!["P ChangedQos remote-10"]);
}

fn point_type() -> (TypeObject, TypeIdentifier, Arc<DynamicType>) {
    let object = TypeObject::new(EquivalenceKind::Complete, vec![0x51, 0x07, 0x00, 0x01]);
    let identifier = TypeIdentifier::for_type_object(&object);
    let dynamic = Arc::new(DynamicType {
        name: "geometry::Point".to_string(),
        type_id: identifier.clone(),
        members: Vec::new(),
    });
    (object, identifier, dynamic)
}

#[test]
fn test_type_discovery_origins() {
    let journal = Arc::new(Journal::default());
    let notifier = notifier(CallbackMode::Notify, &journal);
    let (object, identifier, dynamic) = point_type();

    let topic = String255::new("rt/points").expect("fits");
    let discovery =
        TypeDiscovery::from_discovery_time_typing(&topic, &identifier, Some(&object), Some(dynamic))
            .expect("topic set");
    assert!(!discovery.request_sample_id().is_valid());
    notifier.notify_type_discovery(discovery).expect("consistent");

    let request = SampleIdentity::new(GUID::new([3; 12], [0, 0, 3, 0xC3]), SequenceNumber(42));
    let primitive = TypeIdentifier::Primitive(TypeKind::TK_INT32);
    let discovery =
        TypeDiscovery::from_type_lookup(&request, &primitive, None, None).expect("valid request");
    assert!(discovery.topic().is_empty());
    notifier
        .notify_type_event(TypeResolutionEvent::TypeDiscovered(discovery))
        .expect("consistent");

    assert_eq!(
        journal.lines(),
        vec!["T topic=rt/points geometry::Point", "T request=42 -"]
    );
    assert_eq!(notifier.metrics().snapshot().type_callbacks, 2);
}

#[test]
fn test_type_discovery_rejects_inconsistent_origin() {
    let (_, identifier, _) = point_type();

    let empty = String255::new("").expect("fits");
    assert!(matches!(
        TypeDiscovery::from_discovery_time_typing(&empty, &identifier, None, None),
        Err(Error::TypeDiscoveryMismatch { .. })
    ));

    let sentinel = SampleIdentity::unknown();
    assert!(matches!(
        TypeDiscovery::from_type_lookup(&sentinel, &identifier, None, None),
        Err(Error::TypeDiscoveryMismatch { .. })
    ));
}

#[test]
fn test_type_dependencies_and_information() {
    let journal = Arc::new(Journal::default());
    let notifier = notifier(CallbackMode::Veto, &journal);
    let (_, identifier, _) = point_type();

    let request = SampleIdentity::new(GUID::new([3; 12], [0, 0, 3, 0xC3]), SequenceNumber(7));
    let dependencies = vec![
        TypeIdentifierWithSize::new(identifier.clone(), 64),
        TypeIdentifierWithSize::new(TypeIdentifier::StringSmall { bound: 32 }, 0),
    ];
    let delivery = notifier.notify_type_event(TypeResolutionEvent::TypeDependenciesReply {
        request_sample_id: &request,
        dependencies: &dependencies,
    });
    assert_eq!(delivery, Ok(Delivery::Delivered(Decision::Accept)));

    let topic = String255::new("rt/points").expect("fits");
    let type_name = String255::new("geometry::Point").expect("fits");
    let information = TypeInformation {
        minimal: TypeIdentifierWithDependencies::standalone(TypeIdentifierWithSize::new(
            identifier.clone(),
            32,
        )),
        complete: TypeIdentifierWithDependencies {
            typeid_with_size: TypeIdentifierWithSize::new(identifier, 64),
            dependent_typeid_count: 3,
            dependent_typeids: dependencies,
        },
    };
    notifier.notify_type_information_received(&topic, &type_name, &information);

    assert_eq!(
        journal.lines(),
        vec!["D 7 2", "I rt/points geometry::Point partial=true"]
    );
}

#[cfg(feature = "security")]
#[test]
fn test_authentication_is_reported() {
    use hdds_participant_listener::{AuthenticationStatus, ParticipantAuthenticationInfo};

    struct Auth {
        seen: Mutex<Vec<AuthenticationStatus>>,
    }

    impl ParticipantListener for Auth {
        fn on_participant_authentication(
            &self,
            _local: &LocalParticipant,
            info: ParticipantAuthenticationInfo,
        ) {
            self.seen.lock().push(info.status());
        }
    }

    let listener = Arc::new(Auth {
        seen: Mutex::new(Vec::new()),
    });
    let notifier = DiscoveryNotifier::new(
        LocalParticipant::new([0xAA; 12], "secure", 0),
        NotifierConfig::default(),
    );
    notifier.set_listener(listener.clone());

    let guid = GUID::participant([11; 12]);
    notifier
        .notify_authentication(ParticipantAuthenticationInfo::new(
            AuthenticationStatus::Authorized,
            guid,
        ))
        .expect("valid");
    notifier
        .notify_participant(RemoteParticipantInfo::new(DiscoveryStatus::Discovered, guid))
        .expect("authentication does not advance discovery state");

    assert_eq!(*listener.seen.lock(), vec![AuthenticationStatus::Authorized]);
    assert_eq!(notifier.entity_state(&guid), EntityState::Discovered);
}
