//! Integration tests for the availability watchdog and bridge transitions.

use meteostick::app::events::{Availability, ChannelId, OfflineReason};
use meteostick::app::ports::BridgeStatus;

use super::mock_ports::{HOUR_BOUNDARY_MS, make_session};

const T0: u64 = HOUR_BOUNDARY_MS + 60_000;
const TIMEOUT_MS: u64 = 90_000;

#[test]
fn first_reading_marks_online_and_arms_watchdog() {
    let (session, _clock, mut sink) = make_session(T0);
    assert_eq!(session.availability(), Availability::Unknown);

    session.on_reading(&["T", "1", "18.0", "60.0", "-70"], &mut sink).unwrap();

    assert_eq!(session.availability(), Availability::Online);
    assert_eq!(sink.availability_changes(), vec![Availability::Online]);
    assert_eq!(session.watchdog_deadline_ms(), Some(T0 + TIMEOUT_MS));
    assert_eq!(session.last_data_ms(), Some(T0));
}

#[test]
fn silence_fires_exactly_at_deadline() {
    let (session, clock, mut sink) = make_session(T0);
    session.on_reading(&["R", "1", "1", "-65"], &mut sink).unwrap();
    sink.clear();

    clock.set(T0 + TIMEOUT_MS - 1);
    session.poll(&mut sink);
    assert_eq!(session.availability(), Availability::Online);

    clock.set(T0 + TIMEOUT_MS);
    session.poll(&mut sink);
    let expected = Availability::Offline(OfflineReason::CommunicationLost {
        last_data_ms: Some(T0),
    });
    assert_eq!(session.availability(), expected);
    assert_eq!(sink.availability_changes(), vec![expected]);

    // Fired once; further polls are quiet.
    clock.advance(TIMEOUT_MS);
    session.poll(&mut sink);
    assert_eq!(sink.availability_changes().len(), 1);
}

#[test]
fn reading_before_deadline_suppresses_firing() {
    let (session, clock, mut sink) = make_session(T0);
    session.on_reading(&["R", "1", "1", "-65"], &mut sink).unwrap();

    clock.set(T0 + 89_000);
    session.on_reading(&["R", "1", "2", "-65"], &mut sink).unwrap();

    clock.set(T0 + TIMEOUT_MS);
    session.poll(&mut sink);
    assert_eq!(session.availability(), Availability::Online);

    clock.set(T0 + 89_000 + TIMEOUT_MS);
    session.poll(&mut sink);
    assert!(matches!(
        session.availability(),
        Availability::Offline(OfflineReason::CommunicationLost { .. })
    ));
}

#[test]
fn reading_after_firing_recovers_online() {
    let (session, clock, mut sink) = make_session(T0);
    session.on_reading(&["R", "1", "1", "-65"], &mut sink).unwrap();
    clock.advance(TIMEOUT_MS);
    session.poll(&mut sink);
    assert!(!session.availability().is_online());

    clock.advance(5_000);
    session.on_reading(&["R", "1", "1", "-65"], &mut sink).unwrap();
    assert_eq!(session.availability(), Availability::Online);
    assert_eq!(
        session.watchdog_deadline_ms(),
        Some(T0 + TIMEOUT_MS + 5_000 + TIMEOUT_MS)
    );
}

#[test]
fn bridge_online_without_data_reports_no_data_received() {
    let (session, clock, mut sink) = make_session(T0);
    session.on_bridge_status(BridgeStatus::Online, &mut sink);
    assert_eq!(session.availability(), Availability::Online);

    clock.advance(TIMEOUT_MS);
    session.poll(&mut sink);
    let reason = OfflineReason::CommunicationLost { last_data_ms: None };
    assert_eq!(session.availability(), Availability::Offline(reason));
    assert_eq!(reason.to_string(), "No data received");
}

#[test]
fn bridge_offline_forces_offline_and_suspends_watchdog() {
    let (session, clock, mut sink) = make_session(T0);
    session.on_bridge_status(BridgeStatus::Online, &mut sink);
    session.on_reading(&["R", "1", "3", "-65"], &mut sink).unwrap();
    sink.clear();

    session.on_bridge_status(BridgeStatus::Offline, &mut sink);
    let bridge_down = Availability::Offline(OfflineReason::BridgeOffline);
    assert_eq!(session.availability(), bridge_down);
    assert_eq!(session.watchdog_deadline_ms(), None);

    // Reports that still trickle in are published but do not re-arm.
    clock.advance(10_000);
    session.on_reading(&["R", "1", "4", "-65"], &mut sink).unwrap();
    assert_eq!(session.availability(), bridge_down);
    assert_eq!(session.watchdog_deadline_ms(), None);
    assert_eq!(sink.last_number(ChannelId::RainRaw), Some(4.0));

    // The watchdog never overrides the bridge reason.
    clock.advance(10 * TIMEOUT_MS);
    session.poll(&mut sink);
    assert_eq!(sink.availability_changes(), vec![bridge_down]);
}

#[test]
fn bridge_back_online_rearms_from_transition() {
    let (session, clock, mut sink) = make_session(T0);
    session.on_bridge_status(BridgeStatus::Offline, &mut sink);

    clock.advance(30_000);
    session.on_bridge_status(BridgeStatus::Online, &mut sink);
    assert_eq!(session.availability(), Availability::Online);
    assert_eq!(session.watchdog_deadline_ms(), Some(T0 + 30_000 + TIMEOUT_MS));
    assert_eq!(
        sink.availability_changes(),
        vec![
            Availability::Offline(OfflineReason::BridgeOffline),
            Availability::Online,
        ]
    );
}

#[test]
fn repeated_online_reports_emit_one_transition() {
    let (session, clock, mut sink) = make_session(T0);
    for _ in 0..5 {
        session.on_reading(&["P", "1", "1.0", "-80"], &mut sink).unwrap();
        clock.advance(1_000);
    }
    assert_eq!(sink.availability_changes(), vec![Availability::Online]);
}
