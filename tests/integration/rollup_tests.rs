//! Integration tests for the hourly rain rollup.

use meteostick::app::events::ChannelId;

use super::mock_ports::{HOUR_BOUNDARY_MS, HOUR_MS, approx, make_session};

#[test]
fn first_rollup_lands_on_next_hour_boundary() {
    // 22:17:43
    let start = HOUR_BOUNDARY_MS + 17 * 60_000 + 43_000;
    let (session, clock, mut sink) = make_session(start);
    let first = HOUR_BOUNDARY_MS + HOUR_MS;
    assert_eq!(session.next_rollup_ms(), Some(first));

    clock.set(first - 1);
    session.poll(&mut sink);
    assert!(sink.values(ChannelId::RainLastHour).is_empty());

    clock.set(first);
    session.poll(&mut sink);
    assert_eq!(sink.values(ChannelId::RainLastHour).len(), 1);
    assert_eq!(session.next_rollup_ms(), Some(first + HOUR_MS));
}

#[test]
fn rollup_republishes_window_without_new_data() {
    let start = HOUR_BOUNDARY_MS + 20 * 60_000;
    let (session, clock, mut sink) = make_session(start);

    session.on_reading(&["R", "1", "100", "-65"], &mut sink).unwrap();
    clock.advance(10 * 60_000);
    session.on_reading(&["R", "1", "108", "-65"], &mut sink).unwrap();

    // 23:00: both samples inside the window.
    clock.set(HOUR_BOUNDARY_MS + HOUR_MS);
    session.poll(&mut sink);
    let first = sink.last_number(ChannelId::RainLastHour).unwrap();
    assert!(approx(first, 8.0 * 0.254), "got {first}");

    // 23:25: no new reports, but the first sample (22:20) has aged out.
    clock.set(HOUR_BOUNDARY_MS + HOUR_MS + 25 * 60_000);
    session.poll(&mut sink);
    assert_eq!(sink.values(ChannelId::RainLastHour).len(), 1);

    // 00:00: republished although nothing arrived; both samples aged out.
    clock.set(HOUR_BOUNDARY_MS + 2 * HOUR_MS);
    session.poll(&mut sink);
    let values = sink.values(ChannelId::RainLastHour);
    assert_eq!(values.len(), 2);
    assert_eq!(values[1].as_f32(), 0.0);
}

#[test]
fn rollup_does_not_touch_current_hour_channel() {
    let (session, clock, mut sink) = make_session(HOUR_BOUNDARY_MS + 1_000);
    clock.set(HOUR_BOUNDARY_MS + HOUR_MS);
    session.poll(&mut sink);
    assert!(sink.values(ChannelId::RainCurrentHour).is_empty());
    assert_eq!(sink.last_number(ChannelId::RainLastHour), Some(0.0));
}

#[test]
fn disposed_session_stops_rolling_up() {
    let (session, clock, mut sink) = make_session(HOUR_BOUNDARY_MS + 1_000);
    session.dispose();
    clock.set(HOUR_BOUNDARY_MS + 3 * HOUR_MS);
    session.poll(&mut sink);
    assert!(sink.events.is_empty());
}
