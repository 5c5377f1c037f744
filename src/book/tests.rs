use std::time::Duration;

use crate::address::Protocol;
use crate::testing::{fresh_address, rtc_address, seed_address, TestChannel, TestClock, TestPlatform};

use super::*;

fn new_book(now: u64) -> Book<u64, TestChannel, TestClock, TestPlatform> {
    Book::new(
        BookConfig {
            local_address: fresh_address(Protocol::Ws, 0, now),
        },
        Vec::new(),
        TestClock::new(now),
        TestPlatform::online(),
    )
}

#[test]
fn add_admits_fresh_address_and_fires_event() {
    let mut book = new_book(1_000);
    let mut seen = Vec::new();
    book.subscribe(move |added| seen.extend(added.iter().map(|a| a.identity_key)));

    let admitted = book.add(None, vec![fresh_address(Protocol::Ws, 1, 1_000)]);
    assert_eq!(admitted, 1);
}

#[test]
fn add_rejects_the_local_address() {
    let mut book = new_book(1_000);
    let local = fresh_address(Protocol::Ws, 0, 1_000);
    assert_eq!(book.add(None, vec![local]), 0);
}

#[test]
fn add_rejects_timestamp_drift() {
    let mut book = new_book(1_000);
    let far_future = fresh_address(Protocol::Ws, 1, 1_000 + constants::MAX_TIMESTAMP_DRIFT.as_millis() as u64 + 1);
    assert_eq!(book.add(None, vec![far_future]), 0);
}

#[test]
fn add_rejects_aged_out_address_from_a_channel_but_not_from_seeding() {
    let mut book = new_book(10_000_000);
    let stale = fresh_address(Protocol::Dumb, 1, 0);

    assert_eq!(book.add(Some(TestChannel::new(1)), vec![stale.clone()]), 0);
    assert_eq!(book.add(None, vec![stale]), 1);
}

#[test]
fn seeds_are_immutable_and_hidden_from_query() {
    let mut book = new_book(1_000);
    book.add(None, vec![seed_address(Protocol::Ws, 1)]);

    let update = fresh_address(Protocol::Ws, 1, 1_000);
    assert_eq!(book.add(Some(TestChannel::new(1)), vec![update]), 0);

    assert!(book.query(ALL_PROTOCOLS, 0, 100).is_empty());
}

#[test]
fn rtc_route_over_distance_cap_is_rejected_and_purges_existing_route() {
    let mut book = new_book(1_000);
    let channel = TestChannel::new(1);
    book.add(Some(channel.clone()), vec![rtc_address(1, 100, 2, 1_000)]);

    let too_far = rtc_address(1, 100, constants::MAX_DISTANCE, 1_000);
    assert_eq!(book.add(Some(channel), vec![too_far]), 0);
}

#[test]
fn connecting_increments_and_decrements_connecting_count() {
    let mut book = new_book(1_000);
    book.add(None, vec![fresh_address(Protocol::Ws, 1, 1_000)]);

    book.connecting(&1);
    assert_eq!(book.connecting_count(), 1);

    book.connected(None, fresh_address(Protocol::Ws, 1, 1_000));
    assert_eq!(book.connecting_count(), 0);
}

#[test]
fn connected_without_prior_record_creates_one() {
    let mut book = new_book(1_000);
    assert!(book.connected(None, fresh_address(Protocol::Ws, 9, 1_000)).is_some());
    assert!(book.is_connected(&9));
}

#[test]
fn disconnected_removes_dumb_peers_but_not_ws_peers() {
    let mut book = new_book(1_000);

    book.add(None, vec![fresh_address(Protocol::Dumb, 1, 1_000)]);
    book.connected(None, fresh_address(Protocol::Dumb, 1, 1_000));
    book.disconnected(TestChannel::new(1), &1);
    assert!(!book.is_connected(&1));
    assert_eq!(book.query(ALL_PROTOCOLS, 0, 100).len(), 0);

    book.add(None, vec![fresh_address(Protocol::Ws, 2, 1_000)]);
    book.connected(None, fresh_address(Protocol::Ws, 2, 1_000));
    book.disconnected(TestChannel::new(2), &2);
    assert_eq!(book.query(ALL_PROTOCOLS, 0xFF, 100).len(), 1);
}

#[test]
fn disconnected_removes_peer_on_remote_close_while_online() {
    let mut book = new_book(1_000);
    book.add(None, vec![fresh_address(Protocol::Ws, 1, 1_000)]);
    book.connected(None, fresh_address(Protocol::Ws, 1, 1_000));

    book.disconnected(TestChannel::closed(1), &1);
    assert_eq!(book.query(ALL_PROTOCOLS, 0, 100).len(), 0);
}

#[test]
fn failure_escalates_to_ban_with_doubling_backoff_then_eventual_removal() {
    let mut book = new_book(1);
    book.add(None, vec![fresh_address(Protocol::Rtc, 1, 1)]);

    // MAX_FAILED_ATTEMPTS_RTC is 2: two failures bans, backoff doubles
    // from INITIAL_FAILED_BACKOFF each escalation until it saturates at
    // MAX_FAILED_BACKOFF, at which point the peer is dropped instead.
    book.failure(&1);
    book.failure(&1);

    assert!(book.is_banned(&1));
}

#[test]
fn unroutable_requires_matching_best_route() {
    let mut book = new_book(1_000);
    let good = TestChannel::new(1);
    let bad = TestChannel::new(2);
    book.add(Some(good.clone()), vec![rtc_address(1, 100, 0, 1_000)]);

    assert!(book.unroutable(bad, &1).is_none());
    assert!(book.unroutable(good, &1).is_some());
}

#[test]
fn ban_gates_is_banned_but_never_for_seeds() {
    let mut book = new_book(1_000);
    book.add(None, vec![fresh_address(Protocol::Ws, 1, 1_000)]);
    book.ban(fresh_address(Protocol::Ws, 1, 1_000), None);
    assert!(book.is_banned(&1));

    book.add(None, vec![seed_address(Protocol::Ws, 2)]);
    book.ban(seed_address(Protocol::Ws, 2), Some(Duration::from_secs(60)));
    assert!(!book.is_banned(&2));
}

#[test]
fn tick_unbans_expired_ban_and_reissues_added_event() {
    let mut book = new_book(1);
    book.add(None, vec![fresh_address(Protocol::Ws, 1, 1)]);
    book.ban(fresh_address(Protocol::Ws, 1, 1), Some(Duration::from_secs(1)));
    assert!(book.is_banned(&1));

    book.tick(2_000);
    assert!(!book.is_banned(&1));
}

#[test]
fn tick_never_touches_connecting_peers() {
    let mut book = new_book(1);
    book.add(None, vec![fresh_address(Protocol::Ws, 1, 1)]);
    book.connecting(&1);

    book.tick(10_000_000_000);
    assert_eq!(book.connecting_count(), 1);
}

#[test]
fn query_excludes_banned_failed_and_seed_records() {
    let mut book = new_book(1_000);
    book.add(
        None,
        vec![
            fresh_address(Protocol::Ws, 1, 1_000),
            seed_address(Protocol::Ws, 2),
        ],
    );
    book.failure(&1);

    assert!(book.query(ALL_PROTOCOLS, 0, 100).is_empty());
}
