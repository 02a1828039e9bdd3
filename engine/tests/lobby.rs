use std::time::{Duration, Instant};

use brawl_engine::lobby::{AdmissionError, Lobby};
use brawl_engine::ParticipantId;

fn id(s: &str) -> ParticipantId {
    ParticipantId::new(s)
}

#[test]
fn challenge_then_accept_reserves_both_sides() {
    let mut lobby = Lobby::default();
    let now = Instant::now();
    lobby.challenge(&id("alice"), &id("bob"), "arena", now).unwrap();
    assert!(lobby.is_busy(&id("alice")));
    assert!(lobby.is_busy(&id("bob")));
    assert_eq!(lobby.pending_for(&id("bob")).unwrap().challenger, id("alice"));

    let reservation = lobby.accept(&id("bob"), "arena", now).unwrap();
    assert_eq!(reservation.members(), &[id("alice"), id("bob")]);
    assert!(lobby.pending_for(&id("bob")).is_none());
    assert!(lobby.is_busy(&id("alice")));

    lobby.release(reservation);
    assert!(!lobby.is_busy(&id("alice")));
    assert!(!lobby.is_busy(&id("bob")));
}

#[test]
fn self_challenge_is_refused() {
    let mut lobby = Lobby::default();
    assert_eq!(
        lobby.challenge(&id("alice"), &id("alice"), "arena", Instant::now()),
        Err(AdmissionError::SelfChallenge)
    );
}

#[test]
fn busy_participants_cannot_be_challenged() {
    let mut lobby = Lobby::default();
    let now = Instant::now();
    lobby.challenge(&id("alice"), &id("bob"), "arena", now).unwrap();
    assert_eq!(
        lobby.challenge(&id("carol"), &id("bob"), "arena", now),
        Err(AdmissionError::Busy(id("bob")))
    );
    assert_eq!(
        lobby.challenge(&id("alice"), &id("carol"), "arena", now),
        Err(AdmissionError::Busy(id("alice")))
    );
}

#[test]
fn accept_must_happen_in_the_same_venue() {
    let mut lobby = Lobby::default();
    let now = Instant::now();
    lobby.challenge(&id("alice"), &id("bob"), "arena", now).unwrap();
    assert_eq!(
        lobby.accept(&id("bob"), "tavern", now),
        Err(AdmissionError::WrongVenue { expected: "arena".into() })
    );
    // still pending after the wrong-venue attempt
    assert!(lobby.accept(&id("bob"), "arena", now).is_ok());
}

#[test]
fn challenges_expire_after_the_timeout() {
    let mut lobby = Lobby::new(Duration::from_secs(60));
    let start = Instant::now();
    lobby.challenge(&id("alice"), &id("bob"), "arena", start).unwrap();

    let later = start + Duration::from_secs(61);
    assert_eq!(
        lobby.accept(&id("bob"), "arena", later),
        Err(AdmissionError::NoPendingChallenge(id("bob")))
    );
    assert!(!lobby.is_busy(&id("alice")));
    assert!(!lobby.is_busy(&id("bob")));
}

#[test]
fn expired_challenge_frees_the_challenger_for_a_new_one() {
    let mut lobby = Lobby::new(Duration::from_secs(60));
    let start = Instant::now();
    lobby.challenge(&id("alice"), &id("bob"), "arena", start).unwrap();
    let later = start + Duration::from_secs(90);
    lobby.challenge(&id("alice"), &id("carol"), "arena", later).unwrap();
    assert_eq!(lobby.pending_for(&id("carol")).unwrap().challenger, id("alice"));
}

#[test]
fn decline_returns_the_challenger_and_frees_both() {
    let mut lobby = Lobby::default();
    let now = Instant::now();
    lobby.challenge(&id("alice"), &id("bob"), "arena", now).unwrap();
    assert_eq!(lobby.decline(&id("bob"), now), Ok(id("alice")));
    assert!(!lobby.is_busy(&id("alice")));
    assert_eq!(
        lobby.decline(&id("bob"), now),
        Err(AdmissionError::NoPendingChallenge(id("bob")))
    );
}

#[test]
fn reserving_a_roster_lists_every_busy_member() {
    let mut lobby = Lobby::default();
    let now = Instant::now();
    let first = lobby.reserve(&[id("a"), id("b")], now).unwrap();
    lobby.challenge(&id("c"), &id("d"), "arena", now).unwrap();

    let err = lobby.reserve(&[id("a"), id("c"), id("e")], now).unwrap_err();
    assert_eq!(err, AdmissionError::RosterBusy(vec![id("a"), id("c")]));
    assert!(!lobby.is_busy(&id("e")));

    lobby.release(first);
    let second = lobby.reserve(&[id("a"), id("b"), id("e")], now).unwrap();
    assert_eq!(second.members().len(), 3);
    lobby.release(second);
}
