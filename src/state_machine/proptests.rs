//! Property-based tests for the state machine
//!
//! These tests drive a [`Session`] with arbitrary event sequences and check
//! that the transcript and lifecycle invariants hold throughout.

#![allow(clippy::needless_pass_by_value)]

use super::*;
use crate::conversation::{Role, USER_CONTENT_SEPARATOR};
use crate::runtime::Session;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-zA-Z][a-zA-Z ]{0,29}",
        1 => "[ \t\n]{0,3}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Start),
        arb_text().prop_map(|text| Event::UserMessage { text }),
        Just(Event::Finalize),
        "[a-zA-Z ]{1,30}".prop_map(|text| Event::CompletionSucceeded { text }),
        "[a-zA-Z ]{1,30}".prop_map(|message| Event::CompletionFailed { message }),
    ]
}

fn arb_phase() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::NotStarted),
        Just(Phase::Active),
        Just(Phase::Finalized),
    ]
}

fn arb_pending() -> impl Strategy<Value = Option<PendingRequest>> {
    prop_oneof![
        Just(None),
        Just(Some(PendingRequest::Reply)),
        Just(Some(PendingRequest::Article)),
    ]
}

fn arb_state() -> impl Strategy<Value = DialogueState> {
    (arb_phase(), arb_pending()).prop_map(|(phase, pending)| DialogueState { phase, pending })
}

/// One user turn followed by how its completion ends
#[derive(Debug, Clone)]
struct Turn {
    text: String,
    reply: Result<String, String>,
}

fn arb_reply() -> impl Strategy<Value = Result<String, String>> {
    prop_oneof![
        "[a-zA-Z ]{1,30}".prop_map(Ok::<String, String>),
        "[a-zA-Z ]{1,30}".prop_map(Err::<String, String>),
    ]
}

fn arb_turn() -> impl Strategy<Value = Turn> {
    (arb_text(), arb_reply()).prop_map(|(text, reply)| Turn { text, reply })
}

fn settle(session: &mut Session, reply: Result<String, String>) {
    let event = match reply {
        Ok(text) => Event::CompletionSucceeded { text },
        Err(message) => Event::CompletionFailed { message },
    };
    session.handle(event).unwrap();
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Rejected events never change anything, and the transcript only grows
    #[test]
    fn prop_rejections_leave_session_untouched(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut session = Session::with_persona("persona");

        for event in events {
            let before = session.snapshot();
            let len_before = session.conversation().len();

            match session.handle(event) {
                Ok(_) => {
                    prop_assert!(session.conversation().len() >= len_before);
                }
                Err(_) => {
                    prop_assert_eq!(session.snapshot(), before);
                    prop_assert_eq!(session.conversation().len(), len_before);
                }
            }
            prop_assert_eq!(session.conversation().messages()[0].role, Role::System);
        }
    }

    // Once started, the session never goes back to NotStarted
    #[test]
    fn prop_phase_never_regresses(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut session = Session::with_persona("persona");
        let mut started = false;

        for event in events {
            let _ = session.handle(event);
            let phase = session.state().phase;
            if started {
                prop_assert_ne!(phase, Phase::NotStarted);
            }
            started |= phase != Phase::NotStarted;
        }
    }

    // Every accepted completion outcome clears the in-flight flag
    #[test]
    fn prop_completion_releases_in_flight(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut session = Session::with_persona("persona");

        for event in events {
            let is_completion = matches!(
                event,
                Event::CompletionSucceeded { .. } | Event::CompletionFailed { .. }
            );
            if session.handle(event).is_ok() && is_completion {
                prop_assert!(!session.state().is_in_flight());
            }
        }
    }

    // Successful turns add two messages, failed turns add one, and the
    // extracted user content is exactly the accepted answers in order
    #[test]
    fn prop_transcript_growth(turns in proptest::collection::vec(arb_turn(), 0..15)) {
        let mut session = Session::with_persona("persona");
        session.handle(Event::Start).unwrap();

        let mut expected_len = 2;
        let mut accepted = Vec::new();

        for turn in turns {
            let result = session.handle(Event::user_message(turn.text.clone()));
            if turn.text.trim().is_empty() {
                prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyMessage);
                continue;
            }
            prop_assert!(result.is_ok());
            expected_len += if turn.reply.is_ok() { 2 } else { 1 };
            accepted.push(turn.text);
            settle(&mut session, turn.reply);

            prop_assert_eq!(session.conversation().len(), expected_len);
        }

        prop_assert_eq!(
            session.conversation().extract_user_content(),
            accepted.join(USER_CONTENT_SEPARATOR)
        );
    }

    // Finalizing never touches the main transcript
    #[test]
    fn prop_finalize_preserves_transcript(
        turns in proptest::collection::vec(arb_turn(), 0..8),
        article in arb_reply(),
    ) {
        let mut session = Session::with_persona("persona");
        session.handle(Event::Start).unwrap();
        for turn in turns {
            if session.handle(Event::user_message(turn.text)).is_ok() {
                settle(&mut session, turn.reply);
            }
        }
        let before = session.conversation().messages().to_vec();

        session.handle(Event::Finalize).unwrap();
        let succeeded = article.is_ok();
        settle(&mut session, article);

        prop_assert_eq!(session.conversation().messages(), before.as_slice());
        prop_assert_eq!(session.final_article().is_some(), succeeded);
        prop_assert_eq!(session.state().phase == Phase::Finalized, succeeded);
    }

    // Busy states reject every user action
    #[test]
    fn prop_busy_rejects_user_actions(
        state in arb_state().prop_filter("in flight", DialogueState::is_in_flight),
        text in arb_text(),
    ) {
        prop_assume!(state.phase != Phase::NotStarted);
        prop_assert_eq!(
            transition(&state, Event::user_message(text)).unwrap_err(),
            TransitionError::Busy
        );
        prop_assert_eq!(transition(&state, Event::Finalize).unwrap_err(), TransitionError::Busy);
    }

    // Transitions are deterministic
    #[test]
    fn prop_transition_is_pure(state in arb_state(), event in arb_event()) {
        let first = transition(&state, event.clone());
        let second = transition(&state, event);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.new_state, b.new_state);
                prop_assert_eq!(a.effects, b.effects);
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "transition gave different outcomes"),
        }
    }
}
