//! Property-based tests for uploadtui
//!
//! These tests use proptest to verify invariants of the upload screen hold
//! across random sequences of triggers and callbacks.
//!
//! Run with: cargo test --test property_tests

use proptest::prelude::*;
use uploadtui::model::error::UploadError;
use uploadtui::model::upload_event::{AttemptId, UploadResponse};
use uploadtui::model::upload_screen::UploadScreen;

/// One thing that can happen to the screen
#[derive(Debug, Clone)]
enum Step {
    Trigger,
    Progress { sent: u64, total: Option<u64> },
    Success,
    Failure(String),
    /// A callback carrying an attempt id the screen never issued
    Stale,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => Just(Step::Trigger),
        6 => (0..2_000u64, prop::option::of(0..1_000u64))
            .prop_map(|(sent, total)| Step::Progress { sent, total }),
        1 => Just(Step::Success),
        1 => "[a-z ]{0,12}".prop_map(Step::Failure),
        1 => Just(Step::Stale),
    ]
}

/// Plays a step against the screen as the controller would; returns whether
/// the trigger was accepted
fn play(screen: &mut UploadScreen, step: &Step) -> Option<bool> {
    let current = screen.current_attempt();
    match step {
        Step::Trigger => Some(screen.on_upload_triggered().is_some()),
        Step::Progress { sent, total } => {
            if let Some(attempt) = current {
                screen.on_progress(attempt, *sent, *total);
            }
            None
        }
        Step::Success => {
            if let Some(attempt) = current {
                screen.on_success(attempt, UploadResponse::default());
            }
            None
        }
        Step::Failure(reason) => {
            if let Some(attempt) = current {
                screen.on_failure(attempt, &UploadError::failed(reason.clone()));
            }
            None
        }
        Step::Stale => {
            let stale = AttemptId { screen: screen.instance() + 1, seq: 1 };
            screen.on_progress(stale, 1, Some(1));
            screen.on_success(stale, UploadResponse::default());
            None
        }
    }
}

proptest! {
    /// A trigger is accepted exactly when nothing is in flight
    #[test]
    fn test_at_most_one_upload_in_flight(steps in prop::collection::vec(step_strategy(), 1..60)) {
        let mut screen = UploadScreen::new(1);
        for step in &steps {
            let was_uploading = screen.is_uploading();
            let before = screen.clone();
            if let Some(accepted) = play(&mut screen, step) {
                prop_assert_eq!(accepted, !was_uploading);
                if was_uploading {
                    prop_assert_eq!(&screen, &before);
                }
            }
        }
    }

    /// Progress never decreases inside an attempt and restarts at zero
    #[test]
    fn test_progress_monotonic_within_attempt(steps in prop::collection::vec(step_strategy(), 1..60)) {
        let mut screen = UploadScreen::new(1);
        for step in &steps {
            let attempt_before = screen.current_attempt();
            let progress_before = screen.progress();
            play(&mut screen, step);

            prop_assert!((0.0..=1.0).contains(&screen.progress()));
            let attempt_after = screen.current_attempt();
            if attempt_after.is_some() && attempt_after != attempt_before {
                prop_assert_eq!(screen.progress(), 0.0);
            } else if attempt_before.is_some() {
                prop_assert!(screen.progress() >= progress_before);
            }
        }
    }

    /// Button and indicators always agree with the in-flight flag
    #[test]
    fn test_view_flags_follow_upload_state(steps in prop::collection::vec(step_strategy(), 1..60)) {
        let mut screen = UploadScreen::new(1);
        for step in &steps {
            play(&mut screen, step);
            prop_assert_eq!(screen.button_enabled(), !screen.is_uploading());
            prop_assert_eq!(screen.indicators_visible(), screen.is_uploading());
        }
    }

    /// After a terminal callback the screen is idle and further terminals are dropped
    #[test]
    fn test_single_terminal_callback(reason in "[a-z]{1,10}", succeed in any::<bool>()) {
        let mut screen = UploadScreen::new(1);
        let attempt = screen.on_upload_triggered().unwrap();
        if succeed {
            prop_assert!(screen.on_success(attempt, UploadResponse::default()));
        } else {
            prop_assert!(screen.on_failure(attempt, &UploadError::failed(reason.clone())));
        }
        prop_assert!(!screen.is_uploading());
        let settled = screen.clone();
        prop_assert!(!screen.on_success(attempt, UploadResponse::default()));
        prop_assert!(!screen.on_failure(attempt, &UploadError::failed(reason)));
        prop_assert_eq!(screen, settled);
    }

    /// Nothing reaches a torn down screen
    #[test]
    fn test_teardown_freezes_state(steps in prop::collection::vec(step_strategy(), 0..40)) {
        let mut screen = UploadScreen::new(1);
        let attempt = screen.on_upload_triggered().unwrap();
        screen.tear_down();
        let frozen = screen.clone();
        for step in &steps {
            play(&mut screen, step);
            screen.on_progress(attempt, 1, Some(2));
        }
        prop_assert_eq!(screen, frozen);
    }
}
