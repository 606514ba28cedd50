use pretty_assertions::assert_eq;
use scenex_core::{Choice, Phase, SessionPhase, TrialSpec};
use scenex_experiment::{DisplayRegion, RunningTrial, ScenePresenter, Session, SessionConfig, SessionEvent};
use scenex_timing::ManualTimer;
use serde_json::json;

type TestSession = Session<ScenePresenter<ManualTimer>, ManualTimer>;

fn trials() -> Vec<TrialSpec> {
    vec![
        serde_json::from_value(json!({
            "prompt_type": "confirm",
            "prompt": "Is the man in front of the car?",
            "referents": { "A": "man", "B": "car" },
            "arrow_frame_path": "mancar-01.arrow.png",
        }))
        .unwrap(),
        serde_json::from_value(json!({
            "prompt_type": "count",
            "prompt": "How many objects are near the car?",
            "referents": { "A": "man", "B": "car" },
            "frame_path": "mancar-02.png",
        }))
        .unwrap(),
    ]
}

fn session(trials: Vec<TrialSpec>) -> (TestSession, ManualTimer) {
    let timer = ManualTimer::new();
    let config = SessionConfig {
        inter_trial_interval_ms: 500,
        ..SessionConfig::default()
    };
    let session = Session::new(config, ScenePresenter::new(timer.clone()), timer.clone(), trials);
    (session, timer)
}

fn pump(session: &mut TestSession) {
    for event in session.update() {
        session.handle_event(event);
    }
}

#[test]
fn runs_every_trial_then_debriefs() {
    let (mut session, timer) = session(trials());
    assert!(session.current_phase().is_welcome());
    assert!(session.display().is_empty());

    assert!(session.handle_event(SessionEvent::StartPressed));
    assert_eq!(*session.current_phase(), SessionPhase::Trials);
    assert_eq!(session.trial_progress(), Some((1, 2)));
    assert_eq!(
        session.display().view().unwrap().image.as_deref(),
        Some("/renders/mancar-01.arrow.png")
    );

    timer.advance_ms(300);
    assert!(session.handle_event(SessionEvent::Click("Yes".into())));
    assert!(session.display().is_empty());
    assert!(session.current_trial().is_none());
    assert_eq!(session.pending_timeouts(), 1);
    assert_eq!(session.trial_progress(), Some((1, 2)), "blank still counts the answered trial");

    timer.advance_ms(499);
    pump(&mut session);
    assert!(session.display().is_empty(), "still inside the inter-trial interval");

    timer.advance_ms(1);
    pump(&mut session);
    assert_eq!(session.trial_progress(), Some((2, 2)));
    assert!(session.current_trial().is_some_and(|trial| !trial.is_resolved()));
    assert_eq!(
        session.display().view().unwrap().labels().collect::<Vec<_>>(),
        ["0", "1", "2"]
    );

    timer.advance_ms(800);
    assert!(session.handle_event(SessionEvent::Click("2".into())));
    timer.advance_ms(500);
    pump(&mut session);

    assert!(session.current_phase().is_debrief());
    assert_eq!(session.trial_progress(), None);

    let results = session.results();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].choice, Some(Choice::Label("Yes".into())));
    assert!((results[0].rt.unwrap() - 300.0).abs() < 1e-6);
    assert_eq!(results[1].choice, Some(Choice::Count(2)));
    assert!((results[1].rt.unwrap() - 800.0).abs() < 1e-6);
}

#[test]
fn double_click_yields_one_record() {
    let (mut session, _timer) = session(trials());
    session.handle_event(SessionEvent::StartPressed);

    assert!(session.handle_event(SessionEvent::Click("No".into())));
    assert!(!session.handle_event(SessionEvent::Click("Yes".into())));

    assert_eq!(session.results().len(), 1);
    assert_eq!(session.results()[0].choice, Some(Choice::Label("No".into())));
}

#[test]
fn clicks_outside_the_trial_block_are_ignored() {
    let (mut session, _timer) = session(trials());
    assert!(!session.handle_event(SessionEvent::Click("Yes".into())));
    assert!(session.results().is_empty());
    assert!(session.current_phase().is_welcome());
}

#[test]
fn empty_trial_list_goes_straight_to_debrief() {
    let (mut session, _timer) = session(Vec::new());
    session.handle_event(SessionEvent::StartPressed);
    assert!(session.current_phase().is_debrief());
    assert!(session.results().is_empty());

    assert!(!session.should_exit());
    session.handle_event(SessionEvent::StartPressed);
    assert!(session.should_exit());
}

#[test]
fn exit_is_honoured_in_any_phase() {
    let (mut session, _timer) = session(trials());
    session.handle_event(SessionEvent::StartPressed);
    assert!(session.handle_event(SessionEvent::ExitRequested));
    assert!(session.should_exit());
}

#[test]
fn huge_inter_trial_interval_still_stores_the_record() {
    let timer = ManualTimer::new();
    let config = SessionConfig {
        inter_trial_interval_ms: 20_000_000_000_000,
        ..SessionConfig::default()
    };
    let mut session: TestSession =
        Session::new(config, ScenePresenter::new(timer.clone()), timer.clone(), trials());
    session.handle_event(SessionEvent::StartPressed);

    assert!(session.handle_event(SessionEvent::Click("Yes".into())));
    assert_eq!(session.results().len(), 1);
    assert_eq!(session.pending_timeouts(), 1);

    timer.advance_ms(60_000);
    pump(&mut session);
    assert!(session.display().is_empty(), "next trial waits for the full interval");
}
