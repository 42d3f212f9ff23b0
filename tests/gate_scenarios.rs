//! End-to-end turn scenarios through the public API: a host surface with an
//! application listener, the interceptor in front of it, a headless presenter
//! answering questions, and a manual clock driving every delay.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use turn_gate::{
    AttachedGate, DispatchScope, GateConfig, HeadlessPresenter, HostRegistry, HostSurface,
    InputInterceptor, InputSources, KeyboardEvent, ListenPhase, ManualClock, MouseAction,
    MouseButton, NoticeBoard, Phase, PointerEvent, RawInput, SurfaceHost, Timers, TurnGate,
    HISTORY_LIMIT,
};

const FEEDBACK: Duration = Duration::from_millis(240);
const WRONG_FEEDBACK: Duration = Duration::from_millis(600);

struct World {
    clock: Rc<ManualClock>,
    timers: Timers,
    host: Rc<SurfaceHost>,
    presenter: Rc<HeadlessPresenter>,
    board: Rc<NoticeBoard>,
    attached: AttachedGate,
    /// Everything the application's own listener saw.
    app: Rc<RefCell<Vec<RawInput>>>,
}

impl World {
    fn new() -> Self {
        Self::with_config(GateConfig::default())
    }

    fn with_config(config: GateConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let clock = Rc::new(ManualClock::new());
        let timers = Timers::new(clock.clone());
        let host = Rc::new(SurfaceHost::new("c2canvas"));
        let presenter = Rc::new(HeadlessPresenter::new());
        let board = Rc::new(NoticeBoard::new());

        let registry = HostRegistry::new();
        registry.register(host.clone());

        // The application registered first, on the bubble phase
        let app = Rc::new(RefCell::new(Vec::new()));
        let app_log = app.clone();
        host.listen(
            DispatchScope::Global,
            InputSources::all(),
            ListenPhase::Bubble,
            Rc::new(move |event: &RawInput| {
                app_log.borrow_mut().push(event.clone());
                false
            }),
        );

        let builder = TurnGate::builder()
            .config(config)
            .rng(StdRng::seed_from_u64(2024))
            .timers(timers.clone())
            .presenter(presenter.clone())
            .notices(board.clone());
        let attached = InputInterceptor::attach(&registry, "c2canvas", builder).unwrap();

        Self {
            clock,
            timers,
            host,
            presenter,
            board,
            attached,
            app,
        }
    }

    fn gate(&self) -> &TurnGate {
        &self.attached.gate
    }

    fn advance(&self, ms: u64) {
        self.timers.advance(&self.clock, Duration::from_millis(ms));
    }

    fn app_events(&self) -> Vec<RawInput> {
        self.app.borrow().clone()
    }
}

fn key(k: &str) -> RawInput {
    KeyboardEvent::new(k).into()
}

#[test]
fn correct_answer_replays_the_exact_key() {
    let w = World::new();

    assert!(!w.host.inject(key("ArrowUp")));
    assert_eq!(w.gate().phase(), Phase::Prompting);
    assert!(w.app_events().is_empty());

    w.presenter.answer_correctly().unwrap();
    w.advance(FEEDBACK.as_millis() as u64);

    // Exactly one keydown, same key, global scope, inside the grace window
    assert_eq!(w.app_events(), vec![key("ArrowUp")]);
    let delivered = w.host.take_delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].scope, DispatchScope::Global);
    assert!(delivered[0].synthetic);
    assert_eq!(w.gate().phase(), Phase::Grace);
}

#[test]
fn wrong_answer_skips_the_turn_and_cools_down() {
    let w = World::new();

    w.host.inject(key("ArrowUp"));
    w.presenter.answer_incorrectly().unwrap();
    w.advance(WRONG_FEEDBACK.as_millis() as u64);

    assert!(w.app_events().is_empty());
    assert_eq!(w.board.visible().as_deref(), Some("Turn skipped"));
    assert_eq!(w.gate().phase(), Phase::Idle);

    // 500ms later: still cooling down, suppressed with another notice
    w.advance(500);
    assert!(!w.host.inject(key("ArrowDown")));
    assert_eq!(w.board.shown_count(), 2);
    assert_eq!(w.presenter.presented(), 1);

    // 1300ms after resolution: prompts again
    w.advance(800);
    assert!(!w.host.inject(key("ArrowDown")));
    assert_eq!(w.presenter.presented(), 2);
    assert_eq!(w.gate().phase(), Phase::Prompting);
    assert!(w.app_events().is_empty());
}

#[test]
fn notice_dismisses_itself() {
    let w = World::new();

    w.host.inject(key("a"));
    w.presenter.answer_incorrectly();
    w.advance(WRONG_FEEDBACK.as_millis() as u64);
    assert!(w.board.visible().is_some());

    w.advance(900);
    assert!(w.board.visible().is_none());
}

#[test]
fn input_while_prompting_is_dropped_not_queued() {
    let w = World::new();

    w.host.inject(key("a"));
    for k in ["b", "c", "d"] {
        assert!(!w.host.inject(key(k)));
    }
    assert_eq!(w.presenter.presented(), 1);
    assert_eq!(w.board.shown_count(), 0);

    w.presenter.answer_correctly();
    w.advance(FEEDBACK.as_millis() as u64);
    w.advance(500);

    // Only the first key is ever replayed
    assert_eq!(w.app_events(), vec![key("a")]);
}

#[test]
fn grace_window_lets_input_through() {
    let w = World::new();

    w.host.inject(key("a"));
    w.presenter.answer_correctly();
    w.advance(FEEDBACK.as_millis() as u64);

    w.advance(200);
    assert!(w.host.inject(key("b")));
    assert!(w.host.inject(PointerEvent::down(MouseButton::Left, 3, 4).into()));

    w.advance(300);
    assert_eq!(w.gate().phase(), Phase::Idle);
    assert!(!w.host.inject(key("c")));
    assert_eq!(w.presenter.presented(), 2);
    assert_eq!(w.app_events().len(), 3);
}

#[test]
fn double_click_on_an_answer_counts_once() {
    let w = World::new();

    w.host.inject(key("a"));
    let session = w.presenter.active().unwrap();
    let correct = session.question().correct_index();
    let wrong = (correct + 1) % session.question().choices().len();

    assert!(session.select(correct).is_some());
    assert!(session.select(correct).is_none());
    assert!(session.select(wrong).is_none());

    w.advance(2_000);
    assert_eq!(w.app_events(), vec![key("a")]);
    assert_eq!(w.presenter.feedback_log().len(), 1);
    assert_eq!(w.board.shown_count(), 0);
}

#[test]
fn unanswered_prompt_times_out_as_wrong() {
    let w = World::with_config(GateConfig::default().with_prompt_timeout(Some(Duration::from_secs(10))));

    w.host.inject(key("a"));
    w.advance(10_000);
    w.advance(WRONG_FEEDBACK.as_millis() as u64);

    assert_eq!(w.gate().phase(), Phase::Idle);
    assert!(w.gate().is_cooling_down());
    assert!(w.presenter.active().is_none());
    assert!(w.app_events().is_empty());
}

#[test]
fn prompt_waits_forever_by_default() {
    let w = World::new();

    w.host.inject(key("a"));
    w.advance(3_600_000);
    assert_eq!(w.gate().phase(), Phase::Prompting);
    assert!(w.presenter.active().is_some());
}

#[test]
fn pointer_replays_as_mouse_without_pointer_support() {
    let w = World::new();
    w.host.set_pointer_supported(false);

    assert!(!w.host.inject(PointerEvent::down(MouseButton::Left, 12, 7).into()));
    w.presenter.answer_correctly();
    w.advance(FEEDBACK.as_millis() as u64);

    let delivered = w.host.take_delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].scope, DispatchScope::Surface);
    match &delivered[0].input {
        RawInput::Mouse(mouse) => {
            assert_eq!(mouse.action, MouseAction::Down);
            assert_eq!(mouse.button, MouseButton::Left);
            assert_eq!((mouse.x, mouse.y), (12, 7));
        }
        other => panic!("expected a mouse event, got {other:?}"),
    }
    assert_eq!(w.host.focus_requests(), 0);
}

#[test]
fn failed_replay_focuses_the_host() {
    let w = World::new();

    w.host.inject(key("a"));
    w.host.set_fail_dispatch(true);
    w.presenter.answer_correctly();
    w.advance(FEEDBACK.as_millis() as u64);

    assert_eq!(w.host.focus_requests(), 1);
    assert!(w.app_events().is_empty());
    // The turn was still granted
    assert_eq!(w.gate().phase(), Phase::Grace);
}

#[test]
fn abandoned_session_neither_replays_nor_cools_down() {
    let w = World::new();

    w.host.inject(key("a"));
    assert!(w.gate().abandon());
    w.advance(2_000);

    assert_eq!(w.gate().phase(), Phase::Idle);
    assert!(!w.gate().is_cooling_down());
    assert!(w.app_events().is_empty());
    assert!(!w.host.inject(key("b")));
    assert_eq!(w.presenter.presented(), 2);
}

#[test]
fn missing_host_leaves_the_app_ungated() {
    let registry = HostRegistry::new();
    let result = InputInterceptor::attach(&registry, "c2canvas", TurnGate::builder());
    assert!(result.is_err());
}

#[test]
fn long_losing_streak_keeps_history_bounded() {
    let w = World::new();

    for _ in 0..1_000 {
        w.host.inject(key("a"));
        w.presenter.answer_incorrectly().unwrap();
        w.advance(WRONG_FEEDBACK.as_millis() as u64);
        for _ in 0..10 {
            assert!(!w.host.inject(key("b")));
        }
        w.advance(1_200);
    }

    assert_eq!(w.presenter.presented(), 1_000);
    assert_eq!(w.board.shown_count(), 11_000);
    assert_eq!(w.board.shown().len(), HISTORY_LIMIT);
    assert_eq!(w.presenter.feedback_log().len(), HISTORY_LIMIT);
    assert_eq!(w.host.delivered_count(), 0);
    assert!(w.app_events().is_empty());
    // Only the cooldown and notice timers of the last cycle can remain
    assert!(w.timers.pending() <= 2);
}
