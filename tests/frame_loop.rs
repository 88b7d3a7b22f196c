use std::{cell::RefCell, rc::Rc};

use colorsine::{
    clock::ManualScheduler,
    event::{KeyCode, KeyEvent},
    height::{height_for, TileAnimationParameters},
    params::{Parameter, ParameterStore},
    app::{dispatch_key, TITLE},
    ratatui::{backend::TestBackend, Terminal},
    AnimationClock, App, AppAction, ClockState, RenderOnClock,
};

struct Harness {
    scheduler: ManualScheduler,
    clock: AnimationClock<ManualScheduler>,
    now: Rc<RefCell<i64>>,
    app: Rc<RefCell<App>>,
    top_row: Rc<RefCell<String>>,
}

/// Wires an [`App`] to a clock driven by hand, drawing on a 40x10 test
/// terminal. The harness remembers the text of the last drawn top row.
fn harness(store: ParameterStore) -> Harness {
    let scheduler = ManualScheduler::new();
    let now = Rc::new(RefCell::new(0_i64));
    let clock = AnimationClock::with_time_source(scheduler.clone(), {
        let now = Rc::clone(&now);
        move || *now.borrow()
    });
    let app = Rc::new(RefCell::new(App::new(store)));
    let top_row = Rc::new(RefCell::new(String::new()));
    let terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
    terminal.render_on_clock(&clock, {
        let app = Rc::clone(&app);
        let top_row = Rc::clone(&top_row);
        move |frame, time| {
            let mut app = app.borrow_mut();
            app.on_tick(time).unwrap();
            app.render(frame);
            let buf = frame.buffer_mut();
            *top_row.borrow_mut() = (0..buf.area.width).map(|x| buf[(x, 0)].symbol()).collect();
        }
    });
    Harness {
        scheduler,
        clock,
        now,
        app,
        top_row,
    }
}

impl Harness {
    fn refresh(&self, time: i64) {
        *self.now.borrow_mut() = time;
        self.scheduler.fire();
    }

    fn press(&self, code: KeyCode) -> AppAction {
        dispatch_key(&self.app, &self.clock, KeyEvent::new(code))
    }
}

#[test]
fn every_refresh_publishes_one_frame() {
    let harness = harness(ParameterStore::default());
    harness.clock.start();
    harness.clock.start();
    assert_eq!(harness.scheduler.pending(), 1);

    for time in [16, 33, 50] {
        harness.refresh(time);
        assert_eq!(harness.app.borrow().frame().time, time);
    }
    assert_eq!(harness.clock.frames(), 3);
    assert!(harness.top_row.borrow().contains(TITLE));
}

#[test]
fn frames_use_a_single_timestamp() {
    let mut store = ParameterStore::default();
    store.set(Parameter::Resolution, 8.0);
    store.set(Parameter::Speed, 120.0);
    let harness = harness(store.clone());
    harness.clock.start();
    harness.refresh(1_000);

    let app = harness.app.borrow();
    let params = TileAnimationParameters {
        time: 1_000,
        ..store.tile_parameters(0)
    };
    for tile in &app.frame().tiles {
        assert_eq!(tile.height, height_for(tile.index, &params).unwrap());
    }
}

#[test]
fn pausing_freezes_the_tiles() {
    let harness = harness(ParameterStore::default());
    harness.clock.start();
    harness.refresh(100);

    assert_eq!(harness.press(KeyCode::Char(' ')), AppAction::ToggleClock);
    assert_eq!(harness.clock.state(), ClockState::Stopped);

    harness.refresh(200);
    assert_eq!(harness.app.borrow().frame().time, 100);

    harness.press(KeyCode::Char(' '));
    harness.refresh(300);
    assert_eq!(harness.app.borrow().frame().time, 300);
}

#[test]
fn parameter_changes_apply_from_the_next_frame() {
    let harness = harness(ParameterStore::default());
    harness.clock.start();
    harness.refresh(10);
    assert_eq!(harness.app.borrow().frame().len(), 200);

    harness
        .app
        .borrow_mut()
        .handle_key(KeyEvent::new(KeyCode::PageDown));
    assert_eq!(harness.app.borrow().frame().len(), 200);

    harness.refresh(20);
    assert_eq!(harness.app.borrow().frame().len(), 190);
}

#[test]
fn scheduling_failure_stops_the_loop() {
    let harness = harness(ParameterStore::default());
    harness.clock.start();
    harness.scheduler.refuse_requests(true);
    harness.refresh(10);
    assert_eq!(harness.clock.state(), ClockState::Stopped);
    assert_eq!(harness.scheduler.pending(), 0);

    harness.scheduler.refuse_requests(false);
    harness.refresh(20);
    assert_eq!(harness.app.borrow().frame().time, 10);
}

#[test]
fn keys_redraw_while_paused() {
    let harness = harness(ParameterStore::default());
    harness.clock.start();
    harness.refresh(100);
    assert!(harness.top_row.borrow().contains(TITLE));

    assert_eq!(harness.press(KeyCode::Char(' ')), AppAction::ToggleClock);
    assert!(!harness.clock.is_running());

    assert_eq!(harness.press(KeyCode::Char('s')), AppAction::Handled);
    assert!(!harness.top_row.borrow().contains(TITLE));

    harness.press(KeyCode::PageDown);
    let app = harness.app.borrow();
    assert_eq!(app.frame().len(), 190);
    assert_eq!(app.frame().time, 100);
    assert_eq!(harness.scheduler.pending(), 0);
}
