//! Display-refresh driven animation clock.
//!
//! [`AnimationClock`] is a small `Stopped`/`Running` state machine. While
//! running, every display refresh it samples the current time, publishes the
//! sample to its subscriber and asks its [`FrameScheduler`] for the next
//! refresh. The scheduler is injected, so the same clock runs on top of
//! `requestAnimationFrame` in the browser and on a [`ManualScheduler`] in
//! tests.

use std::{
    cell::RefCell,
    collections::VecDeque,
    fmt,
    rc::{Rc, Weak},
};

use web_sys::wasm_bindgen::{prelude::Closure, JsCast};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::{error::Error, utils::get_window};

/// Callback run on the next display refresh.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Capability to run a callback after the next display refresh.
///
/// Implementations must not run the callback synchronously from
/// [`request_frame`](FrameScheduler::request_frame).
pub trait FrameScheduler {
    /// Token identifying a pending request.
    type Handle;

    /// Schedules `callback` for the next display refresh.
    fn request_frame(&mut self, callback: FrameCallback) -> Result<Self::Handle, Error>;

    /// Cancels a pending request. Cancelling a request that already fired is
    /// a no-op.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Source of wall-clock timestamps.
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

impl<F> TimeSource for F
where
    F: Fn() -> i64,
{
    fn now_millis(&self) -> i64 {
        self()
    }
}

/// [`TimeSource`] reading the system clock (`Date.now()` on the web).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or_default()
    }
}

/// Lifecycle of an [`AnimationClock`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// No refresh is pending.
    #[default]
    Stopped,
    /// A refresh is pending and samples are being published.
    Running,
}

/// Receives every published sample.
type Subscriber = Box<dyn FnMut(i64)>;

struct Inner<S: FrameScheduler> {
    state: ClockState,
    scheduler: S,
    pending: Option<S::Handle>,
    /// Bumped on every start and stop so that stale callbacks recognize
    /// themselves.
    generation: u64,
    time_source: Box<dyn TimeSource>,
    last_sample: Option<i64>,
    frames: u64,
    subscriber: Option<Subscriber>,
}

/// A continuous timing source publishing one timestamp per display refresh.
///
/// Cloning the clock yields another handle to the same state machine.
pub struct AnimationClock<S: FrameScheduler> {
    inner: Rc<RefCell<Inner<S>>>,
}

impl<S: FrameScheduler> Clone for AnimationClock<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: FrameScheduler> fmt::Debug for AnimationClock<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("AnimationClock")
            .field("state", &inner.state)
            .field("last_sample", &inner.last_sample)
            .field("frames", &inner.frames)
            .finish()
    }
}

impl<S> AnimationClock<S>
where
    S: FrameScheduler + 'static,
{
    /// Constructs a stopped clock sampling the system time.
    pub fn new(scheduler: S) -> Self {
        Self::with_time_source(scheduler, SystemTimeSource)
    }

    /// Constructs a stopped clock sampling the given [`TimeSource`].
    pub fn with_time_source<T>(scheduler: S, time_source: T) -> Self
    where
        T: TimeSource + 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state: ClockState::Stopped,
                scheduler,
                pending: None,
                generation: 0,
                time_source: Box::new(time_source),
                last_sample: None,
                frames: 0,
                subscriber: None,
            })),
        }
    }

    /// Sets the callback receiving every published sample, replacing the
    /// previous one.
    pub fn on_sample<F>(&self, subscriber: F)
    where
        F: FnMut(i64) + 'static,
    {
        self.inner.borrow_mut().subscriber = Some(Box::new(subscriber));
    }

    /// Starts publishing samples. Does nothing if already running.
    pub fn start(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state == ClockState::Running {
                tracing::trace!("animation clock already running");
                return;
            }
            inner.state = ClockState::Running;
            inner.generation += 1;
        }
        tracing::debug!("animation clock started");
        Self::schedule_next(&self.inner);
    }

    /// Stops publishing samples and cancels the pending refresh. Does nothing
    /// if already stopped.
    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == ClockState::Stopped {
            return;
        }
        inner.state = ClockState::Stopped;
        inner.generation += 1;
        if let Some(handle) = inner.pending.take() {
            inner.scheduler.cancel_frame(handle);
        }
        tracing::debug!(frames = inner.frames, "animation clock stopped");
    }

    /// Starts the clock if stopped, stops it otherwise.
    pub fn toggle(&self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Sends the most recent sample to the subscriber again, without
    /// sampling the time or scheduling a refresh.
    ///
    /// Used to redraw while paused. Returns `false` if nothing was published
    /// yet or if called from within the subscriber.
    pub fn republish(&self) -> bool {
        let (time, mut subscriber) = {
            let mut inner = self.inner.borrow_mut();
            match (inner.last_sample, inner.subscriber.take()) {
                (Some(time), Some(subscriber)) => (time, subscriber),
                (_, subscriber) => {
                    inner.subscriber = subscriber;
                    return false;
                }
            }
        };
        subscriber(time);
        let mut inner = self.inner.borrow_mut();
        if inner.subscriber.is_none() {
            inner.subscriber = Some(subscriber);
        }
        true
    }

    /// Returns the current state.
    pub fn state(&self) -> ClockState {
        self.inner.borrow().state
    }

    /// Returns `true` while samples are being published.
    pub fn is_running(&self) -> bool {
        self.state() == ClockState::Running
    }

    /// Returns the most recently published sample.
    pub fn last_sample(&self) -> Option<i64> {
        self.inner.borrow().last_sample
    }

    /// Returns the number of samples published so far.
    pub fn frames(&self) -> u64 {
        self.inner.borrow().frames
    }

    fn schedule_next(this: &Rc<RefCell<Inner<S>>>) {
        let weak: Weak<RefCell<Inner<S>>> = Rc::downgrade(this);
        let mut inner = this.borrow_mut();
        let generation = inner.generation;
        let callback: FrameCallback = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self::fire(&inner, generation);
            }
        });
        match inner.scheduler.request_frame(callback) {
            Ok(handle) => inner.pending = Some(handle),
            Err(error) => {
                tracing::warn!(%error, "unable to schedule the next frame, stopping the clock");
                inner.state = ClockState::Stopped;
                inner.generation += 1;
                inner.pending = None;
            }
        }
    }

    fn fire(this: &Rc<RefCell<Inner<S>>>, generation: u64) {
        let (time, mut subscriber) = {
            let mut inner = this.borrow_mut();
            if inner.state != ClockState::Running || inner.generation != generation {
                return;
            }
            inner.pending = None;
            let sampled = inner.time_source.now_millis();
            let time = inner.last_sample.map_or(sampled, |last| last.max(sampled));
            inner.last_sample = Some(time);
            inner.frames += 1;
            (time, inner.subscriber.take())
        };

        // The subscriber runs without a borrow so it can stop or restart the clock.
        if let Some(subscriber) = subscriber.as_mut() {
            subscriber(time);
        }

        {
            let mut inner = this.borrow_mut();
            if inner.subscriber.is_none() {
                inner.subscriber = subscriber;
            }
            if inner.state != ClockState::Running || inner.generation != generation {
                return;
            }
        }
        Self::schedule_next(this);
    }
}

/// [`FrameScheduler`] backed by `window.requestAnimationFrame`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimationFrameScheduler;

/// A pending `requestAnimationFrame` call.
///
/// Owns the JS closure, which stays valid until the request is dropped.
#[derive(Debug)]
pub struct AnimationFrameRequest {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl FrameScheduler for AnimationFrameScheduler {
    type Handle = AnimationFrameRequest;

    fn request_frame(&mut self, callback: FrameCallback) -> Result<Self::Handle, Error> {
        let closure = Closure::once(move || callback());
        let id = get_window()?
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(|error| Error::Schedule(format!("{error:?}")))?;
        Ok(AnimationFrameRequest {
            id,
            _closure: closure,
        })
    }

    fn cancel_frame(&mut self, request: Self::Handle) {
        if let Ok(window) = get_window() {
            if let Err(error) = window.cancel_animation_frame(request.id) {
                tracing::warn!(?error, "unable to cancel animation frame");
            }
        }
    }
}

#[derive(Default)]
struct ManualQueue {
    next_id: u64,
    callbacks: VecDeque<(u64, FrameCallback)>,
    refuse: bool,
}

/// [`FrameScheduler`] whose refreshes happen when [`fire`](Self::fire) is
/// called.
///
/// Clones share the same queue, so one clone can be handed to the clock and
/// another kept to drive it.
#[derive(Default, Clone)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualScheduler {
    /// Constructs an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pending requests.
    pub fn pending(&self) -> usize {
        self.queue.borrow().callbacks.len()
    }

    /// Simulates one display refresh: runs every callback pending at the time
    /// of the call and returns how many ran.
    pub fn fire(&self) -> usize {
        let callbacks = std::mem::take(&mut self.queue.borrow_mut().callbacks);
        let count = callbacks.len();
        for (_, callback) in callbacks {
            callback();
        }
        count
    }

    /// Makes subsequent requests fail, as a host refusing to schedule would.
    pub fn refuse_requests(&self, refuse: bool) {
        self.queue.borrow_mut().refuse = refuse;
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u64;

    fn request_frame(&mut self, callback: FrameCallback) -> Result<Self::Handle, Error> {
        let mut queue = self.queue.borrow_mut();
        if queue.refuse {
            return Err(Error::Schedule("request refused".into()));
        }
        queue.next_id += 1;
        let id = queue.next_id;
        queue.callbacks.push_back((id, callback));
        Ok(id)
    }

    fn cancel_frame(&mut self, handle: Self::Handle) {
        self.queue
            .borrow_mut()
            .callbacks
            .retain(|(id, _)| *id != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    /// Clock over a manual scheduler whose time advances 16ms per sample.
    fn manual_clock() -> (AnimationClock<ManualScheduler>, ManualScheduler, Rc<RefCell<Vec<i64>>>) {
        let scheduler = ManualScheduler::new();
        let now = Rc::new(Cell::new(1_000_i64));
        let time_source = {
            let now = Rc::clone(&now);
            move || {
                let time = now.get();
                now.set(time + 16);
                time
            }
        };
        let clock = AnimationClock::with_time_source(scheduler.clone(), time_source);
        let samples = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&samples);
        clock.on_sample(move |time| sink.borrow_mut().push(time));
        (clock, scheduler, samples)
    }

    #[test]
    fn publishes_one_sample_per_refresh() {
        let (clock, scheduler, samples) = manual_clock();
        assert_eq!(clock.state(), ClockState::Stopped);
        clock.start();
        assert_eq!(scheduler.pending(), 1);
        assert!(samples.borrow().is_empty());

        scheduler.fire();
        scheduler.fire();
        scheduler.fire();
        assert_eq!(*samples.borrow(), vec![1_000, 1_016, 1_032]);
        assert_eq!(clock.last_sample(), Some(1_032));
        assert_eq!(clock.frames(), 3);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn start_is_idempotent() {
        let (clock, scheduler, samples) = manual_clock();
        clock.start();
        clock.start();
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.fire(), 1);
        assert_eq!(samples.borrow().len(), 1);
    }

    #[test]
    fn stop_cancels_pending_refresh() {
        let (clock, scheduler, samples) = manual_clock();
        clock.start();
        clock.stop();
        assert_eq!(clock.state(), ClockState::Stopped);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.fire(), 0);
        assert!(samples.borrow().is_empty());
        // stopping twice is fine
        clock.stop();
    }

    #[test]
    fn stale_callback_does_not_publish() {
        let scheduler = ManualScheduler::new();
        let clock = AnimationClock::with_time_source(scheduler.clone(), || 5_i64);
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        clock.on_sample(move |_| sink.set(sink.get() + 1));
        clock.start();

        // A callback that escaped cancellation must stay inert.
        let stale = std::mem::take(&mut scheduler.queue.borrow_mut().callbacks);
        clock.stop();
        for (_, callback) in stale {
            callback();
        }
        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn subscriber_can_stop_the_clock() {
        let scheduler = ManualScheduler::new();
        let clock = AnimationClock::with_time_source(scheduler.clone(), || 7_i64);
        let handle = clock.clone();
        clock.on_sample(move |_| handle.stop());
        clock.start();
        assert_eq!(scheduler.fire(), 1);
        assert!(!clock.is_running());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn restart_inside_subscriber_keeps_one_schedule() {
        let scheduler = ManualScheduler::new();
        let clock = AnimationClock::with_time_source(scheduler.clone(), || 7_i64);
        let handle = clock.clone();
        clock.on_sample(move |_| {
            handle.stop();
            handle.start();
        });
        clock.start();
        scheduler.fire();
        assert!(clock.is_running());
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn scheduling_failure_stops_the_clock() {
        let (clock, scheduler, samples) = manual_clock();
        scheduler.refuse_requests(true);
        clock.start();
        assert_eq!(clock.state(), ClockState::Stopped);
        assert_eq!(scheduler.pending(), 0);

        scheduler.refuse_requests(false);
        clock.start();
        scheduler.refuse_requests(true);
        assert_eq!(scheduler.fire(), 1);
        assert_eq!(samples.borrow().len(), 1);
        assert_eq!(clock.state(), ClockState::Stopped);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn samples_never_go_backwards() {
        let scheduler = ManualScheduler::new();
        let times = Rc::new(RefCell::new(vec![300_i64, 100, 200, 400].into_iter()));
        let clock = AnimationClock::with_time_source(scheduler.clone(), move || {
            times.borrow_mut().next().unwrap_or_default()
        });
        let samples = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&samples);
        clock.on_sample(move |time| sink.borrow_mut().push(time));
        clock.start();
        for _ in 0..4 {
            scheduler.fire();
        }
        assert_eq!(*samples.borrow(), vec![300, 300, 300, 400]);
    }

    #[test]
    fn republish_repeats_the_last_sample() {
        let (clock, scheduler, samples) = manual_clock();
        assert!(!clock.republish());
        clock.start();
        scheduler.fire();
        clock.stop();

        assert!(clock.republish());
        assert_eq!(*samples.borrow(), vec![1_000, 1_000]);
        assert_eq!(clock.frames(), 1);
        assert_eq!(scheduler.pending(), 0);
        assert!(!clock.is_running());
    }

    #[test]
    fn toggle_flips_state() {
        let (clock, scheduler, _) = manual_clock();
        clock.toggle();
        assert!(clock.is_running());
        clock.toggle();
        assert!(!clock.is_running());
        assert_eq!(scheduler.pending(), 0);
    }
}
