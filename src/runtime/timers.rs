//! Timers - Deadline-ordered fire-and-forget callbacks
//!
//! There are no ambient timers: nothing fires until the owner of the event
//! loop calls [`Timers::run_due`]. Callbacks run with no internal borrow held,
//! so a callback may freely schedule or cancel other timers.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use std::time::Duration;
//! use turn_gate::runtime::{ManualClock, Timers};
//!
//! let clock = Rc::new(ManualClock::new());
//! let timers = Timers::new(clock.clone());
//!
//! timers.schedule(Duration::from_millis(500), || println!("grace over"));
//! timers.advance(&clock, Duration::from_millis(500)); // fires
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::clock::{Clock, ManualClock};

/// Identifies a scheduled callback for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

type TimerCallback = Box<dyn FnOnce()>;

struct TimerQueue {
    // Keyed by (deadline, id): ties fire in scheduling order
    entries: BTreeMap<(Instant, TimerId), TimerCallback>,
    // Deadline of every pending id
    deadlines: HashMap<TimerId, Instant>,
    next_id: u64,
}

impl TimerQueue {
    fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, deadline: Instant, id: TimerId, callback: TimerCallback) {
        self.entries.insert((deadline, id), callback);
        self.deadlines.insert(id, deadline);
    }

    fn remove(&mut self, id: TimerId) -> Option<TimerCallback> {
        let deadline = self.deadlines.remove(&id)?;
        self.entries.remove(&(deadline, id))
    }

    /// Pop the earliest callback if its deadline is not after `now`.
    fn pop_due(&mut self, now: Instant) -> Option<TimerCallback> {
        let (deadline, id) = *self.entries.keys().next()?;
        if deadline > now {
            return None;
        }
        self.remove(id)
    }
}

struct TimersInner {
    clock: Rc<dyn Clock>,
    queue: RefCell<TimerQueue>,
}

/// Shared handle to a timer queue. Clones refer to the same queue.
#[derive(Clone)]
pub struct Timers {
    inner: Rc<TimersInner>,
}

impl Timers {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(TimersInner {
                clock,
                queue: RefCell::new(TimerQueue::new()),
            }),
        }
    }

    /// The clock deadlines are measured against.
    pub fn clock(&self) -> Rc<dyn Clock> {
        self.inner.clock.clone()
    }

    /// Current time according to the queue's clock.
    pub fn now(&self) -> Instant {
        self.inner.clock.now()
    }

    /// Run `callback` once, `delay` from now.
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let deadline = self.now() + delay;
        let mut queue = self.inner.queue.borrow_mut();
        let id = queue.next_id();
        queue.insert(deadline, id, Box::new(callback));
        id
    }

    /// Cancel a pending callback. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&self, id: TimerId) -> bool {
        self.inner.queue.borrow_mut().remove(id).is_some()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        let queue = self.inner.queue.borrow();
        queue.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Number of pending callbacks.
    pub fn pending(&self) -> usize {
        self.inner.queue.borrow().entries.len()
    }

    /// Fire every callback whose deadline has passed, in deadline order.
    /// Returns the number fired.
    pub fn run_due(&self) -> usize {
        let mut fired = 0;
        loop {
            let now = self.now();
            let due = self.inner.queue.borrow_mut().pop_due(now);
            match due {
                Some(callback) => {
                    callback();
                    fired += 1;
                }
                None => return fired,
            }
        }
    }

    /// Step `clock` forward by `by`, stopping at every deadline on the way so
    /// each callback observes its own firing time.
    ///
    /// `clock` must be the clock this queue was built with.
    pub fn advance(&self, clock: &ManualClock, by: Duration) -> usize {
        let target = clock.now() + by;
        let mut fired = 0;
        while let Some(deadline) = self.next_deadline() {
            if deadline > target {
                break;
            }
            clock.set(deadline);
            fired += self.run_due();
        }
        clock.set(target);
        fired + self.run_due()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn setup() -> (Rc<ManualClock>, Timers) {
        let clock = Rc::new(ManualClock::new());
        let timers = Timers::new(clock.clone());
        (clock, timers)
    }

    #[test]
    fn test_fires_only_when_due() {
        let (clock, timers) = setup();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();

        timers.schedule(Duration::from_millis(100), move || fired_clone.set(true));

        assert_eq!(timers.run_due(), 0);
        clock.advance(Duration::from_millis(99));
        assert_eq!(timers.run_due(), 0);
        assert!(!fired.get());

        clock.advance(Duration::from_millis(1));
        assert_eq!(timers.run_due(), 1);
        assert!(fired.get());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_deadline_order() {
        let (clock, timers) = setup();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (delay, label) in [(30, "c"), (10, "a"), (20, "b"), (10, "a2")] {
            let order = order.clone();
            timers.schedule(Duration::from_millis(delay), move || {
                order.borrow_mut().push(label)
            });
        }

        timers.advance(&clock, Duration::from_millis(50));
        assert_eq!(*order.borrow(), vec!["a", "a2", "b", "c"]);
    }

    #[test]
    fn test_cancel() {
        let (clock, timers) = setup();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let id = timers.schedule(Duration::from_millis(10), move || {
            count_clone.set(count_clone.get() + 1)
        });

        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));

        timers.advance(&clock, Duration::from_millis(20));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_cancel_among_many() {
        let (clock, timers) = setup();
        let fired = Rc::new(RefCell::new(Vec::new()));

        let ids: Vec<TimerId> = (0..100u64)
            .map(|n| {
                let fired = fired.clone();
                timers.schedule(Duration::from_millis(n % 7), move || fired.borrow_mut().push(n))
            })
            .collect();

        for id in ids.iter().step_by(2) {
            assert!(timers.cancel(*id));
        }
        assert_eq!(timers.pending(), 50);
        assert!(!timers.cancel(ids[0]));

        timers.advance(&clock, Duration::from_millis(10));
        assert_eq!(fired.borrow().len(), 50);
        assert!(fired.borrow().iter().all(|n| n % 2 == 1));

        // Fired ids are gone from the index too
        assert!(!timers.cancel(ids[1]));
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_callback_can_schedule() {
        let (clock, timers) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let timers_clone = timers.clone();
        let clock_clone = clock.clone();
        let seen_clone = seen.clone();
        timers.schedule(Duration::from_millis(100), move || {
            seen_clone.borrow_mut().push(clock_clone.elapsed());
            let seen = seen_clone.clone();
            let clock = clock_clone.clone();
            timers_clone.schedule(Duration::from_millis(50), move || {
                seen.borrow_mut().push(clock.elapsed());
            });
        });

        let fired = timers.advance(&clock, Duration::from_millis(200));
        assert_eq!(fired, 2);
        // Each callback saw its own deadline
        assert_eq!(
            *seen.borrow(),
            vec![Duration::from_millis(100), Duration::from_millis(150)]
        );
        assert_eq!(clock.elapsed(), Duration::from_millis(200));
    }

    #[test]
    fn test_next_deadline() {
        let (clock, timers) = setup();
        assert!(timers.next_deadline().is_none());

        timers.schedule(Duration::from_millis(40), || {});
        timers.schedule(Duration::from_millis(15), || {});

        assert_eq!(
            timers.next_deadline(),
            Some(clock.now() + Duration::from_millis(15))
        );
    }
}
