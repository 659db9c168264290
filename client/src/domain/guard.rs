use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Idle period after which the session is logged out
pub const INACTIVITY_LIMIT: Duration = Duration::from_secs(10 * 60);

// deadline used when `idle_threshold` overflows the clock
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// User input that counts as activity.
/// Pointer movement is the continuous signal, the rest are discrete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityEvent {
    PointerMove,
    KeyPress,
    PointerPress,
    TouchStart,
}

impl ActivityEvent {
    pub const ALL: [ActivityEvent; 4] = [
        ActivityEvent::PointerMove,
        ActivityEvent::KeyPress,
        ActivityEvent::PointerPress,
        ActivityEvent::TouchStart,
    ];

    /// DOM event type the browser dispatches for this activity
    pub fn dom_name(self) -> &'static str {
        match self {
            ActivityEvent::PointerMove => "mousemove",
            ActivityEvent::KeyPress => "keydown",
            ActivityEvent::PointerPress => "mousedown",
            ActivityEvent::TouchStart => "touchstart",
        }
    }

    pub fn from_dom_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.dom_name() == name)
    }

    pub fn is_continuous(self) -> bool {
        matches!(self, ActivityEvent::PointerMove)
    }
}

/// Side effect run when the session went idle.
/// Fire-and-forget: implementations handle their own failures.
pub trait IdleAction: Send + Sync + 'static {
    fn on_idle(&self) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Stopped,
    Armed,
}

/// Logs the session out after `idle_threshold` without activity.
///
/// Each arming owns one timer task. Activity is published on a watch channel,
/// so any burst of events collapses into a single pending deadline.
/// Must be started from within a tokio runtime.
pub struct InactivityGuard<A: IdleAction> {
    idle_threshold: Duration,
    action: Arc<A>,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    generation: u64,
    arming: Option<Arming>,
}

struct Arming {
    generation: u64,
    activity: watch::Sender<Instant>,
    timer: JoinHandle<()>,
}

impl<A: IdleAction> InactivityGuard<A> {
    pub fn new(action: A) -> Self {
        Self::with_threshold(action, INACTIVITY_LIMIT)
    }

    pub fn with_threshold(action: A, idle_threshold: Duration) -> Self {
        Self {
            idle_threshold,
            action: Arc::new(action),
            inner: Arc::default(),
        }
    }

    pub fn idle_threshold(&self) -> Duration {
        self.idle_threshold
    }

    pub fn state(&self) -> GuardState {
        match lock(&self.inner).arming {
            Some(_) => GuardState::Armed,
            None => GuardState::Stopped,
        }
    }

    /// Arm the deadline. Starting an armed guard only resets its deadline.
    pub fn start(&self) {
        let mut inner = lock(&self.inner);
        if let Some(arming) = &inner.arming {
            arming.activity.send_replace(Instant::now());
            return;
        }

        inner.generation += 1;
        let generation = inner.generation;
        let (activity, receiver) = watch::channel(Instant::now());
        let timer = tokio::spawn(watch_idle(
            generation,
            self.idle_threshold,
            receiver,
            Arc::clone(&self.inner),
            Arc::clone(&self.action),
        ));

        inner.arming = Some(Arming {
            generation,
            activity,
            timer,
        });
        tracing::debug!(generation, threshold = ?self.idle_threshold, "inactivity guard armed");
    }

    /// Push the deadline to `idle_threshold` from now. Ignored while stopped.
    pub fn on_activity(&self, event: ActivityEvent) {
        match &lock(&self.inner).arming {
            Some(arming) => {
                arming.activity.send_replace(Instant::now());
            }
            None => tracing::trace!(?event, "activity ignored, guard stopped"),
        }
    }

    /// Entry point for raw DOM events, names outside the activity set are ignored
    pub fn on_dom_event(&self, name: &str) {
        if let Some(event) = ActivityEvent::from_dom_name(name) {
            self.on_activity(event);
        }
    }

    /// Cancel the pending deadline without running the idle action
    pub fn stop(&self) {
        if let Some(arming) = lock(&self.inner).arming.take() {
            arming.timer.abort();
            tracing::debug!(generation = arming.generation, "inactivity guard stopped");
        }
    }
}

impl<A: IdleAction> Drop for InactivityGuard<A> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn deadline_after(last_activity: Instant, idle_threshold: Duration) -> Instant {
    last_activity
        .checked_add(idle_threshold)
        .unwrap_or_else(|| last_activity + FAR_FUTURE)
}

async fn watch_idle<A: IdleAction>(
    generation: u64,
    idle_threshold: Duration,
    mut activity: watch::Receiver<Instant>,
    inner: Arc<Mutex<Inner>>,
    action: Arc<A>,
) {
    let mut deadline = deadline_after(*activity.borrow_and_update(), idle_threshold);

    loop {
        tokio::select! {
            biased;
            changed = activity.changed() => match changed {
                Ok(()) => deadline = deadline_after(*activity.borrow_and_update(), idle_threshold),
                // sender dropped: the guard was stopped
                Err(_) => return,
            },
            _ = time::sleep_until(deadline) => break,
        }
    }

    {
        let mut inner = lock(&inner);
        if inner.arming.as_ref().map(|arming| arming.generation) != Some(generation) {
            return;
        }
        inner.arming = None;
    }

    tracing::info!(generation, threshold = ?idle_threshold, "session idle, running idle action");
    action.on_idle().await;
}
