//! Shared helpers for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Level, Subscriber};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Clone)]
struct LevelCounter {
    level: Level,
    count: Arc<AtomicUsize>,
}

impl<S: Subscriber> Layer<S> for LevelCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == self.level {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` with a thread-local subscriber counting events at `level`.
pub fn count_events_at<R>(level: Level, f: impl FnOnce() -> R) -> (R, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let layer = LevelCounter {
        level,
        count: Arc::clone(&count),
    };
    let subscriber = Registry::default().with(layer);
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, count.load(Ordering::SeqCst))
}

/// Run `f` counting WARN-level events.
pub fn count_warnings<R>(f: impl FnOnce() -> R) -> (R, usize) {
    count_events_at(Level::WARN, f)
}
