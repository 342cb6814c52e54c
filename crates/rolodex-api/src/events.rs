//! Live-update fan-out: [`ChangeFeed`] and the `GET /contacts/events` stream.

use std::{convert::Infallible, time::Duration};

use axum::{
  extract::State,
  response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use rolodex_core::{
  notify::{ChangeNotifier, ChangeSignal, NotifyError},
  store::ContactStore,
};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::AppState;

/// Default number of signals buffered per subscriber before it starts lagging.
pub const DEFAULT_CAPACITY: usize = 64;

/// A broadcast channel of [`ChangeSignal`]s.
///
/// Cloning is cheap; all clones publish to the same subscribers.
#[derive(Clone)]
pub struct ChangeFeed {
  tx: broadcast::Sender<ChangeSignal>,
}

impl ChangeFeed {
  pub fn new(capacity: usize) -> Self {
    let (tx, _rx) = broadcast::channel(capacity);
    Self { tx }
  }

  /// Register a new observer. Signals sent before this call are not seen.
  pub fn subscribe(&self) -> broadcast::Receiver<ChangeSignal> { self.tx.subscribe() }

  pub fn subscriber_count(&self) -> usize { self.tx.receiver_count() }

  /// Subscribe as a stream; lagged signals are skipped.
  pub fn stream(&self) -> impl Stream<Item = ChangeSignal> + use<> {
    BroadcastStream::new(self.subscribe()).filter_map(|res| async move { res.ok() })
  }
}

impl Default for ChangeFeed {
  fn default() -> Self { Self::new(DEFAULT_CAPACITY) }
}

impl ChangeNotifier for ChangeFeed {
  fn announce_change(&self) -> Result<(), NotifyError> {
    // No subscribers is not a failure.
    let receivers = self.tx.send(ChangeSignal::Update).unwrap_or(0);
    tracing::debug!(receivers, "announced contact change");
    Ok(())
  }
}

/// `GET /contacts/events`: one `Update` event per change, with keep-alives.
pub async fn stream<S>(
  State(state): State<AppState<S>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  let events = state
    .feed
    .stream()
    .map(|signal| Ok(Event::default().event(signal.as_str()).data("")));

  Sse::new(events).keep_alive(
    KeepAlive::new()
      .interval(Duration::from_secs(15))
      .text("keepalive"),
  )
}
