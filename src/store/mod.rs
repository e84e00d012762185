//! Shared state store of one chart instance.
//!
//! The store keeps the latest [`ChartState`] and replays it to every new
//! subscriber before forwarding later states in dispatch order. Updates are
//! shallow merges of [`ChartStatePatch`] values, applied synchronously.

mod state;

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::{debug, trace};

use crate::error::{ChartError, ChartResult};

pub use state::{ChartState, ChartStatePatch};

/// Callback observer notified with every published state.
pub trait StateObserver {
    fn id(&self) -> &str;
    fn on_state(&mut self, state: &ChartState);
}

/// Live view of the store: the state at subscription time, then every later one.
#[derive(Debug)]
pub struct StateSubscription {
    receiver: Receiver<ChartState>,
}

impl StateSubscription {
    /// Next pending state, in publish order.
    #[must_use]
    pub fn try_next(&self) -> Option<ChartState> {
        self.receiver.try_recv().ok()
    }

    /// Every pending state, in publish order.
    #[must_use]
    pub fn drain(&self) -> Vec<ChartState> {
        self.receiver.try_iter().collect()
    }

    /// Skips to the most recent pending state.
    #[must_use]
    pub fn latest(&self) -> Option<ChartState> {
        self.receiver.try_iter().last()
    }
}

/// Producer handle of a deferred patch source registered with [`ChartStore::patch_source`].
#[derive(Debug, Clone)]
pub struct PatchSender {
    sender: Sender<ChartStatePatch>,
}

impl PatchSender {
    /// Queues a patch; it is merged on the next [`ChartStore::poll_sources`].
    ///
    /// Returns `false` when the store was dropped.
    pub fn send(&self, patch: ChartStatePatch) -> bool {
        self.sender.send(patch).is_ok()
    }
}

/// Single source of truth for range and series visibility of one chart.
pub struct ChartStore {
    state: ChartState,
    subscribers: Vec<Sender<ChartState>>,
    observers: Vec<Box<dyn StateObserver>>,
    sources: Vec<Receiver<ChartStatePatch>>,
    revision: u64,
}

impl ChartStore {
    #[must_use]
    pub fn new(initial: ChartState) -> Self {
        Self {
            state: initial,
            subscribers: Vec::new(),
            observers: Vec::new(),
            sources: Vec::new(),
            revision: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ChartState {
        &self.state
    }

    /// Number of states published since construction.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merges `patch` into the current state and republishes it.
    pub fn dispatch(&mut self, patch: impl Into<ChartStatePatch>) {
        let patch = patch.into();
        self.state = self.state.merged(&patch);
        self.revision += 1;
        trace!(
            revision = self.revision,
            range_changed = patch.range.is_some(),
            active_changed = patch.active_series.is_some(),
            "chart store dispatch"
        );
        self.publish();
    }

    /// Opens a subscription that starts from the current state.
    #[must_use]
    pub fn subscribe(&mut self) -> StateSubscription {
        let (sender, receiver) = mpsc::channel();
        // The receiver is alive, so the replay send cannot fail.
        let _ = sender.send(self.state.clone());
        self.subscribers.push(sender);
        StateSubscription { receiver }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Registers a callback observer; it immediately receives the current state.
    pub fn register_observer(&mut self, mut observer: Box<dyn StateObserver>) -> ChartResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(ChartError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(ChartError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }

        observer.on_state(&self.state);
        self.observers.push(observer);
        debug!(observer = %observer_id, "registered chart state observer");
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            debug!(observer = %observer_id, "unregistered chart state observer");
            return true;
        }
        false
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers.iter().any(|entry| entry.id() == observer_id)
    }

    /// Registers a deferred patch source and returns its producer handle.
    #[must_use]
    pub fn patch_source(&mut self) -> PatchSender {
        let (sender, receiver) = mpsc::channel();
        self.sources.push(receiver);
        PatchSender { sender }
    }

    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Merges every queued patch of every source, in registration order.
    ///
    /// Each patch is published separately. Sources whose producers were all
    /// dropped are removed once drained. Returns the number of merged patches.
    pub fn poll_sources(&mut self) -> usize {
        let mut merged = 0;
        let mut index = 0;
        while index < self.sources.len() {
            loop {
                match self.sources[index].try_recv() {
                    Ok(patch) => {
                        self.dispatch(patch);
                        merged += 1;
                    }
                    Err(TryRecvError::Empty) => {
                        index += 1;
                        break;
                    }
                    Err(TryRecvError::Disconnected) => {
                        self.sources.remove(index);
                        debug!("dropped disconnected chart patch source");
                        break;
                    }
                }
            }
        }
        merged
    }

    fn publish(&mut self) {
        let state = &self.state;
        self.subscribers
            .retain(|subscriber| subscriber.send(state.clone()).is_ok());
        for observer in &mut self.observers {
            observer.on_state(state);
        }
    }
}

impl Default for ChartStore {
    fn default() -> Self {
        Self::new(ChartState::default())
    }
}

impl std::fmt::Debug for ChartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .field("observers", &self.observers.len())
            .field("sources", &self.sources.len())
            .field("revision", &self.revision)
            .finish()
    }
}
