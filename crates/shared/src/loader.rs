//! Fan-in join for asynchronously loaded data sources.
//!
//! Every requested source gets a slot. Completions may arrive in any order;
//! the barrier reports `Ready` exactly once when all slots are filled, or
//! `Failed` exactly once on the first failure, after which the remaining
//! deliveries are ignored.

use crate::error::{LoadError, LoadResult};

/// Settlement state of a [`FanIn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanInState {
    Pending,
    Ready,
    Failed,
}

/// Outcome of delivering one result to a [`FanIn`].
#[derive(Debug)]
pub enum FanInEvent<T> {
    /// Still waiting for other sources.
    Waiting { received: usize, expected: usize },
    /// Every source arrived; values are in request order.
    Ready(Vec<T>),
    /// First failure; the pipeline must not run.
    Failed(LoadError),
    /// The barrier already settled, or the delivery was a duplicate.
    Ignored,
}

#[derive(Debug)]
pub struct FanIn<T> {
    sources: Vec<String>,
    slots: Vec<Option<T>>,
    received: usize,
    state: FanInState,
}

impl<T> FanIn<T> {
    /// Barrier over `sources`, in request order.
    pub fn new(sources: Vec<String>) -> LoadResult<Self> {
        if sources.is_empty() {
            return Err(LoadError::NoSources);
        }
        let slots = sources.iter().map(|_| None).collect();
        Ok(Self {
            sources,
            slots,
            received: 0,
            state: FanInState::Pending,
        })
    }

    pub fn state(&self) -> FanInState {
        self.state
    }

    pub fn expected(&self) -> usize {
        self.slots.len()
    }

    pub fn received(&self) -> usize {
        self.received
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Record the value loaded for source `index`.
    pub fn complete(&mut self, index: usize, value: T) -> FanInEvent<T> {
        if self.state != FanInState::Pending {
            return FanInEvent::Ignored;
        }
        let Some(slot) = self.slots.get_mut(index) else {
            tracing::warn!(index, "completion for unknown source ignored");
            return FanInEvent::Ignored;
        };
        if slot.is_some() {
            tracing::warn!(index, "duplicate completion ignored");
            return FanInEvent::Ignored;
        }
        *slot = Some(value);
        self.received += 1;

        if self.received < self.slots.len() {
            return FanInEvent::Waiting {
                received: self.received,
                expected: self.slots.len(),
            };
        }

        self.state = FanInState::Ready;
        let values: Vec<T> = self.slots.iter_mut().filter_map(Option::take).collect();
        FanInEvent::Ready(values)
    }

    /// Record a failure for source `index`.
    pub fn fail(&mut self, index: usize, error: LoadError) -> FanInEvent<T> {
        if self.state != FanInState::Pending {
            return FanInEvent::Ignored;
        }
        tracing::error!(index, %error, "data source failed, aborting load");
        self.state = FanInState::Failed;
        self.slots.clear();
        FanInEvent::Failed(error)
    }

    /// Deliver a result for source `index`.
    pub fn deliver(&mut self, index: usize, result: LoadResult<T>) -> FanInEvent<T> {
        match result {
            Ok(value) => self.complete(index, value),
            Err(error) => self.fail(index, error),
        }
    }
}
