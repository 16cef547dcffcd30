//! Checked iteration over an [`AnimalIterator`].

use std::iter::FusedIterator;

use log::trace;

use crate::error::{Error, Result};
use crate::family::{Animal, AnimalIterator};

/// Lifecycle of an [`Animals`] iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorState {
    /// More animals may follow.
    Ready,
    /// The library reported the end of the sequence.
    Exhausted,
    /// The library reported an error.
    Failed,
}

/// Lazy, single-pass sequence of animals.
///
/// Each step makes exactly one `get next animal` call and materializes the
/// result through the polymorphic factory. Once the library reports the end
/// or an error, no further native calls are made.
///
/// [`Animals::produce_next`] exposes the state machine directly: advancing
/// past a terminal state is an [`Error::ProtocolViolation`]. The
/// [`Iterator`] implementation is fused instead and keeps returning `None`.
pub struct Animals {
    iterator: AnimalIterator,
    state: IteratorState,
}

impl Animals {
    pub(crate) fn new(iterator: AnimalIterator) -> Self {
        Self {
            iterator,
            state: IteratorState::Ready,
        }
    }

    /// Current state.
    pub fn state(&self) -> IteratorState {
        self.state
    }

    /// Produce the next animal.
    ///
    /// Returns `Ok(None)` exactly once, when the end is reached. Any call
    /// after the end or after an error fails with
    /// [`Error::ProtocolViolation`].
    pub fn produce_next(&mut self) -> Result<Option<Animal>> {
        if self.state != IteratorState::Ready {
            return Err(Error::ProtocolViolation(self.state));
        }

        match self.iterator.get_next_animal() {
            Ok(Some(animal)) => Ok(Some(animal)),
            Ok(None) => {
                trace!("animal iterator exhausted");
                self.state = IteratorState::Exhausted;
                Ok(None)
            }
            Err(err) => {
                trace!("animal iterator failed: {}", err);
                self.state = IteratorState::Failed;
                Err(err)
            }
        }
    }
}

impl Iterator for Animals {
    type Item = Result<Animal>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != IteratorState::Ready {
            return None;
        }
        self.produce_next().transpose()
    }
}

impl FusedIterator for Animals {}
