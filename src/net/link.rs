//! Signal links realized as indices into an arena of single-value slots.
//!
//! A link is written by exactly one upstream neuron (or the network's
//! input setter) and read by any number of downstream neurons. Keeping
//! the slots in one arena owned by the network avoids shared-ownership
//! cycles between neurons and layers.

use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::fuzzy::FuzzyNumber;

/// Handle to one signal slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkId(pub(crate) usize);

/// Arena of signal slots. A slot is `None` until the first propagation
/// writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalArena<F> {
    slots: Vec<Option<F>>,
}

impl<F: FuzzyNumber> SignalArena<F> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn alloc(&mut self) -> LinkId {
        self.slots.push(None);
        LinkId(self.slots.len() - 1)
    }

    pub fn set(&mut self, id: LinkId, value: F) {
        self.slots[id.0] = Some(value);
    }

    pub fn get(&self, id: LinkId) -> Option<&F> {
        self.slots[id.0].as_ref()
    }

    /// The slot's signal, or `MissingSignal` if nothing has been
    /// propagated into it yet.
    pub fn signal(&self, id: LinkId) -> Result<&F> {
        self.slots[id.0].as_ref().ok_or(NetError::MissingSignal)
    }
}

impl<F: FuzzyNumber> Default for SignalArena<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::fuzzy::RealNumber;

    use super::*;

    #[test]
    fn slots_start_empty_and_overwrite() {
        let mut arena: SignalArena<RealNumber> = SignalArena::new();
        let id = arena.alloc();
        assert!(arena.get(id).is_none());
        assert!(matches!(arena.signal(id), Err(NetError::MissingSignal)));

        arena.set(id, RealNumber::new(1.0));
        assert_eq!(arena.signal(id).unwrap().value(), 1.0);
        arena.set(id, RealNumber::new(2.0));
        assert_eq!(arena.signal(id).unwrap().value(), 2.0);
    }
}
