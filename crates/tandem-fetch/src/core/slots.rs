use crate::data::FetchResult;

/// Index-addressed storage for fan-out results.
///
/// Fetches finish in any order; each one is written to the slot of its input
/// index so the assembled output lines up with the input regardless of
/// completion order. A slot that was never filled comes out as
/// [`FetchResult::Empty`], so the output length always equals the input length.
#[derive(Debug)]
pub struct ResultSlots {
    slots: Vec<Option<FetchResult>>,
}

impl ResultSlots {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Store `result` at `index`. Out-of-range indices and refills are ignored
    /// and reported as `false`.
    pub fn fill(&mut self, index: usize, result: FetchResult) -> bool {
        match self.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(result);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize { self.slots.len() }

    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    pub fn filled(&self) -> usize { self.slots.iter().filter(|slot| slot.is_some()).count() }

    pub fn into_results(self) -> Vec<FetchResult> {
        self.slots
            .into_iter()
            .map(|slot| slot.unwrap_or(FetchResult::Empty))
            .collect()
    }
}
