use super::error::SessionError;

/// Result of one stage fetch. A fetch may yield partial data alongside an error.
#[derive(Debug, Clone)]
pub struct StageOutcome<O> {
    pub value: O,
    pub error: Option<SessionError>,
}

impl<O> StageOutcome<O> {
    pub fn ok(value: O) -> Self {
        Self { value, error: None }
    }

    pub fn failed(value: O, error: SessionError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }
}

/// One pipeline stage: its current input, the generation of the fetch that
/// input triggered, and the last accepted output.
#[derive(Debug)]
pub(crate) struct StageSlot<I, O> {
    input: Option<I>,
    generation: u64,
    pub(crate) value: O,
    pub(crate) loading: bool,
    pub(crate) error: Option<SessionError>,
}

impl<I, O> StageSlot<I, O>
where
    I: Clone + PartialEq,
    O: Default,
{
    pub(crate) fn new() -> Self {
        Self {
            input: None,
            generation: 0,
            value: O::default(),
            loading: false,
            error: None,
        }
    }

    /// Points the stage at `input`. Returns the generation and input to fetch
    /// with when the input changed by value and is present.
    pub(crate) fn retarget(&mut self, input: Option<I>) -> Option<(u64, I)> {
        if self.input == input {
            return None;
        }

        self.generation += 1;
        self.input = input.clone();
        self.value = O::default();
        self.error = None;
        self.loading = input.is_some();
        input.map(|input| (self.generation, input))
    }

    /// Fetches the current input again under a new generation. The last
    /// value stays visible until the new fetch lands.
    pub(crate) fn reload(&mut self) -> Option<(u64, I)> {
        let input = self.input.clone()?;
        self.generation += 1;
        self.error = None;
        self.loading = true;
        Some((self.generation, input))
    }

    /// Applies a finished fetch. Completions from superseded generations are
    /// rejected and leave the stage untouched.
    pub(crate) fn complete(&mut self, generation: u64, outcome: StageOutcome<O>) -> bool {
        if generation != self.generation || !self.loading {
            return false;
        }
        self.loading = false;
        self.value = outcome.value;
        self.error = outcome.error;
        true
    }
}
