use crate::{
    DerivativeHistory, Integrable, MultistepErrors, MultistepSettings, advance, check_step,
    select_order,
};

/// A value together with the derivative history that drives it.
///
/// `step` follows the caller contract of `advance`: the derivative for the
/// current step is appended first, then the value is advanced.
#[derive(Clone, Debug)]
pub struct IntegratedQuantity<T: Integrable> {
    value: T,
    history: DerivativeHistory<T>,
    max_order: usize,
}

impl<T: Integrable> IntegratedQuantity<T> {
    pub fn new(value: T, settings: &MultistepSettings) -> Self {
        Self {
            value,
            history: settings.history(),
            max_order: settings.max_order,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn history(&self) -> &DerivativeHistory<T> {
        &self.history
    }

    /// Records `derivative` as the current sample and advances the value by
    /// `h`. A rejected step records nothing and leaves the value unchanged.
    pub fn step(&mut self, derivative: T, h: f64) -> Result<&T, MultistepErrors> {
        check_step(h)?;
        select_order(self.history.len() + 1, self.max_order)?;
        self.history.push(derivative);
        self.value = advance(&self.value, &self.history, h, self.max_order)?;
        Ok(&self.value)
    }

    /// Sets a new value and forgets the history, so the next step starts over
    /// at first order.
    pub fn reset(&mut self, value: T) {
        self.value = value;
        self.history.clear();
    }
}
