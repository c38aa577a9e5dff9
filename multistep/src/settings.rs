use serde::{Deserialize, Serialize};

use crate::{DerivativeHistory, Integrable, MAX_ORDER};

/// Integrator configuration shared by every quantity of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultistepSettings {
    /// Highest Adams-Bashforth order to use, 1 through 4.
    pub max_order: usize,
    /// Number of derivative samples each history keeps. `None` keeps all.
    pub history_limit: Option<usize>,
}

impl Default for MultistepSettings {
    fn default() -> Self {
        Self {
            max_order: MAX_ORDER,
            history_limit: None,
        }
    }
}

impl MultistepSettings {
    pub fn with_max_order(mut self, max_order: usize) -> Self {
        self.max_order = max_order;
        self
    }

    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = Some(history_limit);
        self
    }

    /// An empty history honoring `history_limit`.
    pub fn history<T: Integrable>(&self) -> DerivativeHistory<T> {
        match self.history_limit {
            Some(limit) => DerivativeHistory::with_limit(limit),
            None => DerivativeHistory::new(),
        }
    }
}
