use std::{
    fmt::Debug,
    ops::{Add, Mul},
};

use thiserror::Error;
use tracing::{trace, warn};

/// Submodules for the multistep integrator.
pub mod history;
pub mod settings;
pub mod state;
pub mod tableau;

pub use history::DerivativeHistory;
pub use settings::MultistepSettings;
pub use state::IntegratedQuantity;
use tableau::AdamsBashforthTableau;

/// Highest Adams-Bashforth order with a formula.
pub const MAX_ORDER: usize = 4;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum MultistepErrors {
    #[error(
        "no Adams-Bashforth formula for {available} derivative samples with max order {max_order}"
    )]
    InsufficientHistory { available: usize, max_order: usize },
    #[error("step size must be positive and finite, got {0}")]
    InvalidStepSize(f64),
}

/// Trait representing a quantity that can be advanced by the integrator.
///
/// Anything closed under addition and scaling by `f64` works: scalars are
/// advanced directly, fixed size vectors such as `nalgebra::Vector3<f64>`
/// element-wise with the same coefficients.
pub trait Integrable: Clone + Debug + Add<Output = Self> + Mul<f64, Output = Self> {}

impl<T> Integrable for T where T: Clone + Debug + Add<Output = T> + Mul<f64, Output = T> {}

/// Order of the formula that `advance` will use for `available` samples and
/// the caller's `max_order`. `max_order` always wins over available history
/// and nothing above `MAX_ORDER` is ever selected.
///
/// # Errors
///
/// `MultistepErrors::InsufficientHistory` when there is no sample or
/// `max_order` is zero.
pub fn select_order(available: usize, max_order: usize) -> Result<usize, MultistepErrors> {
    if max_order > MAX_ORDER {
        warn!(
            max_order,
            clamped = MAX_ORDER,
            "max order above the highest supported Adams-Bashforth order"
        );
    }
    let order = available.min(max_order).min(MAX_ORDER);
    if order == 0 {
        return Err(MultistepErrors::InsufficientHistory { available, max_order });
    }
    Ok(order)
}

/// Checks that `h` can be used as a step size.
///
/// # Errors
///
/// `MultistepErrors::InvalidStepSize` if `h` is not a positive finite number.
pub fn check_step(h: f64) -> Result<(), MultistepErrors> {
    if !(h.is_finite() && h > 0.0) {
        return Err(MultistepErrors::InvalidStepSize(h));
    }
    Ok(())
}

/// Advances `value` by one step of size `h` with the Adams-Bashforth formula
/// of the highest order allowed by both the history and `max_order`.
///
/// `derivatives` is ordered oldest to newest and its last element must be
/// the derivative for the step being taken. Only the most recent `order`
/// samples, counted from the end and including the current one, are used;
/// older entries are ignored. Nothing is appended to the history.
///
/// # Errors
///
/// * `MultistepErrors::InsufficientHistory` for an empty history or a
///   `max_order` of zero.
/// * `MultistepErrors::InvalidStepSize` if `h` is not a positive finite number.
pub fn advance<T: Integrable>(
    value: &T,
    derivatives: &[T],
    h: f64,
    max_order: usize,
) -> Result<T, MultistepErrors> {
    check_step(h)?;
    let order = select_order(derivatives.len(), max_order)?;
    let window = &derivatives[derivatives.len() - order..];
    trace!(order, available = derivatives.len(), h, "adams-bashforth step");

    let increment = match order {
        1 => weighted_sum(&AdamsBashforthTableau::<1>::AB1, window),
        2 => weighted_sum(&AdamsBashforthTableau::<2>::AB2, window),
        3 => weighted_sum(&AdamsBashforthTableau::<3>::AB3, window),
        4 => weighted_sum(&AdamsBashforthTableau::<4>::AB4, window),
        _ => None,
    }
    .ok_or(MultistepErrors::InsufficientHistory {
        available: derivatives.len(),
        max_order,
    })?;
    Ok(value.clone() + increment * h)
}

// window holds ORDER samples, oldest first; None only for an empty window
fn weighted_sum<T: Integrable, const ORDER: usize>(
    tableau: &AdamsBashforthTableau<ORDER>,
    window: &[T],
) -> Option<T> {
    window
        .iter()
        .rev()
        .zip(tableau.b.iter())
        .map(|(d, b)| d.clone() * *b)
        .reduce(|acc, term| acc + term)
}
