/// Coefficients of an explicit Adams-Bashforth formula of order `ORDER`.
///
/// `b[0]` weights the newest derivative sample, `b[ORDER - 1]` the oldest
/// one that takes part in the step:
///
/// `y[n+1] = y[n] + h * (b[0] f[n] + b[1] f[n-1] + ... )`
pub struct AdamsBashforthTableau<const ORDER: usize> {
    pub b: [f64; ORDER],
}

impl<const ORDER: usize> AdamsBashforthTableau<ORDER> {
    pub const fn order(&self) -> usize {
        ORDER
    }
}

impl AdamsBashforthTableau<1> {
    // usage is AdamsBashforthTableau::<1>::AB1, aka forward Euler
    pub const AB1: Self = Self { b: [1.] };
}

impl AdamsBashforthTableau<2> {
    pub const AB2: Self = Self { b: [3. / 2., -1. / 2.] };
}

impl AdamsBashforthTableau<3> {
    pub const AB3: Self = Self {
        b: [23. / 12., -16. / 12., 5. / 12.],
    };
}

impl AdamsBashforthTableau<4> {
    pub const AB4: Self = Self {
        b: [55. / 24., -59. / 24., 37. / 24., -9. / 24.],
    };
}
