/// A view of a series `lag` rows in the past.
pub trait LagAnalytic {
    /// Rows between the current sample and the one read (`k` in `t-k`).
    fn lag(&self) -> usize;

    /// Points a prefix must hold before the lagged value exists.
    fn required_points(&self) -> usize {
        self.lag() + 1
    }

    /// Reads the value `lag` rows before the end of `prefix`.
    fn compute_lagged(&self, prefix: &[f64]) -> Option<f64> {
        if prefix.len() < self.required_points() {
            return None;
        }
        prefix.get(prefix.len() - self.required_points()).copied()
    }
}

/// Fixed backward shift by `lag` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLag {
    lag: usize,
}

impl FixedLag {
    pub fn new(lag: usize) -> Self {
        FixedLag { lag }
    }

    /// Shifts `values` back by `lag` rows without wrapping: row `i` holds the
    /// value at `i - lag`, and the first `lag` rows are `None`.
    pub fn shift(&self, values: &[f64]) -> Vec<Option<f64>> {
        (0..values.len())
            .map(|row| self.compute_lagged(&values[..=row]))
            .collect()
    }
}

impl LagAnalytic for FixedLag {
    fn lag(&self) -> usize {
        self.lag
    }
}
