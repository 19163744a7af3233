//! Feature standardization fitted at train time and frozen into the bundle

use serde::{Deserialize, Serialize};

/// Threshold below which a column is treated as constant
const VARIANCE_FLOOR: f64 = 1e-12;

/// Per-column mean/std standardization
///
/// A zero-variance column is centered but not scaled, so a legitimately
/// constant column does not trip the guarded-division rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit column statistics over a dense row-major matrix
    pub fn fit(matrix: &[Vec<f64>]) -> Self {
        let rows = matrix.len();
        let cols = matrix.first().map_or(0, Vec::len);
        let mut means = vec![0.0; cols];
        let mut stds = vec![1.0; cols];
        if rows == 0 {
            return Self { means, stds };
        }
        for col in 0..cols {
            let mean = matrix.iter().map(|r| r[col]).sum::<f64>() / rows as f64;
            let var = matrix
                .iter()
                .map(|r| (r[col] - mean).powi(2))
                .sum::<f64>()
                / rows as f64;
            means[col] = mean;
            stds[col] = if var < VARIANCE_FLOOR { 1.0 } else { var.sqrt() };
        }
        Self { means, stds }
    }

    /// Standardize one row in place
    pub fn transform_row(&self, row: &mut [f64]) {
        for (i, value) in row.iter_mut().enumerate() {
            *value = (*value - self.means[i]) / self.stds[i];
        }
    }

    /// Standardize a whole matrix in place
    pub fn transform(&self, matrix: &mut [Vec<f64>]) {
        for row in matrix {
            self.transform_row(row);
        }
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }
}
