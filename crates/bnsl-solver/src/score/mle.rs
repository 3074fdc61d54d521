// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use bnsl_core::prelude::{stats, Dataset};
use nalgebra::{DMatrix, DVector};

/// Residual variances below this floor are clamped so the log-likelihood
/// stays finite on (near-)deterministic columns.
const VARIANCE_FLOOR: f64 = 1e-12;

/// Maximum-likelihood parameters of a linear-Gaussian conditional
/// distribution: `target = beta[0] + beta[1..] . evidence + N(0, variance)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGaussian {
    pub beta: DVector<f64>,
    pub variance: f64,
}

/// Fit `target` on `evidence` columns by least squares with an intercept.
///
/// The normal equations are solved by Cholesky, falling back to LU for
/// collinear evidence; a singular system degrades to the marginal fit.
pub fn fit_linear_gaussian(data: &Dataset, target: usize, evidence: &[usize]) -> LinearGaussian {
    let rows = data.num_rows();
    let column = data.column(target);

    if evidence.is_empty() {
        return LinearGaussian {
            beta: DVector::from_element(1, stats::mean(column)),
            variance: stats::variance(column).max(VARIANCE_FLOOR),
        };
    }

    let mut design = DMatrix::from_element(rows, evidence.len() + 1, 1.0);
    for (j, &col) in evidence.iter().enumerate() {
        design
            .column_mut(j + 1)
            .copy_from(&DVector::from_column_slice(data.column(col)));
    }
    let y = DVector::from_column_slice(column);

    let xtx = design.transpose() * &design;
    let xty = design.transpose() * &y;
    let beta = match xtx.clone().cholesky() {
        Some(chol) => chol.solve(&xty),
        None => match xtx.lu().solve(&xty) {
            Some(solution) => solution,
            None => {
                let mut marginal = DVector::zeros(evidence.len() + 1);
                marginal[0] = stats::mean(column);
                marginal
            }
        },
    };

    let residuals = &y - &design * &beta;
    let variance = (residuals.norm_squared() / rows as f64).max(VARIANCE_FLOOR);

    LinearGaussian { beta, variance }
}
