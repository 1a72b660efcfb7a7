//! Linear regressors: ordinary least squares plus L1, L2 and mixed penalties

use crate::error::{Result, TrainerError};
use super::models::Regressor;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fitted parameters shared by every linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub coefficients: Array1<f64>,
    pub intercept: f64,
}

impl LinearParams {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(TrainerError::SchemaMismatch(format!(
                "model was fit on {} features, got {}",
                self.coefficients.len(),
                x.ncols()
            )));
        }
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}

/// Training data with column means removed (when fitting an intercept)
struct Centered {
    x: Array2<f64>,
    y: Array1<f64>,
    x_mean: Option<Array1<f64>>,
    y_mean: f64,
}

impl Centered {
    fn new(x: &Array2<f64>, y: &Array1<f64>, fit_intercept: bool) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(TrainerError::SchemaMismatch(format!(
                "{} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(TrainerError::SchemaMismatch(
                "cannot fit on an empty training set".to_string(),
            ));
        }

        if !fit_intercept {
            return Ok(Self {
                x: x.clone(),
                y: y.clone(),
                x_mean: None,
                y_mean: 0.0,
            });
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| TrainerError::Computation("empty feature matrix".to_string()))?;
        let y_mean = y.mean().unwrap_or(0.0);

        let mut x_centered = x - &x_mean.view().insert_axis(Axis(0));
        // Constant columns centre to exact zeros, free of mean rounding
        for (raw, mut centered) in x.axis_iter(Axis(1)).zip(x_centered.axis_iter_mut(Axis(1))) {
            if raw.iter().all(|v| *v == raw[0]) {
                centered.fill(0.0);
            }
        }

        Ok(Self {
            x: x_centered,
            y: y - y_mean,
            x_mean: Some(x_mean),
            y_mean,
        })
    }

    fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    fn into_params(self, coefficients: Array1<f64>) -> LinearParams {
        let intercept = match &self.x_mean {
            Some(x_mean) => self.y_mean - coefficients.dot(x_mean),
            None => 0.0,
        };
        LinearParams {
            coefficients,
            intercept,
        }
    }
}

/// Lower-triangular Cholesky factor of a symmetric positive-definite matrix
fn cholesky_factor(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] - sum;
                // Pivots lost to cancellation count as singular
                if diag <= f64::EPSILON * n as f64 * a[[i, i]].abs() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Some(l)
}

/// Solve `A x = b` for symmetric positive-definite `A`.
///
/// A near-singular `A` is retried once with a tiny diagonal jitter.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let l = cholesky_factor(a).or_else(|| {
        let jitter = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n.max(1) as f64;
        let mut a_reg = a.clone();
        a_reg.diag_mut().mapv_inplace(|v| v + jitter);
        cholesky_factor(&a_reg)
    })?;

    // L y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * y[j]).sum();
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Gauss-Jordan elimination with partial pivoting on `[A | b]`
fn gauss_jordan_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut aug = Array2::<f64>::zeros((n, n + 1));
    aug.slice_mut(ndarray::s![.., ..n]).assign(a);
    aug.column_mut(n).assign(b);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&r1, &r2| aug[[r1, col]].abs().total_cmp(&aug[[r2, col]].abs()))?;
        if aug[[pivot_row, col]].abs() < 1e-10 {
            return None;
        }
        if pivot_row != col {
            for j in 0..=n {
                aug.swap([col, j], [pivot_row, j]);
            }
        }

        let pivot = aug[[col, col]];
        aug.row_mut(col).mapv_inplace(|v| v / pivot);

        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                if factor != 0.0 {
                    for j in 0..=n {
                        aug[[row, j]] -= factor * aug[[col, j]];
                    }
                }
            }
        }
    }

    Some(aug.column(n).to_owned())
}

/// Solve `(X^T X + alpha I) w = X^T y` on centered data.
///
/// All-zero columns carry no information; they get a zero coefficient and
/// are left out of the system.
fn solve_normal_equations(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<Array1<f64>> {
    let n_features = x.ncols();
    let active: Vec<usize> = (0..n_features)
        .filter(|&j| x.column(j).iter().any(|v| *v != 0.0))
        .collect();

    let mut coefficients = Array1::<f64>::zeros(n_features);
    if active.is_empty() {
        return Ok(coefficients);
    }

    let x_active = x.select(Axis(1), &active);
    let mut xtx = x_active.t().dot(&x_active);
    if alpha > 0.0 {
        xtx.diag_mut().mapv_inplace(|v| v + alpha);
    }
    let xty = x_active.t().dot(y);

    let solved = cholesky_solve(&xtx, &xty)
        .or_else(|| gauss_jordan_solve(&xtx, &xty))
        .ok_or_else(|| {
            TrainerError::Computation("normal equations are singular".to_string())
        })?;
    for (&j, &w) in active.iter().zip(solved.iter()) {
        coefficients[j] = w;
    }
    Ok(coefficients)
}

fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}

/// Cyclic coordinate descent for the elastic-net objective on centered data.
///
/// `l1` and `l2` are already scaled by the number of samples. Returns the
/// coefficients and whether the largest coordinate update fell under `tol`.
fn coordinate_descent(
    data: &Centered,
    l1: f64,
    l2: f64,
    max_iter: usize,
    tol: f64,
) -> (Array1<f64>, bool) {
    let n_features = data.x.ncols();
    let col_norms: Vec<f64> = data
        .x
        .axis_iter(Axis(1))
        .map(|col| col.dot(&col))
        .collect();

    let mut w = Array1::<f64>::zeros(n_features);
    let mut residual = data.y.clone();

    for _ in 0..max_iter {
        let mut max_delta = 0.0_f64;
        let mut max_weight = 0.0_f64;

        for j in 0..n_features {
            let denom = col_norms[j] + l2;
            if denom < 1e-15 {
                continue;
            }
            let column = data.x.column(j);
            let old = w[j];
            let rho = column.dot(&residual) + col_norms[j] * old;
            let new = soft_threshold(rho, l1) / denom;

            if new != old {
                residual.scaled_add(old - new, &column);
                w[j] = new;
            }
            max_delta = max_delta.max((new - old).abs());
            max_weight = max_weight.max(new.abs());
        }

        if max_weight == 0.0 || max_delta <= tol * max_weight {
            return (w, true);
        }
    }

    (w, false)
}

/// Ordinary least squares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    pub fit_intercept: bool,
    pub params: Option<LinearParams>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            fit_intercept: true,
            params: None,
        }
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let data = Centered::new(x, y, self.fit_intercept)?;
        let coefficients = solve_normal_equations(&data.x, &data.y, 0.0)?;
        self.params = Some(data.into_params(coefficients));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.params.as_ref().ok_or(TrainerError::ModelNotFitted)?.predict(x)
    }

    fn params(&self) -> Option<&LinearParams> {
        self.params.as_ref()
    }
}

/// Ridge regression (L2 penalty), solved in closed form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeRegression {
    /// L2 regularization strength
    pub alpha: f64,
    pub fit_intercept: bool,
    pub params: Option<LinearParams>,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            fit_intercept: true,
            params: None,
        }
    }
}

impl Regressor for RidgeRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if !(self.alpha >= 0.0) {
            return Err(TrainerError::Config(format!(
                "ridge alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        let data = Centered::new(x, y, self.fit_intercept)?;
        let coefficients = solve_normal_equations(&data.x, &data.y, self.alpha)?;
        self.params = Some(data.into_params(coefficients));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.params.as_ref().ok_or(TrainerError::ModelNotFitted)?.predict(x)
    }

    fn params(&self) -> Option<&LinearParams> {
        self.params.as_ref()
    }
}

/// Lasso regression (L1 penalty) via coordinate descent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LassoRegression {
    /// L1 regularization strength
    pub alpha: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub fit_intercept: bool,
    pub params: Option<LinearParams>,
}

impl Default for LassoRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl LassoRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            max_iter: 1000,
            tol: 1e-4,
            fit_intercept: true,
            params: None,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}

impl Regressor for LassoRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if !(self.alpha >= 0.0) {
            return Err(TrainerError::Config(format!(
                "lasso alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        let data = Centered::new(x, y, self.fit_intercept)?;
        let l1 = self.alpha * data.n_samples() as f64;
        let (coefficients, converged) =
            coordinate_descent(&data, l1, 0.0, self.max_iter, self.tol);
        if !converged {
            warn!(max_iter = self.max_iter, "Lasso coordinate descent did not converge");
        }
        self.params = Some(data.into_params(coefficients));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.params.as_ref().ok_or(TrainerError::ModelNotFitted)?.predict(x)
    }

    fn params(&self) -> Option<&LinearParams> {
        self.params.as_ref()
    }
}

/// Elastic net (mixed L1/L2 penalty) via coordinate descent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticNetRegression {
    /// Overall regularization strength
    pub alpha: f64,
    /// 0.0 is a pure L2 penalty, 1.0 a pure L1 penalty
    pub l1_ratio: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub fit_intercept: bool,
    pub params: Option<LinearParams>,
}

impl Default for ElasticNetRegression {
    fn default() -> Self {
        Self::new(1.0, 0.5)
    }
}

impl ElasticNetRegression {
    pub fn new(alpha: f64, l1_ratio: f64) -> Self {
        Self {
            alpha,
            l1_ratio: l1_ratio.clamp(0.0, 1.0),
            max_iter: 1000,
            tol: 1e-4,
            fit_intercept: true,
            params: None,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}

impl Regressor for ElasticNetRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if !(self.alpha >= 0.0) {
            return Err(TrainerError::Config(format!(
                "elastic net alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        let data = Centered::new(x, y, self.fit_intercept)?;
        let n = data.n_samples() as f64;
        let l1 = self.alpha * self.l1_ratio * n;
        let l2 = self.alpha * (1.0 - self.l1_ratio) * n;
        let (coefficients, converged) =
            coordinate_descent(&data, l1, l2, self.max_iter, self.tol);
        if !converged {
            warn!(max_iter = self.max_iter, "ElasticNet coordinate descent did not converge");
        }
        self.params = Some(data.into_params(coefficients));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.params.as_ref().ok_or(TrainerError::ModelNotFitted)?.predict(x)
    }

    fn params(&self) -> Option<&LinearParams> {
        self.params.as_ref()
    }
}
