/// Ordinary least squares linear regression over the annual counts.
///
/// Fits y = intercept + slope * x for explicit (x, y) points — the x
/// axis here is the calendar year, not a 0-based index, so the reported
/// intercept and slope read directly as "incidents per year of drift".
/// Reports R² and the residual standard error alongside the
/// coefficients; both appear in the report's model summary table.

use crate::analysis::groupings::YearCount;

/// Fitted linear trend.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination in [0, 1] (1.0 for a constant series).
    pub r_squared: f64,
    /// sqrt(SS_res / (n - 2)); 0.0 when n == 2 (a perfect fit by
    /// construction).
    pub residual_std_error: f64,
    pub n: usize,
}

impl LinearTrend {
    /// Fits the trend to explicit (x, y) points.
    ///
    /// # Errors
    /// Returns `Err` for fewer than two points, non-finite inputs, or
    /// zero variance in x (vertical line, slope undefined).
    pub fn fit(points: &[(f64, f64)]) -> Result<LinearTrend, String> {
        if points.len() < 2 {
            return Err(format!(
                "Need at least 2 points for a linear fit, got {}",
                points.len()
            ));
        }
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err("Regression input contains NaN or infinite values".to_string());
        }

        let n = points.len() as f64;
        let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
        let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
        let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();
        let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();

        let denominator = n * sum_xx - sum_x * sum_x;
        if denominator.abs() < 1e-10 {
            return Err("Zero variance in x; slope is undefined".to_string());
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        let mean_y = sum_y / n;
        let ss_tot: f64 = points.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = points
            .iter()
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();

        let r_squared = if ss_tot > 1e-10 { 1.0 - ss_res / ss_tot } else { 1.0 };

        let residual_std_error = if points.len() > 2 {
            (ss_res / (n - 2.0)).sqrt()
        } else {
            0.0
        };

        Ok(LinearTrend {
            slope,
            intercept,
            r_squared,
            residual_std_error,
            n: points.len(),
        })
    }

    /// Evaluates the fitted line at `x`.
    pub fn predict_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Residuals y - ŷ for the given points.
    pub fn residuals(&self, points: &[(f64, f64)]) -> Vec<f64> {
        points.iter().map(|(x, y)| y - self.predict_at(*x)).collect()
    }
}

/// Fits the trend line the report uses: annual incident counts against
/// the calendar year.
pub fn annual_trend(years: &[YearCount]) -> Result<LinearTrend, String> {
    let points: Vec<(f64, f64)> = years
        .iter()
        .map(|y| (y.year as f64, y.count as f64))
        .collect();
    LinearTrend::fit(&points)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
