/// Short-horizon forecaster for the monthly incident series.
///
/// ARIMA-style in the integrated-autoregression sense: the series is
/// differenced `d` times to strip the trend, an AR(`p`) model is fitted
/// on the differenced values via the Yule-Walker equations (solved with
/// Levinson-Durbin recursion), forecasts are generated recursively and
/// then undifferenced back to the original scale. The confidence band
/// comes from the in-sample residual standard deviation, widening with
/// the square root of the horizon step.
///
/// Incident counts cannot go below zero, so the point forecast and the
/// lower band are floored at 0.

/// Forecast with its confidence band, all on the original (count) scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastBand {
    pub point: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// The level the band was built for, e.g. 0.95.
    pub confidence_level: f64,
}

/// Integrated AR forecaster.
#[derive(Debug, Clone)]
pub struct ArForecaster {
    p: usize,
    d: usize,
    ar_coeffs: Vec<f64>,
    /// Mean of the differenced series; forecasts revert toward it.
    constant: f64,
    original: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    fitted: bool,
}

impl ArForecaster {
    /// Creates an unfitted forecaster with AR order `p` and differencing
    /// order `d`.
    ///
    /// # Errors
    /// `p` must be 1-6 and `d` at most 2. Higher orders are not useful
    /// on a monthly count series a couple hundred points long.
    pub fn new(p: usize, d: usize) -> Result<ArForecaster, String> {
        if p == 0 || p > 6 {
            return Err(format!("AR order must be 1-6, got {}", p));
        }
        if d > 2 {
            return Err(format!("Differencing order must be <= 2, got {}", d));
        }

        Ok(ArForecaster {
            p,
            d,
            ar_coeffs: Vec::new(),
            constant: 0.0,
            original: Vec::new(),
            differenced: Vec::new(),
            residuals: Vec::new(),
            fitted: false,
        })
    }

    /// Fits the model to the observed series.
    ///
    /// # Errors
    /// Requires at least `p + d + 10` observations and rejects NaN or
    /// infinite values.
    pub fn fit(&mut self, series: &[f64]) -> Result<(), String> {
        let min_required = self.p + self.d + 10;
        if series.len() < min_required {
            return Err(format!(
                "Need at least {} observations to fit AR({}) with d={}, got {}",
                min_required,
                self.p,
                self.d,
                series.len()
            ));
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err("Series contains NaN or infinite values".to_string());
        }

        self.original = series.to_vec();
        self.differenced = difference(series, self.d);

        let n = self.differenced.len();
        self.constant = self.differenced.iter().sum::<f64>() / n as f64;
        self.ar_coeffs = yule_walker(&self.differenced, self.p);

        // In-sample one-step residuals; the band width comes from these.
        self.residuals = Vec::with_capacity(n.saturating_sub(self.p));
        for i in self.p..n {
            let mut prediction = self.constant;
            for (j, coeff) in self.ar_coeffs.iter().enumerate() {
                prediction += coeff * (self.differenced[i - j - 1] - self.constant);
            }
            self.residuals.push(self.differenced[i] - prediction);
        }

        self.fitted = true;
        Ok(())
    }

    /// Produces an `horizon`-step forecast with a confidence band.
    ///
    /// # Errors
    /// Fails if the model has not been fitted or `horizon` is zero.
    pub fn forecast(&self, horizon: usize, confidence_level: f64) -> Result<ForecastBand, String> {
        if !self.fitted {
            return Err("Forecaster has not been fitted".to_string());
        }
        if horizon == 0 {
            return Err("Forecast horizon must be at least 1".to_string());
        }

        // Recursive forecast on the differenced scale.
        let n = self.differenced.len();
        let mut extended = self.differenced.clone();
        for _ in 0..horizon {
            let mut next = self.constant;
            for (j, coeff) in self.ar_coeffs.iter().enumerate() {
                next += coeff * (extended[extended.len() - j - 1] - self.constant);
            }
            extended.push(next);
        }

        let point = undifference(&extended[n..], &self.original, self.d);

        // Residual spread, widened by sqrt(step) for each horizon step.
        let sd = std_dev(&self.residuals);
        let z = z_score(confidence_level);

        let mut floored_point = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (step, &value) in point.iter().enumerate() {
            let margin = z * sd * ((step + 1) as f64).sqrt();
            floored_point.push(value.max(0.0));
            lower.push((value - margin).max(0.0));
            upper.push(value + margin);
        }

        Ok(ForecastBand {
            point: floored_point,
            lower,
            upper,
            confidence_level,
        })
    }

    /// AR coefficients of the fitted model.
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    /// Standard deviation of the in-sample one-step residuals.
    pub fn residual_std_dev(&self) -> f64 {
        std_dev(&self.residuals)
    }

    /// Model orders (p, d).
    pub fn orders(&self) -> (usize, usize) {
        (self.p, self.d)
    }
}

// ---------------------------------------------------------------------------
// Numerics
// ---------------------------------------------------------------------------

/// Applies first differencing `order` times.
fn difference(series: &[f64], order: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Integrates `forecasts` back onto the original scale by cumulatively
/// summing from the tail of the observed series, once per differencing
/// pass.
fn undifference(forecasts: &[f64], original: &[f64], order: usize) -> Vec<f64> {
    if order == 0 {
        return forecasts.to_vec();
    }

    // Tail values of each intermediate differencing level, innermost last.
    let mut tails = Vec::with_capacity(order);
    let mut level = original.to_vec();
    for _ in 0..order {
        tails.push(*level.last().expect("fit() guarantees a non-empty series"));
        level = level.windows(2).map(|w| w[1] - w[0]).collect();
    }

    let mut result = forecasts.to_vec();
    for tail in tails.into_iter().rev() {
        let mut running = tail;
        for value in result.iter_mut() {
            running += *value;
            *value = running;
        }
    }
    result
}

/// Estimates AR coefficients from the Yule-Walker equations using
/// Levinson-Durbin recursion.
fn yule_walker(series: &[f64], p: usize) -> Vec<f64> {
    let n = series.len();
    let mean = series.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = series.iter().map(|v| v - mean).collect();

    // Biased autocovariance estimates r_0 .. r_p.
    let mut autocov = vec![0.0; p + 1];
    for (k, slot) in autocov.iter_mut().enumerate() {
        let mut sum = 0.0;
        for i in k..n {
            sum += centered[i] * centered[i - k];
        }
        *slot = sum / n as f64;
    }

    let mut coeffs = vec![0.0; p];
    if autocov[0].abs() < 1e-10 {
        return coeffs; // constant series, nothing to regress on
    }

    coeffs[0] = autocov[1] / autocov[0];
    for k in 1..p {
        let mut numerator = autocov[k + 1];
        let mut denominator = autocov[0];
        for j in 0..k {
            numerator -= coeffs[j] * autocov[k - j];
            denominator -= coeffs[j] * autocov[j + 1];
        }

        if denominator.abs() < 1e-10 {
            break;
        }
        let reflection = numerator / denominator;
        let previous = coeffs.clone();
        coeffs[k] = reflection;
        for j in 0..k {
            coeffs[j] = previous[j] - reflection * previous[k - 1 - j];
        }
    }

    coeffs
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Two-sided z-score for the supported confidence levels. Unrecognized
/// levels fall back to 95%.
fn z_score(confidence_level: f64) -> f64 {
    match confidence_level {
        x if x >= 0.99 => 2.576,
        x if x >= 0.95 => 1.96,
        x if x >= 0.90 => 1.645,
        x if x >= 0.80 => 1.282,
        _ => 1.96,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
