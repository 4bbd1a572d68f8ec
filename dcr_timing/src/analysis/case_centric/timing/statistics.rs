//! Order statistics of timing samples

use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::process_models::dcr::ConstraintKind;

/// Errors when summarizing samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatisticsError {
    /// Too few samples for meaningful statistics
    InsufficientSamples {
        /// Number of available samples
        count: usize,
        /// Number of samples required
        required: usize,
    },
    /// A sample is `NaN` or infinite
    NonFiniteSample(f64),
}

impl Display for StatisticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatisticsError::InsufficientSamples { count, required } => write!(
                f,
                "Not enough data points: got {count}, but at least {required} are required"
            ),
            StatisticsError::NonFiniteSample(v) => write!(f, "Non-finite sample value: {v}"),
        }
    }
}

impl std::error::Error for StatisticsError {}

///
/// Box plot values of a set of samples
///
/// Quartiles are computed with linear interpolation between the closest ranks.
/// Whiskers are the most extreme samples within `whisker_factor` times the IQR of the quartiles.
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoxPlotSummary {
    /// Smallest sample not below `lower_quartile - whisker_factor * iqr`
    pub lower_whisker: f64,
    /// 25th percentile
    pub lower_quartile: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub upper_quartile: f64,
    /// Largest sample not above `upper_quartile + whisker_factor * iqr`
    pub upper_whisker: f64,
    /// Interquartile range
    pub iqr: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
}

impl BoxPlotSummary {
    /// All values in fixed order:
    /// lower whisker, lower quartile, median, upper quartile, upper whisker, IQR, min, max, mean
    pub fn as_array(&self) -> [f64; 9] {
        [
            self.lower_whisker,
            self.lower_quartile,
            self.median,
            self.upper_quartile,
            self.upper_whisker,
            self.iqr,
            self.min,
            self.max,
            self.mean,
        ]
    }
}

/// Which bound of a summary to use as delay or deadline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum BoundMode {
    /// Most extreme observed value (`min` for delays, `max` for deadlines)
    #[default]
    Extreme,
    /// Whisker value, ignoring outliers (`lower_whisker` for delays, `upper_whisker` for deadlines)
    ExcludeOutliers,
}

impl ConstraintKind {
    /// Select the delay ([`ConstraintKind::MinDelay`]) or deadline ([`ConstraintKind::MaxDeadline`]) bound from a summary
    pub fn bound(&self, summary: &BoxPlotSummary, mode: BoundMode) -> f64 {
        match (self, mode) {
            (ConstraintKind::MinDelay, BoundMode::Extreme) => summary.min,
            (ConstraintKind::MinDelay, BoundMode::ExcludeOutliers) => summary.lower_whisker,
            (ConstraintKind::MaxDeadline, BoundMode::Extreme) => summary.max,
            (ConstraintKind::MaxDeadline, BoundMode::ExcludeOutliers) => summary.upper_whisker,
        }
    }
}

/// Percentile (`0.0..=100.0`) of already sorted samples, using linear interpolation
///
/// Returns `None` for empty input.
pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (percentile / 100.0).clamp(0.0, 1.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Arithmetic mean, `None` for empty input
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Interquartile range of the samples (in any order), `None` for empty input
pub fn interquartile_range(samples: &[f64]) -> Option<f64> {
    let sorted = sorted_copy(samples);
    Some(percentile_of_sorted(&sorted, 75.0)? - percentile_of_sorted(&sorted, 25.0)?)
}

fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

///
/// Compute the [`BoxPlotSummary`] of the samples
///
/// Requires strictly more than `min_samples` samples; fewer yield [`StatisticsError::InsufficientSamples`].
pub fn box_plot_summary(
    samples: &[f64],
    min_samples: usize,
    whisker_factor: f64,
) -> Result<BoxPlotSummary, StatisticsError> {
    if samples.len() <= min_samples {
        return Err(StatisticsError::InsufficientSamples {
            count: samples.len(),
            required: min_samples.saturating_add(1),
        });
    }
    if let Some(v) = samples.iter().find(|v| !v.is_finite()) {
        return Err(StatisticsError::NonFiniteSample(*v));
    }
    let sorted = sorted_copy(samples);
    let insufficient = || StatisticsError::InsufficientSamples {
        count: 0,
        required: min_samples.saturating_add(1),
    };
    let lower_quartile = percentile_of_sorted(&sorted, 25.0).ok_or_else(insufficient)?;
    let median = percentile_of_sorted(&sorted, 50.0).ok_or_else(insufficient)?;
    let upper_quartile = percentile_of_sorted(&sorted, 75.0).ok_or_else(insufficient)?;
    let iqr = upper_quartile - lower_quartile;

    let upper_limit = upper_quartile + whisker_factor * iqr;
    let lower_limit = lower_quartile - whisker_factor * iqr;
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= upper_limit)
        .unwrap_or(max);
    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|v| *v >= lower_limit)
        .unwrap_or(min);

    Ok(BoxPlotSummary {
        lower_whisker,
        lower_quartile,
        median,
        upper_quartile,
        upper_whisker,
        iqr,
        min,
        max,
        mean: mean(&sorted).ok_or_else(insufficient)?,
    })
}
