//! Histogram binning of timing samples
//!
//! Bins samples into equal-width bins, e.g., for rendering duration histograms.

use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::statistics::interquartile_range;

/// Number of bins used when the Freedman-Diaconis rule is not applicable (IQR of `0`)
pub const DEFAULT_NUM_BINS: usize = 100;

/// Binned sample counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Histogram {
    /// Number of samples per bin
    pub counts: Vec<usize>,
    /// Bin edges (one more than [`Histogram::counts`]); all bins are half-open except the last one
    pub bin_edges: Vec<f64>,
}

impl Histogram {
    ///
    /// Bin samples into `num_bins` equal-width bins over `range` (or over the sample range if `None`)
    ///
    /// Samples outside the range are ignored.
    /// If the range is empty (e.g., all samples are equal), it is widened by `0.5` on each side.
    pub fn from_samples(samples: &[f64], num_bins: usize, range: Option<(f64, f64)>) -> Self {
        let num_bins = num_bins.max(1);
        let (mut first, mut last) = range
            .or_else(|| samples.iter().copied().minmax().into_option())
            .unwrap_or((0.0, 1.0));
        if first == last {
            first -= 0.5;
            last += 0.5;
        }
        let width = (last - first) / num_bins as f64;
        let bin_edges: Vec<f64> = (0..=num_bins)
            .map(|i| first + i as f64 * width)
            .collect();
        let mut counts = vec![0; num_bins];
        for &v in samples {
            if v < first || v > last {
                continue;
            }
            let index = (((v - first) / width).floor() as usize).min(num_bins - 1);
            counts[index] += 1;
        }
        Self { counts, bin_edges }
    }

    /// Bin samples using the number of bins given by [`freedman_diaconis_rule`]
    pub fn with_freedman_diaconis(samples: &[f64], range: Option<(f64, f64)>) -> Self {
        let (num_bins, _) = freedman_diaconis_rule(samples);
        Self::from_samples(samples, num_bins, range)
    }

    /// Total number of binned samples
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(bin center, count, poisson error)` for all non-empty bins
    ///
    /// Bin counts are assumed to be Poisson distributed, so the error is the square root of the count.
    pub fn non_empty_bins(&self) -> Vec<(f64, usize, f64)> {
        self.bin_edges
            .iter()
            .tuple_windows()
            .zip(&self.counts)
            .filter(|(_, count)| **count > 0)
            .map(|((lo, hi), count)| ((lo + hi) / 2.0, *count, (*count as f64).sqrt()))
            .collect()
    }
}

///
/// Freedman-Diaconis rule: number of bins and bin width for the given samples
///
/// The bin width is `2 * IQR / n^(1/3)`. If the IQR is `0`, [`DEFAULT_NUM_BINS`] bins with width `0` are returned.
pub fn freedman_diaconis_rule(samples: &[f64]) -> (usize, f64) {
    let iqr = interquartile_range(samples).unwrap_or(0.0);
    let Some((min, max)) = samples.iter().copied().minmax().into_option() else {
        return (DEFAULT_NUM_BINS, 0.0);
    };
    if iqr > 0.0 {
        let bin_width = 2.0 * iqr / (samples.len() as f64).cbrt();
        let num_bins = ((max - min) / bin_width).ceil() as usize;
        (num_bins.max(1), bin_width)
    } else {
        (DEFAULT_NUM_BINS, 0.0)
    }
}
