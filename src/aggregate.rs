use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Per-window statistic computed by [`aggregate`].
///
/// The reciprocal variants replace each sample `x` with `1/x` before
/// reduction, for logs where lower raw values represent better fitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Sum,
    Mean,
    Max,
    ReciprocalMean,
    ReciprocalMax,
}

enum Reduction {
    Sum,
    Mean,
    Max,
}

impl Mode {
    fn reciprocal(self) -> bool {
        matches!(self, Mode::ReciprocalMean | Mode::ReciprocalMax)
    }

    fn reduction(self) -> Reduction {
        match self {
            Mode::Sum => Reduction::Sum,
            Mode::Mean | Mode::ReciprocalMean => Reduction::Mean,
            Mode::Max | Mode::ReciprocalMax => Reduction::Max,
        }
    }
}

/// Partition `samples` into consecutive windows of `window_size` and reduce
/// each complete window to one scalar.
///
/// Trailing samples beyond the last complete window are discarded, so the
/// output length is always `samples.len() / window_size`. An input shorter
/// than one window yields an empty output. Every result is divided by the
/// normalization constant `norm_const`.
///
/// # Errors
/// Returns an error if `window_size` is zero, or if a sample is exactly zero
/// under a reciprocal mode.
pub fn aggregate(
    samples: &[f64],
    window_size: usize,
    mode: Mode,
    norm_const: f64,
) -> Result<Vec<f64>> {
    if window_size == 0 {
        bail!("window size must be at least 1");
    }

    let mut series = Vec::with_capacity(samples.len() / window_size);
    let mut scratch = vec![0.0; window_size];

    for (i_window, window) in samples.chunks_exact(window_size).enumerate() {
        for (i_slot, &sample) in window.iter().enumerate() {
            scratch[i_slot] = if mode.reciprocal() {
                if sample == 0.0 {
                    let i_sample = i_window * window_size + i_slot;
                    bail!("sample {i_sample} is zero under a reciprocal transform");
                }
                1.0 / sample
            } else {
                sample
            };
        }

        let value = match mode.reduction() {
            Reduction::Sum => scratch.iter().sum::<f64>(),
            Reduction::Mean => scratch.iter().sum::<f64>() / window_size as f64,
            Reduction::Max => scratch.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        };

        series.push(value / norm_const);
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_length_is_window_count() {
        let samples: Vec<f64> = (0..17).map(f64::from).collect();
        for window_size in 1..=6 {
            let series = aggregate(&samples, window_size, Mode::Mean, 1.0).unwrap();
            assert_eq!(series.len(), samples.len() / window_size);
        }
    }

    #[test]
    fn short_input_yields_empty_output() {
        assert!(aggregate(&[], 3, Mode::Mean, 1.0).unwrap().is_empty());
        assert!(aggregate(&[1.0, 2.0], 3, Mode::Max, 1.0).unwrap().is_empty());
    }

    #[test]
    fn trailing_samples_are_discarded() {
        // The dropped tail holds the largest sample; it must not leak into
        // any window.
        let samples = [1.0, 2.0, 4.0, 5.0, 1.0, 3.0, 9.0];
        let series = aggregate(&samples, 3, Mode::Max, 1.0).unwrap();
        assert_eq!(series, vec![4.0, 5.0]);
    }

    #[test]
    fn mean_is_sum_then_divide() {
        let samples = [1.0, 2.0, 4.0, 0.5, 0.5, 0.5];
        let series = aggregate(&samples, 3, Mode::Mean, 1.0).unwrap();
        assert_eq!(series, vec![(1.0 + 2.0 + 4.0) / 3.0, (0.5 + 0.5 + 0.5) / 3.0]);
    }

    #[test]
    fn sum_and_max_reduce_raw_values() {
        let samples = [3.0, -1.0, 2.0, 8.0];
        assert_eq!(aggregate(&samples, 2, Mode::Sum, 1.0).unwrap(), vec![2.0, 10.0]);
        assert_eq!(aggregate(&samples, 2, Mode::Max, 1.0).unwrap(), vec![3.0, 8.0]);
    }

    #[test]
    fn reciprocal_mean_matches_reference_scenario() {
        // Scratch buffer [1, 0.5, 0.25, 0.2, 1] sums to 2.95.
        let samples = [1.0, 2.0, 4.0, 5.0, 1.0];
        let series = aggregate(&samples, 5, Mode::ReciprocalMean, 1.0).unwrap();
        assert_eq!(series.len(), 1);
        assert!((series[0] - 0.59).abs() < 1e-12);
    }

    #[test]
    fn reciprocal_max_takes_max_of_transformed_values() {
        let samples = [1.0, 2.0, 4.0, 5.0, 1.0];
        let series = aggregate(&samples, 5, Mode::ReciprocalMax, 1.0).unwrap();
        assert_eq!(series, vec![1.0]);
    }

    #[test]
    fn norm_const_divides_every_window() {
        let samples = [10.0, 20.0, 30.0, 40.0];
        let series = aggregate(&samples, 2, Mode::Max, 5.0).unwrap();
        assert_eq!(series, vec![4.0, 8.0]);
    }

    #[test]
    fn zero_sample_under_reciprocal_is_an_error() {
        let samples = [1.0, 0.0, 2.0];
        let error = aggregate(&samples, 3, Mode::ReciprocalMean, 1.0).unwrap_err();
        assert!(error.to_string().contains("sample 1"));
    }

    #[test]
    fn zero_window_size_is_an_error() {
        assert!(aggregate(&[1.0], 0, Mode::Mean, 1.0).is_err());
    }
}
