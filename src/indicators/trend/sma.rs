//! SMA (Simple Moving Average) over a partially defined series

/// Trailing mean of `window` consecutive defined values.
///
/// Entry `i` is defined only when every value in `series[i + 1 - window..=i]`
/// is defined, so an undefined prefix in the input lengthens the undefined
/// prefix of the output by `window - 1`.
pub fn compute_smoothed(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut smoothed = vec![None; series.len()];
    if window == 0 || series.len() < window {
        return smoothed;
    }

    for (i, slot) in smoothed.iter_mut().enumerate().skip(window - 1) {
        let values: Option<Vec<f64>> = series[i + 1 - window..=i].iter().copied().collect();
        if let Some(values) = values {
            *slot = Some(values.iter().sum::<f64>() / window as f64);
        }
    }

    smoothed
}

