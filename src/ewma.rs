//! Exponentially weighted moving average over daily values

/// Decay constant for a span of `days`: `2 / (days + 1)`
pub fn decay_for_span(days: usize) -> f64 {
    2.0 / (days as f64 + 1.0)
}

/// Exponentially weighted moving average of `values`.
///
/// The first element seeds the average, so pass exactly the sub-window to be
/// smoothed. Each later value updates it as
/// `avg = lambda * v + (1 - lambda) * avg`. An empty slice yields `0`.
///
/// `lambda` is expected in `(0, 1]`; `1` returns the last element.
pub fn ewma(values: &[f64], lambda: f64) -> f64 {
    let Some((&seed, rest)) = values.split_first() else {
        return 0.0;
    };

    rest.iter()
        .fold(seed, |avg, &value| lambda * value + (1.0 - lambda) * avg)
}
