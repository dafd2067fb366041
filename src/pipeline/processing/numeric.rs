//! Null handling shared by the merge and weighting steps.

/// Missing values count as zero when summing.
#[inline]
pub fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Fraction of `total` held by `score`; `None` when the total is exactly zero.
pub fn share_of(score: f64, total: f64) -> Option<f64> {
    if total == 0.0 {
        None
    } else {
        Some(score / total)
    }
}

/// Sum with missing values as zero.
pub fn sum_or_zero<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().map(or_zero).sum()
}
