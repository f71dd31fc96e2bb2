//! Numerically stable softmax over one row of logits.

/// Largest logit in the row, or `NEG_INFINITY` for an empty row.
#[inline]
pub fn max_logit(logits: &[f32]) -> f32 {
    logits.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

/// Replace `logits` with `softmax(logits)`.
///
/// The maximum is subtracted before exponentiation, so every exponent lies in
/// `(-inf, 0]` and large logits cannot overflow. The result is a probability
/// distribution: non-negative and summing to 1 up to rounding.
///
/// # Example
///
/// ```
/// use softreg::training::softmax_inplace;
///
/// let mut row = [1000.0f32, 1000.0];
/// softmax_inplace(&mut row);
/// assert_eq!(row, [0.5, 0.5]);
/// ```
#[inline]
pub fn softmax_inplace(logits: &mut [f32]) {
    let max = max_logit(logits);

    let mut exp_sum = 0.0f32;
    for logit in logits.iter_mut() {
        *logit = (*logit - max).exp();
        exp_sum += *logit;
    }

    for p in logits.iter_mut() {
        *p /= exp_sum;
    }
}
