use rand::prelude::*;

/// Generate random dense features in row-major order.
///
/// Values are uniform in `[min, max]`.
pub fn random_dense_f32(rows: usize, cols: usize, seed: u64, min: f32, max: f32) -> Vec<f32> {
    assert!(max >= min);
    let mut rng = StdRng::seed_from_u64(seed);
    let width = max - min;
    (0..rows * cols)
        .map(|_| min + rng.r#gen::<f32>() * width)
        .collect()
}

/// Generate a linearly separable-ish multiclass problem.
///
/// Features are uniform in `[-1, 1]`. Each class gets a random weight vector
/// and the label is the arg-max of the class scores, so a linear softmax
/// model can fit the data well.
///
/// Returns `(features_row_major, labels)`.
pub fn synthetic_multiclass(
    rows: usize,
    cols: usize,
    classes: usize,
    seed: u64,
) -> (Vec<f32>, Vec<u8>) {
    assert!(cols > 0, "synthetic_multiclass needs at least one feature");
    assert!((1..=u8::MAX as usize + 1).contains(&classes));
    let features = random_dense_f32(rows, cols, seed, -1.0, 1.0);

    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let weights: Vec<f32> = (0..cols * classes)
        .map(|_| rng.r#gen::<f32>() * 2.0 - 1.0)
        .collect();

    let labels = features
        .chunks_exact(cols)
        .map(|row| {
            let mut best = 0usize;
            let mut best_score = f32::NEG_INFINITY;
            for c in 0..classes {
                let score: f32 = row
                    .iter()
                    .enumerate()
                    .map(|(f, &x)| x * weights[f * classes + c])
                    .sum();
                if score > best_score {
                    best_score = score;
                    best = c;
                }
            }
            best as u8
        })
        .collect();

    (features, labels)
}

/// Mean cross-entropy of `theta` on a dataset, used to check that epochs
/// make progress.
pub fn mean_cross_entropy(
    x: &[f32],
    y: &[u8],
    theta: &[f32],
    rows: usize,
    cols: usize,
    classes: usize,
) -> f32 {
    assert_eq!(x.len(), rows * cols);
    assert_eq!(y.len(), rows);
    assert_eq!(theta.len(), cols * classes);
    if rows == 0 {
        return 0.0;
    }
    if cols == 0 {
        return (classes as f32).ln();
    }

    let mut logits = vec![0.0f32; classes];
    let mut total = 0.0f64;
    for (row, &label) in x.chunks_exact(cols).zip(y) {
        for (c, logit) in logits.iter_mut().enumerate() {
            *logit = row
                .iter()
                .enumerate()
                .map(|(f, &v)| v * theta[f * classes + c])
                .sum();
        }
        crate::training::softmax_inplace(&mut logits);
        total -= (logits[label as usize].max(f32::MIN_POSITIVE) as f64).ln();
    }
    (total / rows as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_are_deterministic() {
        assert_eq!(random_dense_f32(4, 3, 7, 0.0, 1.0), random_dense_f32(4, 3, 7, 0.0, 1.0));
        assert_eq!(synthetic_multiclass(20, 4, 3, 11), synthetic_multiclass(20, 4, 3, 11));
    }

    #[test]
    fn synthetic_shapes_and_ranges() {
        let (x, y) = synthetic_multiclass(50, 4, 3, 42);
        assert_eq!(x.len(), 200);
        assert_eq!(y.len(), 50);
        assert!(x.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert!(y.iter().all(|&c| c < 3));
    }

    #[test]
    fn zero_weights_give_log_k() {
        let (x, y) = synthetic_multiclass(10, 2, 4, 3);
        let loss = mean_cross_entropy(&x, &y, &[0.0; 8], 10, 2, 4);
        assert!((loss - 4.0f32.ln()).abs() < 1e-5);
    }
}
