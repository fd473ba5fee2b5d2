//! Numerical post-processing shared by the pipelines.

/// Denominator floor for masked averaging, so an all-masked sequence
/// divides by a tiny constant instead of zero.
pub const POOL_EPSILON: f32 = 1e-9;

/// Softmax over a logit slice.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

/// L2-normalize a vector in place. A zero vector is left unchanged.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Attention-mask-weighted mean over one sequence of token vectors.
///
/// `hidden` is `seq_len * dim` row-major token states; `mask` holds one
/// weight per token (1 for real tokens, 0 for padding). Padding therefore
/// contributes nothing to the average.
pub fn masked_mean(hidden: &[f32], mask: &[i64], seq_len: usize, dim: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; dim];
    let mut weight = 0.0f32;

    for t in 0..seq_len {
        let m = mask[t] as f32;
        if m > 0.0 {
            let row = &hidden[t * dim..(t + 1) * dim];
            for (p, &h) in pooled.iter_mut().zip(row) {
                *p += h * m;
            }
            weight += m;
        }
    }

    let denom = weight.max(POOL_EPSILON);
    for p in &mut pooled {
        *p /= denom;
    }
    pooled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one_and_preserves_order() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1]);
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn softmax_is_shift_invariant() {
        let a = softmax(&[1.0, 2.0]);
        let b = softmax(&[101.0, 102.0]);
        assert!((a[0] - b[0]).abs() < 1e-6);
        assert!((a[1] - b[1]).abs() < 1e-6);
    }

    #[test]
    fn normalize_produces_unit_vector() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_zero_vector_alone() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn masked_mean_excludes_padding() {
        // Two real tokens and one padding token that would skew the mean.
        let hidden = [1.0, 0.0, 0.0, 1.0, 100.0, 100.0];
        let mask = [1, 1, 0];
        let pooled = masked_mean(&hidden, &mask, 3, 2);
        assert!((pooled[0] - 0.5).abs() < 1e-6);
        assert!((pooled[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn masked_mean_single_token() {
        let hidden = [2.0, 4.0];
        let mask = [1];
        assert_eq!(masked_mean(&hidden, &mask, 1, 2), vec![2.0, 4.0]);
    }

    #[test]
    fn masked_mean_all_masked_does_not_divide_by_zero() {
        let hidden = [5.0, 5.0, 5.0, 5.0];
        let mask = [0, 0];
        let pooled = masked_mean(&hidden, &mask, 2, 2);
        assert!(pooled.iter().all(|p| p.is_finite()));
        assert_eq!(pooled, vec![0.0, 0.0]);
    }
}
