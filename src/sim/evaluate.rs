use anyhow::{Context, Result};
use ndarray::Array2;
use rayon::prelude::*;

/// Evaluates `model` on every row of `samples` in parallel.
///
/// Output order matches row order. The first failing row aborts the whole
/// evaluation with its row index attached.
pub fn evaluate_rows<F>(samples: &Array2<f64>, model: F) -> Result<Vec<f64>>
where
    F: Fn(&[f64]) -> Result<f64> + Sync,
{
    (0..samples.nrows())
        .into_par_iter()
        .map(|i| {
            let row = samples.row(i).to_vec();
            model(&row).with_context(|| format!("Model evaluation failed at sample {i}: {row:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_order_is_preserved() {
        let samples = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let y = evaluate_rows(&samples, |x| Ok(x[0] * 10.0 + x[1])).unwrap();
        assert_eq!(y, vec![12.0, 34.0, 56.0]);
    }

    #[test]
    fn test_error_is_propagated() {
        let samples = array![[1.0], [-1.0]];
        let result = evaluate_rows(&samples, |x| {
            anyhow::ensure!(x[0] > 0.0, "negative");
            Ok(x[0])
        });
        assert!(result.is_err());
    }
}
