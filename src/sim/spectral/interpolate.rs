use anyhow::Result;

/// Piecewise-linear interpolation of tabulated `y(x)`.
///
/// Evaluation outside `[x_min, x_max]` is an error.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearInterpolator {
    /// Builds the interpolator. Knots are sorted by `x`; duplicated `x` values
    /// are rejected.
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        anyhow::ensure!(
            x.len() == y.len(),
            "x and y lengths differ: {} vs {}",
            x.len(),
            y.len()
        );
        anyhow::ensure!(x.len() >= 2, "Interpolation needs at least two points");
        anyhow::ensure!(
            x.iter().chain(y).all(|v| v.is_finite()),
            "Interpolation data contain non-finite values"
        );

        let mut knots: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        knots.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in knots.windows(2) {
            anyhow::ensure!(pair[1].0 > pair[0].0, "Duplicate abscissa {}", pair[0].0);
        }

        Ok(Self {
            x: knots.iter().map(|k| k.0).collect(),
            y: knots.iter().map(|k| k.1).collect(),
        })
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn eval(&self, x: f64) -> Result<f64> {
        let (lo, hi) = self.x_range();
        anyhow::ensure!(
            x >= lo && x <= hi,
            "A value ({x}) in x_new is outside the interpolation range [{lo}, {hi}]"
        );

        if x == hi {
            return Ok(self.y[self.y.len() - 1]);
        }

        // First knot strictly greater than x
        let i = self.x.partition_point(|&k| k <= x).max(1);
        let (x0, x1) = (self.x[i - 1], self.x[i]);
        let (y0, y1) = (self.y[i - 1], self.y[i]);
        Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
    }

    pub fn eval_many(&self, xs: &[f64]) -> Result<Vec<f64>> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_at_knots() {
        let x = [0.3, 0.5, 1.0, 2.5];
        let y = [10.0, 1200.0, 700.0, 5.0];
        let f = LinearInterpolator::new(&x, &y).unwrap();
        assert_eq!(f.eval_many(&x).unwrap(), y.to_vec());
    }

    #[test]
    fn test_linear_between_knots() {
        let f = LinearInterpolator::new(&[0.0, 2.0, 4.0], &[0.0, 4.0, 0.0]).unwrap();
        assert!((f.eval(1.0).unwrap() - 2.0).abs() < 1e-12);
        assert!((f.eval(3.0).unwrap() - 2.0).abs() < 1e-12);
        assert!((f.eval(3.5).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let f = LinearInterpolator::new(&[2.0, 0.0, 1.0], &[20.0, 0.0, 10.0]).unwrap();
        assert_eq!(f.x_range(), (0.0, 2.0));
        assert!((f.eval(1.5).unwrap() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range() {
        let f = LinearInterpolator::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert!(f.eval(-0.1).is_err());
        assert!(f.eval(1.1).is_err());
        assert!(f.eval(1.0).is_ok());
    }

    #[test]
    fn test_invalid_data() {
        assert!(LinearInterpolator::new(&[0.0], &[1.0]).is_err());
        assert!(LinearInterpolator::new(&[0.0, 1.0], &[1.0]).is_err());
        assert!(LinearInterpolator::new(&[0.0, 0.0], &[1.0, 2.0]).is_err());
        assert!(LinearInterpolator::new(&[0.0, f64::NAN], &[1.0, 2.0]).is_err());
    }
}
