use anyhow::Result;

/// Lower-triangular Cholesky factor `L` of a symmetric positive definite
/// matrix `A = L * L^T`.
#[derive(Debug, Clone)]
pub struct Cholesky {
    l: Vec<Vec<f64>>,
}

impl Cholesky {
    /// Factorizes `matrix`. Only the lower triangle is read.
    pub fn factor(matrix: &[Vec<f64>]) -> Result<Self> {
        let n = matrix.len();
        for (i, row) in matrix.iter().enumerate() {
            anyhow::ensure!(row.len() == n, "Matrix row {i} length mismatch");
        }

        let mut l = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..=i {
                let mut sum = 0.0;
                for k in 0..j {
                    sum += l[i][k] * l[j][k];
                }

                if i == j {
                    let val = matrix[i][i] - sum;
                    if val <= 0.0 || !val.is_finite() {
                        anyhow::bail!(
                            "Cholesky decomposition failed: matrix not positive definite at row {i}"
                        );
                    }
                    l[i][j] = val.sqrt();
                } else {
                    l[i][j] = (matrix[i][j] - sum) / l[j][j];
                }
            }
        }

        Ok(Self { l })
    }

    /// Solves `L * x = b` (forward substitution).
    pub fn solve_lower(&self, b: &[f64]) -> Vec<f64> {
        let n = b.len();
        let mut x = vec![0.0; n];
        for i in 0..n {
            let mut sum = b[i];
            for j in 0..i {
                sum -= self.l[i][j] * x[j];
            }
            x[i] = sum / self.l[i][i];
        }
        x
    }

    /// Solves `L^T * x = b` (backward substitution).
    pub fn solve_upper(&self, b: &[f64]) -> Vec<f64> {
        let n = b.len();
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = b[i];
            for j in (i + 1)..n {
                sum -= self.l[j][i] * x[j];
            }
            x[i] = sum / self.l[i][i];
        }
        x
    }

    /// Natural logarithm of `det(A)`.
    pub fn log_det(&self) -> f64 {
        2.0 * self.l.iter().enumerate().map(|(i, row)| row[i].ln()).sum::<f64>()
    }
}
