use anyhow::Result;

/// Pivots below this magnitude mark the matrix as singular.
const PIVOT_TOLERANCE: f64 = 1e-14;

/// Row-pivoted LU factorization `P A = L U` of a square matrix.
///
/// `L` (unit diagonal) and `U` share one row-major buffer.
#[derive(Debug, Clone)]
pub struct Lu {
    n: usize,
    lu: Vec<f64>,
    /// `perm[i]` is the row of `A` that ended up in row `i`.
    perm: Vec<usize>,
}

impl Lu {
    /// Factorizes the `n x n` row-major matrix `a`.
    pub fn factor(n: usize, mut a: Vec<f64>) -> Result<Self> {
        anyhow::ensure!(
            a.len() == n * n,
            "Expected {} matrix entries for a {n}x{n} system, got {}",
            n * n,
            a.len()
        );
        let mut perm: Vec<usize> = (0..n).collect();

        for k in 0..n {
            let (pivot_row, pivot) = (k..n)
                .map(|r| (r, a[r * n + k].abs()))
                .fold((k, -1.0), |best, cand| if cand.1 > best.1 { cand } else { best });
            anyhow::ensure!(
                pivot > PIVOT_TOLERANCE && pivot.is_finite(),
                "Singular matrix: pivot {pivot:e} in column {k}"
            );
            if pivot_row != k {
                for c in 0..n {
                    a.swap(k * n + c, pivot_row * n + c);
                }
                perm.swap(k, pivot_row);
            }

            let diag = a[k * n + k];
            for r in (k + 1)..n {
                let m = a[r * n + k] / diag;
                a[r * n + k] = m;
                if m != 0.0 {
                    for c in (k + 1)..n {
                        a[r * n + c] -= m * a[k * n + c];
                    }
                }
            }
        }

        Ok(Self { n, lu: a, perm })
    }

    /// Solves `A x = b` with the stored factors.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let n = self.n;
        anyhow::ensure!(b.len() == n, "Right-hand side has {} entries, expected {n}", b.len());

        // L y = P b
        let mut x: Vec<f64> = self.perm.iter().map(|&p| b[p]).collect();
        for i in 0..n {
            let row = &self.lu[i * n..i * n + i];
            let sum: f64 = row.iter().zip(&x[..i]).map(|(l, y)| l * y).sum();
            x[i] -= sum;
        }
        // U x = y
        for i in (0..n).rev() {
            let row = &self.lu[i * n..(i + 1) * n];
            let tail: f64 = row[i + 1..].iter().zip(&x[i + 1..]).map(|(u, v)| u * v).sum();
            x[i] = (x[i] - tail) / row[i];
        }

        if let Some(i) = x.iter().position(|v| !v.is_finite()) {
            anyhow::bail!("Non-finite solution at index {i}");
        }
        Ok(x)
    }
}
