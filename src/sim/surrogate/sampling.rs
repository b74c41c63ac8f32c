use anyhow::Result;
use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// How points are placed inside the Latin hypercube strata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LhsCriterion {
    /// Uniformly random position inside each stratum.
    Random,
    /// Center of each stratum.
    Center,
    /// Best of `iterations` random designs by minimum pairwise distance.
    Maximin { iterations: usize },
}

impl Default for LhsCriterion {
    fn default() -> Self {
        Self::Center
    }
}

/// Latin hypercube sampler over a box.
#[derive(Debug, Clone, PartialEq)]
pub struct LatinHypercube {
    /// `(lower, upper)` limit of each dimension.
    pub xlimits: Vec<(f64, f64)>,
    pub criterion: LhsCriterion,
}

impl LatinHypercube {
    pub fn new(xlimits: Vec<(f64, f64)>, criterion: LhsCriterion) -> Result<Self> {
        anyhow::ensure!(!xlimits.is_empty(), "LHS needs at least one dimension");
        for (d, &(lb, ub)) in xlimits.iter().enumerate() {
            anyhow::ensure!(
                lb.is_finite() && ub.is_finite() && lb < ub,
                "Invalid limits for dimension {d}: [{lb}, {ub}]"
            );
        }
        if let LhsCriterion::Maximin { iterations } = criterion {
            anyhow::ensure!(iterations > 0, "Maximin needs at least one iteration");
        }
        Ok(Self { xlimits, criterion })
    }

    pub fn dim(&self) -> usize {
        self.xlimits.len()
    }

    /// Draws `n` points, one per stratum in every dimension.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Array2<f64>> {
        anyhow::ensure!(n > 0, "LHS needs at least one sample");
        let unit = match self.criterion {
            LhsCriterion::Random => unit_lhs(n, self.dim(), false, rng),
            LhsCriterion::Center => unit_lhs(n, self.dim(), true, rng),
            LhsCriterion::Maximin { iterations } => {
                let mut best = unit_lhs(n, self.dim(), false, rng);
                let mut best_dist = min_pairwise_distance(&best);
                for _ in 1..iterations {
                    let candidate = unit_lhs(n, self.dim(), false, rng);
                    let dist = min_pairwise_distance(&candidate);
                    if dist > best_dist {
                        best = candidate;
                        best_dist = dist;
                    }
                }
                best
            }
        };

        let mut scaled = unit;
        for ((_, d), v) in scaled.indexed_iter_mut() {
            let (lb, ub) = self.xlimits[d];
            *v = lb + *v * (ub - lb);
        }
        Ok(scaled)
    }
}

fn unit_lhs<R: Rng + ?Sized>(n: usize, dims: usize, centered: bool, rng: &mut R) -> Array2<f64> {
    let mut samples = Array2::zeros((n, dims));
    for dim in 0..dims {
        let mut values: Vec<f64> = (0..n)
            .map(|i| {
                let offset = if centered { 0.5 } else { rng.r#gen::<f64>() };
                (i as f64 + offset) / n as f64
            })
            .collect();
        values.shuffle(rng);
        for (i, v) in values.into_iter().enumerate() {
            samples[[i, dim]] = v;
        }
    }
    samples
}

fn min_pairwise_distance(samples: &Array2<f64>) -> f64 {
    let n = samples.nrows();
    let mut best = f64::INFINITY;
    for i in 0..n {
        for j in (i + 1)..n {
            let d2: f64 = samples
                .row(i)
                .iter()
                .zip(samples.row(j).iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();
            best = best.min(d2);
        }
    }
    best.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn strata(samples: &Array2<f64>, d: usize, lb: f64, ub: f64) -> Vec<usize> {
        let n = samples.nrows();
        let mut s: Vec<usize> = samples
            .column(d)
            .iter()
            .map(|v| (((v - lb) / (ub - lb)) * n as f64).floor() as usize)
            .collect();
        s.sort_unstable();
        s
    }

    #[test]
    fn test_one_point_per_stratum() {
        let limits = vec![(10.0, 40.0), (20.0, 40.0)];
        let mut rng = StdRng::seed_from_u64(1);
        for criterion in [
            LhsCriterion::Random,
            LhsCriterion::Center,
            LhsCriterion::Maximin { iterations: 5 },
        ] {
            let lhs = LatinHypercube::new(limits.clone(), criterion).unwrap();
            let x = lhs.sample(100, &mut rng).unwrap();
            assert_eq!(x.dim(), (100, 2));
            for (d, &(lb, ub)) in limits.iter().enumerate() {
                let s = strata(&x, d, lb, ub);
                assert_eq!(s, (0..100).collect::<Vec<_>>(), "{criterion:?} dim {d}");
            }
        }
    }

    #[test]
    fn test_center_criterion() {
        let lhs = LatinHypercube::new(vec![(0.0, 1.0)], LhsCriterion::Center).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let x = lhs.sample(4, &mut rng).unwrap();
        let mut v: Vec<f64> = x.column(0).to_vec();
        v.sort_by(f64::total_cmp);
        assert_eq!(v, vec![0.125, 0.375, 0.625, 0.875]);
    }

    #[test]
    fn test_maximin_not_worse_than_first_candidate() {
        let lhs = LatinHypercube::new(
            vec![(0.0, 1.0), (0.0, 1.0)],
            LhsCriterion::Maximin { iterations: 20 },
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let x = lhs.sample(20, &mut rng).unwrap();
        assert!(min_pairwise_distance(&x) > 0.0);
    }

    #[test]
    fn test_invalid_limits() {
        assert!(LatinHypercube::new(vec![], LhsCriterion::Center).is_err());
        assert!(LatinHypercube::new(vec![(1.0, 0.0)], LhsCriterion::Center).is_err());
        assert!(
            LatinHypercube::new(vec![(0.0, 1.0)], LhsCriterion::Maximin { iterations: 0 })
                .is_err()
        );
    }
}
