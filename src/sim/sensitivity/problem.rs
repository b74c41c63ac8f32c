use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Named input factors with their sampling bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub names: Vec<String>,
    /// `(lower, upper)` bound of each factor.
    pub bounds: Vec<(f64, f64)>,
}

impl Problem {
    pub fn new(names: Vec<String>, bounds: Vec<(f64, f64)>) -> Result<Self> {
        let problem = Self { names, bounds };
        problem.validate()?;
        Ok(problem)
    }

    /// Air temperature, radiant temperature, air speed and relative humidity
    /// ranges explored by the SET screening.
    pub fn set_comfort() -> Self {
        Self {
            names: vec![
                "T_a".to_string(),
                "T_r".to_string(),
                "v".to_string(),
                "RH".to_string(),
            ],
            bounds: vec![(10.0, 40.0), (10.0, 40.0), (0.1, 1.0), (10.0, 90.0)],
        }
    }

    pub fn num_vars(&self) -> usize {
        self.names.len()
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.names.is_empty(), "Problem needs at least one variable");
        anyhow::ensure!(
            self.names.len() == self.bounds.len(),
            "Problem has {} names but {} bounds",
            self.names.len(),
            self.bounds.len()
        );
        for (name, &(lb, ub)) in self.names.iter().zip(&self.bounds) {
            anyhow::ensure!(
                lb.is_finite() && ub.is_finite(),
                "Bounds of {name} must be finite"
            );
            anyhow::ensure!(lb < ub, "Bounds of {name} are empty: [{lb}, {ub}]");
        }
        Ok(())
    }

    /// Maps a unit-cube coordinate of factor `j` to its bounds.
    pub fn scale(&self, j: usize, unit: f64) -> f64 {
        let (lb, ub) = self.bounds[j];
        lb + unit * (ub - lb)
    }
}

impl Default for Problem {
    fn default() -> Self {
        Self::set_comfort()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_comfort_problem() {
        let p = Problem::set_comfort();
        assert_eq!(p.num_vars(), 4);
        assert!(p.validate().is_ok());
        assert_eq!(p.scale(2, 0.0), 0.1);
        assert_eq!(p.scale(3, 1.0), 90.0);
    }

    #[test]
    fn test_invalid_problems() {
        assert!(Problem::new(vec![], vec![]).is_err());
        assert!(Problem::new(vec!["a".into()], vec![(0.0, 1.0), (0.0, 1.0)]).is_err());
        assert!(Problem::new(vec!["a".into()], vec![(1.0, 1.0)]).is_err());
        assert!(Problem::new(vec!["a".into()], vec![(0.0, f64::INFINITY)]).is_err());
    }
}
