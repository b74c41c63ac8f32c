//! Small dense linear algebra kernels shared by the analyses.
//!
//! The systems solved here are tiny (a 6×6 radiosity Jacobian, a kriging
//! correlation matrix with ~100 rows), so plain `Vec` storage is used
//! instead of a full linear algebra dependency.

pub mod cholesky;
pub mod lu;
pub mod newton;

pub use cholesky::Cholesky;
pub use lu::Lu;
pub use newton::{NewtonOptions, NewtonReport, newton_solve};
