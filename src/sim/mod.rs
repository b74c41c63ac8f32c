pub mod comfort;
pub mod evaluate;
pub mod linalg;
pub mod radiosity;
pub mod sensitivity;
pub mod spectral;
pub mod surrogate;
