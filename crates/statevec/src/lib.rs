pub mod density;
pub mod error;
pub mod linalg;
pub mod state;

pub use density::DensityMatrix;
pub use error::{Result, StateError};
pub use state::{StateVector, C64};
