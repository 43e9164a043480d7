pub mod bfhl;
pub mod envelope;

pub use bfhl::{BfhlData, BfhlRequest, FibonacciSeries, Operation};
pub use envelope::ApiResponse;
