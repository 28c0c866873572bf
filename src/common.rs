pub mod error;
pub mod pricing;
