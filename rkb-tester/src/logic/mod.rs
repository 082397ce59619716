pub mod reports;
pub mod runner;

pub use runner::*;
