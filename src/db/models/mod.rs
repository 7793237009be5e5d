pub mod analysis;

pub use analysis::StoredAnalysis;
