pub mod rank;
pub mod stats;
