pub mod analysis;
pub mod claim;
pub mod config;
pub mod predictions;
pub mod sample;

pub use analysis::{Analysis, AnalysisStatus};
pub use claim::*;
pub use config::{Config, PacingConfig};
