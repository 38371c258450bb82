pub mod analysis;
pub mod campaign;
pub mod severity;
pub mod timestamp;

pub use analysis::{Analysis, AnalysisWithRecommendations, Recommendation};
pub use campaign::Campaign;
pub use severity::{Severity, SeverityColor};
