pub mod logger;
pub mod report;

pub use logger::{Logger, ScoreLog};
pub use report::render_ranking;
