pub mod ossf_scores;

pub use ossf_scores::{ScorePayload, ScoreSink};
