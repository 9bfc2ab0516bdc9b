pub mod candidate;
pub mod feed;
pub mod odds;

pub use candidate::{BankrollState, BetCandidate};
pub use feed::{CandidateFeed, FeedSource};
