pub mod config;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod impact;
pub mod model;
pub mod player_stats;
pub mod slots;
pub mod standings;
pub mod stat_rank;
pub mod store;
pub mod vote_tally;
