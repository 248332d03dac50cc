pub mod common;
pub mod completions;
pub mod export;
pub mod pull;
pub mod sync_groups;
pub mod tags;
