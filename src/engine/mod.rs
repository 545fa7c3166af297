pub mod cache;
pub mod flags;
pub mod scheduler;
pub mod tracker;

pub use cache::{FRESHNESS_WINDOW, ViewCache};
pub use flags::FlaggedKeys;
pub use scheduler::{GLOBAL_REFRESH_INTERVAL, PollingScheduler, Tick};
pub use tracker::NewIssueTracker;
