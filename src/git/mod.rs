mod repo;

pub use repo::{GitRepo, HistorySource, LogOutput};
