pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod git;
pub mod history;
pub mod language;
pub mod logging;
pub mod model;
pub mod parse;
pub mod render;
pub mod report;
pub mod show;
pub mod update;
pub mod util;
pub mod window;
