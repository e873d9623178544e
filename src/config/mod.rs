//! Configuration: where data lives and the user's preferences

pub mod paths;
pub mod settings;

pub use paths::PocketPaths;
pub use settings::{ScanSettings, Settings};
