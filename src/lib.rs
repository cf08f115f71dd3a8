// Core modules
pub mod credentials;
pub mod infrastructure;
pub mod notification;
pub mod review;
pub mod server;
pub mod steps;

// Host adapter
pub mod cli;
pub mod commands;
pub mod config;

pub use infrastructure::error::ReviewBoardError;
pub use notification::{BuildResult, StatusSyncClient, StatusUpdate, StatusUpdateSender};
pub use review::{BuildParameters, ReviewRequest, StatusUpdateState};
pub use server::{ServerConfiguration, ServerRegistry};
