pub mod client;
pub mod outcome;

pub use client::{interpret_status, StatusSyncClient, StatusUpdate, StatusUpdateSender};
pub use outcome::{classify, BuildOutcome, BuildResult};
