pub mod listener;
pub mod notifier;
pub mod process;
pub mod setup;

pub use listener::{BuildListener, ConsoleListener, ListenerLine, RecordingListener};
pub use notifier::{NotifyOutcome, ReviewBoardNotifier};
pub use process::{mask_command, CommandExecutor, ProcessExecutor};
pub use setup::{PlannedCommand, ReviewBoardSetup, SetupContext};

/// REVIEWBOARD_SERVER 无法解析时输出的固定消息
pub const INVALID_SERVER_URL_MESSAGE: &str = "URL provided in REVIEWBOARD_SERVER is not a valid URL.";
