pub mod error;
pub mod logging;
pub mod network;

pub use error::ReviewBoardError;
pub use logging::{setup_logging, LoggingConfig};
pub use network::NetworkConfig;
