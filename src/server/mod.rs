pub mod configuration;
pub mod registry;
pub mod store;

pub use configuration::{validate_server_url, ServerConfiguration, UNKNOWN_API_TOKEN};
pub use registry::ServerRegistry;
pub use store::{ConfigurationStore, MemoryConfigurationStore, TomlConfigurationStore};
