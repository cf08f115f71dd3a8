pub mod parameters;
pub mod request;

pub use parameters::{parse_review_request_from_parameters, parse_server_url, BuildParameters};
pub use request::{ReviewRequest, StatusUpdateState, StatusUpdateTarget};
