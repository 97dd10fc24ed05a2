//! Custom request extractors.

mod request_json;

pub use request_json::RequestJson;
