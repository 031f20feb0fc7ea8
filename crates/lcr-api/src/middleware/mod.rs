pub mod cors;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use cors::create_cors_layer;
pub use rate_limit::apply_rate_limit;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::apply_security_headers;
