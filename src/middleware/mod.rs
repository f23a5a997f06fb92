pub mod metrics;
pub mod response;

pub use metrics::track_requests;
pub use response::{envelope_data, ApiResponse, ApiResult};
