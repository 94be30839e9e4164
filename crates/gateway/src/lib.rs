pub mod builder;
pub mod error;
pub mod gateway;
pub mod metrics;
pub mod reconcile;
pub mod upload;

pub use builder::GatewayBuilder;
pub use error::GatewayError;
pub use gateway::Gateway;
pub use metrics::{GatewayMetrics, MetricsSnapshot};
pub use reconcile::{VlogResolution, video_reference};
pub use upload::VideoUpload;
