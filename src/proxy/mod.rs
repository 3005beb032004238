//! HTTP server module.
//!
//! Exposes the estimator over HTTP and forwards chat queries to the
//! configured upstream completion API.

mod handlers;
mod server;
pub mod types;
pub mod upstream;

pub use server::{create_router, run_server, AppState, RequestId, WILLOW_REQUEST_ID_HEADER};
pub use types::{ChatReply, EstimateResponse, QueryRequest, SustainabilityInfo};
pub use upstream::ChatClient;
