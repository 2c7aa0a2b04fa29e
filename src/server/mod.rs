//! HTTP surface for the three prediction pipelines.
//!
//! # API Endpoints
//!
//! - `GET /` - Welcome message
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with loaded model names
//! - `GET /metrics` - Prometheus metrics (when enabled)
//! - `POST /predict` - Multipart image upload → food class
//! - `POST /predict_sentiment` - `{"text": ...}` → review sentiment
//! - `POST /recommend_food` - `{"text": ...}` → suggested dish
//!
//! Every pipeline failure comes back as a 400 with the error message in
//! `detail`; the process keeps serving.

pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, init_tracing, serve};
pub use state::ServerState;

#[cfg(feature = "onnx")]
pub use router::start_server;
