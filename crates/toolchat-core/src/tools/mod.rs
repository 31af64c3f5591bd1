//! Tool server client
//!
//! ```text
//! ┌──────────────────────┐   GET /                       ┌──────────────┐
//! │  ToolOrchestrator    │ ───────────────────────────▶ │              │
//! │                      │   GET /{server}/tools         │ tool server  │
//! │  dyn ToolClient      │ ───────────────────────────▶ │ (weather,    │
//! │   └ HttpToolClient   │   GET /{server}/call/{tool}   │  calendar,   │
//! │                      │ ───────────────────────────▶ │  maps, ...)  │
//! └──────────────────────┘        ?key=value             └──────────────┘
//! ```

mod traits;
mod http;

pub use traits::{ToolClient, ToolClientError, ToolClientResult};
pub use http::{normalize_base_url, HttpToolClient};
