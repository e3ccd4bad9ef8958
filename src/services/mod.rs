//! Service facades
//!
//! One flat facade per remote service. Every public operation follows the
//! same sequence: resolve the correlation mark, log the call start, run the
//! (optionally paged) remote call through the retry executor, validate the
//! response envelope, and wrap any failure with full call context before it
//! reaches the caller.

pub mod items;
pub mod shipping;

pub use items::ItemsService;
pub use shipping::ShippingService;

use serde::Serialize;

/// Render method parameters as JSON for trace logs.
pub(crate) fn params_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unserializable>".to_string())
}
