//! Typed client for the ChannelAdvisor marketplace SOAP API
//!
//! This crate wraps the ChannelAdvisor Items (inventory synchronization) and
//! Shipping (shipment notification, carrier lookup) services behind two flat
//! facades. The transport itself is a collaborator: implement
//! [`transport::InventoryApi`] / [`transport::ShippingApi`] over your SOAP
//! layer and hand the implementation to a facade.
//!
//! # Features
//!
//! - **Retry with exponential backoff**: transient transport failures are
//!   retried under an explicitly injected [`retry::RetryPolicy`]
//! - **Interleaved batch paging**: list operations are split to each remote
//!   procedure's batch limit, submitted strictly in order, one page at a time
//! - **Status validation**: every response envelope is checked before any
//!   payload is returned; batch responses are validated per item
//! - **Typed errors**: each failed operation surfaces exactly one
//!   [`error::ApiError`] carrying the operation name, account, correlation
//!   mark, and affected keys
//! - **Request correlation**: operations accept or generate a [`mark::Mark`]
//!   that keys every log entry of the call
//!
//! # Example
//!
//! ```rust,no_run
//! use channeladvisor_access::prelude::*;
//!
//! # async fn demo(transport: impl InventoryApi) -> ApiResult<()> {
//! let config = ClientConfig::from_env()?;
//! let items = ItemsService::new(transport, config)?;
//!
//! let update = InventoryItemQuantityAndPrice::new("SKU-1")
//!     .with_quantity(25, QuantityUpdateType::Available)
//!     .with_price(19.99);
//! items.update_quantity_and_price(&update, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Callers without an async runtime can use the [`blocking`] facades, which
//! drive the same core on a private runtime.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blocking;
pub mod config;
pub mod envelope;
pub mod error;
pub mod mark;
pub mod pagination;
pub mod retry;
pub mod services;
pub mod transport;
pub mod types;

pub use config::{ClientConfig, Credentials};
pub use error::{ApiError, ApiResult};
pub use mark::Mark;
pub use services::{ItemsService, ShippingService};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ClientConfig, Credentials};
    pub use crate::envelope::{ApiEnvelope, ResultStatus};
    pub use crate::error::{ApiError, ApiResult, CallContext};
    pub use crate::mark::Mark;
    pub use crate::retry::RetryPolicy;
    pub use crate::services::{ItemsService, ShippingService};
    pub use crate::transport::{InventoryApi, ShippingApi, TransportError};
    pub use crate::types::{
        FullShipment, InventoryItemQuantityAndPrice, InventoryItemSubmit, OrderRef, OrderShipment,
        OrderShipmentHistory, PartialShipment, QuantityUpdateType, ShipmentContents,
        ShipmentLineItem, ShipmentResponse, ShippingCarrier, SkuExistence, SyncOutcome,
    };
}
