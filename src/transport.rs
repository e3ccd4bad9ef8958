//! Remote transport collaborator interface
//!
//! The SOAP transport is not part of this crate. It is modeled as two traits,
//! one method per remote procedure, with the same credentials + account +
//! payload shape the generated service clients expose. The facades only
//! orchestrate calls against these signatures; a production implementation
//! binds them to the wire, and tests bind them to mocks.

use crate::config::Credentials;
use crate::envelope::ApiEnvelope;
use crate::types::{
    InventoryItemQuantityAndPrice, InventoryItemSubmit, OrderShipment, OrderShipmentHistory,
    ShipmentResponse, ShippingCarrier, SkuExistence,
};
use std::time::Duration;
use thiserror::Error;

/// Result type for transport calls
pub type TransportResult<T> = Result<T, TransportError>;

/// Failures signaled by the transport collaborator
#[derive(Error, Debug)]
pub enum TransportError {
    /// The endpoint could not be reached
    #[error("connection failed: {0}")]
    Connect(String),

    /// The call did not complete in time
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint throttled the call
    #[error("throttled by remote endpoint")]
    Throttled,

    /// The response could not be read as a valid envelope
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl TransportError {
    /// Check whether the failure is transient and worth retrying
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connect(_) | Self::Timeout(_) | Self::Throttled => true,
            Self::Protocol(_) => false,
        }
    }
}

/// Inventory service remote procedures
#[allow(async_fn_in_trait)]
pub trait InventoryApi {
    /// Synchronize one inventory item
    async fn sync_inventory_item(
        &self,
        credentials: &Credentials,
        account_id: &str,
        item: &InventoryItemSubmit,
    ) -> TransportResult<ApiEnvelope<bool>>;

    /// Synchronize a list of inventory items
    async fn sync_inventory_item_list(
        &self,
        credentials: &Credentials,
        account_id: &str,
        items: &[InventoryItemSubmit],
    ) -> TransportResult<ApiEnvelope<bool>>;

    /// Update quantity and price for one item
    async fn update_quantity_and_price(
        &self,
        credentials: &Credentials,
        account_id: &str,
        update: &InventoryItemQuantityAndPrice,
    ) -> TransportResult<ApiEnvelope<bool>>;

    /// Update quantity and price for a list of items
    async fn update_quantity_and_price_list(
        &self,
        credentials: &Credentials,
        account_id: &str,
        updates: &[InventoryItemQuantityAndPrice],
    ) -> TransportResult<ApiEnvelope<bool>>;

    /// Remove labels from a list of items
    async fn remove_label_list(
        &self,
        credentials: &Credentials,
        account_id: &str,
        labels: &[String],
        skus: &[String],
        reason: &str,
    ) -> TransportResult<ApiEnvelope<bool>>;

    /// Assign labels to a list of items
    async fn assign_label_list(
        &self,
        credentials: &Credentials,
        account_id: &str,
        labels: &[String],
        create_label_if_missing: bool,
        skus: &[String],
        reason: &str,
    ) -> TransportResult<ApiEnvelope<bool>>;

    /// Check whether one SKU exists in the account
    async fn does_sku_exist(
        &self,
        credentials: &Credentials,
        account_id: &str,
        sku: &str,
    ) -> TransportResult<ApiEnvelope<bool>>;

    /// Check which of the given SKUs exist in the account
    async fn do_skus_exist(
        &self,
        credentials: &Credentials,
        account_id: &str,
        skus: &[String],
    ) -> TransportResult<ApiEnvelope<Vec<SkuExistence>>>;
}

/// Shipping service remote procedures
#[allow(async_fn_in_trait)]
pub trait ShippingApi {
    /// Verify the credentials against the endpoint
    async fn ping(&self, credentials: &Credentials) -> TransportResult<ApiEnvelope<String>>;

    /// Submit a list of order shipments
    async fn submit_order_shipment_list(
        &self,
        credentials: &Credentials,
        account_id: &str,
        shipments: &[OrderShipment],
    ) -> TransportResult<ApiEnvelope<Vec<ShipmentResponse>>>;

    /// Fetch shipment history for the given order references
    async fn get_order_shipment_history_list(
        &self,
        credentials: &Credentials,
        account_id: &str,
        order_ids: &[i64],
        client_order_ids: &[String],
    ) -> TransportResult<ApiEnvelope<Vec<OrderShipmentHistory>>>;

    /// Fetch the carriers available to the account
    async fn get_shipping_carrier_list(
        &self,
        credentials: &Credentials,
        account_id: &str,
    ) -> TransportResult<ApiEnvelope<Vec<ShippingCarrier>>>;
}
