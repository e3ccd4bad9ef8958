//! Blocking facades
//!
//! Mirrors of the async services for callers without an async runtime. Each
//! blocking service owns a private current-thread tokio runtime and drives
//! the one async core through it, so the retry, paging, and validation
//! behavior is identical in both variants. The calling thread blocks for the
//! duration of each operation.

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::mark::Mark;
use crate::services;
use crate::transport::{InventoryApi, ShippingApi};
use crate::types::{
    InventoryItemQuantityAndPrice, InventoryItemSubmit, OrderRef, OrderShipment,
    OrderShipmentHistory, ShipmentContents, ShippingCarrier, SkuExistence, SyncOutcome,
};
use tokio::runtime::Runtime;

fn new_runtime() -> ApiResult<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| ApiError::Runtime(e.to_string()))
}

/// Blocking facade over the inventory remote procedures
#[derive(Debug)]
pub struct ItemsService<C> {
    inner: services::ItemsService<C>,
    runtime: Runtime,
}

impl<C: InventoryApi> ItemsService<C> {
    /// Create a blocking facade over a transport implementation
    pub fn new(client: C, config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            inner: services::ItemsService::new(client, config)?,
            runtime: new_runtime()?,
        })
    }

    /// Account the facade operates on
    #[must_use]
    pub fn account_id(&self) -> &str {
        self.inner.account_id()
    }

    /// Synchronize one inventory item
    pub fn sync_item(
        &self,
        item: &InventoryItemSubmit,
        create_new: bool,
        mark: Option<Mark>,
    ) -> ApiResult<SyncOutcome> {
        self.runtime
            .block_on(self.inner.sync_item(item, create_new, mark))
    }

    /// Synchronize a list of inventory items in pages of 100
    pub fn sync_items(
        &self,
        items: &[InventoryItemSubmit],
        create_new: bool,
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        self.runtime
            .block_on(self.inner.sync_items(items, create_new, mark))
    }

    /// Update quantity and price for one item
    pub fn update_quantity_and_price(
        &self,
        update: &InventoryItemQuantityAndPrice,
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        self.runtime
            .block_on(self.inner.update_quantity_and_price(update, mark))
    }

    /// Update quantity and price for a list of items in pages of 5000
    pub fn update_quantity_and_prices(
        &self,
        updates: &[InventoryItemQuantityAndPrice],
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        self.runtime
            .block_on(self.inner.update_quantity_and_prices(updates, mark))
    }

    /// Remove labels from a list of items, paging SKUs by 500
    pub fn remove_label_list_from_item_list(
        &self,
        labels: &[String],
        skus: &[String],
        reason: &str,
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        self.runtime.block_on(
            self.inner
                .remove_label_list_from_item_list(labels, skus, reason, mark),
        )
    }

    /// Assign labels to a list of items, paging SKUs by 500
    pub fn assign_label_list_to_item_list(
        &self,
        labels: &[String],
        create_label_if_missing: bool,
        skus: &[String],
        reason: &str,
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        self.runtime.block_on(self.inner.assign_label_list_to_item_list(
            labels,
            create_label_if_missing,
            skus,
            reason,
            mark,
        ))
    }

    /// Check whether one SKU exists in the account
    pub fn does_sku_exist(&self, sku: &str, mark: Option<Mark>) -> ApiResult<bool> {
        self.runtime.block_on(self.inner.does_sku_exist(sku, mark))
    }

    /// Check which of the given SKUs exist in the account
    pub fn do_skus_exist(
        &self,
        skus: &[String],
        mark: Option<Mark>,
    ) -> ApiResult<Vec<SkuExistence>> {
        self.runtime.block_on(self.inner.do_skus_exist(skus, mark))
    }
}

/// Blocking facade over the shipping remote procedures
#[derive(Debug)]
pub struct ShippingService<C> {
    inner: services::ShippingService<C>,
    runtime: Runtime,
}

impl<C: ShippingApi> ShippingService<C> {
    /// Create a blocking facade over a transport implementation
    pub fn new(client: C, config: ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            inner: services::ShippingService::new(client, config)?,
            runtime: new_runtime()?,
        })
    }

    /// Account the facade operates on
    #[must_use]
    pub fn account_id(&self) -> &str {
        self.inner.account_id()
    }

    /// Verify the credentials against the endpoint
    pub fn ping(&self, mark: Option<Mark>) -> ApiResult<()> {
        self.runtime.block_on(self.inner.ping(mark))
    }

    /// Notify the endpoint that one order shipped
    pub fn mark_order_shipped(
        &self,
        order: OrderRef,
        contents: ShipmentContents,
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        self.runtime
            .block_on(self.inner.mark_order_shipped(order, contents, mark))
    }

    /// Submit a list of order shipments in pages of 50
    pub fn submit_order_shipment_list(
        &self,
        shipments: &[OrderShipment],
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        self.runtime
            .block_on(self.inner.submit_order_shipment_list(shipments, mark))
    }

    /// Fetch shipment history for the given order ids and/or client order ids
    pub fn get_order_shipment_history(
        &self,
        order_ids: &[i64],
        client_order_ids: &[String],
        mark: Option<Mark>,
    ) -> ApiResult<Vec<OrderShipmentHistory>> {
        self.runtime.block_on(
            self.inner
                .get_order_shipment_history(order_ids, client_order_ids, mark),
        )
    }

    /// Fetch shipment history by ChannelAdvisor order ids
    pub fn get_order_shipment_history_by_order_ids(
        &self,
        order_ids: &[i64],
        mark: Option<Mark>,
    ) -> ApiResult<Vec<OrderShipmentHistory>> {
        self.runtime.block_on(
            self.inner
                .get_order_shipment_history_by_order_ids(order_ids, mark),
        )
    }

    /// Fetch shipment history by client order identifiers
    pub fn get_order_shipment_history_by_client_order_ids(
        &self,
        client_order_ids: &[String],
        mark: Option<Mark>,
    ) -> ApiResult<Vec<OrderShipmentHistory>> {
        self.runtime.block_on(
            self.inner
                .get_order_shipment_history_by_client_order_ids(client_order_ids, mark),
        )
    }

    /// Fetch the carriers available to the account
    pub fn get_shipping_carrier_list(&self, mark: Option<Mark>) -> ApiResult<Vec<ShippingCarrier>> {
        self.runtime
            .block_on(self.inner.get_shipping_carrier_list(mark))
    }
}
