//! Shipping service facade
//!
//! Order shipment submission, shipment history, carrier lookup, and
//! credential ping. Batch shipment submissions are paged by 50 and validated
//! per item: the first rejected shipment becomes the error, the rest are
//! logged.

use crate::config::ClientConfig;
use crate::envelope::check_shipment_responses;
use crate::error::{ApiResult, CallContext};
use crate::mark::Mark;
use crate::pagination::for_each_page;
use crate::retry;
use crate::services::params_json;
use crate::transport::ShippingApi;
use crate::types::{
    OrderRef, OrderShipment, OrderShipmentHistory, ShipmentContents, ShippingCarrier,
};
use std::sync::Arc;
use tracing::debug;

/// Batch limit for `submit_order_shipment_list`
const SHIPMENT_PAGE_SIZE: usize = 50;

/// Facade over the shipping remote procedures
#[derive(Debug, Clone)]
pub struct ShippingService<C> {
    client: C,
    config: Arc<ClientConfig>,
}

impl<C: ShippingApi> ShippingService<C> {
    /// Create a facade over a transport implementation
    pub fn new(client: C, config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Account the facade operates on
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.config.account_id
    }

    /// The configuration in use
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Verify the credentials against the endpoint
    pub async fn ping(&self, mark: Option<Mark>) -> ApiResult<()> {
        let mark = mark.unwrap_or_default();
        debug!(mark = %mark, account = %self.config.account_id, "ping started");

        retry::run(&self.config.query_retry, "ping", &mark, || async move {
            self.client
                .ping(&self.config.credentials)
                .await?
                .ensure_success()
        })
        .await
        .map_err(|e| {
            e.with_context(CallContext::new("ping", &self.config.account_id, mark.clone()))
        })?;

        debug!(mark = %mark, "ping finished");
        Ok(())
    }

    /// Notify the endpoint that one order shipped.
    ///
    /// On failure the error context carries the order reference, carrier
    /// code, and tracking number alongside the account and mark.
    pub async fn mark_order_shipped(
        &self,
        order: OrderRef,
        contents: ShipmentContents,
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        let mark = mark.unwrap_or_default();
        let keys = vec![
            order.to_string(),
            contents.carrier_code().to_string(),
            contents.tracking_number().to_string(),
        ];
        debug!(
            mark = %mark,
            account = %self.config.account_id,
            order = %order,
            carrier = contents.carrier_code(),
            tracking = contents.tracking_number(),
            "mark_order_shipped started"
        );

        let shipments = [OrderShipment { order, contents }];
        self.submit_page(&shipments, "mark_order_shipped", &mark)
            .await
            .map_err(|e| {
                e.with_context(
                    CallContext::new("mark_order_shipped", &self.config.account_id, mark.clone())
                        .with_keys(keys),
                )
            })?;

        debug!(mark = %mark, "mark_order_shipped finished");
        Ok(())
    }

    /// Submit a list of order shipments in pages of 50
    pub async fn submit_order_shipment_list(
        &self,
        shipments: &[OrderShipment],
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        let mark = mark.unwrap_or_default();
        debug!(
            mark = %mark,
            account = %self.config.account_id,
            shipment_count = shipments.len(),
            "submit_order_shipment_list started"
        );

        let mark_ref = &mark;
        for_each_page(shipments.to_vec(), SHIPMENT_PAGE_SIZE, |page| async move {
            self.submit_page(&page, "submit_order_shipment_list", mark_ref)
                .await
        })
        .await
        .map_err(|e| {
            e.with_context(CallContext::new(
                "submit_order_shipment_list",
                &self.config.account_id,
                mark.clone(),
            ))
        })?;

        debug!(mark = %mark, "submit_order_shipment_list finished");
        Ok(())
    }

    /// Submit one page of shipments under the retry executor and validate the
    /// per-item results.
    async fn submit_page(
        &self,
        page: &[OrderShipment],
        operation: &'static str,
        mark: &Mark,
    ) -> ApiResult<()> {
        retry::run(&self.config.submit_retry, operation, mark, || async move {
            let envelope = self
                .client
                .submit_order_shipment_list(&self.config.credentials, &self.config.account_id, page)
                .await?;
            let responses = envelope.into_data()?;
            check_shipment_responses(&responses)
        })
        .await
    }

    /// Fetch shipment history for the given order ids and/or client order ids
    pub async fn get_order_shipment_history(
        &self,
        order_ids: &[i64],
        client_order_ids: &[String],
        mark: Option<Mark>,
    ) -> ApiResult<Vec<OrderShipmentHistory>> {
        let mark = mark.unwrap_or_default();
        debug!(
            mark = %mark,
            account = %self.config.account_id,
            params = %params_json(&(order_ids, client_order_ids)),
            "get_order_shipment_history started"
        );

        let history = retry::run(
            &self.config.submit_retry,
            "get_order_shipment_history",
            &mark,
            || async move {
                self.client
                    .get_order_shipment_history_list(
                        &self.config.credentials,
                        &self.config.account_id,
                        order_ids,
                        client_order_ids,
                    )
                    .await?
                    .into_data()
            },
        )
        .await
        .map_err(|e| {
            e.with_context(CallContext::new(
                "get_order_shipment_history",
                &self.config.account_id,
                mark.clone(),
            ))
        })?;

        debug!(mark = %mark, result_count = history.len(), "get_order_shipment_history finished");
        Ok(history)
    }

    /// Fetch shipment history by ChannelAdvisor order ids
    pub async fn get_order_shipment_history_by_order_ids(
        &self,
        order_ids: &[i64],
        mark: Option<Mark>,
    ) -> ApiResult<Vec<OrderShipmentHistory>> {
        self.get_order_shipment_history(order_ids, &[], mark).await
    }

    /// Fetch shipment history by client order identifiers
    pub async fn get_order_shipment_history_by_client_order_ids(
        &self,
        client_order_ids: &[String],
        mark: Option<Mark>,
    ) -> ApiResult<Vec<OrderShipmentHistory>> {
        self.get_order_shipment_history(&[], client_order_ids, mark)
            .await
    }

    /// Fetch the carriers available to the account
    pub async fn get_shipping_carrier_list(
        &self,
        mark: Option<Mark>,
    ) -> ApiResult<Vec<ShippingCarrier>> {
        let mark = mark.unwrap_or_default();
        debug!(mark = %mark, account = %self.config.account_id, "get_shipping_carrier_list started");

        let carriers = retry::run(
            &self.config.query_retry,
            "get_shipping_carrier_list",
            &mark,
            || async move {
                self.client
                    .get_shipping_carrier_list(&self.config.credentials, &self.config.account_id)
                    .await?
                    .into_data()
            },
        )
        .await
        .map_err(|e| {
            e.with_context(CallContext::new(
                "get_shipping_carrier_list",
                &self.config.account_id,
                mark.clone(),
            ))
        })?;

        debug!(mark = %mark, result_count = carriers.len(), "get_shipping_carrier_list finished");
        Ok(carriers)
    }
}
