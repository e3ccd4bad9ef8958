//! Items service facade
//!
//! Inventory update operations: item synchronization, quantity/price updates,
//! and label assignment/removal. List operations are paged to the practical
//! batch limit of each remote procedure before submission.

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, CallContext};
use crate::mark::Mark;
use crate::pagination::for_each_page;
use crate::retry;
use crate::services::params_json;
use crate::transport::InventoryApi;
use crate::types::{InventoryItemQuantityAndPrice, InventoryItemSubmit, SkuExistence, SyncOutcome};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Batch limit for `sync_inventory_item_list`
const SYNC_ITEMS_PAGE_SIZE: usize = 100;
/// Batch limit for `update_quantity_and_price_list`
const QUANTITY_PRICE_PAGE_SIZE: usize = 5000;
/// Batch limit for label assignment/removal SKU lists
const LABEL_SKUS_PAGE_SIZE: usize = 500;
/// The endpoint accepts at most this many labels in one call
const MAX_LABELS_PER_CALL: usize = 3;

/// Facade over the inventory remote procedures
#[derive(Debug, Clone)]
pub struct ItemsService<C> {
    client: C,
    config: Arc<ClientConfig>,
}

impl<C: InventoryApi> ItemsService<C> {
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

    // -------------------------------------------------------------------------
    // Item synchronization
    // -------------------------------------------------------------------------

    /// Synchronize one inventory item.
    ///
    /// Unless `create_new` is set, the SKU is first checked for existence and
    /// the call returns [`SyncOutcome::Skipped`] without submitting anything
    /// when it is absent.
    pub async fn sync_item(
        &self,
        item: &InventoryItemSubmit,
        create_new: bool,
        mark: Option<Mark>,
    ) -> ApiResult<SyncOutcome> {
        let mark = mark.unwrap_or_default();
        debug!(
            mark = %mark,
            account = %self.config.account_id,
            create_new,
            params = %params_json(item),
            "sync_item started"
        );

        let outcome = retry::run(&self.config.submit_retry, "sync_item", &mark, || async move {
            if !create_new {
                let exists = self
                    .client
                    .does_sku_exist(&self.config.credentials, &self.config.account_id, &item.sku)
                    .await?
                    .into_data()?;
                if !exists {
                    return Ok(SyncOutcome::Skipped);
                }
            }
            self.client
                .sync_inventory_item(&self.config.credentials, &self.config.account_id, item)
                .await?
                .ensure_success()?;
            Ok(if create_new {
                SyncOutcome::Created
            } else {
                SyncOutcome::Updated
            })
        })
        .await
        .map_err(|e| {
            e.with_context(
                CallContext::new("sync_item", &self.config.account_id, mark.clone())
                    .with_keys(vec![item.sku.clone()]),
            )
        })?;

        debug!(mark = %mark, outcome = ?outcome, "sync_item finished");
        Ok(outcome)
    }

    /// Synchronize a list of inventory items in pages of 100.
    ///
    /// Unless `create_new` is set, the input is first narrowed to SKUs that
    /// exist in the account; absent SKUs are dropped without error.
    pub async fn sync_items(
        &self,
        items: &[InventoryItemSubmit],
        create_new: bool,
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        let mark = mark.unwrap_or_default();
        debug!(
            mark = %mark,
            account = %self.config.account_id,
            create_new,
            item_count = items.len(),
            "sync_items started"
        );

        let result = self.sync_items_inner(items, create_new, &mark).await;
        result.map_err(|e| {
            e.with_context(CallContext::new(
                "sync_items",
                &self.config.account_id,
                mark.clone(),
            ))
        })?;

        debug!(mark = %mark, "sync_items finished");
        Ok(())
    }

    async fn sync_items_inner(
        &self,
        items: &[InventoryItemSubmit],
        create_new: bool,
        mark: &Mark,
    ) -> ApiResult<()> {
        let selected: Vec<InventoryItemSubmit> = if create_new {
            items.to_vec()
        } else {
            let skus: Vec<String> = items.iter().map(|i| i.sku.clone()).collect();
            let existence = self.do_skus_exist_inner(&skus, mark).await?;
            let existing: HashSet<&str> = existence
                .iter()
                .filter(|e| e.exists)
                .map(|e| e.sku.as_str())
                .collect();
            items
                .iter()
                .filter(|i| existing.contains(i.sku.as_str()))
                .cloned()
                .collect()
        };

        for_each_page(selected, SYNC_ITEMS_PAGE_SIZE, |page| async move {
            retry::run(&self.config.submit_retry, "sync_items", mark, || {
                let page = &page;
                async move {
                    self.client
                        .sync_inventory_item_list(
                            &self.config.credentials,
                            &self.config.account_id,
                            page,
                        )
                        .await?
                        .ensure_success()
                }
            })
            .await
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Quantity and price updates
    // -------------------------------------------------------------------------

    /// Update quantity and price for one item
    pub async fn update_quantity_and_price(
        &self,
        update: &InventoryItemQuantityAndPrice,
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        let mark = mark.unwrap_or_default();
        debug!(
            mark = %mark,
            account = %self.config.account_id,
            params = %params_json(update),
            "update_quantity_and_price started"
        );

        retry::run(
            &self.config.submit_retry,
            "update_quantity_and_price",
            &mark,
            || async move {
                self.client
                    .update_quantity_and_price(
                        &self.config.credentials,
                        &self.config.account_id,
                        update,
                    )
                    .await?
                    .ensure_success()
            },
        )
        .await
        .map_err(|e| {
            e.with_context(
                CallContext::new(
                    "update_quantity_and_price",
                    &self.config.account_id,
                    mark.clone(),
                )
                .with_keys(vec![update.sku.clone()]),
            )
        })?;

        debug!(mark = %mark, "update_quantity_and_price finished");
        Ok(())
    }

    /// Update quantity and price for a list of items in pages of 5000
    pub async fn update_quantity_and_prices(
        &self,
        updates: &[InventoryItemQuantityAndPrice],
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        let mark = mark.unwrap_or_default();
        debug!(
            mark = %mark,
            account = %self.config.account_id,
            item_count = updates.len(),
            "update_quantity_and_prices started"
        );

        let mark_ref = &mark;
        for_each_page(
            updates.to_vec(),
            QUANTITY_PRICE_PAGE_SIZE,
            |page| async move {
                retry::run(
                    &self.config.submit_retry,
                    "update_quantity_and_prices",
                    mark_ref,
                    || {
                        let page = &page;
                        async move {
                            self.client
                                .update_quantity_and_price_list(
                                    &self.config.credentials,
                                    &self.config.account_id,
                                    page,
                                )
                                .await?
                                .ensure_success()
                        }
                    },
                )
                .await
            },
        )
        .await
        .map_err(|e| {
            e.with_context(CallContext::new(
                "update_quantity_and_prices",
                &self.config.account_id,
                mark.clone(),
            ))
        })?;

        debug!(mark = %mark, "update_quantity_and_prices finished");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Labels
    // -------------------------------------------------------------------------

    /// Remove labels from a list of items, paging SKUs by 500.
    ///
    /// At most three labels may be removed in one call; more is a
    /// precondition failure raised before any remote call.
    pub async fn remove_label_list_from_item_list(
        &self,
        labels: &[String],
        skus: &[String],
        reason: &str,
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        let mark = mark.unwrap_or_default();
        let ctx = || {
            CallContext::new(
                "remove_label_list_from_item_list",
                &self.config.account_id,
                mark.clone(),
            )
            .with_keys(labels.to_vec())
        };
        check_label_count(labels).map_err(|e| e.with_context(ctx()))?;

        debug!(
            mark = %mark,
            account = %self.config.account_id,
            labels = %params_json(&labels),
            sku_count = skus.len(),
            reason,
            "remove_label_list_from_item_list started"
        );

        let mark_ref = &mark;
        for_each_page(skus.to_vec(), LABEL_SKUS_PAGE_SIZE, |page| async move {
            retry::run(
                &self.config.submit_retry,
                "remove_label_list_from_item_list",
                mark_ref,
                || {
                    let page = &page;
                    async move {
                        self.client
                            .remove_label_list(
                                &self.config.credentials,
                                &self.config.account_id,
                                labels,
                                page,
                                reason,
                            )
                            .await?
                            .ensure_success()
                    }
                },
            )
            .await
        })
        .await
        .map_err(|e| e.with_context(ctx()))?;

        debug!(mark = %mark, "remove_label_list_from_item_list finished");
        Ok(())
    }

    /// Assign labels to a list of items, paging SKUs by 500.
    ///
    /// At most three labels may be assigned in one call; more is a
    /// precondition failure raised before any remote call.
    pub async fn assign_label_list_to_item_list(
        &self,
        labels: &[String],
        create_label_if_missing: bool,
        skus: &[String],
        reason: &str,
        mark: Option<Mark>,
    ) -> ApiResult<()> {
        let mark = mark.unwrap_or_default();
        let ctx = || {
            CallContext::new(
                "assign_label_list_to_item_list",
                &self.config.account_id,
                mark.clone(),
            )
            .with_keys(labels.to_vec())
        };
        check_label_count(labels).map_err(|e| e.with_context(ctx()))?;

        debug!(
            mark = %mark,
            account = %self.config.account_id,
            labels = %params_json(&labels),
            create_label_if_missing,
            sku_count = skus.len(),
            reason,
            "assign_label_list_to_item_list started"
        );

        let mark_ref = &mark;
        for_each_page(skus.to_vec(), LABEL_SKUS_PAGE_SIZE, |page| async move {
            retry::run(
                &self.config.submit_retry,
                "assign_label_list_to_item_list",
                mark_ref,
                || {
                    let page = &page;
                    async move {
                        self.client
                            .assign_label_list(
                                &self.config.credentials,
                                &self.config.account_id,
                                labels,
                                create_label_if_missing,
                                page,
                                reason,
                            )
                            .await?
                            .ensure_success()
                    }
                },
            )
            .await
        })
        .await
        .map_err(|e| e.with_context(ctx()))?;

        debug!(mark = %mark, "assign_label_list_to_item_list finished");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // SKU existence
    // -------------------------------------------------------------------------

    /// Check whether one SKU exists in the account
    pub async fn does_sku_exist(&self, sku: &str, mark: Option<Mark>) -> ApiResult<bool> {
        let mark = mark.unwrap_or_default();
        debug!(mark = %mark, account = %self.config.account_id, sku, "does_sku_exist started");

        let exists = retry::run(&self.config.query_retry, "does_sku_exist", &mark, || {
            async move {
                self.client
                    .does_sku_exist(&self.config.credentials, &self.config.account_id, sku)
                    .await?
                    .into_data()
            }
        })
        .await
        .map_err(|e| {
            e.with_context(
                CallContext::new("does_sku_exist", &self.config.account_id, mark.clone())
                    .with_keys(vec![sku.to_string()]),
            )
        })?;

        debug!(mark = %mark, exists, "does_sku_exist finished");
        Ok(exists)
    }

    /// Check which of the given SKUs exist in the account
    pub async fn do_skus_exist(
        &self,
        skus: &[String],
        mark: Option<Mark>,
    ) -> ApiResult<Vec<SkuExistence>> {
        let mark = mark.unwrap_or_default();
        debug!(
            mark = %mark,
            account = %self.config.account_id,
            sku_count = skus.len(),
            "do_skus_exist started"
        );

        let existence = self.do_skus_exist_inner(skus, &mark).await.map_err(|e| {
            e.with_context(CallContext::new(
                "do_skus_exist",
                &self.config.account_id,
                mark.clone(),
            ))
        })?;

        debug!(mark = %mark, result_count = existence.len(), "do_skus_exist finished");
        Ok(existence)
    }

    async fn do_skus_exist_inner(
        &self,
        skus: &[String],
        mark: &Mark,
    ) -> ApiResult<Vec<SkuExistence>> {
        retry::run(&self.config.query_retry, "do_skus_exist", mark, || {
            async move {
                self.client
                    .do_skus_exist(&self.config.credentials, &self.config.account_id, skus)
                    .await?
                    .into_data()
            }
        })
        .await
    }
}

fn check_label_count(labels: &[String]) -> ApiResult<()> {
    if labels.len() > MAX_LABELS_PER_CALL {
        return Err(ApiError::precondition(format!(
            "only up to {MAX_LABELS_PER_CALL} labels allowed per call, got {}",
            labels.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::envelope::ApiEnvelope;
    use crate::retry::RetryPolicy;
    use crate::transport::{TransportError, TransportResult};
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    #[derive(Default)]
    struct MockInventory {
        /// SKUs that exist in the account
        existing: Vec<String>,
        /// Transient failures to report before list calls start succeeding
        transient_failures: Cell<u32>,
        /// Page sizes seen by list calls, in order
        list_pages: RefCell<Vec<usize>>,
        /// First SKU of each list page, in order
        first_skus: RefCell<Vec<String>>,
        sync_item_calls: Cell<u32>,
        existence_calls: Cell<u32>,
        label_calls: Cell<u32>,
    }

    impl MockInventory {
        fn with_existing(skus: &[&str]) -> Self {
            Self {
                existing: skus.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }

        fn take_transient(&self) -> Option<TransportError> {
            let remaining = self.transient_failures.get();
            if remaining > 0 {
                self.transient_failures.set(remaining - 1);
                Some(TransportError::Timeout(Duration::from_millis(1)))
            } else {
                None
            }
        }
    }

    impl InventoryApi for MockInventory {
        async fn sync_inventory_item(
            &self,
            _credentials: &Credentials,
            _account_id: &str,
            _item: &InventoryItemSubmit,
        ) -> TransportResult<ApiEnvelope<bool>> {
            self.sync_item_calls.set(self.sync_item_calls.get() + 1);
            Ok(ApiEnvelope::success(true))
        }

        async fn sync_inventory_item_list(
            &self,
            _credentials: &Credentials,
            _account_id: &str,
            items: &[InventoryItemSubmit],
        ) -> TransportResult<ApiEnvelope<bool>> {
            if let Some(err) = self.take_transient() {
                return Err(err);
            }
            self.list_pages.borrow_mut().push(items.len());
            if let Some(first) = items.first() {
                self.first_skus.borrow_mut().push(first.sku.clone());
            }
            Ok(ApiEnvelope::success(true))
        }

        async fn update_quantity_and_price(
            &self,
            _credentials: &Credentials,
            _account_id: &str,
            _update: &InventoryItemQuantityAndPrice,
        ) -> TransportResult<ApiEnvelope<bool>> {
            if let Some(err) = self.take_transient() {
                return Err(err);
            }
            self.list_pages.borrow_mut().push(1);
            Ok(ApiEnvelope::success(true))
        }

        async fn update_quantity_and_price_list(
            &self,
            _credentials: &Credentials,
            _account_id: &str,
            updates: &[InventoryItemQuantityAndPrice],
        ) -> TransportResult<ApiEnvelope<bool>> {
            if let Some(err) = self.take_transient() {
                return Err(err);
            }
            self.list_pages.borrow_mut().push(updates.len());
            if let Some(first) = updates.first() {
                self.first_skus.borrow_mut().push(first.sku.clone());
            }
            Ok(ApiEnvelope::success(true))
        }

        async fn remove_label_list(
            &self,
            _credentials: &Credentials,
            _account_id: &str,
            _labels: &[String],
            skus: &[String],
            _reason: &str,
        ) -> TransportResult<ApiEnvelope<bool>> {
            self.label_calls.set(self.label_calls.get() + 1);
            self.list_pages.borrow_mut().push(skus.len());
            Ok(ApiEnvelope::success(true))
        }

        async fn assign_label_list(
            &self,
            _credentials: &Credentials,
            _account_id: &str,
            _labels: &[String],
            _create_label_if_missing: bool,
            skus: &[String],
            _reason: &str,
        ) -> TransportResult<ApiEnvelope<bool>> {
            self.label_calls.set(self.label_calls.get() + 1);
            self.list_pages.borrow_mut().push(skus.len());
            Ok(ApiEnvelope::success(true))
        }

        async fn does_sku_exist(
            &self,
            _credentials: &Credentials,
            _account_id: &str,
            sku: &str,
        ) -> TransportResult<ApiEnvelope<bool>> {
            self.existence_calls.set(self.existence_calls.get() + 1);
            Ok(ApiEnvelope::success(self.existing.iter().any(|s| s == sku)))
        }

        async fn do_skus_exist(
            &self,
            _credentials: &Credentials,
            _account_id: &str,
            skus: &[String],
        ) -> TransportResult<ApiEnvelope<Vec<SkuExistence>>> {
            self.existence_calls.set(self.existence_calls.get() + 1);
            let result = skus
                .iter()
                .map(|sku| SkuExistence {
                    sku: sku.clone(),
                    exists: self.existing.iter().any(|s| s == sku),
                })
                .collect();
            Ok(ApiEnvelope::success(result))
        }
    }

    fn fast_config() -> ClientConfig {
        let fast = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            backoff_multiplier: 2.0,
            jitter: false,
        };
        ClientConfig::new("acct-1", Credentials::new("dev-key", "secret"))
            .with_submit_retry(fast.clone())
            .with_query_retry(fast)
    }

    fn service(mock: MockInventory) -> ItemsService<MockInventory> {
        ItemsService::new(mock, fast_config()).unwrap()
    }

    fn unwrap_operation(err: ApiError) -> (CallContext, ApiError) {
        match err {
            ApiError::Operation { context, source } => (context, *source),
            other => panic!("expected Operation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn twelve_thousand_updates_issue_three_ordered_calls() {
        let updates: Vec<InventoryItemQuantityAndPrice> = (0..12_000)
            .map(|i| InventoryItemQuantityAndPrice::new(format!("sku-{i}")))
            .collect();

        let svc = service(MockInventory::default());
        svc.update_quantity_and_prices(&updates, None).await.unwrap();

        assert_eq!(*svc.client.list_pages.borrow(), vec![5000, 5000, 2000]);
        assert_eq!(
            *svc.client.first_skus.borrow(),
            vec!["sku-0", "sku-5000", "sku-10000"]
        );
    }

    #[tokio::test]
    async fn four_labels_fail_before_any_remote_call() {
        let labels: Vec<String> = (0..4).map(|i| format!("label-{i}")).collect();
        let skus = vec!["SKU-1".to_string()];

        let svc = service(MockInventory::default());
        let err = svc
            .assign_label_list_to_item_list(&labels, false, &skus, "restock", None)
            .await
            .unwrap_err();

        let (context, source) = unwrap_operation(err);
        assert_eq!(context.operation, "assign_label_list_to_item_list");
        assert!(matches!(source, ApiError::Precondition(_)));
        assert_eq!(svc.client.label_calls.get(), 0);
    }

    #[tokio::test]
    async fn label_skus_are_paged_by_500() {
        let labels = vec!["closeout".to_string()];
        let skus: Vec<String> = (0..1200).map(|i| format!("sku-{i}")).collect();

        let svc = service(MockInventory::default());
        svc.remove_label_list_from_item_list(&labels, &skus, "cleanup", None)
            .await
            .unwrap();

        assert_eq!(*svc.client.list_pages.borrow(), vec![500, 500, 200]);
    }

    #[tokio::test]
    async fn sync_item_skips_missing_sku() {
        let svc = service(MockInventory::with_existing(&["SKU-A"]));
        let outcome = svc
            .sync_item(&InventoryItemSubmit::new("SKU-B"), false, None)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Skipped);
        assert_eq!(svc.client.sync_item_calls.get(), 0);
    }

    #[tokio::test]
    async fn sync_item_updates_existing_sku() {
        let svc = service(MockInventory::with_existing(&["SKU-A"]));
        let outcome = svc
            .sync_item(&InventoryItemSubmit::new("SKU-A"), false, None)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Updated);
        assert_eq!(svc.client.sync_item_calls.get(), 1);
        assert_eq!(svc.client.existence_calls.get(), 1);
    }

    #[tokio::test]
    async fn sync_item_with_create_skips_existence_check() {
        let svc = service(MockInventory::default());
        let outcome = svc
            .sync_item(&InventoryItemSubmit::new("SKU-NEW"), true, None)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Created);
        assert_eq!(svc.client.existence_calls.get(), 0);
    }

    #[tokio::test]
    async fn sync_items_filters_to_existing_skus_and_pages() {
        let items: Vec<InventoryItemSubmit> = (0..250)
            .map(|i| InventoryItemSubmit::new(format!("sku-{i}")))
            .collect();
        // Only even-numbered SKUs exist
        let existing: Vec<String> = (0..250)
            .step_by(2)
            .map(|i| format!("sku-{i}"))
            .collect();
        let mock = MockInventory {
            existing,
            ..MockInventory::default()
        };

        let svc = service(mock);
        svc.sync_items(&items, false, None).await.unwrap();

        // 125 surviving items paged by 100
        assert_eq!(*svc.client.list_pages.borrow(), vec![100, 25]);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_to_success() {
        let mock = MockInventory::default();
        mock.transient_failures.set(2);

        let updates = vec![InventoryItemQuantityAndPrice::new("SKU-1")];
        let svc = service(mock);
        svc.update_quantity_and_prices(&updates, None).await.unwrap();

        assert_eq!(*svc.client.list_pages.borrow(), vec![1]);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_wrapped_transport_error() {
        let mock = MockInventory::default();
        mock.transient_failures.set(100);

        let updates = vec![InventoryItemQuantityAndPrice::new("SKU-1")];
        let svc = service(mock);
        let err = svc
            .update_quantity_and_prices(&updates, None)
            .await
            .unwrap_err();

        let (context, source) = unwrap_operation(err);
        assert_eq!(context.operation, "update_quantity_and_prices");
        assert_eq!(context.account_id, "acct-1");
        assert!(matches!(
            source,
            ApiError::Transport(TransportError::Timeout(_))
        ));
        // 5 attempts consumed from the failure budget
        assert_eq!(svc.client.transient_failures.get(), 95);
    }

    #[tokio::test]
    async fn caller_supplied_mark_is_carried_into_error_context() {
        let mock = MockInventory::default();
        mock.transient_failures.set(100);

        let mark = Mark::new();
        let svc = service(mock);
        let err = svc
            .update_quantity_and_prices(
                &[InventoryItemQuantityAndPrice::new("SKU-1")],
                Some(mark.clone()),
            )
            .await
            .unwrap_err();

        let (context, _) = unwrap_operation(err);
        assert_eq!(context.mark, mark);
    }
}
