//! Domain payload and result records
//!
//! Plain data carried into and out of the remote procedures. Request records
//! are immutable once constructed; response records live for the single call
//! that produced them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Inventory
// ----------------------------------------------------------------------------

/// One inventory item submitted for synchronization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemSubmit {
    /// Seller SKU identifying the item
    pub sku: String,
    /// Item title
    pub title: Option<String>,
    /// Available quantity
    pub quantity: Option<i32>,
    /// Unit price
    pub price: Option<f64>,
    /// Warehouse location code
    pub warehouse_location: Option<String>,
}

impl InventoryItemSubmit {
    /// Create a submit record for a SKU
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            title: None,
            quantity: None,
            price: None,
            warehouse_location: None,
        }
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the available quantity
    #[must_use]
    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the unit price
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

/// How a submitted quantity is applied to the remote stock level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuantityUpdateType {
    /// Replace the stock level with the submitted quantity
    Absolute,
    /// Add the submitted quantity to the stock level
    Relative,
    /// Replace the available (unreserved) quantity
    Available,
    /// Replace the in-stock quantity
    InStock,
}

/// Quantity and price update for one SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemQuantityAndPrice {
    /// Seller SKU identifying the item
    pub sku: String,
    /// New quantity
    pub quantity: Option<i32>,
    /// How the quantity is applied
    pub update_type: Option<QuantityUpdateType>,
    /// New unit price
    pub price: Option<f64>,
}

impl InventoryItemQuantityAndPrice {
    /// Create an update record for a SKU
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            quantity: None,
            update_type: None,
            price: None,
        }
    }

    /// Set the quantity and how it is applied
    #[must_use]
    pub fn with_quantity(mut self, quantity: i32, update_type: QuantityUpdateType) -> Self {
        self.quantity = Some(quantity);
        self.update_type = Some(update_type);
        self
    }

    /// Set the unit price
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

/// Existence flag for one SKU, as reported by the endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuExistence {
    /// Seller SKU that was checked
    pub sku: String,
    /// Whether the SKU exists in the account
    pub exists: bool,
}

/// Outcome of a single-item synchronization
///
/// Replaces the silent skip-on-missing behavior with an explicit value the
/// caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The SKU does not exist and creation was not requested; nothing was sent
    Skipped,
    /// The item was submitted with creation allowed
    Created,
    /// An existing item was updated
    Updated,
}

// ----------------------------------------------------------------------------
// Shipping
// ----------------------------------------------------------------------------

/// Reference to one order, by remote id or by the seller's own identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderRef {
    /// ChannelAdvisor order id
    OrderId(i64),
    /// Client (seller-side) order identifier
    ClientOrderId(String),
}

impl std::fmt::Display for OrderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrderId(id) => write!(f, "{id}"),
            Self::ClientOrderId(id) => write!(f, "{id}"),
        }
    }
}

/// Carrier and tracking data for a full-order shipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullShipment {
    /// Carrier code (e.g. "UPS")
    pub carrier_code: String,
    /// Shipping class code (e.g. "GROUND")
    pub class_code: String,
    /// Carrier tracking number
    pub tracking_number: String,
    /// When the shipment left the warehouse, in UTC
    pub date_shipped: DateTime<Utc>,
}

/// One line of a partial shipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentLineItem {
    /// Seller SKU shipped
    pub sku: String,
    /// Quantity shipped
    pub quantity: i32,
}

/// Carrier, tracking, and line data for a partial-order shipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialShipment {
    /// Carrier code
    pub carrier_code: String,
    /// Shipping class code
    pub class_code: String,
    /// Carrier tracking number
    pub tracking_number: String,
    /// When the shipment left the warehouse, in UTC
    pub date_shipped: DateTime<Utc>,
    /// Lines included in this shipment
    pub line_items: Vec<ShipmentLineItem>,
}

/// Shipment contents, full or partial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShipmentContents {
    /// The whole order shipped at once
    Full(FullShipment),
    /// Part of the order shipped
    Partial(PartialShipment),
}

impl ShipmentContents {
    /// Carrier code of the shipment
    #[must_use]
    pub fn carrier_code(&self) -> &str {
        match self {
            Self::Full(c) => &c.carrier_code,
            Self::Partial(c) => &c.carrier_code,
        }
    }

    /// Tracking number of the shipment
    #[must_use]
    pub fn tracking_number(&self) -> &str {
        match self {
            Self::Full(c) => &c.tracking_number,
            Self::Partial(c) => &c.tracking_number,
        }
    }
}

/// One order shipment submitted to the endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderShipment {
    /// Order the shipment belongs to
    pub order: OrderRef,
    /// What shipped
    pub contents: ShipmentContents,
}

impl OrderShipment {
    /// Create a full-order shipment
    pub fn full(order: OrderRef, contents: FullShipment) -> Self {
        Self {
            order,
            contents: ShipmentContents::Full(contents),
        }
    }

    /// Create a partial-order shipment
    pub fn partial(order: OrderRef, contents: PartialShipment) -> Self {
        Self {
            order,
            contents: ShipmentContents::Partial(contents),
        }
    }
}

/// Per-shipment result inside a batch submission response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentResponse {
    /// Order reference the result applies to, when reported
    pub order: Option<String>,
    /// Whether this shipment was accepted
    pub success: bool,
    /// Message for this shipment, typically set on failure
    pub message: Option<String>,
}

/// One recorded shipment in an order's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderShipmentHistory {
    /// ChannelAdvisor order id
    pub order_id: Option<i64>,
    /// Client order identifier
    pub client_order_id: Option<String>,
    /// Carrier code used
    pub carrier_code: String,
    /// Shipping class code used
    pub class_code: String,
    /// Carrier tracking number
    pub tracking_number: String,
    /// When the shipment was recorded, in UTC
    pub date_shipped: DateTime<Utc>,
}

/// One carrier available to the account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingCarrier {
    /// Carrier code used in shipment submissions
    pub carrier_code: String,
    /// Display name of the carrier
    pub name: String,
    /// Class codes the carrier supports
    pub class_codes: Vec<String>,
}
