//! Order Model
//!
//! An [`Order`] owns its [`OrderItem`]s; items never exist on their own and
//! are snapshots of the dish at the time they were added.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::dish::DishType;
use super::role::Role;

/// Order lifecycle: `ordered -> processing -> completed`, `ordered -> cancelled`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Ordered,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ordered",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Per-item kitchen status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Ordered,
    Pending,
    Cancelled,
    Completed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Ordered => "ordered",
            ItemStatus::Pending => "pending",
            ItemStatus::Cancelled => "cancelled",
            ItemStatus::Completed => "completed",
        }
    }
}

/// Dine-in or takeaway; only `dine-in -> takeaway` is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceMode {
    #[serde(rename = "dine-in")]
    DineIn,
    #[serde(rename = "takeaway")]
    Takeaway,
}

/// Billing status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a payment status other than paid/unpaid is supplied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment status: {0}")]
pub struct UnknownPaymentStatus(pub String);

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(PaymentStatus::Paid),
            "unpaid" => Ok(PaymentStatus::Unpaid),
            other => Err(UnknownPaymentStatus(other.to_string())),
        }
    }
}

/// Line item inside an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OrderItem {
    pub item_id: String,
    #[serde(rename = "type")]
    pub item_type: DishType,
    #[serde(alias = "item")]
    pub item_name: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub cost: f64,
    #[serde(default)]
    pub instructions: Option<String>,
    pub status: ItemStatus,
    #[serde(default)]
    pub cook: Option<String>,
    #[serde(alias = "addedby")]
    pub added_by: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub takeaway: bool,
    /// Set when a cook last changed the item status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Who placed an order, stamped from the principal at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBy {
    pub username: String,
    pub role: Role,
}

/// Order entity (stored in `orders`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    /// Soft reference to a tab/table, not enforced
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(alias = "orders")]
    pub items: Vec<OrderItem>,
    pub order_date_time: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub dine_in_takeaway: ServiceMode,
    pub bill_amount: f64,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(alias = "order_by")]
    pub placed_by: PlacedBy,
}

/// Create order payload; `placed_by` is filled in from the caller
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(length(min = 1, max = 64))]
    pub order_id: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(alias = "orders")]
    #[validate(nested)]
    pub items: Vec<OrderItem>,
    pub order_date_time: DateTime<Utc>,
    #[serde(default = "default_order_status")]
    pub order_status: OrderStatus,
    #[serde(default = "default_service_mode")]
    pub dine_in_takeaway: ServiceMode,
    #[serde(default)]
    pub bill_amount: f64,
    #[serde(default = "default_payment_status")]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_mode: Option<String>,
}

fn default_order_status() -> OrderStatus {
    OrderStatus::Ordered
}

fn default_service_mode() -> ServiceMode {
    ServiceMode::DineIn
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Unpaid
}

impl OrderCreate {
    pub fn into_order(self, placed_by: PlacedBy) -> Order {
        Order {
            order_id: self.order_id,
            table: self.table,
            customer_name: self.customer_name,
            phone_number: self.phone_number,
            items: self.items,
            order_date_time: self.order_date_time,
            order_status: self.order_status,
            dine_in_takeaway: self.dine_in_takeaway,
            bill_amount: self.bill_amount,
            payment_status: self.payment_status,
            payment_mode: self.payment_mode,
            placed_by,
        }
    }
}

/// Item-level modifications applied in one go
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ItemModifications {
    #[serde(default, alias = "takeaway_items")]
    pub takeaway_item_ids: HashSet<String>,
    #[serde(default, alias = "cancel_items")]
    pub cancel_item_ids: HashSet<String>,
    #[serde(default)]
    #[validate(nested)]
    pub new_items: Vec<OrderItem>,
}

/// Cook's status update for the first pending item of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStatusUpdate {
    pub status: ItemStatus,
    pub cook: String,
}

/// Response row for `GetStatus`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusView {
    pub order_id: String,
    pub order_status: OrderStatus,
}

/// One row per pending item, flattened across orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDish {
    pub table: Option<String>,
    pub order_id: String,
    pub dish_name: String,
    pub status: ItemStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(
            serde_json::to_string(&ServiceMode::DineIn).unwrap(),
            "\"dine-in\""
        );
        assert_eq!(
            serde_json::to_string(&ItemStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn test_payment_status_parse() {
        assert_eq!("paid".parse::<PaymentStatus>(), Ok(PaymentStatus::Paid));
        assert_eq!("unpaid".parse::<PaymentStatus>(), Ok(PaymentStatus::Unpaid));
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_item_accepts_legacy_field_names() {
        let json = serde_json::json!({
            "item_id": "i1",
            "type": "Starter",
            "item": "Soup",
            "quantity": 2,
            "cost": 4.5,
            "status": "ordered",
            "addedby": "waiter1",
            "date": "2024-05-01T12:00:00Z",
            "takeaway": false
        });
        let item: OrderItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.item_name, "Soup");
        assert_eq!(item.added_by, "waiter1");
        assert!(item.cook.is_none());
    }

    #[test]
    fn test_modifications_accept_short_names() {
        let json = serde_json::json!({
            "takeaway_items": ["i1"],
            "cancel_items": ["i2", "i2"]
        });
        let mods: ItemModifications = serde_json::from_value(json).unwrap();
        assert!(mods.takeaway_item_ids.contains("i1"));
        assert_eq!(mods.cancel_item_ids.len(), 1);
        assert!(mods.new_items.is_empty());
    }
}
