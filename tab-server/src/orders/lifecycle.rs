//! Order lifecycle rules
//!
//! Pure transition checks and item-list mutations. Nothing here touches the
//! store: callers load an [`Order`], run these, then write the result back as
//! one document update.

use std::collections::HashSet;

use shared::models::{
    ItemModifications, ItemStatus, Order, OrderItem, OrderStatus, PendingDish, ServiceMode,
};

use crate::utils::{AppError, AppResult, ErrorCode};

/// `ordered -> cancelled` is the only cancellation path
pub fn check_cancellable(order: &Order) -> AppResult<()> {
    if order.order_status == OrderStatus::Ordered {
        return Ok(());
    }
    Err(AppError::with_message(
        ErrorCode::OrderNotCancellable,
        format!(
            "Order cannot be cancelled as it is not in 'ordered' status (current: {})",
            order.order_status.as_str()
        ),
    )
    .with_detail("order_id", order.order_id.as_str()))
}

/// `dine-in -> takeaway`, one way
pub fn check_convertible(order: &Order) -> AppResult<()> {
    if order.dine_in_takeaway == ServiceMode::DineIn {
        return Ok(());
    }
    Err(AppError::new(ErrorCode::OrderAlreadyTakeaway).with_detail("order_id", order.order_id.as_str()))
}

/// Apply takeaway/cancel flags to existing items and append new ones
///
/// Every cancel target is checked before anything changes, so a rejected
/// call leaves `items` untouched. Unknown ids are ignored.
pub fn apply_modifications(
    items: &[OrderItem],
    modifications: &ItemModifications,
) -> AppResult<Vec<OrderItem>> {
    if let Some(item) = items.iter().find(|item| {
        modifications.cancel_item_ids.contains(&item.item_id) && item.status != ItemStatus::Ordered
    }) {
        return Err(AppError::with_message(
            ErrorCode::OrderItemNotCancellable,
            format!(
                "Item with ID {} cannot be cancelled as it is not in 'ordered' status",
                item.item_id
            ),
        )
        .with_detail("item_id", item.item_id.as_str())
        .with_detail("status", item.status.as_str()));
    }

    let mut updated: Vec<OrderItem> = items
        .iter()
        .cloned()
        .map(|mut item| {
            if modifications.takeaway_item_ids.contains(&item.item_id) {
                item.takeaway = true;
            }
            if modifications.cancel_item_ids.contains(&item.item_id) {
                item.status = ItemStatus::Cancelled;
            }
            item
        })
        .collect();
    updated.extend(modifications.new_items.iter().cloned());

    Ok(updated)
}

/// Set `takeaway` on the listed items; unmatched ids are ignored
pub fn mark_takeaway(items: &[OrderItem], item_ids: &HashSet<String>) -> Vec<OrderItem> {
    items
        .iter()
        .cloned()
        .map(|mut item| {
            if item_ids.contains(&item.item_id) {
                item.takeaway = true;
            }
            item
        })
        .collect()
}

/// One row per pending item, in item order
pub fn pending_dishes(order: &Order) -> impl Iterator<Item = PendingDish> + '_ {
    order
        .items
        .iter()
        .filter(|item| item.status == ItemStatus::Pending)
        .map(|item| PendingDish {
            table: order.table.clone(),
            order_id: order.order_id.clone(),
            dish_name: item.item_name.clone(),
            status: item.status,
        })
}

/// Index of the item a cook status update applies to
pub fn first_pending(items: &[OrderItem]) -> Option<usize> {
    items.iter().position(|item| item.status == ItemStatus::Pending)
}
