//! Order Lifecycle Engine
//!
//! Owns `Order`/`OrderItem` state in the `orders` collection. Each operation
//! is a single-document read and/or write; concurrent item-list writers race
//! with last-writer-wins.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use shared::models::{
    ItemModifications, ItemStatus, ItemStatusUpdate, Order, OrderCreate, OrderItem, OrderStatus,
    OrderStatusView, PaymentStatus, PendingDish, PlacedBy, Principal, Role, ServiceMode,
};
use validator::Validate;

use super::lifecycle;
use crate::auth::require_role;
use crate::db::{Collection, DocumentStore, Filter, Patch, StoreError, decode, encode};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService").finish_non_exhaustive()
    }
}

fn by_id(order_id: &str) -> Filter {
    Filter::eq("order_id", order_id)
}

fn not_found(order_id: &str) -> AppError {
    AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id)
}

impl OrderService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn load(&self, order_id: &str) -> AppResult<Order> {
        let doc = self
            .store
            .find_one(Collection::Orders, &by_id(order_id))
            .await?
            .ok_or_else(|| not_found(order_id))?;
        Ok(decode(doc)?)
    }

    /// Overwrite the item list; `OrderNotFound` if the order vanished
    async fn write_items(&self, order_id: &str, items: &[OrderItem]) -> AppResult<()> {
        let outcome = self
            .store
            .update_one(
                Collection::Orders,
                &by_id(order_id),
                &Patch::new().set("items", encode(&items)?),
            )
            .await?;
        if outcome.matched_count == 0 {
            return Err(not_found(order_id));
        }
        Ok(())
    }

    /// Persist a new order stamped with the caller as `placed_by`
    pub async fn create_order(&self, payload: OrderCreate, principal: &Principal) -> AppResult<Order> {
        payload.validate()?;

        if self
            .store
            .find_one(Collection::Orders, &by_id(&payload.order_id))
            .await?
            .is_some()
        {
            return Err(AppError::new(ErrorCode::OrderIdExists)
                .with_detail("order_id", payload.order_id.as_str()));
        }

        let order = payload.into_order(PlacedBy {
            username: principal.username.clone(),
            role: principal.role,
        });

        self.store
            .insert_one(Collection::Orders, encode(&order)?)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AppError::new(ErrorCode::OrderIdExists)
                    .with_detail("order_id", order.order_id.as_str()),
                other => other.into(),
            })?;

        tracing::info!(
            order_id = %order.order_id,
            items = order.items.len(),
            placed_by = %principal.username,
            "Order created"
        );
        Ok(order)
    }

    pub async fn get_status(&self, order_id: &str) -> AppResult<OrderStatusView> {
        let order = self.load(order_id).await?;
        Ok(OrderStatusView {
            order_id: order.order_id,
            order_status: order.order_status,
        })
    }

    pub async fn get_order(&self, order_id: &str) -> AppResult<Order> {
        self.load(order_id).await
    }

    /// Wholesale replacement of the item list
    pub async fn replace_items(
        &self,
        order_id: &str,
        items: Vec<OrderItem>,
        principal: &Principal,
    ) -> AppResult<Vec<OrderItem>> {
        for item in &items {
            item.validate()?;
        }

        self.write_items(order_id, &items).await?;
        tracing::info!(order_id = %order_id, items = items.len(), by = %principal.username, "Order items replaced");
        Ok(items)
    }

    pub async fn cancel_order(&self, order_id: &str, principal: &Principal) -> AppResult<()> {
        let order = self.load(order_id).await?;
        lifecycle::check_cancellable(&order)?;

        // Guarded on the status we checked, so a concurrent transition is not overwritten
        let outcome = self
            .store
            .update_one(
                Collection::Orders,
                &by_id(order_id).and_eq("order_status", OrderStatus::Ordered.as_str()),
                &Patch::new().set("order_status", OrderStatus::Cancelled.as_str()),
            )
            .await?;
        if outcome.matched_count == 0 {
            return Err(AppError::new(ErrorCode::OrderNotCancellable).with_detail("order_id", order_id));
        }

        tracing::info!(order_id = %order_id, by = %principal.username, "Order cancelled");
        Ok(())
    }

    pub async fn convert_to_takeaway(&self, order_id: &str, principal: &Principal) -> AppResult<()> {
        let order = self.load(order_id).await?;
        lifecycle::check_convertible(&order)?;

        let outcome = self
            .store
            .update_one(
                Collection::Orders,
                &by_id(order_id).and_eq("dine_in_takeaway", encode(&ServiceMode::DineIn)?),
                &Patch::new().set("dine_in_takeaway", encode(&ServiceMode::Takeaway)?),
            )
            .await?;
        if outcome.matched_count == 0 {
            return Err(AppError::new(ErrorCode::OrderAlreadyTakeaway).with_detail("order_id", order_id));
        }

        tracing::info!(order_id = %order_id, by = %principal.username, "Order converted to takeaway");
        Ok(())
    }

    /// Orders placed by the caller, oldest first
    pub async fn list_orders_for_user(&self, principal: &Principal) -> AppResult<Vec<Order>> {
        let docs = self
            .store
            .find_many(
                Collection::Orders,
                &Filter::eq("placed_by.username", principal.username.as_str()),
            )
            .await?;
        Ok(docs.into_iter().map(decode).collect::<Result<_, _>>()?)
    }

    /// Takeaway flags, cancellations and additions in one all-or-nothing write
    pub async fn modify_items(
        &self,
        order_id: &str,
        modifications: ItemModifications,
        principal: &Principal,
    ) -> AppResult<Vec<OrderItem>> {
        modifications.validate()?;

        let order = self.load(order_id).await?;
        let items = lifecycle::apply_modifications(&order.items, &modifications)?;
        self.write_items(order_id, &items).await?;

        tracing::info!(
            order_id = %order_id,
            takeaway = modifications.takeaway_item_ids.len(),
            cancelled = modifications.cancel_item_ids.len(),
            added = modifications.new_items.len(),
            by = %principal.username,
            "Order items modified"
        );
        Ok(items)
    }

    pub async fn mark_items_takeaway(
        &self,
        order_id: &str,
        item_ids: Vec<String>,
        principal: &Principal,
    ) -> AppResult<Vec<OrderItem>> {
        let order = self.load(order_id).await?;
        let ids: HashSet<String> = item_ids.into_iter().collect();
        let items = lifecycle::mark_takeaway(&order.items, &ids);
        self.write_items(order_id, &items).await?;

        tracing::info!(order_id = %order_id, by = %principal.username, "Items marked as takeaway");
        Ok(items)
    }

    /// `status` must be `paid` or `unpaid`; checked before any lookup
    pub async fn set_payment_status(
        &self,
        order_id: &str,
        status: &str,
        principal: &Principal,
    ) -> AppResult<PaymentStatus> {
        let status = status.parse::<PaymentStatus>().map_err(|e| {
            AppError::with_message(ErrorCode::InvalidPaymentStatus, e.to_string())
                .with_detail("status", e.0)
        })?;

        let outcome = self
            .store
            .update_one(
                Collection::Orders,
                &by_id(order_id),
                &Patch::new().set("payment_status", status.as_str()),
            )
            .await?;
        if outcome.matched_count == 0 {
            return Err(not_found(order_id));
        }

        tracing::info!(order_id = %order_id, status = %status, by = %principal.username, "Billing status updated");
        Ok(status)
    }

    /// Cook-only: every pending item across all orders
    pub async fn list_pending_dishes(&self, principal: &Principal) -> AppResult<Vec<PendingDish>> {
        require_role(principal, Role::Cook)?;

        let docs = self
            .store
            .find_many(
                Collection::Orders,
                &Filter::all().and_elem_match("items", "status", ItemStatus::Pending.as_str()),
            )
            .await?;

        let mut rows = Vec::new();
        for doc in docs {
            let order: Order = decode(doc)?;
            rows.extend(lifecycle::pending_dishes(&order));
        }
        Ok(rows)
    }

    /// Write the cook's fields onto `items[index]`, only while that slot still
    /// holds the same item in `pending`. Other items are left as stored.
    async fn claim_item(&self, order_id: &str, index: usize, item: &OrderItem) -> AppResult<bool> {
        let slot = format!("items[{index}]");
        let filter = by_id(order_id)
            .and_eq(format!("{slot}.item_id"), item.item_id.as_str())
            .and_eq(format!("{slot}.status"), ItemStatus::Pending.as_str());
        let patch = Patch::new()
            .set(format!("{slot}.status"), item.status.as_str())
            .set(format!("{slot}.cook"), encode(&item.cook)?)
            .set(format!("{slot}.updated_at"), encode(&item.updated_at)?);

        let outcome = self
            .store
            .update_one(Collection::Orders, &filter, &patch)
            .await?;
        Ok(outcome.matched_count > 0)
    }

    /// Cook-only: apply `update` to the first pending item of the order
    pub async fn update_item_status(
        &self,
        order_id: &str,
        update: ItemStatusUpdate,
        principal: &Principal,
    ) -> AppResult<OrderItem> {
        require_role(principal, Role::Cook)?;

        let no_pending = || AppError::new(ErrorCode::NoPendingItem).with_detail("order_id", order_id);

        let order = self.load(order_id).await?;
        let index = lifecycle::first_pending(&order.items).ok_or_else(no_pending)?;

        let mut updated = order.items[index].clone();
        updated.status = update.status;
        updated.cook = Some(update.cook);
        updated.updated_at = Some(Utc::now());

        if !self.claim_item(order_id, index, &updated).await? {
            return Err(no_pending());
        }

        tracing::info!(
            order_id = %order_id,
            item_id = %updated.item_id,
            status = updated.status.as_str(),
            cook = ?updated.cook,
            "Item status updated"
        );
        Ok(updated)
    }
}
