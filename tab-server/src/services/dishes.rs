//! Dish Catalog
//!
//! Menu entries in `dish_master`, addressed by their `id`. Mutations are
//! Cook-only; the name is unique across the catalog.

use std::sync::Arc;

use chrono::Utc;
use shared::models::{Dish, DishCreate, DishUpdate, Principal, Role};
use validator::Validate;

use crate::auth::require_role;
use crate::db::{Collection, DocumentStore, Filter, Patch, StoreError, decode, encode};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct DishService {
    store: Arc<dyn DocumentStore>,
}

fn by_id(dish_id: &str) -> Filter {
    Filter::eq("id", dish_id)
}

fn not_found(dish_id: &str) -> AppError {
    AppError::new(ErrorCode::DishNotFound).with_detail("id", dish_id)
}

fn name_taken(name: &str) -> AppError {
    AppError::new(ErrorCode::DishNameExists).with_detail("name", name)
}

fn id_taken(dish_id: &str) -> AppError {
    AppError::new(ErrorCode::DishIdExists).with_detail("id", dish_id)
}

impl DishService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn exists(&self, filter: &Filter) -> AppResult<bool> {
        Ok(self
            .store
            .find_one(Collection::DishMaster, filter)
            .await?
            .is_some())
    }

    async fn get(&self, dish_id: &str) -> AppResult<Dish> {
        let doc = self
            .store
            .find_one(Collection::DishMaster, &by_id(dish_id))
            .await?
            .ok_or_else(|| not_found(dish_id))?;
        Ok(decode(doc)?)
    }

    /// Whole catalog in insertion order
    pub async fn list_dishes(&self) -> AppResult<Vec<Dish>> {
        let docs = self
            .store
            .find_many(Collection::DishMaster, &Filter::all())
            .await?;
        Ok(docs.into_iter().map(decode).collect::<Result<_, _>>()?)
    }

    pub async fn add_dish(&self, payload: DishCreate, principal: &Principal) -> AppResult<Dish> {
        require_role(principal, Role::Cook)?;
        payload.validate()?;

        if self.exists(&Filter::eq("name", payload.name.as_str())).await? {
            return Err(name_taken(&payload.name));
        }

        let id = match payload.id.filter(|id| !id.is_empty()) {
            Some(id) => {
                if self.exists(&by_id(&id)).await? {
                    return Err(id_taken(&id));
                }
                id
            }
            None => uuid::Uuid::new_v4().to_string(),
        };

        let dish = Dish {
            id,
            name: payload.name,
            available: payload.available,
            dish_type: payload.dish_type,
            rate: payload.rate,
            takeaway_rate: payload.takeaway_rate,
            image: payload.image,
            date_added: Utc::now(),
            added_by: principal.username.clone(),
        };

        // A concurrent insert may take either key; report the one that is now held
        match self
            .store
            .insert_one(Collection::DishMaster, encode(&dish)?)
            .await
        {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                return Err(if self.exists(&by_id(&dish.id)).await? {
                    id_taken(&dish.id)
                } else {
                    name_taken(&dish.name)
                });
            }
            Err(other) => return Err(other.into()),
        }

        tracing::info!(dish_id = %dish.id, name = %dish.name, by = %principal.username, "Dish added");
        Ok(dish)
    }

    /// Partial update; only the fields present in `update` change
    pub async fn modify_dish(
        &self,
        dish_id: &str,
        update: DishUpdate,
        principal: &Principal,
    ) -> AppResult<Dish> {
        require_role(principal, Role::Cook)?;
        update.validate()?;

        let mut patch = Patch::new();
        if let serde_json::Value::Object(fields) = encode(&update)? {
            for (field, value) in fields {
                patch = patch.set(field, value);
            }
        }

        let outcome = self
            .store
            .update_one(Collection::DishMaster, &by_id(dish_id), &patch)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => {
                    name_taken(update.name.as_deref().unwrap_or_default())
                }
                other => other.into(),
            })?;
        if outcome.matched_count == 0 {
            return Err(not_found(dish_id));
        }

        tracing::info!(dish_id = %dish_id, by = %principal.username, "Dish modified");
        self.get(dish_id).await
    }

    pub async fn delete_dish(&self, dish_id: &str, principal: &Principal) -> AppResult<()> {
        require_role(principal, Role::Cook)?;

        let outcome = self
            .store
            .delete_one(Collection::DishMaster, &by_id(dish_id))
            .await?;
        if outcome.deleted_count == 0 {
            return Err(not_found(dish_id));
        }

        tracing::info!(dish_id = %dish_id, by = %principal.username, "Dish deleted");
        Ok(())
    }
}
