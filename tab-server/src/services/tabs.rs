//! Tab/Session Engine
//!
//! Tabs are keyed by their unique `name`. Managers create, rename and delete
//! them; any authenticated occupant binds a table and raises or clears
//! waiter/support calls.

use std::sync::Arc;

use shared::models::{Principal, Role, Tab, TabCreate};
use validator::Validate;

use crate::auth::require_role;
use crate::db::{Collection, DocumentStore, Filter, Patch, StoreError, decode, encode};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct TabService {
    store: Arc<dyn DocumentStore>,
}

fn by_name(name: &str) -> Filter {
    Filter::eq("name", name)
}

fn not_found(name: &str) -> AppError {
    AppError::new(ErrorCode::TabNotFound).with_detail("name", name)
}

fn name_taken(name: &str) -> AppError {
    AppError::new(ErrorCode::TabNameExists).with_detail("name", name)
}

impl TabService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn exists(&self, name: &str) -> AppResult<bool> {
        Ok(self
            .store
            .find_one(Collection::Tabs, &by_name(name))
            .await?
            .is_some())
    }

    /// Apply `patch` to the named tab; `TabNotFound` when nothing matched
    async fn patch(&self, name: &str, patch: Patch) -> AppResult<()> {
        let outcome = self
            .store
            .update_one(Collection::Tabs, &by_name(name), &patch)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AppError::new(ErrorCode::TabNameExists),
                other => other.into(),
            })?;
        if outcome.matched_count == 0 {
            return Err(not_found(name));
        }
        Ok(())
    }

    pub async fn add_tab(&self, payload: TabCreate, principal: &Principal) -> AppResult<Tab> {
        require_role(principal, Role::Manager)?;
        payload.validate()?;

        if self.exists(&payload.name).await? {
            return Err(name_taken(&payload.name));
        }

        let id = payload
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let tab = Tab::new(id, payload.name, payload.table);

        self.store
            .insert_one(Collection::Tabs, encode(&tab)?)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => name_taken(&tab.name),
                other => other.into(),
            })?;

        tracing::info!(tab = %tab.name, by = %principal.username, "Tab added");
        Ok(tab)
    }

    pub async fn delete_tab(&self, name: &str, principal: &Principal) -> AppResult<()> {
        require_role(principal, Role::Manager)?;

        let outcome = self
            .store
            .delete_one(Collection::Tabs, &by_name(name))
            .await?;
        if outcome.deleted_count == 0 {
            return Err(not_found(name));
        }

        tracing::info!(tab = %name, by = %principal.username, "Tab deleted");
        Ok(())
    }

    /// Target collision is reported before a missing source
    pub async fn rename_tab(&self, old_name: &str, new_name: &str, principal: &Principal) -> AppResult<()> {
        require_role(principal, Role::Manager)?;

        if new_name.trim().is_empty() {
            return Err(AppError::validation("new_name must not be empty"));
        }
        if self.exists(new_name).await? {
            return Err(name_taken(new_name));
        }

        self.patch(old_name, Patch::new().set("name", new_name)).await?;
        tracing::info!(from = %old_name, to = %new_name, by = %principal.username, "Tab renamed");
        Ok(())
    }

    /// Bind a table number and record who bound it
    pub async fn bind_table(&self, name: &str, table: i64, principal: &Principal) -> AppResult<()> {
        self.patch(
            name,
            Patch::new()
                .set("table", table)
                .set("bound_user", principal.username.as_str())
                .set("role_of_last_binder", principal.role.as_str()),
        )
        .await?;

        tracing::info!(tab = %name, table, by = %principal.username, "Table bound");
        Ok(())
    }

    pub async fn list_tabs(&self) -> AppResult<Vec<Tab>> {
        let docs = self.store.find_many(Collection::Tabs, &Filter::all()).await?;
        Ok(docs.into_iter().map(decode).collect::<Result<_, _>>()?)
    }

    pub async fn call_waiter(&self, name: &str, text: &str) -> AppResult<()> {
        self.patch(
            name,
            Patch::new().set("waiter_request", true).set("waiter_text", text),
        )
        .await
    }

    pub async fn clear_waiter(&self, name: &str) -> AppResult<()> {
        self.patch(
            name,
            Patch::new().set("waiter_request", false).set("waiter_text", ""),
        )
        .await
    }

    pub async fn call_support(&self, name: &str, text: &str) -> AppResult<()> {
        self.patch(
            name,
            Patch::new().set("support_request", true).set("support_text", text),
        )
        .await
    }

    pub async fn clear_support(&self, name: &str) -> AppResult<()> {
        self.patch(
            name,
            Patch::new().set("support_request", false).set("support_text", ""),
        )
        .await
    }

    #[cfg(test)]
    async fn get(&self, name: &str) -> AppResult<Tab> {
        let doc = self
            .store
            .find_one(Collection::Tabs, &by_name(name))
            .await?
            .ok_or_else(|| not_found(name))?;
        Ok(decode(doc)?)
    }
}
