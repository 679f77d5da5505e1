//! SQLite-backed document store
//!
//! Every document lives in the `documents` table as JSON text. Filters compile
//! to `json_extract` / `json_each` predicates; all parameters are bound as
//! text (paths and JSON-encoded values).

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::store::{
    Clause, Collection, DeleteOutcome, Document, DocumentStore, Filter, Patch, StoreError,
    StoreResult, UpdateOutcome,
};

#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// WHERE clause plus its bind values, in order
struct Predicate {
    sql: String,
    binds: Vec<String>,
}

fn json_path(path: &str) -> String {
    format!("$.{path}")
}

fn compile(collection: Collection, filter: &Filter) -> Predicate {
    let mut sql = String::from("collection = ?");
    let mut binds = vec![collection.as_str().to_string()];

    for clause in filter.clauses() {
        match clause {
            Clause::Eq { path, value } => {
                sql.push_str(" AND json_extract(body, ?) IS json_extract(?, '$')");
                binds.push(json_path(path));
                binds.push(value.to_string());
            }
            Clause::ElemMatch {
                array,
                field,
                value,
            } => {
                sql.push_str(
                    " AND EXISTS (SELECT 1 FROM json_each(body, ?) AS elem \
                     WHERE json_extract(elem.value, ?) IS json_extract(?, '$'))",
                );
                binds.push(json_path(array));
                binds.push(json_path(field));
                binds.push(value.to_string());
            }
        }
    }

    Predicate { sql, binds }
}

fn map_sqlx(collection: Collection, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(collection.as_str().to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(err.to_string())
        }
        other => {
            tracing::error!(collection = %collection, error = %other, "Document store failure");
            StoreError::Unavailable(other.to_string())
        }
    }
}

fn parse(body: &str) -> StoreResult<Document> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        let predicate = compile(collection, filter);
        let sql = format!(
            "SELECT body FROM documents WHERE {} ORDER BY id LIMIT 1",
            predicate.sql
        );

        let mut query = sqlx::query_scalar::<_, String>(&sql);
        for bind in predicate.binds {
            query = query.bind(bind);
        }

        let body = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx(collection, e))?;
        body.as_deref().map(parse).transpose()
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>> {
        let predicate = compile(collection, filter);
        let sql = format!("SELECT body FROM documents WHERE {} ORDER BY id", predicate.sql);

        let mut query = sqlx::query_scalar::<_, String>(&sql);
        for bind in predicate.binds {
            query = query.bind(bind);
        }

        let bodies = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx(collection, e))?;
        bodies.iter().map(|body| parse(body)).collect()
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> StoreResult<()> {
        if !doc.is_object() {
            return Err(StoreError::Corrupt(format!(
                "{collection} documents must be JSON objects"
            )));
        }

        sqlx::query("INSERT INTO documents (collection, body) VALUES (?, ?)")
            .bind(collection.as_str())
            .bind(doc.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx(collection, e))?;
        Ok(())
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Patch,
    ) -> StoreResult<UpdateOutcome> {
        let predicate = compile(collection, filter);

        // json_set(body) with no assignments is a no-op that still counts the match
        let mut assignments = String::from("body");
        let mut binds = Vec::with_capacity(patch.sets().len() * 2 + predicate.binds.len());
        if !patch.is_empty() {
            assignments = String::from("json_set(body");
            for (path, value) in patch.sets() {
                assignments.push_str(", ?, json(?)");
                binds.push(json_path(path));
                binds.push(value.to_string());
            }
            assignments.push(')');
        }
        binds.extend(predicate.binds);

        let sql = format!(
            "UPDATE documents SET body = {assignments} \
             WHERE id = (SELECT id FROM documents WHERE {} ORDER BY id LIMIT 1)",
            predicate.sql
        );

        let mut query = sqlx::query(&sql);
        for bind in binds {
            query = query.bind(bind);
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx(collection, e))?;
        Ok(UpdateOutcome {
            matched_count: result.rows_affected(),
        })
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<DeleteOutcome> {
        let predicate = compile(collection, filter);
        let sql = format!(
            "DELETE FROM documents \
             WHERE id = (SELECT id FROM documents WHERE {} ORDER BY id LIMIT 1)",
            predicate.sql
        );

        let mut query = sqlx::query(&sql);
        for bind in predicate.binds {
            query = query.bind(bind);
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx(collection, e))?;
        Ok(DeleteOutcome {
            deleted_count: result.rows_affected(),
        })
    }
}
