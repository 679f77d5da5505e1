//! Persistence Gateway
//!
//! Minimal key-document store consumed by the engines: find / insert /
//! update / delete by filter over named collections. Atomicity is per
//! document only.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Stored document (always a JSON object)
pub type Document = Value;

/// Collections used by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    DishMaster,
    Orders,
    Tabs,
    User,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::DishMaster => "dish_master",
            Collection::Orders => "orders",
            Collection::Tabs => "tabs",
            Collection::User => "user",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single filter predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Field at a dotted path equals a value
    Eq { path: String, value: Value },
    /// Some element of an array field has `field == value`
    ElemMatch {
        array: String,
        field: String,
        value: Value,
    },
}

/// Conjunction of clauses; the empty filter matches every document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(path, value)
    }

    pub fn and_eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Eq {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn and_elem_match(
        mut self,
        array: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.clauses.push(Clause::ElemMatch {
            array: array.into(),
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

/// Field assignments applied to one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    sets: Vec<(String, Value)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sets.push((path.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn sets(&self) -> &[(String, Value)] {
        &self.sets
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness constraint violated
    #[error("duplicate key in {0}")]
    Duplicate(String),

    /// Backend unreachable or failing
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored document does not match the expected shape
    #[error("corrupt document: {0}")]
    Corrupt(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document store contract
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: Collection, filter: &Filter)
    -> StoreResult<Option<Document>>;

    /// Matching documents in insertion order
    async fn find_many(&self, collection: Collection, filter: &Filter)
    -> StoreResult<Vec<Document>>;

    async fn insert_one(&self, collection: Collection, doc: Document) -> StoreResult<()>;

    /// Applies the patch to the first matching document
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Patch,
    ) -> StoreResult<UpdateOutcome>;

    async fn delete_one(&self, collection: Collection, filter: &Filter)
    -> StoreResult<DeleteOutcome>;
}

pub fn encode<T: Serialize>(value: &T) -> StoreResult<Document> {
    Ok(serde_json::to_value(value)?)
}

pub fn decode<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(doc)?)
}
