//! SQLite-backed document store
//!
//! Documents are stored as JSON bodies keyed by `(collection, doc_id)`;
//! filters and ordering go through `json_extract`. Cursors are keyset
//! predicates over `(order value, doc_id)`.
//!
//! Assumption inherited by range filters: within one collection a given
//! field uses a single date representation (the seeders write ISO-8601
//! UTC strings), so SQLite's value comparison matches chronological order.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Pool, Sqlite, SqlitePool};

use super::{CollectionQuery, Direction, Document, DocumentStore, FilterOp, StoreError};

const CREATE_DOCUMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    doc_id TEXT NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (collection, doc_id)
)
"#;

const CREATE_INDEX_COLLECTION: &str =
    "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, doc_id)";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    pub async fn new(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", url)).await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        // WAL keeps concurrent stats scans from blocking writers
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&self.pool)
            .await?;
        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&self.pool)
            .await?;

        sqlx::query(CREATE_DOCUMENTS_TABLE)
            .execute(&self.pool)
            .await?;
        sqlx::query(CREATE_INDEX_COLLECTION)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn insert(&self, collection: &str, doc: &Document) -> Result<(), StoreError> {
        let body = Value::Object(doc.fields.clone()).to_string();
        sqlx::query(
            "INSERT OR REPLACE INTO documents (collection, doc_id, body) VALUES (?, ?, ?)",
        )
        .bind(collection)
        .bind(&doc.id)
        .bind(body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn op_sql(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq => "=",
        FilterOp::Gte => ">=",
        FilterOp::Lte => "<=",
    }
}

// Field names come from trusted call sites (collection constants and
// config), never from request input.
fn extract_expr(field: &str) -> String {
    format!("json_extract(body, '$.{}')", field)
}

fn bind_value<'q>(
    query: sqlx::query::QueryAs<'q, Sqlite, (String, String), sqlx::sqlite::SqliteArguments<'q>>,
    value: &Value,
) -> sqlx::query::QueryAs<'q, Sqlite, (String, String), sqlx::sqlite::SqliteArguments<'q>> {
    match value {
        Value::Number(n) => query.bind(n.as_f64().unwrap_or_default()),
        Value::String(s) => query.bind(s.clone()),
        Value::Bool(b) => query.bind(*b),
        other => query.bind(other.to_string()),
    }
}

fn parse_body(doc_id: String, body: &str) -> Document {
    let fields = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default();
    Document::new(doc_id, fields)
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn query(&self, query: &CollectionQuery) -> Result<Vec<Document>, StoreError> {
        let order = extract_expr(&query.order_by);
        let mut sql = String::from("SELECT doc_id, body FROM documents WHERE collection = ?");

        for filter in &query.filters {
            sql.push_str(&format!(
                " AND {} {} ?",
                extract_expr(&filter.field),
                op_sql(filter.op)
            ));
        }

        if query.start_after.is_some() {
            let cmp = match query.direction {
                Direction::Ascending => ">",
                Direction::Descending => "<",
            };
            sql.push_str(&format!(
                " AND ({order} {cmp} ? OR ({order} = ? AND doc_id {cmp} ?))",
                order = order,
                cmp = cmp
            ));
        }

        let sort = match query.direction {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        };
        sql.push_str(&format!(
            " ORDER BY {} {}, doc_id {} LIMIT ?",
            order, sort, sort
        ));

        let mut stmt = sqlx::query_as::<_, (String, String)>(&sql).bind(&query.collection);
        for filter in &query.filters {
            stmt = bind_value(stmt, &filter.value);
        }
        if let Some(cursor) = &query.start_after {
            stmt = bind_value(stmt, &cursor.order_value);
            stmt = bind_value(stmt, &cursor.order_value);
            stmt = stmt.bind(cursor.doc_id.clone());
        }
        stmt = stmt.bind(query.limit as i64);

        let rows = stmt.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(doc_id, body)| parse_body(doc_id, &body))
            .collect())
    }

    async fn fetch(&self, collection: &str, doc_id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT doc_id, body FROM documents WHERE collection = ? AND doc_id = ?",
        )
        .bind(collection)
        .bind(doc_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, body)| parse_body(id, &body)))
    }
}
