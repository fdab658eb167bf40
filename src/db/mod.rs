pub mod seed;

use crate::domain::models::{ShiftReport, UserProfile};
use crate::domain::schema::FieldDescriptor;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

/// The three logical document collections. Typed so collection access can
/// never reach an arbitrary table name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Users,
    ShiftReports,
    FormFields,
}

impl Collection {
    fn table(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::ShiftReports => "shift_reports",
            Collection::FormFields => "form_fields",
        }
    }
}

/// One raw document: opaque id plus JSON body. `get_all` returns fetch
/// order; callers sort.
#[derive(Debug, sqlx::FromRow)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

pub async fn get_all(pool: &PgPool, collection: Collection) -> Result<Vec<Document>> {
    let docs = sqlx::query_as::<_, Document>(&format!(
        "SELECT id, data FROM {} ORDER BY created_at ASC",
        collection.table()
    ))
    .fetch_all(pool)
    .await?;
    Ok(docs)
}

pub async fn get_by_id(
    pool: &PgPool,
    collection: Collection,
    id: &str,
) -> Result<Option<Document>> {
    let doc = sqlx::query_as::<_, Document>(&format!(
        "SELECT id, data FROM {} WHERE id = $1",
        collection.table()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(doc)
}

/// Equality query on one top-level document field. The only server-side
/// filter in the system; everything else is scanned and filtered in
/// process.
pub async fn query_eq(
    pool: &PgPool,
    collection: Collection,
    field: &str,
    value: &str,
) -> Result<Vec<Document>> {
    let docs = sqlx::query_as::<_, Document>(&format!(
        "SELECT id, data FROM {} WHERE data ->> $1 = $2 ORDER BY created_at ASC",
        collection.table()
    ))
    .bind(field)
    .bind(value)
    .fetch_all(pool)
    .await?;
    Ok(docs)
}

pub async fn create_with_id(
    pool: &PgPool,
    collection: Collection,
    id: &str,
    data: &Value,
) -> Result<()> {
    sqlx::query(&format!(
        "INSERT INTO {} (id, data) VALUES ($1, $2)",
        collection.table()
    ))
    .bind(id)
    .bind(data)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_auto_id(
    pool: &PgPool,
    collection: Collection,
    data: &Value,
) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    create_with_id(pool, collection, &id, data).await?;
    Ok(id)
}

/// Merge-update: only the named fields change, the rest of the document is
/// left alone. Last write wins; there is no version check. Returns false
/// when no document with that id exists.
pub async fn update_merge(
    pool: &PgPool,
    collection: Collection,
    id: &str,
    patch: &Value,
) -> Result<bool> {
    let result = sqlx::query(&format!(
        "UPDATE {} SET data = data || $2, updated_at = now() WHERE id = $1",
        collection.table()
    ))
    .bind(id)
    .bind(patch)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Full overwrite of the document body, keeping the id.
pub async fn replace(
    pool: &PgPool,
    collection: Collection,
    id: &str,
    data: &Value,
) -> Result<bool> {
    let result = sqlx::query(&format!(
        "UPDATE {} SET data = $2, updated_at = now() WHERE id = $1",
        collection.table()
    ))
    .bind(id)
    .bind(data)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, collection: Collection, id: &str) -> Result<bool> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", collection.table()))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn decode<T: DeserializeOwned>(doc: Document) -> Result<T> {
    let mut data = doc.data;
    if let Some(map) = data.as_object_mut() {
        map.insert("id".to_string(), Value::String(doc.id));
    }
    Ok(serde_json::from_value(data)?)
}

/// Serialize a domain value into a document body, dropping the id (the id
/// lives in its own column, not inside the body).
fn encode<T: Serialize>(value: &T) -> Result<Value> {
    let mut data = serde_json::to_value(value)?;
    if let Some(map) = data.as_object_mut() {
        map.remove("id");
    }
    Ok(data)
}

// ---- form_fields ----

pub async fn get_all_form_fields(pool: &PgPool) -> Result<Vec<FieldDescriptor>> {
    get_all(pool, Collection::FormFields)
        .await?
        .into_iter()
        .map(decode)
        .collect()
}

pub async fn get_form_field(pool: &PgPool, id: &str) -> Result<Option<FieldDescriptor>> {
    match get_by_id(pool, Collection::FormFields, id).await? {
        Some(doc) => Ok(Some(decode(doc)?)),
        None => Ok(None),
    }
}

pub async fn create_form_field(pool: &PgPool, field: &FieldDescriptor) -> Result<()> {
    create_with_id(pool, Collection::FormFields, &field.id, &encode(field)?).await
}

pub async fn update_form_field(pool: &PgPool, field: &FieldDescriptor) -> Result<bool> {
    replace(pool, Collection::FormFields, &field.id, &encode(field)?).await
}

pub async fn delete_form_field(pool: &PgPool, id: &str) -> Result<bool> {
    delete(pool, Collection::FormFields, id).await
}

// ---- shift_reports ----

pub async fn get_all_shift_reports(pool: &PgPool) -> Result<Vec<ShiftReport>> {
    get_all(pool, Collection::ShiftReports)
        .await?
        .into_iter()
        .map(decode)
        .collect()
}

pub async fn get_shift_report(pool: &PgPool, id: &str) -> Result<Option<ShiftReport>> {
    match get_by_id(pool, Collection::ShiftReports, id).await? {
        Some(doc) => Ok(Some(decode(doc)?)),
        None => Ok(None),
    }
}

pub async fn get_shift_reports_by_house(pool: &PgPool, house: u8) -> Result<Vec<ShiftReport>> {
    query_eq(pool, Collection::ShiftReports, "house", &house.to_string())
        .await?
        .into_iter()
        .map(decode)
        .collect()
}

pub async fn create_shift_report(pool: &PgPool, report: &ShiftReport) -> Result<String> {
    create_auto_id(pool, Collection::ShiftReports, &encode(report)?).await
}

// ---- users ----

pub async fn get_user(pool: &PgPool, id: &str) -> Result<Option<UserProfile>> {
    match get_by_id(pool, Collection::Users, id).await? {
        Some(doc) => Ok(Some(decode(doc)?)),
        None => Ok(None),
    }
}

pub async fn get_all_users(pool: &PgPool) -> Result<Vec<UserProfile>> {
    get_all(pool, Collection::Users)
        .await?
        .into_iter()
        .map(decode)
        .collect()
}

/// Upsert the cached identity-provider profile: create on first sign-in,
/// otherwise merge only the identity fields. `role` is never written here,
/// so a role granted by an admin survives every subsequent sign-in.
pub async fn upsert_user_profile(
    pool: &PgPool,
    uid: &str,
    display_name: &str,
    email: &str,
    photo_url: &str,
) -> Result<()> {
    let identity_fields = serde_json::json!({
        "displayName": display_name,
        "email": email,
        "photoURL": photo_url,
    });
    if !update_merge(pool, Collection::Users, uid, &identity_fields).await? {
        create_with_id(pool, Collection::Users, uid, &identity_fields).await?;
    }
    Ok(())
}
