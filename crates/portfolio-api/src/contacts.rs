use std::sync::Arc;

use anyhow::Context;
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::HeaderMap,
};
use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use portfolio_db::Database;
use portfolio_db::models::ContactRow;
use portfolio_types::api::{Claims, NewContact};
use portfolio_types::envelope::Envelope;
use portfolio_types::models::{ContactEntry, ContactStatus};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::store::{format_timestamp, parse_timestamp, run_blocking};
use crate::validate;

/// Upper bound on a single contact listing.
pub const MAX_CONTACTS_LISTED: u32 = 100;

/// Contact-form submissions: validated on the way in, listed and deleted by the admin.
#[derive(Clone)]
pub struct ContactStore {
    db: Arc<Database>,
}

impl ContactStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Nothing is written unless every field passes validation.
    pub async fn submit(
        &self,
        input: NewContact,
        ip_address: Option<String>,
    ) -> Result<ContactEntry, ApiError> {
        let input = validate::contact(input)?;

        let now = format_timestamp(Utc::now());
        let row = ContactRow {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            message: input.message,
            status: ContactStatus::New.as_str().to_string(),
            ip_address,
            created_at: now.clone(),
            updated_at: now,
        };

        run_blocking(&self.db, "Failed to save contact", move |db| {
            db.insert_contact(&row)?;
            contact_from_row(row)
        })
        .await
    }

    /// Newest first, at most `MAX_CONTACTS_LISTED` entries.
    pub async fn list_all(&self) -> Result<Vec<ContactEntry>, ApiError> {
        run_blocking(&self.db, "Failed to list contacts", |db| {
            db.list_contacts(MAX_CONTACTS_LISTED)?
                .into_iter()
                .map(contact_from_row)
                .collect()
        })
        .await
    }

    /// A malformed id is a validation error, never a not-found.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let id: Uuid = id
            .parse()
            .map_err(|_| ApiError::Validation(format!("Invalid contact id: {}", id)))?;

        let removed = run_blocking(&self.db, "Failed to delete contact", move |db| {
            db.delete_contact(&id.to_string())
        })
        .await?;

        if !removed {
            return Err(ApiError::NotFound(format!("No contact with id {}", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, ApiError> {
        run_blocking(&self.db, "Failed to count contacts", |db| db.count_contacts()).await
    }
}

fn contact_from_row(row: ContactRow) -> anyhow::Result<ContactEntry> {
    Ok(ContactEntry {
        id: row.id.parse().with_context(|| format!("corrupt contact id '{}'", row.id))?,
        status: row.status.parse().map_err(anyhow::Error::msg)?,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
        name: row.name,
        email: row.email,
        message: row.message,
        ip_address: row.ip_address,
    })
}

/// Client address as reported by the reverse proxy, if any.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next());
    let real_ip = headers.get("x-real-ip").and_then(|v| v.to_str().ok());

    forwarded
        .or(real_ip)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NewContact>, JsonRejection>,
) -> Result<Json<Envelope<ContactEntry>>, ApiError> {
    let Json(input) = payload?;

    let entry = state.contacts.submit(input, client_ip(&headers)).await?;

    info!("Contact {} submitted", entry.id);
    Ok(Json(Envelope::ok("Message received", entry)))
}

/// GET /api/contact and GET /api/admin/contact-messages
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Envelope<Vec<ContactEntry>>>, ApiError> {
    let entries = state.contacts.list_all().await?;

    info!("{} listed {} contact messages", claims.sub, entries.len());
    Ok(Json(Envelope::ok("Contact messages fetched", entries)))
}

/// DELETE /api/contact/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    state.contacts.delete(&id).await?;

    info!("{} deleted contact {}", claims.sub, id);
    Ok(Json(Envelope::empty(format!("Deleted contact {}", id))))
}
