use actix_web::{web, HttpResponse};
use bson::doc;
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::{DATABASE, DRAFTS_COLLECTION};
use crate::errors::ApiError;
use crate::models::draft::{BookingDraft, StoredDraft};

fn drafts(client: &Client) -> mongodb::Collection<StoredDraft> {
    client.database(DATABASE).collection(DRAFTS_COLLECTION)
}

/*
    PUT /api/drafts/{session_id}

    Created on first selection, replaced wholesale on every update. The
    stored draft is a snapshot, never mutated in place.
*/
pub async fn upsert_draft(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    input: web::Json<BookingDraft>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let client = data.into_inner();

    let now = bson::DateTime::now();
    let draft_doc = bson::to_bson(&input.into_inner())?;
    let update = doc! {
        "$set": { "draft": draft_doc, "updated_at": now },
        "$setOnInsert": { "session_id": &session_id, "created_at": now },
    };

    drafts(&client)
        .update_one(doc! { "session_id": &session_id }, update)
        .upsert(true)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "session_id": session_id })))
}

/*
    GET /api/drafts/{session_id}
*/
pub async fn get_draft(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let client = data.into_inner();

    match drafts(&client)
        .find_one(doc! { "session_id": &session_id })
        .await?
    {
        Some(stored) => Ok(HttpResponse::Ok().json(stored.draft)),
        None => Err(ApiError::NotFound("draft")),
    }
}

/*
    DELETE /api/drafts/{session_id}

    Explicit abandonment. Deleting a draft that is already gone is a no-op.
*/
pub async fn delete_draft(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();
    let client = data.into_inner();

    drafts(&client)
        .delete_one(doc! { "session_id": &session_id })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
