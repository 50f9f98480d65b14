use actix_web::{web, HttpResponse};
use bson::{doc, oid::ObjectId};
use mongodb::Client;
use serde::Serialize;
use std::sync::Arc;

use crate::db::mongo::{BOOKINGS_COLLECTION, DATABASE, DRAFTS_COLLECTION};
use crate::errors::ApiError;
use crate::models::booking::Booking;
use crate::models::draft::{BookingDraft, StoredDraft};
use crate::services::booking_service::BookingService;
use crate::services::coupon_service::CouponService;
use crate::services::email_service::EmailService;
use crate::services::pricing_service::PricingService;

#[derive(Serialize)]
struct BookingCreated {
    booking_id: String,
    status: &'static str,
    payment_status: &'static str,
    total_amount: f64,
    coupon_discount: f64,
    final_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    coupon_message: Option<String>,
}

/*
    POST /api/bookings/public
*/
pub async fn create_public_booking(
    data: web::Data<Arc<Client>>,
    coupons: web::Data<CouponService>,
    mailer: web::Data<EmailService>,
    input: web::Json<BookingDraft>,
) -> Result<HttpResponse, ApiError> {
    let draft = input.into_inner();
    let client = data.into_inner();

    BookingService::validate_draft(&draft).map_err(ApiError::Validation)?;

    // Coupon validation is non-fatal: an unknown or expired code surfaces a
    // message and the booking proceeds without a discount.
    let mut coupon_message = None;
    let mut applied = None;
    if let Some(code) = &draft.coupon_code {
        let order_value = PricingService::compute_breakdown(&draft)?.total();
        let service_type = PricingService::coupon_service_type(&draft);
        let phone = draft.contact.as_ref().map(|c| c.phone.as_str());

        match coupons.validate(code, service_type, order_value, phone).await {
            Ok(coupon) => applied = Some(coupon),
            Err(err) => {
                log::warn!("Coupon '{}' not applied: {}", code, err);
                coupon_message = Some(err.to_string());
            }
        }
    }

    let booking = BookingService::build_booking(&draft, applied.as_ref())?;

    let collection: mongodb::Collection<Booking> =
        client.database(DATABASE).collection(BOOKINGS_COLLECTION);
    let result = collection.insert_one(&booking).await?;
    let booking_id = result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .unwrap_or_default();

    // The draft's lifecycle ends at successful submission
    if let Some(session_id) = &draft.session_id {
        let drafts: mongodb::Collection<StoredDraft> =
            client.database(DATABASE).collection(DRAFTS_COLLECTION);
        if let Err(err) = drafts.delete_one(doc! { "session_id": session_id }).await {
            log::warn!("Failed to clear draft for session {}: {}", session_id, err);
        }
    }

    let mut saved = booking;
    saved.id = result.inserted_id.as_object_id();
    mailer.send_booking_confirmation(&saved);

    Ok(HttpResponse::Created().json(BookingCreated {
        booking_id,
        status: "pending",
        payment_status: "pending",
        total_amount: saved.total_amount,
        coupon_discount: saved.coupon_discount,
        final_amount: saved.final_amount,
        coupon_message,
    }))
}

/*
    GET /api/bookings/{id}
*/
pub async fn get_by_id(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> Result<HttpResponse, ApiError> {
    let id = ObjectId::parse_str(path.into_inner().as_str()).map_err(|_| ApiError::InvalidId)?;

    let client = data.into_inner();
    let collection: mongodb::Collection<Booking> =
        client.database(DATABASE).collection(BOOKINGS_COLLECTION);

    match collection.find_one(doc! { "_id": id }).await? {
        Some(booking) => Ok(HttpResponse::Ok().json(booking)),
        None => Err(ApiError::NotFound("booking")),
    }
}
