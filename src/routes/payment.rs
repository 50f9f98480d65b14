use actix_web::{web, HttpResponse};
use bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::mongo::{BOOKINGS_COLLECTION, DATABASE};
use crate::errors::ApiError;
use crate::models::booking::{Booking, PaymentStatus};
use crate::services::email_service::EmailService;
use crate::services::payment::interface::{CallbackIdentifiers, GatewayOperations};
use crate::services::razorpay::provider::RazorpayProvider;

#[derive(Deserialize)]
pub struct CreateOrderInput {
    booking_id: String,
}

#[derive(Serialize)]
struct OrderCreated {
    order_id: String,
    amount: i64,
    currency: String,
    key_id: String,
    booking_id: String,
}

#[derive(Deserialize)]
pub struct VerifyPaymentInput {
    booking_id: String,
    razorpay_order_id: String,
    razorpay_payment_id: String,
    razorpay_signature: String,
}

#[derive(Deserialize)]
pub struct PaymentFailedInput {
    booking_id: String,
    #[serde(default)]
    reason: Option<String>,
}

fn bookings(client: &Client) -> mongodb::Collection<Booking> {
    client.database(DATABASE).collection(BOOKINGS_COLLECTION)
}

/*
    POST /api/payments/order

    Creates the gateway order for a pending booking. The returned order id
    is the client's checkout handle.
*/
pub async fn create_order(
    data: web::Data<Arc<Client>>,
    gateway: web::Data<RazorpayProvider>,
    input: web::Json<CreateOrderInput>,
) -> Result<HttpResponse, ApiError> {
    let booking_id =
        ObjectId::parse_str(&input.booking_id).map_err(|_| ApiError::InvalidId)?;
    let client = data.into_inner();
    let collection = bookings(&client);

    let booking = collection
        .find_one(doc! { "_id": booking_id })
        .await?
        .ok_or(ApiError::NotFound("booking"))?;

    if booking.payment_status != PaymentStatus::Pending {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "error": "booking is not awaiting payment",
            "payment_status": booking.payment_status,
        })));
    }

    // Gateway amounts are in paise
    let amount_paise = (booking.final_amount * 100.0).round() as i64;
    let order = gateway
        .create_order(amount_paise, &input.booking_id)
        .await
        .map_err(|e| ApiError::Gateway(e.to_string()))?;

    collection
        .update_one(
            doc! { "_id": booking_id },
            doc! { "$set": {
                "payment_order_id": &order.order_id,
                "updated_at": bson::DateTime::now(),
            }},
        )
        .await?;

    log::info!(
        "Created gateway order {} for booking {}",
        order.order_id,
        input.booking_id
    );

    Ok(HttpResponse::Ok().json(OrderCreated {
        order_id: order.order_id,
        amount: order.amount,
        currency: order.currency,
        key_id: gateway.key_id().to_string(),
        booking_id: input.into_inner().booking_id,
    }))
}

/*
    POST /api/payments/verify

    Success callback from the gateway. Verification happens before any
    database access; a booking only ever moves pending -> paid through the
    single compare-and-set update below, so duplicate deliveries are
    acknowledged without firing a second round of notifications.
*/
pub async fn verify_payment(
    data: web::Data<Arc<Client>>,
    gateway: web::Data<RazorpayProvider>,
    mailer: web::Data<EmailService>,
    input: web::Json<VerifyPaymentInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();

    let verified = gateway.verify_callback(&CallbackIdentifiers {
        order_id: &input.razorpay_order_id,
        payment_id: &input.razorpay_payment_id,
        signature: &input.razorpay_signature,
    });
    if !verified {
        // The booking stays pending; the provider may retry with a valid
        // signature, and cancellation is an administrative decision.
        log::warn!(
            "Rejected payment callback with bad signature for booking {}",
            input.booking_id
        );
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "verified": false,
            "message": "signature verification failed",
        })));
    }

    let booking_id =
        ObjectId::parse_str(&input.booking_id).map_err(|_| ApiError::InvalidId)?;
    let client = data.into_inner();
    let collection = bookings(&client);

    let transitioned = collection
        .find_one_and_update(
            doc! {
                "_id": booking_id,
                "payment_status": PaymentStatus::Pending.as_str(),
                "payment_order_id": &input.razorpay_order_id,
            },
            doc! { "$set": {
                "payment_status": PaymentStatus::Paid.as_str(),
                "payment_id": &input.razorpay_payment_id,
                "updated_at": bson::DateTime::now(),
            }},
        )
        .return_document(ReturnDocument::After)
        .await?;

    if let Some(booking) = transitioned {
        log::info!(
            "Booking {} marked paid (payment {})",
            input.booking_id,
            input.razorpay_payment_id
        );
        // Notifications ride on the transition itself, never on mere receipt
        mailer.notify_payment_confirmed(&booking);
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "verified": true,
            "payment_status": PaymentStatus::Paid,
        })));
    }

    // No transition: either a duplicate delivery, an unknown booking, or a
    // callback for the wrong order.
    let booking = collection
        .find_one(doc! { "_id": booking_id })
        .await?
        .ok_or(ApiError::NotFound("booking"))?;

    match booking.payment_status {
        PaymentStatus::Paid => {
            // Idempotent no-op for redelivered callbacks
            log::info!(
                "Duplicate payment callback for already-paid booking {}",
                input.booking_id
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "verified": true,
                "payment_status": PaymentStatus::Paid,
            })))
        }
        PaymentStatus::Pending => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "verified": false,
            "message": "callback does not match the booking's gateway order",
        }))),
        status => Ok(HttpResponse::Conflict().json(serde_json::json!({
            "verified": true,
            "message": "booking is not payable",
            "payment_status": status,
        }))),
    }
}

/*
    POST /api/payments/failed

    Gateway-reported failure. Only a pending booking can move to failed; a
    paid booking is never clawed back by a late failure report.
*/
pub async fn payment_failed(
    data: web::Data<Arc<Client>>,
    input: web::Json<PaymentFailedInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let booking_id =
        ObjectId::parse_str(&input.booking_id).map_err(|_| ApiError::InvalidId)?;
    let client = data.into_inner();
    let collection = bookings(&client);

    let transitioned = collection
        .find_one_and_update(
            doc! {
                "_id": booking_id,
                "payment_status": PaymentStatus::Pending.as_str(),
            },
            doc! { "$set": {
                "payment_status": PaymentStatus::Failed.as_str(),
                "updated_at": bson::DateTime::now(),
            }},
        )
        .return_document(ReturnDocument::After)
        .await?;

    match transitioned {
        Some(_) => {
            log::info!(
                "Booking {} marked failed ({})",
                input.booking_id,
                input.reason.as_deref().unwrap_or("no reason given")
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "payment_status": PaymentStatus::Failed,
            })))
        }
        None => {
            let booking = collection
                .find_one(doc! { "_id": booking_id })
                .await?
                .ok_or(ApiError::NotFound("booking"))?;
            Ok(HttpResponse::Conflict().json(serde_json::json!({
                "error": "booking is not in a failable state",
                "payment_status": booking.payment_status,
            })))
        }
    }
}
