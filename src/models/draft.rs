use bson::{oid::ObjectId, DateTime};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::booking::{BookingType, ContactInfo, PricingUnit, ServiceDetails};

/// One selected priced unit as submitted by the client: room nights, a food
/// package, breakfast, a yoga program seat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub reference_id: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub unit: PricingUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuestInput {
    pub name: String,
    pub age: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSelection {
    pub service_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub unit: PricingUnit,
    pub details: ServiceDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportRequest {
    pub pickup: bool,
    #[serde(rename = "drop")]
    pub drop_off: bool,
    #[serde(default)]
    pub pickup_price: f64,
    #[serde(default)]
    pub drop_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<String>,
}

/// The client-assembled, not-yet-persisted set of selections. Immutable once
/// submitted; server-side totals are recomputed and the client's figures are
/// treated as advisory only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub booking_type: BookingType,
    pub check_in: chrono::DateTime<Utc>,
    pub check_out: chrono::DateTime<Utc>,
    pub guests: Vec<GuestInput>,
    pub adults: u32,
    pub children: u32,
    pub total_guests: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<LineItem>,
    #[serde(default)]
    pub food: Vec<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<LineItem>,
    #[serde(default)]
    pub selected_services: Vec<ServiceSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yoga_session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yoga: Option<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    /// Client-side figures, advisory only.
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub final_amount: f64,
    /// Draft-store session to clear on successful submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Draft document as held in the draft store, keyed by the client session.
/// Created on first selection, replaced wholesale on update, deleted on
/// successful submission or explicit abandonment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDraft {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub session_id: String,
    pub draft: BookingDraft,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}
