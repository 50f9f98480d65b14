use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Guests at or above this age are charged and counted as adults.
pub const CHILD_AGE_LIMIT: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Room,
    Yoga,
    Transport,
    Adventure,
    Service,
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingCategory {
    Accommodation,
    Activity,
    Transport,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// String form matching the serialized document field, used in CAS filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    /// Legal transitions: pending -> paid, pending -> failed, paid -> refunded.
    /// Everything else is rejected; a repeated pending -> paid delivery is
    /// handled upstream as an idempotent no-op rather than a transition.
    pub fn can_transition(&self, to: PaymentStatus) -> bool {
        matches!(
            (self, to),
            (PaymentStatus::Pending, PaymentStatus::Paid)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
                | (PaymentStatus::Paid, PaymentStatus::Refunded)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Guest {
    pub name: String,
    pub age: u32,
    pub is_child: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl Guest {
    pub fn new(name: String, age: u32, gender: Option<String>) -> Self {
        Self {
            name,
            age,
            is_child: age < CHILD_AGE_LIMIT,
            gender,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub emergency_contact: String,
}

/// Per-category payload of a selected service. Tagged by category so every
/// variant carries its own strongly-typed fields instead of a free-form blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ServiceDetails {
    VehicleRental {
        #[serde(skip_serializing_if = "Option::is_none")]
        start_date: Option<chrono::DateTime<chrono::Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_date: Option<chrono::DateTime<chrono::Utc>>,
        with_driver: bool,
        #[serde(default)]
        driver_charge_per_day: f64,
    },
    Adventure {
        #[serde(skip_serializing_if = "Option::is_none")]
        service_date: Option<chrono::DateTime<chrono::Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Transport {
        pickup: bool,
        #[serde(rename = "drop")]
        drop_off: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        flight_number: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        arrival_time: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingUnit {
    PerPerson,
    PerDay,
    PerSession,
    FlatRate,
}

/// One selected priced unit contributing to a subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedService {
    pub service_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub unit: PricingUnit,
    pub line_total: f64,
    pub details: ServiceDetails,
}

/// Airport pickup/drop component of a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportInfo {
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

/// Independently stored per-category subtotals. `total()` must always equal
/// the arithmetic sum of the fields; the aggregator never writes a breakdown
/// that drifts from its own total.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceBreakdown {
    pub room_price: f64,
    pub food_price: f64,
    pub breakfast_price: f64,
    pub services_price: f64,
    pub transport_price: f64,
    pub yoga_price: f64,
}

impl PriceBreakdown {
    pub fn total(&self) -> f64 {
        self.room_price
            + self.food_price
            + self.breakfast_price
            + self.services_price
            + self.transport_price
            + self.yoga_price
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ObjectId>,
    pub booking_type: BookingType,
    pub booking_category: BookingCategory,
    pub check_in: DateTime,
    pub check_out: DateTime,
    pub guests: Vec<Guest>,
    pub total_guests: u32,
    pub adults: u32,
    pub children: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    pub selected_services: Vec<SelectedService>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yoga_session_id: Option<ObjectId>,
    #[serde(flatten)]
    pub breakdown: PriceBreakdown,
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    pub coupon_discount: f64,
    pub final_amount: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}
