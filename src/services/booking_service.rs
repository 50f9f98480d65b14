use bson::oid::ObjectId;
use chrono::Duration;

use crate::errors::{ApiError, FieldError};
use crate::models::booking::{
    Booking, BookingStatus, BookingType, Guest, PaymentStatus, SelectedService, ServiceDetails,
    TransportInfo,
};
use crate::models::coupon::AppliedCoupon;
use crate::models::draft::BookingDraft;
use crate::services::pricing_service::PricingService;

pub struct BookingService;

impl BookingService {
    /// Validate a submitted draft. Every failing field is reported in one
    /// pass; nothing is persisted unless this comes back clean.
    pub fn validate_draft(draft: &BookingDraft) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if draft.check_in > draft.check_out {
            errors.push(FieldError::new(
                "check_out",
                "check_out must not precede check_in",
            ));
        }

        if draft.guests.is_empty() {
            errors.push(FieldError::new("guests", "guest list must not be empty"));
        }
        if draft.adults < 1 {
            errors.push(FieldError::new("adults", "at least one adult is required"));
        }
        if draft.adults + draft.children != draft.total_guests
            || draft.total_guests as usize != draft.guests.len()
        {
            errors.push(FieldError::new(
                "total_guests",
                "adults + children must equal total_guests and the guest list length",
            ));
        }

        match &draft.user_id {
            None => {
                if draft.contact.is_none() {
                    errors.push(FieldError::new(
                        "contact",
                        "contact details are required when no account is attached",
                    ));
                }
            }
            Some(id) => {
                if ObjectId::parse_str(id).is_err() {
                    errors.push(FieldError::new("user_id", "invalid user id"));
                }
            }
        }

        if let Some(id) = &draft.yoga_session_id {
            if ObjectId::parse_str(id).is_err() {
                errors.push(FieldError::new("yoga_session_id", "invalid yoga session id"));
            }
        }

        if let Some(room) = &draft.room {
            if room.quantity == 0 {
                errors.push(FieldError::new("room.quantity", "quantity must be at least 1"));
            }
        }
        for (index, item) in draft.food.iter().enumerate() {
            if item.quantity == 0 {
                errors.push(FieldError::new(
                    format!("food[{}].quantity", index),
                    "quantity must be at least 1",
                ));
            }
        }

        for (index, selection) in draft.selected_services.iter().enumerate() {
            if selection.quantity == 0 {
                errors.push(FieldError::new(
                    format!("selected_services[{}].quantity", index),
                    "quantity must be at least 1",
                ));
            }
            match &selection.details {
                ServiceDetails::VehicleRental {
                    start_date,
                    end_date,
                    ..
                } => match (start_date, end_date) {
                    (Some(start), Some(end)) => {
                        if start >= end {
                            errors.push(FieldError::new(
                                format!("selected_services[{}].details.end_date", index),
                                "rental end_date must come after start_date",
                            ));
                        }
                    }
                    _ => errors.push(FieldError::new(
                        format!("selected_services[{}].details", index),
                        "vehicle rental requires start_date and end_date",
                    )),
                },
                ServiceDetails::Adventure { service_date, .. } => {
                    if service_date.is_none() {
                        errors.push(FieldError::new(
                            format!("selected_services[{}].details.service_date", index),
                            "adventure services require a service_date",
                        ));
                    }
                }
                ServiceDetails::Transport { .. } => {}
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Build the persistable booking from a validated draft. Amounts are
    /// recomputed server-side; the client's totals are ignored. The booking
    /// starts life as pending/pending and never touches inventory.
    pub fn build_booking(
        draft: &BookingDraft,
        coupon: Option<&AppliedCoupon>,
    ) -> Result<Booking, ApiError> {
        Self::validate_draft(draft).map_err(ApiError::Validation)?;

        let breakdown = PricingService::compute_breakdown(draft)?;
        let total_amount = breakdown.total();
        let (coupon_discount, final_amount) = match coupon {
            Some(applied) => PricingService::apply_coupon(total_amount, applied.discount),
            None => (0.0, total_amount),
        };

        let guests: Vec<Guest> = draft
            .guests
            .iter()
            .map(|g| Guest::new(g.name.clone(), g.age, g.gender.clone()))
            .collect();

        let mut selected_services = Vec::with_capacity(draft.selected_services.len());
        for (index, selection) in draft.selected_services.iter().enumerate() {
            let line_total = PricingService::service_line_total(index, selection)
                .map_err(|err| ApiError::Validation(vec![err]))?;
            selected_services.push(SelectedService {
                service_id: selection.service_id.clone(),
                quantity: selection.quantity,
                unit_price: selection.unit_price,
                unit: selection.unit,
                line_total,
                details: selection.details.clone(),
            });
        }

        let transport = draft.transport.as_ref().map(|t| TransportInfo {
            pickup: t.pickup,
            drop_off: t.drop_off,
            pickup_price: t.pickup_price,
            drop_price: t.drop_price,
            flight_number: t.flight_number.clone(),
            arrival_time: t.arrival_time.clone(),
            pickup_location: t.pickup_location.clone(),
        });

        // Non-lodging bookings carry a service date in check_in; check_out is
        // normalized to a nominal end one day later.
        let (check_in, check_out) = match draft.booking_type {
            BookingType::Room | BookingType::Package => (draft.check_in, draft.check_out),
            _ => (draft.check_in, draft.check_in + Duration::days(1)),
        };

        let user_id = draft
            .user_id
            .as_deref()
            .map(ObjectId::parse_str)
            .transpose()
            .map_err(|_| ApiError::InvalidId)?;
        let yoga_session_id = draft
            .yoga_session_id
            .as_deref()
            .map(ObjectId::parse_str)
            .transpose()
            .map_err(|_| ApiError::InvalidId)?;

        let now = bson::DateTime::now();

        Ok(Booking {
            id: None,
            user_id,
            booking_type: draft.booking_type,
            booking_category: PricingService::infer_category(draft),
            check_in: bson::DateTime::from_chrono(check_in),
            check_out: bson::DateTime::from_chrono(check_out),
            total_guests: guests.len() as u32,
            guests,
            adults: draft.adults,
            children: draft.children,
            contact: draft.contact.clone(),
            selected_services,
            transport,
            yoga_session_id,
            breakdown,
            total_amount,
            coupon_code: coupon.map(|c| c.code.clone()),
            coupon_discount,
            final_amount,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_order_id: None,
            payment_id: None,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }
}
