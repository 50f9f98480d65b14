use chrono::{DateTime, Utc};

use crate::errors::{ApiError, FieldError};
use crate::models::booking::{BookingCategory, BookingType, PriceBreakdown, PricingUnit, ServiceDetails};
use crate::models::coupon::CouponServiceType;
use crate::models::draft::{BookingDraft, LineItem, ServiceSelection};

const MILLIS_PER_DAY: i64 = 86_400_000;

pub struct PricingService;

impl PricingService {
    /// Chargeable day count for a rental or stay window: the wall-clock span
    /// rounded up to whole days, floored at one day. A same-day rental is one
    /// chargeable day.
    pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        let span_ms = end.timestamp_millis() - start.timestamp_millis();
        let days = (span_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
        days.max(1)
    }

    /// Line total for a simple item: unit price x quantity x duration
    /// multiplier. Only per-day items pick up the stay duration; per-person
    /// quantities already count heads.
    pub fn line_total(item: &LineItem, stay_days: i64) -> f64 {
        let multiplier = match item.unit {
            PricingUnit::PerDay => stay_days as f64,
            PricingUnit::PerPerson | PricingUnit::PerSession | PricingUnit::FlatRate => 1.0,
        };
        item.unit_price * item.quantity as f64 * multiplier
    }

    /// Line total for a selected service. Vehicle rentals multiply by the
    /// computed rental-day count and add the per-day driver surcharge when
    /// requested; a rental with unset dates is rejected here rather than
    /// silently defaulted, since defaulting would undercharge.
    pub fn service_line_total(index: usize, selection: &ServiceSelection) -> Result<f64, FieldError> {
        match &selection.details {
            ServiceDetails::VehicleRental {
                start_date,
                end_date,
                with_driver,
                driver_charge_per_day,
            } => {
                let (start, end) = match (start_date, end_date) {
                    (Some(start), Some(end)) => (*start, *end),
                    _ => {
                        return Err(FieldError::new(
                            format!("selected_services[{}].details", index),
                            "vehicle rental requires start_date and end_date",
                        ))
                    }
                };
                let days = Self::rental_days(start, end);
                let per_day = if *with_driver {
                    selection.unit_price + driver_charge_per_day
                } else {
                    selection.unit_price
                };
                Ok(per_day * days as f64 * selection.quantity as f64)
            }
            ServiceDetails::Adventure { .. } | ServiceDetails::Transport { .. } => {
                Ok(selection.unit_price * selection.quantity as f64)
            }
        }
    }

    /// Deterministically aggregate every selected line item into per-category
    /// subtotals. An empty category is a zero subtotal, not an error. The
    /// returned breakdown's `total()` is the booking's pre-discount total.
    pub fn compute_breakdown(draft: &BookingDraft) -> Result<PriceBreakdown, ApiError> {
        let stay_days = Self::rental_days(draft.check_in, draft.check_out);

        let mut breakdown = PriceBreakdown::default();

        if let Some(room) = &draft.room {
            breakdown.room_price = Self::line_total(room, stay_days);
        }
        breakdown.food_price = draft
            .food
            .iter()
            .map(|item| Self::line_total(item, stay_days))
            .sum();
        if let Some(breakfast) = &draft.breakfast {
            breakdown.breakfast_price = Self::line_total(breakfast, stay_days);
        }
        if let Some(yoga) = &draft.yoga {
            breakdown.yoga_price = Self::line_total(yoga, stay_days);
        }

        let mut errors = Vec::new();
        for (index, selection) in draft.selected_services.iter().enumerate() {
            match Self::service_line_total(index, selection) {
                Ok(total) => match selection.details {
                    ServiceDetails::Transport { .. } => breakdown.transport_price += total,
                    _ => breakdown.services_price += total,
                },
                Err(err) => errors.push(err),
            }
        }
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        if let Some(transport) = &draft.transport {
            if transport.pickup {
                breakdown.transport_price += transport.pickup_price;
            }
            if transport.drop_off {
                breakdown.transport_price += transport.drop_price;
            }
        }

        Ok(breakdown)
    }

    /// Apply an externally-validated coupon discount. The discount is clamped
    /// to the order total and the final amount is floored at zero. Returns
    /// `(applied_discount, final_amount)`.
    pub fn apply_coupon(total_amount: f64, discount: f64) -> (f64, f64) {
        let applied = discount.clamp(0.0, total_amount);
        let final_amount = (total_amount - applied).max(0.0);
        (applied, final_amount)
    }

    /// Coupon service type for the draft: any vehicle rental line makes the
    /// order a rental order, otherwise it counts as an adventure order.
    pub fn coupon_service_type(draft: &BookingDraft) -> CouponServiceType {
        let has_rental = draft
            .selected_services
            .iter()
            .any(|s| matches!(s.details, ServiceDetails::VehicleRental { .. }));
        if has_rental {
            CouponServiceType::Rental
        } else {
            CouponServiceType::Adventure
        }
    }

    /// Booking category from the categories actually present in the draft.
    pub fn infer_category(draft: &BookingDraft) -> BookingCategory {
        let accommodation = draft.room.is_some();
        let activity = draft.yoga.is_some()
            || draft
                .selected_services
                .iter()
                .any(|s| !matches!(s.details, ServiceDetails::Transport { .. }));
        let transport = draft.transport.is_some()
            || draft
                .selected_services
                .iter()
                .any(|s| matches!(s.details, ServiceDetails::Transport { .. }));

        match (accommodation, activity, transport) {
            (true, false, false) => BookingCategory::Accommodation,
            (false, true, false) => BookingCategory::Activity,
            (false, false, true) => BookingCategory::Transport,
            (false, false, false) => match draft.booking_type {
                BookingType::Room => BookingCategory::Accommodation,
                BookingType::Yoga | BookingType::Adventure | BookingType::Service => {
                    BookingCategory::Activity
                }
                BookingType::Transport => BookingCategory::Transport,
                BookingType::Package => BookingCategory::Mixed,
            },
            _ => BookingCategory::Mixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::ContactInfo;
    use crate::models::draft::{GuestInput, TransportRequest};
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn base_draft() -> BookingDraft {
        BookingDraft {
            user_id: None,
            booking_type: BookingType::Room,
            check_in: date(2025, 3, 1),
            check_out: date(2025, 3, 4),
            guests: vec![GuestInput {
                name: "Asha".into(),
                age: 30,
                gender: None,
            }],
            adults: 1,
            children: 0,
            total_guests: 1,
            contact: Some(ContactInfo {
                name: "Asha".into(),
                email: "asha@example.com".into(),
                phone: "9400000000".into(),
                address: "Varkala".into(),
                emergency_contact: "9400000001".into(),
            }),
            room: None,
            food: vec![],
            breakfast: None,
            selected_services: vec![],
            transport: None,
            yoga_session_id: None,
            yoga: None,
            coupon_code: None,
            total_amount: 0.0,
            final_amount: 0.0,
            session_id: None,
        }
    }

    fn rental_selection(start: DateTime<Utc>, end: DateTime<Utc>) -> ServiceSelection {
        ServiceSelection {
            service_id: "scooter-1".into(),
            quantity: 1,
            unit_price: 800.0,
            unit: PricingUnit::PerDay,
            details: ServiceDetails::VehicleRental {
                start_date: Some(start),
                end_date: Some(end),
                with_driver: true,
                driver_charge_per_day: 300.0,
            },
        }
    }

    #[test]
    fn same_day_rental_is_one_day() {
        assert_eq!(PricingService::rental_days(date(2025, 1, 1), date(2025, 1, 1)), 1);
    }

    #[test]
    fn two_night_rental_is_two_days() {
        assert_eq!(PricingService::rental_days(date(2025, 1, 1), date(2025, 1, 3)), 2);
    }

    #[test]
    fn partial_day_rounds_up() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 2, 11, 0, 0).unwrap();
        assert_eq!(PricingService::rental_days(start, end), 2);
    }

    #[test]
    fn vehicle_with_driver_three_days() {
        // (800 + 300) x 3 days x 1 vehicle
        let selection = rental_selection(date(2025, 3, 1), date(2025, 3, 4));
        let total = PricingService::service_line_total(0, &selection).unwrap();
        assert_eq!(total, 3300.0);
    }

    #[test]
    fn vehicle_without_dates_is_rejected_not_defaulted() {
        let selection = ServiceSelection {
            details: ServiceDetails::VehicleRental {
                start_date: None,
                end_date: Some(date(2025, 3, 4)),
                with_driver: false,
                driver_charge_per_day: 0.0,
            },
            ..rental_selection(date(2025, 3, 1), date(2025, 3, 4))
        };
        let err = PricingService::service_line_total(2, &selection).unwrap_err();
        assert_eq!(err.field, "selected_services[2].details");
    }

    #[test]
    fn empty_categories_yield_zero_subtotals() {
        let breakdown = PricingService::compute_breakdown(&base_draft()).unwrap();
        assert_eq!(breakdown, PriceBreakdown::default());
        assert_eq!(breakdown.total(), 0.0);
    }

    #[test]
    fn total_equals_sum_of_category_subtotals() {
        let mut draft = base_draft();
        draft.room = Some(LineItem {
            reference_id: "room-12".into(),
            unit_price: 1500.0,
            quantity: 1,
            unit: PricingUnit::PerDay,
        });
        draft.food = vec![LineItem {
            reference_id: "veg-meal".into(),
            unit_price: 300.0,
            quantity: 3,
            unit: PricingUnit::PerPerson,
        }];
        draft.breakfast = Some(LineItem {
            reference_id: "breakfast".into(),
            unit_price: 150.0,
            quantity: 1,
            unit: PricingUnit::PerDay,
        });
        draft.yoga = Some(LineItem {
            reference_id: "sunrise-hatha".into(),
            unit_price: 500.0,
            quantity: 2,
            unit: PricingUnit::PerSession,
        });
        draft.selected_services = vec![rental_selection(date(2025, 3, 1), date(2025, 3, 4))];
        draft.transport = Some(TransportRequest {
            pickup: true,
            drop_off: false,
            pickup_price: 1200.0,
            drop_price: 1200.0,
            flight_number: Some("6E-531".into()),
            arrival_time: None,
            pickup_location: None,
        });

        let breakdown = PricingService::compute_breakdown(&draft).unwrap();
        // 3 chargeable days for the 1st-4th window
        assert_eq!(breakdown.room_price, 4500.0);
        assert_eq!(breakdown.food_price, 900.0);
        assert_eq!(breakdown.breakfast_price, 450.0);
        assert_eq!(breakdown.yoga_price, 1000.0);
        assert_eq!(breakdown.services_price, 3300.0);
        assert_eq!(breakdown.transport_price, 1200.0);
        assert_eq!(
            breakdown.total(),
            breakdown.room_price
                + breakdown.food_price
                + breakdown.breakfast_price
                + breakdown.services_price
                + breakdown.transport_price
                + breakdown.yoga_price
        );
        assert_eq!(breakdown.total(), 11350.0);
    }

    #[test]
    fn coupon_discount_applies_and_floors_at_zero() {
        assert_eq!(PricingService::apply_coupon(3300.0, 500.0), (500.0, 2800.0));
        // Discount can never exceed the total or push the final negative
        assert_eq!(PricingService::apply_coupon(400.0, 500.0), (400.0, 0.0));
        assert_eq!(PricingService::apply_coupon(0.0, 500.0), (0.0, 0.0));
    }

    #[test]
    fn rental_lines_drive_coupon_service_type() {
        let mut draft = base_draft();
        assert_eq!(
            PricingService::coupon_service_type(&draft),
            CouponServiceType::Adventure
        );
        draft.selected_services = vec![rental_selection(date(2025, 3, 1), date(2025, 3, 2))];
        assert_eq!(
            PricingService::coupon_service_type(&draft),
            CouponServiceType::Rental
        );
    }

    #[test]
    fn mixed_selection_infers_mixed_category() {
        let mut draft = base_draft();
        assert_eq!(PricingService::infer_category(&draft), BookingCategory::Accommodation);

        draft.room = Some(LineItem {
            reference_id: "room-12".into(),
            unit_price: 1500.0,
            quantity: 1,
            unit: PricingUnit::PerDay,
        });
        draft.transport = Some(TransportRequest {
            pickup: true,
            drop_off: true,
            pickup_price: 1200.0,
            drop_price: 1200.0,
            flight_number: None,
            arrival_time: None,
            pickup_location: None,
        });
        assert_eq!(PricingService::infer_category(&draft), BookingCategory::Mixed);
    }
}
