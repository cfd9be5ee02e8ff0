//! Delivery schedule calculation.
//!
//! Pure date arithmetic: given the local timestamp an order was placed at and
//! the delivery address kind, produce the four-stage milestone sequence shown
//! to the customer. No I/O, no clock reads — callers pass the timestamp in.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::models::{AddressKind, Milestone, MilestoneLabel};

/// Orders placed at or after this local hour roll to the next day.
const CUTOFF_HOUR: u32 = 19;

/// Compute the four delivery milestones for an order.
///
/// 1. `Order Confirmed` — the order date, or the next day for orders placed
///    at 7 PM or later.
/// 2. `Shipped` — one day after confirmation.
/// 3. `Out for Delivery` — one day after shipping; `Work` addresses skip
///    weekends forward to Monday.
/// 4. `Delivery` — same date as out-for-delivery.
pub fn delivery_schedule(placed_at: NaiveDateTime, kind: AddressKind) -> Vec<Milestone> {
    let confirmed = if placed_at.hour() >= CUTOFF_HOUR {
        placed_at.date() + Duration::days(1)
    } else {
        placed_at.date()
    };

    let shipped = confirmed + Duration::days(1);

    let mut out_for_delivery = shipped + Duration::days(1);
    if kind == AddressKind::Work {
        out_for_delivery = next_business_day(out_for_delivery);
    }

    vec![
        Milestone {
            label: MilestoneLabel::OrderConfirmed,
            date: format_milestone_date(confirmed),
        },
        Milestone {
            label: MilestoneLabel::Shipped,
            date: format_milestone_date(shipped),
        },
        Milestone {
            label: MilestoneLabel::OutForDelivery,
            date: format_milestone_date(out_for_delivery),
        },
        Milestone {
            label: MilestoneLabel::Delivery,
            date: format_milestone_date(out_for_delivery),
        },
    ]
}

/// Weekend dates advance to the following Monday; weekdays pass through.
fn next_business_day(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// Format as `"Tue, 3rd Jun"`.
fn format_milestone_date(date: NaiveDate) -> String {
    format!(
        "{}, {}{} {}",
        date.format("%a"),
        date.day(),
        day_suffix(date.day()),
        date.format("%b")
    )
}

/// Ordinal suffix for a day of month. 11, 12 and 13 take "th" despite their
/// final digit.
fn day_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    }
}
