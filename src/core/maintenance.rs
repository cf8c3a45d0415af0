//! Oil-change due status derived from a vehicle snapshot.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::garage::{calendar, Vehicle};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Snapshot of how far a vehicle is from its next service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceStatus {
    pub last_service_date: NaiveDate,
    pub last_service_odometer_km: u32,
    pub next_service_odometer_km: i64,
    pub next_service_date: NaiveDate,
    /// Negative once the service distance has been exceeded.
    pub distance_remaining_km: i64,
    /// Negative once the service date has passed.
    pub days_remaining: i64,
    pub overdue_by_distance: bool,
    pub overdue_by_time: bool,
}

impl MaintenanceStatus {
    pub fn is_overdue(&self) -> bool {
        self.overdue_by_distance || self.overdue_by_time
    }
}

/// Date of the next service, `months` calendar months after `last_service_date`.
pub fn next_service_date(last_service_date: NaiveDate, months: u32) -> NaiveDate {
    calendar::add_months(last_service_date, months)
}

/// Evaluates the service status of `vehicle` as of `now`.
///
/// The next service date is taken at midnight UTC, and the day count is the
/// ceiling of the fractional days left until then.
pub fn evaluate_status(vehicle: &Vehicle, now: DateTime<Utc>) -> MaintenanceStatus {
    let interval = vehicle.service_interval;
    let next_service_odometer_km =
        i64::from(vehicle.last_service_odometer_km) + i64::from(interval.distance_km);
    let distance_remaining_km = next_service_odometer_km - i64::from(vehicle.current_odometer_km);

    let next_service_date = next_service_date(vehicle.last_service_date, interval.months);
    let due_at = next_service_date.and_time(NaiveTime::MIN).and_utc();
    let millis_left = (due_at - now).num_milliseconds();
    let days_remaining = ceil_div(millis_left, MILLIS_PER_DAY);

    MaintenanceStatus {
        last_service_date: vehicle.last_service_date,
        last_service_odometer_km: vehicle.last_service_odometer_km,
        next_service_odometer_km,
        next_service_date,
        distance_remaining_km,
        days_remaining,
        overdue_by_distance: distance_remaining_km <= 0,
        overdue_by_time: due_at < now,
    }
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    let quotient = value.div_euclid(divisor);
    if value.rem_euclid(divisor) == 0 {
        quotient
    } else {
        quotient + 1
    }
}
