use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distance and time thresholds after which an oil change is due.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInterval {
    pub distance_km: u32,
    pub months: u32,
}

impl ServiceInterval {
    pub fn new(distance_km: u32, months: u32) -> Self {
        Self {
            distance_km,
            months,
        }
    }
}

impl Default for ServiceInterval {
    fn default() -> Self {
        Self::new(10_000, 12)
    }
}

/// A tracked vehicle together with its service history snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub current_odometer_km: u32,
    pub last_service_odometer_km: u32,
    pub last_service_date: NaiveDate,
    pub service_interval: ServiceInterval,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(
        owner_id: Uuid,
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        last_service_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            brand: brand.into(),
            model: model.into(),
            year,
            current_odometer_km: 0,
            last_service_odometer_km: 0,
            last_service_date,
            service_interval: ServiceInterval::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_odometer(mut self, current_km: u32, last_service_km: u32) -> Self {
        self.current_odometer_km = current_km;
        self.last_service_odometer_km = last_service_km;
        self
    }

    pub fn with_interval(mut self, interval: ServiceInterval) -> Self {
        self.service_interval = interval;
        self
    }

    /// Human readable label, e.g. `2019 Toyota Corolla`.
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.year, self.brand, self.model)
    }

    /// Raises the current odometer to `odometer_km`; lower readings are ignored.
    pub fn advance_odometer(&mut self, odometer_km: u32) -> bool {
        if odometer_km > self.current_odometer_km {
            self.current_odometer_km = odometer_km;
            true
        } else {
            false
        }
    }

    pub fn record_service(&mut self, date: NaiveDate, odometer_km: u32) {
        self.last_service_date = date;
        self.last_service_odometer_km = odometer_km;
        self.current_odometer_km = odometer_km;
    }
}
