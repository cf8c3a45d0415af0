use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single fill-up recorded against a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelEntry {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub station_name: String,
    pub odometer_km: u32,
    pub litres: f64,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_litre: Option<f64>,
    pub is_full_tank: bool,
    /// Litres per 100 km since the previous full tank, fixed at insert time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_l_per_100km: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl FuelEntry {
    pub fn new(
        vehicle_id: Uuid,
        date: NaiveDate,
        odometer_km: u32,
        litres: f64,
        total_price: f64,
        is_full_tank: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            date,
            station_name: String::new(),
            odometer_km,
            litres,
            total_price,
            price_per_litre: None,
            is_full_tank,
            consumption_l_per_100km: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station_name = station.into();
        self
    }
}
