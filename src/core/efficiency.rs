//! Fuel consumption between consecutive full-tank fill-ups.
//!
//! Every function here is pure. A `None` result means "not yet computable"
//! (missing predecessor, partial fill, odometer not advancing) and is never a
//! fault.

use crate::garage::FuelEntry;

/// Number of recent consumption values averaged when none is configured.
pub const DEFAULT_AVERAGE_WINDOW: usize = 5;

/// The inputs the calculator needs from a fill-up.
pub trait FillUp {
    fn odometer_km(&self) -> u32;
    fn litres(&self) -> f64;
    fn is_full_tank(&self) -> bool;
}

impl FillUp for FuelEntry {
    fn odometer_km(&self) -> u32 {
        self.odometer_km
    }

    fn litres(&self) -> f64 {
        self.litres
    }

    fn is_full_tank(&self) -> bool {
        self.is_full_tank
    }
}

/// Litres per 100 km driven between `prior` and `current`.
///
/// Both fill-ups must be full tanks and the odometer must have advanced.
pub fn compute_consumption<C, P>(current: &C, prior: Option<&P>) -> Option<f64>
where
    C: FillUp + ?Sized,
    P: FillUp + ?Sized,
{
    let prior = prior?;
    if !current.is_full_tank() || !prior.is_full_tank() {
        return None;
    }
    let distance = i64::from(current.odometer_km()) - i64::from(prior.odometer_km());
    if distance <= 0 {
        return None;
    }
    Some(current.litres() / distance as f64 * 100.0)
}

/// Picks the nearest full-tank predecessor by odometer (not by date).
///
/// Only entries with an odometer strictly below `odometer_km` qualify, so the
/// entry being inserted can never match itself.
pub fn select_prior_entry<'a, I>(entries: I, odometer_km: u32) -> Option<&'a FuelEntry>
where
    I: IntoIterator<Item = &'a FuelEntry>,
{
    entries
        .into_iter()
        .filter(|entry| entry.is_full_tank && entry.odometer_km < odometer_km)
        .max_by_key(|entry| entry.odometer_km)
}

/// The first `window` consumption values in `entries`.
///
/// `entries` is expected newest first; entries without a consumption value
/// are skipped rather than counted.
pub fn recent_consumption_values(entries: &[FuelEntry], window: usize) -> Vec<f64> {
    entries
        .iter()
        .filter_map(|entry| entry.consumption_l_per_100km)
        .take(window)
        .collect()
}

/// Mean of [`recent_consumption_values`], rounded to one decimal.
pub fn average_consumption(entries: &[FuelEntry], window: usize) -> Option<f64> {
    let values = recent_consumption_values(entries, window);
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Unit price for a fill-up: the supplied price when positive, otherwise derived from the total.
pub fn price_per_litre(total_price: f64, litres: f64, supplied: Option<f64>) -> Option<f64> {
    match supplied {
        Some(price) if price > 0.0 => Some(price),
        _ if litres > 0.0 => Some(total_price / litres),
        _ => None,
    }
}
