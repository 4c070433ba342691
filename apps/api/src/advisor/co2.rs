//! kWh → CO2 conversion.

use crate::advisor::models::SavingsEstimate;

/// kg of CO2 emitted per kWh of grid electricity.
pub const EMISSION_FACTOR: f64 = 0.385;

/// Converts monthly kWh saved into CO2 savings.
///
/// `kwh_saved` and `co2_kg` are rounded to 2 places, `co2_tonnes` to 3, each
/// from the unrounded intermediate. Negative input passes through unchecked;
/// the manual-entry route is where negatives are rejected.
pub fn co2_estimate(kwh: f64) -> SavingsEstimate {
    let co2_kg = kwh * EMISSION_FACTOR;
    let co2_tonnes = co2_kg / 1000.0;
    SavingsEstimate {
        kwh_saved: round_to(kwh, 2),
        co2_kg: round_to(co2_kg, 2),
        co2_tonnes: round_to(co2_tonnes, 3),
    }
}

impl SavingsEstimate {
    /// Tonnes per year at the monthly rate, to 2 places.
    pub fn co2_tonnes_yearly(&self) -> f64 {
        round_to(self.co2_tonnes * 12.0, 2)
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
