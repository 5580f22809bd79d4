//! Pricing and currency configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Currency and discount threshold settings for the pricing calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// ISO currency code reported on quotes.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Decimal digits of the currency's minor unit (0 for VND, 2 for USD).
    #[serde(default)]
    pub minor_unit_digits: u32,
    /// Nights from which the weekly discount applies.
    #[serde(default = "default_weekly_threshold")]
    pub weekly_threshold_nights: u32,
    /// Nights from which the monthly discount applies (takes precedence).
    #[serde(default = "default_monthly_threshold")]
    pub monthly_threshold_nights: u32,
    /// Dates served by the static holiday calendar.
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            minor_unit_digits: 0,
            weekly_threshold_nights: default_weekly_threshold(),
            monthly_threshold_nights: default_monthly_threshold(),
            holidays: Vec::new(),
        }
    }
}

fn default_currency() -> String {
    "VND".to_string()
}

fn default_weekly_threshold() -> u32 {
    7
}

fn default_monthly_threshold() -> u32 {
    28
}
