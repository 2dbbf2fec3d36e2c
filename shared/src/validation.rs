//! Validation utilities for weather sources and request parameters

use crate::types::MAX_HORIZON;

/// Fill value NASA POWER writes for missing measurements
pub const POWER_FILL_VALUE: f64 = -999.0;

/// Longest location label accepted from a request
pub const MAX_LOCATION_LABEL_LEN: usize = 64;

// ============================================================================
// Weather Source Validations
// ============================================================================

/// Check if a measurement is the NASA POWER missing-data marker
pub fn is_fill_value(value: f64) -> bool {
    (value - POWER_FILL_VALUE).abs() < 1e-6
}

/// Validate relative humidity is a percentage
pub fn validate_humidity(relative_humidity: f64) -> Result<(), &'static str> {
    if !(0.0..=100.0).contains(&relative_humidity) {
        return Err("Relative humidity must be between 0 and 100");
    }
    Ok(())
}

/// Validate daily precipitation is non-negative
pub fn validate_precipitation(precipitation_mm: f64) -> Result<(), &'static str> {
    if precipitation_mm < 0.0 || !precipitation_mm.is_finite() {
        return Err("Precipitation must be a non-negative number");
    }
    Ok(())
}

/// Validate a daily mean temperature is physically plausible
pub fn validate_temperature(temperature_celsius: f64) -> Result<(), &'static str> {
    if !(-60.0..=60.0).contains(&temperature_celsius) {
        return Err("Temperature must be between -60 and 60 °C");
    }
    Ok(())
}

// ============================================================================
// Request Validations
// ============================================================================

/// Validate a configured horizon
pub fn validate_horizon(horizon: u32) -> Result<(), &'static str> {
    if horizon == 0 || horizon > MAX_HORIZON {
        return Err("Horizon must be between 1 and 60 days");
    }
    Ok(())
}

/// Validate a raw location label before canonicalization
pub fn validate_location_label(label: &str) -> Result<(), &'static str> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err("Location is required");
    }
    if trimmed.len() > MAX_LOCATION_LABEL_LEN {
        return Err("Location is too long");
    }
    Ok(())
}
