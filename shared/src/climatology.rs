//! Historical weather index and climatology aggregation
//!
//! Climatology ignores the year: a calendar day is described by every
//! historical record sharing its month and day.

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use crate::models::{ClimateStats, Location, WeatherRecord};
use crate::types::ClimatologyWindow;

#[derive(Debug, Clone, Default)]
struct LocationHistory {
    by_day: HashMap<(u32, u32), Vec<WeatherRecord>>,
    record_count: usize,
}

/// Read-only daily weather history for every loaded location
#[derive(Debug, Clone, Default)]
pub struct WeatherStore {
    locations: HashMap<Location, LocationHistory>,
}

impl WeatherStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = WeatherRecord>) -> Self {
        let mut store = Self::new();
        store.extend(records);
        store
    }

    /// Index records under their own location
    pub fn extend(&mut self, records: impl IntoIterator<Item = WeatherRecord>) {
        for record in records {
            let history = self.locations.entry(record.location).or_default();
            history.record_count += 1;
            history
                .by_day
                .entry(record.calendar_day())
                .or_default()
                .push(record);
        }
    }

    /// Every record for `location` on this calendar day, across all years
    pub fn lookup(&self, location: Location, month: u32, day: u32) -> &[WeatherRecord] {
        self.locations
            .get(&location)
            .and_then(|history| history.by_day.get(&(month, day)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn record_count(&self, location: Location) -> usize {
        self.locations
            .get(&location)
            .map(|history| history.record_count)
            .unwrap_or(0)
    }

    pub fn has_location(&self, location: Location) -> bool {
        self.record_count(location) > 0
    }

    /// Locations with at least one record, in declaration order
    pub fn locations(&self) -> Vec<Location> {
        Location::ALL
            .into_iter()
            .filter(|location| self.has_location(*location))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.values().all(|history| history.record_count == 0)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Climate statistics over `window_days` days starting at `start_date`.
///
/// Returns `None` when no day of the window has any historical record.
pub fn aggregate(
    store: &WeatherStore,
    location: Location,
    start_date: NaiveDate,
    window_days: u32,
) -> Option<ClimateStats> {
    aggregate_window(store, location, &ClimatologyWindow::new(start_date, window_days))
}

pub fn aggregate_window(
    store: &WeatherStore,
    location: Location,
    window: &ClimatologyWindow,
) -> Option<ClimateStats> {
    let capacity = window.days as usize;
    let mut temps = Vec::with_capacity(capacity);
    let mut humidities = Vec::with_capacity(capacity);
    let mut rainfalls = Vec::with_capacity(capacity);

    for date in window.dates() {
        let matches = store.lookup(location, date.month(), date.day());
        if matches.is_empty() {
            continue;
        }

        let n = matches.len() as f64;
        temps.push(matches.iter().map(|r| r.temperature_mean).sum::<f64>() / n);
        humidities.push(matches.iter().map(|r| r.relative_humidity).sum::<f64>() / n);
        rainfalls.push(matches.iter().map(|r| r.precipitation).sum::<f64>() / n);
    }

    if temps.is_empty() {
        return None;
    }

    Some(ClimateStats {
        avg_temp: mean(&temps),
        max_temp: temps.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        avg_humidity: mean(&humidities),
        rainfall: rainfalls.iter().sum(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WINDOW_DAYS;
    use chrono::Days;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(d: NaiveDate, temp: f64, rh: f64, rain: f64) -> WeatherRecord {
        WeatherRecord::new(Location::Bengaluru, d, temp, rh, rain)
    }

    /// Two years of January with constant-per-year values
    fn two_januaries() -> WeatherStore {
        let mut records = Vec::new();
        for day in 1..=31 {
            records.push(record(date(2019, 1, day), 20.0, 60.0, 1.0));
            records.push(record(date(2020, 1, day), 24.0, 80.0, 3.0));
        }
        WeatherStore::from_records(records)
    }

    #[test]
    fn test_lookup_spans_years() {
        let store = two_januaries();
        let matches = store.lookup(Location::Bengaluru, 1, 15);

        assert_eq!(matches.len(), 2);
        assert!(matches.iter().any(|r| r.date().year() == 2019));
        assert!(matches.iter().any(|r| r.date().year() == 2020));
    }

    #[test]
    fn test_lookup_unknown_location_is_empty() {
        let store = two_januaries();
        assert!(store.lookup(Location::Ramanagara, 1, 15).is_empty());
        assert_eq!(store.record_count(Location::Ramanagara), 0);
        assert_eq!(store.locations(), vec![Location::Bengaluru]);
    }

    #[test]
    fn test_rainfall_is_summed_and_temperature_averaged() {
        let store = two_januaries();
        let stats = aggregate(&store, Location::Bengaluru, date(2024, 1, 2), WINDOW_DAYS).unwrap();

        // every per-day mean is (20+24)/2, (60+80)/2, (1+3)/2
        assert_eq!(stats.avg_temp, 22.0);
        assert_eq!(stats.max_temp, 22.0);
        assert_eq!(stats.avg_humidity, 70.0);
        assert_eq!(stats.rainfall, 50.0);
    }

    #[test]
    fn test_max_temp_is_max_of_daily_means_not_raw_records() {
        let store = WeatherStore::from_records(vec![
            record(date(2019, 6, 1), 30.0, 70.0, 0.0),
            record(date(2020, 6, 1), 20.0, 70.0, 0.0),
            record(date(2019, 6, 2), 26.0, 70.0, 0.0),
        ]);
        let stats = aggregate(&store, Location::Bengaluru, date(2024, 6, 1), 2).unwrap();

        assert_eq!(stats.max_temp, 26.0);
        assert_eq!(stats.avg_temp, 25.5);
    }

    #[test]
    fn test_days_without_history_are_skipped_not_zeroed() {
        let store = WeatherStore::from_records(vec![
            record(date(2019, 3, 1), 28.0, 50.0, 2.0),
            record(date(2019, 3, 3), 30.0, 40.0, 4.0),
        ]);
        let stats = aggregate(&store, Location::Bengaluru, date(2024, 3, 1), 3).unwrap();

        assert_eq!(stats.avg_temp, 29.0);
        assert_eq!(stats.avg_humidity, 45.0);
        assert_eq!(stats.rainfall, 6.0);
    }

    #[test]
    fn test_window_without_history_is_none() {
        let store = two_januaries();
        assert_eq!(aggregate(&store, Location::Bengaluru, date(2024, 6, 1), WINDOW_DAYS), None);
        assert_eq!(aggregate(&store, Location::Shidlaghatta, date(2024, 1, 2), WINDOW_DAYS), None);
    }

    #[test]
    fn test_window_crossing_year_end() {
        let mut records = Vec::new();
        let mut d = date(2019, 12, 20);
        while d <= date(2020, 1, 20) {
            records.push(record(d, 18.0, 65.0, 0.5));
            d = d.checked_add_days(Days::new(1)).unwrap();
        }
        let store = WeatherStore::from_records(records);
        let stats = aggregate(&store, Location::Bengaluru, date(2023, 12, 25), WINDOW_DAYS).unwrap();

        assert_eq!(stats.rainfall, 12.5);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let store = two_januaries();
        let a = aggregate(&store, Location::Bengaluru, date(2024, 1, 5), WINDOW_DAYS);
        let b = aggregate(&store, Location::Bengaluru, date(2024, 1, 5), WINDOW_DAYS);
        assert_eq!(a, b);
    }
}
