//! Climatology integration tests
//!
//! Tests for the same-calendar-day aggregation including:
//! - Mean, maximum and summed statistics over the window
//! - Coverage rules (full coverage always yields, no coverage never does)
//! - Calendar arithmetic across month ends, year ends and Feb 29
//! - Season assignment by month

use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;
use shared::{aggregate, season_of, Location, Season, WeatherRecord, WeatherStore, WINDOW_DAYS};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(d: NaiveDate, temp: f64, humidity: f64, rain: f64) -> WeatherRecord {
    WeatherRecord::new(Location::Bengaluru, d, temp, humidity, rain)
}

/// Every day of `years` with constant measurements
fn constant_years(years: std::ops::RangeInclusive<i32>, temp: f64, rain: f64) -> Vec<WeatherRecord> {
    let (first, last) = (*years.start(), *years.end());
    date(first, 1, 1)
        .iter_days()
        .take_while(|d| d.year() <= last)
        .map(|d| record(d, temp, 70.0, rain))
        .collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Per-day means feed the window statistics
    #[test]
    fn test_window_statistics() {
        // Two years for Jan 10 and Jan 11, one year for Jan 12
        let store = WeatherStore::from_records(vec![
            record(date(2019, 1, 10), 20.0, 60.0, 1.0),
            record(date(2020, 1, 10), 22.0, 80.0, 3.0),
            record(date(2019, 1, 11), 25.0, 50.0, 0.0),
            record(date(2020, 1, 11), 27.0, 70.0, 4.0),
            record(date(2021, 1, 12), 30.0, 90.0, 10.0),
        ]);

        let stats = aggregate(&store, Location::Bengaluru, date(2024, 1, 10), 3).unwrap();

        // Per-day means: temp 21, 26, 30; humidity 70, 60, 90; rain 2, 2, 10
        assert!(approx(stats.avg_temp, (21.0 + 26.0 + 30.0) / 3.0));
        assert!(approx(stats.max_temp, 30.0));
        assert!(approx(stats.avg_humidity, (70.0 + 60.0 + 90.0) / 3.0));
        assert!(approx(stats.rainfall, 14.0));
    }

    /// The maximum is taken over per-day means, not raw records
    #[test]
    fn test_max_uses_daily_means() {
        let store = WeatherStore::from_records(vec![
            record(date(2019, 5, 1), 40.0, 50.0, 0.0),
            record(date(2020, 5, 1), 20.0, 50.0, 0.0),
        ]);

        let stats = aggregate(&store, Location::Bengaluru, date(2023, 5, 1), 1).unwrap();
        assert!(approx(stats.max_temp, 30.0));
    }

    /// Days without history are skipped, not counted as zero
    #[test]
    fn test_uncovered_days_are_skipped() {
        let store = WeatherStore::from_records(vec![
            record(date(2019, 8, 1), 24.0, 80.0, 5.0),
            record(date(2019, 8, 20), 26.0, 84.0, 7.0),
        ]);

        let stats = aggregate(&store, Location::Bengaluru, date(2024, 8, 1), WINDOW_DAYS).unwrap();
        assert!(approx(stats.avg_temp, 25.0));
        assert!(approx(stats.avg_humidity, 82.0));
        assert!(approx(stats.rainfall, 12.0));
    }

    /// The window covers the start date and the 24 days after it
    #[test]
    fn test_window_bounds() {
        let start = date(2024, 4, 1);
        let inside = start + Days::new(u64::from(WINDOW_DAYS) - 1);
        let outside = start + Days::new(u64::from(WINDOW_DAYS));

        let store = WeatherStore::from_records(vec![record(
            date(2019, inside.month(), inside.day()),
            25.0,
            60.0,
            1.0,
        )]);
        assert!(aggregate(&store, Location::Bengaluru, start, WINDOW_DAYS).is_some());

        let store = WeatherStore::from_records(vec![record(
            date(2019, outside.month(), outside.day()),
            25.0,
            60.0,
            1.0,
        )]);
        assert!(aggregate(&store, Location::Bengaluru, start, WINDOW_DAYS).is_none());
    }

    /// Windows cross the year end on calendar dates
    #[test]
    fn test_window_crosses_year_end() {
        let store = WeatherStore::from_records(vec![
            record(date(2019, 12, 31), 18.0, 60.0, 0.0),
            record(date(2020, 1, 2), 20.0, 60.0, 0.0),
        ]);

        let stats = aggregate(&store, Location::Bengaluru, date(2023, 12, 30), 5).unwrap();
        assert!(approx(stats.avg_temp, 19.0));
    }

    /// Feb 29 only matches leap-year records
    #[test]
    fn test_leap_day_matches_leap_years_only() {
        let store = WeatherStore::from_records(vec![
            record(date(2020, 2, 29), 26.0, 50.0, 0.0),
            record(date(2021, 3, 1), 30.0, 50.0, 0.0),
        ]);

        let leap = aggregate(&store, Location::Bengaluru, date(2024, 2, 29), 1).unwrap();
        assert!(approx(leap.avg_temp, 26.0));

        // 2023 has no Feb 29, so Feb 28 + 1 day is Mar 1
        let common = aggregate(&store, Location::Bengaluru, date(2023, 2, 28), 2).unwrap();
        assert!(approx(common.avg_temp, 30.0));
    }

    /// Records of other locations never leak into a window
    #[test]
    fn test_locations_are_isolated() {
        let store = WeatherStore::from_records(constant_years(2019..=2020, 25.0, 1.0));
        assert!(aggregate(&store, Location::Ramanagara, date(2024, 1, 1), WINDOW_DAYS).is_none());
        assert_eq!(store.record_count(Location::Ramanagara), 0);
        assert_eq!(store.locations(), vec![Location::Bengaluru]);
    }

    /// Season boundaries
    #[test]
    fn test_season_boundaries() {
        assert_eq!(season_of(3), Season::Summer);
        assert_eq!(season_of(5), Season::Summer);
        assert_eq!(season_of(6), Season::Monsoon);
        assert_eq!(season_of(9), Season::Monsoon);
        assert_eq!(season_of(10), Season::PostMonsoon);
        assert_eq!(season_of(11), Season::PostMonsoon);
        assert_eq!(season_of(12), Season::Winter);
        assert_eq!(season_of(1), Season::Winter);
        assert_eq!(season_of(2), Season::Winter);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn start_strategy() -> impl Strategy<Value = NaiveDate> {
        (2000i32..2040, 1u32..=366).prop_filter_map("valid ordinal", |(year, ordinal)| {
            NaiveDate::from_yo_opt(year, ordinal)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Full coverage always yields statistics equal to the constants
        #[test]
        fn prop_full_coverage_yields_stats(
            start in start_strategy(),
            temp in 10.0f64..35.0,
            rain in 0.0f64..20.0
        ) {
            // 2020 covers Feb 29
            let store = WeatherStore::from_records(constant_years(2019..=2020, temp, rain));
            let stats = aggregate(&store, Location::Bengaluru, start, WINDOW_DAYS);

            prop_assert!(stats.is_some());
            let stats = stats.unwrap();
            prop_assert!(approx(stats.avg_temp, temp));
            prop_assert!(approx(stats.max_temp, temp));
            // Rainfall is a sum over the 25 daily means
            prop_assert!((stats.rainfall - rain * f64::from(WINDOW_DAYS)).abs() < 1e-6);
        }

        /// No coverage never yields statistics
        #[test]
        fn prop_zero_coverage_yields_none(start in start_strategy(), window in 1u32..=60) {
            let store = WeatherStore::new();
            prop_assert!(aggregate(&store, Location::Bengaluru, start, window).is_none());
        }

        /// Aggregation is idempotent on an unchanged store
        #[test]
        fn prop_aggregate_is_idempotent(start in start_strategy()) {
            let store = WeatherStore::from_records(constant_years(2019..=2021, 23.5, 2.5));
            prop_assert_eq!(
                aggregate(&store, Location::Bengaluru, start, WINDOW_DAYS),
                aggregate(&store, Location::Bengaluru, start, WINDOW_DAYS)
            );
        }

        /// Every month maps to exactly one season
        #[test]
        fn prop_season_is_total(month in 0u32..40) {
            let season = season_of(month);
            prop_assert!(Season::ALL.contains(&season));
            if !(3..=11).contains(&month) {
                prop_assert_eq!(season, Season::Winter);
            }
        }
    }
}
