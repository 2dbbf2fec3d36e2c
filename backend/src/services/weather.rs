//! Weather history loading
//!
//! Reads one CSV export per location at startup and builds the read-only
//! [`WeatherStore`]. Sources that are missing or unreadable are skipped with a
//! warning so the remaining locations stay available.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use shared::{
    is_fill_value, validate_humidity, validate_precipitation, validate_temperature, Location,
    WeatherRecord, WeatherStore,
};

use crate::config::DataConfig;

/// Marker lines around the metadata block of NASA POWER exports
const POWER_HEADER_BEGIN: &str = "-BEGIN HEADER-";
const POWER_HEADER_END: &str = "-END HEADER-";

#[derive(Error, Debug)]
pub enum WeatherSourceError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No date columns: expected YEAR and DOY, or DATE")]
    MissingDateColumns,

    #[error("Unterminated POWER header block")]
    UnterminatedHeader,

    #[error("Invalid date on row {row}: {value}")]
    InvalidDate { row: usize, value: String },
}

/// One CSV row; only the columns the aggregator needs
#[derive(Debug, Deserialize)]
struct WeatherRow {
    #[serde(rename = "YEAR", default)]
    year: Option<i32>,
    #[serde(rename = "DOY", default)]
    day_of_year: Option<u32>,
    #[serde(rename = "DATE", default)]
    date: Option<String>,
    #[serde(rename = "T2M")]
    temperature: f64,
    #[serde(rename = "RH2M")]
    humidity: f64,
    #[serde(rename = "PRECTOTCORR")]
    precipitation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DateShape {
    YearAndDayOfYear,
    IsoDate,
}

/// Records parsed from one source
#[derive(Debug, Default)]
pub struct ParsedSource {
    pub records: Vec<WeatherRecord>,
    /// Rows with fill values or implausible measurements
    pub dropped: usize,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
        .ok()
}

fn strip_power_header(text: &str) -> Result<&str, WeatherSourceError> {
    if !text.trim_start().starts_with(POWER_HEADER_BEGIN) {
        return Ok(text);
    }
    let end = text
        .find(POWER_HEADER_END)
        .ok_or(WeatherSourceError::UnterminatedHeader)?;
    let rest = &text[end + POWER_HEADER_END.len()..];
    Ok(rest.trim_start_matches(['\r', '\n']))
}

fn is_plausible(row: &WeatherRow) -> bool {
    let measures = [row.temperature, row.humidity, row.precipitation];
    !measures.iter().any(|v| is_fill_value(*v))
        && validate_temperature(row.temperature).is_ok()
        && validate_humidity(row.humidity).is_ok()
        && validate_precipitation(row.precipitation).is_ok()
}

/// Parse a weather CSV export for `location`
pub fn parse_weather_csv(location: Location, text: &str) -> Result<ParsedSource, WeatherSourceError> {
    let body = strip_power_header(text)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    let has = |name: &str| headers.iter().any(|h| h == name);
    let shape = if has("YEAR") && has("DOY") {
        DateShape::YearAndDayOfYear
    } else if has("DATE") {
        DateShape::IsoDate
    } else {
        return Err(WeatherSourceError::MissingDateColumns);
    };

    let mut parsed = ParsedSource::default();
    for (index, row) in reader.deserialize::<WeatherRow>().enumerate() {
        let row = row?;
        let row_number = index + 1;

        let date = match shape {
            DateShape::YearAndDayOfYear => row
                .year
                .zip(row.day_of_year)
                .and_then(|(year, doy)| NaiveDate::from_yo_opt(year, doy))
                .ok_or_else(|| WeatherSourceError::InvalidDate {
                    row: row_number,
                    value: format!("{:?}/{:?}", row.year, row.day_of_year),
                })?,
            DateShape::IsoDate => {
                let raw = row.date.as_deref().unwrap_or_default();
                parse_date(raw).ok_or_else(|| WeatherSourceError::InvalidDate {
                    row: row_number,
                    value: raw.to_string(),
                })?
            }
        };

        if !is_plausible(&row) {
            parsed.dropped += 1;
            continue;
        }

        parsed.records.push(WeatherRecord::new(
            location,
            date,
            row.temperature,
            row.humidity,
            row.precipitation,
        ));
    }

    Ok(parsed)
}

/// Loads the configured weather sources
pub struct WeatherHistoryLoader {
    weather_dir: PathBuf,
    files: Vec<(String, String)>,
}

impl WeatherHistoryLoader {
    pub fn new(config: &DataConfig) -> Self {
        Self {
            weather_dir: config.weather_dir.clone(),
            files: config
                .weather_files
                .iter()
                .map(|(name, file)| (name.clone(), file.clone()))
                .collect(),
        }
    }

    /// Configured source file for a location, if any
    fn source_for(&self, location: Location) -> Option<PathBuf> {
        self.files
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(location.display_name()))
            .map(|(_, file)| self.weather_dir.join(file))
    }

    /// Read and parse the source of one location
    pub fn load(&self, location: Location) -> Result<Option<ParsedSource>, WeatherSourceError> {
        let Some(path) = self.source_for(location) else {
            return Ok(None);
        };
        let text = read_source(&path)?;
        parse_weather_csv(location, &text).map(Some)
    }

    /// Build the store from every configured source that loads
    pub fn load_all(&self) -> WeatherStore {
        for (name, _) in &self.files {
            if !Location::ALL
                .iter()
                .any(|l| name.eq_ignore_ascii_case(l.display_name()))
            {
                tracing::warn!("Ignoring weather source for unrecognized location {}", name);
            }
        }

        let mut store = WeatherStore::new();
        for location in Location::ALL {
            match self.load(location) {
                Ok(Some(parsed)) => {
                    if parsed.dropped > 0 {
                        tracing::warn!(
                            "Dropped {} weather rows with missing or implausible values for {}",
                            parsed.dropped,
                            location
                        );
                    }
                    tracing::info!(
                        "Loaded {} weather records for {}",
                        parsed.records.len(),
                        location
                    );
                    store.extend(parsed.records);
                }
                Ok(None) => {
                    tracing::warn!("No weather source configured for {}", location);
                }
                Err(e) => {
                    tracing::warn!("Skipping weather history for {}: {}", location, e);
                }
            }
        }

        if store.is_empty() {
            tracing::warn!("No weather data loaded; every recommendation will find no candidates");
        }
        store
    }
}

fn read_source(path: &Path) -> Result<String, WeatherSourceError> {
    std::fs::read_to_string(path).map_err(|source| WeatherSourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_year_and_day_of_year() {
        let csv = "YEAR,DOY,T2M,RH2M,PRECTOTCORR\n2020,1,21.4,70.2,0.0\n2020,60,25.0,55.0,1.2\n";
        let parsed = parse_weather_csv(Location::Bengaluru, csv).unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].date(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        // Day 60 of a leap year
        assert_eq!(parsed.records[1].calendar_day(), (2, 29));
        assert_eq!(parsed.records[1].precipitation, 1.2);
    }

    #[test]
    fn test_parse_iso_date_with_extra_columns() {
        let csv = "DATE,T2M,T2M_MAX,RH2M,PRECTOTCORR\n2019-07-14,23.1,27.9,81.0,4.2\n";
        let parsed = parse_weather_csv(Location::Ramanagara, csv).unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].calendar_day(), (7, 14));
        assert_eq!(parsed.records[0].location, Location::Ramanagara);
        assert_eq!(parsed.records[0].temperature_mean, 23.1);
    }

    #[test]
    fn test_power_header_block_is_skipped() {
        let csv = "-BEGIN HEADER-\nNASA/POWER Source Native Resolution Daily Data\nT2M  MERRA-2 Temperature at 2 Meters (C)\n-END HEADER-\nYEAR,DOY,T2M,RH2M,PRECTOTCORR\n2021,32,22.0,60.0,0.3\n";
        let parsed = parse_weather_csv(Location::Shidlaghatta, csv).unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].calendar_day(), (2, 1));
    }

    #[test]
    fn test_fill_values_are_dropped() {
        let csv = "YEAR,DOY,T2M,RH2M,PRECTOTCORR\n2020,1,21.4,70.2,0.0\n2020,2,-999,70.0,0.0\n2020,3,22.0,-999.0,0.0\n";
        let parsed = parse_weather_csv(Location::Bengaluru, csv).unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.dropped, 2);
    }

    #[test]
    fn test_missing_date_columns() {
        let csv = "T2M,RH2M,PRECTOTCORR\n21.4,70.2,0.0\n";
        assert!(matches!(
            parse_weather_csv(Location::Bengaluru, csv),
            Err(WeatherSourceError::MissingDateColumns)
        ));
    }

    #[test]
    fn test_invalid_day_of_year() {
        let csv = "YEAR,DOY,T2M,RH2M,PRECTOTCORR\n2021,366,21.4,70.2,0.0\n";
        assert!(matches!(
            parse_weather_csv(Location::Bengaluru, csv),
            Err(WeatherSourceError::InvalidDate { row: 1, .. })
        ));
    }

    #[test]
    fn test_unparseable_measure_fails_the_source() {
        let csv = "YEAR,DOY,T2M,RH2M,PRECTOTCORR\n2021,1,warm,70.2,0.0\n";
        assert!(matches!(
            parse_weather_csv(Location::Bengaluru, csv),
            Err(WeatherSourceError::Csv(_))
        ));
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let mut files = BTreeMap::new();
        files.insert("Bengaluru".to_string(), "does-not-exist.csv".to_string());
        files.insert("Mysuru".to_string(), "mysuru.csv".to_string());
        let loader = WeatherHistoryLoader::new(&DataConfig {
            weather_dir: PathBuf::from("/nonexistent"),
            weather_files: files,
            model_path: PathBuf::from("/nonexistent/model.json"),
        });

        assert!(matches!(
            loader.load(Location::Bengaluru),
            Err(WeatherSourceError::Io { .. })
        ));
        assert!(matches!(loader.load(Location::Ramanagara), Ok(None)));
        assert!(loader.load_all().is_empty());
    }

    #[test]
    fn test_location_keys_match_case_insensitively() {
        let mut files = BTreeMap::new();
        files.insert("bengaluru".to_string(), "b.csv".to_string());
        let loader = WeatherHistoryLoader::new(&DataConfig {
            weather_dir: PathBuf::from("data"),
            weather_files: files,
            model_path: PathBuf::from("data/model.json"),
        });

        assert_eq!(
            loader.source_for(Location::Bengaluru),
            Some(PathBuf::from("data").join("b.csv"))
        );
    }
}
