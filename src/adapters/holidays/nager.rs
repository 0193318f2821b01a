//! Nager.Date adapter. Implements HolidayProvider via the public holiday REST API.
//!
//! Subdivisions come from the `counties` field of each holiday ("US-CA"); the API has
//! no region level, so any region makes the location unsupported.

use crate::domain::{DomainError, HolidayRow, Location, LocationOption, MonthDay};
use crate::ports::HolidayProvider;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailableCountry {
    country_code: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicHoliday {
    date: NaiveDate,
    name: String,
    #[serde(default)]
    counties: Option<Vec<String>>,
    #[serde(default)]
    types: Vec<String>,
}

/// HTTP holiday source.
pub struct NagerHolidays {
    client: Arc<Client>,
    base_url: String,
    /// Year sampled when listing a country's states.
    listing_year: i32,
}

impl NagerHolidays {
    /// `base_url` without trailing slash, e.g. "https://date.nager.at/api/v3".
    pub fn new(base_url: impl Into<String>, listing_year: i32) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            listing_year,
        }
    }

    /// GETs `path` and decodes JSON. 404 and 204 map to None.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, DomainError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "holiday api request");
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::Holiday(format!("Request failed: {}", e)))?;

        match res.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => return Ok(None),
            status if !status.is_success() => {
                let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
                return Err(DomainError::Holiday(format!(
                    "Holiday API error {}: {}",
                    status, text
                )));
            }
            _ => {}
        }

        res.json::<T>()
            .await
            .map(Some)
            .map_err(|e| DomainError::Holiday(format!("Invalid response: {}", e)))
    }

    async fn public_holidays(
        &self,
        country: &str,
        year: i32,
    ) -> Result<Vec<PublicHoliday>, DomainError> {
        let path = format!("/PublicHolidays/{}/{}", year, country.to_ascii_uppercase());
        Ok(self.get_json(&path).await?.unwrap_or_default())
    }
}

/// Distinct subdivision codes mentioned by `holidays`, lowercased without the country prefix.
fn states_from(country: &str, holidays: &[PublicHoliday]) -> Vec<LocationOption> {
    let prefix = format!("{}-", country.to_ascii_uppercase());
    let codes: BTreeSet<String> = holidays
        .iter()
        .flat_map(|h| h.counties.iter().flatten())
        .filter_map(|c| c.to_ascii_uppercase().strip_prefix(&prefix).map(str::to_ascii_lowercase))
        .collect();
    codes
        .into_iter()
        .map(|code| LocationOption {
            name: code.to_ascii_uppercase(),
            code,
        })
        .collect()
}

/// Keeps nationwide holidays plus those whose counties include the location's state.
fn rows_from(location: &Location, holidays: Vec<PublicHoliday>) -> Vec<HolidayRow> {
    if location.region.as_deref().is_some_and(|r| !r.is_empty()) {
        return Vec::new();
    }
    let county = location
        .state
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| format!("{}-{}", location.country, s).to_ascii_uppercase());

    holidays
        .into_iter()
        .filter(|h| match (&h.counties, &county) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(list), Some(county)) => list.iter().any(|c| c.eq_ignore_ascii_case(county)),
        })
        .map(|h| HolidayRow {
            name: h.name,
            month_day: MonthDay::of(h.date),
            kind: h
                .types
                .first()
                .map(|t| t.to_ascii_lowercase())
                .unwrap_or_else(|| "public".to_string()),
        })
        .collect()
}

#[async_trait::async_trait]
impl HolidayProvider for NagerHolidays {
    async fn countries(&self) -> Result<Vec<LocationOption>, DomainError> {
        let list: Vec<AvailableCountry> = self
            .get_json("/AvailableCountries")
            .await?
            .unwrap_or_default();
        Ok(list
            .into_iter()
            .map(|c| LocationOption {
                code: c.country_code,
                name: c.name,
            })
            .collect())
    }

    async fn states(&self, country: &str) -> Result<Vec<LocationOption>, DomainError> {
        let holidays = self.public_holidays(country, self.listing_year).await?;
        Ok(states_from(country, &holidays))
    }

    async fn regions(
        &self,
        _country: &str,
        _state: &str,
    ) -> Result<Vec<LocationOption>, DomainError> {
        Ok(Vec::new())
    }

    async fn lookup(&self, location: &Location, year: i32) -> Result<Vec<HolidayRow>, DomainError> {
        let holidays = self.public_holidays(&location.country, year).await?;
        let rows = rows_from(location, holidays);
        if rows.is_empty() {
            warn!(location = %location.category_id(), year, "no holidays returned");
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"date":"2025-01-01","localName":"New Year's Day","name":"New Year's Day","countryCode":"US","fixed":false,"global":true,"counties":null,"launchYear":null,"types":["Public"]},
        {"date":"2025-03-31","localName":"César Chávez Day","name":"César Chávez Day","countryCode":"US","fixed":false,"global":false,"counties":["US-CA","US-CO"],"launchYear":null,"types":["Observance"]},
        {"date":"2025-04-21","localName":"Patriots' Day","name":"Patriots' Day","countryCode":"US","fixed":false,"global":false,"counties":["US-MA","US-ME"],"launchYear":null,"types":["Public"]},
        {"date":"2025-07-04","localName":"Independence Day","name":"Independence Day","countryCode":"US","fixed":false,"global":true,"counties":null,"launchYear":null,"types":["Public"]}
    ]"#;

    fn sample() -> Vec<PublicHoliday> {
        serde_json::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_country_level_keeps_only_nationwide() {
        let rows = rows_from(&Location::country("US"), sample());
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["New Year's Day", "Independence Day"]);
        assert_eq!(rows[1].month_day.to_string(), "07-04");
        assert_eq!(rows[1].kind, "public");
    }

    #[test]
    fn test_state_filter_uses_counties() {
        let loc = Location {
            country: "US".into(),
            state: Some("ca".into()),
            region: None,
        };
        let rows = rows_from(&loc, sample());
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["New Year's Day", "César Chávez Day", "Independence Day"]
        );
        assert_eq!(rows[1].kind, "observance");
    }

    #[test]
    fn test_region_is_unsupported() {
        let loc = Location {
            country: "US".into(),
            state: Some("ca".into()),
            region: Some("la".into()),
        };
        assert!(rows_from(&loc, sample()).is_empty());
    }

    #[test]
    fn test_states_from_counties() {
        let states = states_from("us", &sample());
        let codes: Vec<_> = states.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["ca", "co", "ma", "me"]);
        assert_eq!(states[0].name, "CA");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let provider = NagerHolidays::new("https://example.test/api/v3/", 2025);
        assert_eq!(provider.base_url, "https://example.test/api/v3");
    }
}
