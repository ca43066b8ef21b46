//! Per-event detail lookup for the "Usual Effect" phrase.
//!
//! The calendar's detail endpoint returns a JSON document whose
//! `data.specs` array carries titled HTML snippets; the one titled
//! `Usual Effect` holds the phrase the criteria mapping consumes. Lookup
//! failures never reach the mapping layer as errors: callers degrade them
//! to an empty phrase (neutral criteria) and keep the batch moving.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use serde::Deserialize;

use crate::error::CliError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const USUAL_EFFECT_TITLE: &str = "Usual Effect";

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(default)]
    data: DetailData,
}

#[derive(Debug, Default, Deserialize)]
struct DetailData {
    #[serde(default)]
    specs: Vec<DetailSpec>,
}

#[derive(Debug, Deserialize)]
struct DetailSpec {
    #[serde(default)]
    title: String,
    #[serde(default)]
    html: String,
}

/// HTTP client for the calendar detail endpoint.
pub struct DetailClient {
    http: reqwest::Client,
    url_template: String,
}

impl DetailClient {
    /// Build a client for a URL template containing an `{id}` placeholder.
    pub fn new(url_template: &str) -> Result<Self, CliError> {
        if !url_template.contains("{id}") {
            return Err(CliError::Input(format!(
                "details URL '{url_template}' has no {{id}} placeholder"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            REFERER,
            HeaderValue::from_static("https://www.forexfactory.com/"),
        );

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            url_template: url_template.to_owned(),
        })
    }

    /// Fetch the usual-effect phrase for one event id.
    ///
    /// Returns the empty string when the detail document carries no
    /// `Usual Effect` spec (holidays and speeches have none).
    pub async fn usual_effect(&self, event_id: &str) -> Result<String, CliError> {
        let url = self.url_template.replace("{id}", event_id);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let detail: DetailResponse = response.json().await?;

        Ok(detail
            .data
            .specs
            .into_iter()
            .find(|spec| spec.title.trim() == USUAL_EFFECT_TITLE)
            .map(|spec| spec.html)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_templates_without_placeholder() {
        assert!(DetailClient::new("https://example.com/details").is_err());
        assert!(DetailClient::new("https://example.com/details/1-{id}").is_ok());
    }

    #[test]
    fn extracts_the_usual_effect_spec() {
        let payload = r#"{
            "data": {
                "specs": [
                    {"title": "Source", "html": "Bureau of Labor Statistics"},
                    {"title": " Usual Effect ", "html": "'Actual' greater than 'Forecast' is good for currency;"}
                ]
            }
        }"#;
        let detail: DetailResponse = serde_json::from_str(payload).expect("must parse");
        let phrase = detail
            .data
            .specs
            .into_iter()
            .find(|spec| spec.title.trim() == USUAL_EFFECT_TITLE)
            .map(|spec| spec.html)
            .unwrap_or_default();
        assert_eq!(
            phrase,
            "'Actual' greater than 'Forecast' is good for currency;"
        );
    }

    #[test]
    fn missing_spec_degrades_to_empty() {
        let payload = r#"{"data": {"specs": []}}"#;
        let detail: DetailResponse = serde_json::from_str(payload).expect("must parse");
        let phrase = detail
            .data
            .specs
            .into_iter()
            .find(|spec| spec.title.trim() == USUAL_EFFECT_TITLE)
            .map(|spec| spec.html)
            .unwrap_or_default();
        assert!(phrase.is_empty());
    }
}
