//! Client for talking to a running bug tracker server.

use crate::protocol::{BugInput, Envelope, HealthStatus, ListParams, Listing};
use crate::types::{Bug, Status};
use eyre::{Context, Result, bail};
use reqwest::StatusCode;
use reqwest::blocking::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the bug tracker REST API.
pub struct ApiClient {
    base: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    /// Build a client against the given base URL, e.g. `http://127.0.0.1:4000`.
    pub fn new(server: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base: server.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// The base URL this client talks to.
    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        request
            .send()
            .with_context(|| format!("Failed to reach {}. Is the server running?", self.base))
    }

    /// Check the server is up and answering.
    pub fn health(&self) -> Result<()> {
        let response = self.send(self.http.get(self.url("/health")))?;
        let health: HealthStatus = response.json().context("Malformed health response")?;
        if health.status != "OK" {
            bail!("Unexpected health status: {}", health.status);
        }
        Ok(())
    }

    /// List bugs, narrowed by the given filters.
    pub fn list(&self, params: &ListParams) -> Result<Listing> {
        let response = self.send(self.http.get(self.url("/api/bugs")).query(params))?;
        listing_from(decode(response)?)
    }

    /// Fetch a single bug by id. Returns None when no bug has the id.
    pub fn get(&self, id: &str) -> Result<Option<Bug>> {
        let response = self.send(self.http.get(self.url(&format!("/api/bugs/{}", id))))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        match decode(response)? {
            Envelope::Success(body) => Ok(Some(body.data)),
            Envelope::Failure(err) => bail!("{}", err.error),
        }
    }

    /// Create a bug from the given input.
    pub fn create(&self, input: &BugInput) -> Result<Bug> {
        let response = self.send(self.http.post(self.url("/api/bugs")).json(input))?;

        match decode(response)? {
            Envelope::Success(body) => Ok(body.data),
            Envelope::Failure(err) => bail!("{}", err.error),
        }
    }

    /// Apply a partial update to an existing bug.
    pub fn update(&self, id: &str, patch: &BugInput) -> Result<Bug> {
        let response = self.send(
            self.http
                .put(self.url(&format!("/api/bugs/{}", id)))
                .json(patch),
        )?;

        match decode(response)? {
            Envelope::Success(body) => Ok(body.data),
            Envelope::Failure(err) => bail!("{}", err.error),
        }
    }

    /// Set a bug's status.
    pub fn set_status(&self, id: &str, status: Status) -> Result<Bug> {
        self.update(id, &BugInput::status_change(status))
    }
}

/// Turn a decoded list envelope into a [`Listing`] or the server's error.
fn listing_from(envelope: Envelope<Vec<Bug>>) -> Result<Listing> {
    match envelope {
        Envelope::Success(body) => Ok(Listing {
            count: body.count.unwrap_or(body.data.len()),
            bugs: body.data,
            filters: body.filters.unwrap_or_default(),
        }),
        Envelope::Failure(err) => bail!("{}", err.error),
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>> {
    response.json().context("Malformed server response")
}
