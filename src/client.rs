//! Blocking HTTP client for the study set API

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use thiserror::Error;

use crate::deck::StudySetSource;
use crate::study_sets::{NewStudySet, StudySet, StudySetUpdate};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Deserialize)]
struct Created {
    id: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct StudySetClient {
    base_url: String,
    http: Client,
}

impl StudySetClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn sets_url(&self) -> String {
        format!("{}/api/studySets", self.base_url)
    }

    fn set_url(&self, id: &str) -> String {
        format!("{}/{}", self.sets_url(), urlencoding::encode(id))
    }

    /// Turn a non-2xx response into `ClientError::Status`, using the
    /// server's `{"error": ...}` message when there is one
    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    pub fn list_sets(&self) -> Result<Vec<StudySet>> {
        let response = Self::check(self.http.get(self.sets_url()).send()?)?;
        Ok(response.json()?)
    }

    pub fn get_set(&self, id: &str) -> Result<StudySet> {
        let response = Self::check(self.http.get(self.set_url(id)).send()?)?;
        Ok(response.json()?)
    }

    /// Create a set and return its generated id
    pub fn create_set(&self, new: &NewStudySet) -> Result<String> {
        let response = Self::check(self.http.post(self.sets_url()).json(new).send()?)?;
        let created: Created = response.json()?;
        log::debug!("Created study set {}", created.id);
        Ok(created.id)
    }

    pub fn update_set(&self, id: &str, update: &StudySetUpdate) -> Result<()> {
        Self::check(self.http.put(self.set_url(id)).json(update).send()?)?;
        Ok(())
    }

    pub fn delete_set(&self, id: &str) -> Result<()> {
        Self::check(self.http.delete(self.set_url(id)).send()?)?;
        Ok(())
    }
}

impl StudySetSource for StudySetClient {
    type Error = ClientError;

    fn list_study_sets(&self) -> Result<Vec<StudySet>> {
        self.list_sets()
    }
}
