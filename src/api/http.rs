//! Implements `FilingStore` against the filing service's JSON API.

use crate::api::FilingStore;
use crate::model::FilingSnapshot;
use crate::wizard::StepSlice;
use crate::{utils, Config, Result};
use anyhow::{bail, Context};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, trace};
use url::Url;

/// Talks to the filing service:
/// - `GET {api}/filings/{id}` to load
/// - `PATCH {api}/filings/{id}/steps/{n}` with the step slice as the body to save
/// - `POST {api}/filings/{id}/submit` to submit
pub struct HttpStore {
    client: Client,
    api_url: Url,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(api_url: Url, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_url,
            token,
        }
    }

    /// Uses the configured service URL, and reads the bearer token if a token file is configured.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let token = match config.token_path() {
            Some(path) => {
                let token = utils::read(&path)
                    .await
                    .context("Unable to read the filing service token")?;
                Some(token.trim().to_string())
            }
            None => None,
        };
        Ok(Self::new(config.api_url().clone(), token))
    }

    fn endpoint(&self, filing_id: &str, rest: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                anyhow::anyhow!("The filing service URL '{}' cannot have a path", self.api_url)
            })?
            .pop_if_empty()
            .push("filings")
            .push(filing_id)
            .extend(rest);
        Ok(url)
    }

    /// Sends `request` for `filing_id` and parses the snapshot in the response. A body without
    /// `filingId` gets the id that was asked for.
    async fn send(
        &self,
        filing_id: &str,
        request: RequestBuilder,
        what: &str,
    ) -> Result<FilingSnapshot> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request
            .send()
            .await
            .with_context(|| format!("Unable to reach the filing service to {what}"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("The filing service failed to {what} with status {status}: {body}");
        }
        let mut snapshot = response
            .json::<FilingSnapshot>()
            .await
            .with_context(|| format!("Unable to parse the filing service response to {what}"))?;
        if snapshot.filing_id.is_empty() {
            snapshot.filing_id = filing_id.to_string();
        }
        Ok(snapshot)
    }
}

#[async_trait::async_trait]
impl FilingStore for HttpStore {
    async fn load(&self, filing_id: &str) -> Result<FilingSnapshot> {
        let url = self.endpoint(filing_id, &[])?;
        trace!("GET {url}");
        self.send(
            filing_id,
            self.client.get(url),
            &format!("load filing '{filing_id}'"),
        )
        .await
    }

    async fn save_slice(
        &self,
        filing_id: &str,
        step: usize,
        slice: &StepSlice,
    ) -> Result<FilingSnapshot> {
        let step_segment = step.to_string();
        let url = self.endpoint(filing_id, &["steps", &step_segment])?;
        trace!("PATCH {url}");
        let snapshot = self
            .send(
                filing_id,
                self.client.patch(url).json(slice),
                &format!("save step {step} of filing '{filing_id}'"),
            )
            .await?;
        debug!("Saved step {step} of filing '{filing_id}'");
        Ok(snapshot)
    }

    async fn submit(&self, filing_id: &str) -> Result<FilingSnapshot> {
        let url = self.endpoint(filing_id, &["submit"])?;
        trace!("POST {url}");
        self.send(
            filing_id,
            self.client.post(url),
            &format!("submit filing '{filing_id}'"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilingStatus;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn store(server: &MockServer) -> HttpStore {
        let url = Url::parse(&format!("{}/api", server.uri())).unwrap();
        HttpStore::new(url, Some("secret-token".into()))
    }

    #[tokio::test]
    async fn test_load_partial_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/filings/f-1"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "filingId": "f-1",
                "taxYear": 2024,
                "status": "rejected",
                "updatedAt": "2024-09-30T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let snapshot = store(&server).await.load("f-1").await.unwrap();
        assert_eq!(snapshot.filing_id, "f-1");
        assert_eq!(snapshot.draft.tax_year(), Some(2024));
        assert_eq!(snapshot.draft.status(), FilingStatus::Rejected);
        assert!(snapshot.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_load_body_without_filing_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/filings/f-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"taxYear": 2023})))
            .mount(&server)
            .await;

        let snapshot = store(&server).await.load("f-2").await.unwrap();
        assert_eq!(snapshot.filing_id, "f-2");
        assert_eq!(snapshot.draft.tax_year(), Some(2023));
        assert_eq!(snapshot.draft.status(), FilingStatus::Pending);
    }

    #[tokio::test]
    async fn test_save_slice_sends_only_the_slice() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/filings/f-1/steps/13"))
            .and(body_json(json!({"documentsUploaded": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "filingId": "f-1",
                "documentsUploaded": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let slice = StepSlice {
            documents_uploaded: Some(true),
            ..Default::default()
        };
        let snapshot = store(&server)
            .await
            .save_slice("f-1", 13, &slice)
            .await
            .unwrap();
        assert!(snapshot.draft.documents_uploaded());
    }

    #[tokio::test]
    async fn test_submit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/filings/f-1/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "filingId": "f-1",
                "status": "under_review",
                "submittedAt": "2024-09-30T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let snapshot = store(&server).await.submit("f-1").await.unwrap();
        assert_eq!(snapshot.draft.status(), FilingStatus::UnderReview);
    }

    #[tokio::test]
    async fn test_server_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(422).set_body_string("taxYear is locked"))
            .mount(&server)
            .await;

        let err = store(&server)
            .await
            .save_slice("f-1", 1, &StepSlice::default())
            .await
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("422"), "{message}");
        assert!(message.contains("taxYear is locked"), "{message}");
    }
}
