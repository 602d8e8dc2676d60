use log::{debug, error, info, warn};
use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;

use crate::config::FeedbackConfig;
use crate::endpoints;
use crate::error::{FeedbackError, Result};
use crate::models::{FeedbackCollection, NewFeedback, Selection};

/// Feedback API client. Every call issues its own request, so calls never share a
/// completion path; all of them abort once the cancellation token fires.
#[derive(Clone)]
pub struct FeedbackClient {
    client: Client,
    base_url: Url,
    cancel: CancellationToken,
}

impl FeedbackClient {
    pub fn new(config: &FeedbackConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        let base_url = config.base_url()?;
        info!("Feedback client using base URL {}", base_url);

        Ok(Self {
            client,
            base_url,
            cancel: CancellationToken::new(),
        })
    }

    /// Ties this client to an outer token, e.g. the owning page's lifetime.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fetches every record. A body that isn't a JSON array is treated as no records.
    pub async fn list_feedback(&self) -> Result<FeedbackCollection> {
        let url = endpoints::list_url(&self.base_url)?;
        let body = self.get_text("list", url).await?;
        let collection = FeedbackCollection::from_body(&body);
        info!("Fetched {} feedback records", collection.len());
        Ok(collection)
    }

    pub async fn submit_feedback(&self, entry: &NewFeedback) -> Result<()> {
        let url = endpoints::submit_url(&self.base_url, entry)?;
        debug!(
            "Submitting feedback from {} {} ({} chars)",
            entry.first_name,
            entry.last_name,
            entry.feedback.len()
        );
        self.get_text("submit", url).await?;
        info!("Feedback submitted");
        Ok(())
    }

    /// Requests sentiment prediction for the selected records and returns the
    /// refreshed collection the backend answers with.
    pub async fn predict_sentiment(&self, selection: &Selection) -> Result<FeedbackCollection> {
        if selection.is_empty() {
            warn!("Predicting sentiment with an empty selection");
        }
        let url = endpoints::predict_sentiment_url(&self.base_url, selection.ids())?;
        let body = self.get_text("predict sentiment", url).await?;
        Ok(FeedbackCollection::from_body(&body))
    }

    /// Same contract as [`predict_sentiment`](Self::predict_sentiment), for gender.
    pub async fn identify_gender(&self, selection: &Selection) -> Result<FeedbackCollection> {
        if selection.is_empty() {
            warn!("Identifying gender with an empty selection");
        }
        let url = endpoints::predict_gender_url(&self.base_url, selection.ids())?;
        let body = self.get_text("identify gender", url).await?;
        Ok(FeedbackCollection::from_body(&body))
    }

    async fn get_text(&self, operation: &str, url: Url) -> Result<String> {
        if self.cancel.is_cancelled() {
            debug!("Skipping {} request, client cancelled", operation);
            return Err(FeedbackError::Cancelled);
        }

        info!("Sending {} request: {}", operation, url);

        let result = tokio::select! {
            _ = self.cancel.cancelled() => Err(FeedbackError::Cancelled),
            result = self.send(url) => result,
        };

        match &result {
            Ok(body) => debug!("{} response: {} bytes", operation, body.len()),
            Err(FeedbackError::Cancelled) => warn!("{} request cancelled", operation),
            Err(e) => error!("{} request failed: {}", operation, e),
        }
        result
    }

    async fn send(&self, url: Url) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedbackError::Status { status, body });
        }

        Ok(response.text().await?)
    }
}
