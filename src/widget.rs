use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::client::FeedbackClient;
use crate::error::Result;
use crate::models::{FeedbackCollection, NewFeedback, Selection};
use crate::render;

/// Contents of the two host-page containers the widget owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub table_html: String,
    pub buttons_html: String,
}

#[derive(Debug, Default)]
struct ViewState {
    view: PageView,
    rendered_generation: u64,
}

/// Drives a [`FeedbackClient`] and keeps the rendered page in step with the newest response.
pub struct FeedbackWidget {
    client: FeedbackClient,
    state: Mutex<ViewState>,
    issued_generation: AtomicU64,
}

impl FeedbackWidget {
    pub fn new(client: FeedbackClient) -> Self {
        Self {
            client,
            state: Mutex::new(ViewState::default()),
            issued_generation: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &FeedbackClient {
        &self.client
    }

    pub fn view(&self) -> PageView {
        self.state.lock().view.clone()
    }

    /// Lists all records and renders them.
    pub async fn refresh(&self) -> Result<PageView> {
        let generation = self.begin();
        let collection = self.client.list_feedback().await?;
        self.render_if_current(generation, &collection);
        Ok(self.view())
    }

    /// Submits the form values, then re-lists so the new record shows up.
    pub async fn submit(&self, entry: &NewFeedback) -> Result<PageView> {
        info!("Submitting new feedback");
        self.client.submit_feedback(entry).await?;
        self.refresh().await
    }

    pub async fn predict_selected(&self, selection: &Selection) -> Result<PageView> {
        let generation = self.begin();
        let collection = self.client.predict_sentiment(selection).await?;
        self.render_prediction(generation, &collection).await
    }

    pub async fn identify_gender(&self, selection: &Selection) -> Result<PageView> {
        let generation = self.begin();
        let collection = self.client.identify_gender(selection).await?;
        self.render_prediction(generation, &collection).await
    }

    /// Aborts in-flight requests. Nothing renders after this returns.
    pub fn shutdown(&self) {
        info!("Shutting down feedback widget");
        self.client.cancellation_token().cancel();
    }

    async fn render_prediction(
        &self,
        generation: u64,
        collection: &FeedbackCollection,
    ) -> Result<PageView> {
        // Backends that answer with nothing usable still updated the store; re-list instead.
        if collection.is_empty() {
            debug!("Prediction returned no records, re-listing");
            return self.refresh().await;
        }
        self.render_write_result(generation, collection);
        Ok(self.view())
    }

    fn begin(&self) -> u64 {
        self.issued_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Renders unless a response to a later request already has. Returns whether it rendered.
    fn render_if_current(&self, generation: u64, collection: &FeedbackCollection) -> bool {
        self.render(generation, collection, false)
    }

    /// Prediction responses carry the store as it was after the write, so they render even
    /// when a refresh sent while they were in flight already has. Older responses stay dropped.
    fn render_write_result(&self, generation: u64, collection: &FeedbackCollection) -> bool {
        self.render(generation, collection, true)
    }

    fn render(&self, generation: u64, collection: &FeedbackCollection, after_write: bool) -> bool {
        if self.client.cancellation_token().is_cancelled() {
            warn!("Dropping response for generation {}, widget shut down", generation);
            return false;
        }

        let mut state = self.state.lock();
        if !after_write && generation <= state.rendered_generation {
            debug!(
                "Dropping stale response (generation {}, already rendered {})",
                generation, state.rendered_generation
            );
            return false;
        }

        state.view = PageView {
            table_html: render::render_table(collection),
            buttons_html: render::render_controls(),
        };
        state.rendered_generation = state.rendered_generation.max(generation);
        true
    }
}
