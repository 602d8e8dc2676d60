use log::info;

pub mod cli;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod render;
pub mod widget;

pub use client::FeedbackClient;
pub use config::FeedbackConfig;
pub use error::{FeedbackError, Result};
pub use models::{FeedbackCollection, FeedbackRecord, NewFeedback, RecordId, Selection};
pub use widget::{FeedbackWidget, PageView};

pub async fn run(cli: cli::Cli) -> anyhow::Result<()> {
    info!("Unicorn Feedback {} starting", env!("CARGO_PKG_VERSION"));
    cli::run(cli).await
}
