use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::client::FeedbackClient;
use crate::config::FeedbackConfig;
use crate::models::{NewFeedback, Selection};
use crate::render;
use crate::widget::{FeedbackWidget, PageView};

#[derive(Parser, Debug)]
#[command(
    name = "unicorn-feedback",
    version,
    about = "List, submit and classify Unicorn feedback",
    long_about = "unicorn-feedback talks to the Unicorn Feedback API and renders the feedback table as an HTML fragment."
)]
pub struct Cli {
    /// Config file (TOML, JSON or YAML). Defaults to ./unicorn-feedback.* when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(flatten)]
    Api(ApiCommand),
    /// Render a saved list response without touching the network
    Render {
        /// Response body file; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Commands that talk to the feedback API.
#[derive(Subcommand, Debug)]
pub enum ApiCommand {
    /// Fetch all feedback and print the table and controls
    List {
        /// Write the HTML to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Submit a new feedback entry
    Submit {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        feedback: String,
    },
    /// Predict sentiment for the given record ids
    Predict {
        ids: Vec<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Identify gender for the given record ids
    IdentifyGender {
        ids: Vec<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Command::Render { input, output } => {
            return render_offline(input.as_deref(), output.as_deref())
        }
        Command::Api(command) => command,
    };

    let mut config =
        FeedbackConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }

    let client = FeedbackClient::new(&config).context("Failed to build feedback client")?;
    let widget = FeedbackWidget::new(client);

    tokio::select! {
        result = execute(&widget, command) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling in-flight requests");
            widget.shutdown();
            anyhow::bail!("Interrupted")
        }
    }
}

async fn execute(widget: &FeedbackWidget, command: ApiCommand) -> Result<()> {
    match command {
        ApiCommand::List { output } => {
            let view = widget.refresh().await?;
            write_view(output.as_deref(), &view)
        }
        ApiCommand::Submit {
            first_name,
            last_name,
            feedback,
        } => {
            let entry = NewFeedback::new(first_name, last_name, feedback);
            widget.submit(&entry).await?;
            println!("Feedback submitted.");
            Ok(())
        }
        ApiCommand::Predict { ids, output } => {
            let selection: Selection = ids.into_iter().collect();
            let view = widget.predict_selected(&selection).await?;
            write_view(output.as_deref(), &view)
        }
        ApiCommand::IdentifyGender { ids, output } => {
            let selection: Selection = ids.into_iter().collect();
            let view = widget.identify_gender(&selection).await?;
            write_view(output.as_deref(), &view)
        }
    }
}

fn render_offline(input: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let body = read_input(input)?;
    let html = format!("{}\n{}\n", render::render_body(&body), render::render_controls());
    write_output(output, &html)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read stdin")?;
            Ok(body)
        }
    }
}

fn write_view(path: Option<&Path>, view: &PageView) -> Result<()> {
    let html = format!("{}\n{}\n", view.table_html, view.buttons_html);
    write_output(path, &html)
}

fn write_output(path: Option<&Path>, html: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}
