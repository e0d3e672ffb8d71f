//! # Review CLI (`review`)
//!
//! Command-line front-end for the review harness. All commands accept a
//! `--config` flag pointing to a TOML configuration file; when the file
//! does not exist, defaults are used (local backend on port 8000).
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `review request <submission-id>` | Queue a review job, print its id |
//! | `review watch <submission-id>` | Poll until the review finishes, then print it |
//! | `review show <review-id>` | Print an already-finished review |
//!
//! ## Examples
//!
//! ```bash
//! # Queue a review and wait for it
//! review request 01HZX2...
//! review watch 01HZX2...
//!
//! # Watch, queueing a review if none exists yet
//! review watch 01HZX2... --request
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use review_harness::client::{HttpReviewClient, ReviewBackend};
use review_harness::config::load_or_default;
use review_harness::display;
use review_harness::models::ReviewStatus;
use review_harness::poll::{ReviewPhase, ReviewPoller, ReviewView};

#[derive(Parser)]
#[command(name = "review", about = "Client for the AI essay-review backend")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "review.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Queue a new review job for a submission
    Request { submission_id: String },
    /// Poll a submission's review until it finishes, then print it
    Watch {
        submission_id: String,
        /// Queue a new review if none exists yet
        #[arg(long)]
        request: bool,
    },
    /// Print an already-finished review by id
    Show { review_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_or_default(&cli.config)?;
    let client = Arc::new(HttpReviewClient::new(&config.api)?);

    match cli.command {
        Commands::Request { submission_id } => {
            let review_id = client.request_review(&submission_id).await?;
            println!("queued review: {}", review_id);
        }
        Commands::Watch {
            submission_id,
            request,
        } => {
            let interval = Duration::from_millis(config.review.poll_interval_ms);
            let mut poller = ReviewPoller::new(client.clone(), interval);
            let mut phases = poller.subscribe();

            poller.lookup_existing(&submission_id).await;
            if matches!(poller.phase(), ReviewPhase::NoReview) {
                if request {
                    poller.request_new(&submission_id).await;
                } else {
                    println!("No review for this submission yet; re-run with --request to queue one.");
                    return Ok(());
                }
            }

            if !poller.phase().is_terminal() {
                println!("Reviewing...");
            }
            let phase = phases.wait_for(|p| p.is_terminal()).await?.clone();
            match phase {
                ReviewPhase::Done(view) => display::print_review(&view),
                ReviewPhase::Failed => {
                    anyhow::bail!("the AI failed to produce a review; submit the essay again")
                }
                ReviewPhase::NotFound => anyhow::bail!("submission or review not found"),
                ReviewPhase::Error(message) => {
                    anyhow::bail!("error while fetching review: {}", message)
                }
                other => anyhow::bail!("unexpected phase: {:?}", other),
            }
        }
        Commands::Show { review_id } => {
            let review = client.review(&review_id).await?;
            match review.status {
                ReviewStatus::Reviewing => {
                    println!("review {} is still in progress", review.id)
                }
                ReviewStatus::Failed => {
                    println!("review {} failed; request a new one", review.id)
                }
                ReviewStatus::Done => {
                    let submission = client.submission(&review.submission_id).await?;
                    let view = ReviewView {
                        review,
                        submission_text: submission.submission,
                    };
                    display::print_review(&view);
                }
            }
        }
    }

    Ok(())
}
