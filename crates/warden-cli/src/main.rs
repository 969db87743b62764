//! `warden` — validate, diff, and submit estate gate-access records.
//!
//! # Usage
//!
//! ```
//! warden validate --entity person person.json
//! warden transition person.json --category SUPERVISOR
//! warden diff --entity site original.json edited.json --summary
//! warden submit --entity contractor --id 42 edited.json
//! warden format money 1250000
//! warden --config /etc/warden.toml serve
//! ```

mod client;
mod commands;
mod settings;

use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

use anyhow::{Context, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use client::ApiClient;
use commands::{FormatValue, Outcome};
use serde_json::Value;
use settings::Settings;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use warden_core::record::EntityKind;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "warden", version, about = "Edit-form rules for the estate gate dashboard")]
struct Cli {
  /// Path to the TOML settings file.
  #[arg(short, long, value_name = "FILE", default_value = "warden.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Validate a record and print the report.
  Validate {
    #[arg(short, long)]
    entity: EntityKind,
    file:   PathBuf,
  },
  /// Change a person's category, clearing fields it no longer uses.
  Transition {
    file:     PathBuf,
    #[arg(short, long)]
    category: String,
  },
  /// Validate an edited record and print the patch against the original.
  Diff {
    #[arg(short, long)]
    entity:    EntityKind,
    original:  PathBuf,
    candidate: PathBuf,
    /// Print one formatted line per field instead of JSON.
    #[arg(long)]
    summary:   bool,
  },
  /// Fetch the server copy, diff, and PATCH only what changed.
  Submit {
    #[arg(short, long)]
    entity:    EntityKind,
    #[arg(long)]
    id:        String,
    candidate: PathBuf,
  },
  /// Render an amount, count, or date with the configured locale.
  Format {
    #[command(subcommand)]
    value: FormatValue,
  },
  /// Serve the preflight API.
  Serve,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  match cli.command {
    Command::Validate { entity, file } => {
      let report = commands::validate(entity, &read_json(&file)?)?;
      print_json(&report)?;
      Ok(if report.valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }
    Command::Transition { file, category } => {
      print_json(&commands::transition(&read_json(&file)?, &category)?)?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Diff {
      entity,
      original,
      candidate,
      summary,
    } => {
      let outcome =
        commands::preflight(entity, &read_json(&original)?, &read_json(&candidate)?)?;
      match outcome {
        Outcome::Patch(patch) if summary => {
          for line in commands::summarize(&settings.format, &patch) {
            println!("{line}");
          }
        }
        Outcome::Patch(patch) => print_json(&patch)?,
        Outcome::NothingToSubmit => println!("nothing to submit"),
        Outcome::Invalid(errors) => return report_invalid(errors),
      }
      Ok(ExitCode::SUCCESS)
    }
    Command::Submit {
      entity,
      id,
      candidate,
    } => submit(&settings, entity, &id, &candidate).await,
    Command::Format { value } => {
      println!("{}", commands::format_value(&settings.format, &value));
      Ok(ExitCode::SUCCESS)
    }
    Command::Serve => serve(&settings).await.map(|()| ExitCode::SUCCESS),
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn submit(
  settings: &Settings,
  entity: EntityKind,
  id: &str,
  candidate: &Path,
) -> Result<ExitCode> {
  let candidate = read_json(candidate)?;
  let client = ApiClient::new(settings.api.clone())?;
  let original = client.fetch(entity, id).await?;

  match commands::preflight(entity, &original, &candidate)? {
    Outcome::Invalid(errors) => report_invalid(errors),
    Outcome::NothingToSubmit => {
      tracing::info!(%entity, id, "nothing to submit");
      Ok(ExitCode::SUCCESS)
    }
    Outcome::Patch(patch) => {
      client.patch(entity, id, &patch).await?;
      tracing::info!(%entity, id, fields = patch.len(), "patch submitted");
      Ok(ExitCode::SUCCESS)
    }
  }
}

async fn serve(settings: &Settings) -> Result<()> {
  let app = Router::new()
    .nest("/api", warden_api::api_router())
    .layer(TraceLayer::new_for_http());
  let address = settings.server.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn read_json(path: &Path) -> Result<Value> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading {}", path.display()))?;
  serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

fn report_invalid(errors: warden_core::validation::ValidationErrors) -> Result<ExitCode> {
  for error in errors {
    eprintln!("{}: {}", error.field, error.message);
  }
  Ok(ExitCode::FAILURE)
}
