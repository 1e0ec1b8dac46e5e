use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use checkpoint::checkin::{CheckinService, RosterSummary};
use checkpoint::cli::{Cli, Command};
use checkpoint::config::CheckpointConfig;
use checkpoint::issuance::{PngQrRenderer, QrIssuer};
use checkpoint::store::AttendeeStore;
use checkpoint::ui::{self, BatchProgress};
use checkpoint::{roster, web};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CheckpointConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    init_tracing(cli.verbose || config.debug);

    match cli.command {
        Command::Serve => {
            let state = web::AppState::new(config, Arc::new(PngQrRenderer))?;
            web::serve(state).await
        }
        Command::Roster { count, force } => write_roster(&config, count, force).await,
        Command::IssueQr => {
            let progress = BatchProgress::start("Rendering entry QR codes");
            match service(&config).issue_entry_qrs(&config.local_base_url()).await {
                Ok(count) => {
                    progress.complete(&format!("QR codes generated for {count} paid attendees."));
                    Ok(())
                }
                Err(e) => {
                    progress.fail(&e.to_string());
                    Err(e.into())
                }
            }
        }
        Command::IssueLunchQr => {
            let progress = BatchProgress::start("Rendering lunch QR codes");
            match service(&config).issue_lunch_qrs(&config.local_base_url()).await {
                Ok(count) => {
                    progress.complete(&format!("Lunch QR codes generated for {count} attendees."));
                    Ok(())
                }
                Err(e) => {
                    progress.fail(&e.to_string());
                    Err(e.into())
                }
            }
        }
        Command::Status => {
            let attendees = service(&config).roster().await?;
            ui::print_summary(&RosterSummary::from_attendees(&attendees), &config.data_file);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).init();
}

fn service(config: &CheckpointConfig) -> CheckinService {
    let store = AttendeeStore::new(config.data_file.clone());
    let issuer = QrIssuer::new(Arc::new(PngQrRenderer), &config.static_dir);
    CheckinService::new(store, issuer)
}

async fn write_roster(config: &CheckpointConfig, count: u32, force: bool) -> Result<()> {
    let store = AttendeeStore::new(config.data_file.clone());
    if store.exists().await && !force {
        bail!(
            "{} already exists. Pass --force to overwrite it.",
            store.path().display()
        );
    }

    let attendees = roster::generate(&mut rand::rng(), count);
    store.replace(&attendees).await?;

    let paid = attendees.iter().filter(|a| a.paid).count();
    info!(count, paid, path = %store.path().display(), "roster written");
    println!(
        "Generated {count} attendees ({paid} paid) in {}",
        store.path().display()
    );
    Ok(())
}
