//! Inspection console - CLI client for a remote visual-inspection service.
//!
//! One subcommand per view of the console: login/register, object
//! management, single and batch inspection, history, analytics, and
//! training.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inspect_console::{
    decide, AccessDecision, AnalyticsApi, ApiError, AuthApi, Cli, Command, FilePart, Gateway,
    InspectionApi, ObjectsApi, ObjectsCommand, SessionStore, TrainingApi, View,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base_url = match cli.api_url() {
        Ok(url) => url,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let session = match &cli.token_file {
        Some(path) => SessionStore::new(path.clone()),
        None => SessionStore::at_default_path(),
    };
    let gateway = Gateway::new(base_url, session);

    match run(cli.command, gateway).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, gateway: Gateway) -> Result<(), ApiError> {
    match command {
        Command::Login { username, password } => {
            AuthApi::new(gateway).login(&username, &password).await?;
            println!("Logged in as {username}.");
        }

        Command::Logout => {
            AuthApi::new(gateway).logout();
            println!("Logged out.");
        }

        Command::Register { username, password } => {
            let message = AuthApi::new(gateway).register(&username, &password).await?;
            if message.is_empty() {
                println!("Registered {username}.");
            } else {
                println!("{message}");
            }
        }

        Command::Objects { command } => match command {
            ObjectsCommand::Create { name } => {
                let object = ObjectsApi::new(gateway).create(&name).await?;
                println!("Created object {} ({})", object.name, object.id);
            }
            ObjectsCommand::List => {
                let objects = ObjectsApi::new(gateway).list().await?;
                if objects.is_empty() {
                    println!("(no objects registered)");
                } else {
                    for object in objects {
                        println!("{}  {}", object.id, object.name);
                    }
                }
            }
        },

        Command::Analytics { object_id } => {
            let summary = AnalyticsApi::new(gateway).summary(&object_id).await?;
            println!("Inspections: {}", summary.total);
            println!("  normal: {}", summary.normal);
            println!("  defect: {}", summary.defect);
            println!("  defect rate: {:.2}%", summary.defect_rate_percent);
        }

        Command::Inspect {
            object_id,
            file,
            output,
        } => {
            let part = read_file_part(&file)?;
            let result = InspectionApi::new(gateway).inspect(&object_id, part).await?;

            let output = output.unwrap_or_else(|| heatmap_path(&file));
            std::fs::write(&output, &result.image).map_err(|e| {
                ApiError::Validation(format!("cannot write {}: {e}", output.display()))
            })?;

            println!(
                "{}  score {:.4}  heatmap saved to {}",
                result.classification,
                result.score,
                output.display()
            );
            match image::load_from_memory(&result.image) {
                Ok(img) => println!("  heatmap: {}x{} px", img.width(), img.height()),
                Err(e) => debug!("heatmap not decodable as an image: {}", e),
            }
        }

        Command::Batch { object_id, files } => {
            let parts = files
                .iter()
                .map(|p| read_file_part(p))
                .collect::<Result<Vec<_>, _>>()?;
            let items = InspectionApi::new(gateway)
                .inspect_batch(&object_id, parts)
                .await?;

            let mut defects = 0;
            for item in &items {
                if item.classification().map(|c| c.is_defect()).unwrap_or(false) {
                    defects += 1;
                }
                println!("{:<32} {:>8.4}  {}", item.filename, item.score, item.result);
            }
            println!("{} file(s), {} defect(s)", items.len(), defects);
        }

        Command::History { object_id } => {
            let records = InspectionApi::new(gateway).history(&object_id).await?;
            if records.is_empty() {
                println!("(no inspections recorded)");
            } else {
                for record in records {
                    println!(
                        "{}  {:<32} {:>8.4}  {}",
                        record.timestamp, record.filename, record.score, record.result
                    );
                }
            }
        }

        Command::Train { object_id, files } => {
            let parts = files
                .iter()
                .map(|p| read_file_part(p))
                .collect::<Result<Vec<_>, _>>()?;
            let outcome = TrainingApi::new(gateway).train(&object_id, parts).await?;
            println!("Trained on {} image(s).", outcome.images_used);
        }

        Command::Session => {
            let signed_in = gateway.session().is_signed_in();
            println!(
                "Session: {}",
                if signed_in { "signed in" } else { "signed out" }
            );
            for view in View::ALL {
                let decision = match decide(view, signed_in) {
                    AccessDecision::Allow => "allow",
                    AccessDecision::RedirectToLogin => "redirect to login",
                };
                println!("  {:<10} {}", view.name(), decision);
            }
        }
    }

    Ok(())
}

/// Read an upload from disk, keeping its file name as the inspection key.
fn read_file_part(path: &Path) -> Result<FilePart, ApiError> {
    let bytes = std::fs::read(path)
        .map_err(|e| ApiError::Validation(format!("cannot read {}: {e}", path.display())))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.png")
        .to_string();
    Ok(FilePart::new(filename, bytes))
}

/// Default output path for the annotated heatmap: `heatmap-<input stem>.png`
/// next to the current directory.
fn heatmap_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("inspection");
    PathBuf::from(format!("heatmap-{stem}.png"))
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "inspect_console=debug"
    } else {
        "inspect_console=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
