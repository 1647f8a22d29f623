//! CLI definition and configuration for the inspection console.
//!
//! All connection settings can also come from environment variables with the
//! `INSPECT_` prefix:
//!
//! - `INSPECT_API_URL` - Base URL of the inspection service (default: http://127.0.0.1:8000)
//! - `INSPECT_TOKEN_FILE` - Where the session token is persisted (default: platform config dir)

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

/// Default base URL of the inspection service.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

// =============================================================================
// CLI
// =============================================================================

/// Inspection console - client for a remote visual-inspection service.
///
/// Registers objects, uploads images for anomaly inspection, reviews
/// inspection history and analytics, and trains per-object profiles.
#[derive(Parser, Debug, Clone)]
#[command(name = "inspect-console")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the inspection service.
    #[arg(long, default_value = DEFAULT_API_URL, env = "INSPECT_API_URL", global = true)]
    pub api_url: String,

    /// Override the session token file location.
    ///
    /// By default the token lives in the platform config directory so the
    /// session survives console restarts.
    #[arg(long, env = "INSPECT_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse and validate the service base URL.
    pub fn api_url(&self) -> Result<Url, String> {
        Url::parse(&self.api_url)
            .map_err(|e| format!("invalid --api-url {:?}: {}", self.api_url, e))
    }
}

// =============================================================================
// Commands
// =============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and store the session token.
    Login {
        #[arg(long, short)]
        username: String,
        #[arg(long, short)]
        password: String,
    },

    /// Drop the stored session token.
    Logout,

    /// Create an account on the inspection service.
    Register {
        #[arg(long, short)]
        username: String,
        #[arg(long, short)]
        password: String,
    },

    /// Manage inspection objects.
    Objects {
        #[command(subcommand)]
        command: ObjectsCommand,
    },

    /// Show inspection statistics for an object.
    Analytics {
        /// Object identifier (see `objects list`).
        object_id: String,
    },

    /// Inspect a single image and save the annotated heatmap.
    Inspect {
        object_id: String,
        /// Image file to inspect.
        file: PathBuf,
        /// Where to write the annotated heatmap (default: heatmap-<file>.png).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Inspect several images in one call.
    Batch {
        object_id: String,
        /// Image files to inspect.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show the inspection history of an object.
    History { object_id: String },

    /// Train an object's profile on reference images.
    Train {
        object_id: String,
        /// Reference images of the normal state.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show the session state and per-view access decisions.
    Session,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ObjectsCommand {
    /// Register a new object.
    Create { name: String },
    /// List all registered objects.
    List,
}

// =============================================================================
// Tests
// =============================================================================
