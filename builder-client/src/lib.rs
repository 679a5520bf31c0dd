//! # Page Builder Client
//!
//! Command-line host for the page builder core: fetches workspaces from the
//! backend, applies edits through an [`builder_core::EditorSession`], and
//! saves or exports the result.
//!
//! ## Usage
//!
//! ```bash
//! almabuild --api-url http://localhost:5000/api --token $TOKEN show 65f1c0
//! almabuild export 65f1c0 --out ./exports
//! almabuild set-color 65f1c0 '#fafafa'
//! almabuild add-image 65f1c0 ./logo.png --x 20 --y 20
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ClientConfig` - API location, credentials and canvas size
//! - `WorkspaceClient` - reqwest client for `GET`/`PUT /workspaces/{id}`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod export;
mod gateway;
mod image_loader;

pub use export::write_export;
pub use gateway::{GatewayError, Session, WorkspaceClient};
pub use image_loader::load_image;

use std::path::PathBuf;

use builder_core::CanvasSize;
use clap::{Parser, Subcommand};

/// Default backend URL when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Command-line arguments for almabuild.
#[derive(Debug, Clone, Parser)]
#[command(name = "almabuild")]
#[command(about = "Inspect, export and edit page-builder workspaces")]
#[command(version)]
pub struct CliArgs {
    /// Workspace API base URL (e.g., <http://localhost:5000/api>)
    #[arg(long, env = "ALMABUILD_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token for the workspace API
    #[arg(long, env = "ALMABUILD_TOKEN", default_value = "")]
    pub token: String,

    /// Canvas width in pixels
    #[arg(long, default_value = "1280")]
    pub canvas_width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value = "720")]
    pub canvas_height: f64,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the elements of a workspace
    Show {
        /// Workspace id
        workspace: String,
    },
    /// Write `{workspaceName}_export.json`
    Export {
        /// Workspace id
        workspace: String,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Change the canvas color and save
    SetColor {
        /// Workspace id
        workspace: String,
        /// New color as #rrggbb
        color: String,
    },
    /// Embed an image file as a new element and save
    AddImage {
        /// Workspace id
        workspace: String,
        /// Image file
        file: PathBuf,
        /// X position
        #[arg(long, default_value = "0")]
        x: f64,
        /// Y position
        #[arg(long, default_value = "0")]
        y: f64,
    },
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Workspace API base URL.
    pub api_url: String,
    /// Bearer token.
    pub token: String,
    /// Canvas bounds elements are clamped to.
    pub canvas: CanvasSize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: String::new(),
            canvas: CanvasSize::new(1280.0, 720.0),
        }
    }

    /// Build the API session described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidUrl`] if the API URL is malformed.
    pub fn session(&self) -> Result<Session, GatewayError> {
        Session::new(&self.api_url, self.token.clone())
    }
}

impl From<&CliArgs> for ClientConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            api_url: args.api_url.clone(),
            token: args.token.clone(),
            canvas: CanvasSize::new(args.canvas_width, args.canvas_height),
        }
    }
}
