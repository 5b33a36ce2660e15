//! Client configuration.
//!
//! Command line arguments (each with an environment fallback) and the plain
//! configuration struct the layers are built from.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    domain::ProxyMapping,
    usecase::{EnvCredentials, ExecutionMode, default_mappings},
};

/// Command line arguments for the playback client
#[derive(Debug, Parser)]
#[command(name = "boostroom-client", version, about = "Boostroom playback and boost console")]
pub struct ClientArgs {
    /// Edge configuration endpoint
    #[arg(long, env = "BOOSTROOM_CONFIG_URL", default_value = "http://127.0.0.1:8787/api/config")]
    pub config_url: String,

    /// Page origin the client runs under (a host-container origin enables proxying)
    #[arg(long, env = "BOOSTROOM_ORIGIN")]
    pub origin: Option<String>,

    /// Local development: resolve credentials from the environment only
    #[arg(long, env = "BOOSTROOM_DEV")]
    pub dev: bool,

    /// Directory holding persisted client state
    #[arg(long, env = "BOOSTROOM_STATE_DIR", default_value = ".boostroom")]
    pub state_dir: PathBuf,

    /// Media-provider API base URL
    #[arg(long, env = "PROVIDER_API_URL")]
    pub provider_api_url: String,

    /// Media-provider API key (fallback when the remote config fails)
    #[arg(long, env = "PROVIDER_API_KEY", hide_env_values = true)]
    pub provider_api_key: Option<String>,

    /// Media-provider app name
    #[arg(long, env = "PROVIDER_APP_NAME")]
    pub provider_app_name: Option<String>,

    /// Internal site URL (proxied under /api)
    #[arg(long, env = "SITE_URL")]
    pub site_url: Option<String>,

    /// Backing-service URL (proxied under /storage)
    #[arg(long, env = "STORAGE_URL")]
    pub storage_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive playback console over the given tracks
    Play {
        /// JSON file with a list of submissions
        #[arg(long)]
        file: Option<PathBuf>,
        /// Provider track ids (used when no file is given)
        track_ids: Vec<String>,
    },
    /// Resolve stream URLs for the given tracks and print them as JSON
    Resolve {
        #[arg(required = true)]
        track_ids: Vec<String>,
    },
    /// Print a provider user profile as JSON
    Profile { user_id: String },
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub config_url: String,
    pub origin: Option<String>,
    pub mode: ExecutionMode,
    pub state_dir: PathBuf,
    pub provider_api_url: String,
    pub env_credentials: EnvCredentials,
    pub proxy_mappings: Vec<ProxyMapping>,
}

impl From<&ClientArgs> for ClientConfig {
    fn from(args: &ClientArgs) -> Self {
        Self {
            config_url: args.config_url.clone(),
            origin: args.origin.clone(),
            mode: if args.dev {
                ExecutionMode::LocalDevelopment
            } else {
                ExecutionMode::Deployed
            },
            state_dir: args.state_dir.clone(),
            provider_api_url: args.provider_api_url.clone(),
            env_credentials: EnvCredentials {
                api_key: args.provider_api_key.clone(),
                app_name: args.provider_app_name.clone(),
            },
            proxy_mappings: default_mappings(
                args.site_url.as_deref(),
                args.storage_url.as_deref(),
                Some(args.provider_api_url.as_str()),
            ),
        }
    }
}
