//! Edge server configuration.

use clap::Parser;

/// Display name used when `PROVIDER_APP_NAME` is not set
pub const DEFAULT_APP_NAME: &str = "boostroom";

/// Command line arguments for the edge server.
///
/// Every option can also be provided through the environment.
#[derive(Debug, Parser)]
#[command(name = "boostroom-server", version, about = "Boostroom edge configuration endpoint")]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "BOOSTROOM_BIND", default_value = "127.0.0.1:8787")]
    pub bind: String,

    /// Media-provider API key served to clients
    #[arg(long, env = "PROVIDER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Media-provider app name served to clients
    #[arg(long, env = "PROVIDER_APP_NAME")]
    pub app_name: Option<String>,
}

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    pub bind: String,
    /// `None` makes `/api/config` answer 500
    pub api_key: Option<String>,
    pub app_name: String,
}

impl From<ServerArgs> for EdgeConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            bind: args.bind,
            api_key: args.api_key.filter(|key| !key.trim().is_empty()),
            app_name: args
                .app_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
        }
    }
}
