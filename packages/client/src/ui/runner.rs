//! Component wiring and command dispatch.

use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::{
    config::{ClientArgs, ClientConfig, Command},
    domain::{Submission, SubmissionId, TrackId},
    error::ClientError,
    infrastructure::{
        gateway::{HttpConfigService, HttpMediaProvider},
        host::LocalHostContainer,
        storage::JsonFileStore,
    },
    usecase::{EngagementThrottle, ExternalConfigResolver, ProxyRewriter, StreamResolver},
};

use super::console;

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Components shared by every command
pub struct AppContext {
    pub rewriter: Arc<ProxyRewriter>,
    pub config: Arc<ExternalConfigResolver>,
    pub streams: Arc<StreamResolver>,
    pub throttle: EngagementThrottle,
}

/// Build the components from configuration.
///
/// Inside the host container the proxy mappings are registered first; a
/// failed registration only downgrades to the generic proxy endpoint.
pub async fn build_context(config: &ClientConfig) -> Result<AppContext, ClientError> {
    let rewriter = Arc::new(ProxyRewriter::new(config.origin.as_deref()));
    if rewriter.is_hosted_in_container() {
        let host = LocalHostContainer::new();
        rewriter
            .register_mappings(&host, config.proxy_mappings.clone())
            .await;
    }

    let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    let config_service = Arc::new(HttpConfigService::new(
        client.clone(),
        &config.config_url,
        rewriter.clone(),
    ));
    let resolver = Arc::new(ExternalConfigResolver::new(
        config_service,
        config.env_credentials.clone(),
        config.mode,
    ));

    let provider = Arc::new(HttpMediaProvider::new(
        client,
        &config.provider_api_url,
        rewriter.clone(),
    ));
    let streams = Arc::new(StreamResolver::new(
        provider,
        resolver.clone(),
        rewriter.clone(),
    ));

    let store = Arc::new(JsonFileStore::new(&config.state_dir));
    tracing::debug!("Client state directory: {}", store.dir().display());
    let throttle = EngagementThrottle::new(store);

    Ok(AppContext {
        rewriter,
        config: resolver,
        streams,
        throttle,
    })
}

/// Client entry point
pub async fn run_client(args: ClientArgs) -> Result<(), ClientError> {
    let config = ClientConfig::from(&args);
    let context = build_context(&config).await?;

    match args.command {
        Command::Play { file, track_ids } => {
            let submissions = load_submissions(file, track_ids)?;
            console::run(context, submissions).await
        }
        Command::Resolve { track_ids } => {
            let results = context.streams.resolve_streams(&track_ids).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        Command::Profile { user_id } => {
            let profile = context.streams.fetch_user_profile(&user_id).await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(())
        }
    }
}

/// Submissions from a JSON file, or one per track id
fn load_submissions(
    file: Option<PathBuf>,
    track_ids: Vec<String>,
) -> Result<Vec<Submission>, ClientError> {
    if let Some(path) = file {
        let raw = std::fs::read_to_string(&path)?;
        let submissions: Vec<Submission> = serde_json::from_str(&raw)?;
        tracing::info!("Loaded {} submission(s) from {}", submissions.len(), path.display());
        return Ok(submissions);
    }

    Ok(track_ids
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let id = SubmissionId::new(format!("sub-{}", i + 1)).ok()?;
            let track_id = TrackId::new(raw.clone()).ok();
            if track_id.is_none() {
                tracing::warn!("Submission {} has no valid track id", id);
            }
            Some(Submission::new(id, format!("Track {}", raw.trim()), track_id))
        })
        .collect())
}
