//! UseCase: トラック ID から再生可能な URL を解決
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - StreamResolver::resolve_stream() / resolve_streams() / fetch_user_profile()
//! - 解決結果のキャッシュ（鮮度切れ時の再取得と、再取得失敗時の古い値の利用）
//!
//! ### なぜこのテストが必要か
//! - 一括解決で 1 件が失敗しても全体が失敗しないことを保証
//! - 結果の順序が入力の順序と一致することを保証
//! - ホストコンテナ内ではプロキシ経由の URL が返ることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：単体・一括解決、キャッシュヒット
//! - 異常系：ID なし、プロバイダーにストリームなし、設定解決の失敗
//! - エッジケース：鮮度切れキャッシュの再取得失敗

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use futures_util::future::join_all;
use moka::future::Cache;
use serde::Serialize;

use super::{config_resolver::ExternalConfigResolver, proxy_rewriter::ProxyRewriter};
use crate::domain::{MediaProvider, ResolveError, TrackId, UserProfile};

/// How long a resolved stream URL is used without refetching
pub const STREAM_FRESH_FOR: Duration = Duration::from_secs(30 * 60);

/// How long a resolved stream URL is retained (stale) before eviction
pub const STREAM_RETAIN_FOR: Duration = Duration::from_secs(60 * 60);

const STREAM_CACHE_CAPACITY: u64 = 1_024;

#[derive(Debug, Clone)]
struct CachedStream {
    url: String,
    fetched_at: Instant,
}

/// One entry of a batch resolution; `url` is `None` when that track failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResolution {
    pub track_id: String,
    pub url: Option<String>,
}

/// トラック ID → 再生 URL の解決
pub struct StreamResolver {
    /// メディアプロバイダー（データアクセス層の抽象化）
    provider: Arc<dyn MediaProvider>,
    config: Arc<ExternalConfigResolver>,
    rewriter: Arc<ProxyRewriter>,
    cache: Cache<String, CachedStream>,
    fresh_for: Duration,
}

impl StreamResolver {
    /// 新しい StreamResolver を作成
    pub fn new(
        provider: Arc<dyn MediaProvider>,
        config: Arc<ExternalConfigResolver>,
        rewriter: Arc<ProxyRewriter>,
    ) -> Self {
        Self::with_cache_windows(provider, config, rewriter, STREAM_FRESH_FOR, STREAM_RETAIN_FOR)
    }

    /// キャッシュの鮮度期間・保持期間を指定して作成
    pub fn with_cache_windows(
        provider: Arc<dyn MediaProvider>,
        config: Arc<ExternalConfigResolver>,
        rewriter: Arc<ProxyRewriter>,
        fresh_for: Duration,
        retain_for: Duration,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(STREAM_CACHE_CAPACITY)
            .time_to_live(retain_for)
            .build();
        Self {
            provider,
            config,
            rewriter,
            cache,
            fresh_for,
        }
    }

    /// 1 件のトラックの再生 URL を解決
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - 再生 URL（コンテナ内ではプロキシ経由）
    /// * `Err(ResolveError::TrackNotFound)` - ID なし、またはストリームなし
    /// * `Err(ResolveError)` - 設定解決・通信の失敗
    pub async fn resolve_stream(&self, track_id: &str) -> Result<String, ResolveError> {
        let track_id = TrackId::new(track_id.to_string())
            .map_err(|e| ResolveError::TrackNotFound(e.to_string()))?;

        // 1. 鮮度内のキャッシュがあればそのまま返す
        let cached = self.cache.get(track_id.as_str()).await;
        if let Some(entry) = &cached
            && entry.fetched_at.elapsed() < self.fresh_for
        {
            return Ok(entry.url.clone());
        }

        // 2. プロバイダーから取得（失敗はキャッシュしない）
        match self.fetch(&track_id).await {
            Ok(url) => {
                self.cache
                    .insert(
                        track_id.as_str().to_string(),
                        CachedStream {
                            url: url.clone(),
                            fetched_at: Instant::now(),
                        },
                    )
                    .await;
                Ok(url)
            }
            // 3. 再取得に失敗した場合は保持中の古い値を返す
            Err(e) => match cached {
                Some(stale) => {
                    tracing::warn!("Refetch of '{}' failed ({}), serving stale URL", track_id, e);
                    Ok(stale.url)
                }
                None => Err(e),
            },
        }
    }

    /// 複数のトラックを並行して解決
    ///
    /// 個別の失敗は `url: None` として返し、全体は失敗しません。
    /// 結果の順序は `track_ids` の順序と一致します。
    pub async fn resolve_streams(&self, track_ids: &[String]) -> Vec<StreamResolution> {
        let resolutions = track_ids.iter().map(|track_id| async move {
            let url = match self.resolve_stream(track_id).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!("Failed to resolve stream for '{}': {}", track_id, e);
                    None
                }
            };
            StreamResolution {
                track_id: track_id.clone(),
                url,
            }
        });
        join_all(resolutions).await
    }

    /// プロバイダーのユーザープロフィールを取得
    pub async fn fetch_user_profile(&self, user_id: &str) -> Result<UserProfile, ResolveError> {
        let config = self.config.get_config().await?;
        self.provider.fetch_user_profile(&config, user_id).await
    }

    async fn fetch(&self, track_id: &TrackId) -> Result<String, ResolveError> {
        let config = self.config.get_config().await?;
        let url = self.provider.fetch_stream_url(&config, track_id).await?;
        if url.trim().is_empty() {
            return Err(ResolveError::TrackNotFound(track_id.to_string()));
        }
        // プロバイダーの URL は署名付きのためデコードさせない
        Ok(self
            .rewriter
            .proxied_url(Some(&url), true)
            .unwrap_or(url))
    }
}
