//! UseCase: 外部サービス設定（API キー）の解決
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ExternalConfigResolver::get_config() のメモ化と解決順序
//!
//! ### なぜこのテストが必要か
//! - 同時に呼び出されてもネットワーク呼び出しが 1 回に抑えられることを保証
//! - リモート設定の失敗時に環境変数へフォールバックすることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：リモート設定の取得成功、ローカル開発モード
//! - 異常系：リモート失敗 + 環境変数なし、apiKey 欠落、error フィールド付き応答
//! - エッジケース：appName 欠落時のデフォルト名

use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

use crate::domain::{ConfigService, ExternalConfig, RemoteConfig, ResolveError};

/// Display name used when neither the remote payload nor the environment has one
pub const DEFAULT_APP_NAME: &str = "boostroom";

/// Shared handle on the single config resolution
pub type ConfigFuture = Shared<BoxFuture<'static, Result<ExternalConfig, ResolveError>>>;

/// How credentials are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Environment values only
    LocalDevelopment,
    /// Remote config service, environment as fallback
    Deployed,
}

/// Provider credentials taken from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvCredentials {
    pub api_key: Option<String>,
    pub app_name: Option<String>,
}

impl EnvCredentials {
    fn to_config(&self) -> Option<ExternalConfig> {
        let api_key = non_blank(self.api_key.clone())?;
        Some(ExternalConfig {
            api_key,
            app_name: non_blank(self.app_name.clone())
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
        })
    }
}

/// 外部サービス設定の解決（プロセス内で 1 回だけ実行される）
pub struct ExternalConfigResolver {
    /// 設定サービス（データアクセス層の抽象化）
    service: Arc<dyn ConfigService>,
    env: EnvCredentials,
    mode: ExecutionMode,
    /// 解決中または解決済みの Future
    cached: Mutex<Option<ConfigFuture>>,
}

impl ExternalConfigResolver {
    /// 新しい ExternalConfigResolver を作成
    pub fn new(service: Arc<dyn ConfigService>, env: EnvCredentials, mode: ExecutionMode) -> Self {
        Self {
            service,
            env,
            mode,
            cached: Mutex::new(None),
        }
    }

    /// 設定を取得
    ///
    /// 最初の呼び出しで解決を開始し、以降の呼び出し（同時実行中を含む）は
    /// 同じ Future の結果を受け取ります。
    ///
    /// # Returns
    ///
    /// * `Ok(ExternalConfig)` - 解決成功
    /// * `Err(ResolveError)` - 全てのフォールバックが失敗
    pub async fn get_config(&self) -> Result<ExternalConfig, ResolveError> {
        self.shared_config().await.await
    }

    /// 共有 Future そのものを取得
    pub async fn shared_config(&self) -> ConfigFuture {
        let mut cached = self.cached.lock().await;
        if let Some(future) = cached.as_ref() {
            return future.clone();
        }

        tracing::debug!("Starting provider config resolution ({:?})", self.mode);
        let future = resolve(self.service.clone(), self.env.clone(), self.mode)
            .boxed()
            .shared();
        *cached = Some(future.clone());
        future
    }

    /// 解決済みの設定（未解決・失敗時は None）
    pub async fn resolved(&self) -> Option<ExternalConfig> {
        let cached = self.cached.lock().await;
        cached
            .as_ref()
            .and_then(|future| future.peek())
            .and_then(|result| result.as_ref().ok())
            .cloned()
    }

    /// キャッシュを破棄する（テスト間の分離用）
    pub async fn reset_for_testing(&self) {
        *self.cached.lock().await = None;
    }
}

async fn resolve(
    service: Arc<dyn ConfigService>,
    env: EnvCredentials,
    mode: ExecutionMode,
) -> Result<ExternalConfig, ResolveError> {
    // 1. ローカル開発モードは環境変数のみ
    if mode == ExecutionMode::LocalDevelopment {
        return env.to_config().ok_or_else(|| {
            tracing::error!("PROVIDER_API_KEY is not set for local development");
            ResolveError::ConfigurationMissing
        });
    }

    // 2. リモート設定を取得・検証
    let remote = match service.fetch_config().await {
        Ok(payload) => validate(payload),
        Err(e) => Err(e),
    };

    // 3. 失敗時は環境変数にフォールバック
    match remote {
        Ok(config) => {
            tracing::info!("Resolved provider config from remote service");
            Ok(config)
        }
        Err(e) => match env.to_config() {
            Some(config) => {
                tracing::warn!("Remote config failed ({}), using environment values", e);
                Ok(config)
            }
            None => {
                tracing::error!("Remote config failed and no environment fallback: {}", e);
                Err(e)
            }
        },
    }
}

fn validate(payload: RemoteConfig) -> Result<ExternalConfig, ResolveError> {
    if let Some(error) = payload.error {
        return Err(ResolveError::ConfigRejected(error));
    }
    let api_key = non_blank(payload.api_key)
        .ok_or_else(|| ResolveError::ConfigMalformed("apiKey is missing".to_string()))?;
    Ok(ExternalConfig {
        api_key,
        app_name: non_blank(payload.app_name).unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
