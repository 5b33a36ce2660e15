//! UseCase: ホストコンテナ内でのプロキシ URL 書き換え
//!
//! ホストコンテナ（埋め込み先のチャットクライアント）内では外部への通信が
//! `/.proxy` 配下のパスに制限されるため、送信先 URL を書き換えます。
//!
//! ### どのような状況を想定しているか
//! - 通常のブラウザ / ローカル実行: URL はそのまま
//! - コンテナ内: 固定のプロキシパスに元の URL とクエリを載せる
//! - コンテナ内かつマッピング登録済み: 対応するプレフィックスへ転送

use std::sync::OnceLock;

use url::{Url, form_urlencoded};

use crate::domain::{HostContainerSdk, ProxyMapping};

/// ホストコンテナを示す origin ホスト名の一部
pub const HOST_DOMAIN_FRAGMENT: &str = "discordsays.com";

/// 任意の URL を中継するローカルプロキシのパス
pub const PROXY_PATH: &str = "/.proxy/api/stream-proxy";

/// 登録済みマッピングの転送先パスの接頭辞
pub const MAPPING_PATH_PREFIX: &str = "/.proxy";

/// ホストコンテナ向けの URL 書き換え
#[derive(Debug, Default)]
pub struct ProxyRewriter {
    origin: Option<Url>,
    hosted: bool,
    mappings: OnceLock<Vec<ProxyMapping>>,
}

impl ProxyRewriter {
    /// クライアントが動作しているページの origin から作成
    ///
    /// 解析できない origin はコンテナ外として扱います。
    pub fn new(origin: Option<&str>) -> Self {
        let origin = origin.and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Ignoring invalid origin '{}': {}", raw, e);
                None
            }
        });
        let hosted = origin
            .as_ref()
            .and_then(|url| url.host_str())
            .is_some_and(|host| host.contains(HOST_DOMAIN_FRAGMENT));

        Self {
            origin,
            hosted,
            mappings: OnceLock::new(),
        }
    }

    /// ホストコンテナ内で動作しているかどうか
    pub fn is_hosted_in_container(&self) -> bool {
        self.hosted
    }

    /// URL をローカルプロキシ経由の URL に書き換え
    ///
    /// コンテナ外、または `None` の場合は入力をそのまま返します。
    /// 生の文字列を最初の `?` で分割するため、署名付き URL はバイト単位で
    /// そのままプロキシに届きます。`is_pre_signed` の場合は `presigned=1` を付け、
    /// プロキシに再デコードさせません。各値はパーセントエンコード（空白は `%20`）します。
    pub fn proxied_url(&self, url: Option<&str>, is_pre_signed: bool) -> Option<String> {
        let url = url?;
        if !self.hosted {
            return Some(url.to_string());
        }

        let (base, query) = match url.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (url, None),
        };

        let mut proxied = format!("{PROXY_PATH}?url={}", encode_component(base));
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            proxied.push_str("&query=");
            proxied.push_str(&encode_component(query));
        }
        if is_pre_signed {
            proxied.push_str("&presigned=1");
        }

        Some(proxied)
    }

    /// ホストコンテナに転送ルールを登録
    ///
    /// SDK の準備完了を待ってから登録します。失敗はログに記録するのみで、
    /// 以降も汎用プロキシを使い続けます。
    ///
    /// # Returns
    ///
    /// マッピングが有効になったかどうか
    pub async fn register_mappings(
        &self,
        sdk: &dyn HostContainerSdk,
        mappings: Vec<ProxyMapping>,
    ) -> bool {
        if !self.hosted {
            tracing::debug!("Not hosted in container, skipping proxy mapping registration");
            return false;
        }

        if let Err(e) = sdk.ready().await {
            tracing::warn!("Host container not ready, using direct requests: {}", e);
            return false;
        }

        if let Err(e) = sdk.register_mappings(&mappings).await {
            tracing::warn!("Failed to register proxy mappings, using direct requests: {}", e);
            return false;
        }

        let count = mappings.len();
        if self.mappings.set(mappings).is_err() {
            tracing::warn!("Proxy mappings were already registered, keeping the first set");
            return false;
        }
        tracing::info!("Registered {} proxy mapping(s)", count);
        true
    }

    /// 登録済みのマッピング（登録成功までは空）
    pub fn mappings(&self) -> &[ProxyMapping] {
        self.mappings.get().map(Vec::as_slice).unwrap_or_default()
    }

    /// 送信リクエストの URL を振り分け
    ///
    /// コンテナ内で URL のホストに対応するマッピングがあれば
    /// `/.proxy{prefix}{path}?{query}` へ、なければ汎用プロキシへ送ります。
    /// コンテナ外では変更しません。
    pub fn route(&self, url: &str) -> String {
        if !self.hosted {
            return url.to_string();
        }

        if let Ok(parsed) = Url::parse(url)
            && let Some(host) = parsed.host_str()
            && let Some(mapping) = self.mappings().iter().find(|m| m.target == host)
        {
            let mut routed = format!("{MAPPING_PATH_PREFIX}{}{}", mapping.prefix, parsed.path());
            if let Some(query) = parsed.query() {
                routed.push('?');
                routed.push_str(query);
            }
            return routed;
        }

        self.proxied_url(Some(url), false)
            .unwrap_or_else(|| url.to_string())
    }

    /// ルート相対パスをコンテナの origin で絶対 URL にする
    pub fn absolute(&self, path: &str) -> String {
        match &self.origin {
            Some(origin) if path.starts_with('/') => origin
                .join(path)
                .map(String::from)
                .unwrap_or_else(|_| path.to_string()),
            _ => path.to_string(),
        }
    }
}

/// クエリ値のパーセントエンコード
///
/// `byte_serialize` は `+` を `%2B` にするため、残る `+` は空白のみ
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// 起動時のマッピング: `/api` → サイト、`/storage` → バックエンドサービス、
/// `/provider` → メディアプロバイダー API（未設定・不正な URL は除外）
pub fn default_mappings(
    site_url: Option<&str>,
    storage_url: Option<&str>,
    provider_api_url: Option<&str>,
) -> Vec<ProxyMapping> {
    [
        ("/api", site_url),
        ("/storage", storage_url),
        ("/provider", provider_api_url),
    ]
    .into_iter()
    .filter_map(|(prefix, url)| url.and_then(|u| ProxyMapping::from_service_url(prefix, u)))
    .collect()
}
