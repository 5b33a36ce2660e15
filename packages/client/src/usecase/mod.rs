//! UseCase 層
//!
//! 再生・ブースト制御のロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層の trait を通じて外部サービスを操作します。

pub mod config_resolver;
pub mod engagement_throttle;
pub mod proxy_rewriter;
pub mod shuffle_sequencer;
pub mod stream_resolver;

pub use config_resolver::{DEFAULT_APP_NAME, EnvCredentials, ExecutionMode, ExternalConfigResolver};
pub use engagement_throttle::{EngagementThrottle, GUEST_BOOST_LIMIT, Remaining};
pub use proxy_rewriter::{ProxyRewriter, default_mappings};
pub use shuffle_sequencer::ShuffleSequencer;
pub use stream_resolver::{StreamResolution, StreamResolver};
