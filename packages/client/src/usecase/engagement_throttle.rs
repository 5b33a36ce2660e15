//! UseCase: ゲストのブースト回数制限
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EngagementThrottle の can_perform / remaining / consume / reset
//! - 永続化された状態の読み込みと 24 時間経過による自動リセット
//!
//! ### なぜこのテストが必要か
//! - 未ログインの訪問者がセッションあたり 5 回までしかブーストできないことを保証
//! - ログインした瞬間に制限が解除・リセットされることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：ゲストが制限内でブースト、ログイン済みユーザーは無制限
//! - 異常系：保存データの破損、ストレージ書き込み失敗
//! - エッジケース：24 時間を超えたセッション、制限到達後のログイン、
//!   起動から時間が経ってからの最初のブースト、保存された極端な開始時刻

use std::sync::Arc;

use boostroom_shared::time::get_utc_timestamp;

use crate::domain::{KeyValueStore, ThrottleState, is_expired};

/// Boosts a guest may perform per session
pub const GUEST_BOOST_LIMIT: u32 = 5;

/// Storage key of the persisted throttle state
pub const THROTTLE_STORAGE_KEY: &str = "boostroom:guest-throttle";

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Boosts left in the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// Authenticated visitors are not limited
    Unbounded,
    Limited(u32),
}

/// ゲストのブースト回数制限
pub struct EngagementThrottle {
    /// 永続ストレージ（データアクセス層の抽象化）
    store: Arc<dyn KeyValueStore>,
    state: ThrottleState,
    authenticated: bool,
    clock: Clock,
}

impl EngagementThrottle {
    /// 新しい EngagementThrottle を作成（未ログイン状態）
    ///
    /// 保存済みの状態を 1 回だけ読み込みます。存在しない・壊れている場合は
    /// 新しいセッションとして開始します。
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Box::new(get_utc_timestamp))
    }

    /// 現在時刻の取得方法を指定して作成
    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        let state = load_state(store.as_ref(), clock());
        Self {
            store,
            state,
            authenticated: false,
            clock,
        }
    }

    /// ブースト可能かどうか
    pub fn can_perform(&mut self) -> bool {
        if self.authenticated {
            return true;
        }
        self.current_state().guest_action_count < GUEST_BOOST_LIMIT
    }

    /// 残りブースト回数
    pub fn remaining(&mut self) -> Remaining {
        if self.authenticated {
            return Remaining::Unbounded;
        }
        let used = self.current_state().guest_action_count;
        Remaining::Limited(GUEST_BOOST_LIMIT.saturating_sub(used))
    }

    /// ブースト 1 回分を消費して保存
    ///
    /// セッション最初の消費でその時刻から 24 時間の窓が始まります。
    /// 許可されたアクション 1 回につき 1 回だけ呼び出すこと（呼び出し側の責務）。
    pub fn consume(&mut self) {
        if self.authenticated {
            return;
        }
        let mut state = self.current_state();
        state.record_action((self.clock)());
        self.state = state;
        self.persist();
        tracing::debug!(
            "Guest boost consumed ({}/{})",
            state.guest_action_count,
            GUEST_BOOST_LIMIT
        );
    }

    /// カウンタを 0 に戻し、現在時刻から新しいセッションを開始
    pub fn reset(&mut self) {
        self.state = ThrottleState::fresh((self.clock)());
        self.persist();
    }

    /// 認証状態を更新（未ログイン → ログインの遷移でリセット）
    pub fn set_authenticated(&mut self, authenticated: bool) {
        let became_authenticated = authenticated && !self.authenticated;
        self.authenticated = authenticated;
        if became_authenticated {
            tracing::info!("Visitor authenticated, resetting guest throttle");
            self.reset();
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// 現在の状態（期限切れなら読み取り時にリセット）
    pub fn current_state(&mut self) -> ThrottleState {
        if is_expired(&self.state, (self.clock)()) {
            tracing::info!("Guest session older than 24h, starting a new one");
            self.reset();
        }
        self.state
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to encode throttle state: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(THROTTLE_STORAGE_KEY, &json) {
            tracing::warn!("Failed to persist throttle state: {}", e);
        }
    }
}

fn load_state(store: &dyn KeyValueStore, now: i64) -> ThrottleState {
    match store.get(THROTTLE_STORAGE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable throttle state: {}", e);
            ThrottleState::fresh(now)
        }),
        Ok(None) => ThrottleState::fresh(now),
        Err(e) => {
            tracing::warn!("Failed to read throttle state: {}", e);
            ThrottleState::fresh(now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{SESSION_WINDOW_MILLIS, StorageError, Timestamp, repository::MockKeyValueStore},
        infrastructure::storage::InMemoryStore,
    };
    use boostroom_shared::time::HOUR_MILLIS;
    use std::sync::atomic::{AtomicI64, Ordering};

    const START: i64 = 1_700_000_000_000;

    fn test_clock(now: &Arc<AtomicI64>) -> Clock {
        let now = now.clone();
        Box::new(move || now.load(Ordering::SeqCst))
    }

    fn store_with(state: ThrottleState) -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        store
            .set(THROTTLE_STORAGE_KEY, &serde_json::to_string(&state).unwrap())
            .unwrap();
        store
    }

    fn stored_state(store: &InMemoryStore) -> ThrottleState {
        let raw = store.get(THROTTLE_STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_guest_limit_reached_on_fifth_consume() {
        // テスト項目: 4 回消費済みなら 5 回目は可能で、その後は残り 0・不可になる
        // given (前提条件):
        let now = Arc::new(AtomicI64::new(START));
        let store = store_with(ThrottleState {
            guest_action_count: 4,
            session_started_at: Timestamp::new(START),
        });
        let mut throttle = EngagementThrottle::with_clock(store.clone(), test_clock(&now));

        // when (操作):
        let before = throttle.can_perform();
        throttle.consume();

        // then (期待する結果):
        assert!(before);
        assert_eq!(throttle.remaining(), Remaining::Limited(0));
        assert!(!throttle.can_perform());
        assert_eq!(stored_state(&store).guest_action_count, 5);
    }

    #[test]
    fn test_fresh_throttle_allows_limit() {
        // テスト項目: 新しいセッションでは 5 回までブーストできる
        // given (前提条件):
        let now = Arc::new(AtomicI64::new(START));
        let mut throttle =
            EngagementThrottle::with_clock(Arc::new(InMemoryStore::new()), test_clock(&now));

        // when (操作):
        let mut performed = 0;
        while throttle.can_perform() && performed < 10 {
            throttle.consume();
            performed += 1;
        }

        // then (期待する結果):
        assert_eq!(performed, GUEST_BOOST_LIMIT);
        assert_eq!(throttle.remaining(), Remaining::Limited(0));
    }

    #[test]
    fn test_authentication_resets_count_at_limit() {
        // テスト項目: 制限到達後でもログインするとカウントが 0 に戻る
        // given (前提条件):
        let now = Arc::new(AtomicI64::new(START));
        let store = store_with(ThrottleState {
            guest_action_count: GUEST_BOOST_LIMIT,
            session_started_at: Timestamp::new(START),
        });
        let mut throttle = EngagementThrottle::with_clock(store.clone(), test_clock(&now));
        assert!(!throttle.can_perform());

        // when (操作):
        now.store(START + 1_000, Ordering::SeqCst);
        throttle.set_authenticated(true);

        // then (期待する結果):
        assert!(throttle.can_perform());
        assert_eq!(throttle.remaining(), Remaining::Unbounded);
        assert_eq!(
            stored_state(&store),
            ThrottleState::fresh(START + 1_000)
        );

        // ログアウト後はゲストとして 0 から数える
        throttle.set_authenticated(false);
        assert_eq!(throttle.remaining(), Remaining::Limited(GUEST_BOOST_LIMIT));
    }

    #[test]
    fn test_authenticated_consume_is_noop() {
        // テスト項目: ログイン中の consume はカウントも保存も行わない
        // given (前提条件):
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        // set_authenticated(true) によるリセットの 1 回のみ
        store.expect_set().times(1).returning(|_, _| Ok(()));
        let now = Arc::new(AtomicI64::new(START));
        let mut throttle = EngagementThrottle::with_clock(Arc::new(store), test_clock(&now));
        throttle.set_authenticated(true);

        // when (操作):
        throttle.consume();
        throttle.consume();

        // then (期待する結果):
        assert_eq!(throttle.current_state().guest_action_count, 0);
    }

    #[test]
    fn test_expired_session_reads_as_fresh() {
        // テスト項目: 24 時間を超えた保存データは明示的な reset なしで新しいセッションになる
        // given (前提条件):
        let now = Arc::new(AtomicI64::new(START + SESSION_WINDOW_MILLIS + 1));
        let store = store_with(ThrottleState {
            guest_action_count: GUEST_BOOST_LIMIT,
            session_started_at: Timestamp::new(START),
        });
        let mut throttle = EngagementThrottle::with_clock(store.clone(), test_clock(&now));

        // when (操作):
        let state = throttle.current_state();

        // then (期待する結果):
        assert_eq!(state.guest_action_count, 0);
        assert_eq!(
            state.session_started_at,
            Timestamp::new(START + SESSION_WINDOW_MILLIS + 1)
        );
        assert!(throttle.can_perform());
        assert_eq!(stored_state(&store).guest_action_count, 0);
    }

    #[test]
    fn test_session_expires_while_running() {
        // テスト項目: 実行中に 24 時間が経過した場合も次の読み取りでリセットされる
        // given (前提条件):
        let now = Arc::new(AtomicI64::new(START));
        let mut throttle =
            EngagementThrottle::with_clock(Arc::new(InMemoryStore::new()), test_clock(&now));
        for _ in 0..GUEST_BOOST_LIMIT {
            throttle.consume();
        }
        assert!(!throttle.can_perform());

        // when (操作):
        now.store(START + SESSION_WINDOW_MILLIS + 1, Ordering::SeqCst);

        // then (期待する結果):
        assert!(throttle.can_perform());
        assert_eq!(throttle.remaining(), Remaining::Limited(GUEST_BOOST_LIMIT));
    }

    #[test]
    fn test_corrupted_state_starts_fresh() {
        // テスト項目: 壊れた保存データは破棄され新しいセッションとして扱われる
        // given (前提条件):
        let store = Arc::new(InMemoryStore::new());
        store.set(THROTTLE_STORAGE_KEY, "{not json").unwrap();
        let now = Arc::new(AtomicI64::new(START));

        // when (操作):
        let mut throttle = EngagementThrottle::with_clock(store, test_clock(&now));

        // then (期待する結果):
        assert_eq!(throttle.current_state(), ThrottleState::fresh(START));
    }

    #[test]
    fn test_storage_failures_do_not_raise() {
        // テスト項目: ストレージの読み書きに失敗してもカウントは継続する
        // given (前提条件):
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(StorageError::Unavailable("quota".to_string())));
        store
            .expect_set()
            .returning(|_, _| Err(StorageError::Unavailable("quota".to_string())));
        let now = Arc::new(AtomicI64::new(START));
        let mut throttle = EngagementThrottle::with_clock(Arc::new(store), test_clock(&now));

        // when (操作):
        throttle.consume();

        // then (期待する結果):
        assert_eq!(throttle.remaining(), Remaining::Limited(GUEST_BOOST_LIMIT - 1));
    }

    #[test]
    fn test_consume_persists_json() {
        // テスト項目: consume のたびに JSON で保存される
        // given (前提条件):
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .withf(|key, value| {
                key == THROTTLE_STORAGE_KEY
                    && value == r#"{"guestActionCount":1,"sessionStartedAt":1700000000000}"#
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let now = Arc::new(AtomicI64::new(START));
        let mut throttle = EngagementThrottle::with_clock(Arc::new(store), test_clock(&now));

        // when (操作):
        throttle.consume();

        // then (期待する結果): times(1) の検証は drop 時に行われる
        assert_eq!(throttle.remaining(), Remaining::Limited(GUEST_BOOST_LIMIT - 1));
    }

    #[test]
    fn test_window_starts_at_first_boost() {
        // テスト項目: 24 時間の窓は状態の作成時ではなく最初のブーストから数える
        // given (前提条件): 状態を作成してから 23 時間後に上限まで消費
        let now = Arc::new(AtomicI64::new(START));
        let store = Arc::new(InMemoryStore::new());
        let mut throttle = EngagementThrottle::with_clock(store.clone(), test_clock(&now));
        now.store(START + 23 * HOUR_MILLIS, Ordering::SeqCst);
        for _ in 0..GUEST_BOOST_LIMIT {
            throttle.consume();
        }

        // when (操作): 作成から 24 時間 + 1ms（最初のブーストからは 1 時間）
        now.store(START + SESSION_WINDOW_MILLIS + 1, Ordering::SeqCst);

        // then (期待する結果): まだ同じセッション
        assert_eq!(throttle.remaining(), Remaining::Limited(0));
        assert!(!throttle.can_perform());
        assert_eq!(
            stored_state(&store).session_started_at,
            Timestamp::new(START + 23 * HOUR_MILLIS)
        );

        // 最初のブーストから 24 時間を超えると新しいセッション
        now.store(START + 23 * HOUR_MILLIS + SESSION_WINDOW_MILLIS + 1, Ordering::SeqCst);
        assert_eq!(throttle.remaining(), Remaining::Limited(GUEST_BOOST_LIMIT));
    }

    #[test]
    fn test_extreme_stored_start_does_not_panic() {
        // テスト項目: 保存された開始時刻が極端な値でもパニックせず新しいセッションになる
        for started in [i64::MIN, i64::MAX, START + SESSION_WINDOW_MILLIS * 365] {
            // given (前提条件):
            let now = Arc::new(AtomicI64::new(START));
            let store = store_with(ThrottleState {
                guest_action_count: GUEST_BOOST_LIMIT,
                session_started_at: Timestamp::new(started),
            });
            let mut throttle = EngagementThrottle::with_clock(store, test_clock(&now));

            // when (操作):
            let allowed = throttle.can_perform();

            // then (期待する結果):
            assert!(allowed);
            assert_eq!(throttle.current_state(), ThrottleState::fresh(START));
        }
    }

    #[test]
    fn test_stored_min_timestamp_json_resets() {
        // テスト項目: JSON に i64::MIN が保存されていても consume できる
        // given (前提条件):
        let store = Arc::new(InMemoryStore::new());
        store
            .set(
                THROTTLE_STORAGE_KEY,
                r#"{"guestActionCount":0,"sessionStartedAt":-9223372036854775808}"#,
            )
            .unwrap();
        let now = Arc::new(AtomicI64::new(START));
        let mut throttle = EngagementThrottle::with_clock(store.clone(), test_clock(&now));

        // when (操作):
        throttle.consume();

        // then (期待する結果):
        assert_eq!(throttle.remaining(), Remaining::Limited(GUEST_BOOST_LIMIT - 1));
        assert_eq!(stored_state(&store).session_started_at, Timestamp::new(START));
    }
}
