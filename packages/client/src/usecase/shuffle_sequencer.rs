//! UseCase: シャッフル自動再生
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ShuffleSequencer の start_shuffle / advance / stop / current_submission
//! - 再生終了シグナルの購読と解除
//!
//! ### なぜこのテストが必要か
//! - 再生終了ごとに 1 回だけ次の投稿へ進むことを保証
//! - 停止・破棄時にリスナーが残らないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：シャッフル開始、終了イベントによる自動送り、末尾からの折り返し
//! - エッジケース：空リスト、停止中の advance、再シャッフル

use rand::{RngCore, SeedableRng, rngs::StdRng};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::domain::{PlaybackEvent, PlaybackQueue, PlaybackSignal, Submission};

type ChangeCallback = Box<dyn FnMut(&Submission) + Send>;

/// シャッフル自動再生のシーケンサー
pub struct ShuffleSequencer {
    submissions: Vec<Submission>,
    queue: PlaybackQueue,
    /// 再生面（プレイヤー）からの終了通知
    signal: PlaybackSignal,
    /// シャッフル中のみ保持する購読
    subscription: Option<broadcast::Receiver<PlaybackEvent>>,
    rng: Box<dyn RngCore + Send>,
    on_change: Option<ChangeCallback>,
}

impl ShuffleSequencer {
    /// 新しい ShuffleSequencer を作成（OS の乱数で初期化）
    pub fn new(signal: PlaybackSignal) -> Self {
        Self::with_rng(signal, StdRng::from_entropy())
    }

    /// 乱数源を指定して作成
    pub fn with_rng(signal: PlaybackSignal, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            submissions: Vec::new(),
            queue: PlaybackQueue::default(),
            signal,
            subscription: None,
            rng: Box::new(rng),
            on_change: None,
        }
    }

    /// 再生対象が変わったときのコールバックを登録
    pub fn on_change(&mut self, callback: impl FnMut(&Submission) + Send + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// シャッフル再生を開始
    ///
    /// 新しい順列を生成し（以前の順序は破棄）、先頭の投稿を通知します。
    /// 空リストでも開始できますが、通知は行いません。
    pub fn start_shuffle(&mut self, submissions: Vec<Submission>) {
        self.queue = PlaybackQueue::shuffled(submissions.len(), self.rng.as_mut());
        self.submissions = submissions;
        // 以前の購読に溜まった終了通知は引き継がない
        self.subscription = Some(self.signal.subscribe());
        tracing::info!("Shuffle started over {} submission(s)", self.submissions.len());
        self.emit_current();
    }

    /// 次の投稿へ進む（末尾の次は先頭）
    pub fn advance(&mut self) {
        if self.queue.advance().is_some() {
            self.emit_current();
        }
    }

    /// シャッフル再生を停止（生成済みの順序は保持）
    pub fn stop(&mut self) {
        if self.subscription.take().is_some() {
            tracing::info!("Shuffle stopped");
        }
        self.queue.stop();
    }

    /// 現在の投稿（停止中・空の場合は None）
    pub fn current_submission(&self) -> Option<&Submission> {
        self.queue
            .current_index()
            .and_then(|index| self.submissions.get(index))
    }

    pub fn is_active(&self) -> bool {
        self.queue.is_active()
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    /// 溜まっている再生終了通知を処理
    ///
    /// 終了通知 1 件につき advance() を 1 回呼び出します。
    ///
    /// # Returns
    ///
    /// 処理した終了通知の件数
    pub fn handle_playback_events(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_mut() else {
            return 0;
        };

        let mut ended = 0;
        loop {
            match subscription.try_recv() {
                Ok(PlaybackEvent::Ended) => ended += 1,
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!("Missed {} playback notification(s)", missed);
                    ended += usize::try_from(missed).unwrap_or(usize::MAX);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        for _ in 0..ended {
            self.advance();
        }
        ended
    }

    fn emit_current(&mut self) {
        let Some(index) = self.queue.current_index() else {
            return;
        };
        if let (Some(submission), Some(callback)) =
            (self.submissions.get(index), self.on_change.as_mut())
        {
            tracing::debug!("Now playing '{}'", submission.title);
            callback(submission);
        }
    }
}
