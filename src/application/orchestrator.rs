//! ダッシュボードの状態を一元管理するオーケストレーター
//!
//! # 責任
//! - 現在のデータセット（キーワード・トレンド・熱帖・詞雲・感情・統計）の保持
//! - モック / リモートの切り替えと設定の永続化
//! - 更新・監視開始・臨時検索の各アクション
//!
//! どの失敗経路でもデータが空のまま残ることはない。
//! 回復不能な失敗ではモックデータに切り替える。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::application::traits::{DashboardApi, Notice, Notifier, PreferenceStore};
use crate::domain::{
    DashboardData, LoadState, SourceMode, TrendTable, normalize_keywords, reshape_trends,
};
use crate::error::{DashboardError, ErrorSeverity, Result};
use crate::utils::profiling;

/// バックエンドに接続できず、モックに切り替えたときの通知文
pub const FALLBACK_MESSAGE: &str = "无法连接到后端服务，已切换到演示模式";

/// オーケストレーター設定
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// モックモードの監視開始の疑似待ち時間
    pub mock_monitor_delay: Duration,
    /// モックモードの検索の疑似待ち時間
    pub mock_search_delay: Duration,
    /// 検索コマンド後に更新するまでの待ち時間
    pub search_refresh_delay: Duration,
    /// 熱帖の取得件数
    pub hot_posts_limit: u32,
    /// 臨時スクレイピングの件数
    pub search_limit: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            mock_monitor_delay: Duration::from_millis(1000),
            mock_search_delay: Duration::from_millis(1500),
            search_refresh_delay: Duration::from_millis(3000),
            hot_posts_limit: 20,
            search_limit: 20,
        }
    }
}

/// 画面側に公開する状態のスナップショット
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    pub data: DashboardData,
    pub load_state: LoadState,
    /// 直近の読み込み失敗メッセージ
    pub last_error: Option<String>,
    pub mode: SourceMode,
}

/// リモート読み込みの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoteOutcome {
    /// 反映済み（項目単位の失敗は吸収済み）
    Loaded,
    /// 全体失敗でモックに切り替えた
    FellBack,
    /// 後発の読み込みがあったため破棄
    Stale,
}

/// 遅延実行される更新のハンドル
///
/// 破棄しても更新は走る（キャンセルはしない）。
#[derive(Debug)]
pub struct DeferredRefresh {
    handle: JoinHandle<()>,
}

impl DeferredRefresh {
    /// 予約済みの更新を取り消す
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// 完了まで待つ。取り消された場合は false
    pub async fn wait(self) -> bool {
        match self.handle.await {
            Ok(()) => true,
            Err(e) if e.is_cancelled() => false,
            Err(e) => {
                error!(error = %e, "deferred refresh panicked");
                false
            }
        }
    }
}

struct Inner {
    api: Box<dyn DashboardApi>,
    preferences: Box<dyn PreferenceStore>,
    notifier: Box<dyn Notifier>,
    /// モックデータ（フォールバック先）
    fixture: DashboardData,
    config: OrchestratorConfig,
    state: Mutex<DashboardState>,
    /// 最新の読み込み番号。古い番号の結果は反映しない
    latest_load: AtomicU64,
}

/// データオーケストレーター
///
/// 複製しても同じ状態を共有する。
#[derive(Clone)]
pub struct DataOrchestrator {
    inner: Arc<Inner>,
}

impl DataOrchestrator {
    /// 依存を注入して作成。データは空、モードは保存値（未保存ならモック）
    pub fn new(
        api: Box<dyn DashboardApi>,
        preferences: Box<dyn PreferenceStore>,
        notifier: Box<dyn Notifier>,
        fixture: DashboardData,
        config: OrchestratorConfig,
    ) -> Self {
        let mode = match preferences.load() {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "failed to read source mode; using mock");
                SourceMode::Mock
            }
        };
        debug!(%mode, "orchestrator created");

        Self {
            inner: Arc::new(Inner {
                api,
                preferences,
                notifier,
                fixture,
                config,
                state: Mutex::new(DashboardState {
                    mode,
                    ..DashboardState::default()
                }),
                latest_load: AtomicU64::new(0),
            }),
        }
    }

    // ========================================
    // 状態の参照
    // ========================================

    fn with_state<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        let mut guard = self
            .inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// 状態のスナップショット
    pub fn snapshot(&self) -> DashboardState {
        self.with_state(|s| s.clone())
    }

    pub fn data(&self) -> DashboardData {
        self.with_state(|s| s.data.clone())
    }

    pub fn mode(&self) -> SourceMode {
        self.with_state(|s| s.mode)
    }

    pub fn is_loading(&self) -> bool {
        self.with_state(|s| s.load_state.is_loading())
    }

    pub fn load_state(&self) -> LoadState {
        self.with_state(|s| s.load_state.clone())
    }

    pub fn last_error(&self) -> Option<String> {
        self.with_state(|s| s.last_error.clone())
    }

    /// 現在のトレンドを折れ線グラフ用に整形
    pub fn trend_table(&self) -> TrendTable {
        self.with_state(|s| reshape_trends(&s.data.trends))
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.inner.config
    }

    fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(notice);
    }

    // ========================================
    // 読み込み
    // ========================================

    /// 新しい読み込み番号を発行
    fn next_ticket(&self) -> u64 {
        self.inner.latest_load.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.inner.latest_load.load(Ordering::SeqCst) == ticket
    }

    /// 起動時の初回読み込み（成功通知なし）
    pub async fn initialize(&self) {
        self.load().await;
    }

    /// 現在のモードで読み込む（成功通知なし）
    async fn load(&self) -> Option<RemoteOutcome> {
        match self.mode() {
            SourceMode::Mock => {
                self.load_mock();
                None
            }
            SourceMode::Remote => Some(self.load_remote().await),
        }
    }

    /// モックデータで全体を置き換える
    fn load_mock(&self) {
        self.next_ticket();
        let fixture = self.inner.fixture.clone();
        self.with_state(|s| {
            s.data = fixture;
            if s.load_state.is_loading() {
                s.load_state = LoadState::Idle;
            }
        });
        debug!("loaded mock data");
    }

    /// 6 項目を並行取得して全体を置き換える
    ///
    /// 項目単位の失敗は空（統計はモック値）で置き換える。
    /// 全項目が到達不能で失敗した場合のみモックモードに切り替える。
    async fn load_remote(&self) -> RemoteOutcome {
        let ticket = self.next_ticket();
        self.with_state(|s| {
            s.load_state = LoadState::Loading;
            s.last_error = None;
        });

        let timer = profiling::Timer::start("orchestrator.load_remote");
        let api = &*self.inner.api;
        let limit = self.inner.config.hot_posts_limit;
        let (keywords, trends, hot_posts, word_cloud, sentiment, stats) = futures::join!(
            api.get_keywords(),
            api.get_trends(None),
            api.get_hot_posts(None, limit),
            api.get_word_cloud(None),
            api.get_sentiment(None),
            api.get_stats()
        );
        timer.log();

        let all_unreachable = [
            keywords.as_ref().err(),
            trends.as_ref().err(),
            hot_posts.as_ref().err(),
            word_cloud.as_ref().err(),
            sentiment.as_ref().err(),
            stats.as_ref().err(),
        ]
        .iter()
        .all(|e| e.is_some_and(DashboardError::is_unreachable));

        if !self.is_current(ticket) {
            debug!(ticket, "discarding stale remote load");
            return RemoteOutcome::Stale;
        }

        if all_unreachable {
            if let Err(e) = &stats {
                log_failure("remote load failed; falling back to mock data", e);
            }
            self.fall_back_to_mock();
            return RemoteOutcome::FellBack;
        }

        let fixture_stats = self.inner.fixture.stats;
        let data = DashboardData {
            keywords: tolerate("keywords", keywords, Vec::new),
            trends: tolerate("trends", trends, Vec::new),
            hot_posts: tolerate("hot_posts", hot_posts, Vec::new),
            word_cloud: tolerate("word_cloud", word_cloud, Vec::new),
            sentiment: tolerate("sentiment", sentiment, Vec::new),
            stats: tolerate("stats", stats, || fixture_stats),
        };
        info!(
            keywords = data.keywords.len(),
            trends = data.trends.len(),
            hot_posts = data.hot_posts.len(),
            "remote data loaded"
        );

        self.with_state(|s| {
            s.data = data;
            s.load_state = LoadState::Idle;
        });
        RemoteOutcome::Loaded
    }

    /// モックモードへ強制的に切り替え、モックデータを読み込む
    fn fall_back_to_mock(&self) {
        if let Err(e) = self.inner.preferences.save(SourceMode::Mock) {
            log_failure("failed to persist source mode", &e);
        }
        let fixture = self.inner.fixture.clone();
        self.with_state(|s| {
            s.mode = SourceMode::Mock;
            s.data = fixture;
            s.load_state = LoadState::Error(FALLBACK_MESSAGE.to_string());
            s.last_error = Some(FALLBACK_MESSAGE.to_string());
        });
        self.notify(Notice::error(FALLBACK_MESSAGE));
    }

    fn begin_action(&self) {
        self.with_state(|s| s.load_state = LoadState::Loading);
    }

    /// Loading のときだけ Idle に戻す（フォールバックの Error は残す）
    fn end_action(&self) {
        self.with_state(|s| {
            if s.load_state.is_loading() {
                s.load_state = LoadState::Idle;
            }
        });
    }

    // ========================================
    // アクション
    // ========================================

    /// データソースを切り替え、保存し、新しいソースで読み直す
    pub async fn set_source_mode(&self, mode: SourceMode) {
        info!(%mode, "switching source mode");
        self.with_state(|s| s.mode = mode);
        if let Err(e) = self.inner.preferences.save(mode) {
            log_failure("failed to persist source mode", &e);
        }
        self.load().await;
    }

    /// 現在のソースで全データを更新
    pub async fn refresh(&self) {
        match self.load().await {
            None => self.notify(Notice::success("演示数据已刷新")),
            Some(RemoteOutcome::Loaded) => self.notify(Notice::success("数据已刷新")),
            Some(RemoteOutcome::FellBack) | Some(RemoteOutcome::Stale) => {}
        }
    }

    /// キーワードを検証する。空なら通知して None
    fn validated(&self, keywords: &[String]) -> Option<Vec<String>> {
        match normalize_keywords(keywords) {
            Ok(k) => Some(k),
            Err(e) => {
                log_failure("rejected keyword input", &e);
                self.notify(Notice::error("请输入至少一个关键词"));
                None
            }
        }
    }

    /// キーワード監視を開始
    ///
    /// モックでは疑似待ちのみで状態は変えない。リモートではキーワード設定、
    /// 監視開始コマンドの後に全体を更新する。失敗は通知のみで伝播しない。
    pub async fn start_monitoring(&self, keywords: &[String]) {
        let Some(keywords) = self.validated(keywords) else {
            return;
        };
        let joined = keywords.join(", ");
        self.begin_action();

        if self.mode().is_mock() {
            tokio::time::sleep(self.inner.config.mock_monitor_delay).await;
            self.notify(Notice::success(format!("开始监测: {}", joined)));
            self.end_action();
            return;
        }

        let api = &*self.inner.api;
        let result = async {
            api.set_keywords(&keywords).await?;
            api.start_monitoring().await
        }
        .await;

        match result {
            Ok(()) => {
                info!(keywords = %joined, "monitoring started");
                self.refresh().await;
                self.notify(Notice::success(format!("开始监测: {}", joined)));
            }
            Err(e) => {
                log_failure("failed to start monitoring", &e);
                self.notify(Notice::error("启动监测失败"));
            }
        }
        self.end_action();
    }

    /// キーワード監視を停止
    pub async fn stop_monitoring(&self) {
        self.begin_action();

        if self.mode().is_mock() {
            tokio::time::sleep(self.inner.config.mock_monitor_delay).await;
            self.notify(Notice::success("已停止监测"));
            self.end_action();
            return;
        }

        match self.inner.api.stop_monitoring().await {
            Ok(()) => {
                info!("monitoring stopped");
                self.notify(Notice::success("已停止监测"));
            }
            Err(e) => {
                log_failure("failed to stop monitoring", &e);
                self.notify(Notice::error("停止监测失败"));
            }
        }
        self.end_action();
    }

    /// 臨時検索を開始
    ///
    /// リモートではコマンド送信後すぐに戻り、一定時間後の更新を予約する。
    /// 予約された更新の結果は待たない。
    pub async fn search_keywords(&self, keywords: &[String]) -> Option<DeferredRefresh> {
        let keywords = self.validated(keywords)?;
        let joined = keywords.join(", ");
        self.begin_action();

        if self.mode().is_mock() {
            tokio::time::sleep(self.inner.config.mock_search_delay).await;
            self.notify(Notice::success(format!("搜索完成: {}", joined)));
            self.end_action();
            return None;
        }

        let limit = self.inner.config.search_limit;
        let scheduled = match self.inner.api.start_search(&keywords, limit).await {
            Ok(()) => {
                info!(keywords = %joined, "search task started");
                self.notify(Notice::success(format!("搜索任务已启动: {}", joined)));
                Some(self.schedule_refresh(self.inner.config.search_refresh_delay))
            }
            Err(e) => {
                log_failure("failed to start search", &e);
                self.notify(Notice::error("搜索失败"));
                None
            }
        };
        self.end_action();
        scheduled
    }

    /// `delay` 後に `refresh()` を実行するタスクを登録
    pub fn schedule_refresh(&self, delay: Duration) -> DeferredRefresh {
        // 期限は登録時点から数える
        let sleep = tokio::time::sleep(delay);
        let this = self.clone();
        let handle = tokio::spawn(async move {
            sleep.await;
            debug!("running deferred refresh");
            this.refresh().await;
        });
        DeferredRefresh { handle }
    }

    // ========================================
    // リモート専用の問い合わせ
    // ========================================

    fn require_remote(&self, what: &'static str) -> Result<&dyn DashboardApi> {
        if self.mode().is_mock() {
            return Err(DashboardError::UnsupportedInMockMode(what));
        }
        Ok(&*self.inner.api)
    }

    /// 監視ワーカーの状態
    pub async fn monitor_status(&self) -> Result<Value> {
        self.require_remote("monitor status")?
            .get_monitor_status()
            .await
    }

    /// 直近のスクレイピングログ
    pub async fn scraping_logs(&self, limit: u32) -> Result<Vec<Value>> {
        self.require_remote("scraping logs")?
            .get_scraping_logs(limit)
            .await
    }

    /// 単一投稿の分析
    pub async fn analyze_post(&self, url: &str) -> Result<Value> {
        self.require_remote("post analysis")?.analyze_post(url).await
    }
}

/// 項目単位の失敗を既定値で置き換える
fn tolerate<T>(field: &'static str, result: Result<T>, fallback: impl FnOnce() -> T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log_failure(&format!("{} fetch failed; using default", field), &e);
            fallback()
        }
    }
}

/// 重要度に応じたレベルで失敗を記録する
fn log_failure(context: &str, e: &DashboardError) {
    let retryable = e.is_retryable();
    match e.severity() {
        ErrorSeverity::Error => error!(error = %e, retryable, "{}", context),
        ErrorSeverity::Warning => warn!(error = %e, retryable, "{}", context),
        ErrorSeverity::Info => info!(error = %e, retryable, "{}", context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notifier::RecordingNotifier;
    use crate::application::service_container::test_helpers::{
        MockDashboardApi, sample_remote_data,
    };
    use crate::infrastructure::config::MemoryPreferenceStore;
    use crate::infrastructure::mock_data::{mock_dashboard_data, mock_stats};

    fn orchestrator(
        api: MockDashboardApi,
        mode: Option<SourceMode>,
    ) -> (DataOrchestrator, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let orch = DataOrchestrator::new(
            Box::new(api),
            Box::new(MemoryPreferenceStore::new(mode)),
            Box::new(notifier.clone()),
            mock_dashboard_data(),
            OrchestratorConfig::default(),
        );
        (orch, notifier)
    }

    #[test]
    fn starts_empty_in_saved_mode() {
        let (orch, _) = orchestrator(MockDashboardApi::default(), Some(SourceMode::Remote));
        assert_eq!(orch.mode(), SourceMode::Remote);
        assert!(orch.data().is_empty());
        assert_eq!(orch.load_state(), LoadState::Idle);

        let (orch, _) = orchestrator(MockDashboardApi::default(), None);
        assert_eq!(orch.mode(), SourceMode::Mock);
    }

    #[tokio::test]
    async fn mock_refresh_loads_fixture_and_reports_success() {
        let api = MockDashboardApi::new(sample_remote_data());
        let (orch, notifier) = orchestrator(api.clone(), None);

        orch.refresh().await;

        assert_eq!(orch.data(), mock_dashboard_data());
        assert!(api.calls().is_empty());
        assert_eq!(notifier.notices(), vec![Notice::success("演示数据已刷新")]);
    }

    #[tokio::test]
    async fn remote_refresh_replaces_everything() {
        let api = MockDashboardApi::new(sample_remote_data());
        let (orch, notifier) = orchestrator(api.clone(), Some(SourceMode::Remote));

        orch.refresh().await;

        assert_eq!(orch.data(), sample_remote_data());
        assert_eq!(api.call_count("get_hot_posts"), 1);
        assert_eq!(notifier.error_count(), 0);
        assert_eq!(orch.load_state(), LoadState::Idle);
        assert!(orch.last_error().is_none());
    }

    #[tokio::test]
    async fn failing_stats_degrades_to_mock_snapshot_only() {
        let api = MockDashboardApi::new(sample_remote_data()).failing("get_stats");
        let (orch, notifier) = orchestrator(api, Some(SourceMode::Remote));

        orch.refresh().await;

        let data = orch.data();
        let expected = sample_remote_data();
        assert_eq!(data.stats, mock_stats());
        assert_eq!(data.keywords, expected.keywords);
        assert_eq!(data.trends, expected.trends);
        assert_eq!(data.hot_posts, expected.hot_posts);
        assert_eq!(data.word_cloud, expected.word_cloud);
        assert_eq!(data.sentiment, expected.sentiment);
        assert_eq!(notifier.error_count(), 0);
        assert_eq!(orch.mode(), SourceMode::Remote);
    }

    #[tokio::test]
    async fn failing_collection_degrades_to_empty() {
        let api = MockDashboardApi::new(sample_remote_data())
            .failing("get_trends")
            .failing("get_sentiment");
        let (orch, notifier) = orchestrator(api, Some(SourceMode::Remote));

        orch.refresh().await;

        let data = orch.data();
        assert!(data.trends.is_empty());
        assert!(data.sentiment.is_empty());
        assert_eq!(data.hot_posts, sample_remote_data().hot_posts);
        assert_eq!(notifier.error_count(), 0);
    }

    #[tokio::test]
    async fn unreachable_backend_falls_back_to_mock() {
        let api = MockDashboardApi::new(sample_remote_data()).unreachable();
        let (orch, notifier) = orchestrator(api, Some(SourceMode::Mock));
        orch.initialize().await;

        orch.set_source_mode(SourceMode::Remote).await;

        assert_eq!(orch.mode(), SourceMode::Mock);
        assert_eq!(orch.data(), mock_dashboard_data());
        assert_eq!(notifier.error_count(), 1);
        assert_eq!(orch.last_error().as_deref(), Some(FALLBACK_MESSAGE));
        assert_eq!(
            orch.load_state(),
            LoadState::Error(FALLBACK_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn blank_keywords_are_rejected_before_network() {
        let api = MockDashboardApi::new(sample_remote_data());
        let (orch, notifier) = orchestrator(api.clone(), Some(SourceMode::Remote));

        orch.start_monitoring(&["  ".to_string()]).await;
        let scheduled = orch.search_keywords(&[]).await;

        assert!(scheduled.is_none());
        assert!(api.calls().is_empty());
        assert_eq!(notifier.error_count(), 2);
    }

    #[tokio::test]
    async fn mock_mode_rejects_remote_only_queries() {
        let api = MockDashboardApi::new(sample_remote_data());
        let (orch, _) = orchestrator(api.clone(), None);

        let res = orch.monitor_status().await;
        assert!(matches!(res, Err(DashboardError::UnsupportedInMockMode(_))));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn trend_table_reflects_current_trends() {
        let (orch, _) = orchestrator(MockDashboardApi::default(), None);
        assert!(orch.trend_table().is_empty());
        orch.load_mock();
        assert_eq!(orch.trend_table().rows.len(), 7);
    }
}
