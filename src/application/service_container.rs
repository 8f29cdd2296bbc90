//! サービスコンテナ
//!
//! # 責任
//! - 全ての依存関係の構築と管理
//! - 設定値の解決（環境変数 → 既定値）
//! - テスト時のモック注入サポート

use std::time::Duration;

use crate::application::notifier::ConsoleNotifier;
use crate::application::orchestrator::{DataOrchestrator, OrchestratorConfig};
use crate::application::traits::{DashboardApi, Notifier, PreferenceStore};
use crate::error::Result;
use crate::infrastructure::{
    config::JsonFilePreferenceStore,
    external::api_client::{DEFAULT_TIMEOUT, MonitorApiClient},
    mock_data::mock_dashboard_data,
};
use crate::utils::config::EnvConfig;

/// アプリケーション設定
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// バックエンド API のベース URL
    pub api_base_url: String,
    /// リクエストタイムアウト
    pub request_timeout: Duration,
    /// 熱帖ランキングの表示件数
    pub hot_posts_display_limit: usize,
    /// オーケストレーター設定
    pub orchestrator: OrchestratorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: EnvConfig::get().api_base_url.clone(),
            request_timeout: std::env::var("OPINION_MONITOR_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            hot_posts_display_limit: 10,
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

/// サービスコンテナ
pub struct ServiceContainer {
    pub config: AppConfig,
    /// ダッシュボードの状態管理
    pub orchestrator: DataOrchestrator,
}

impl ServiceContainer {
    /// デフォルト設定で新しいServiceContainerを作成
    pub fn new() -> Result<Self> {
        Self::with_config(AppConfig::default())
    }

    /// カスタム設定で作成
    pub fn with_config(config: AppConfig) -> Result<Self> {
        let api = Box::new(MonitorApiClient::new(
            &config.api_base_url,
            config.request_timeout,
        )?);
        let preferences = Box::new(JsonFilePreferenceStore::new()?);

        Ok(Self::with_dependencies(
            config,
            api,
            preferences,
            Box::new(ConsoleNotifier),
        ))
    }

    /// 依存関係を注入して作成（テスト用）
    pub fn with_dependencies(
        config: AppConfig,
        api: Box<dyn DashboardApi>,
        preferences: Box<dyn PreferenceStore>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let orchestrator = DataOrchestrator::new(
            api,
            preferences,
            notifier,
            mock_dashboard_data(),
            config.orchestrator.clone(),
        );
        ServiceContainer {
            config,
            orchestrator,
        }
    }
}

/// テスト用のヘルパー実装
pub mod test_helpers {
    use super::*;
    use crate::application::notifier::RecordingNotifier;
    use crate::domain::{
        DashboardData, HotPost, KeywordTrend, SentimentData, SourceMode, StatsData,
        WordCloudItem,
    };
    use crate::error::DashboardError;
    use crate::infrastructure::config::MemoryPreferenceStore;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::{Value, json};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// モックとは別の、リモートらしいデータ
    pub fn sample_remote_data() -> DashboardData {
        let date = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap_or_default();
        DashboardData {
            keywords: vec!["防晒".to_string(), "精华".to_string()],
            trends: vec![
                KeywordTrend {
                    keyword: "防晒".to_string(),
                    date: date(1),
                    count: 40,
                },
                KeywordTrend {
                    keyword: "精华".to_string(),
                    date: date(1),
                    count: 25,
                },
                KeywordTrend {
                    keyword: "防晒".to_string(),
                    date: date(2),
                    count: 52,
                },
            ],
            hot_posts: vec![HotPost {
                id: 901,
                title: "防晒霜横评".to_string(),
                author: "测评君".to_string(),
                content: "十款防晒实测".to_string(),
                url: "https://www.xiaohongshu.com/explore/901".to_string(),
                likes_count: 320,
                comments_count: 41,
                hot_score: 230.4,
                keyword: "防晒".to_string(),
                publish_time: Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).single(),
            }],
            word_cloud: vec![WordCloudItem {
                keyword: "防晒".to_string(),
                weight: 64.0,
            }],
            sentiment: vec![SentimentData {
                keyword: "防晒".to_string(),
                positive_score: 0.6,
                negative_score: 0.1,
                neutral_score: 0.3,
                date: date(2),
            }],
            stats: StatsData {
                total_keywords: 2,
                total_posts: 3,
                total_interactions: 361,
                sentiment_score: 60,
                keyword_growth: 0,
                posts_growth: 50,
                interactions_growth: 10,
                sentiment_growth: -3,
            },
        }
    }

    #[derive(Default)]
    struct MockApiState {
        calls: Vec<&'static str>,
        failing: HashSet<&'static str>,
        unreachable: bool,
        unreachable_at: HashSet<&'static str>,
        latency: Duration,
        keywords_set: Vec<String>,
    }

    /// テスト用のモック API
    ///
    /// 複製しても呼び出し記録を共有する。
    #[derive(Clone, Default)]
    pub struct MockDashboardApi {
        data: DashboardData,
        state: Arc<Mutex<MockApiState>>,
    }

    impl MockDashboardApi {
        pub fn new(data: DashboardData) -> Self {
            Self {
                data,
                state: Arc::default(),
            }
        }

        /// 指定エンドポイントを HTTP 500 で失敗させる
        pub fn failing(self, endpoint: &'static str) -> Self {
            if let Ok(mut s) = self.state.lock() {
                s.failing.insert(endpoint);
            }
            self
        }

        /// 全エンドポイントを到達不能にする
        pub fn unreachable(self) -> Self {
            if let Ok(mut s) = self.state.lock() {
                s.unreachable = true;
            }
            self
        }

        /// 指定エンドポイントだけ接続失敗にする
        pub fn unreachable_at(self, endpoint: &'static str) -> Self {
            if let Ok(mut s) = self.state.lock() {
                s.unreachable_at.insert(endpoint);
            }
            self
        }

        /// 取得系の応答を遅らせる
        pub fn with_latency(self, latency: Duration) -> Self {
            if let Ok(mut s) = self.state.lock() {
                s.latency = latency;
            }
            self
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.state.lock().map(|s| s.calls.clone()).unwrap_or_default()
        }

        pub fn call_count(&self, endpoint: &str) -> usize {
            self.calls().iter().filter(|c| **c == endpoint).count()
        }

        /// `set_keywords` で最後に受け取ったキーワード
        pub fn keywords_set(&self) -> Vec<String> {
            self.state
                .lock()
                .map(|s| s.keywords_set.clone())
                .unwrap_or_default()
        }

        async fn call(&self, endpoint: &'static str) -> Result<()> {
            let (latency, unreachable, failing) = {
                let mut s = self
                    .state
                    .lock()
                    .map_err(|e| DashboardError::SystemError(format!("Lock error: {}", e)))?;
                s.calls.push(endpoint);
                let unreachable = s.unreachable || s.unreachable_at.contains(endpoint);
                (s.latency, unreachable, s.failing.contains(endpoint))
            };
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if unreachable {
                return Err(DashboardError::Unreachable {
                    url: format!("mock://{}", endpoint),
                    reason: "connection refused".to_string(),
                });
            }
            if failing {
                return Err(DashboardError::Http {
                    status: 500,
                    url: format!("mock://{}", endpoint),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DashboardApi for MockDashboardApi {
        async fn get_keywords(&self) -> Result<Vec<String>> {
            self.call("get_keywords").await?;
            Ok(self.data.keywords.clone())
        }

        async fn set_keywords(&self, keywords: &[String]) -> Result<()> {
            self.call("set_keywords").await?;
            if let Ok(mut s) = self.state.lock() {
                s.keywords_set = keywords.to_vec();
            }
            Ok(())
        }

        async fn get_trends(&self, _keyword: Option<&str>) -> Result<Vec<KeywordTrend>> {
            self.call("get_trends").await?;
            Ok(self.data.trends.clone())
        }

        async fn get_hot_posts(&self, _keyword: Option<&str>, limit: u32) -> Result<Vec<HotPost>> {
            self.call("get_hot_posts").await?;
            Ok(self
                .data
                .hot_posts
                .iter()
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn get_word_cloud(&self, _keyword: Option<&str>) -> Result<Vec<WordCloudItem>> {
            self.call("get_word_cloud").await?;
            Ok(self.data.word_cloud.clone())
        }

        async fn get_sentiment(&self, _keyword: Option<&str>) -> Result<Vec<SentimentData>> {
            self.call("get_sentiment").await?;
            Ok(self.data.sentiment.clone())
        }

        async fn get_stats(&self) -> Result<StatsData> {
            self.call("get_stats").await?;
            Ok(self.data.stats)
        }

        async fn start_search(&self, _keywords: &[String], _limit: u32) -> Result<()> {
            self.call("start_search").await
        }

        async fn analyze_post(&self, url: &str) -> Result<Value> {
            self.call("analyze_post").await?;
            Ok(json!({ "url": url, "sentiment": "positive" }))
        }

        async fn get_scraping_logs(&self, limit: u32) -> Result<Vec<Value>> {
            self.call("get_scraping_logs").await?;
            Ok((0..limit.min(3))
                .map(|i| json!({ "id": i, "status": "success" }))
                .collect())
        }

        async fn start_monitoring(&self) -> Result<()> {
            self.call("start_monitoring").await
        }

        async fn stop_monitoring(&self) -> Result<()> {
            self.call("stop_monitoring").await
        }

        async fn get_monitor_status(&self) -> Result<Value> {
            self.call("get_monitor_status").await?;
            Ok(json!({ "running": true }))
        }
    }

    /// テスト用のServiceContainerビルダー
    pub struct TestServiceContainerBuilder {
        config: AppConfig,
        api: MockDashboardApi,
        mode: Option<SourceMode>,
        notifier: RecordingNotifier,
    }

    impl Default for TestServiceContainerBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestServiceContainerBuilder {
        pub fn new() -> Self {
            Self {
                config: AppConfig {
                    api_base_url: "mock://backend".to_string(),
                    request_timeout: DEFAULT_TIMEOUT,
                    hot_posts_display_limit: 10,
                    orchestrator: OrchestratorConfig::default(),
                },
                api: MockDashboardApi::new(sample_remote_data()),
                mode: None,
                notifier: RecordingNotifier::new(),
            }
        }

        pub fn with_api(mut self, api: MockDashboardApi) -> Self {
            self.api = api;
            self
        }

        /// 保存済みのモード
        pub fn with_saved_mode(mut self, mode: SourceMode) -> Self {
            self.mode = Some(mode);
            self
        }

        pub fn with_orchestrator_config(mut self, config: OrchestratorConfig) -> Self {
            self.config.orchestrator = config;
            self
        }

        /// 通知の受け口も一緒に返す
        pub fn build(self) -> (ServiceContainer, RecordingNotifier) {
            let container = ServiceContainer::with_dependencies(
                self.config,
                Box::new(self.api),
                Box::new(MemoryPreferenceStore::new(self.mode)),
                Box::new(self.notifier.clone()),
            );
            (container, self.notifier)
        }
    }
}
