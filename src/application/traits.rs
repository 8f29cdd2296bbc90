//! Application層の抽象化トレイト定義
//! 外部依存を抽象化し、テスト可能な構造を提供します

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{HotPost, KeywordTrend, SentimentData, SourceMode, StatsData, WordCloudItem};
use crate::error::Result;

/// バックエンド REST API の抽象化
///
/// コレクションを返す取得系は `data` 欠落時に空を返す。
/// スカラー・コマンド系は失敗をそのまま返し、呼び出し側で処理する。
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// 監視キーワード一覧
    async fn get_keywords(&self) -> Result<Vec<String>>;

    /// 監視キーワードを置き換え
    async fn set_keywords(&self, keywords: &[String]) -> Result<()>;

    async fn get_trends(&self, keyword: Option<&str>) -> Result<Vec<KeywordTrend>>;

    async fn get_hot_posts(&self, keyword: Option<&str>, limit: u32) -> Result<Vec<HotPost>>;

    async fn get_word_cloud(&self, keyword: Option<&str>) -> Result<Vec<WordCloudItem>>;

    async fn get_sentiment(&self, keyword: Option<&str>) -> Result<Vec<SentimentData>>;

    async fn get_stats(&self) -> Result<StatsData>;

    /// 臨時スクレイピングを開始
    async fn start_search(&self, keywords: &[String], limit: u32) -> Result<()>;

    /// 単一投稿の分析
    async fn analyze_post(&self, url: &str) -> Result<Value>;

    async fn get_scraping_logs(&self, limit: u32) -> Result<Vec<Value>>;

    async fn start_monitoring(&self) -> Result<()>;

    async fn stop_monitoring(&self) -> Result<()>;

    async fn get_monitor_status(&self) -> Result<Value>;
}

/// データソース設定の永続化 I/F
pub trait PreferenceStore: Send + Sync {
    /// 保存済みのモード。未保存なら `None`
    fn load(&self) -> Result<Option<SourceMode>>;
    fn save(&self, mode: SourceMode) -> Result<()>;
}

/// ユーザー向け通知の重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// ユーザー向け通知（トースト相当）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// 通知の出力先
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
