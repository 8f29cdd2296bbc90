//! ダッシュボードのデータレコード – ドメイン層
//!
//! どのレコードも取得ごとに丸ごと置き換えられる値オブジェクトで、
//! 自然キー以外の同一性は持たない。

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// キーワードの日次声量サンプル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTrend {
    pub keyword: String,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    pub count: u64,
}

/// 熱帖（ホットな投稿）
///
/// 並び順はバックエンドが hot_score 降順で返す前提。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotPost {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub content: String,
    pub url: String,
    pub likes_count: u64,
    pub comments_count: u64,
    pub hot_score: f64,
    pub keyword: String,
    /// 投稿時刻。欠落・null・解釈できない値は `None`
    #[serde(default, deserialize_with = "deserialize_publish_time")]
    pub publish_time: Option<DateTime<Utc>>,
}

/// 詞雲の 1 語
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloudItem {
    pub keyword: String,
    pub weight: f64,
}

/// キーワードごとの感情スコア（三つの合計が 1 になる保証はない）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentData {
    pub keyword: String,
    pub positive_score: f64,
    pub negative_score: f64,
    pub neutral_score: f64,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
}

/// 集計スナップショット。更新のたびに丸ごと置き換える
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsData {
    pub total_keywords: i64,
    pub total_posts: i64,
    pub total_interactions: i64,
    /// 情緒指数（%）
    pub sentiment_score: i64,
    pub keyword_growth: i64,
    pub posts_growth: i64,
    pub interactions_growth: i64,
    pub sentiment_growth: i64,
}

/// データソース（モック or リモート）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// 静的フィクスチャ
    #[default]
    Mock,
    /// バックエンド API
    Remote,
}

impl SourceMode {
    pub fn from_use_mock(use_mock: bool) -> Self {
        if use_mock {
            SourceMode::Mock
        } else {
            SourceMode::Remote
        }
    }

    pub fn is_mock(self) -> bool {
        self == SourceMode::Mock
    }
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMode::Mock => write!(f, "mock"),
            SourceMode::Remote => write!(f, "remote"),
        }
    }
}

/// 読み込み状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// 待機中
    #[default]
    Idle,
    /// 読み込み中（既存データはそのまま表示）
    Loading,
    /// 直近の読み込みが失敗
    Error(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// 1 回の取得サイクルで揃う全データ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub keywords: Vec<String>,
    pub trends: Vec<KeywordTrend>,
    pub hot_posts: Vec<HotPost>,
    pub word_cloud: Vec<WordCloudItem>,
    pub sentiment: Vec<SentimentData>,
    pub stats: StatsData,
}

impl DashboardData {
    /// 5 つのコレクションがすべて空か
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.trends.is_empty()
            && self.hot_posts.is_empty()
            && self.word_cloud.is_empty()
            && self.sentiment.is_empty()
    }
}

/// `2024-01-01` と `2024-01-01T08:00:00Z` のどちらも日付として受け付ける
fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).map_err(serde::de::Error::custom)
}

/// RFC 3339 を優先し、オフセットなしの時刻は UTC とみなす
fn deserialize_publish_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match parse_timestamp(&raw) {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable publish_time");
            None
        }
    }))
}

/// `2024-01-07T10:30:00Z` / `2024-01-07T10:30:00.123456` / `2024-01-07 10:30:00`
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid timestamp {:?}", raw))
}

/// 文字列の先頭 10 文字を `%Y-%m-%d` として解釈する
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|e| format!("invalid date {:?}: {}", raw, e))
}
