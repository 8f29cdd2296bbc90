//! 舆情监测バックエンドの REST クライアント。
//!
//! すべてのレスポンスは `{ "data": T }` の封筒に包まれている。
//! コレクション系は `data` 欠落を空として扱い、スカラー系は欠落をエラーにする。
//! `data` があるのに形が合わない場合はどちらもエラー。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::application::traits::DashboardApi;
use crate::domain::{HotPost, KeywordTrend, SentimentData, StatsData, WordCloudItem};
use crate::error::{DashboardError, Result};
use crate::utils::profiling;

/// 全リクエスト共通のタイムアウト
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// レスポンス封筒
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

/// `/config/keywords` の `data`
#[derive(Debug, Deserialize)]
struct KeywordsPayload {
    #[serde(default)]
    keywords: Vec<String>,
}

/// コレクション系: `data` 欠落 / null は空
pub(crate) fn decode_collection<T: DeserializeOwned>(url: &str, body: &str) -> Result<Vec<T>> {
    let envelope: Envelope<Vec<T>> =
        serde_json::from_str(body).map_err(|e| DashboardError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    Ok(envelope.data.unwrap_or_default())
}

/// スカラー系: `data` 必須
pub(crate) fn decode_required<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| DashboardError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    envelope
        .data
        .ok_or_else(|| DashboardError::MissingData(url.to_string()))
}

/// 舆情监测 API クライアント
pub struct MonitorApiClient {
    client: Client,
    base_url: Url,
}

impl MonitorApiClient {
    /// ベース URL とタイムアウトを指定して作成
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            DashboardError::Config(format!("invalid API base URL {:?}: {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::Config(format!(
                "API base URL cannot hold paths: {}",
                base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| DashboardError::Config(format!("HTTP client init failed: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// ベース URL にパスセグメントを追加（キーワードはエンコードされる）
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::Config(format!("bad base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn transport_error(url: &Url, e: reqwest::Error) -> DashboardError {
        if e.is_builder() {
            return DashboardError::Config(e.to_string());
        }
        DashboardError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }

    /// リクエストを送信し、2xx の本文を返す
    async fn send(&self, url: Url, request: reqwest::RequestBuilder) -> Result<String> {
        let timer = profiling::Timer::start("api.request");
        debug!(%url, "request");

        let response = request
            .send()
            .await
            .map_err(|e| Self::transport_error(&url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(&url, e))?;

        if profiling::enabled() {
            timer.log_with(&format!("url={} status={}", url, status.as_u16()));
        }

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "request failed");
            return Err(DashboardError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(body)
    }

    async fn get(&self, segments: &[&str], query: &[(&str, String)]) -> Result<(Url, String)> {
        let url = self.endpoint(segments)?;
        let request = self.client.get(url.clone()).query(query);
        let body = self.send(url.clone(), request).await?;
        Ok((url, body))
    }

    async fn post(&self, segments: &[&str], body: Option<Value>) -> Result<(Url, String)> {
        let url = self.endpoint(segments)?;
        let mut request = self.client.post(url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }
        let text = self.send(url.clone(), request).await?;
        Ok((url, text))
    }
}

fn keyword_query(keyword: Option<&str>) -> Vec<(&'static str, String)> {
    keyword
        .map(|k| vec![("keyword", k.to_string())])
        .unwrap_or_default()
}

#[async_trait]
impl DashboardApi for MonitorApiClient {
    async fn get_keywords(&self) -> Result<Vec<String>> {
        let (url, body) = self.get(&["config", "keywords"], &[]).await?;
        let envelope: Envelope<KeywordsPayload> =
            serde_json::from_str(&body).map_err(|e| DashboardError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(envelope.data.map(|d| d.keywords).unwrap_or_default())
    }

    async fn set_keywords(&self, keywords: &[String]) -> Result<()> {
        self.post(&["config", "keywords"], Some(json!({ "keywords": keywords })))
            .await?;
        Ok(())
    }

    async fn get_trends(&self, keyword: Option<&str>) -> Result<Vec<KeywordTrend>> {
        let (url, body) = match keyword {
            Some(k) => self.get(&["data", "trends", k], &[]).await?,
            None => self.get(&["data", "trends"], &[]).await?,
        };
        decode_collection(url.as_str(), &body)
    }

    async fn get_hot_posts(&self, keyword: Option<&str>, limit: u32) -> Result<Vec<HotPost>> {
        let mut query = keyword_query(keyword);
        query.push(("limit", limit.to_string()));
        let (url, body) = self.get(&["data", "hot-posts"], &query).await?;
        decode_collection(url.as_str(), &body)
    }

    async fn get_word_cloud(&self, keyword: Option<&str>) -> Result<Vec<WordCloudItem>> {
        let (url, body) = self
            .get(&["data", "word-cloud"], &keyword_query(keyword))
            .await?;
        decode_collection(url.as_str(), &body)
    }

    async fn get_sentiment(&self, keyword: Option<&str>) -> Result<Vec<SentimentData>> {
        let (url, body) = match keyword {
            Some(k) => self.get(&["data", "sentiment", k], &[]).await?,
            None => self.get(&["data", "sentiment"], &[]).await?,
        };
        decode_collection(url.as_str(), &body)
    }

    async fn get_stats(&self) -> Result<StatsData> {
        let (url, body) = self.get(&["data", "stats"], &[]).await?;
        decode_required(url.as_str(), &body)
    }

    async fn start_search(&self, keywords: &[String], limit: u32) -> Result<()> {
        self.post(
            &["scraper", "search"],
            Some(json!({ "keywords": keywords, "limit": limit })),
        )
        .await?;
        Ok(())
    }

    async fn analyze_post(&self, url: &str) -> Result<Value> {
        let (endpoint, body) = self
            .post(&["scraper", "analyze"], Some(json!({ "url": url })))
            .await?;
        decode_required(endpoint.as_str(), &body)
    }

    async fn get_scraping_logs(&self, limit: u32) -> Result<Vec<Value>> {
        let (url, body) = self
            .get(&["scraper", "logs"], &[("limit", limit.to_string())])
            .await?;
        decode_collection(url.as_str(), &body)
    }

    async fn start_monitoring(&self) -> Result<()> {
        self.post(&["monitor", "start"], None).await?;
        Ok(())
    }

    async fn stop_monitoring(&self) -> Result<()> {
        self.post(&["monitor", "stop"], None).await?;
        Ok(())
    }

    async fn get_monitor_status(&self) -> Result<Value> {
        let (url, body) = self.get(&["monitor", "status"], &[]).await?;
        decode_required(url.as_str(), &body)
    }
}
