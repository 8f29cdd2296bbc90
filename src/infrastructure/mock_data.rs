//! デモ用の固定データセット
//!
//! リモート API のレスポンスと同じ形。モックモードとフォールバックで使う。

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::{
    DashboardData, HotPost, KeywordTrend, SentimentData, StatsData, WordCloudItem,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap_or_default()
}

fn at(d: u32, h: u32, m: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 1, d, h, m, 0).single()
}

/// 集計スナップショット（統計取得失敗時の代替にも使う）
pub fn mock_stats() -> StatsData {
    StatsData {
        total_keywords: 127,
        total_posts: 2847,
        total_interactions: 1_200_000,
        sentiment_score: 72,
        keyword_growth: 12,
        posts_growth: 23,
        interactions_growth: 8,
        sentiment_growth: 5,
    }
}

fn mock_trends() -> Vec<KeywordTrend> {
    let series: [(&str, [u64; 7]); 2] = [
        ("美妆", [1250, 1380, 1420, 1380, 1520, 1680, 1750]),
        ("护肤", [980, 1050, 1150, 1220, 1280, 1350, 1420]),
    ];
    series
        .iter()
        .flat_map(|(keyword, counts)| {
            counts.iter().enumerate().map(move |(i, &count)| KeywordTrend {
                keyword: keyword.to_string(),
                date: day(i as u32 + 1),
                count,
            })
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn post(
    id: i64,
    title: &str,
    author: &str,
    content: &str,
    likes_count: u64,
    comments_count: u64,
    hot_score: f64,
    keyword: &str,
    publish_time: Option<DateTime<Utc>>,
) -> HotPost {
    HotPost {
        id,
        title: title.to_string(),
        author: author.to_string(),
        content: content.to_string(),
        url: format!("https://www.xiaohongshu.com/explore/{}", 122 + id),
        likes_count,
        comments_count,
        hot_score,
        keyword: keyword.to_string(),
        publish_time,
    }
}

fn mock_hot_posts() -> Vec<HotPost> {
    vec![
        post(
            1,
            "秋冬必备！这款面霜真的太好用了！",
            "美妆达人小丽",
            "今天给大家分享一款我最近在用的面霜，真的是秋冬必备神器！质地丰润但不厚重，保湿效果超级棒...",
            2845,
            456,
            2128.5,
            "面霜",
            at(7, 10, 30),
        ),
        post(
            2,
            "平价口红测评！20块钱也能买到好看的色号",
            "口红收集家",
            "姐妹们！今天来分享几支超平价但是超好看的口红，性价比真的绝了！",
            1920,
            287,
            1430.1,
            "口红",
            at(7, 8, 15),
        ),
        post(
            3,
            "护肤小白必看！建立正确护肤流程",
            "护肤专家Annie",
            "很多小伙伴都在问护肤的正确顺序，今天详细讲解一下护肤的基本流程...",
            1654,
            198,
            1217.8,
            "护肤",
            at(7, 6, 45),
        ),
        post(
            4,
            "眼妆教程｜日系清淡妆容画法",
            "化妆师小美",
            "今天教大家画一个超级温柔的日系眼妆，特别适合日常...",
            1432,
            156,
            1049.2,
            "眼妆",
            at(6, 20, 20),
        ),
        post(
            5,
            "学生党必备！10块钱搞定全套底妆",
            "学生党省钱攻略",
            "穷学生的福音来了！用最少的钱打造完美底妆...",
            1298,
            134,
            948.7,
            "底妆",
            at(6, 18, 10),
        ),
    ]
}

fn mock_word_cloud() -> Vec<WordCloudItem> {
    [
        ("面霜", 95.0),
        ("口红", 88.0),
        ("护肤", 85.0),
        ("眼妆", 78.0),
        ("底妆", 72.0),
        ("保湿", 68.0),
        ("美白", 65.0),
        ("防晒", 62.0),
        ("精华", 58.0),
        ("洁面", 55.0),
        ("爽肤水", 52.0),
        ("面膜", 50.0),
        ("眼霜", 48.0),
        ("粉底", 45.0),
        ("腮红", 42.0),
        ("眼影", 40.0),
        ("眉毛", 38.0),
        ("唇膏", 35.0),
        ("修容", 32.0),
        ("高光", 30.0),
    ]
    .iter()
    .map(|&(keyword, weight)| WordCloudItem {
        keyword: keyword.to_string(),
        weight,
    })
    .collect()
}

fn mock_sentiment() -> Vec<SentimentData> {
    [
        ("美妆", 0.75, 0.15, 0.10),
        ("护肤", 0.68, 0.18, 0.14),
        ("口红", 0.82, 0.10, 0.08),
    ]
    .iter()
    .map(|&(keyword, positive, negative, neutral)| SentimentData {
        keyword: keyword.to_string(),
        positive_score: positive,
        negative_score: negative,
        neutral_score: neutral,
        date: day(7),
    })
    .collect()
}

/// 全パネル分の固定データ
pub fn mock_dashboard_data() -> DashboardData {
    DashboardData {
        keywords: ["美妆", "护肤", "化妆品", "口红", "面膜"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        trends: mock_trends(),
        hot_posts: mock_hot_posts(),
        word_cloud: mock_word_cloud(),
        sentiment: mock_sentiment(),
        stats: mock_stats(),
    }
}
