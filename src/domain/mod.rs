pub mod keywords;
pub mod models;
pub mod trend;
pub mod word_cloud;

pub use keywords::{normalize_keywords, parse_keywords};
pub use models::{
    DashboardData, HotPost, KeywordTrend, LoadState, SentimentData, SourceMode, StatsData,
    WordCloudItem,
};
pub use trend::{TrendRow, TrendTable, reshape_trends};
