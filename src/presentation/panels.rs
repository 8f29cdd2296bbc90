//! ダッシュボード各パネルのテキスト描画
//!
//! 状態は読むだけ。描画結果は端末にそのまま出せる文字列。

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::application::orchestrator::DashboardState;
use crate::domain::word_cloud::sized_words;
use crate::domain::{HotPost, LoadState, StatsData, TrendTable, WordCloudItem, reshape_trends};
use crate::presentation::format;

/// トレンド表が空のときの表示
pub const EMPTY_TREND_PLACEHOLDER: &str = "暂无趋势数据";

/// 統計カード 4 枚
pub fn render_stat_cards(stats: &StatsData) -> String {
    let cards = [
        (
            "今日监测关键词",
            format::with_separators(stats.total_keywords),
            stats.keyword_growth,
        ),
        (
            "热帖数量",
            format::with_separators(stats.total_posts),
            stats.posts_growth,
        ),
        (
            "总互动量",
            format::compact(stats.total_interactions),
            stats.interactions_growth,
        ),
        (
            "情绪指数",
            format::percent(stats.sentiment_score),
            stats.sentiment_growth,
        ),
    ];

    let mut out = String::new();
    for (title, value, change) in cards {
        let _ = writeln!(
            out,
            "{:<8} {:>10}  {} 相比昨日",
            title,
            value,
            format::growth(change)
        );
    }
    out
}

/// 日付 × キーワードの表。値のないセルは `-`
pub fn render_trend_table(table: &TrendTable) -> String {
    if table.is_empty() {
        return format!("{}\n", EMPTY_TREND_PLACEHOLDER);
    }

    let mut out = String::new();
    let _ = write!(out, "{:<6}", "日期");
    for keyword in &table.keywords {
        let _ = write!(out, " | {:>8}", keyword);
    }
    out.push('\n');

    for row in &table.rows {
        let _ = write!(out, "{:<6}", row.date);
        for keyword in &table.keywords {
            let cell = row
                .get(keyword)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(out, " | {:>8}", cell);
        }
        out.push('\n');
    }
    out
}

/// 詞雲（キーワードと表示サイズ）
pub fn render_word_cloud(items: &[WordCloudItem]) -> String {
    if items.is_empty() {
        return "暂无词云数据\n".to_string();
    }
    let words: Vec<String> = sized_words(items)
        .into_iter()
        .map(|(keyword, size)| format!("{}({:.0}px)", keyword, size))
        .collect();
    format!("{}\n", words.join("  "))
}

/// 熱帖ランキング（上位 `limit` 件）
pub fn render_hot_posts(posts: &[HotPost], limit: usize, now: DateTime<Utc>) -> String {
    if posts.is_empty() {
        return "暂无热帖\n".to_string();
    }

    let mut out = String::new();
    for (rank, post) in posts.iter().take(limit).enumerate() {
        let _ = writeln!(out, "{:>2}. {}  [{}]", rank + 1, post.title, post.keyword);
        let age = post
            .publish_time
            .map(|published| format::relative_age(published, now))
            .unwrap_or_else(|| "时间未知".to_string());
        let _ = writeln!(
            out,
            "    {} · {} · ♥ {} · 💬 {} · 🔥 {}",
            post.author,
            age,
            format::with_separators(post.likes_count as i64),
            format::with_separators(post.comments_count as i64),
            format::score(post.hot_score)
        );
        let _ = writeln!(out, "    {}", post.url);
    }
    out
}

/// ダッシュボード全体
pub fn render_dashboard(
    state: &DashboardState,
    hot_post_limit: usize,
    now: DateTime<Utc>,
) -> String {
    let data = &state.data;
    let mut out = String::new();

    let _ = writeln!(out, "小红书舆情监测 · 数据源: {}", state.mode);
    match &state.load_state {
        LoadState::Loading => {
            let _ = writeln!(out, "⏳ 加载中...");
        }
        LoadState::Error(message) => {
            let _ = writeln!(out, "⚠️  {}", message);
        }
        LoadState::Idle => {}
    }
    if !data.keywords.is_empty() {
        let _ = writeln!(out, "监测关键词: {}", data.keywords.join(", "));
    }

    out.push_str("\n== 概览 ==\n");
    out.push_str(&render_stat_cards(&data.stats));
    out.push_str("\n== 关键词趋势 ==\n");
    out.push_str(&render_trend_table(&reshape_trends(&data.trends)));
    out.push_str("\n== 热门词云 ==\n");
    out.push_str(&render_word_cloud(&data.word_cloud));
    out.push_str("\n== 热帖排行 ==\n");
    out.push_str(&render_hot_posts(&data.hot_posts, hot_post_limit, now));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceMode;
    use crate::infrastructure::mock_data::{mock_dashboard_data, mock_stats};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 7, 12, 30, 0).unwrap()
    }

    #[test]
    fn stat_cards_use_display_formats() {
        let text = render_stat_cards(&mock_stats());
        assert!(text.contains("127"));
        assert!(text.contains("2,847"));
        assert!(text.contains("1.2M"));
        assert!(text.contains("72%"));
        assert!(text.contains("+23%"));
    }

    #[test]
    fn empty_trends_show_placeholder() {
        let text = render_trend_table(&TrendTable::default());
        assert_eq!(text.trim(), EMPTY_TREND_PLACEHOLDER);
    }

    #[test]
    fn trend_table_marks_missing_cells() {
        let mut data = mock_dashboard_data();
        data.trends.pop();
        let text = render_trend_table(&reshape_trends(&data.trends));
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("1/7"));
        assert!(last.contains('-'));
    }

    #[test]
    fn hot_posts_are_capped_and_aged() {
        let posts = mock_dashboard_data().hot_posts;
        let text = render_hot_posts(&posts, 2, now());
        assert!(text.contains(" 1. 秋冬必备"));
        assert!(text.contains(" 2. 平价口红"));
        assert!(!text.contains(" 3. "));
        assert!(text.contains("2小时前"));
        assert!(text.contains("2,845"));
    }

    #[test]
    fn hot_post_without_time_is_marked_unknown() {
        let mut posts = mock_dashboard_data().hot_posts;
        posts[0].publish_time = None;
        let text = render_hot_posts(&posts, 1, now());
        assert!(text.contains("时间未知"));
    }

    #[test]
    fn word_cloud_is_sized_and_clamped() {
        let text = render_word_cloud(&mock_dashboard_data().word_cloud);
        assert!(text.starts_with("面霜(40px)"));
        assert!(text.contains("高光(24px)"));
    }

    #[test]
    fn dashboard_shows_mode_and_error() {
        let state = DashboardState {
            data: mock_dashboard_data(),
            load_state: LoadState::Error("backend down".to_string()),
            last_error: Some("backend down".to_string()),
            mode: SourceMode::Mock,
        };
        let text = render_dashboard(&state, 10, now());
        assert!(text.contains("数据源: mock"));
        assert!(text.contains("backend down"));
        assert!(text.contains("== 热帖排行 =="));
    }
}
