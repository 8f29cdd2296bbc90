//! 端末向けの描画

pub mod format;
pub mod panels;

pub use panels::{
    render_dashboard, render_hot_posts, render_stat_cards, render_trend_table, render_word_cloud,
};
