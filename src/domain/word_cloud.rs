//! 詞雲の表示サイズ計算

use crate::domain::models::WordCloudItem;

/// 最小フォントサイズ（px）
pub const MIN_SIZE: f64 = 12.0;
/// 最大フォントサイズ（px）
pub const MAX_SIZE: f64 = 40.0;
const SCALE: f64 = 0.4;

/// 重みを表示サイズへ写像する: clamp(weight * 0.4 + 12, 12, 40)
pub fn display_size(weight: f64) -> f64 {
    if weight.is_nan() {
        return MIN_SIZE;
    }
    (weight * SCALE + MIN_SIZE).clamp(MIN_SIZE, MAX_SIZE)
}

/// 表示用に (語, サイズ) の組を作る
pub fn sized_words(items: &[WordCloudItem]) -> Vec<(&str, f64)> {
    items
        .iter()
        .map(|item| (item.keyword.as_str(), display_size(item.weight)))
        .collect()
}
