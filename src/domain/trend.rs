//! 声量トレンドの整形 – ドメイン層
//!
//! `(keyword, date, count)` のフラットな列を、日付ごとに 1 行・キーワードごとに
//! 1 列の「横持ち」テーブルへ変換する。折れ線グラフの系列データになる。

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::models::KeywordTrend;

/// テーブルの 1 行（1 日付）
///
/// その日に観測されなかったキーワードの列は存在しない。0 埋めはしない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    pub date: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, u64>,
}

impl TrendRow {
    /// キーワードの値。観測なしなら `None`（0 ではない）
    pub fn get(&self, keyword: &str) -> Option<u64> {
        self.values.get(keyword).copied()
    }
}

/// 整形結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrendTable {
    /// 日付の初出順
    pub rows: Vec<TrendRow>,
    /// キーワードの初出順（重複なし）
    pub keywords: Vec<String>,
}

impl TrendTable {
    /// 行が一つもなければプレースホルダ表示にする
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 日付ラベル（`1/1` のような月/日、ゼロ埋めなし）
pub fn date_label(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// サンプル列を横持ちテーブルへ変換する
///
/// 同じ (日付ラベル, キーワード) が複数あれば後勝ち。合算や平均はしない。
pub fn reshape_trends(samples: &[KeywordTrend]) -> TrendTable {
    let mut rows: Vec<TrendRow> = Vec::new();
    let mut row_index: HashMap<String, usize> = HashMap::new();
    let mut keywords: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for sample in samples {
        let label = date_label(sample.date);
        let idx = match row_index.get(&label) {
            Some(&idx) => idx,
            None => {
                rows.push(TrendRow {
                    date: label.clone(),
                    values: BTreeMap::new(),
                });
                row_index.insert(label, rows.len() - 1);
                rows.len() - 1
            }
        };
        rows[idx]
            .values
            .insert(sample.keyword.clone(), sample.count);

        if seen.insert(sample.keyword.as_str()) {
            keywords.push(sample.keyword.clone());
        }
    }

    TrendTable { rows, keywords }
}
