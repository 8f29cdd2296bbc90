//! グローバル環境変数設定
//!
//! アプリケーション全体で使用する環境変数を一元管理。
//! プロセス起動時に一度だけ初期化し、以降は読み取り専用。

use once_cell::sync::OnceCell;
use std::sync::Arc;

/// グローバル環境変数設定
static ENV_CONFIG: OnceCell<Arc<EnvConfig>> = OnceCell::new();

/// API ベース URL の環境変数名
pub const API_URL_ENV: &str = "OPINION_MONITOR_API_URL";
/// API ベース URL のデフォルト値
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// 環境変数設定
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// バックエンド API のベース URL
    pub api_base_url: String,
    /// XDG Data Home ディレクトリ
    pub xdg_data_home: Option<String>,
    /// 環境変数ファイルのパス
    pub env_path: Option<String>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            xdg_data_home: None,
            env_path: None,
        }
    }
}

impl EnvConfig {
    /// 現在のプロセス環境から設定を組み立てる（グローバルには登録しない）
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var(API_URL_ENV)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            xdg_data_home: std::env::var("XDG_DATA_HOME").ok(),
            env_path: std::env::var("OPINION_MONITOR_ENV_PATH").ok(),
        }
    }

    /// 環境変数から設定を初期化
    ///
    /// アプリケーション起動時に呼び出す。
    /// 既に初期化済みの場合は何もしない（冪等）。
    pub fn init() {
        if ENV_CONFIG.get().is_some() {
            return;
        }
        // 並列実行時の競合を考慮：既に他のスレッドが初期化していても成功とする
        let _ = ENV_CONFIG.set(Arc::new(Self::from_env()));
    }

    /// 設定を取得
    ///
    /// `init()` 前に呼ばれた場合は環境変数から組み立てた値を返す。
    pub fn get() -> Arc<EnvConfig> {
        ENV_CONFIG
            .get()
            .cloned()
            .unwrap_or_else(|| Arc::new(Self::from_env()))
    }
}
