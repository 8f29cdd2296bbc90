//! 統一エラーハンドリング
//!
//! opinion_monitor 全体で使用するエラー型を定義します。
//! リモート API・設定ファイル・入力検証の失敗をここに集約します。

use thiserror::Error;

/// opinion_monitor 全体で使用する統一エラー型
#[derive(Debug, Error)]
pub enum DashboardError {
    // ========================================
    // リモート API 関連エラー
    // ========================================
    /// 接続失敗・タイムアウト（バックエンドに到達できない）
    #[error("Backend unreachable ({url}): {reason}")]
    Unreachable { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Unexpected response shape from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// スカラー型エンドポイントで `data` が欠落
    #[error("Response from {0} has no data field")]
    MissingData(String),

    // ========================================
    // 入力検証エラー
    // ========================================
    #[error("No keywords given")]
    EmptyKeywords,

    #[error("Not available in demo (mock) mode: {0}")]
    UnsupportedInMockMode(&'static str),

    // ========================================
    // 設定関連エラー
    // ========================================
    #[error("Preference store error: {0}")]
    Preference(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("System error: {0}")]
    SystemError(String),
}

/// 統一Result型エイリアス
pub type Result<T> = std::result::Result<T, DashboardError>;

// ========================================
// ヘルパー関数
// ========================================

impl DashboardError {
    /// バックエンドに到達できなかったエラーかどうか
    pub fn is_unreachable(&self) -> bool {
        matches!(self, DashboardError::Unreachable { .. })
    }

    /// エラーが再試行可能かどうかを判定
    pub fn is_retryable(&self) -> bool {
        match self {
            DashboardError::Unreachable { .. } => true,
            DashboardError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// エラーの重要度レベルを取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DashboardError::Config(_) | DashboardError::SystemError(_) => ErrorSeverity::Error,

            DashboardError::Unreachable { .. }
            | DashboardError::Http { .. }
            | DashboardError::Decode { .. }
            | DashboardError::MissingData(_)
            | DashboardError::Preference(_) => ErrorSeverity::Warning,

            DashboardError::EmptyKeywords | DashboardError::UnsupportedInMockMode(_) => {
                ErrorSeverity::Info
            }
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}
