//! 通知の具象実装

use std::sync::{Arc, Mutex};

use crate::application::traits::{Notice, NoticeLevel, Notifier};

/// 端末へ出力する通知（成功は stdout、失敗は stderr）
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("✅ {}", notice.message),
            NoticeLevel::Error => eprintln!("❌ {}", notice.message),
        }
    }
}

/// 受け取った通知を溜めておく実装（テスト・スナップショット用）
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// これまでの通知のコピー
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn error_count(&self) -> usize {
        self.notices().iter().filter(|n| n.is_error()).count()
    }

    pub fn clear(&self) {
        if let Ok(mut n) = self.notices.lock() {
            n.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut n) = self.notices.lock() {
            n.push(notice);
        }
    }
}
