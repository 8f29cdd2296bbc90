use std::sync::OnceLock;
use std::time::{Duration, Instant};

const PROFILE_ENV: &str = "OPINION_MONITOR_PROFILE";

#[cfg(test)]
use std::sync::atomic::{AtomicI8, AtomicUsize, Ordering};

#[cfg(test)]
static ENABLED_OVERRIDE: AtomicI8 = AtomicI8::new(-1);
#[cfg(test)]
static LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

/// プロファイルログが有効かを返す。
pub fn enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    #[cfg(test)]
    {
        let override_value = ENABLED_OVERRIDE.load(Ordering::SeqCst);
        if override_value >= 0 {
            return override_value == 1;
        }
    }
    *ENABLED.get_or_init(|| {
        std::env::var(PROFILE_ENV)
            .ok()
            .map(|value| value.trim().to_ascii_lowercase())
            .map(|value| matches!(value.as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false)
    })
}

/// 計測開始用タイマー。
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// 計測を開始する。
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    /// 経過時間をログに出力する。
    pub fn log(self) {
        log_duration(self.label, self.start.elapsed(), "");
    }

    /// 追加情報付きで経過時間をログに出力する。
    pub fn log_with(self, extra: &str) {
        log_duration(self.label, self.start.elapsed(), extra);
    }
}

/// 計測済みの経過時間をログに出力する。
pub fn log_duration(label: &str, elapsed: Duration, extra: &str) {
    if !enabled() {
        return;
    }

    #[cfg(test)]
    {
        LOG_COUNT.fetch_add(1, Ordering::SeqCst);
    }

    tracing::info!(
        target: "opinion_monitor::profile",
        label,
        ms = elapsed.as_millis() as u64,
        "{}",
        extra
    );
}

#[cfg(test)]
pub fn set_enabled_override(value: bool) {
    ENABLED_OVERRIDE.store(if value { 1 } else { 0 }, Ordering::SeqCst);
}

#[cfg(test)]
pub fn clear_enabled_override() {
    ENABLED_OVERRIDE.store(-1, Ordering::SeqCst);
}

#[cfg(test)]
pub fn log_count() -> usize {
    LOG_COUNT.load(Ordering::SeqCst)
}
