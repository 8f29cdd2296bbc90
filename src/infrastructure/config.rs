//! データソース設定の永続化
//!
//! `preferences.json` に `{"use_mock_data": bool}` を保存する。
//! 取得したデータそのものは保存しない。

use crate::application::traits::PreferenceStore;
use crate::domain::SourceMode;
use crate::error::{DashboardError, Result};
use crate::utils::config::EnvConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::{fs, io, path::PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct Preferences {
    use_mock_data: bool,
}

/// データディレクトリ（`$XDG_DATA_HOME/opinion_monitor` 優先）
pub fn data_dir() -> io::Result<PathBuf> {
    let config = EnvConfig::get();
    if let Some(xdg_data_home) = &config.xdg_data_home {
        return Ok(PathBuf::from(xdg_data_home).join("opinion_monitor"));
    }

    let proj = ProjectDirs::from("com", "user", "opinion_monitor").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "cannot resolve platform dirs")
    })?;
    Ok(proj.data_local_dir().to_path_buf())
}

/// JSON ファイル版 PreferenceStore
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    /// プラットフォーム既定の場所を使う
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: data_dir()?.join("preferences.json"),
        })
    }

    /// 任意のパスを使う
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn load(&self) -> Result<Option<SourceMode>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let f = fs::File::open(&self.path)?;
        match serde_json::from_reader::<_, Preferences>(f) {
            Ok(prefs) => Ok(Some(SourceMode::from_use_mock(prefs.use_mock_data))),
            Err(e) => {
                // 壊れたファイルは未保存扱い（モックに戻る）
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable preferences");
                Ok(None)
            }
        }
    }

    fn save(&self, mode: SourceMode) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        {
            let f = fs::File::create(&tmp)?;
            serde_json::to_writer_pretty(
                &f,
                &Preferences {
                    use_mock_data: mode.is_mock(),
                },
            )
            .map_err(|e| DashboardError::Preference(e.into()))?;
        }
        fs::rename(tmp, &self.path)?;
        debug!(path = %self.path.display(), %mode, "saved source mode");
        Ok(())
    }
}

/// メモリ上だけの PreferenceStore（テスト・一時利用）
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    mode: Mutex<Option<SourceMode>>,
}

impl MemoryPreferenceStore {
    pub fn new(initial: Option<SourceMode>) -> Self {
        Self {
            mode: Mutex::new(initial),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<SourceMode>> {
        self.mode
            .lock()
            .map(|m| *m)
            .map_err(|e| DashboardError::SystemError(format!("Lock error: {}", e)))
    }

    fn save(&self, mode: SourceMode) -> Result<()> {
        let mut m = self
            .mode
            .lock()
            .map_err(|e| DashboardError::SystemError(format!("Lock error: {}", e)))?;
        *m = Some(mode);
        Ok(())
    }
}
