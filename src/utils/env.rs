/// Environment loading helpers.
///
/// Loads environment variables from `.env` if present, or from the file
/// specified by the `OPINION_MONITOR_ENV_PATH` environment variable. Any
/// errors during loading are ignored.
pub fn load_env() {
    // EnvConfig の初期化前に実行される
    if let Ok(path) = std::env::var("OPINION_MONITOR_ENV_PATH") {
        dotenvy::from_path(path).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}
