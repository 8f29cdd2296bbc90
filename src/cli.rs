//! opinion_monitor CLI の定義と各コマンドの実行
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::ServiceContainer;
use crate::domain::{SourceMode, parse_keywords};
use crate::error::Result;
use crate::presentation::render_dashboard;

#[derive(Parser, Debug)]
#[command(author, version, about = "Xiaohongshu opinion monitoring dashboard")]
pub struct Cli {
    /// バックエンド API のベース URL（環境変数より優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Cmd {
    /// 現在のソースで読み込んで表示
    Show,
    /// 全データを更新して表示
    Refresh,
    /// データソースの切り替え
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// キーワード監視
    Monitor {
        #[command(subcommand)]
        action: MonitorCmd,
    },
    /// 臨時検索（スクレイピング）を開始
    Search {
        /// キーワード（カンマ・空白区切り可）
        #[arg(required = true)]
        keywords: Vec<String>,
        /// 予約された更新を待たずに終了
        #[arg(long, default_value_t = false)]
        no_wait: bool,
    },
    /// 直近のスクレイピングログ
    Logs {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// 単一投稿の分析
    Analyze { url: String },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum MonitorCmd {
    /// 監視開始
    Start {
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    /// 監視停止
    Stop,
    /// ワーカー状態
    Status,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Mock,
    Remote,
}

impl From<ModeArg> for SourceMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Mock => SourceMode::Mock,
            ModeArg::Remote => SourceMode::Remote,
        }
    }
}

/// 引数のキーワードを 1 つのリストにまとめる。空なら空リスト
pub fn collect_keywords(args: &[String]) -> Vec<String> {
    parse_keywords(&args.join(",")).unwrap_or_default()
}

fn print_dashboard(container: &ServiceContainer) {
    let state = container.orchestrator.snapshot();
    print!(
        "{}",
        render_dashboard(&state, container.config.hot_posts_display_limit, Utc::now())
    );
}

/// コマンドを実行する
pub async fn run(cmd: Cmd, container: &ServiceContainer) -> Result<()> {
    let orchestrator = &container.orchestrator;

    match cmd {
        Cmd::Show => {
            orchestrator.initialize().await;
            print_dashboard(container);
        }
        Cmd::Refresh => {
            orchestrator.refresh().await;
            print_dashboard(container);
        }
        Cmd::Mode { mode } => {
            orchestrator.set_source_mode(mode.into()).await;
            println!("数据源: {}", orchestrator.mode());
        }
        Cmd::Monitor { action } => match action {
            MonitorCmd::Start { keywords } => {
                orchestrator
                    .start_monitoring(&collect_keywords(&keywords))
                    .await;
            }
            MonitorCmd::Stop => orchestrator.stop_monitoring().await,
            MonitorCmd::Status => {
                let status = orchestrator.monitor_status().await?;
                println!("{:#}", status);
            }
        },
        Cmd::Search { keywords, no_wait } => {
            let scheduled = orchestrator
                .search_keywords(&collect_keywords(&keywords))
                .await;
            if let Some(refresh) = scheduled {
                if no_wait {
                    refresh.cancel();
                } else if refresh.wait().await {
                    print_dashboard(container);
                }
            }
        }
        Cmd::Logs { limit } => {
            for entry in orchestrator.scraping_logs(limit).await? {
                println!("{}", entry);
            }
        }
        Cmd::Analyze { url } => {
            let analysis = orchestrator.analyze_post(&url).await?;
            println!("{:#}", analysis);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["opinion_monitor"]).unwrap();
        assert!(cli.cmd.is_none());
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn api_url_is_global() {
        let cli =
            Cli::try_parse_from(["opinion_monitor", "refresh", "--api-url", "http://h:1/api"])
                .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://h:1/api"));
        assert_eq!(cli.cmd, Some(Cmd::Refresh));
    }

    #[test]
    fn search_collects_keywords_and_flag() {
        let cli = Cli::try_parse_from(["opinion_monitor", "search", "口红,面膜", "防晒", "--no-wait"])
            .unwrap();
        match cli.cmd {
            Some(Cmd::Search { keywords, no_wait }) => {
                assert!(no_wait);
                assert_eq!(collect_keywords(&keywords), vec!["口红", "面膜", "防晒"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn search_requires_keywords() {
        assert!(Cli::try_parse_from(["opinion_monitor", "search"]).is_err());
    }

    #[test]
    fn mode_accepts_only_known_values() {
        let cli = Cli::try_parse_from(["opinion_monitor", "mode", "remote"]).unwrap();
        assert_eq!(
            cli.cmd,
            Some(Cmd::Mode {
                mode: ModeArg::Remote
            })
        );
        assert!(Cli::try_parse_from(["opinion_monitor", "mode", "live"]).is_err());
    }

    #[test]
    fn logs_limit_defaults_to_twenty() {
        let cli = Cli::try_parse_from(["opinion_monitor", "logs"]).unwrap();
        assert_eq!(cli.cmd, Some(Cmd::Logs { limit: 20 }));
    }

    #[test]
    fn blank_keywords_collect_to_empty() {
        assert!(collect_keywords(&[" ".to_string(), ",".to_string()]).is_empty());
    }
}
