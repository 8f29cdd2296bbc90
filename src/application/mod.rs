pub mod notifier;
pub mod orchestrator;
pub mod service_container;
pub mod traits;

pub use notifier::{ConsoleNotifier, RecordingNotifier};
pub use orchestrator::{DashboardState, DataOrchestrator, DeferredRefresh, OrchestratorConfig};
pub use service_container::{AppConfig, ServiceContainer};
pub use traits::{DashboardApi, Notice, NoticeLevel, Notifier, PreferenceStore};
