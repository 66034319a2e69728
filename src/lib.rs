//! GitLab CI 접기 섹션 형식으로 Scenario/Step 결과를 출력하는 테스트 리포터.

pub mod config;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod replay;
pub mod reporter;
pub mod scenario;

pub use config::{CollapsableMode, RawReporterConfig, ReporterConfig};
pub use console::{ColorMode, Console, MemoryWriter, Style};
pub use dispatcher::{Dispatcher, Plugin, ReporterEvent};
pub use error::ReporterError;
pub use replay::{ReplayStats, replay_events};
pub use reporter::GitlabReporter;
pub use scenario::{ExcInfo, ScenarioResult, SharedScenarioResult, StepResult, StepStatus};
