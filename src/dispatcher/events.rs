use crate::scenario::{SharedScenarioResult, StepResult};
use std::time::Duration;

/// 테스트 실행기에서 리포터로 전달되는 수명 주기 이벤트이다.
#[derive(Debug, Clone)]
pub enum ReporterEvent {
    /// Scenario 시작 알림.
    ScenarioRun { scenario: SharedScenarioResult },
    /// Step 성공 알림.
    StepPassed { step: StepResult },
    /// Step 실패 알림.
    StepFailed { step: StepResult },
    /// Scenario 성공 종료.
    ScenarioPassed { scenario: SharedScenarioResult },
    /// Scenario 실패 종료.
    ScenarioFailed { scenario: SharedScenarioResult },
    /// Scenario 건너뜀.
    ScenarioSkipped { scenario: SharedScenarioResult },
    /// 전체 실행 종료.
    Cleanup { elapsed: Duration },
}

impl ReporterEvent {
    /// 로그에 사용할 이벤트 이름을 반환한다.
    pub fn name(&self) -> &'static str {
        match self {
            ReporterEvent::ScenarioRun { .. } => "scenario_run",
            ReporterEvent::StepPassed { .. } => "step_passed",
            ReporterEvent::StepFailed { .. } => "step_failed",
            ReporterEvent::ScenarioPassed { .. } => "scenario_passed",
            ReporterEvent::ScenarioFailed { .. } => "scenario_failed",
            ReporterEvent::ScenarioSkipped { .. } => "scenario_skipped",
            ReporterEvent::Cleanup { .. } => "cleanup",
        }
    }
}
