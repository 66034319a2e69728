use crate::scenario::{ExcInfo, Scope, StepResult, StepStatus};
use serde::{Deserialize, Serialize};

/// NDJSON 스트림 한 줄에 해당하는 이벤트 레코드이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventRecord {
    /// Scenario 시작.
    ScenarioRun { scenario: ScenarioHeader },
    /// Step 성공. `scope`가 있으면 누적 scope를 교체한다.
    StepPassed {
        step: StepRecord,
        #[serde(default)]
        scope: Option<Scope>,
    },
    /// Step 실패.
    StepFailed {
        step: StepRecord,
        #[serde(default)]
        scope: Option<Scope>,
    },
    ScenarioPassed {
        #[serde(default)]
        ended_at: Option<f64>,
    },
    ScenarioFailed {
        #[serde(default)]
        ended_at: Option<f64>,
    },
    ScenarioSkipped {
        #[serde(default)]
        ended_at: Option<f64>,
    },
    /// 전체 실행 종료.
    Cleanup,
}

impl EventRecord {
    pub fn name(&self) -> &'static str {
        match self {
            EventRecord::ScenarioRun { .. } => "scenario_run",
            EventRecord::StepPassed { .. } => "step_passed",
            EventRecord::StepFailed { .. } => "step_failed",
            EventRecord::ScenarioPassed { .. } => "scenario_passed",
            EventRecord::ScenarioFailed { .. } => "scenario_failed",
            EventRecord::ScenarioSkipped { .. } => "scenario_skipped",
            EventRecord::Cleanup => "cleanup",
        }
    }
}

/// Scenario 시작 레코드의 식별 정보이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioHeader {
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub started_at: Option<f64>,
}

/// Step 종료 레코드의 본문이다. 상태는 이벤트 종류에서 결정된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    #[serde(default)]
    pub started_at: Option<f64>,
    #[serde(default)]
    pub ended_at: Option<f64>,
    #[serde(default)]
    pub exc_info: Option<ExcInfo>,
}

impl StepRecord {
    /// 이벤트 종류에 맞는 상태로 Step 결과를 만든다.
    pub fn into_result(self, status: StepStatus) -> StepResult {
        StepResult {
            name: self.name,
            status,
            started_at: self.started_at,
            ended_at: self.ended_at,
            exc_info: self.exc_info,
        }
    }
}
