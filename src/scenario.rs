use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// 시나리오 실행 중 누적되는 변수 컨텍스트이다. 삽입 순서를 유지한다.
pub type Scope = IndexMap<String, serde_json::Value>;

/// Scenario 결과를 생산자와 리포터가 함께 참조하기 위한 타입 별칭이다.
pub type SharedScenarioResult = Arc<RwLock<ScenarioResult>>;

/// Scenario의 실행 상태를 표현한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// 아직 종료되지 않음.
    #[default]
    Pending,
    /// 정상 종료.
    Passed,
    /// 실패.
    Failed,
    /// 건너뜀.
    Skipped,
}

/// Step의 실행 상태를 표현한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// 아직 실행되지 않음.
    #[default]
    Pending,
    /// 정상 종료.
    Passed,
    /// 실패.
    Failed,
}

/// 트레이스백의 한 프레임이다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// 소스 파일 경로.
    pub file: String,
    /// 1 기반 라인 번호.
    pub line: u32,
    /// 함수 이름.
    pub function: String,
    /// 해당 라인의 소스 코드.
    #[serde(default)]
    pub source: Option<String>,
}

/// 실패한 Step에 첨부되는 예외 정보이다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcInfo {
    /// 예외 타입 이름.
    #[serde(rename = "type")]
    pub type_name: String,
    /// 예외 메시지.
    #[serde(default)]
    pub message: String,
    /// 바깥쪽부터 나열된 트레이스백 프레임.
    #[serde(default)]
    pub traceback: Vec<TraceFrame>,
}

/// Step 하나의 실행 결과이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Step 이름.
    pub name: String,
    /// 실행 상태.
    #[serde(default)]
    pub status: StepStatus,
    /// 시작 시각(유닉스 초).
    #[serde(default)]
    pub started_at: Option<f64>,
    /// 종료 시각(유닉스 초).
    #[serde(default)]
    pub ended_at: Option<f64>,
    /// 실패 시 예외 정보.
    #[serde(default)]
    pub exc_info: Option<ExcInfo>,
}

impl StepResult {
    /// 대기 상태의 Step 결과를 생성한다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Pending,
            started_at: None,
            ended_at: None,
            exc_info: None,
        }
    }

    pub fn mark_passed(mut self) -> Self {
        self.status = StepStatus::Passed;
        self
    }

    pub fn mark_failed(mut self) -> Self {
        self.status = StepStatus::Failed;
        self
    }

    pub fn with_started_at(mut self, started_at: f64) -> Self {
        self.started_at = Some(started_at);
        self
    }

    pub fn with_ended_at(mut self, ended_at: f64) -> Self {
        self.ended_at = Some(ended_at);
        self
    }

    pub fn with_exc_info(mut self, exc_info: ExcInfo) -> Self {
        self.exc_info = Some(exc_info);
        self
    }

    pub fn is_passed(&self) -> bool {
        self.status == StepStatus::Passed
    }

    pub fn is_failed(&self) -> bool {
        self.status == StepStatus::Failed
    }
}

/// Scenario 전체의 실행 결과이다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenarioResult {
    /// 고유 Scenario ID.
    pub id: String,
    /// 사용자에게 보여줄 제목.
    pub subject: String,
    /// 그룹 경로.
    pub namespace: String,
    /// 실행 상태.
    pub status: ScenarioStatus,
    /// 시작 시각(유닉스 초).
    pub started_at: Option<f64>,
    /// 종료 시각(유닉스 초).
    pub ended_at: Option<f64>,
    /// 실행 순서대로 누적된 Step 결과.
    pub step_results: Vec<StepResult>,
    /// 누적 변수 컨텍스트.
    pub scope: Scope,
}

impl ScenarioResult {
    /// ID와 제목으로 대기 상태의 결과를 생성한다.
    pub fn new(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Shared 포인터로 감싼다.
    pub fn into_shared(self) -> SharedScenarioResult {
        Arc::new(RwLock::new(self))
    }

    pub fn add_step_result(&mut self, step_result: StepResult) {
        self.step_results.push(step_result);
    }

    /// 누적 scope를 통째로 교체한다.
    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    pub fn mark_passed(&mut self) {
        self.status = ScenarioStatus::Passed;
    }

    pub fn mark_failed(&mut self) {
        self.status = ScenarioStatus::Failed;
    }

    pub fn mark_skipped(&mut self) {
        self.status = ScenarioStatus::Skipped;
    }

    /// 시작과 종료 시각이 모두 있으면 경과 시간(초)을 반환한다.
    pub fn elapsed(&self) -> Option<f64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }
}
