//! NDJSON 이벤트 스트림을 읽어 결과 모델을 갱신하고 리포터 이벤트로 재생한다.

mod record;

pub use record::{EventRecord, ScenarioHeader, StepRecord};

use crate::dispatcher::{Dispatcher, ReporterEvent};
use crate::error::ReporterError;
use crate::scenario::{ScenarioResult, SharedScenarioResult, StepStatus};
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, info, warn};

/// 재생 결과 통계이다.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    /// 처리한 이벤트 레코드 수.
    pub events: usize,
    pub scenarios: usize,
    pub failed: usize,
}

/// 재생 중 생산자 측 상태이다.
#[derive(Default)]
struct ReplayState {
    current: Option<SharedScenarioResult>,
    cleaned_up: bool,
    stats: ReplayStats,
}

impl ReplayState {
    /// 레코드를 결과 모델에 반영하고 전달할 이벤트를 만든다.
    async fn apply(
        &mut self,
        record: EventRecord,
        line: usize,
        elapsed: Duration,
    ) -> Result<ReporterEvent, ReporterError> {
        let event_name = record.name();
        if self.cleaned_up {
            return Err(ReporterError::AfterCleanup { line, event: event_name });
        }
        let event = match record {
            EventRecord::ScenarioRun { scenario } => {
                if let Some(previous) = &self.current {
                    let previous = previous.read().await.id.clone();
                    return Err(ReporterError::ScenarioNotFinished { line, previous });
                }
                let mut result = ScenarioResult::new(scenario.id, scenario.subject)
                    .with_namespace(scenario.namespace);
                result.started_at = scenario.started_at;
                let shared = result.into_shared();
                self.current = Some(shared.clone());
                self.stats.scenarios += 1;
                ReporterEvent::ScenarioRun { scenario: shared }
            }
            EventRecord::StepPassed { step, scope } | EventRecord::StepFailed { step, scope } => {
                let status = if event_name == "step_passed" {
                    StepStatus::Passed
                } else {
                    StepStatus::Failed
                };
                let current = self.active(line, event_name)?;
                let step = step.into_result(status);
                {
                    let mut guard = current.write().await;
                    if let Some(scope) = scope {
                        guard.set_scope(scope);
                    }
                    guard.add_step_result(step.clone());
                }
                match status {
                    StepStatus::Passed => ReporterEvent::StepPassed { step },
                    _ => ReporterEvent::StepFailed { step },
                }
            }
            EventRecord::ScenarioPassed { ended_at } => {
                let scenario = self.finish(line, event_name, ended_at).await?;
                scenario.write().await.mark_passed();
                ReporterEvent::ScenarioPassed { scenario }
            }
            EventRecord::ScenarioFailed { ended_at } => {
                let scenario = self.finish(line, event_name, ended_at).await?;
                scenario.write().await.mark_failed();
                self.stats.failed += 1;
                ReporterEvent::ScenarioFailed { scenario }
            }
            EventRecord::ScenarioSkipped { ended_at } => {
                let scenario = self.finish(line, event_name, ended_at).await?;
                scenario.write().await.mark_skipped();
                ReporterEvent::ScenarioSkipped { scenario }
            }
            EventRecord::Cleanup => {
                self.cleaned_up = true;
                ReporterEvent::Cleanup { elapsed }
            }
        };
        self.stats.events += 1;
        Ok(event)
    }

    fn active(&self, line: usize, event: &'static str) -> Result<SharedScenarioResult, ReporterError> {
        self.current
            .clone()
            .ok_or(ReporterError::NoActiveScenario { line, event })
    }

    async fn finish(
        &mut self,
        line: usize,
        event: &'static str,
        ended_at: Option<f64>,
    ) -> Result<SharedScenarioResult, ReporterError> {
        let scenario = self
            .current
            .take()
            .ok_or(ReporterError::NoActiveScenario { line, event })?;
        if ended_at.is_some() {
            scenario.write().await.ended_at = ended_at;
        }
        Ok(scenario)
    }
}

/// Reader에서 NDJSON 레코드를 읽어 순서대로 디스패처에 전달한다.
///
/// 빈 줄은 건너뛰며, cleanup 레코드가 없으면 스트림 끝에서 한 번 발생시킨다.
/// cleanup 이후의 레코드는 `ReporterError::AfterCleanup`으로 거부한다.
pub async fn replay_events<R>(
    reader: R,
    dispatcher: &mut Dispatcher,
) -> Result<ReplayStats, ReporterError>
where
    R: AsyncRead + Unpin,
{
    let started = Instant::now();
    let mut lines = FramedRead::new(reader, LinesCodec::new());
    let mut state = ReplayState::default();
    let mut line_no = 0;
    info!("event replay started");
    while let Some(line_result) = lines.next().await {
        let line = line_result?;
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let record: EventRecord = serde_json::from_str(&line)
            .map_err(|source| ReporterError::EventDecode { line: line_no, source })?;
        debug!(line = line_no, event = record.name(), "record decoded");
        let event = state.apply(record, line_no, started.elapsed()).await?;
        dispatcher.fire(&event).await?;
    }
    if let Some(unfinished) = &state.current {
        let id = unfinished.read().await.id.clone();
        warn!(scenario = %id, "스트림이 Scenario 종료 없이 끝났습니다.");
    }
    if !state.cleaned_up {
        dispatcher
            .fire(&ReporterEvent::Cleanup { elapsed: started.elapsed() })
            .await?;
    }
    info!(
        events = state.stats.events,
        scenarios = state.stats.scenarios,
        failed = state.stats.failed,
        "event replay finished"
    );
    Ok(state.stats)
}
