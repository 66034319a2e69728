use super::format::{format_exception, format_scope};
use super::scope::StepScopeTracker;
use super::section::{SectionIdSource, UuidSectionIds, epoch_seconds, section_end, section_start};
use super::summary::RunSummary;
use crate::config::{CollapsableMode, ReporterConfig};
use crate::console::{Console, Style};
use crate::dispatcher::{Plugin, ReporterEvent};
use crate::scenario::{ScenarioResult, SharedScenarioResult, StepResult};
use anyhow::Context;
use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tracing::debug;

/// 실패한 Scenario의 Step 출력을 GitLab CI 접기 섹션으로 감싸 출력하는 리포터이다.
pub struct GitlabReporter {
    console: Console,
    config: ReporterConfig,
    section_ids: Box<dyn SectionIdSource>,
    /// 현재 실행 중인 Scenario.
    scenario: Option<SharedScenarioResult>,
    /// Step별 도입 scope 키.
    scopes: StepScopeTracker,
    /// 마지막으로 출력한 namespace.
    last_namespace: Option<String>,
    summary: RunSummary,
}

impl GitlabReporter {
    /// 섹션 식별자로 UUID를 사용하는 리포터를 생성한다.
    pub fn new(console: Console, config: ReporterConfig) -> Self {
        Self {
            console,
            config,
            section_ids: Box::new(UuidSectionIds),
            scenario: None,
            scopes: StepScopeTracker::new(),
            last_namespace: None,
            summary: RunSummary::default(),
        }
    }

    /// 섹션 식별자 발급기를 교체한다.
    pub fn with_section_ids(mut self, ids: impl SectionIdSource + 'static) -> Self {
        self.section_ids = Box::new(ids);
        self
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn step_scopes(&self) -> &StepScopeTracker {
        &self.scopes
    }

    /// Scenario 시작 시 Step 상태를 초기화하고 결과 참조를 보관한다.
    pub async fn on_scenario_run(&mut self, scenario: &SharedScenarioResult) -> io::Result<()> {
        self.scopes.reset();
        self.scenario = Some(scenario.clone());

        let result = scenario.read().await;
        debug!(scenario = %result.id, "scenario state reset");
        if !result.namespace.is_empty()
            && self.last_namespace.as_deref() != Some(result.namespace.as_str())
        {
            self.console
                .out(&format!("* {}", result.namespace), Some(Style::Bold))?;
            self.last_namespace = Some(result.namespace.clone());
        }
        Ok(())
    }

    /// Step 종료 시 현재 누적 scope에서 이 Step이 도입한 키를 기록한다.
    ///
    /// # Panics
    /// 실행 중인 Scenario가 없으면 호출 순서 계약 위반으로 패닉한다.
    pub async fn on_step_end(&mut self, step: &StepResult) {
        let Some(scenario) = self.scenario.clone() else {
            panic!(
                "Scenario 시작 이벤트 없이 Step '{}' 종료 이벤트가 전달되었습니다.",
                step.name
            );
        };
        let result = scenario.read().await;
        let delta = self
            .scopes
            .record(&step.name, result.scope.keys().map(String::as_str));
        debug!(step = %step.name, introduced = delta.len(), "step scope recorded");
    }

    pub async fn on_scenario_passed(&mut self, scenario: &SharedScenarioResult) -> io::Result<()> {
        self.summary.passed += 1;
        self.scenario = None;
        let result = scenario.read().await;
        let line = match result.elapsed() {
            Some(elapsed) if self.config.show_timings => {
                format!(" ✔ {} ({elapsed:.2}s)", result.subject)
            }
            _ => format!(" ✔ {}", result.subject),
        };
        self.console.out(&line, Some(Style::Green))
    }

    pub async fn on_scenario_skipped(&mut self, scenario: &SharedScenarioResult) -> io::Result<()> {
        self.summary.skipped += 1;
        self.scenario = None;
        let result = scenario.read().await;
        self.console
            .out(&format!(" ○ {}", result.subject), Some(Style::Yellow))
    }

    /// 실패 줄을 출력하고 설정된 모드에 따라 Step 상세를 덧붙인다.
    pub async fn on_scenario_failed(&mut self, scenario: &SharedScenarioResult) -> io::Result<()> {
        self.summary.failed += 1;
        self.scenario = None;
        let result = scenario.read().await;
        self.console
            .out(&format!(" ✗ {}", result.subject), Some(Style::Red))?;

        match self.config.collapsable {
            CollapsableMode::Disabled => Ok(()),
            CollapsableMode::Steps => self.print_steps(&result),
            CollapsableMode::Vars => {
                self.print_vars(&result)?;
                self.print_exceptions(&result)
            }
        }
    }

    /// 실행 요약 줄을 출력한다.
    pub fn on_cleanup(&mut self, elapsed: Duration) -> io::Result<()> {
        self.console
            .out(&self.summary.render(elapsed), Some(self.summary.style()))
    }

    /// Step마다 섹션을 열고 Step 줄을 머리글로, 도입한 변수를 본문으로 출력한다.
    fn print_steps(&mut self, result: &ScenarioResult) -> io::Result<()> {
        let scope = format_scope(&result.scope);
        for step in &result.step_results {
            let Some((label, style)) = step_label(step) else {
                continue;
            };
            let id = self.section_ids.next_id();
            self.print_section_start(&id, epoch_seconds(step.started_at), true)?;
            self.console.out(&label, Some(style))?;
            self.print_introduced_vars(step, &scope)?;
            self.print_section_end(&id, epoch_seconds(step.ended_at))?;
        }
        Ok(())
    }

    /// Step 줄 아래에 해당 Step이 도입한 변수를 섹션으로 출력한다.
    fn print_vars(&mut self, result: &ScenarioResult) -> io::Result<()> {
        let scope = format_scope(&result.scope);
        for step in &result.step_results {
            let Some((label, style)) = step_label(step) else {
                continue;
            };
            self.console.out(&label, Some(style))?;

            let id = self.section_ids.next_id();
            self.print_section_start(&id, epoch_seconds(step.started_at), true)?;
            self.print_introduced_vars(step, &scope)?;
            self.print_section_end(&id, epoch_seconds(step.ended_at))?;
        }
        Ok(())
    }

    /// 최종 scope 순서대로 Step이 도입한 항목만 출력한다.
    fn print_introduced_vars(&self, step: &StepResult, scope: &[(&str, String)]) -> io::Result<()> {
        for (key, value) in scope {
            if self.scopes.introduced_by(&step.name, key) {
                self.console.out(&format!("      {key}: "), Some(Style::Blue))?;
                self.console.out(value, None)?;
            }
        }
        Ok(())
    }

    fn print_exceptions(&self, result: &ScenarioResult) -> io::Result<()> {
        for step in &result.step_results {
            if let Some(exc_info) = &step.exc_info {
                self.console
                    .out(&format_exception(exc_info), Some(Style::Yellow))?;
            }
        }
        Ok(())
    }

    fn print_section_start(&self, id: &str, started_at: i64, collapsed: bool) -> io::Result<()> {
        self.console
            .write_raw(&section_start(id, started_at, collapsed))
    }

    fn print_section_end(&self, id: &str, ended_at: i64) -> io::Result<()> {
        self.console
            .write_raw(&format!("{}\n", section_end(id, ended_at)))
    }
}

/// 성공/실패한 Step의 표시 줄과 색상을 반환한다. 그 외 상태는 `None`이다.
fn step_label(step: &StepResult) -> Option<(String, Style)> {
    if step.is_passed() {
        Some((format!("    ✔ {}", step.name), Style::Green))
    } else if step.is_failed() {
        Some((format!("    ✗ {}", step.name), Style::Red))
    } else {
        None
    }
}

#[async_trait]
impl Plugin for GitlabReporter {
    fn name(&self) -> &str {
        "gitlab"
    }

    async fn on_event(&mut self, event: &ReporterEvent) -> anyhow::Result<()> {
        let written = match event {
            ReporterEvent::ScenarioRun { scenario } => self.on_scenario_run(scenario).await,
            ReporterEvent::StepPassed { step } | ReporterEvent::StepFailed { step } => {
                self.on_step_end(step).await;
                Ok(())
            }
            ReporterEvent::ScenarioPassed { scenario } => self.on_scenario_passed(scenario).await,
            ReporterEvent::ScenarioFailed { scenario } => self.on_scenario_failed(scenario).await,
            ReporterEvent::ScenarioSkipped { scenario } => {
                self.on_scenario_skipped(scenario).await
            }
            ReporterEvent::Cleanup { elapsed } => self.on_cleanup(*elapsed),
        };
        written.context("콘솔 출력 실패")
    }
}
