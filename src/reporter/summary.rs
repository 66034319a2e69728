use crate::console::Style;
use std::time::Duration;

/// 실행 전체의 Scenario 결과 집계이다.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// 요약 줄 문자열을 만든다.
    pub fn render(&self, elapsed: Duration) -> String {
        let total = self.total();
        let noun = if total == 1 { "scenario" } else { "scenarios" };
        format!(
            "# {total} {noun}, {} passed, {} failed, {} skipped ({:.2}s)",
            self.passed,
            self.failed,
            self.skipped,
            elapsed.as_secs_f64()
        )
    }

    /// 결과에 맞는 요약 줄 색상을 고른다.
    pub fn style(&self) -> Style {
        if self.failed > 0 {
            Style::Red
        } else if self.passed == 0 {
            Style::Yellow
        } else {
            Style::Green
        }
    }
}
