use indexmap::{IndexMap, IndexSet};
use tracing::warn;

/// Step마다 새로 도입한 scope 키를 기록한다.
///
/// 키는 처음 관측된 Step 하나에만 귀속되므로 Step 간 집합은 서로소이다.
#[derive(Debug, Default, Clone)]
pub struct StepScopeTracker {
    /// Step 이름별 도입 키 집합. 첫 기록 순서를 유지한다.
    deltas: IndexMap<String, IndexSet<String>>,
    /// 지금까지 어떤 Step에든 귀속된 키.
    attributed: IndexSet<String>,
    /// 마지막으로 기록한 Step 이름.
    prev_step: Option<String>,
}

impl StepScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 Scenario 시작 시 상태를 비운다.
    pub fn reset(&mut self) {
        self.deltas.clear();
        self.attributed.clear();
        self.prev_step = None;
    }

    /// Step 종료 시점의 누적 scope 키로 해당 Step의 도입 키를 계산해 저장한다.
    ///
    /// scope에서 빠졌다가 다시 나타난 키는 처음 도입한 Step에 그대로 귀속된다.
    pub fn record<'a, I>(&mut self, step_name: &str, scope_keys: I) -> &IndexSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let delta: IndexSet<String> = scope_keys
            .into_iter()
            .filter(|key| !self.attributed.contains(*key))
            .map(str::to_string)
            .collect();
        self.attributed.extend(delta.iter().cloned());

        if self.deltas.contains_key(step_name) {
            warn!(step = step_name, "같은 이름의 Step이 다시 기록되어 도입 키를 병합합니다.");
        }
        self.prev_step = Some(step_name.to_string());
        let entry = self.deltas.entry(step_name.to_string()).or_default();
        entry.extend(delta);
        entry
    }

    /// Step이 도입한 키 집합을 반환한다.
    pub fn delta_of(&self, step_name: &str) -> Option<&IndexSet<String>> {
        self.deltas.get(step_name)
    }

    /// 키가 해당 Step에 귀속되었는지 확인한다.
    pub fn introduced_by(&self, step_name: &str, key: &str) -> bool {
        self.deltas
            .get(step_name)
            .is_some_and(|keys| keys.contains(key))
    }

    pub fn deltas(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.deltas
    }

    pub fn previous_step(&self) -> Option<&str> {
        self.prev_step.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(set: &IndexSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn monotonic_scope_attributes_each_key_to_introducing_step() {
        let mut tracker = StepScopeTracker::new();
        tracker.record("given_user", ["user"]);
        tracker.record("when_login", ["user", "token"]);
        tracker.record("then_status", ["user", "token", "response"]);

        let names: Vec<&str> = tracker.deltas().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["given_user", "when_login", "then_status"]);
        assert_eq!(keys(tracker.delta_of("given_user").expect("Step 누락")), vec!["user"]);
        assert_eq!(keys(tracker.delta_of("when_login").expect("Step 누락")), vec!["token"]);
        assert_eq!(
            keys(tracker.delta_of("then_status").expect("Step 누락")),
            vec!["response"]
        );
        assert_eq!(tracker.previous_step(), Some("then_status"));
    }

    #[test]
    fn deltas_stay_disjoint_and_cover_final_scope() {
        let mut tracker = StepScopeTracker::new();
        tracker.record("a", ["x", "y"]);
        tracker.record("b", ["x", "y"]);
        tracker.record("c", ["x", "y", "z"]);
        tracker.record("d", ["x", "y", "z", "w"]);

        let final_scope = ["x", "y", "z", "w"];
        for key in final_scope {
            let owners: Vec<&str> = tracker
                .deltas()
                .iter()
                .filter(|(_, delta)| delta.contains(key))
                .map(|(name, _)| name.as_str())
                .collect();
            assert_eq!(owners.len(), 1, "key {key} owners: {owners:?}");
        }
        assert!(tracker.delta_of("b").expect("Step 누락").is_empty());
    }

    #[test]
    fn step_without_scope_gets_empty_delta() {
        let mut tracker = StepScopeTracker::new();
        let delta = tracker.record("given", std::iter::empty());
        assert!(delta.is_empty());
        assert_eq!(tracker.deltas().len(), 1);
    }

    #[test]
    fn key_returning_to_scope_stays_with_first_step() {
        let mut tracker = StepScopeTracker::new();
        tracker.record("a", ["x"]);
        tracker.record("b", std::iter::empty());
        tracker.record("c", ["x"]);
        assert!(tracker.introduced_by("a", "x"));
        assert!(tracker.delta_of("c").expect("Step 누락").is_empty());
    }

    #[test]
    fn reset_clears_previous_scenario_state() {
        let mut tracker = StepScopeTracker::new();
        tracker.record("given", ["key"]);
        tracker.reset();
        assert!(tracker.is_empty());
        assert_eq!(tracker.previous_step(), None);

        tracker.record("given", ["key"]);
        assert!(tracker.introduced_by("given", "key"));
    }

    #[test]
    fn repeated_step_name_merges_introduced_keys() {
        let mut tracker = StepScopeTracker::new();
        tracker.record("step", ["a"]);
        tracker.record("other", ["a", "b"]);
        tracker.record("step", ["a", "b", "c"]);
        assert_eq!(tracker.deltas().len(), 2);
        assert_eq!(keys(tracker.delta_of("step").expect("Step 누락")), vec!["a", "c"]);
    }
}
