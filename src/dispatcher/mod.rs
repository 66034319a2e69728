mod events;

pub use events::ReporterEvent;

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

/// 수명 주기 이벤트를 받아 처리하는 플러그인 인터페이스이다.
#[async_trait]
pub trait Plugin: Send {
    /// 로그와 오류 메시지에 사용할 플러그인 이름.
    fn name(&self) -> &str;

    /// 이벤트 하나를 끝까지 처리한다.
    async fn on_event(&mut self, event: &ReporterEvent) -> anyhow::Result<()>;
}

/// 등록된 플러그인에 이벤트를 순서대로 전달한다.
#[derive(Default)]
pub struct Dispatcher {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 플러그인을 등록한다. 전달 순서는 등록 순서와 같다.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> &mut Self {
        debug!(plugin = plugin.name(), "plugin registered");
        self.plugins.push(plugin);
        self
    }

    /// 이벤트를 모든 플러그인에 전달하고 각 처리가 끝날 때까지 기다린다.
    pub async fn fire(&mut self, event: &ReporterEvent) -> anyhow::Result<()> {
        debug!(event = event.name(), "dispatching event");
        for plugin in &mut self.plugins {
            plugin
                .on_event(event)
                .await
                .with_context(|| format!("플러그인 '{}'의 '{}' 처리 실패", plugin.name(), event.name()))?;
        }
        Ok(())
    }

    /// 채널이 닫힐 때까지 이벤트를 소비한다.
    pub async fn run(&mut self, mut events: UnboundedReceiver<ReporterEvent>) -> anyhow::Result<()> {
        while let Some(event) = events.recv().await {
            self.fire(&event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::StepResult;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// 받은 이벤트 이름을 기록하는 목업 플러그인이다.
    struct RecordingPlugin {
        label: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Plugin for RecordingPlugin {
        fn name(&self) -> &str {
            self.label
        }

        async fn on_event(&mut self, event: &ReporterEvent) -> anyhow::Result<()> {
            self.seen
                .lock()
                .expect("잠금 실패")
                .push(format!("{}:{}", self.label, event.name()));
            Ok(())
        }
    }

    struct FailingPlugin;

    #[async_trait]
    impl Plugin for FailingPlugin {
        fn name(&self) -> &str {
            "failing"
        }

        async fn on_event(&mut self, _event: &ReporterEvent) -> anyhow::Result<()> {
            anyhow::bail!("의도된 실패")
        }
    }

    #[tokio::test]
    async fn events_reach_plugins_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(Box::new(RecordingPlugin { label: "a", seen: seen.clone() }))
            .register(Box::new(RecordingPlugin { label: "b", seen: seen.clone() }));

        dispatcher
            .fire(&ReporterEvent::StepPassed { step: StepResult::new("given") })
            .await
            .expect("이벤트 전달 실패");

        let seen = seen.lock().expect("잠금 실패").clone();
        assert_eq!(seen, vec!["a:step_passed", "b:step_passed"]);
    }

    #[tokio::test]
    async fn run_drains_channel_until_closed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Box::new(RecordingPlugin { label: "r", seen: seen.clone() }));

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tx.send(ReporterEvent::StepFailed { step: StepResult::new("when") })
            .expect("전송 실패");
        tx.send(ReporterEvent::Cleanup { elapsed: Duration::ZERO })
            .expect("전송 실패");
        drop(tx);

        dispatcher.run(rx).await.expect("이벤트 소비 실패");
        let seen = seen.lock().expect("잠금 실패").clone();
        assert_eq!(seen, vec!["r:step_failed", "r:cleanup"]);
    }

    #[tokio::test]
    async fn plugin_failure_names_plugin_and_event() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Box::new(FailingPlugin));
        let err = dispatcher
            .fire(&ReporterEvent::Cleanup { elapsed: Duration::ZERO })
            .await
            .expect_err("실패가 전파되지 않았습니다.");
        assert!(err.to_string().contains("failing"));
        assert!(err.to_string().contains("cleanup"));
    }
}
