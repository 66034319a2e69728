use std::path::PathBuf;

/// 설정 로딩과 이벤트 스트림 재생 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    /// 설정 파일을 읽지 못한 경우이다.
    #[error("설정 파일을 읽을 수 없습니다: {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 설정 파일 형식이 잘못된 경우이다.
    #[error("설정 파일 파싱 실패: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
    /// 이벤트 레코드를 해석하지 못한 경우이다.
    #[error("{line}번째 줄의 이벤트를 해석할 수 없습니다: {source}")]
    EventDecode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    /// 실행 중인 Scenario 없이 Step 또는 종료 이벤트가 들어온 경우이다.
    #[error("{line}번째 줄: 실행 중인 Scenario 없이 '{event}' 이벤트가 도착했습니다.")]
    NoActiveScenario { line: usize, event: &'static str },
    /// 이전 Scenario가 끝나기 전에 새 Scenario가 시작된 경우이다.
    #[error("{line}번째 줄: Scenario '{previous}'가 종료되기 전에 새 Scenario가 시작되었습니다.")]
    ScenarioNotFinished { line: usize, previous: String },
    /// cleanup 이후에 레코드가 더 들어온 경우이다.
    #[error("{line}번째 줄: cleanup 이후에 '{event}' 이벤트가 도착했습니다.")]
    AfterCleanup { line: usize, event: &'static str },
    /// 입력 스트림을 줄 단위로 읽지 못한 경우이다.
    #[error("이벤트 스트림 읽기 오류: {0}")]
    Lines(#[from] tokio_util::codec::LinesCodecError),
    /// 리포터 플러그인이 실패한 경우이다.
    #[error(transparent)]
    Plugin(#[from] anyhow::Error),
}
