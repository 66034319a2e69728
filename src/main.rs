use anyhow::Context;
use clap::Parser;
use gitlab_reporter::config::load_config_from_file;
use gitlab_reporter::{
    CollapsableMode, ColorMode, Console, Dispatcher, GitlabReporter, RawReporterConfig,
    ReplayStats, replay_events,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// 테스트 실행기의 NDJSON 이벤트를 GitLab CI 접기 섹션 형식으로 출력한다.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// 이벤트 스트림 파일. 생략하면 stdin을 읽는다.
    #[clap(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// 리포터 YAML 설정 파일.
    #[clap(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// 레거시 verbosity (-v: steps, -vv: vars).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// 접기 섹션 모드. -v보다 우선한다.
    #[clap(long, value_enum, value_name = "MODE")]
    gitlab_collapsable: Option<CollapsableMode>,

    /// 통과한 Scenario의 소요 시간을 표시한다.
    #[clap(long)]
    show_timings: bool,

    /// 색상 출력 정책.
    #[clap(long, value_enum, value_name = "WHEN")]
    color: Option<ColorMode>,
}

impl Args {
    /// CLI에서 명시한 값만 담은 설정을 만든다.
    fn overrides(&self) -> RawReporterConfig {
        RawReporterConfig {
            verbose: (self.verbose > 0).then_some(self.verbose),
            gitlab_collapsable: self.gitlab_collapsable,
            show_timings: self.show_timings.then_some(true),
            color: self.color,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let file_config = match &args.config {
        Some(path) => load_config_from_file(path)?,
        None => RawReporterConfig::default(),
    };
    let config = file_config.merge(args.overrides()).normalize();
    tracing::debug!(?config, "reporter config loaded");

    let reporter = GitlabReporter::new(Console::stdout(config.color), config);
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Box::new(reporter));

    let stats: ReplayStats = match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("이벤트 파일을 열 수 없습니다: {}", path.display()))?;
            replay_events(file, &mut dispatcher).await?
        }
        None => replay_events(tokio::io::stdin(), &mut dispatcher).await?,
    };

    if stats.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
