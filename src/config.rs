use crate::console::ColorMode;
use crate::error::ReporterError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 실패한 Scenario에 대해 접을 수 있는 섹션을 어디까지 출력할지 정한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CollapsableMode {
    /// 실패 줄만 출력한다.
    #[default]
    #[value(alias = "none", alias = "off")]
    Disabled,
    /// Step마다 섹션을 출력한다.
    Steps,
    /// Step별로 도입된 변수를 섹션으로 출력하고 예외를 덧붙인다.
    Vars,
}

impl CollapsableMode {
    /// 레거시 verbosity 정수를 모드로 변환한다.
    pub fn from_verbosity(verbose: u8) -> Self {
        match verbose {
            0 => CollapsableMode::Disabled,
            1 => CollapsableMode::Steps,
            _ => CollapsableMode::Vars,
        }
    }
}

impl<'de> Deserialize<'de> for CollapsableMode {
    /// 문자열 또는 레거시 정수 형태의 설정을 모두 지원하도록 역직렬화한다.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Level(u8),
            Name(String),
        }

        match Helper::deserialize(deserializer)? {
            Helper::Level(level) => Ok(CollapsableMode::from_verbosity(level)),
            Helper::Name(value) => match value.to_ascii_lowercase().as_str() {
                "none" | "off" | "disabled" => Ok(CollapsableMode::Disabled),
                "steps" => Ok(CollapsableMode::Steps),
                "vars" => Ok(CollapsableMode::Vars),
                other => Err(de::Error::custom(format!(
                    "알 수 없는 gitlab_collapsable 값: {other}"
                ))),
            },
        }
    }
}

/// 설정 파일 또는 CLI에서 읽은 정규화 전 설정이다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawReporterConfig {
    /// 레거시 verbosity 레벨.
    pub verbose: Option<u8>,
    /// 명시적 섹션 모드. verbose보다 우선한다.
    pub gitlab_collapsable: Option<CollapsableMode>,
    /// 통과한 Scenario에 소요 시간을 표시한다.
    pub show_timings: Option<bool>,
    /// 색상 정책.
    pub color: Option<ColorMode>,
}

impl RawReporterConfig {
    /// 값이 지정된 필드만 `other`로 덮어쓴다.
    pub fn merge(self, other: RawReporterConfig) -> Self {
        Self {
            verbose: other.verbose.or(self.verbose),
            gitlab_collapsable: other.gitlab_collapsable.or(self.gitlab_collapsable),
            show_timings: other.show_timings.or(self.show_timings),
            color: other.color.or(self.color),
        }
    }

    /// 모드를 하나로 정규화한 최종 설정을 만든다.
    pub fn normalize(&self) -> ReporterConfig {
        let collapsable = self
            .gitlab_collapsable
            .unwrap_or_else(|| CollapsableMode::from_verbosity(self.verbose.unwrap_or(0)));
        ReporterConfig {
            collapsable,
            show_timings: self.show_timings.unwrap_or(false),
            color: self.color.unwrap_or_default(),
        }
    }
}

/// 리포터가 실제로 참조하는 정규화된 설정이다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReporterConfig {
    pub collapsable: CollapsableMode,
    pub show_timings: bool,
    pub color: ColorMode,
}

impl ReporterConfig {
    /// 지정한 모드만 바꾼 기본 설정을 만든다.
    pub fn with_mode(collapsable: CollapsableMode) -> Self {
        Self {
            collapsable,
            ..Self::default()
        }
    }
}

/// YAML 파일을 읽어 정규화 전 설정으로 역직렬화한다.
pub fn load_config_from_file(path: &Path) -> Result<RawReporterConfig, ReporterError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReporterError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// YAML 문자열을 설정으로 파싱한다. 빈 문서는 기본값으로 처리한다.
pub fn load_config_from_str(content: &str) -> Result<RawReporterConfig, ReporterError> {
    if content.trim().is_empty() {
        return Ok(RawReporterConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn legacy_verbosity_maps_to_modes() {
        let cases = [
            (0, CollapsableMode::Disabled),
            (1, CollapsableMode::Steps),
            (2, CollapsableMode::Vars),
            (5, CollapsableMode::Vars),
        ];
        for (verbose, expected) in cases {
            let raw = RawReporterConfig {
                verbose: Some(verbose),
                ..RawReporterConfig::default()
            };
            assert_eq!(raw.normalize().collapsable, expected, "verbose={verbose}");
        }
    }

    #[test]
    fn explicit_mode_takes_precedence_over_verbosity() {
        let raw = RawReporterConfig {
            verbose: Some(2),
            gitlab_collapsable: Some(CollapsableMode::Steps),
            ..RawReporterConfig::default()
        };
        assert_eq!(raw.normalize().collapsable, CollapsableMode::Steps);
    }

    #[test]
    fn missing_values_normalize_to_disabled() {
        let config = RawReporterConfig::default().normalize();
        assert_eq!(config, ReporterConfig::default());
        assert_eq!(config.collapsable, CollapsableMode::Disabled);
    }

    #[test]
    fn yaml_accepts_names_and_legacy_integers() {
        let named = load_config_from_str("gitlab_collapsable: vars\nshow_timings: true\n")
            .expect("설정 파싱 실패");
        assert_eq!(named.gitlab_collapsable, Some(CollapsableMode::Vars));
        assert_eq!(named.show_timings, Some(true));

        let legacy = load_config_from_str("gitlab_collapsable: 1\n").expect("설정 파싱 실패");
        assert_eq!(legacy.gitlab_collapsable, Some(CollapsableMode::Steps));

        let off = load_config_from_str("gitlab_collapsable: none\n").expect("설정 파싱 실패");
        assert_eq!(off.gitlab_collapsable, Some(CollapsableMode::Disabled));
    }

    #[test]
    fn yaml_rejects_unknown_mode() {
        let err = load_config_from_str("gitlab_collapsable: everything\n")
            .expect_err("알 수 없는 모드가 허용되었습니다.");
        assert!(matches!(err, ReporterError::ConfigParse(_)));
    }

    #[test]
    fn merge_prefers_overriding_fields() {
        let file = RawReporterConfig {
            verbose: Some(2),
            show_timings: Some(true),
            ..RawReporterConfig::default()
        };
        let cli = RawReporterConfig {
            gitlab_collapsable: Some(CollapsableMode::Disabled),
            ..RawReporterConfig::default()
        };
        let merged = file.merge(cli).normalize();
        assert_eq!(merged.collapsable, CollapsableMode::Disabled);
        assert!(merged.show_timings);
    }

    #[test]
    fn config_file_is_loaded_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("임시 파일 생성 실패");
        writeln!(file, "verbose: 1\ncolor: never").expect("파일 작성 실패");
        let raw = load_config_from_file(file.path()).expect("설정 로딩 실패");
        let config = raw.normalize();
        assert_eq!(config.collapsable, CollapsableMode::Steps);
        assert_eq!(config.color, ColorMode::Never);
    }

    #[test]
    fn missing_config_file_reports_path() {
        let err = load_config_from_file(Path::new("/nonexistent/reporter.yaml"))
            .expect_err("없는 파일이 로딩되었습니다.");
        assert!(matches!(err, ReporterError::ConfigRead { .. }));
    }
}
