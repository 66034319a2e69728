//! GitLab CI 로그 접기 섹션 제어 시퀀스.
//!
//! 섹션 식별자는 시작과 종료 줄을 짝짓는 용도로만 쓰이며, 화면에 보이는
//! 라벨과는 별개이다.

use uuid::Uuid;

/// 섹션 식별자를 발급한다.
pub trait SectionIdSource: Send {
    fn next_id(&mut self) -> String;
}

/// 섹션마다 새 UUID v4를 발급하는 기본 구현이다.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSectionIds;

impl SectionIdSource for UuidSectionIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> SectionIdSource for F
where
    F: FnMut() -> String + Send,
{
    fn next_id(&mut self) -> String {
        self()
    }
}

/// 섹션 시작 시퀀스를 만든다. 줄바꿈은 붙이지 않는다.
pub fn section_start(id: &str, started_at: i64, collapsed: bool) -> String {
    format!("\x1b[0Ksection_start:{started_at}:{id}[collapsed={collapsed}]\r\x1b[0K")
}

/// 섹션 종료 시퀀스를 만든다. 출력 시 줄바꿈을 붙인다.
pub fn section_end(id: &str, ended_at: i64) -> String {
    format!("\x1b[0Ksection_end:{ended_at}:{id}\r\x1b[0K")
}

/// 선택적 타임스탬프를 정수 초로 절사한다. 값이 없으면 0이다.
pub fn epoch_seconds(timestamp: Option<f64>) -> i64 {
    match timestamp {
        Some(value) if value.is_finite() => value.trunc() as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_sequence_matches_gitlab_protocol() {
        assert_eq!(
            section_start("abc", 1, true),
            "\x1b[0Ksection_start:1:abc[collapsed=true]\r\x1b[0K"
        );
        assert_eq!(
            section_start("abc", 7, false),
            "\x1b[0Ksection_start:7:abc[collapsed=false]\r\x1b[0K"
        );
    }

    #[test]
    fn end_sequence_matches_gitlab_protocol() {
        assert_eq!(section_end("abc", 3), "\x1b[0Ksection_end:3:abc\r\x1b[0K");
    }

    #[test]
    fn timestamps_truncate_and_default_to_zero() {
        assert_eq!(epoch_seconds(Some(1.9)), 1);
        assert_eq!(epoch_seconds(Some(1_700_000_000.25)), 1_700_000_000);
        assert_eq!(epoch_seconds(None), 0);
        assert_eq!(epoch_seconds(Some(f64::NAN)), 0);
    }

    #[test]
    fn uuid_ids_are_unique_per_section() {
        let mut ids = UuidSectionIds;
        let first = ids.next_id();
        let second = ids.next_id();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn closures_act_as_id_sources() {
        let mut counter = 0;
        let mut source = move || {
            counter += 1;
            format!("section-{counter}")
        };
        assert_eq!(SectionIdSource::next_id(&mut source), "section-1");
        assert_eq!(SectionIdSource::next_id(&mut source), "section-2");
    }
}
