use crate::scenario::{ExcInfo, Scope};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// scope 항목을 삽입 순서대로 `(키, 표시 문자열)` 쌍으로 변환한다.
pub fn format_scope(scope: &Scope) -> Vec<(&str, String)> {
    scope
        .iter()
        .map(|(key, value)| (key.as_str(), format_value(value)))
        .collect()
}

/// 값을 4칸 들여쓰기의 JSON 문자열로 변환한다.
pub fn format_value(value: &serde_json::Value) -> String {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => value.to_string(),
    }
}

/// 예외 정보를 트레이스백 블록 문자열로 변환한다.
pub fn format_exception(exc_info: &ExcInfo) -> String {
    let mut lines = Vec::with_capacity(exc_info.traceback.len() * 2 + 2);
    if !exc_info.traceback.is_empty() {
        lines.push("Traceback (most recent call last):".to_string());
        for frame in &exc_info.traceback {
            lines.push(format!(
                "  File \"{}\", line {}, in {}",
                frame.file, frame.line, frame.function
            ));
            if let Some(source) = frame.source.as_deref().map(str::trim) {
                if !source.is_empty() {
                    lines.push(format!("    {source}"));
                }
            }
        }
    }
    if exc_info.message.is_empty() {
        lines.push(exc_info.type_name.clone());
    } else {
        lines.push(format!("{}: {}", exc_info.type_name, exc_info.message));
    }
    lines.join("\n")
}
