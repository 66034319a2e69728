use serde::{Deserialize, Serialize};
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, MutexGuard};

const ANSI_RESET: &str = "\x1b[0m";

/// 리포터 출력에 사용하는 텍스트 스타일이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Red,
    Green,
    Yellow,
    Blue,
}

impl Style {
    /// 스타일에 대응하는 ANSI SGR 시퀀스를 반환한다.
    fn sgr(self) -> &'static str {
        match self {
            Style::Bold => "\x1b[1m",
            Style::Red => "\x1b[31m",
            Style::Green => "\x1b[32m",
            Style::Yellow => "\x1b[33m",
            Style::Blue => "\x1b[34m",
        }
    }
}

/// 색상 출력 여부를 결정하는 정책이다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// TTY이거나 GitLab CI 환경이면 색상을 사용한다.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// 현재 환경에서 실제로 색상을 출력할지 판단한다.
    fn resolve(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                if std::env::var_os("NO_COLOR").is_some() {
                    return false;
                }
                is_tty || std::env::var_os("GITLAB_CI").is_some()
            }
        }
    }
}

/// 스타일이 적용된 줄과 제어 시퀀스를 출력 스트림에 기록한다.
pub struct Console {
    writer: Mutex<Box<dyn Write + Send>>,
    colored: bool,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("colored", &self.colored)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// stdout에 기록하는 콘솔을 생성한다.
    pub fn stdout(color_mode: ColorMode) -> Self {
        let is_tty = io::stdout().is_terminal();
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
            colored: color_mode.resolve(is_tty),
        }
    }

    /// 임의의 Writer에 기록하는 콘솔을 생성한다. Auto 모드는 TTY가 아닌 것으로 간주한다.
    pub fn with_writer<W: Write + Send + 'static>(writer: W, color_mode: ColorMode) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            colored: color_mode.resolve(false),
        }
    }

    /// 색상 출력 여부를 반환한다.
    pub fn is_colored(&self) -> bool {
        self.colored
    }

    /// 한 줄을 스타일과 함께 출력한다.
    pub fn out(&self, text: &str, style: Option<Style>) -> io::Result<()> {
        let line = match style {
            Some(style) if self.colored => format!("{}{text}{ANSI_RESET}\n", style.sgr()),
            _ => format!("{text}\n"),
        };
        self.write_raw(&line)
    }

    /// 가공 없이 그대로 기록한다. 제어 시퀀스 출력에 사용한다.
    pub fn write_raw(&self, text: &str) -> io::Result<()> {
        let mut guard = self.lock();
        guard.write_all(text.as_bytes())?;
        guard.flush()
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// 출력 내용을 메모리에 모으는 Writer이다. 복제본은 같은 버퍼를 공유한다.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 기록된 내용을 문자열로 반환한다.
    pub fn contents(&self) -> String {
        let guard = self.buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&guard).into_owned()
    }

    /// 버퍼를 비운다.
    pub fn clear(&self) {
        self.buf
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
