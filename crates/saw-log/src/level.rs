use core::{fmt, str::FromStr};

use serde::Deserialize;
use tracing::Level;

use crate::LogError;

/// 日志严重级别。
///
/// # 契约说明（What）
/// - 六个级别自低到高：`Trace < Debug < Info < Warn < Error < Fatal`；
/// - `tracing` 没有独立的致命级别，`Fatal` 以 [`Level::ERROR`] 发出并附带 `fatal = true` 字段，
///   格式化时据此还原为 `FATAL`。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// 对应的 `tracing` 级别。
    pub const fn tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error | LogLevel::Fatal => Level::ERROR,
        }
    }

    /// 由 `tracing` 级别与 `fatal` 标记还原。
    pub fn from_tracing(level: &Level, fatal: bool) -> Self {
        LogLevel::ALL
            .into_iter()
            .take_while(|candidate| *candidate != LogLevel::Error)
            .find(|candidate| candidate.tracing_level() == *level)
            .unwrap_or(if fatal {
                LogLevel::Fatal
            } else {
                LogLevel::Error
            })
    }

    /// 作为 `EnvFilter` 指令时使用的级别名。
    pub(crate) const fn filter_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Fatal => "error",
        }
    }

    /// 控制台着色使用的 ANSI 前景色序列。
    pub const fn ansi_color(self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[97m",
            LogLevel::Debug => "\x1b[94m",
            LogLevel::Info => "\x1b[92m",
            LogLevel::Warn => "\x1b[93m",
            LogLevel::Error => "\x1b[91m",
            LogLevel::Fatal => "\x1b[31m",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .or_else(|| s.trim().eq_ignore_ascii_case("warning").then_some(LogLevel::Warn))
            .ok_or_else(|| LogError::UnknownLevel(s.to_owned()))
    }
}

impl TryFrom<String> for LogLevel {
    type Error = LogError;

    // `Self::Error` 会与枚举变体 `LogLevel::Error` 产生歧义，这里写出具体类型。
    fn try_from(value: String) -> Result<Self, LogError> {
        value.parse()
    }
}

/// 日志通道：引擎内部（`SAW`）与客户端应用（`APP`）。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoggerKind {
    Core,
    Client,
}

impl LoggerKind {
    /// `tracing` 事件的 target，同时作为记录器名称输出。
    pub const fn target(self) -> &'static str {
        match self {
            LoggerKind::Core => crate::CORE_TARGET,
            LoggerKind::Client => crate::CLIENT_TARGET,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LoggerKind::Core => "CORE",
            LoggerKind::Client => "CLIENT",
        }
    }

    /// 只有 `SAW` target 归入核心通道，其余一律视为客户端。
    pub fn from_target(target: &str) -> Self {
        if target == crate::CORE_TARGET {
            LoggerKind::Core
        } else {
            LoggerKind::Client
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("warn".parse::<LogLevel>().expect("warn"), LogLevel::Warn);
        assert_eq!("Warning".parse::<LogLevel>().expect("warning"), LogLevel::Warn);
        assert_eq!(" FATAL ".parse::<LogLevel>().expect("fatal"), LogLevel::Fatal);
        assert!(matches!(
            "verbose".parse::<LogLevel>(),
            Err(LogError::UnknownLevel(_))
        ));
    }

    #[test]
    fn try_from_owned_string_parses_level() {
        assert_eq!(
            LogLevel::try_from("error".to_owned()).expect("error"),
            LogLevel::Error
        );
        assert!(matches!(
            LogLevel::try_from(String::from("loud")),
            Err(LogError::UnknownLevel(name)) if name == "loud"
        ));
    }

    #[test]
    fn fatal_round_trips_through_tracing_level() {
        for level in LogLevel::ALL {
            let restored = LogLevel::from_tracing(&level.tracing_level(), level == LogLevel::Fatal);
            assert_eq!(restored, level);
        }
    }

    #[test]
    fn only_saw_target_is_core() {
        assert_eq!(LoggerKind::from_target("SAW"), LoggerKind::Core);
        assert_eq!(LoggerKind::from_target("APP"), LoggerKind::Client);
        assert_eq!(LoggerKind::from_target("saw_core::fs"), LoggerKind::Client);
    }
}
