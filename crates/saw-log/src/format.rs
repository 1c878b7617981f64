//! 事件格式化：`[HH:MM:SS] [CORE] [INFO] [SAW]: message`。
//!
//! 控制台输出包含通道标签并按级别着色；文件输出省略通道标签且不着色。
//! 时间戳为 UTC 时分秒，不做本地时区换算。

use std::{
    fmt::{self, Write as _},
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    fmt::{FmtContext, FormatEvent, FormatFields, format::Writer},
    registry::LookupSpan,
};

use crate::level::{LogLevel, LoggerKind};

const RESET: &str = "\x1b[0m";
const FATAL_FIELD: &str = "fatal";

/// 引擎日志格式。
#[derive(Clone, Copy, Debug)]
pub struct SawFormat {
    ansi: bool,
    with_kind: bool,
}

impl SawFormat {
    /// 控制台格式：带通道标签，可选着色。
    pub const fn console(ansi: bool) -> Self {
        Self {
            ansi,
            with_kind: true,
        }
    }

    /// 文件格式：无通道标签、无着色。
    pub const fn file() -> Self {
        Self {
            ansi: false,
            with_kind: false,
        }
    }
}

impl<S, N> FormatEvent<S, N> for SawFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut fields = MessageVisitor::default();
        event.record(&mut fields);

        let level = LogLevel::from_tracing(metadata.level(), fields.fatal);
        let target = metadata.target();

        if self.ansi {
            writer.write_str(level.ansi_color())?;
        }
        write!(writer, "[{}] ", ClockTime::now())?;
        if self.with_kind {
            write!(writer, "[{}] ", LoggerKind::from_target(target).label())?;
        }
        write!(writer, "[{}] [{}]: {}", level.name(), target, fields.message)?;
        if !fields.rest.is_empty() {
            write!(writer, " {}", fields.rest)?;
        }
        if self.ansi {
            writer.write_str(RESET)?;
        }
        writeln!(writer)
    }
}

/// 收集 `message` 与其余字段，并摘出 `fatal` 标记。
#[derive(Default)]
struct MessageVisitor {
    message: String,
    rest: String,
    fatal: bool,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.rest.is_empty() {
            self.rest.push(' ');
        }
        let _ = write!(self.rest, "{name}={value}");
    }
}

impl Visit for MessageVisitor {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == FATAL_FIELD {
            self.fatal = value;
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }
}

/// UTC 时分秒。
struct ClockTime {
    seconds_of_day: u64,
}

impl ClockTime {
    fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self::from_unix_secs(since_epoch)
    }

    const fn from_unix_secs(secs: u64) -> Self {
        Self {
            seconds_of_day: secs % 86_400,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.seconds_of_day;
        write!(f, "{:02}:{:02}:{:02}", s / 3_600, (s / 60) % 60, s % 60)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// 把格式化结果写入共享内存，供断言读取。
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().expect("mutex poisoned").clone()).expect("utf-8")
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("mutex poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_with(format: SawFormat, emit: impl FnOnce()) -> String {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(tracing::Level::TRACE)
            .event_format(format)
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        capture.contents()
    }

    #[test]
    fn console_line_carries_kind_level_and_target() {
        let out = capture_with(SawFormat::console(false), || {
            tracing::info!(target: "SAW", "engine started");
        });
        assert!(out.ends_with("[CORE] [INFO] [SAW]: engine started\n"), "{out}");
        assert!(out.starts_with('['));
    }

    #[test]
    fn fatal_flag_is_rendered_as_level_not_field() {
        let out = capture_with(SawFormat::file(), || {
            tracing::error!(target: "APP", fatal = true, code = 3, "solver diverged");
        });
        assert!(out.contains("[FATAL] [APP]: solver diverged code=3"), "{out}");
        assert!(!out.contains("fatal=true"));
        assert!(!out.contains("[CLIENT]"));
    }

    #[test]
    fn ansi_output_is_colored_and_reset() {
        let out = capture_with(SawFormat::console(true), || {
            tracing::warn!(target: "APP", "slow frame");
        });
        assert!(out.starts_with(LogLevel::Warn.ansi_color()));
        assert!(out.trim_end().ends_with(RESET));
    }

    #[test]
    fn clock_time_formats_two_digit_fields() {
        let clock = ClockTime {
            seconds_of_day: 3_600 * 9 + 60 * 5 + 7,
        };
        assert_eq!(clock.to_string(), "09:05:07");
    }

    #[test]
    fn clock_time_is_utc_time_of_day() {
        // 2024-01-01T13:45:30Z
        assert_eq!(ClockTime::from_unix_secs(1_704_116_730).to_string(), "13:45:30");
        assert_eq!(ClockTime::from_unix_secs(86_400 * 3).to_string(), "00:00:00");
    }
}
