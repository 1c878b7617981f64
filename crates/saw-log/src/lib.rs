//! # saw-log
//!
//! ## 定位与职责（Why）
//! - 引擎的日志协作方：以纯文本消息消费 `TRACE/DEBUG/INFO/WARN/ERROR/FATAL` 六个级别；
//! - 区分核心通道（target `SAW`）与客户端通道（target `APP`），分别对应 `saw_core_*!` 与 `saw_*!` 宏族。
//!
//! ## 架构嵌入（How）
//! - 事件经 `tracing` 发出，[`install`] 使用 `tracing-subscriber` 组装 `EnvFilter + 控制台层 + 可选文件层`
//!   并设置为全局 Subscriber；
//! - 配置来自 [`LogSettings`]，可从 TOML 加载；
//! - 未调用 [`install`] 时宏依旧可用，事件交给调用方自行安装的 Subscriber（例如测试框架）。

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

use thiserror::Error;
use tracing::dispatcher;
use tracing_subscriber::{EnvFilter, filter::ParseError, layer::SubscriberExt};

pub mod format;
pub mod level;
pub mod settings;

pub use format::SawFormat;
pub use level::{LogLevel, LoggerKind};
pub use settings::LogSettings;

/// 核心通道的 target 与记录器名称。
pub const CORE_TARGET: &str = "SAW";
/// 客户端通道的 target 与记录器名称。
pub const CLIENT_TARGET: &str = "APP";

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}

/// 安装状态的全局缓存，确保 `install` 仅生效一次。
static INSTALL_STATE: OnceLock<InstallState> = OnceLock::new();

/// 日志配置与安装过程可能出现的错误。
#[derive(Debug, Error)]
pub enum LogError {
    /// 无法识别的级别名。
    #[error("unknown log level `{0}`")]
    UnknownLevel(String),
    /// 配置文档不是合法的 TOML 或字段不匹配。
    #[error("invalid log settings: {0}")]
    Parse(#[source] toml::de::Error),
    /// 过滤指令无法解析。
    #[error("invalid log filter directive: {0}")]
    InvalidFilter(#[source] ParseError),
    /// 读取配置或打开日志文件失败。
    #[error("i/o failure on `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// `install` 被重复调用。
    #[error("saw-log is already installed")]
    AlreadyInstalled,
    /// 外部已经设置了全局 Subscriber。
    #[error("a global tracing subscriber is already set")]
    SubscriberAlreadySet,
    /// 设置全局 Subscriber 失败的底层错误。
    #[error("failed to set global subscriber: {0}")]
    SetGlobalSubscriber(#[source] tracing::subscriber::SetGlobalDefaultError),
}

/// 安装后的持久状态。
#[derive(Debug)]
struct InstallState {
    settings: LogSettings,
}

/// 返回当前已安装的配置；尚未安装时为 `None`。
pub fn installed_settings() -> Option<&'static LogSettings> {
    INSTALL_STATE.get().map(|state| &state.settings)
}

/// 安装全局日志 Subscriber。
///
/// # 教案式说明
/// - **意图（Why）**：进程启动时一次性建立控制台与文件两路输出，此后各处只需使用宏；
/// - **逻辑（How）**：
///   1. 检查重复安装与外部已设置的 Subscriber；
///   2. 解析过滤指令，构造控制台层与（可选的）文件层，文件父目录不存在时创建；
///   3. 组合为 `Registry` 并设置为全局默认，写入 `INSTALL_STATE`；
/// - **契约（What）**：重复调用返回 [`LogError::AlreadyInstalled`]；外部已设置 Subscriber 时返回
///   [`LogError::SubscriberAlreadySet`]；成功后立即生效。
pub fn install(settings: &LogSettings) -> Result<(), LogError> {
    if INSTALL_STATE.get().is_some() {
        return Err(LogError::AlreadyInstalled);
    }
    if dispatcher::has_been_set() {
        return Err(LogError::SubscriberAlreadySet);
    }

    let filter = EnvFilter::try_new(settings.directive()).map_err(LogError::InvalidFilter)?;

    let console = settings.console.then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(SawFormat::console(settings.ansi))
            .with_writer(io::stdout)
    });

    let file = settings
        .file
        .as_ref()
        .map(|path| open_log_file(path))
        .transpose()?
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .event_format(SawFormat::file())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file);
    tracing::subscriber::set_global_default(subscriber).map_err(LogError::SetGlobalSubscriber)?;

    INSTALL_STATE
        .set(InstallState {
            settings: settings.clone(),
        })
        .map_err(|_| LogError::AlreadyInstalled)
}

fn open_log_file(path: &Path) -> Result<fs::File, LogError> {
    let io_err = |source| LogError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)
}

/// 以运行期给定的通道与级别发出一条纯文本消息。
///
/// `tracing` 的级别与 target 须为编译期常量，因此这里对十二种组合逐一分派。
pub fn emit(kind: LoggerKind, level: LogLevel, message: &str) {
    macro_rules! dispatch {
        ($target:expr) => {
            match level {
                LogLevel::Trace => tracing::trace!(target: $target, "{message}"),
                LogLevel::Debug => tracing::debug!(target: $target, "{message}"),
                LogLevel::Info => tracing::info!(target: $target, "{message}"),
                LogLevel::Warn => tracing::warn!(target: $target, "{message}"),
                LogLevel::Error => tracing::error!(target: $target, "{message}"),
                LogLevel::Fatal => tracing::error!(target: $target, fatal = true, "{message}"),
            }
        };
    }

    match kind {
        LoggerKind::Core => dispatch!(CORE_TARGET),
        LoggerKind::Client => dispatch!(CLIENT_TARGET),
    }
}

#[macro_export]
macro_rules! saw_core_trace {
    ($($arg:tt)+) => { $crate::__private::tracing::trace!(target: $crate::CORE_TARGET, $($arg)+) };
}

#[macro_export]
macro_rules! saw_core_debug {
    ($($arg:tt)+) => { $crate::__private::tracing::debug!(target: $crate::CORE_TARGET, $($arg)+) };
}

#[macro_export]
macro_rules! saw_core_info {
    ($($arg:tt)+) => { $crate::__private::tracing::info!(target: $crate::CORE_TARGET, $($arg)+) };
}

#[macro_export]
macro_rules! saw_core_warn {
    ($($arg:tt)+) => { $crate::__private::tracing::warn!(target: $crate::CORE_TARGET, $($arg)+) };
}

#[macro_export]
macro_rules! saw_core_error {
    ($($arg:tt)+) => { $crate::__private::tracing::error!(target: $crate::CORE_TARGET, $($arg)+) };
}

#[macro_export]
macro_rules! saw_core_fatal {
    ($($arg:tt)+) => {
        $crate::__private::tracing::error!(target: $crate::CORE_TARGET, fatal = true, $($arg)+)
    };
}

#[macro_export]
macro_rules! saw_trace {
    ($($arg:tt)+) => { $crate::__private::tracing::trace!(target: $crate::CLIENT_TARGET, $($arg)+) };
}

#[macro_export]
macro_rules! saw_debug {
    ($($arg:tt)+) => { $crate::__private::tracing::debug!(target: $crate::CLIENT_TARGET, $($arg)+) };
}

#[macro_export]
macro_rules! saw_info {
    ($($arg:tt)+) => { $crate::__private::tracing::info!(target: $crate::CLIENT_TARGET, $($arg)+) };
}

#[macro_export]
macro_rules! saw_warn {
    ($($arg:tt)+) => { $crate::__private::tracing::warn!(target: $crate::CLIENT_TARGET, $($arg)+) };
}

#[macro_export]
macro_rules! saw_error {
    ($($arg:tt)+) => { $crate::__private::tracing::error!(target: $crate::CLIENT_TARGET, $($arg)+) };
}

#[macro_export]
macro_rules! saw_fatal {
    ($($arg:tt)+) => {
        $crate::__private::tracing::error!(target: $crate::CLIENT_TARGET, fatal = true, $($arg)+)
    };
}
