use std::{fs, path::{Path, PathBuf}};

use serde::Deserialize;

use crate::{LogError, level::LogLevel};

/// 默认日志文件位置（相对工作目录）。
pub const DEFAULT_LOG_FILE: &str = "logs/Log.log";

/// 日志安装配置。
///
/// # 契约定义（What）
/// - `level`：最低输出级别，默认 `trace`；
/// - `filter`：可选的 `EnvFilter` 指令（如 `"SAW=debug,APP=info"`），存在时覆盖 `level`；
/// - `console` / `ansi`：是否输出到标准输出及是否着色；
/// - `file`：纯文本日志文件路径，`None` 表示不落盘；父目录在安装时创建。
///
/// TOML 中缺省的键取默认值，未知键视为配置错误。
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    pub level: LogLevel,
    pub filter: Option<String>,
    pub console: bool,
    pub ansi: bool,
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Trace,
            filter: None,
            console: true,
            ansi: true,
            file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

impl LogSettings {
    pub fn from_toml_str(source: &str) -> Result<Self, LogError> {
        toml::from_str(source).map_err(LogError::Parse)
    }

    /// 从 TOML 文件加载。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// 生效的过滤指令。
    pub(crate) fn directive(&self) -> &str {
        self.filter
            .as_deref()
            .unwrap_or_else(|| self.level.filter_directive())
    }
}
