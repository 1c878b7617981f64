//! 版本与构建配置信息。
//!
//! 构建配置来自环境变量 `SAW_DEBUG` / `SAW_RELEASE` / `SAW_DIST`，按此顺序取第一个存在者；
//! 三者皆无时返回 [`SawError::UndefinedBuildConfig`]，不做隐式默认。

use std::{ffi::OsStr, fmt};

use crate::error::{Result, SawError};

/// 引擎版本号。
pub const SAW_VERSION: &str = "2025.0.1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildConfig {
    Debug,
    Release,
    Dist,
}

impl BuildConfig {
    const ENV_KEYS: [(&'static str, BuildConfig); 3] = [
        ("SAW_DEBUG", BuildConfig::Debug),
        ("SAW_RELEASE", BuildConfig::Release),
        ("SAW_DIST", BuildConfig::Dist),
    ];

    pub const fn name(self) -> &'static str {
        match self {
            BuildConfig::Debug => "Debug",
            BuildConfig::Release => "Release",
            BuildConfig::Dist => "Dist",
        }
    }
}

/// 目标平台名称。
pub fn platform_name() -> &'static str {
    match std::env::consts::OS {
        "windows" => "Windows x64",
        "linux" => "Linux",
        _ => "Unknown",
    }
}

/// 汇总后的构建信息。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub platform: &'static str,
    pub config: BuildConfig,
}

impl BuildInfo {
    /// 从进程环境解析。
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| is_declared(std::env::var_os(key).as_deref()))
    }

    /// 以自定义查询解析，`is_set(key)` 返回该环境变量是否存在。
    pub fn resolve(is_set: impl Fn(&str) -> bool) -> Result<Self> {
        let config = BuildConfig::ENV_KEYS
            .iter()
            .find(|&&(key, _)| is_set(key))
            .map(|&(_, config)| config)
            .ok_or(SawError::UndefinedBuildConfig)?;
        Ok(Self {
            version: SAW_VERSION,
            platform: platform_name(),
            config,
        })
    }
}

/// 变量存在且非空才算声明，`SAW_DEBUG=` 视同未设置。
fn is_declared(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SAW {} ({} {})",
            self.version,
            self.platform,
            self.config.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_declared_config_wins() {
        let info = BuildInfo::resolve(|key| key == "SAW_RELEASE" || key == "SAW_DIST")
            .expect("已声明配置");
        assert_eq!(info.config, BuildConfig::Release);
    }

    #[test]
    fn empty_variable_does_not_declare_config() {
        assert!(!is_declared(None));
        assert!(!is_declared(Some(OsStr::new(""))));
        assert!(is_declared(Some(OsStr::new("1"))));

        let env = [("SAW_DEBUG", ""), ("SAW_RELEASE", ""), ("SAW_DIST", "1")];
        let info = BuildInfo::resolve(|key| {
            is_declared(
                env.iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| OsStr::new(*value)),
            )
        })
        .expect("发行配置");
        assert_eq!(info.config, BuildConfig::Dist);
    }

    #[test]
    fn missing_config_is_an_error() {
        assert!(matches!(
            BuildInfo::resolve(|_| false),
            Err(SawError::UndefinedBuildConfig)
        ));
    }

    #[test]
    fn long_version_string() {
        let info = BuildInfo::resolve(|key| key == "SAW_DEBUG").expect("调试配置");
        assert_eq!(
            info.to_string(),
            format!("SAW 2025.0.1 ({} Debug)", platform_name())
        );
    }
}
