//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为缓冲、哈希、标识符等底层契约提供集中定义的错误域，调用方只需面对一个 [`SawError`]；
//! - 每个变体附带稳定错误码（`saw.<领域>.<语义>`），便于日志与测试按码断言而非解析文案。
//!
//! ## 设计要求（What）
//! - 所有错误均为本地构造/使用错误，立即以类型化失败返回调用方，子系统内部不重试、不记录、不吞掉；
//! - 不存在全局错误状态。

use std::{io, path::PathBuf};

use thiserror::Error;

/// `saw-core` 统一的结果别名。
pub type Result<T, E = SawError> = core::result::Result<T, E>;

/// 稳定错误码集合。
///
/// - 码值一经发布不得修改，测试与外部告警均以此为准；
/// - 新增变体时同步追加常量。
pub mod codes {
    pub const BUFFER_INVALID_SIZE: &str = "saw.buffer.invalid_size";
    pub const BUFFER_INVALID_ELEMENT_SIZE: &str = "saw.buffer.invalid_element_size";
    pub const IDENTIFIER_INVALID_SOURCE: &str = "saw.identifier.invalid_source";
    pub const UUID_INVALID_WIDTH: &str = "saw.uuid.invalid_width";
    pub const BUILD_UNDEFINED_CONFIG: &str = "saw.build.undefined_config";
    pub const FS_IO: &str = "saw.fs.io";
}

/// 底层子系统的错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：把“尺寸非法”“记录尺寸为零”“标识符来源不受支持”等使用错误显式化，
///   禁止静默截断或回退为默认值；
/// - **契约 (What)**：
///   - 所有变体实现 `Send + Sync + 'static`，可跨线程传播；
///   - 通过 [`SawError::code`] 获取稳定错误码；
/// - **设计权衡 (Trade-offs)**：`Io` 变体保留底层 [`io::Error`] 作为 `source`，因此整体不实现 `Clone`/`PartialEq`，
///   测试侧请使用 `matches!` 或比对错误码。
#[derive(Debug, Error)]
pub enum SawError {
    /// 分配请求无法表示或被分配器拒绝。
    ///
    /// - **契约 (What)**：`requested` 为调用方请求的字节数；尺寸类型为 `usize`，负数在类型层面已不可表示，
    ///   因此该错误只在超过 `isize::MAX` 或分配器拒绝时出现。
    #[error("buffer allocation of {requested} bytes is not representable")]
    InvalidSize { requested: usize },

    /// 请求将缓冲解释为零字节的记录序列。
    #[error("record element size must be greater than zero")]
    InvalidElementSize,

    /// 标识符构造输入不是文本标签或 32 位整数。
    #[error("unsupported identifier source: {detail}")]
    InvalidIdentifierSource { detail: String },

    /// UUID 位宽仅支持 32 与 64。
    #[error("uuid width must be 32 or 64 bits, got {bits}")]
    InvalidUuidWidth { bits: u32 },

    /// 环境中未声明任何构建配置（`SAW_DEBUG` / `SAW_RELEASE` / `SAW_DIST`）。
    #[error("undefined build configuration")]
    UndefinedBuildConfig,

    /// 文件协作方在定位到文件后读写失败。
    #[error("i/o failure on `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SawError {
    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            SawError::InvalidSize { .. } => codes::BUFFER_INVALID_SIZE,
            SawError::InvalidElementSize => codes::BUFFER_INVALID_ELEMENT_SIZE,
            SawError::InvalidIdentifierSource { .. } => codes::IDENTIFIER_INVALID_SOURCE,
            SawError::InvalidUuidWidth { .. } => codes::UUID_INVALID_WIDTH,
            SawError::UndefinedBuildConfig => codes::BUILD_UNDEFINED_CONFIG,
            SawError::Io { .. } => codes::FS_IO,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SawError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_namespace_convention() {
        let errors = [
            SawError::InvalidSize { requested: 1 },
            SawError::InvalidElementSize,
            SawError::InvalidIdentifierSource {
                detail: "float".to_owned(),
            },
            SawError::InvalidUuidWidth { bits: 16 },
            SawError::UndefinedBuildConfig,
            SawError::io("x", io::Error::other("boom")),
        ];
        for err in &errors {
            assert!(err.code().starts_with("saw."), "错误码需带 saw 前缀: {}", err.code());
        }
    }

    #[test]
    fn io_error_exposes_source() {
        use std::error::Error as _;
        let err = SawError::io("data/a.bin", io::Error::other("denied"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("data/a.bin"));
    }
}
