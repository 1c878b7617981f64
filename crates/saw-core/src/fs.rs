//! 文件协作方：把磁盘内容整体读入 [`Buffer`]，或将缓冲写回磁盘。
//!
//! # 契约说明（What）
//! - 路径不指向普通文件、或文件长度为 0 时返回空缓冲，这两种情况都不是错误；
//! - 已定位到文件后的读写失败以 [`SawError::Io`] 返回，并附带路径；
//! - 不支持部分读取或流式读取。

use std::{fs, io::Read, path::Path};

use tracing::{debug, warn};

use crate::{
    buffer::Buffer,
    error::{Result, SawError},
};

/// 与核心日志通道一致的 target，日志协作方据此归入 `CORE`。
const LOG_TARGET: &str = "SAW";

/// 以二进制模式读取整个文件。
pub fn read_file_binary(path: impl AsRef<Path>) -> Result<Buffer> {
    let path = path.as_ref();
    let metadata = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => {
            warn!(
                target: LOG_TARGET,
                path = %path.display(),
                "not a regular file, returning empty buffer"
            );
            return Ok(Buffer::new());
        }
    };

    let expected = usize::try_from(metadata.len()).map_err(|_| SawError::InvalidSize {
        requested: usize::MAX,
    })?;
    if expected == 0 {
        debug!(target: LOG_TARGET, path = %path.display(), "file is empty");
        return Ok(Buffer::new());
    }

    let mut file = fs::File::open(path).map_err(|err| SawError::io(path, err))?;
    let mut contents = Vec::new();
    contents
        .try_reserve_exact(expected)
        .map_err(|_| SawError::InvalidSize { requested: expected })?;
    file.read_to_end(&mut contents)
        .map_err(|err| SawError::io(path, err))?;

    debug!(
        target: LOG_TARGET,
        path = %path.display(),
        size = contents.len(),
        "file loaded"
    );
    Ok(Buffer::from(contents))
}

/// 将缓冲内容写入文件，必要时创建父目录；空缓冲写出空文件。
pub fn write_file_binary(path: impl AsRef<Path>, buffer: &Buffer) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| SawError::io(parent, err))?;
    }
    fs::write(path, buffer.as_slice()).map_err(|err| SawError::io(path, err))?;
    debug!(
        target: LOG_TARGET,
        path = %path.display(),
        size = buffer.size(),
        "file written"
    );
    Ok(())
}
