use std::{mem::ManuallyDrop, slice::ChunksExact, sync::Arc};

use crate::{
    buffer::{Buffer, Record},
    error::Result,
};

/// `ReleaseHook` 描述作用域缓冲在释放存储时的通知入口。
///
/// # 设计初衷（Why）
/// - [`ScopedBuffer`] 在 `Drop` 阶段释放底层存储，调用方通常无从观察这一时刻；
/// - 通过可选的钩子，把“释放恰好发生一次”变成可断言、可统计的事件，例如记录驻留字节或在测试中计数。
///
/// # 契约定义（What）
/// - 每个 `ScopedBuffer` 至多调用一次 `released`，且仅在其确实持有存储时调用；
/// - **前置条件**：实现必须线程安全且不得 panic，否则 `Drop` 路径上的 panic 会在展开期间终止进程。
pub trait ReleaseHook: Send + Sync + 'static {
    fn released(&self, released: ReleasedBuffer);
}

/// 一次释放动作携带的上下文。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleasedBuffer {
    size: usize,
}

impl ReleasedBuffer {
    /// 被释放区域的字节数。
    pub fn size(&self) -> usize {
        self.size
    }
}

/// `ScopedBuffer` 独占一个 [`Buffer`]，并保证在离开作用域时释放它。
///
/// # 设计动机（Why）
/// - 无论作用域是正常返回、提前返回还是经 `?`/panic 展开离开，存储都必须被释放且只释放一次；
/// - 借助 `Drop` 而非显式 `release` 调用，调用端无需在每条退出路径上重复清理逻辑。
///
/// # 架构关系（How）
/// - `buffer`：被独占持有的缓冲，对外只暴露只读视图；
/// - `hook`：可选的 [`ReleaseHook`]，释放时收到 [`ReleasedBuffer`]；
/// - [`release`](Self::release) 允许提前释放，此后 `Drop` 不再重复动作；
///   [`into_inner`](Self::into_inner) 把所有权交还调用方，不触发释放。
///
/// # 契约说明（What）
/// - 所有权对本实例是排他的：包装后的 `Buffer` 无法再被其它句柄释放；
/// - 若底层缓冲本就为空（例如包装了空缓冲），离开作用域时不做任何动作，钩子也不会被调用。
pub struct ScopedBuffer {
    buffer: Buffer,
    hook: Option<Arc<dyn ReleaseHook>>,
}

impl ScopedBuffer {
    /// 接管已有缓冲的所有权。
    pub fn new(buffer: Buffer) -> Self {
        Self { buffer, hook: None }
    }

    /// 分配 `size` 字节的新缓冲并接管。
    pub fn with_size(size: usize) -> Result<Self> {
        Ok(Self::new(Buffer::with_size(size)?))
    }

    /// 挂载释放钩子。
    pub fn with_hook(mut self, hook: Arc<dyn ReleaseHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.buffer.data()
    }

    pub fn size(&self) -> usize {
        self.buffer.size()
    }

    pub fn is_present(&self) -> bool {
        self.buffer.is_present()
    }

    /// 委托给 [`Buffer::as_type`]。
    pub fn as_type<T: Record>(&self) -> Result<Vec<T>> {
        self.buffer.as_type()
    }

    /// 委托给 [`Buffer::records`]。
    pub fn records(&self, element_size: usize) -> Result<ChunksExact<'_, u8>> {
        self.buffer.records(element_size)
    }

    /// 立即释放持有的存储；之后的 `Drop` 不再重复释放或通知钩子。
    pub fn release(&mut self) {
        if !self.buffer.is_present() {
            return;
        }
        let size = self.buffer.size();
        self.buffer.release();
        if let Some(hook) = &self.hook {
            hook.released(ReleasedBuffer { size });
        }
    }

    /// 交还底层缓冲的所有权，不执行释放。
    pub fn into_inner(self) -> Buffer {
        let mut this = ManuallyDrop::new(self);
        drop(this.hook.take());
        core::mem::take(&mut this.buffer)
    }
}

impl AsRef<Buffer> for ScopedBuffer {
    fn as_ref(&self) -> &Buffer {
        &self.buffer
    }
}

impl From<Buffer> for ScopedBuffer {
    fn from(buffer: Buffer) -> Self {
        Self::new(buffer)
    }
}

impl Drop for ScopedBuffer {
    fn drop(&mut self) {
        self.release();
    }
}

impl core::fmt::Debug for ScopedBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScopedBuffer")
            .field("size", &self.buffer.size())
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}
