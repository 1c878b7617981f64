//! 独占所有权的连续字节缓冲。
//!
//! # 模块定位（Why）
//! - 文件读取等协作方以 [`Buffer`] 交付原始字节，上层再按约定布局把字节解码为定长记录；
//! - 记录解码以显式、带检查的转换取代地址级别的类型双关：每条记录从固定窗口按**小端序**读出，
//!   返回全新构造的值序列，不存在别名视图。
//!
//! # 设计概要（How）
//! - 内部以 `Option<Box<[u8]>>` 表达“缺省/存在”两态，长度即 `size`，二者天然一致；
//! - [`Record`] trait 描述定长记录的尺寸与解码方式，借助 `bytes::Buf` 读取定宽数值；
//! - 需要保留原始字节时，[`Buffer::records`] 返回按记录切分的借用视图（`ChunksExact`），同样不复制。
//!
//! # 契约说明（What）
//! - **不变量**：`size() == 0` 当且仅当缓冲缺省；存在的缓冲在生命周期内长度不变，只能先释放再重新分配；
//! - **并发**：修改需要 `&mut self`，因此同一实例上的 `allocate`/`release` 由借用检查器排他；
//!   跨线程共享时的外部同步由调用方负责，类型本身不加锁；
//! - **字节序**：不做任何端序归一化，生产方与消费方需在带外约定记录布局。

use std::slice::ChunksExact;

use bytes::{Buf, Bytes};

use crate::error::{Result, SawError};

/// 独占的连续字节区域。
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Buffer {
    data: Option<Box<[u8]>>,
}

impl Buffer {
    /// 创建缺省（空）缓冲。
    pub const fn new() -> Self {
        Self { data: None }
    }

    /// 创建长度为 `size` 的零初始化缓冲；`size == 0` 时得到空缓冲。
    pub fn with_size(size: usize) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.allocate(size)?;
        Ok(buffer)
    }

    /// 以给定字节的副本创建缓冲。
    pub fn from_slice(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::new();
        }
        Self {
            data: Some(bytes.into()),
        }
    }

    /// 深拷贝 `other`：长度与内容一致，存储互不共享。
    ///
    /// 等价于 `other.clone()`，单独保留该入口以便调用处显式表达“复制而非转移”。
    pub fn copy(other: &Buffer) -> Buffer {
        other.clone()
    }

    /// 释放当前区域后分配恰好 `size` 字节的零初始化区域。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：无；可对同一实例反复调用；
    /// - **后置条件**：成功时 `size() == size`，且 `size > 0` 时缓冲处于存在态；
    /// - **错误**：请求超过 `isize::MAX` 或分配器拒绝时返回 [`SawError::InvalidSize`]，
    ///   此时原有区域已被释放，缓冲保持为空，绝不静默截断。
    pub fn allocate(&mut self, size: usize) -> Result<()> {
        self.release();
        if size == 0 {
            return Ok(());
        }

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(size)
            .map_err(|_| SawError::InvalidSize { requested: size })?;
        storage.resize(size, 0);
        self.data = Some(storage.into_boxed_slice());
        Ok(())
    }

    /// 放弃持有的区域并将长度归零；对空缓冲调用是无操作。
    pub fn release(&mut self) {
        self.data = None;
    }

    /// 缓冲当前是否持有区域（`size() > 0`）。
    pub fn is_present(&self) -> bool {
        self.data.is_some()
    }

    pub fn size(&self) -> usize {
        self.data.as_deref().map_or(0, <[u8]>::len)
    }

    /// 读取持有的区域；空缓冲返回 `None`，不会出错。
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        self.data.as_deref_mut()
    }

    /// 以切片形式读取内容；空缓冲对应空切片。
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// 以切片形式写入内容；空缓冲对应空切片。
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }

    /// 将内容按 `element_size` 字节切分为记录视图，不复制。
    ///
    /// - 视图长度为 `size() / element_size`，末尾不足一条记录的字节被忽略；
    /// - 空缓冲得到空视图；`element_size == 0` 返回 [`SawError::InvalidElementSize`]。
    pub fn records(&self, element_size: usize) -> Result<ChunksExact<'_, u8>> {
        if element_size == 0 {
            return Err(SawError::InvalidElementSize);
        }
        Ok(self.as_slice().chunks_exact(element_size))
    }

    /// 将内容解码为 `T` 记录序列。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：替代“把裸字节直接当作 `T` 数组”的别名转换；每条记录经 [`Record::decode`]
    ///   显式构造，调用方不再需要 `unsafe`；
    /// - **契约 (What)**：返回 `size() / T::SIZE` 条记录，尾部残余字节被忽略；`T::SIZE == 0` 时返回
    ///   [`SawError::InvalidElementSize`]；布局与字节序需与生产方一致，本方法无法校验；
    /// - **执行 (How)**：复用 [`records`](Self::records) 的定长切分，再逐块解码。
    pub fn as_type<T: Record>(&self) -> Result<Vec<T>> {
        Ok(self.records(T::SIZE)?.map(T::decode).collect())
    }

    /// 转换为只读的 [`Bytes`]，不复制底层存储。
    pub fn into_bytes(self) -> Bytes {
        self.data.map(Bytes::from).unwrap_or_default()
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            return Self::new();
        }
        Self {
            data: Some(bytes.into_boxed_slice()),
        }
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// 可从定长字节窗口解码的记录类型。
///
/// # 契约说明（What）
/// - `SIZE`：单条记录占用的字节数；
/// - `decode` 收到的切片长度恰好为 `SIZE`，实现方按约定的偏移与字节序读取字段；
///   内置的数值实现统一采用小端序。
///
/// # 示例
/// ```rust
/// use saw_core::buffer::{Buffer, Record};
///
/// #[derive(Debug, PartialEq)]
/// struct Sample {
///     id: u16,
///     value: f32,
/// }
///
/// impl Record for Sample {
///     const SIZE: usize = 6;
///
///     fn decode(chunk: &[u8]) -> Self {
///         Sample {
///             id: u16::decode(&chunk[..2]),
///             value: f32::decode(&chunk[2..]),
///         }
///     }
/// }
///
/// let mut bytes = 7u16.to_le_bytes().to_vec();
/// bytes.extend_from_slice(&1.5f32.to_le_bytes());
/// let buffer = Buffer::from(bytes);
/// assert_eq!(buffer.as_type::<Sample>().unwrap(), vec![Sample { id: 7, value: 1.5 }]);
/// ```
pub trait Record: Sized {
    const SIZE: usize;

    fn decode(chunk: &[u8]) -> Self;
}

macro_rules! impl_le_record {
    ($($ty:ty => $getter:ident),* $(,)?) => {
        $(
            impl Record for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn decode(mut chunk: &[u8]) -> Self {
                    chunk.$getter()
                }
            }
        )*
    };
}

impl_le_record!(
    u8 => get_u8,
    i8 => get_i8,
    u16 => get_u16_le,
    i16 => get_i16_le,
    u32 => get_u32_le,
    i32 => get_i32_le,
    u64 => get_u64_le,
    i64 => get_i64_le,
    f32 => get_f32_le,
    f64 => get_f64_le,
);

impl<T: Record, const N: usize> Record for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn decode(chunk: &[u8]) -> Self {
        core::array::from_fn(|i| T::decode(&chunk[i * T::SIZE..(i + 1) * T::SIZE]))
    }
}
