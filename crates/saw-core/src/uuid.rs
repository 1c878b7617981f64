//! 32/64 位运行期唯一值。
//!
//! 与 [`crate::identifier::Identifier`] 不同，`Uuid` 不从名称派生，而是随机生成或由调用方给定，
//! 适合标记运行期创建的实体。随机源为进程级 [`FastRandom`]，首次使用时以当前时间播种；
//! 不具备密码学强度。

use std::{fmt, sync::OnceLock};

use spin::Mutex;

use crate::{
    error::{Result, SawError},
    random::{FastRandom, seed_from_current_time},
};

/// 位宽。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UuidWidth {
    Bits32,
    Bits64,
}

impl UuidWidth {
    /// 从位数解析，仅接受 32 与 64。
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            32 => Ok(UuidWidth::Bits32),
            64 => Ok(UuidWidth::Bits64),
            other => Err(SawError::InvalidUuidWidth { bits: other }),
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            UuidWidth::Bits32 => 32,
            UuidWidth::Bits64 => 64,
        }
    }

    const fn mask(self) -> u64 {
        match self {
            UuidWidth::Bits32 => u32::MAX as u64,
            UuidWidth::Bits64 => u64::MAX,
        }
    }
}

/// 带位宽的唯一值；相等与哈希同时比较数值和位宽，同数值的 32 位与 64 位值互不相等。
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uuid {
    value: u64,
    width: UuidWidth,
}

static GENERATOR: OnceLock<Mutex<FastRandom>> = OnceLock::new();

fn generator() -> &'static Mutex<FastRandom> {
    GENERATOR.get_or_init(|| Mutex::new(FastRandom::new(seed_from_current_time())))
}

impl Uuid {
    /// 以给定数值构造，超出位宽的高位被截断。
    pub const fn from_value(value: u64, width: UuidWidth) -> Self {
        Self {
            value: value & width.mask(),
            width,
        }
    }

    /// 从进程级随机源生成。
    pub fn random(width: UuidWidth) -> Self {
        let mut rng = generator().lock();
        Self::random_with(&mut rng, width)
    }

    /// 使用调用方提供的生成器，便于测试复现。
    ///
    /// 单次输出只有 31 位有效熵，因此按 16 位分段拼接。
    pub fn random_with(rng: &mut FastRandom, width: UuidWidth) -> Self {
        let value = (0..4).fold(0u64, |acc, _| (acc << 16) | u64::from(rng.next_u16()));
        Self::from_value(value, width)
    }

    pub const fn value(&self) -> u64 {
        self.value
    }

    pub const fn width(&self) -> UuidWidth {
        self.width
    }
}

impl From<Uuid> for u64 {
    fn from(id: Uuid) -> Self {
        id.value
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid({}, {}-bit)", self.value, self.width.bits())
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.width {
            UuidWidth::Bits32 => write!(f, "{:08x}", self.value),
            UuidWidth::Bits64 => write!(f, "{:016x}", self.value),
        }
    }
}
