//! 哈希派生的稳定标识符，用于名称到整数的驻留。
//!
//! # 设计动机（Why）
//! - 运行期以 32 位整数替代人类可读名称，比较与查表均为常数开销；
//! - 构造时保留原始标签仅供诊断，标签永不参与相等性判断。
//!
//! # 集成方式（How）
//! - 三个显式构造入口：[`Identifier::from_label`]、[`Identifier::from_hash`]、[`Identifier::default`]；
//! - 来自配置或外部数据的“标签或整数”由 serde 反序列化分派，其它类型的输入返回
//!   [`SawError::InvalidIdentifierSource`]；
//! - 以标识符为键的映射请使用 [`IdentifierMap`]，其哈希器直接透传 FNV 值。

use std::{
    collections::HashMap,
    fmt,
    hash::{BuildHasherDefault, Hash, Hasher},
    sync::Arc,
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};

use crate::{
    error::{Result, SawError},
    hash::generate_fnv_hash,
};

/// 稳定标识符。
///
/// # 契约定义（What）
/// - `hash`：标签的 FNV-1a 值，或直接给定的原始整数；
/// - `dbg_name`：从标签构造时保存原标签，否则为空；
/// - 相等、排序与 [`Hash`] 仅由 `hash` 决定。两个在 FNV-1a 下碰撞的标签构造出的标识符彼此相等，
///   这是方案的已知性质而非缺陷。
#[derive(Clone, Default)]
pub struct Identifier {
    hash: u32,
    dbg_name: Option<Arc<str>>,
}

impl Identifier {
    /// 从文本标签构造：`hash = generate_fnv_hash(label)`。
    pub fn from_label(label: impl Into<Arc<str>>) -> Self {
        let label = label.into();
        Self {
            hash: generate_fnv_hash(&label),
            dbg_name: Some(label),
        }
    }

    /// 从原始 32 位整数构造，调试名为空。
    pub const fn from_hash(hash: u32) -> Self {
        Self {
            hash,
            dbg_name: None,
        }
    }

    pub const fn hash(&self) -> u32 {
        self.hash
    }

    /// 返回构造时的标签；从整数或默认值构造时为空串。
    pub fn dbg_name(&self) -> &str {
        self.dbg_name.as_deref().unwrap_or("")
    }

    fn from_wide(value: i128) -> Result<Self> {
        u32::try_from(value)
            .map(Self::from_hash)
            .map_err(|_| SawError::InvalidIdentifierSource {
                detail: format!("integer {value} does not fit in 32 bits"),
            })
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Identifier {}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.hash.cmp(&other.hash)
    }
}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identifier")
            .field("hash", &format_args!("{:#010x}", self.hash))
            .field("dbg_name", &self.dbg_name())
            .finish()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dbg_name.as_deref() {
            Some(name) if !name.is_empty() => f.write_str(name),
            _ => write!(f, "#{:08x}", self.hash),
        }
    }
}

impl From<&str> for Identifier {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl From<String> for Identifier {
    fn from(label: String) -> Self {
        Self::from_label(label)
    }
}

impl From<u32> for Identifier {
    fn from(hash: u32) -> Self {
        Self::from_hash(hash)
    }
}

impl From<Identifier> for u32 {
    fn from(id: Identifier) -> Self {
        id.hash
    }
}

impl From<&Identifier> for u32 {
    fn from(id: &Identifier) -> Self {
        id.hash
    }
}

macro_rules! impl_try_from_wide_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<$ty> for Identifier {
                type Error = SawError;

                fn try_from(value: $ty) -> Result<Self> {
                    Self::from_wide(i128::from(value))
                }
            }
        )*
    };
}

impl_try_from_wide_int!(i32, i64, u64);

impl TryFrom<usize> for Identifier {
    type Error = SawError;

    fn try_from(value: usize) -> Result<Self> {
        u32::try_from(value)
            .map(Self::from_hash)
            .map_err(|_| SawError::InvalidIdentifierSource {
                detail: format!("integer {value} does not fit in 32 bits"),
            })
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.hash)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        deserializer.deserialize_any(IdentifierVisitor)
    }
}

/// 按输入类型分派：字符串走标签，整数走原始值，其余一律拒绝。
struct IdentifierVisitor;

impl IdentifierVisitor {
    fn reject<E: de::Error>(kind: &str) -> E {
        E::custom(SawError::InvalidIdentifierSource {
            detail: format!("{kind} is neither a label nor a 32-bit integer"),
        })
    }
}

impl<'de> Visitor<'de> for IdentifierVisitor {
    type Value = Identifier;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a text label or a 32-bit unsigned integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> core::result::Result<Identifier, E> {
        Ok(Identifier::from_label(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> core::result::Result<Identifier, E> {
        Ok(Identifier::from_label(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> core::result::Result<Identifier, E> {
        Identifier::try_from(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> core::result::Result<Identifier, E> {
        Identifier::try_from(v).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> core::result::Result<Identifier, E> {
        Err(Self::reject("floating-point value"))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> core::result::Result<Identifier, E> {
        Err(Self::reject("boolean"))
    }

    fn visit_unit<E: de::Error>(self) -> core::result::Result<Identifier, E> {
        Err(Self::reject("null"))
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, _: A) -> core::result::Result<Identifier, A::Error> {
        Err(Self::reject("sequence"))
    }

    fn visit_map<A: de::MapAccess<'de>>(self, _: A) -> core::result::Result<Identifier, A::Error> {
        Err(Self::reject("map"))
    }
}

/// 透传哈希器：标识符本身已是分布良好的 FNV 值，无需再次散列。
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentifierHasher {
    state: u64,
}

impl Hasher for IdentifierHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state = (self.state << 8) | u64::from(b);
        }
    }

    /// 高低 32 位各放一份：`HashMap` 的控制标签取自哈希高位，高位全零会让所有键共享同一标签。
    fn write_u32(&mut self, value: u32) {
        self.state = (u64::from(value) << 32) | u64::from(value);
    }
}

/// 以 [`Identifier`] 为键、透传哈希的映射。
pub type IdentifierMap<V> = HashMap<Identifier, V, BuildHasherDefault<IdentifierHasher>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero_with_empty_name() {
        let id = Identifier::default();
        assert_eq!(id.hash(), 0);
        assert_eq!(id.dbg_name(), "");
        assert_eq!(id, Identifier::from_hash(0));
    }

    #[test]
    fn label_keeps_debug_name_but_equality_ignores_it() {
        let labelled = Identifier::from_label("foo");
        let raw = Identifier::from_hash(labelled.hash());
        assert_eq!(labelled.dbg_name(), "foo");
        assert_eq!(raw.dbg_name(), "");
        assert_eq!(labelled, raw);
    }

    #[test]
    fn out_of_range_integers_are_rejected() {
        assert!(matches!(
            Identifier::try_from(-1i64),
            Err(SawError::InvalidIdentifierSource { .. })
        ));
        assert!(Identifier::try_from(u64::from(u32::MAX) + 1).is_err());
        assert_eq!(
            Identifier::try_from(42u64).expect("42 可表示").hash(),
            42
        );
    }

    #[test]
    fn display_prefers_label() {
        assert_eq!(Identifier::from_label("Position").to_string(), "Position");
        assert_eq!(Identifier::from_hash(0xAB).to_string(), "#000000ab");
    }

    #[test]
    fn identity_hasher_passes_hash_through() {
        let mut hasher = IdentifierHasher::default();
        Hash::hash(&Identifier::from_hash(7), &mut hasher);
        assert_eq!(hasher.finish(), (7 << 32) | 7);
    }

    #[test]
    fn identity_hasher_spreads_into_high_bits() {
        use std::{collections::HashSet, hash::BuildHasher};

        let build = BuildHasherDefault::<IdentifierHasher>::default();
        let tags: HashSet<u64> = ["Position", "Velocity", "Mass", "Color", "Scale", "Rotation"]
            .into_iter()
            .map(|label| build.hash_one(Identifier::from_label(label)) >> 57)
            .collect();
        assert!(tags.len() > 1, "控制标签不应全部相同: {tags:?}");
    }
}
