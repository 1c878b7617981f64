//! 确定性哈希：FNV-1a（标识符驻留）与查表式 CRC32（校验和）。
//!
//! # 设计动机（Why）
//! - 两族哈希都是 32 位、无种子的纯函数，任何持久化或传输过的值必须在重新实现后逐位一致；
//! - 仅面向非对抗场景的快速标识与校验，不提供密码学强度。
//!
//! # 集成方式（How）
//! - 标识符通过 [`generate_fnv_hash`] 从标签派生；
//! - 文件与载荷校验使用 [`crc32_bytes`]，分段输入使用 [`Crc32`] 流式累积。

/// FNV-1a 偏移基。
pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
/// FNV-1a 质数。
pub const FNV_PRIME: u32 = 16_777_619;

/// CRC32（IEEE，反射形式）多项式。
pub const CRC32_POLYNOMIAL: u32 = 0xEDB8_8320;

const CRC32_TABLE_LEN: usize = 256;
const CRC32_ITERATIONS: usize = 8;

const GENERATED_TABLE: [u32; CRC32_TABLE_LEN] = gen_crc32_table();

const _: () = {
    assert!(GENERATED_TABLE[1] == 0x7707_3096);
    assert!(GENERATED_TABLE[255] == 0x2D02_EF8D);
};

/// 进程级 CRC32 查找表，编译期生成，运行期只读。
static CRC32_TABLE: [u32; CRC32_TABLE_LEN] = GENERATED_TABLE;

const fn gen_crc32_table() -> [u32; CRC32_TABLE_LEN] {
    let mut table = [0u32; CRC32_TABLE_LEN];
    let mut byte = 0;
    while byte < CRC32_TABLE_LEN {
        let mut crc = byte as u32;
        let mut i = 0;
        while i < CRC32_ITERATIONS {
            if crc & 1 == 1 {
                crc = (crc >> 1) ^ CRC32_POLYNOMIAL;
            } else {
                crc >>= 1;
            }
            i += 1;
        }
        table[byte] = crc;
        byte += 1;
    }
    table
}

/// 返回预计算的 CRC32 查找表。
pub fn crc32_table() -> &'static [u32; CRC32_TABLE_LEN] {
    &CRC32_TABLE
}

/// 为字符串生成 32 位 FNV-1a 哈希。
///
/// # 契约说明（What）
/// - 逐个 Unicode 标量值（码点）参与异或，而非 UTF-8 字节；对 ASCII 输入两者一致；
/// - 消费完全部字符后额外执行一轮“异或 0 再乘质数”，对应早期实现里的终止空字节。
///   该轮并非教科书 FNV-1a，但已持久化的标识符依赖它，不得移除；
/// - 空串返回 `0x050C_5D1F`。
pub fn generate_fnv_hash(label: &str) -> u32 {
    finish_fnv(
        label
            .chars()
            .fold(FNV_OFFSET_BASIS, |hash, c| fnv_round(hash, c as u32)),
    )
}

/// 与 [`generate_fnv_hash`] 相同的方案，但直接消费字节序列（同样包含终止轮）。
pub fn generate_fnv_hash_bytes(bytes: &[u8]) -> u32 {
    finish_fnv(
        bytes
            .iter()
            .fold(FNV_OFFSET_BASIS, |hash, &b| fnv_round(hash, u32::from(b))),
    )
}

#[inline]
fn fnv_round(hash: u32, value: u32) -> u32 {
    (hash ^ value).wrapping_mul(FNV_PRIME)
}

#[inline]
fn finish_fnv(hash: u32) -> u32 {
    fnv_round(hash, 0)
}

/// 以字符为单位计算 CRC32。
///
/// - 每个字符以码点参与 `(crc ^ code) & 0xFF` 查表，ASCII 输入与 [`crc32_bytes`] 对其 UTF-8 编码的结果一致；
/// - 空串返回 `0`。
pub fn crc32(data: &str) -> u32 {
    !data
        .chars()
        .fold(u32::MAX, |crc, c| crc32_step(crc, c as u32))
}

/// 对原始字节计算 CRC32。
pub fn crc32_bytes(data: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(data);
    hasher.finalize()
}

#[inline]
fn crc32_step(crc: u32, value: u32) -> u32 {
    CRC32_TABLE[((crc ^ value) & 0xFF) as usize] ^ (crc >> 8)
}

/// 流式 CRC32 累加器。
///
/// 多次 [`update`](Self::update) 的结果与对拼接后的字节一次性调用 [`crc32_bytes`] 相同。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32 {
    state: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    pub const fn new() -> Self {
        Self { state: u32::MAX }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.state = data
            .iter()
            .fold(self.state, |crc, &b| crc32_step(crc, u32::from(b)));
    }

    /// 返回最终校验值（执行末尾取反），累加器本身保持可继续写入。
    pub fn finalize(&self) -> u32 {
        !self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_fixed_points() {
        let table = crc32_table();
        assert_eq!(table.len(), 256);
        assert_eq!(table[0], 0);
        assert_eq!(table[1], 0x7707_3096);
        assert_eq!(table[255], 0x2D02_EF8D);
    }

    #[test]
    fn fnv_empty_label_includes_terminating_round() {
        assert_eq!(generate_fnv_hash(""), 0x050C_5D1F);
        assert_eq!(generate_fnv_hash_bytes(b""), 0x050C_5D1F);
    }

    #[test]
    fn fnv_known_values() {
        assert_eq!(generate_fnv_hash("a"), 0x2B24_D044);
        assert_eq!(generate_fnv_hash("abc"), 0x6A33_DC51);
        assert_eq!(generate_fnv_hash("foo"), 0x6150_AC75);
        assert_eq!(generate_fnv_hash("bar"), 0xFCD9_EFEE);
    }

    #[test]
    fn fnv_uses_code_points_for_non_ascii() {
        assert_eq!(generate_fnv_hash("é"), 0x59FB_6F0C);
        assert_eq!(generate_fnv_hash_bytes("é".as_bytes()), 0xF395_67D3);
    }

    #[test]
    fn crc32_empty_is_zero() {
        assert_eq!(crc32(""), 0);
        assert_eq!(crc32_bytes(&[]), 0);
    }

    #[test]
    fn crc32_check_values() {
        assert_eq!(crc32_bytes(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32("abc"), 0x3524_41C2);
        assert_eq!(
            crc32_bytes(b"The quick brown fox jumps over the lazy dog"),
            0x414F_A339
        );
    }

    #[test]
    fn crc32_string_variant_masks_code_points() {
        assert_eq!(crc32("é"), 0x0BD4_B551);
        assert_eq!(crc32_bytes("é".as_bytes()), 0x0E04_8D3E);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut hasher = Crc32::new();
        hasher.update(b"hello");
        hasher.update(b" ");
        hasher.update(b"world");
        assert_eq!(hasher.finalize(), crc32_bytes(b"hello world"));
        assert_eq!(hasher.finalize(), 0x0D4A_1185);
    }
}
