#![deny(unsafe_code)]

//! `saw-core` 提供引擎最底层的二进制缓冲与确定性哈希契约。
//!
//! # 模块定位（Why）
//! - 缓冲、哈希与标识符是整个仓库中唯一具备位级契约的部分：查找表生成的正确性、哈希的确定性、
//!   别名安全与所有权转移都需要在此集中保证；
//! - [`hash::generate_fnv_hash`] 与 [`hash::crc32_bytes`] 的输出可能已被持久化，任何改动都必须逐位兼容。
//!
//! # 设计概要（How）
//! - `buffer`：独占字节区域 [`Buffer`] 与显式小端解码的 [`Record`]；
//! - `scoped`：作用域所有权包装 [`ScopedBuffer`]，离开作用域时恰好释放一次；
//! - `hash`：FNV-1a 与编译期生成查找表的 CRC32；
//! - `identifier`：仅以哈希值定义相等性的 [`Identifier`]；
//! - `random`/`uuid`：确定性 LCG 与运行期唯一值；
//! - `fs`/`version`：文件协作方与构建信息。
//!
//! # 并发（What）
//! - 所有操作同步、有界、无阻塞；CRC32 表在编译期生成，运行期只读，无需加锁；
//! - 同一缓冲实例的修改由 `&mut` 借用排他，跨线程共享的同步责任在调用方。

pub mod buffer;
pub mod error;
pub mod fs;
pub mod hash;
pub mod identifier;
pub mod random;
pub mod scoped;
pub mod uuid;
pub mod version;

pub use buffer::{Buffer, Record};
pub use error::{Result, SawError};
pub use hash::{Crc32, crc32, crc32_bytes, generate_fnv_hash, generate_fnv_hash_bytes};
pub use identifier::{Identifier, IdentifierMap};
pub use random::FastRandom;
pub use scoped::{ReleaseHook, ReleasedBuffer, ScopedBuffer};
pub use uuid::{Uuid, UuidWidth};
pub use version::{BuildConfig, BuildInfo, SAW_VERSION};
