use criterion::{Criterion, black_box};
use saw_core::{Buffer, crc32_bytes, generate_fnv_hash};
use std::{env, time::Duration};

/// 哈希与解码基准：跟踪查表 CRC32、FNV 标签哈希与记录解码的单次成本。
///
/// # 逻辑解析（How）
/// - `crc32_64k`：对 64 KiB 载荷计算校验和；
/// - `fnv_label`：对典型长度的组件名称求哈希；
/// - `decode_f32`：把 64 KiB 缓冲解码为 `f32` 序列。
fn bench_hashing(c: &mut Criterion) {
    let payload: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
    c.bench_function("crc32_64k", |b| b.iter(|| black_box(crc32_bytes(&payload))));

    c.bench_function("fnv_label", |b| {
        b.iter(|| black_box(generate_fnv_hash(black_box("RigidBody.Transform.Position"))))
    });

    let buffer = Buffer::from(payload.clone());
    c.bench_function("decode_f32", |b| {
        b.iter(|| black_box(buffer.as_type::<f32>().map(|v| v.len())))
    });
}

fn main() {
    let mut quick_mode = false;
    for arg in env::args().skip(1) {
        if arg == "--quick" {
            quick_mode = true;
        }
    }

    let mut criterion = Criterion::default();
    if quick_mode {
        criterion = criterion
            .sample_size(10)
            .warm_up_time(Duration::from_millis(100))
            .measurement_time(Duration::from_millis(250));
    }

    bench_hashing(&mut criterion);
    criterion.final_summary();
}
