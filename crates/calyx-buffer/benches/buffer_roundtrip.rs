use calyx_buffer::Buffer;
use criterion::{Criterion, black_box};
use std::{env, time::Duration};

/// 缓冲典型路径的基准：构造、追加增长、容量内赋值与字节扫描。
///
/// # 设计背景（Why）
/// - 增长策略与强异常安全路径都涉及整块迁移，需要基准确认摊还成本稳定；
/// - 容量内赋值是热路径（复用存储、零分配），单独计量以便捕捉回归。
///
/// # 逻辑解析（How）
/// - `buffer_append_growth`：从空缓冲出发分批追加 4 KiB，覆盖多轮倍增迁移；
/// - `buffer_assign_in_place`：预置容量后反复赋值，全程不应触发分配；
/// - `buffer_scan`：正反向扫描 4 KiB 内容中的哨兵字节。
fn bench_buffer_roundtrip(c: &mut Criterion) {
    c.bench_function("buffer_append_growth", |b| {
        let chunk = [0x5au8; 256];
        b.iter(|| {
            let mut buffer = Buffer::new();
            for _ in 0..16 {
                buffer.append(&chunk).unwrap();
            }
            black_box(buffer.len())
        });
    });

    c.bench_function("buffer_assign_in_place", |b| {
        let payload = vec![0xa5u8; 1024];
        let mut buffer = Buffer::with_len_and_capacity(0, payload.len()).unwrap();
        b.iter(|| {
            buffer.assign(black_box(&payload)).unwrap();
            black_box(buffer.as_ptr())
        });
    });

    c.bench_function("buffer_scan", |b| {
        let mut payload = vec![0u8; 4096];
        payload[17] = b'e';
        payload[4000] = b'e';
        let buffer = Buffer::from_slice(&payload).unwrap();
        b.iter(|| {
            let forward = buffer.find(black_box(b'e'));
            let backward = buffer.rfind(black_box(b'e'));
            black_box((forward, backward))
        });
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

    bench_buffer_roundtrip(&mut criterion);
    criterion.final_summary();
}
