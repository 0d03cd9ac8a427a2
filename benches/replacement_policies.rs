//! Compares FIFO, LRU and CLOCK on a skewed access pattern.
//!
//! 80% of accesses go to a hot set that fits in the pool; the rest scan a
//! cold range much larger than the pool.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pagecache::{BufferPool, BufferPoolConfig, MemoryStore, PageId, ReplacementPolicy};

const CAPACITY: usize = 64;
const HOT_PAGES: u32 = 48;
const COLD_PAGES: u32 = 1024;
const ACCESSES: usize = 10_000;

/// Deterministic access trace from a small xorshift generator.
fn skewed_trace() -> Vec<PageId> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..ACCESSES)
        .map(|_| {
            let r = next();
            if r % 10 < 8 {
                PageId::new((r >> 8) as u32 % HOT_PAGES)
            } else {
                PageId::new(HOT_PAGES + (r >> 8) as u32 % COLD_PAGES)
            }
        })
        .collect()
}

fn run_trace(pool: &BufferPool<MemoryStore>, trace: &[PageId]) {
    for (i, &page_id) in trace.iter().enumerate() {
        let handle = pool.pin(page_id).expect("pin");
        if i % 4 == 0 {
            pool.write(&handle).expect("write").as_mut_slice()[0] = i as u8;
            pool.mark_dirty(&handle).expect("mark dirty");
        } else {
            black_box(pool.read(&handle).expect("read").as_slice()[0]);
        }
        pool.unpin(&handle).expect("unpin");
    }
}

fn bench_policies(c: &mut Criterion) {
    let trace = skewed_trace();
    let mut group = c.benchmark_group("skewed_trace");

    for policy in ReplacementPolicy::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &trace, |b, trace| {
            b.iter(|| {
                let store = MemoryStore::with_blocks(HOT_PAGES + COLD_PAGES);
                let pool = BufferPool::with_backend(BufferPoolConfig::new(CAPACITY, policy), store)
                    .expect("pool");
                run_trace(&pool, trace);
                black_box(pool.stats().hit_rate())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_policies);
criterion_main!(benches);
