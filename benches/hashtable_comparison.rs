use core::hash::BuildHasher;
use core::hash::Hash;
use core::hint::black_box;

use chain_hash::HashMap as ChainHashMap;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

/// Both maps hash with the same keyed SipHash so only the table layout
/// differs between them.
#[derive(Clone, Copy)]
struct SipBuilder {
    k0: u64,
    k1: u64,
}

impl SipBuilder {
    fn new() -> Self {
        let mut rng = OsRng;
        Self {
            k0: rng.try_next_u64().unwrap(),
            k1: rng.try_next_u64().unwrap(),
        }
    }
}

impl BuildHasher for SipBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(self.k0, self.k1)
    }
}

trait BenchKey: Hash + Eq + Clone {
    fn new(key: u64) -> Self;
}

impl BenchKey for u64 {
    fn new(key: u64) -> Self {
        black_box(key)
    }
}

impl BenchKey for String {
    fn new(key: u64) -> Self {
        black_box(format!("key_{:016X}", key))
    }
}

type Chain<K> = ChainHashMap<K, u64, SipBuilder>;
type Hashbrown<K> = HashbrownHashMap<K, u64, SipBuilder>;

const SIZES: &[usize] = &[
    (1 << 8),
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

fn keys<K: BenchKey>(count: usize, stride: u64, offset: u64) -> Vec<(K, u64)> {
    (0..count as u64)
        .map(|i| (K::new(i * stride + offset), i))
        .collect()
}

fn filled_chain<K: BenchKey>(items: &[(K, u64)], state: SipBuilder) -> Chain<K> {
    let mut map = Chain::with_hasher(state);
    for (k, v) in items.iter().cloned() {
        map.insert(k, v);
    }
    map
}

fn filled_hashbrown<K: BenchKey>(items: &[(K, u64)], state: SipBuilder) -> Hashbrown<K> {
    let mut map = Hashbrown::with_hasher(state);
    for (k, v) in items.iter().cloned() {
        map.insert(k, v);
    }
    map
}

fn bench_insert_random<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_random_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = OsRng;
    let state = SipBuilder::new();

    for &size in SIZES[..=MAX_SIZE].iter() {
        let items = (0..size)
            .map(|i| (K::new(rng.try_next_u64().unwrap()), i as u64))
            .collect::<Vec<(K, u64)>>();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function("chain_hash", |b| {
            b.iter_batched(
                || {
                    let mut items = items.clone();
                    items.shuffle(&mut SmallRng::from_os_rng());
                    items
                },
                |items| {
                    let mut map = Chain::with_hasher(state);
                    for (k, v) in items {
                        black_box(map.insert(k, v));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("hashbrown", |b| {
            b.iter_batched(
                || {
                    let mut items = items.clone();
                    items.shuffle(&mut SmallRng::from_os_rng());
                    items
                },
                |items| {
                    let mut map = Hashbrown::with_hasher(state);
                    for (k, v) in items {
                        black_box(map.insert(k, v));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let state = SipBuilder::new();

    for &size in SIZES[..=MAX_SIZE].iter() {
        let items = keys::<K>(size, 2, 0);
        let chain = filled_chain(&items, state);
        let hashbrown = filled_hashbrown(&items, state);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function("chain_hash", |b| {
            b.iter_batched(
                || {
                    let mut items = items.clone();
                    items.shuffle(&mut SmallRng::from_os_rng());
                    items
                },
                |items| {
                    for (k, _) in items.iter() {
                        black_box(chain.get(k).ok());
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("hashbrown", |b| {
            b.iter_batched(
                || {
                    let mut items = items.clone();
                    items.shuffle(&mut SmallRng::from_os_rng());
                    items
                },
                |items| {
                    for (k, _) in items.iter() {
                        black_box(hashbrown.get(k));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_miss<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_miss_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let state = SipBuilder::new();

    for &size in SIZES[..=MAX_SIZE].iter() {
        let present = keys::<K>(size, 2, 0);
        let absent = keys::<K>(size, 2, 1);
        let chain = filled_chain(&present, state);
        let hashbrown = filled_hashbrown(&present, state);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function("chain_hash", |b| {
            b.iter(|| {
                for (k, _) in absent.iter() {
                    black_box(chain.contains_key(k));
                }
            })
        });

        group.bench_function("hashbrown", |b| {
            b.iter(|| {
                for (k, _) in absent.iter() {
                    black_box(hashbrown.contains_key(k));
                }
            })
        });
    }

    group.finish();
}

fn bench_erase<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("erase_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let state = SipBuilder::new();

    for &size in SIZES[..=MAX_SIZE].iter() {
        let items = keys::<K>(size, 1, 0);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function("chain_hash", |b| {
            b.iter_batched(
                || {
                    let mut items = items.clone();
                    let map = filled_chain(&items, state);
                    items.shuffle(&mut SmallRng::from_os_rng());
                    (map, items)
                },
                |(mut map, items)| {
                    for (k, _) in items.iter() {
                        black_box(map.erase(k));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("hashbrown", |b| {
            b.iter_batched(
                || {
                    let mut items = items.clone();
                    let map = filled_hashbrown(&items, state);
                    items.shuffle(&mut SmallRng::from_os_rng());
                    (map, items)
                },
                |(mut map, items)| {
                    for (k, _) in items.iter() {
                        black_box(map.remove(k));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_iteration<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("iteration_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let state = SipBuilder::new();

    for &size in SIZES[..=MAX_SIZE].iter() {
        let items = keys::<K>(size, 1, 0);
        let chain = filled_chain(&items, state);
        let hashbrown = filled_hashbrown(&items, state);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function("chain_hash", |b| {
            b.iter(|| {
                let mut sum = 0u64;
                for (_, v) in chain.iter() {
                    sum = sum.wrapping_add(*v);
                }
                black_box(sum)
            })
        });

        group.bench_function("chain_hash_cursor", |b| {
            b.iter(|| {
                let mut sum = 0u64;
                let end = chain.end();
                let mut cursor = chain.begin();
                while cursor != end {
                    if let Some((_, v)) = cursor.get() {
                        sum = sum.wrapping_add(*v);
                    }
                    cursor.advance();
                }
                black_box(sum)
            })
        });

        group.bench_function("hashbrown", |b| {
            b.iter(|| {
                let mut sum = 0u64;
                for (_, v) in hashbrown.iter() {
                    sum = sum.wrapping_add(*v);
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Insert,
    Erase,
    Find,
}

fn bench_mixed_probabilistic_zipf<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    for exponent in [1.0, 1.3] {
        let mut group = c.benchmark_group(format!(
            "mixed_probabilistic_zipf_{:.01}_{}",
            exponent,
            core::any::type_name::<K>()
        ));
        group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

        const KEY_SPACE_MULTIPLIER: u64 = 2;

        let state = SipBuilder::new();

        for &size in SIZES[..=MAX_SIZE].iter() {
            let mut rng = SmallRng::from_os_rng();
            let op_distr = Zipf::new(3.0, exponent).unwrap();
            let insert_distr = Zipf::new(size as f64, 1.0).unwrap();
            let find_erase_distr =
                Zipf::new(size as f64 * KEY_SPACE_MULTIPLIER as f64, 1.0).unwrap();

            let operations = (0..size * 3)
                .map(|_| {
                    let op_choice: f64 = rng.sample(op_distr);
                    if op_choice <= 1.0 {
                        (Operation::Find, K::new(rng.sample(find_erase_distr) as u64))
                    } else if op_choice <= 2.0 {
                        (Operation::Insert, K::new(rng.sample(insert_distr) as u64))
                    } else {
                        (Operation::Erase, K::new(rng.sample(find_erase_distr) as u64))
                    }
                })
                .collect::<Vec<(Operation, K)>>();

            group.throughput(Throughput::Elements(size as u64 * 3));
            group.bench_function("chain_hash", |b| {
                b.iter_batched(
                    || operations.clone(),
                    |operations| {
                        let mut map = Chain::with_hasher(state);
                        for (i, (operation, key)) in operations.into_iter().enumerate() {
                            match operation {
                                Operation::Insert => {
                                    black_box(map.upsert(key, i as u64));
                                }
                                Operation::Erase => {
                                    black_box(map.erase(&key));
                                }
                                Operation::Find => {
                                    black_box(map.get(&key).ok());
                                }
                            }
                        }
                        black_box(map)
                    },
                    BatchSize::SmallInput,
                )
            });

            group.bench_function("hashbrown", |b| {
                b.iter_batched(
                    || operations.clone(),
                    |operations| {
                        let mut map = Hashbrown::with_hasher(state);
                        for (i, (operation, key)) in operations.into_iter().enumerate() {
                            match operation {
                                Operation::Insert => {
                                    black_box(map.insert(key, i as u64));
                                }
                                Operation::Erase => {
                                    black_box(map.remove(&key));
                                }
                                Operation::Find => {
                                    black_box(map.get(&key));
                                }
                            }
                        }
                        black_box(map)
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.finish();
    }
}

/// Holds the population steady while cycling keys in and out, which for
/// `chain_hash` exercises the shrink-on-erase path around the lower bound.
fn bench_churn<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let state = SipBuilder::new();

    for &size in SIZES[..=MAX_SIZE].iter() {
        let initial = keys::<K>(size, 1, 0);
        let incoming = keys::<K>(size, 1, size as u64);

        group.throughput(Throughput::Elements(size as u64 * 2));
        group.bench_function("chain_hash", |b| {
            b.iter_batched(
                || filled_chain(&initial, state),
                |mut map| {
                    for ((old, _), (new, v)) in initial.iter().zip(incoming.iter()) {
                        black_box(map.erase(old));
                        black_box(map.insert(new.clone(), *v));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function("hashbrown", |b| {
            b.iter_batched(
                || filled_hashbrown(&initial, state),
                |mut map| {
                    for ((old, _), (new, v)) in initial.iter().zip(incoming.iter()) {
                        black_box(map.remove(old));
                        black_box(map.insert(new.clone(), *v));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<u64, 5>,
    bench_insert_random::<String, 4>,
    bench_find_hit::<u64, 5>,
    bench_find_hit::<String, 4>,
    bench_find_miss::<u64, 5>,
    bench_find_miss::<String, 4>,
    bench_erase::<u64, 5>,
    bench_erase::<String, 4>,
    bench_iteration::<u64, 5>,
    bench_iteration::<String, 4>,
    bench_mixed_probabilistic_zipf::<u64, 5>,
    bench_mixed_probabilistic_zipf::<String, 4>,
    bench_churn::<u64, 5>,
    bench_churn::<String, 4>,
);

criterion_main!(benches);
