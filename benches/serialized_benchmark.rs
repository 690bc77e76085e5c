use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keyed_deque::{IndexedDeque, SerializedDeque};
use std::sync::{Arc, Mutex};
use std::thread;

const OPS_PER_THREAD: usize = 1_000;
const THREADS: usize = 4;

fn bench_contended_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("Serialized Contended Push/Pop");
    group.sample_size(20);

    group.bench_function("Mutex<IndexedDeque>", |b| {
        b.iter(|| {
            let deque = Arc::new(Mutex::new(IndexedDeque::unbounded()));
            thread::scope(|s| {
                for t in 0..THREADS {
                    let deque = Arc::clone(&deque);
                    s.spawn(move || {
                        for i in 0..OPS_PER_THREAD {
                            let mut guard = deque.lock().unwrap();
                            guard.push_tail(t * OPS_PER_THREAD + i).unwrap();
                            black_box(guard.pop_head().ok());
                        }
                    });
                }
            });
        })
    });

    group.bench_function("SerializedDeque", |b| {
        b.iter(|| {
            let deque = SerializedDeque::spawn(IndexedDeque::unbounded()).unwrap();
            thread::scope(|s| {
                for t in 0..THREADS {
                    let deque = deque.clone();
                    s.spawn(move || {
                        for i in 0..OPS_PER_THREAD {
                            deque.push_tail(t * OPS_PER_THREAD + i).unwrap();
                            black_box(deque.pop_head().ok());
                        }
                    });
                }
            });
        })
    });

    group.bench_function("SerializedDeque batched execute", |b| {
        b.iter(|| {
            let deque = SerializedDeque::spawn(IndexedDeque::unbounded()).unwrap();
            thread::scope(|s| {
                for t in 0..THREADS {
                    let deque = deque.clone();
                    s.spawn(move || {
                        deque
                            .execute(move |d| {
                                for i in 0..OPS_PER_THREAD {
                                    d.push_tail(t * OPS_PER_THREAD + i).unwrap();
                                    black_box(d.pop_head().ok());
                                }
                            })
                            .unwrap();
                    });
                }
            });
        })
    });

    group.finish();
}

criterion_group!(benches, bench_contended_push_pop);
criterion_main!(benches);
