//! End-to-end scenarios S1-S6 against `AwaitableQueue`, plus a
//! multi-producer/multi-consumer stress test for P9 (no deadlock, full
//! delivery).

use awaitable_queue::{AwaitableQueue, ValueSlice, ZeroOut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn slice_of(values: &[i32]) -> ValueSlice<i32> {
    let mut s = ValueSlice::with_capacity(values.len());
    s.append_many(values.iter().copied(), ZeroOut::Zero);
    s
}

/// S1: single producer/single consumer, small.
#[test]
fn s1_single_producer_single_consumer_small() {
    let q: AwaitableQueue<i32> = AwaitableQueue::new();
    q.send(1);
    q.send(2);
    q.send(3);
    q.close();

    let mut delivered = Vec::new();
    loop {
        let (value, has_value) = q.get();
        match value {
            Some(v) => {
                assert!(has_value);
                delivered.push(v);
            }
            None => break,
        }
    }
    assert_eq!(delivered, vec![1, 2, 3]);
    assert!(q.is_closed());
}

/// S2: slice transfer interleaved with single sends.
#[test]
fn s2_slice_transfer() {
    let q: AwaitableQueue<i32> = AwaitableQueue::new();
    q.send_slice(slice_of(&[10, 20, 30]));
    q.send(40);
    q.close();

    let first = q.get_slice().unwrap();
    assert_eq!(first.as_slice(), &[10, 20, 30]);
    assert_eq!(q.get(), (Some(40), true));
    assert_eq!(q.get(), (None, false));
    assert!(q.close_ch().is_closed());
}

/// S3: drain everything via `get_all`.
#[test]
fn s3_drain_everything() {
    let q: AwaitableQueue<i32> = AwaitableQueue::new();
    q.send(1);
    q.send_slice(slice_of(&[2, 3]));
    q.send(4);

    let all = q.get_all().unwrap();
    assert_eq!(all.as_slice(), &[1, 2, 3, 4]);
    assert_eq!(q.get(), (None, false));
}

/// S4: close with producers still racing in residual data.
#[test]
fn s4_close_with_residual() {
    let q: AwaitableQueue<i32> = AwaitableQueue::new();
    q.send_slice(slice_of(&[5, 6]));
    q.close();
    q.send(7);

    assert!(!q.close_ch().is_closed());
    assert_eq!(q.get(), (Some(5), true));
    assert_eq!(q.get(), (Some(6), true));
    assert!(!q.close_ch().is_closed());
    assert_eq!(q.get(), (Some(7), true));
    assert!(q.close_ch().is_closed());
}

/// S5: reader interface fills partial buffers and reports end-of-stream.
#[test]
fn s5_reader_interface() {
    let q: AwaitableQueue<i32> = AwaitableQueue::new();
    q.send_slice(slice_of(&[1, 2, 3, 4, 5]));
    q.close();

    let mut buf = [0i32; 3];
    let first = q.read(&mut buf);
    assert_eq!(first.filled, 3);
    assert!(!first.end);
    assert_eq!(&buf, &[1, 2, 3]);

    let second = q.read(&mut buf);
    assert_eq!(second.filled, 2);
    assert!(second.end);
    assert_eq!(&buf[..2], &[4, 5]);
}

/// S6: wait cycle across a blocking consumer thread.
#[test]
fn s6_wait_cycle() {
    let q: Arc<AwaitableQueue<i32>> = Arc::new(AwaitableQueue::new());

    let consumer_q = Arc::clone(&q);
    let consumer = thread::spawn(move || consumer_q.await_value());

    thread::sleep(std::time::Duration::from_millis(30));
    q.send(99);

    assert_eq!(consumer.join().unwrap(), (Some(99), true));

    q.close();
    assert_eq!(q.await_value(), (None, false));
}

/// A consumer already parked in `await_value` on an empty, open queue
/// must wake promptly when `close()` fires, not merely once its
/// blocking poll timeout next elapses.
#[test]
fn s6_close_wakes_consumer_parked_on_empty_queue() {
    let q: Arc<AwaitableQueue<i32>> = Arc::new(AwaitableQueue::new());

    let consumer_q = Arc::clone(&q);
    let consumer = thread::spawn(move || consumer_q.await_value());

    // Give the consumer time to actually park in the blocking wait
    // before close() fires.
    thread::sleep(std::time::Duration::from_millis(30));
    let closed_at = std::time::Instant::now();
    q.close();

    let result = consumer.join().unwrap();
    let elapsed = closed_at.elapsed();
    assert_eq!(result, (None, false));
    assert!(
        elapsed < std::time::Duration::from_millis(15),
        "consumer took {elapsed:?} to notice close; data_wait was not notified"
    );
}

/// P9: N producers, M consumers, bounded run, nothing lost, nothing
/// duplicated, and no deadlock (the join itself is the deadlock check).
#[test]
fn p9_stress_many_producers_many_consumers() {
    const PRODUCERS: usize = 6;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = 2000;

    let q: Arc<AwaitableQueue<u64>> = Arc::new(AwaitableQueue::new());
    let received_count = Arc::new(AtomicUsize::new(0));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    q.send((p * PER_PRODUCER + i) as u64);
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let q = Arc::clone(&q);
            let received_count = Arc::clone(&received_count);
            thread::spawn(move || loop {
                let (value, has_value) = q.await_value();
                match value {
                    Some(_) => {
                        assert!(has_value);
                        received_count.fetch_add(1, Ordering::Relaxed);
                    }
                    None => break,
                }
            })
        })
        .collect();

    for p in producers {
        p.join().unwrap();
    }
    q.close();
    for c in consumers {
        c.join().unwrap();
    }

    assert_eq!(
        received_count.load(Ordering::Relaxed),
        PRODUCERS * PER_PRODUCER
    );
    assert!(q.is_closed());
}
