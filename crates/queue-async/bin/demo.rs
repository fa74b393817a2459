//! Demonstration of the queue-async Stream adapter.
//!
//! Run with: `cargo run -p queue-async --bin demo`

use awaitable_queue::QueueConfig;
use queue_async::{channel, channel_with_stream_config, StreamConfig, StreamExt};
use std::time::Duration;
use tokio::time::timeout;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== queue-async Demo ===\n");

    demo_basic_usage().await?;
    demo_multiple_producers().await?;
    demo_configuration_presets().await?;
    demo_graceful_shutdown().await?;

    println!("\n=== All demos completed successfully! ===");
    Ok(())
}

/// Demo 1: basic channel creation and send/receive.
async fn demo_basic_usage() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 1: Basic Usage ---");

    let (tx, mut rx) = channel::<u64>(QueueConfig::default());

    let producer = tokio::spawn(async move {
        for i in 0..5 {
            tx.send(i);
            println!("  Sent: {i}");
        }
        tx.close();
    });

    let mut count = 0;
    while let Ok(Some(item)) = timeout(Duration::from_millis(200), rx.next()).await {
        println!("  Received: {item}");
        count += 1;
    }

    producer.await?;
    println!("  received {count} items total");
    println!("  done\n");
    Ok(())
}

/// Demo 2: multiple producers sharing one send handle, no registration.
async fn demo_multiple_producers() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 2: Multiple Producers ---");

    let (tx, mut rx) = channel::<String>(QueueConfig::default());

    let tx1 = std::sync::Arc::clone(&tx);
    let tx2 = std::sync::Arc::clone(&tx);
    let tx3 = std::sync::Arc::clone(&tx);

    let p1 = tokio::spawn(async move {
        for i in 0..3 {
            tx1.send(format!("P1-{i}"));
        }
    });
    let p2 = tokio::spawn(async move {
        for i in 0..3 {
            tx2.send(format!("P2-{i}"));
        }
    });
    let p3 = tokio::spawn(async move {
        for i in 0..3 {
            tx3.send(format!("P3-{i}"));
        }
    });

    let _ = tokio::join!(p1, p2, p3);
    tx.close();

    let mut received = Vec::new();
    while let Some(item) = rx.next().await {
        received.push(item);
    }

    println!("  received {} items: {:?}", received.len(), received);
    println!("  done\n");
    Ok(())
}

/// Demo 3: stream configuration presets.
async fn demo_configuration_presets() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 3: Configuration Presets ---");

    let low_latency = StreamConfig::low_latency();
    println!(
        "  low-latency: poll_interval={:?}, batch_hint={}",
        low_latency.poll_interval, low_latency.batch_hint
    );

    let (tx, mut rx) = channel_with_stream_config::<u64>(QueueConfig::default(), low_latency);
    tx.send(1);
    tx.close();
    if let Some(v) = rx.next().await {
        println!("  received {v} with low-latency config");
    }

    let high_throughput = StreamConfig::high_throughput();
    println!(
        "  high-throughput: poll_interval={:?}, batch_hint={}",
        high_throughput.poll_interval, high_throughput.batch_hint
    );

    let (tx, mut rx) =
        channel_with_stream_config::<u64>(QueueConfig::default(), high_throughput);
    for i in 0..10 {
        tx.send(i);
    }
    tx.close();

    let mut count = 0;
    while rx.next().await.is_some() {
        count += 1;
    }
    println!("  received {count} items with high-throughput config");
    println!("  done\n");
    Ok(())
}

/// Demo 4: graceful shutdown via `ShutdownSignal`.
async fn demo_graceful_shutdown() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 4: Graceful Shutdown ---");

    let (tx, rx) = channel::<u64>(QueueConfig::default());
    let shutdown_signal = rx.shutdown_signal();

    let signal_for_producer = shutdown_signal.clone();
    let producer = tokio::spawn(async move {
        let mut sent = 0u64;
        loop {
            if signal_for_producer.is_shutdown() {
                println!("  producer observed shutdown after {sent} sends");
                break;
            }
            tx.send(sent);
            sent += 1;
            tokio::task::yield_now().await;
        }
        sent
    });

    let consumer = tokio::spawn(async move {
        let mut rx = rx;
        let mut received = 0u64;
        while rx.next().await.is_some() {
            received += 1;
        }
        println!("  consumer received {received} items before stream ended");
        received
    });

    tokio::time::sleep(Duration::from_millis(20)).await;

    println!("  triggering shutdown via ShutdownSignal...");
    shutdown_signal.shutdown();

    let (sent, received) = tokio::join!(producer, consumer);
    let sent = sent?;
    let received = received?;

    println!("  final: sent={sent}, received={received}");
    println!("  done (all in-flight items drained)\n");
    Ok(())
}
