use std::io;

use strcache::metrics::{MetricsExporter, MetricsSnapshotProvider, PrometheusTextExporter};
use strcache::{ByteLfuBuilder, ByteSize};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strcache=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cache = ByteLfuBuilder::default()
        .byte_size(ByteSize::bytes(10))
        .seed(7)
        .build();

    cache.set("a", b"alpha").unwrap();
    cache.set("b", b"beta").unwrap();

    cache.get("a").unwrap();
    cache.set("c", b"gam").unwrap();

    println!("contains a? {}", cache.contains("a"));
    println!("contains b? {}", cache.contains("b"));
    println!("order: {:?}", cache.keys_by_frequency());
    println!("size: {} of {}", cache.size(), ByteSize::from(cache.capacity()));

    if let Err(err) = cache.set("huge", [0u8; 11]) {
        println!("rejected: {err}");
    }

    let exporter = PrometheusTextExporter::new("strcache", io::stdout());
    exporter.export(&cache.snapshot());
}

// Expected output (plus debug logs on stderr):
// contains a? true
// contains b? false
// order: ["c", "a"]
// size: 8 of 10 B
// rejected: no space: value of 11 bytes exceeds capacity of 10 bytes
// # TYPE strcache_get_calls_total counter
// ...
//
// Explanation: capacity=10 bytes; "a" is read before inserting "c", so "b"
// (score 1, the head) is evicted to make room.
