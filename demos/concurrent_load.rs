use std::sync::Arc;
use std::time::Instant;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use env_log_layer::init::LoggerConfig;
use env_log_layer::layer::Logger;
use env_log_layer::sink::MemorySink;

#[tokio::main]
async fn main() {
    let sink = MemorySink::new();
    let logger = Logger::with_sink(&LoggerConfig::from_env(), Arc::new(sink.clone()));
    let written = Arc::clone(&logger.written_lines);
    if tracing::subscriber::set_global_default(Registry::default().with(logger)).is_err() {
        eprintln!("a global subscriber is already installed");
        return;
    }

    let tasks: u64 = 8;
    let per_task: u64 = 10_000;
    let start = Instant::now();

    let handles: Vec<_> = (0..tasks)
        .map(|task| {
            tokio::spawn(async move {
                let err = std::io::Error::new(std::io::ErrorKind::Other, "simulated");
                for i in 0..per_task {
                    error!(task, iteration = i, cause = &err as &(dyn std::error::Error + 'static), "load test error");
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.await;
    }

    let elapsed = start.elapsed();
    let n = written.load(std::sync::atomic::Ordering::Relaxed);
    println!("sent {} events in {:?} (~{:.0} ev/s), {} lines buffered",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64(),
        sink.lines().len()
    );
}
