use std::collections::HashSet;
use std::sync::Arc;

use env_log_layer::init::LoggerConfig;
use env_log_layer::layer::Logger;
use env_log_layer::sink::MemorySink;
use tracing::{error, Dispatch};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_events_produce_whole_lines() {
    let sink = MemorySink::new();
    let logger = Logger::with_sink(&LoggerConfig::default(), Arc::new(sink.clone()));
    let dispatch = Dispatch::new(Registry::default().with(logger));

    let tasks = 8u64;
    let per_task = 200u64;
    let handles: Vec<_> = (0..tasks)
        .map(|task| {
            let dispatch = dispatch.clone();
            tokio::spawn(async move {
                tracing::dispatcher::with_default(&dispatch, || {
                    let err = std::io::Error::new(std::io::ErrorKind::Other, "worker\n  failed");
                    for i in 0..per_task {
                        error!(task, i, cause = &err as &(dyn std::error::Error + 'static), "tick");
                    }
                });
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let lines = sink.lines();
    assert_eq!(lines.len() as u64, tasks * per_task);

    let mut seen = HashSet::new();
    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["error"], "worker | failed");
        let key = (value["task"].as_u64().unwrap(), value["i"].as_u64().unwrap());
        assert!(seen.insert(key));
    }
}
