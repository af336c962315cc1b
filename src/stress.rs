use crate::config::{StressConfig, StressMode};
use crate::factory::Factory;
use crate::proxy::LazyProxy;
use anyhow::{Result, anyhow};
use log::{debug, info};
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

const SEAL: usize = 0x9e37_79b9;

/// A value whose two halves must always agree. A read that observes them
/// disagreeing saw a partially written value.
#[derive(Debug)]
pub struct Payload {
    id: usize,
    seal: usize,
}

impl Payload {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            seal: id ^ SEAL,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_intact(&self) -> bool {
        self.id ^ SEAL == self.seal
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StressReport {
    pub calls: usize,
    pub factory_invocations: usize,
    pub generations: u64,
    pub torn_reads: usize,
    pub elapsed: Duration,
}

impl StressReport {
    pub fn check(&self) -> Result<()> {
        if self.torn_reads > 0 {
            return Err(anyhow!("{} reads observed a torn value", self.torn_reads));
        }
        if self.factory_invocations as u64 > self.generations {
            return Err(anyhow!(
                "{} factory invocations across only {} unresolved generations",
                self.factory_invocations,
                self.generations
            ));
        }
        Ok(())
    }
}

impl Display for StressReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} calls, {} factory invocations, {} generations, {} torn reads in {:?}",
            self.calls, self.factory_invocations, self.generations, self.torn_reads, self.elapsed
        )
    }
}

#[derive(Debug, Default)]
struct WorkerStats {
    calls: usize,
    torn_reads: usize,
}

fn counting_factory(ids: &Arc<AtomicUsize>, invocations: &Arc<AtomicUsize>) -> Factory<Payload> {
    let ids = ids.clone();
    let invocations = invocations.clone();
    Factory::infallible(move || {
        invocations.fetch_add(1, Ordering::SeqCst);
        Payload::new(ids.fetch_add(1, Ordering::Relaxed))
    })
    .named("counting_factory")
}

fn work(
    proxy: &LazyProxy<Payload>,
    config: StressConfig,
    ids: &Arc<AtomicUsize>,
    invocations: &Arc<AtomicUsize>,
) -> Result<WorkerStats> {
    let mut stats = WorkerStats::default();
    for _ in 0..config.iterations {
        match config.mode {
            StressMode::Replace => proxy.set_value(Payload::new(ids.fetch_add(1, Ordering::Relaxed))),
            StressMode::Resolve => proxy.set_factory(counting_factory(ids, invocations)),
            StressMode::Reset => proxy.reset()?,
        }
        let payload = proxy.get()?;
        if !payload.is_intact() {
            stats.torn_reads += 1;
        }
        stats.calls += 1;
    }
    Ok(stats)
}

/// Hammers one shared proxy from `config.threads` blocking workers.
pub async fn run(config: StressConfig) -> Result<StressReport> {
    let ids = Arc::new(AtomicUsize::new(1));
    let invocations = Arc::new(AtomicUsize::new(0));
    let proxy = Arc::new(match config.mode {
        StressMode::Reset => LazyProxy::new(None, Some(counting_factory(&ids, &invocations))),
        StressMode::Replace | StressMode::Resolve => LazyProxy::from_value(Payload::new(0)),
    });

    info!(
        "starting {} stress: {} threads x {} iterations",
        config.mode, config.threads, config.iterations
    );
    let start = Instant::now();
    let mut workers = JoinSet::new();
    for worker in 0..config.threads {
        let proxy = proxy.clone();
        let ids = ids.clone();
        let invocations = invocations.clone();
        workers.spawn_blocking(move || {
            let stats = work(&proxy, config, &ids, &invocations);
            debug!("worker {worker} finished");
            stats
        });
    }

    let mut report = StressReport::default();
    while let Some(joined) = workers.join_next().await {
        let stats = joined??;
        report.calls += stats.calls;
        report.torn_reads += stats.torn_reads;
    }
    report.elapsed = start.elapsed();
    report.factory_invocations = invocations.load(Ordering::SeqCst);
    report.generations = proxy.generation();
    info!("finished {} stress: {report}", config.mode);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload() {
        let payload = Payload::new(42);
        assert_eq!(payload.id(), 42);
        assert!(payload.is_intact());
    }

    #[test]
    fn test_torn_payload() {
        let payload = Payload { id: 1, seal: 2 };
        assert!(!payload.is_intact());
    }

    #[test]
    fn test_check_passes() {
        let report = StressReport {
            calls: 10,
            factory_invocations: 3,
            generations: 3,
            ..Default::default()
        };
        assert!(report.check().is_ok());
    }

    #[test]
    fn test_check_torn_reads() {
        let report = StressReport {
            torn_reads: 1,
            ..Default::default()
        };
        assert!(report.check().is_err());
    }

    #[test]
    fn test_check_extra_invocations() {
        let report = StressReport {
            factory_invocations: 4,
            generations: 3,
            ..Default::default()
        };
        assert!(report.check().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_replace() {
        let config = StressConfig::default();
        let report = run(config).await.unwrap();
        assert_eq!(report.calls, config.total_calls());
        assert_eq!(report.factory_invocations, 0);
        assert_eq!(report.torn_reads, 0);
        report.check().unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_resolve() {
        let config = StressConfig::default().set_mode(StressMode::Resolve);
        let report = run(config).await.unwrap();
        assert_eq!(report.calls, config.total_calls());
        assert_eq!(report.generations, config.total_calls() as u64);
        assert!(report.factory_invocations >= 1);
        report.check().unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reset() {
        let config = StressConfig::default()
            .set_mode(StressMode::Reset)
            .set_threads(4)
            .set_iterations(50);
        let report = run(config).await.unwrap();
        assert_eq!(report.calls, 200);
        assert_eq!(report.generations, 201);
        assert!(report.factory_invocations >= 1);
        report.check().unwrap();
    }

    #[tokio::test]
    async fn test_no_threads() {
        let report = run(StressConfig::default().set_threads(0)).await.unwrap();
        assert_eq!(report.calls, 0);
        assert_eq!(report.generations, 0);
    }
}
