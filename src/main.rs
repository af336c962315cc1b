use anyhow::Result;
use clap::Parser;
use lazy_proxy::config::{StressConfig, StressMode};
use lazy_proxy::stress;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of workers sharing a single proxy.
    #[arg(long, env = "LAZY_PROXY_THREADS", default_value_t = 10)]
    threads: usize,

    /// Number of rounds each worker runs.
    #[arg(long, env = "LAZY_PROXY_ITERATIONS", default_value_t = 100)]
    iterations: usize,

    /// What each round does before reading the proxy back.
    #[arg(long, env = "LAZY_PROXY_MODE", value_enum, default_value_t = StressMode::Replace)]
    mode: StressMode,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = StressConfig::default()
        .set_threads(args.threads)
        .set_iterations(args.iterations)
        .set_mode(args.mode);

    let report = stress::run(config).await?;
    println!("{report}");
    report.check()
}
