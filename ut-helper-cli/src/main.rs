use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ut_helper_core::{execute_ut_helper_flow, style, CoreCliArgs};

#[tokio::main]
async fn main() {
    let cli_args = CoreCliArgs::parse();

    // logging goes to stderr so generated tests on stdout stay clean
    let filter = if cli_args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = execute_ut_helper_flow(cli_args).await {
        eprintln!(
            "{} {} {}",
            style("❌"),
            style("ut-helper failed:").red().bold(),
            style(format!("{e:#}")).red()
        );
        std::process::exit(1);
    }
}
