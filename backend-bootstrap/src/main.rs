use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "embercall-backend")]
#[command(about = "Embercall Retention Backend", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("EMBERCALL_CONFIG", config);
    }

    // File logging must be wired before anything emits; the log dir can only
    // come from the environment here since config loads later.
    let _log_guard = match std::env::var("EMBERCALL_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, "embercall.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(env_filter()).init();
            None
        }
    };

    backend_bootstrap::run_standalone().await
}
