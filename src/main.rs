use vanilla_bs::config::AppConfig;
use vanilla_bs::report;

fn main() {
    // Logs go to stderr; stdout carries only the JSON report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("vanilla_bs starting");

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        strike = cfg.grid.strike,
        rate = cfg.grid.risk_free_rate,
        volatility = cfg.grid.volatility,
        steps = cfg.grid.steps,
        "config loaded"
    );

    let report = match report::build_report(&cfg) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("pricing error: {e}");
            std::process::exit(1);
        }
    };

    match report.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("serialization error: {e}");
            std::process::exit(1);
        }
    }

    tracing::info!("vanilla_bs done");
}
