/// concierge-resolver - resolve identity keys from the command line
use clap::Parser;
use concierge_resolver::{error::ResolverResult, metrics, ProfileResolver, ResolverConfig};
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "concierge-resolver")]
#[command(about = "Resolve wallet addresses, domains, handles and aliases into profiles")]
struct Cli {
    /// Address of the asking actor (used by aliases such as @me)
    #[arg(long = "as", env = "RESOLVER_ACTOR_ADDRESS")]
    actor_address: Option<String>,

    /// Print Prometheus metrics after resolving
    #[arg(long)]
    metrics: bool,

    /// Identity keys to resolve
    #[arg(required = true)]
    keys: Vec<String>,
}

#[tokio::main]
async fn main() -> ResolverResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = ResolverConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("concierge_resolver={}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let resolver = ProfileResolver::from_config(&config)?;

    let mut out = std::io::stdout().lock();
    for key in &cli.keys {
        let profile = resolver.resolve(key, cli.actor_address.as_deref()).await;
        writeln!(out, "{}", serde_json::to_string_pretty(&profile)?)?;
    }

    if cli.metrics {
        write!(out, "{}", metrics::render_metrics())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actor_and_keys() {
        let cli = Cli::try_parse_from([
            "concierge-resolver",
            "--as",
            "0x1111111111111111111111111111111111111111",
            "@me",
            "vitalik.eth",
        ])
        .unwrap();

        assert_eq!(
            cli.actor_address.as_deref(),
            Some("0x1111111111111111111111111111111111111111")
        );
        assert_eq!(cli.keys, vec!["@me", "vitalik.eth"]);
        assert!(!cli.metrics);
    }

    #[test]
    fn test_metrics_flag() {
        let cli = Cli::try_parse_from(["concierge-resolver", "--metrics", "saul"]).unwrap();
        assert!(cli.metrics);
        assert_eq!(cli.keys, vec!["saul"]);
    }

    #[test]
    fn test_requires_a_key() {
        assert!(Cli::try_parse_from(["concierge-resolver"]).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["concierge-resolver", "--bogus", "saul"]).is_err());
    }
}
