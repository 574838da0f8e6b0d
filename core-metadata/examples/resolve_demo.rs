//! Resolves lyrics and composers for one song from the command line.
//!
//! ```text
//! cargo run -p core-metadata --example resolve_demo -- "Imagine" "John Lennon"
//! SONGMETA_LYRICS_PROVIDERS=genius,azlyrics RUST_LOG=debug cargo run ...
//! ```
//!
//! Configuration comes from `SONGMETA_*` environment variables. Ctrl-C
//! cancels the in-flight resolution; each content kind gets a 30 second
//! deadline.

use anyhow::{bail, Context};
use core_async::{timeout, CancellationToken, Duration};
use core_metadata::{ContentKind, MetadataResolutionService, ResolutionMode, SongQuery};
use core_runtime::config::ResolverConfig;
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};

const DEADLINE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let level = std::env::var("SONGMETA_LOG_LEVEL")
        .ok()
        .map(|raw| raw.parse::<LogLevel>())
        .transpose()?
        .unwrap_or(LogLevel::Info);

    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(level),
    )?;

    let mut args = std::env::args().skip(1);
    let (Some(title), Some(performer)) = (args.next(), args.next()) else {
        bail!("usage: resolve_demo <title> <performer> [more performers...] [--fan-out]");
    };

    let mut performers = vec![performer];
    let mut mode = ResolutionMode::Sequential;
    for arg in args {
        if arg == "--fan-out" {
            mode = ResolutionMode::FanOut;
        } else {
            performers.push(arg);
        }
    }

    let config = ResolverConfig::from_env().context("invalid SONGMETA_* configuration")?;
    tracing::info!(config = ?config, "Loaded configuration");

    let service = MetadataResolutionService::from_config(&config)?.with_mode(mode);
    let query = SongQuery::new(title, performers);

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    core_async::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    for kind in [ContentKind::Lyrics, ContentKind::Composers] {
        let Ok(resolution) = timeout(DEADLINE, service.resolve(kind, &query, &token)).await else {
            println!("\n{} lookup exceeded {:?}.\n", kind, DEADLINE);
            continue;
        };
        let resolution = resolution?;

        for attempt in &resolution.attempts {
            println!("[{}] {:<14} {:?}", kind, attempt.provider.display_name(), attempt.status);
        }

        match (resolution.provider(), resolution.text()) {
            (Some(provider), Some(text)) => {
                println!("\n{} from {}:\n{}\n", kind, provider.display_name(), text)
            }
            _ => println!("\nNo {} found.\n", kind),
        }
    }

    Ok(())
}
