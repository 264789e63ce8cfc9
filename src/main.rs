use clap::Parser;
use ppl::Cli;
use ppl_tui::Outcome;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/ppl-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("ppl debug log started, tail -f /tmp/ppl-debug.log");
    }

    let config = cli.resolve_config()?;
    let directory = ppl::open_directory(&config)?;
    let selected = ppl::resolve_selection(&directory, &cli.select)?;
    let picker = ppl::build_picker(config.picker.to_options(), directory, selected);

    // Searches are spawned from the UI thread; keep a runtime entered for them.
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    match ppl_tui::run(picker, config.ui)? {
        Outcome::Submitted(people) => {
            println!("{}", serde_json::to_string_pretty(&people)?);
        }
        Outcome::Cancelled => tracing::info!("cancelled"),
    }
    Ok(())
}
