use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::config::Defaults;
use cli::{Args, Settings};

fn main() -> anyhow::Result<()> {
    let defaults = Defaults::from_env().context("failed to read maze settings from the environment")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::resolve(&args, &defaults);

    let report = cli::run(&settings).with_context(|| {
        format!(
            "failed to build a {}x{} maze",
            settings.rows, settings.cols
        )
    })?;

    let output = cli::render(&report, args.format, args.color).context("failed to render maze")?;
    println!("{}", output);

    if let Some(prefix) = &args.png {
        let (plain, solved) = report
            .save_images(prefix, args.cell_size)
            .with_context(|| format!("failed to write images to {}", prefix.display()))?;
        eprintln!("Saved {} and {}", plain.display(), solved.display());
    }

    Ok(())
}
