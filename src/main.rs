use crate::args::Args;
use crate::copy::copy_repository;
use crate::docker::Docker;
use crate::reference::Reference;
use anyhow::{bail, Context, Result};
use std::process::ExitCode;
use tracing::{error, info, warn, Level};

mod args;
mod copy;
mod docker;
mod reference;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::new();
    configure_tracing(args.debug, args.trace);

    if !args.apply {
        warn!("Dry run is enabled. No images will be copied!");
    }

    let start = time::Instant::now();

    let code = match process(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    };

    let delta = time::Instant::now() - start;
    info!("Done. Took {}", fmt_duration(delta));
    code
}

fn fmt_duration(duration: time::Duration) -> String {
    if duration.whole_seconds() > 0 {
        format!("{}s", duration.whole_seconds())
    } else if duration.whole_milliseconds() > 0 {
        format!("{}ms", duration.whole_milliseconds())
    } else {
        format!("{}µs", duration.whole_microseconds())
    }
}

async fn process(args: Args) -> Result<()> {
    let source = Reference::parse(&args.source)
        .with_context(|| format!("invalid source reference {:?}", args.source))?;
    let destination = Reference::parse(&args.destination)
        .with_context(|| format!("invalid destination reference {:?}", args.destination))?;

    let report = copy_repository(&Docker, &source, &destination, args.apply).await?;

    if args.apply {
        info!(
            "Copied {} of {} tags",
            report.planned.len() - report.failed.len(),
            report.planned.len()
        );
    } else if !report.planned.is_empty() {
        info!(
            "Planned {} copies. Re-run with --apply to perform them",
            report.planned.len()
        );
    }

    if !report.failed.is_empty() {
        warn!("The following images failed to copy:");
        for failure in &report.failed {
            warn!("- {} ({:#})", failure.image, failure.cause);
        }
        bail!(
            "{} of {} tags failed to copy",
            report.failed.len(),
            report.planned.len()
        );
    }

    Ok(())
}

fn configure_tracing(debug: bool, trace: bool) {
    let level = if trace {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Setting tracing subscriber");
}

#[cfg(test)]
mod tests {
    use super::fmt_duration;

    #[test]
    fn formats_durations_in_the_largest_whole_unit() {
        assert_eq!(fmt_duration(time::Duration::seconds(90)), "90s");
        assert_eq!(fmt_duration(time::Duration::milliseconds(250)), "250ms");
        assert_eq!(fmt_duration(time::Duration::microseconds(42)), "42µs");
    }
}
