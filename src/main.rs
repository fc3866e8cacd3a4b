use clap::Parser;
use tracing_subscriber::EnvFilter;
use ui_sweep::cli::commands::{cmd_plan, cmd_run};
use ui_sweep::cli::config::{Cli, Commands, RunArgs, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run {
            url,
            mode,
            profile,
            max_pages,
            max_depth,
            manual_auth,
            headed,
            format,
            output,
            trace,
        } => {
            let args = RunArgs {
                url,
                mode,
                profile,
                max_pages,
                max_depth,
                manual_auth,
                headed,
                format,
                output,
                trace,
            };
            let all_passed = cmd_run(&args, &config)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Plan { url, output } => {
            cmd_plan(&url, output.as_deref(), &config)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from warn.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
