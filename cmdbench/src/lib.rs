#![warn(missing_docs)]
//! cmdbench CLI
//!
//! Ties flag parsing, configuration, progress rendering and output
//! together around the core benchmark runner. Use [`run`] from the binary
//! entry point.

mod command;
mod config;
mod output;
mod progress;

pub use command::{default_shell, Invocation};
pub use config::{BenchConfig, Settings};
pub use output::{format_result, format_summary};

use anyhow::Context;
use clap::Parser;
use cmdbench_core::{BenchError, BenchmarkResult, BenchmarkRunner, CancelToken, OsProcessTimer};
use colored::Colorize;

/// cmdbench CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "cmdbench")]
#[command(author, version, about = "Measure and compare the execution time of shell commands")]
pub struct Cli {
    /// Commands to benchmark, one benchmark per command string
    #[arg(required = true)]
    pub commands: Vec<String>,

    /// Number of measured runs per command
    #[arg(long, default_value_t = 10)]
    pub runs: u64,

    /// Number of warmup runs before measurement
    #[arg(long, default_value_t = 0)]
    pub warmup: u64,

    /// Command to run once before all benchmarks
    #[arg(long)]
    pub setup: Option<String>,

    /// Run commands directly instead of through an intermediate shell
    #[arg(short = 'N', long)]
    pub no_shell: bool,

    /// The intermediate shell to run commands in
    #[arg(short = 'S', long)]
    pub shell: Option<String>,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the cmdbench CLI. This is the binary entry point.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the cmdbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("cmdbench=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("cmdbench=warn")
            .init();
    }

    // cmdbench.toml provides defaults; CLI flags override.
    let config = BenchConfig::discover().unwrap_or_default();
    let settings = build_settings(&cli, &config);

    if settings.no_color {
        colored::control::set_override(false);
    }

    let token = CancelToken::new();
    interrupt::install(token.clone());

    if let Some(setup) = &settings.setup {
        run_setup(setup)?;
    }

    tracing::debug!(
        runs = settings.runs,
        warmup = settings.warmup,
        shell = settings.shell.as_deref().unwrap_or("<none>"),
        "resolved settings"
    );

    let mut results: Vec<BenchmarkResult> = Vec::new();
    for (index, raw) in cli.commands.iter().enumerate() {
        println!("Benchmark #{}: {}", index + 1, raw.bold());

        let invocation = match &settings.shell {
            Some(shell) => Invocation::via_shell(shell, raw),
            None => Invocation::direct(raw),
        };
        let invocation = match invocation {
            Ok(invocation) => invocation,
            Err(err) => {
                eprintln!("An error occurred during benchmark: {err}");
                continue;
            }
        };

        let mut runner =
            BenchmarkRunner::new(OsProcessTimer::new(), settings.warmup, settings.runs);
        let bar = progress::MeasureBar::new(settings.runs);
        let outcome = runner.run(&token, raw, &invocation.program, &invocation.args, |p| {
            bar.update(p)
        });

        match outcome {
            Ok(result) => {
                bar.finish();
                print!("{}", output::format_result(&result));
                println!();
                results.push(result);
            }
            Err(BenchError::Cancelled) => {
                bar.abandon();
                eprintln!("Benchmark cancelled; discarding partial measurements");
                // Results completed before the interrupt stay valid.
                break;
            }
            Err(err @ BenchError::Config(_)) => {
                bar.abandon();
                return Err(err.into());
            }
            Err(err) => {
                bar.abandon();
                // One failing command does not stop the rest of the batch.
                eprintln!("An error occurred during benchmark: {err}");
            }
        }
    }

    if results.len() > 1 {
        print!("{}", output::format_summary(&results));
    }

    Ok(())
}

/// Layer `cmdbench.toml` values under explicitly passed CLI flags.
fn build_settings(cli: &Cli, config: &BenchConfig) -> Settings {
    // clap defaults are runs=10, warmup=0; a differing CLI value was set
    // explicitly and wins over the config file.
    let runs = if cli.runs != 10 {
        cli.runs
    } else {
        config.runner.runs
    };
    let warmup = if cli.warmup != 0 {
        cli.warmup
    } else {
        config.runner.warmup
    };

    let no_shell = cli.no_shell || config.runner.no_shell;
    let shell = if no_shell {
        None
    } else {
        Some(
            cli.shell
                .clone()
                .or_else(|| config.runner.shell.clone())
                .unwrap_or_else(|| default_shell().to_string()),
        )
    };

    Settings {
        runs,
        warmup,
        shell,
        setup: cli.setup.clone(),
        no_color: cli.no_color || config.output.no_color,
    }
}

/// Run the setup command once before all benchmarks, inheriting stdio.
fn run_setup(setup: &str) -> anyhow::Result<()> {
    let invocation = Invocation::direct(setup).context("invalid setup command")?;
    let status = std::process::Command::new(&invocation.program)
        .args(&invocation.args)
        .status()
        .with_context(|| format!("failed to launch setup command '{setup}'"))?;
    if !status.success() {
        anyhow::bail!("setup command '{setup}' exited with {status}");
    }
    Ok(())
}

#[cfg(unix)]
mod interrupt {
    //! SIGINT wiring: the first Ctrl-C cancels the shared token so the
    //! in-flight child is terminated and partial samples are discarded.

    use cmdbench_core::CancelToken;
    use std::sync::OnceLock;

    static TOKEN: OnceLock<CancelToken> = OnceLock::new();

    extern "C" fn handle_sigint(_signal: libc::c_int) {
        // Only an atomic store happens here; async-signal-safe.
        if let Some(token) = TOKEN.get() {
            token.cancel();
        }
    }

    pub fn install(token: CancelToken) {
        if TOKEN.set(token).is_ok() {
            // SAFETY: replacing the default SIGINT disposition with a
            // handler that touches nothing but an atomic flag.
            unsafe {
                libc::signal(
                    libc::SIGINT,
                    handle_sigint as extern "C" fn(libc::c_int) as libc::sighandler_t,
                );
            }
        }
    }
}

#[cfg(not(unix))]
mod interrupt {
    use cmdbench_core::CancelToken;

    pub fn install(_token: CancelToken) {}
}
