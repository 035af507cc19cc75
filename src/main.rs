/*============================================================
  Synavera Project: Apti
  Module: apti::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Apti. Simulates aptitude operations, shows
    the plan as an aligned, colorized table, and re-invokes
    aptitude once the operator confirms.

  Security / Safety Notes:
    Simulations run with user privileges. Confirmed actions
    escalate through sudo or su only when aptitude needs root.

  Dependencies:
    clap for CLI parsing, tokio for subprocess orchestration,
    terminal_size for the render width snapshot.

  Operational Scope:
    Invoked interactively as a drop-in front-end for aptitude.

  Revision History:
    2025-10-28 COD  Authored runtime entry point.
    2025-11-12 COD  Rebuilt around the aptitude plan renderer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod aptitude;
mod config;
mod error;
mod layout;
mod locale;
mod logger;
mod palette;
mod plan;
mod prompt;
mod render;
mod search;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::{ExitCode, ExitStatus};

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use terminal_size::{terminal_size, Width};

use aptitude::AptitudeCommand;
use config::AptiConfig;
use error::{AptiError, Result};
use locale::{Language, Locale};
use logger::Logger;
use palette::{Palette, PlainPalette, ShellPalette};
use plan::{split_plan_lines, PlanParser};
use render::{Operation, RenderOptions, Renderer, Rendering};
use search::{parse_search, render_search, SEARCH_FORMAT};

/// Command-line arguments for Apti.
#[derive(Debug, Parser)]
#[command(
    name = "apti",
    author = "Synavera Systems",
    about = "Aligned, colorized front-end for aptitude",
    disable_version_flag = true
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH", global = true)]
    log: Option<PathBuf>,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    verbose: bool,
    /// Disable colors even on a terminal.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    no_color: bool,
    /// Print apti and aptitude versions.
    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    version: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Install packages.
    Install {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        packages: Vec<String>,
    },
    /// Remove packages.
    Remove {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        packages: Vec<String>,
    },
    /// Remove packages and their configuration files.
    Purge {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        packages: Vec<String>,
    },
    /// Upgrade without removing packages.
    SafeUpgrade {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        packages: Vec<String>,
    },
    /// Upgrade, removing packages if needed.
    FullUpgrade {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        packages: Vec<String>,
    },
    /// Deprecated alias of safe-upgrade.
    #[command(hide = true)]
    Upgrade {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        packages: Vec<String>,
    },
    /// Search packages.
    Search {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        pattern: Vec<String>,
    },
    /// Refresh package lists.
    Update,
    /// Show package statistics.
    Stats,
    /// Print apti and aptitude versions.
    Version,
    /// Any other aptitude command, passed through.
    #[command(external_subcommand)]
    Other(Vec<String>),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[apti] {}", err);
            err.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = AptiConfig::load_from_optional_path(cli.config.as_deref())?;
    let logger = Logger::for_session(cli.log.clone(), config.log_dir(), cli.verbose)?;
    logger.info("INIT", "Apti session opened.");

    let palette: Box<dyn Palette> = if cli.no_color || !io::stdout().is_terminal() {
        Box::new(PlainPalette)
    } else {
        Box::new(ShellPalette::from_config(&config.colors))
    };

    let app = App {
        locale: Locale::for_language(Language::from_env()),
        terminal_width: terminal_size().map(|(Width(width), _)| usize::from(width)),
        config,
        palette,
        logger,
    };

    let outcome = app.dispatch(&cli).await;
    if let Err(err) = &outcome {
        app.logger.error("FAIL", err.to_string());
    }
    app.logger.finalize()?;
    outcome
}

struct App {
    config: AptiConfig,
    locale: Locale,
    palette: Box<dyn Palette>,
    logger: Logger,
    terminal_width: Option<usize>,
}

impl App {
    async fn dispatch(&self, cli: &Cli) -> Result<ExitCode> {
        if cli.version {
            return self.version().await;
        }
        let Some(command) = &cli.command else {
            Cli::command().print_help()?;
            println!();
            return Ok(ExitCode::SUCCESS);
        };

        match command {
            Commands::Install { packages } => self.install(packages).await,
            Commands::Remove { packages } => self.remove(packages, false).await,
            Commands::Purge { packages } => self.remove(packages, true).await,
            Commands::SafeUpgrade { packages } => self.upgrade(packages, false).await,
            Commands::FullUpgrade { packages } => self.upgrade(packages, true).await,
            Commands::Upgrade { packages } => {
                println!("{}", self.locale.upgrade_deprecated);
                self.upgrade(packages, false).await
            }
            Commands::Search { pattern } => self.search(pattern).await,
            Commands::Update => self.run_aptitude(AptitudeCommand::new("update", &[]), false).await,
            Commands::Stats => self.stats().await,
            Commands::Version => self.version().await,
            Commands::Other(args) => match args.split_first() {
                Some((action, rest)) => {
                    self.run_aptitude(AptitudeCommand::new(action.as_str(), rest), false)
                        .await
                }
                None => Ok(ExitCode::SUCCESS),
            },
        }
    }

    async fn install(&self, packages: &[String]) -> Result<ExitCode> {
        self.ensure_known(packages).await?;

        let installed = aptitude::installed_packages().await?;
        if packages.iter().all(|package| installed.contains(package)) {
            return Err(AptiError::AlreadyInstalled(
                self.locale.packages_installed.to_string(),
            ));
        }

        let output = aptitude::simulate("install", packages, true).await?;
        if aptitude::has_dependency_problem(&output) {
            self.logger.warn("DEPS", "aptitude proposed dependency resolutions");
            print!("{output}");
            return Ok(ExitCode::from(1));
        }

        self.confirm_and_run(
            Operation::Install,
            &output,
            AptitudeCommand::new("install", packages),
        )
        .await
    }

    async fn remove(&self, packages: &[String], purge: bool) -> Result<ExitCode> {
        self.ensure_known(packages).await?;

        if !purge {
            let installed = aptitude::installed_packages().await?;
            if packages.iter().all(|package| !installed.contains(package)) {
                return Err(AptiError::NotInstalled(
                    self.locale.packages_not_installed.to_string(),
                ));
            }
        }

        let (action, operation) = if purge {
            ("purge", Operation::Purge)
        } else {
            ("remove", Operation::Remove)
        };
        let output = aptitude::simulate(action, packages, false).await?;

        // Dependency problems, wrong names, and virtual packages.
        if aptitude::has_dependency_problem(&output) || output.contains('«') {
            print!("{output}");
            return Ok(ExitCode::SUCCESS);
        }
        if !output.contains(':') {
            println!("{}", self.locale.package_not_installed);
            return Ok(ExitCode::SUCCESS);
        }

        let output = output.replace("{p}", "");
        self.confirm_and_run(operation, &output, AptitudeCommand::new(action, packages))
            .await
    }

    async fn upgrade(&self, packages: &[String], full: bool) -> Result<ExitCode> {
        let action = if full { "full-upgrade" } else { "safe-upgrade" };
        let command = AptitudeCommand::new(action, packages);
        let output = aptitude::simulate(action, packages, true).await?;

        if aptitude::has_dependency_problem(&output) {
            self.logger
                .warn("DEPS", "Handing dependency resolution over to aptitude");
            self.run_aptitude(command, false).await?;
            return Ok(ExitCode::SUCCESS);
        }
        if !output.contains(':') {
            println!("{}", self.locale.system_up_to_date);
            return Ok(ExitCode::SUCCESS);
        }

        self.confirm_and_run(Operation::Upgrade, &output, command).await
    }

    async fn ensure_known(&self, packages: &[String]) -> Result<()> {
        let missing = aptitude::packages_not_found(packages).await?;
        if missing.is_empty() {
            return Ok(());
        }
        self.logger
            .debug("PKG404", format!("Unknown packages: {}", missing.join(", ")));
        Err(AptiError::PackagesNotFound(format!(
            "{} {}",
            self.locale.packages_not_found,
            missing.join(" ")
        )))
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            display_size: self.config.display_size,
            column_gap: self.config.spaces.columns,
            unit_gap: self.config.spaces.unit,
            terminal_width: self.terminal_width,
        }
    }

    async fn confirm_and_run(
        &self,
        operation: Operation,
        output: &str,
        command: AptitudeCommand,
    ) -> Result<ExitCode> {
        let parser = PlanParser::new(&self.locale)?;
        let records = parser.parse_all(split_plan_lines(output));
        self.logger.debug(
            "PLAN",
            format!("{} package records for `{}`", records.len(), command.display()),
        );

        let renderer = Renderer::new(&self.locale, self.palette.as_ref(), self.render_options());
        let rendering = renderer.render(&records, operation, aptitude::summary_line(output));

        let confirmed = match rendering {
            Rendering::NothingToDo => {
                self.logger.warn("EMPTY", "No explicit change in plan");
                println!("{}", self.locale.nothing_to_do);
                return Ok(ExitCode::from(1));
            }
            Rendering::Plan { lines, question } => {
                {
                    let mut stdout = io::stdout().lock();
                    for line in &lines {
                        writeln!(stdout, "{line}")?;
                    }
                    writeln!(stdout)?;
                    stdout.flush()?;
                }
                prompt::confirm(&question)?
            }
        };

        if !confirmed {
            self.logger.info("ABORT", "Operator declined the plan");
            return Ok(ExitCode::SUCCESS);
        }
        self.run_aptitude(command, self.config.no_confirm).await
    }

    async fn run_aptitude(&self, command: AptitudeCommand, assume_yes: bool) -> Result<ExitCode> {
        self.logger
            .info("EXEC", format!("Running `{}`", command.display()));
        let status = aptitude::execute(&command, assume_yes).await?;
        if !status.success() {
            self.logger.warn(
                "EXEC",
                format!("`{}` exited with {status}", command.display()),
            );
        }
        Ok(exit_code_for(status))
    }

    async fn search(&self, pattern: &[String]) -> Result<ExitCode> {
        let output = aptitude::search(pattern, SEARCH_FORMAT).await?;
        let entries = parse_search(&output);
        self.logger
            .debug("SEARCH", format!("{} results", entries.len()));
        let lines = render_search(
            &entries,
            self.palette.as_ref(),
            self.config.spaces.search,
            self.terminal_width,
        );
        let mut stdout = io::stdout().lock();
        for line in lines {
            writeln!(stdout, "{line}")?;
        }
        Ok(ExitCode::SUCCESS)
    }

    async fn stats(&self) -> Result<ExitCode> {
        let distribution = describe_distribution(aptitude::distribution().await, &self.logger);
        let stats = aptitude::stats().await?;
        println!("{distribution}\n");
        println!("{} {}", self.locale.stat_total_installed, stats.installed);
        println!(
            "{} {}",
            self.locale.stat_explicitly_installed, stats.explicitly_installed
        );
        println!("{} {}", self.locale.stat_cache_size, stats.cache_size);
        Ok(ExitCode::SUCCESS)
    }

    async fn version(&self) -> Result<ExitCode> {
        println!("apti {}", env!("CARGO_PKG_VERSION"));
        println!("{}", self.locale.using);
        println!("  aptitude {}", aptitude::aptitude_version().await?);
        Ok(ExitCode::SUCCESS)
    }
}

/// Distribution name for `stats`; a missing `lsb_release` is logged, not fatal.
fn describe_distribution(outcome: Result<String>, logger: &Logger) -> String {
    outcome.unwrap_or_else(|err| {
        logger.warn("STATS", format!("Distribution name unavailable: {err}"));
        String::new()
    })
}

fn exit_code_for(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::from(1),
    }
}
