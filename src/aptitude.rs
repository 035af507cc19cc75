/*============================================================
  Synavera Project: Apti
  Module: apti::aptitude
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Interface with aptitude, apt-cache, and dpkg to simulate
    operations, inspect the package database, and execute the
    confirmed command with the right privileges.

  Security / Safety Notes:
    Simulations run unprivileged. Confirmed commands escalate
    through sudo or su only for actions that need root, and
    arguments are passed as argv (quoted for su -c).

  Dependencies:
    tokio::process for async command execution, libc for the
    effective uid check.

  Operational Scope:
    Supplies raw plan text to the parser and carries out the
    operator's decision after the confirmation prompt.

  Revision History:
    2025-11-12 COD  Crafted aptitude/dpkg integration layer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic command invocation with explicit checks
    - Structured parsing with clear failure modes
    - Reusable helpers for external command diagnostics
============================================================*/

use std::collections::HashSet;
use std::io;
use std::process::{ExitStatus, Output, Stdio};

use tokio::process::Command;

use crate::error::{AptiError, Result};

/// aptitude actions that modify the system and therefore need root.
pub const SUPERUSER_ACTIONS: &[&str] = &[
    "install",
    "remove",
    "purge",
    "hold",
    "unhold",
    "keep",
    "reinstall",
    "markauto",
    "unmarkauto",
    "build-depends",
    "build-dep",
    "forbid-version",
    "update",
    "safe-upgrade",
    "full-upgrade",
    "keep-all",
    "forget-new",
    "clean",
    "autoclean",
];

/// Marker aptitude prints when it proposes dependency resolutions.
const DEPENDENCY_PROBLEM: &str = "1)";

/// An aptitude invocation: action plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AptitudeCommand {
    pub action: String,
    pub args: Vec<String>,
}

impl AptitudeCommand {
    pub fn new<S: Into<String>>(action: S, args: &[String]) -> Self {
        Self {
            action: action.into(),
            args: args.to_vec(),
        }
    }

    pub fn needs_superuser(&self) -> bool {
        SUPERUSER_ACTIONS.contains(&self.action.as_str())
    }

    /// Full argv starting with `aptitude`.
    pub fn argv(&self, assume_yes: bool) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 3);
        argv.push("aptitude".to_string());
        argv.push(self.action.clone());
        argv.extend(self.args.iter().cloned());
        if assume_yes {
            argv.push("--assume-yes".to_string());
        }
        argv
    }

    /// Rendered form used in logs.
    pub fn display(&self) -> String {
        self.argv(false).join(" ")
    }
}

/// How a privileged command is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    Direct,
    Sudo,
    Su,
}

impl Escalation {
    /// Program and arguments that run `argv` under this escalation.
    pub fn wrap(self, argv: Vec<String>) -> (String, Vec<String>) {
        match self {
            Escalation::Direct => {
                let mut argv = argv.into_iter();
                let program = argv.next().unwrap_or_default();
                (program, argv.collect())
            }
            Escalation::Sudo => ("sudo".to_string(), argv),
            Escalation::Su => {
                let line = argv
                    .iter()
                    .map(|arg| shell_quote(arg))
                    .collect::<Vec<_>>()
                    .join(" ");
                ("su".to_string(), vec!["-c".to_string(), line])
            }
        }
    }
}

fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.:/=+~,@".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Simulate `action` for `packages` with aptitude's verbose plan output.
pub async fn simulate(action: &str, packages: &[String], allow_untrusted: bool) -> Result<String> {
    let mut args = vec![action.to_string(), "-VZs".to_string()];
    if allow_untrusted {
        args.push("--allow-untrusted".to_string());
    }
    args.push("--assume-yes".to_string());
    args.extend(packages.iter().cloned());

    // aptitude exits non-zero when it cannot resolve; the text still matters.
    let output = run_capture("aptitude", &args).await?;
    if output.stdout.is_empty() && !output.status.success() {
        return Err(command_failure(&format!("aptitude {}", args.join(" ")), &output));
    }
    decode(&output.stdout, "aptitude")
}

/// True when aptitude proposes dependency resolutions instead of a plan.
pub fn has_dependency_problem(output: &str) -> bool {
    output.contains(DEPENDENCY_PROBLEM)
}

/// aptitude's closing size summary: the second-to-last non-blank line.
pub fn summary_line(output: &str) -> Option<&str> {
    let mut lines: Vec<&str> = output.lines().collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.len().checked_sub(2).map(|index| lines[index])
}

/// Check whether `apt-cache` knows `name` (architecture suffix allowed).
pub async fn package_exists(name: &str) -> Result<bool> {
    let output = run_capture("apt-cache", &["show".to_string(), name.to_string()]).await?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(mentions_package(&stdout, name))
}

fn mentions_package(apt_cache_show: &str, name: &str) -> bool {
    let bare = name.split(':').next().unwrap_or(name);
    apt_cache_show
        .lines()
        .any(|line| line.strip_prefix("Package: ") == Some(bare))
}

/// Names from `packages` that apt-cache does not know.
///
/// Returns nothing when any argument is an option (`-t sid`), since
/// option values cannot be told apart from package names.
pub async fn packages_not_found(packages: &[String]) -> Result<Vec<String>> {
    if packages.iter().any(|pkg| pkg.starts_with('-')) {
        return Ok(Vec::new());
    }
    let mut missing = Vec::new();
    for package in packages {
        if !package_exists(package).await? {
            missing.push(package.clone());
        }
    }
    Ok(missing)
}

/// Names of installed packages via `dpkg --get-selections`.
pub async fn installed_packages() -> Result<HashSet<String>> {
    let args = ["--get-selections".to_string()];
    let output = run_capture("dpkg", &args).await?;
    if !output.status.success() {
        return Err(command_failure("dpkg --get-selections", &output));
    }
    let stdout = decode(&output.stdout, "dpkg --get-selections")?;
    Ok(parse_selections(&stdout))
}

fn parse_selections(stdout: &str) -> HashSet<String> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            match fields.next() {
                Some("deinstall") => None,
                _ => Some(name.to_string()),
            }
        })
        .collect()
}

/// aptitude search listing in the given `-F` format.
pub async fn search(pattern: &[String], format: &str) -> Result<String> {
    let mut args = vec![
        "search".to_string(),
        "--disable-columns".to_string(),
        "-F".to_string(),
        format.to_string(),
    ];
    args.extend(pattern.iter().cloned());
    // No match is reported with status 1 and empty output.
    let output = run_capture("aptitude", &args).await?;
    decode(&output.stdout, "aptitude search")
}

/// Figures printed by the `stats` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub installed: usize,
    pub explicitly_installed: usize,
    pub cache_size: String,
}

/// Distribution description from `lsb_release -ds`.
pub async fn distribution() -> Result<String> {
    capture_trimmed("lsb_release", &["-ds"]).await
}

pub async fn stats() -> Result<Stats> {
    let installed = installed_packages().await?.len();
    let explicit = run_capture(
        "aptitude",
        &["search".to_string(), "~i !~M".to_string()],
    )
    .await?;
    let explicitly_installed = String::from_utf8_lossy(&explicit.stdout).lines().count();
    let cache = capture_trimmed("du", &["-sh", "/var/cache/apt/archives/"]).await?;
    let cache_size = cache.split_whitespace().next().unwrap_or_default().to_string();

    Ok(Stats {
        installed,
        explicitly_installed,
        cache_size,
    })
}

/// First line of `aptitude --version`, second word.
pub async fn aptitude_version() -> Result<String> {
    let version = capture_trimmed("aptitude", &["--version"]).await?;
    Ok(version
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string())
}

/// Pick how to run privileged commands for the current user.
pub async fn detect_escalation() -> Result<Escalation> {
    // SAFETY: geteuid has no preconditions and cannot fail.
    if unsafe { libc::geteuid() } == 0 {
        return Ok(Escalation::Direct);
    }
    let groups = capture_trimmed("groups", &[]).await?;
    if groups.split_whitespace().any(|group| group == "sudo") {
        Ok(Escalation::Sudo)
    } else {
        Ok(Escalation::Su)
    }
}

/// Run `command` interactively, escalating when the action needs root.
pub async fn execute(command: &AptitudeCommand, assume_yes: bool) -> Result<ExitStatus> {
    let escalation = if command.needs_superuser() {
        detect_escalation().await?
    } else {
        Escalation::Direct
    };
    let (program, args) = escalation.wrap(command.argv(assume_yes));
    Command::new(&program)
        .args(&args)
        .status()
        .await
        .map_err(|err| map_spawn_error(err, &program))
}

async fn run_capture(program: &str, args: &[String]) -> Result<Output> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|err| map_spawn_error(err, program))
}

async fn capture_trimmed(program: &str, args: &[&str]) -> Result<String> {
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    let output = run_capture(program, &args).await?;
    if !output.status.success() {
        return Err(command_failure(
            &format!("{program} {}", args.join(" ")),
            &output,
        ));
    }
    Ok(decode(&output.stdout, program)?.trim().to_string())
}

fn decode(bytes: &[u8], command: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|err| AptiError::Parse(format!("{command} emitted invalid UTF-8: {err}")))
}

fn command_failure(command: &str, output: &Output) -> AptiError {
    AptiError::CommandFailure {
        command: command.into(),
        status: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

fn map_spawn_error(err: io::Error, command: &str) -> AptiError {
    if err.kind() == io::ErrorKind::NotFound {
        AptiError::CommandMissing {
            command: command.into(),
        }
    } else {
        AptiError::Runtime(format!("Failed to spawn {command}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn superuser_actions() {
        assert!(AptitudeCommand::new("install", &[]).needs_superuser());
        assert!(AptitudeCommand::new("safe-upgrade", &[]).needs_superuser());
        assert!(!AptitudeCommand::new("show", &[]).needs_superuser());
        assert!(!AptitudeCommand::new("changelog", &[]).needs_superuser());
    }

    #[test]
    fn assume_yes_is_appended_last() {
        let command = AptitudeCommand::new("install", &strings(&["htop", "vim"]));
        assert_eq!(
            command.argv(true),
            strings(&["aptitude", "install", "htop", "vim", "--assume-yes"])
        );
        assert_eq!(command.display(), "aptitude install htop vim");
    }

    #[test]
    fn escalation_wrapping() {
        let argv = strings(&["aptitude", "install", "htop"]);
        assert_eq!(
            Escalation::Direct.wrap(argv.clone()),
            ("aptitude".to_string(), strings(&["install", "htop"]))
        );
        assert_eq!(
            Escalation::Sudo.wrap(argv.clone()),
            ("sudo".to_string(), argv.clone())
        );
        assert_eq!(
            Escalation::Su.wrap(strings(&["aptitude", "install", "it's"])),
            (
                "su".to_string(),
                strings(&["-c", r"aptitude install 'it'\''s'"])
            )
        );
    }

    #[test]
    fn summary_is_second_to_last_line() {
        let output = "The following NEW packages will be installed:\n  htop [3.2.2-2] <+387 kB>\n\
                      Need to get 152 kB of archives. After unpacking 387 kB will be used.\n\
                      Would download/install/remove packages.\n\n";
        assert_eq!(
            summary_line(output),
            Some("Need to get 152 kB of archives. After unpacking 387 kB will be used.")
        );
        assert_eq!(summary_line("only one line\n"), None);
    }

    #[test]
    fn dependency_problem_marker() {
        assert!(has_dependency_problem(
            "The following actions will resolve these dependencies:\n 1) Remove foo"
        ));
        assert!(!has_dependency_problem("htop [3.2.2-2] <+387 kB>"));
    }

    #[test]
    fn apt_cache_match_ignores_architecture() {
        let show = "Package: libc6\nVersion: 2.36-9\n";
        assert!(mentions_package(show, "libc6:amd64"));
        assert!(mentions_package(show, "libc6"));
        assert!(!mentions_package(show, "libc"));
        assert!(!mentions_package("", "libc6"));
    }

    #[test]
    fn selections_skip_deinstalled() {
        let stdout = "htop\t\t\t\t\tinstall\nold\t\t\t\t\tdeinstall\nvim\t\t\thold\n";
        let installed = parse_selections(stdout);
        assert!(installed.contains("htop"));
        assert!(installed.contains("vim"));
        assert!(!installed.contains("old"));
    }
}
