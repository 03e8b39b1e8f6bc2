use std::path::Path;
use std::process::ExitCode;

use colored::*;

use crate::checker::{Checker, ScanSummary};
use crate::cli::Cli;
use crate::config::{Config, Settings};
use crate::error::{CheckerError, CheckerResult};
use crate::installer::{InstallOutcome, Installer, SelfInstaller};
use crate::output::ProxyListWriter;
use crate::prober::{Prober, TcpProber};
use crate::report::{stdout_reporter, Reporter};
use crate::targets::load_targets;

pub const USAGE: &str = "Usage: proxychecker [OPTIONS] <TARGET_FILE>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
    Usage,
}

impl Exit {
    pub fn code(self) -> ExitCode {
        match self {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::from(1),
            Exit::Usage => ExitCode::from(2),
        }
    }
}

fn fail(error: CheckerError) -> Exit {
    tracing::debug!(?error, "run aborted");
    println!("{} {}", "Error:".red().bold(), error);
    Exit::Failure
}

fn load_settings(cli: &Cli) -> CheckerResult<Settings> {
    let config = Config::load(cli.config.as_deref())?;
    Settings::resolve(config, cli)
}

pub async fn run(cli: &Cli) -> Exit {
    if cli.install {
        let settings = match load_settings(cli) {
            Ok(settings) => settings,
            Err(e) => return fail(e),
        };
        let installer = SelfInstaller::new(
            &settings.install_dir,
            &settings.executable_name,
            settings.overwrite,
        );
        tracing::debug!(destination = %installer.destination().display(), "installing");
        return install(&installer);
    }

    // Nothing is read from disk before a target file is known.
    let Some(target_file) = cli.target_file.as_deref() else {
        println!("{}", USAGE);
        return Exit::Usage;
    };

    let settings = match load_settings(cli) {
        Ok(settings) => settings,
        Err(e) => return fail(e),
    };

    let prober = TcpProber::new(settings.timeout);
    let mut reporter = stdout_reporter(settings.color);

    match scan(target_file, &settings, &prober, reporter.as_mut()).await {
        Ok(_) => Exit::Success,
        Err(e) => fail(e),
    }
}

pub fn install(installer: &dyn Installer) -> Exit {
    println!("Installing the program...");

    match installer.install() {
        Ok(InstallOutcome::Installed(path)) => {
            println!("Installation complete: {}", path.display());
            Exit::Success
        }
        Ok(InstallOutcome::AlreadyInstalled(path)) => {
            println!("Already installed at {}", path.display());
            Exit::Success
        }
        Err(e) => fail(e),
    }
}

/// Check every target in `target_file` and write the reachable ones.
///
/// Returns `None` when the file holds no usable target; nothing is written
/// in that case.
pub async fn scan(
    target_file: &Path,
    settings: &Settings,
    prober: &dyn Prober,
    reporter: &mut dyn Reporter,
) -> CheckerResult<Option<ScanSummary>> {
    let targets = load_targets(target_file)?;

    if targets.is_empty() {
        println!("No targets found in the file.");
        return Ok(None);
    }

    println!("Starting proxy checking...");
    tracing::debug!(count = targets.len(), timeout = ?settings.timeout, "checking targets");

    let summary = Checker::new(prober, reporter).check_all(&targets).await;

    println!(
        "Proxy checking complete. {}/{} reachable in {:.2}s",
        summary.reachable.len(),
        summary.total,
        summary.elapsed_secs()
    );

    let writer = ProxyListWriter::new(settings.proxy_type, settings.output_file.clone());
    writer.write(&summary.reachable)?;
    println!("Working proxies saved to file: {}", writer.path().display());

    Ok(Some(summary))
}
