use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use is_root::is_root;

use crate::error::{CheckerError, CheckerResult};

pub const INSTALL_DIR: &str = "/usr/local/bin";
pub const EXECUTABLE_NAME: &str = "proxychecker";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(PathBuf),
    AlreadyInstalled(PathBuf),
}

pub trait Installer {
    fn install(&self) -> CheckerResult<InstallOutcome>;
}

/// Copies the running executable into a system binary directory.
#[derive(Debug, Clone)]
pub struct SelfInstaller {
    /// Binary to copy; `None` means the current executable.
    source: Option<PathBuf>,
    destination: PathBuf,
    overwrite: bool,
}

impl SelfInstaller {
    pub fn new(directory: impl AsRef<Path>, name: &str, overwrite: bool) -> Self {
        Self {
            source: None,
            destination: directory.as_ref().join(name),
            overwrite,
        }
    }

    #[cfg(test)]
    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    fn source_path(&self) -> CheckerResult<PathBuf> {
        match &self.source {
            Some(path) => Ok(path.clone()),
            None => env::current_exe().map_err(CheckerError::SelfPath),
        }
    }
}

impl Default for SelfInstaller {
    fn default() -> Self {
        Self::new(INSTALL_DIR, EXECUTABLE_NAME, false)
    }
}

impl Installer for SelfInstaller {
    fn install(&self) -> CheckerResult<InstallOutcome> {
        // A dangling symlink counts as installed; writing through it would
        // create its target.
        if !self.overwrite && fs::symlink_metadata(&self.destination).is_ok() {
            tracing::debug!(path = %self.destination.display(), "destination exists, skipping");
            return Ok(InstallOutcome::AlreadyInstalled(self.destination.clone()));
        }

        let exe = self.source_path()?;
        let content = fs::read(&exe).map_err(|source| CheckerError::SelfRead {
            path: exe.clone(),
            source,
        })?;

        warn_if_unprivileged();

        let to_error = |source| CheckerError::SelfWrite {
            path: self.destination.clone(),
            source,
        };
        fs::write(&self.destination, &content).map_err(to_error)?;
        set_executable(&self.destination).map_err(to_error)?;

        tracing::info!(
            from = %exe.display(),
            to = %self.destination.display(),
            bytes = content.len(),
            "installed executable"
        );
        Ok(InstallOutcome::Installed(self.destination.clone()))
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

fn warn_if_unprivileged() {
    if !is_root() {
        tracing::warn!("not running as root, writing to a system directory will likely fail");
    }
}
