//! Stub programs for exercising the process harness.
//!
//! Scripts are plain `/bin/sh` files, so these helpers are Unix-only in
//! practice.

#[cfg(unix)]
use std::io;
#[cfg(unix)]
use std::process::{Command, Stdio};
#[cfg(unix)]
use std::thread;
#[cfg(unix)]
use std::time::Duration;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

#[cfg(unix)]
const READY_ATTEMPTS: u32 = 50;
#[cfg(unix)]
const READY_DELAY: Duration = Duration::from_millis(10);

/// Temporary directory holding stub programs.
#[derive(Debug)]
pub struct ProgramDir {
    _temp: TempDir,
    path: Utf8PathBuf,
}

impl ProgramDir {
    /// Creates an empty program directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create program directory")?;
        let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|path| anyhow::anyhow!("non-UTF-8 temp path: {}", path.display()))?;
        Ok(Self { _temp: temp, path })
    }

    /// Directory the programs live in.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Writes an executable `/bin/sh` script running `body`.
    ///
    /// Returns once the script can be executed. A test thread that forks
    /// while the script is open for writing holds it busy until its child
    /// execs, so the script is run once with empty stdin until that clears.
    ///
    /// # Errors
    ///
    /// Returns an error when the script cannot be written, made executable
    /// or run.
    pub fn script(&self, name: &str, body: &str) -> Result<Utf8PathBuf> {
        let path = self.file(name, &format!("#!/bin/sh\n{body}"))?;
        make_executable(&path)?;
        wait_until_runnable(&path)?;
        Ok(path)
    }

    /// Writes a plain, non-executable file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn file(&self, name: &str, content: &str) -> Result<Utf8PathBuf> {
        let path = self.path.join(name);
        std::fs::write(&path, content).with_context(|| format!("write {path}"))?;
        Ok(path)
    }
}

#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("chmod {path}"))
}

#[cfg(not(unix))]
fn make_executable(_path: &Utf8Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn wait_until_runnable(path: &Utf8Path) -> Result<()> {
    for _ in 0..READY_ATTEMPTS {
        let ran = Command::new(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match ran {
            Err(err) if err.kind() == io::ErrorKind::ExecutableFileBusy => {
                thread::sleep(READY_DELAY);
            }
            other => {
                other.with_context(|| format!("run {path}"))?;
                return Ok(());
            }
        }
    }
    anyhow::bail!("{path} stayed busy after {READY_ATTEMPTS} attempts")
}

#[cfg(not(unix))]
fn wait_until_runnable(_path: &Utf8Path) -> Result<()> {
    Ok(())
}
