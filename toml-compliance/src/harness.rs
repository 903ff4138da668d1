//! Runs programs under test and classifies how they exited.
//!
//! A program receives its input on stdin and is judged on its exit status,
//! stdout and stderr. Whether a non-zero exit is a pass or a failure depends
//! on the [`Expectation`] of the case.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::error::{CheckError, ComplianceError};
use crate::failure::{Failure, FailureReason};

/// How a program is expected to treat its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Exit status zero and nothing on stderr.
    Clean,
    /// Any non-zero exit status.
    Rejection,
}

impl Expectation {
    /// `Clean` when `is_clean` holds, `Rejection` otherwise.
    #[must_use]
    pub const fn clean_if(is_clean: bool) -> Self {
        if is_clean { Self::Clean } else { Self::Rejection }
    }
}

/// Result of a run that met its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The program exited cleanly; holds its stdout verbatim.
    Accepted(Vec<u8>),
    /// The program rejected its input as expected.
    Rejected {
        /// Exit status reported by the program.
        status: ExitStatus,
    },
}

/// An executable program checked to exist before any case runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    path: Utf8PathBuf,
}

impl Program {
    /// Validates that `path` names an executable file.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::MissingExecutable`] when `path` is not a
    /// file and [`ComplianceError::NotExecutable`] when it lacks execute
    /// permission.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Result<Self, ComplianceError> {
        let path = path.into();
        ensure_executable(&path)?;
        Ok(Self { path })
    }

    /// Path as supplied by the user.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    // A bare name would be looked up on `PATH`; anchor it to the working
    // directory instead.
    fn command_path(&self) -> Utf8PathBuf {
        if self.path.is_relative() && self.path.components().count() == 1 {
            Utf8Path::new(".").join(&self.path)
        } else {
            self.path.clone()
        }
    }
}

/// Fails fast unless `path` is an existing executable file.
///
/// # Errors
///
/// Returns [`ComplianceError::MissingExecutable`] or
/// [`ComplianceError::NotExecutable`].
pub fn ensure_executable(path: &Utf8Path) -> Result<(), ComplianceError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(ComplianceError::MissingExecutable(path.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ComplianceError::MissingExecutable(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ComplianceError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if is_executable(&metadata) {
        Ok(())
    } else {
        Err(ComplianceError::NotExecutable(path.to_path_buf()))
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
const fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}

/// Everything a finished program produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Exit status of the program.
    pub status: ExitStatus,
    /// Bytes written to stdout.
    pub stdout: Vec<u8>,
    /// Bytes written to stderr.
    pub stderr: Vec<u8>,
}

impl Invocation {
    /// Requires a clean exit and hands back stdout.
    ///
    /// A non-zero exit and stderr output are reported together when both
    /// occur.
    ///
    /// # Errors
    ///
    /// Returns a [`Failure`] when the program exited non-zero or wrote to
    /// stderr.
    pub fn accept(self) -> Result<Vec<u8>, Failure> {
        let mut reasons = Vec::new();
        if !self.status.success() {
            reasons.push(FailureReason::UnexpectedRejection(describe_status(
                self.status,
            )));
        }
        if !self.stderr.is_empty() {
            reasons.push(FailureReason::UnexpectedStderr);
        }
        match Failure::from_reasons(reasons) {
            None => Ok(self.stdout),
            Some(failure) if self.stderr.is_empty() => Err(failure),
            Some(failure) => Err(failure.with_cause(stderr_text(&self.stderr))),
        }
    }

    /// Judges the invocation against `expectation`.
    ///
    /// # Errors
    ///
    /// Returns a [`Failure`] when the program did not behave as expected.
    pub fn classify(self, expectation: Expectation) -> Result<Outcome, Failure> {
        match expectation {
            Expectation::Clean => self.accept().map(Outcome::Accepted),
            Expectation::Rejection if self.status.success() => {
                Err(Failure::new(FailureReason::ExpectedRejectionMissing))
            }
            Expectation::Rejection => Ok(Outcome::Rejected {
                status: self.status,
            }),
        }
    }
}

fn describe_status(status: ExitStatus) -> String {
    status
        .code()
        .map_or_else(|| status.to_string(), |code| code.to_string())
}

fn stderr_text(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr).trim_end().to_owned()
}

/// Runs `program` with `input` on stdin and judges it against `expectation`.
///
/// # Errors
///
/// Returns [`CheckError::Failed`] when the program cannot be launched or
/// misbehaves, and [`CheckError::Fatal`] when its pipes cannot be serviced.
pub fn invoke(
    program: &Program,
    input: &[u8],
    expectation: Expectation,
) -> Result<Outcome, CheckError> {
    let invocation = run_logged(program, input, expectation)?;
    invocation.classify(expectation).map_err(CheckError::from)
}

/// Runs `program` with `input` on stdin, requiring a clean exit.
///
/// # Errors
///
/// As for [`invoke`] with [`Expectation::Clean`].
pub fn invoke_clean(program: &Program, input: &[u8]) -> Result<Vec<u8>, CheckError> {
    let invocation = run_logged(program, input, Expectation::Clean)?;
    invocation.accept().map_err(CheckError::from)
}

fn run_logged(
    program: &Program,
    input: &[u8],
    expectation: Expectation,
) -> Result<Invocation, CheckError> {
    let invocation = run(program, input)?;
    debug!(
        program = %program.path(),
        input_bytes = input.len(),
        status = %invocation.status,
        stdout_bytes = invocation.stdout.len(),
        stderr_bytes = invocation.stderr.len(),
        ?expectation,
        "program finished"
    );
    Ok(invocation)
}

/// Runs `program` to completion, feeding `input` and capturing both streams.
///
/// # Errors
///
/// Returns [`CheckError::Failed`] when the program cannot be spawned and
/// [`CheckError::Fatal`] when waiting or pipe I/O fails.
pub fn run(program: &Program, input: &[u8]) -> Result<Invocation, CheckError> {
    let child = spawn(program).map_err(|err| {
        Failure::new(FailureReason::Unlaunchable(program.path().to_path_buf())).with_cause(err)
    })?;
    let mut guard = ChildGuard::new(child);
    let io_error = |source| ComplianceError::Io {
        path: program.path().to_path_buf(),
        source,
    };

    let stdin_pipe = guard.child.stdin.take();
    let stdout_pipe = guard.child.stdout.take();
    let stderr_pipe = guard.child.stderr.take();

    let (status, stdout, stderr) = thread::scope(|scope| {
        let writer = stdin_pipe.map(|mut pipe| scope.spawn(move || write_input(&mut pipe, input)));
        let out_reader = stdout_pipe.map(|pipe| scope.spawn(move || drain(pipe)));
        let err_reader = stderr_pipe.map(|pipe| scope.spawn(move || drain(pipe)));

        let exit = guard.wait();
        let captured_out = join(out_reader);
        let captured_err = join(err_reader);
        let written = writer.map_or(Ok(()), |handle| {
            handle
                .join()
                .map_err(|_| io::Error::other("stdin writer thread panicked"))?
        });
        written.map(|()| (exit, captured_out, captured_err))
    })
    .map_err(io_error)?;

    Ok(Invocation {
        status: status.map_err(io_error)?,
        stdout: stdout.map_err(io_error)?,
        stderr: stderr.map_err(io_error)?,
    })
}

fn spawn(program: &Program) -> io::Result<Child> {
    Command::new(program.command_path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
}

fn write_input(pipe: &mut impl Write, input: &[u8]) -> io::Result<()> {
    match pipe.write_all(input).and_then(|()| pipe.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn drain(mut pipe: impl Read) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    pipe.read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn join(handle: Option<thread::ScopedJoinHandle<'_, io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    handle.map_or_else(
        || Ok(Vec::new()),
        |reader| {
            reader
                .join()
                .map_err(|_| io::Error::other("pipe reader thread panicked"))?
        },
    )
}

/// Owns a child process and reaps it on every exit path.
struct ChildGuard {
    child: Child,
    is_reaped: bool,
}

impl ChildGuard {
    const fn new(child: Child) -> Self {
        Self {
            child,
            is_reaped: false,
        }
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.is_reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.is_reaped {
            let _killed = self.child.kill();
            let _reaped = self.child.wait();
        }
    }
}
