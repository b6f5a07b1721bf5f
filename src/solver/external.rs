use std::{
    io::Read,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread::{self, sleep},
    time::{Duration, Instant},
};

use log::{debug, info};

use super::{SolverOracle, SolverResponse};
use crate::errors::{CliqueSatError, Result};

/// Runs a solver binary as `<binary> <args...> <cnf file>` and interprets its exit status
/// (10 = SAT, 20 = UNSAT) and `v` lines.
#[derive(Clone, Debug)]
pub struct ExternalSolver {
    binary: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ExternalSolver {
    pub fn new(binary: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            args,
            timeout: None,
        }
    }

    /// Glucose-style invocation: `-model -verb=<verbosity>`
    pub fn glucose(solver: &str, verbosity: u8) -> Self {
        Self::new(
            Self::resolve_binary(solver),
            vec!["-model".into(), format!("-verb={verbosity}")],
        )
    }

    /// Kills the solver and fails with [`CliqueSatError::SolverTimeout`] once `timeout` elapsed
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// A bare name refers to `./<name>` if such a file exists and is looked up in `PATH`
    /// otherwise; anything containing a path separator is taken verbatim.
    pub fn resolve_binary(solver: &str) -> PathBuf {
        let path = PathBuf::from(solver);
        if path.components().count() > 1 {
            return path;
        }

        let local = Path::new(".").join(&path);
        if local.is_file() { local } else { path }
    }
}

impl SolverOracle for ExternalSolver {
    fn submit(&mut self, cnf_path: &Path, _cnf_text: &[u8]) -> Result<SolverResponse> {
        let start = Instant::now();
        debug!("Invoke {:?} {:?} {:?}", self.binary, self.args, cnf_path);

        let mut command = Command::new(&self.binary);
        command
            .args(&self.args)
            .arg(cnf_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped());

        // separate process group; a ctrl-c on the terminal must not reach the solver
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|source| CliqueSatError::SolverUnavailable {
                binary: self.binary.clone(),
                source,
            })?;

        // drain STDOUT concurrently; a chatty solver would otherwise block on a full pipe
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("Failed to take STDOUT"))?;
        let reader = thread::spawn(move || -> std::io::Result<Vec<u8>> {
            let mut received = Vec::new();
            stdout.read_to_end(&mut received)?;
            Ok(received)
        });

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }

            let elapsed = start.elapsed();
            if let Some(timeout) = self.timeout {
                if elapsed > timeout {
                    info!("Kill solver after {elapsed:?}");
                    child.kill()?;
                    child.wait()?;
                    return Err(CliqueSatError::SolverTimeout(timeout));
                }
            }

            if elapsed.as_millis() < 1000 {
                sleep(Duration::from_millis(5));
            } else {
                sleep(Duration::from_millis(100));
            }
        };

        let received = reader
            .join()
            .map_err(|_| std::io::Error::other("STDOUT reader panicked"))??;
        let output = String::from_utf8_lossy(&received).into_owned();

        info!(
            "Solver finished with {:?} after {:?}",
            status.code(),
            start.elapsed()
        );

        SolverResponse::from_exit_code(status.code(), output)
    }
}
