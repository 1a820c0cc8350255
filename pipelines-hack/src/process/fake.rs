//! Scripted [`CommandRunner`] for tests.

use super::{command_line, CommandError, CommandRunner};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A recorded invocation.
#[derive(Debug, Clone)]
pub(crate) struct Invocation {
    pub dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn command_line(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        command_line(&self.program, &args)
    }
}

/// Answers commands by command-line prefix; unmatched commands succeed with
/// empty output. The first matching rule wins.
#[derive(Debug, Default)]
pub(crate) struct FakeRunner {
    rules: Vec<(String, Result<String, String>)>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands starting with `prefix` succeed with `output`.
    pub fn respond(mut self, prefix: &str, output: &str) -> Self {
        self.rules.push((prefix.to_string(), Ok(output.to_string())));
        self
    }

    /// Commands starting with `prefix` fail with `output`.
    pub fn fail(mut self, prefix: &str, output: &str) -> Self {
        self.rules.push((prefix.to_string(), Err(output.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<String, CommandError> {
        let invocation = Invocation {
            dir: dir.to_path_buf(),
            program: program.to_string(),
            args: args.iter().map(|arg| (*arg).to_string()).collect(),
        };
        let line = invocation.command_line();
        self.calls.lock().unwrap().push(invocation);

        let rule = self
            .rules
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()));

        match rule {
            Some((_, Ok(output))) => Ok(output.clone()),
            Some((_, Err(output))) => Err(CommandError::Failed {
                dir: dir.display().to_string(),
                program: program.to_string(),
                args: args.iter().map(|arg| (*arg).to_string()).collect(),
                status: "exit status: 1".to_string(),
                output: output.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}
