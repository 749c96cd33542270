//! Recording `CommandRunner` stub for tests.
//!
//! Replies are keyed by the invoked program's file name (`/opt/conda/bin/conda`
//! matches `conda`). Several replies for one program are served in order and
//! the last one repeats. Unknown programs fail to spawn, like a missing binary.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use envprobe_core::ports::{CommandOutput, CommandRunner, Invocation, RunError};

type ReplyFn = Arc<dyn Fn(&Invocation) -> Result<CommandOutput, RunError> + Send + Sync>;

#[derive(Clone)]
enum Reply {
    Output(CommandOutput),
    SpawnFailure,
    Timeout,
    Func(ReplyFn),
}

/// A runner that records invocations and answers from a script.
#[derive(Default)]
pub struct RecordingRunner {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn respond(self, program: &str, output: CommandOutput) -> Self {
        self.push(program, Reply::Output(output))
    }

    #[must_use]
    pub fn respond_fn<F>(self, program: &str, f: F) -> Self
    where
        F: Fn(&Invocation) -> Result<CommandOutput, RunError> + Send + Sync + 'static,
    {
        self.push(program, Reply::Func(Arc::new(f)))
    }

    #[must_use]
    pub fn fail_spawn(self, program: &str) -> Self {
        self.push(program, Reply::SpawnFailure)
    }

    #[must_use]
    pub fn fail_timeout(self, program: &str) -> Self {
        self.push(program, Reply::Timeout)
    }

    fn push(self, program: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(program.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Every invocation seen so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Program file names of every invocation, in order.
    pub fn programs(&self) -> Vec<String> {
        self.calls().iter().map(program_key).collect()
    }

    fn next_reply(&self, program: &str) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = replies.get_mut(program)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

fn program_key(invocation: &Invocation) -> String {
    Path::new(&invocation.program)
        .file_name()
        .map_or_else(
            || invocation.program.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, RunError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation.clone());

        let program = program_key(invocation);
        match self.next_reply(&program) {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::Func(f)) => f(invocation),
            Some(Reply::Timeout) => Err(RunError::Timeout {
                program,
                timeout: invocation.timeout,
            }),
            Some(Reply::SpawnFailure) | None => Err(RunError::Spawn {
                program,
                reason: "No such file or directory (os error 2)".to_string(),
            }),
        }
    }
}
