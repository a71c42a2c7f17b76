use serde::{Deserialize, Serialize};

/// The literal command that marks a step as a plain shell invocation.
pub const SHELL_COMMAND: &str = "bash";

/// The literal command that marks a step as running through an interpreter.
pub const INTERPRETER_COMMAND: &str = "python";

/// How a step's program text is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScriptKind {
    /// The step body is an inline shell script.
    #[default]
    Shell,
    /// The step runs through an interpreter, either with an inline body or a
    /// named script file reference.
    Interpreted,
}

/// A gating check attached to a step, evaluated before the step may run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precondition {
    pub condition: String,
    pub expected: Option<String>,
}

impl Precondition {
    pub fn new(condition: impl Into<String>, expected: Option<&str>) -> Self {
        Self {
            condition: condition.into(),
            expected: expected.map(str::to_string),
        }
    }
}

/// Retry behavior for a failing step. A limit of zero means no retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub limit: u32,
    pub interval_sec: u32,
}

/// Continuation flags controlling whether downstream steps still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContinueOn {
    pub failure: bool,
    pub skipped: bool,
    pub mark_success: bool,
}

impl ContinueOn {
    pub fn any(&self) -> bool {
        self.failure || self.skipped || self.mark_success
    }
}

/// Mail notification flags, used per step and at the workflow level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MailOn {
    pub success: bool,
    pub failure: bool,
}

impl MailOn {
    pub fn any(&self) -> bool {
        self.success || self.failure
    }
}

/// The canonical in-memory representation of one workflow step.
///
/// `depends_on` holds step *names*; in document form they cross-reference the
/// `name` field of other steps. Duplicate entries are never stored; insertion
/// order is preserved for round-trip stability.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub description: Option<String>,
    pub script_kind: ScriptKind,
    /// Inline program body. Mutually exclusive with `interpreter_ref`.
    pub script: Option<String>,
    /// Named script file for interpreted steps (e.g. a python file).
    pub interpreter_ref: Option<String>,
    /// Name of another workflow to run in place of a command. When set, the
    /// script fields are unused.
    pub run: Option<String>,
    /// Parameter string passed to the sub-workflow named by `run`.
    pub params: Option<String>,
    /// Variable name that receives the step's output.
    pub output: Option<String>,
    pub depends_on: Vec<String>,
    pub preconditions: Vec<Precondition>,
    pub retry_policy: Option<RetryPolicy>,
    pub continue_on: ContinueOn,
    pub mail_on: MailOn,
}

impl Step {
    /// Records a dependency on another step by name, ignoring duplicates.
    pub fn push_dependency(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.depends_on.contains(&name) {
            self.depends_on.push(name);
        }
    }
}
