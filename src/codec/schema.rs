//! Serde-facing document types for the workflow YAML schema, plus the
//! normalization between the document's flexible shapes and the canonical
//! model. Import accepts every legacy shape (flat env maps, space-separated
//! param strings, scalar `depends`, bare-string preconditions); export always
//! emits the canonical one.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::ParseError;
use crate::model::{
    ContinueOn, EnvVar, INTERPRETER_COMMAND, MailOn, Param, Precondition, RetryPolicy, SHELL_COMMAND,
    ScriptKind, Step, WorkflowMetadata,
};

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// A field that may appear as a single value or a sequence of values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// `env` as an array of single-key maps or a flat map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum EnvDoc {
    Pairs(Vec<Mapping>),
    Map(Mapping),
}

/// `params` as an array of single-key maps or a space-separated string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum ParamsDoc {
    Pairs(Vec<Mapping>),
    Inline(String),
}

/// A precondition entry: a bare condition string or the full form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum PreconditionDoc {
    Bare(String),
    Full {
        condition: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        expected: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RetryPolicyDoc {
    pub limit: u32,
    pub interval_sec: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ContinueOnDoc {
    #[serde(skip_serializing_if = "is_false")]
    pub failure: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub skipped: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub mark_success: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct MailOnDoc {
    #[serde(skip_serializing_if = "is_false")]
    pub success: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub failure: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct StepDoc {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends: Option<OneOrMany<String>>,
    #[serde(alias = "precondition", skip_serializing_if = "Option::is_none")]
    pub preconditions: Option<OneOrMany<PreconditionDoc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicyDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_on: Option<ContinueOnDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_on: Option<MailOnDoc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WorkflowDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<OneOrMany<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_sec: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_sec: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hist_retention_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<EnvDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ParamsDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_on: Option<MailOnDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepDoc>>,
}

pub(crate) fn parse_document(yaml: &str) -> Result<WorkflowDoc, ParseError> {
    if yaml.trim().is_empty() {
        return Err(ParseError::EmptyDocument);
    }
    serde_yaml::from_str(yaml).map_err(|e| ParseError::Yaml(e.to_string()))
}

// --- Value / literal conversions ---------------------------------------------

/// Renders a YAML scalar as the editor's display literal: numbers stay
/// unquoted, everything else gains surrounding double quotes.
pub(crate) fn literal_from_value(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => format!("\"{b}\""),
        Value::String(s) => ensure_quoted(s),
        _ => String::from("\"\""),
    }
}

/// Inverse of [`literal_from_value`]: numeric-looking literals become YAML
/// numbers, everything else becomes a string with the convenience quotes
/// stripped.
pub(crate) fn value_from_literal(literal: &str) -> Value {
    if let Ok(n) = literal.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = literal.parse::<f64>() {
        return Value::Number(serde_yaml::Number::from(f));
    }
    Value::String(strip_quotes(literal).to_string())
}

fn ensure_quoted(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        raw.to_string()
    } else {
        format!("\"{raw}\"")
    }
}

fn strip_quotes(raw: &str) -> &str {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn single_key_map(name: &str, value: Value) -> Mapping {
    let mut map = Mapping::new();
    map.insert(Value::String(name.to_string()), value);
    map
}

// --- Workflow-level conversions ----------------------------------------------

impl EnvDoc {
    pub(crate) fn into_env_vars(self) -> Vec<EnvVar> {
        let entries = |map: Mapping| {
            map.into_iter()
                .filter_map(|(k, v)| {
                    k.as_str().map(|name| EnvVar {
                        name: name.to_string(),
                        value: scalar_to_string(&v),
                    })
                })
                .collect::<Vec<_>>()
        };
        match self {
            EnvDoc::Map(map) => entries(map),
            EnvDoc::Pairs(pairs) => pairs.into_iter().flat_map(entries).collect(),
        }
    }

    pub(crate) fn from_env_vars(env: &[EnvVar]) -> Option<Self> {
        if env.is_empty() {
            return None;
        }
        Some(EnvDoc::Pairs(
            env.iter()
                .map(|e| single_key_map(&e.name, Value::String(e.value.clone())))
                .collect(),
        ))
    }
}

impl ParamsDoc {
    pub(crate) fn into_params(self) -> Vec<Param> {
        match self {
            ParamsDoc::Pairs(pairs) => pairs
                .into_iter()
                .flat_map(|map| map.into_iter())
                .filter_map(|(k, v)| {
                    k.as_str().map(|name| Param {
                        name: name.to_string(),
                        default: literal_from_value(&v),
                    })
                })
                .collect(),
            ParamsDoc::Inline(text) => text
                .split_whitespace()
                .enumerate()
                .map(|(index, token)| match token.split_once('=') {
                    Some((name, value)) => Param {
                        name: name.to_string(),
                        default: literal_from_value(&Value::String(value.to_string())),
                    },
                    // Positional parameters are numbered from one.
                    None => Param {
                        name: (index + 1).to_string(),
                        default: literal_from_value(&Value::String(token.to_string())),
                    },
                })
                .collect(),
        }
    }

    pub(crate) fn from_params(params: &[Param]) -> Option<Self> {
        if params.is_empty() {
            return None;
        }
        Some(ParamsDoc::Pairs(
            params
                .iter()
                .map(|p| single_key_map(&p.name, value_from_literal(&p.default)))
                .collect(),
        ))
    }
}

impl MailOnDoc {
    fn into_mail_on(self) -> MailOn {
        MailOn {
            success: self.success,
            failure: self.failure,
        }
    }

    fn from_mail_on(mail_on: &MailOn) -> Option<Self> {
        mail_on.any().then_some(MailOnDoc {
            success: mail_on.success,
            failure: mail_on.failure,
        })
    }
}

pub(crate) fn metadata_from_doc(doc: &WorkflowDoc) -> WorkflowMetadata {
    WorkflowMetadata {
        name: doc.name.clone().unwrap_or_default(),
        description: doc.description.clone().unwrap_or_default(),
        params: doc
            .params
            .clone()
            .map(ParamsDoc::into_params)
            .unwrap_or_default(),
        env: doc
            .env
            .clone()
            .map(EnvDoc::into_env_vars)
            .unwrap_or_default(),
        mail_on: doc
            .mail_on
            .map(MailOnDoc::into_mail_on)
            .unwrap_or_default(),
        schedule: match &doc.schedule {
            Some(OneOrMany::One(expr)) => expr.clone(),
            Some(OneOrMany::Many(exprs)) => exprs.first().cloned().unwrap_or_default(),
            None => String::new(),
        },
        timeout_sec: doc.timeout_sec,
        delay_sec: doc.delay_sec,
        hist_retention_days: doc.hist_retention_days,
    }
}

pub(crate) fn document_from(metadata: &WorkflowMetadata, steps: Vec<Step>) -> WorkflowDoc {
    let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
    WorkflowDoc {
        name: non_empty(&metadata.name),
        description: non_empty(&metadata.description),
        schedule: non_empty(&metadata.schedule).map(OneOrMany::One),
        timeout_sec: metadata.timeout_sec,
        delay_sec: metadata.delay_sec,
        hist_retention_days: metadata.hist_retention_days,
        env: EnvDoc::from_env_vars(&metadata.env),
        params: ParamsDoc::from_params(&metadata.params),
        mail_on: MailOnDoc::from_mail_on(&metadata.mail_on),
        steps: Some(steps.into_iter().map(StepDoc::from_step).collect()),
    }
}

// --- Step conversions --------------------------------------------------------

impl PreconditionDoc {
    fn into_precondition(self) -> Precondition {
        match self {
            PreconditionDoc::Bare(condition) => Precondition {
                condition,
                expected: None,
            },
            PreconditionDoc::Full {
                condition,
                expected,
            } => Precondition {
                condition,
                expected,
            },
        }
    }
}

impl StepDoc {
    pub(crate) fn into_step(self) -> Step {
        let command = self.command.unwrap_or_default();
        let mut tokens = command.split_whitespace();
        let program = tokens.next().unwrap_or_default();
        let argument = tokens.collect::<Vec<_>>().join(" ");

        let (script_kind, script, interpreter_ref) = if self.run.is_some() {
            // A sub-workflow step carries no program of its own.
            (ScriptKind::Shell, None, None)
        } else if program.is_empty() || program == SHELL_COMMAND {
            (ScriptKind::Shell, self.script, None)
        } else if self.script.is_some() {
            (ScriptKind::Interpreted, self.script, None)
        } else {
            (
                ScriptKind::Interpreted,
                None,
                (!argument.is_empty()).then_some(argument),
            )
        };

        let mut step = Step {
            name: self.name,
            description: self.description,
            script_kind,
            script,
            interpreter_ref,
            run: self.run,
            params: self.params,
            output: self.output,
            depends_on: Vec::new(),
            preconditions: self
                .preconditions
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
                .into_iter()
                .map(PreconditionDoc::into_precondition)
                .collect(),
            retry_policy: self.retry_policy.map(|r| RetryPolicy {
                limit: r.limit,
                interval_sec: r.interval_sec,
            }),
            continue_on: self
                .continue_on
                .map(|c| ContinueOn {
                    failure: c.failure,
                    skipped: c.skipped,
                    mark_success: c.mark_success,
                })
                .unwrap_or_default(),
            mail_on: self
                .mail_on
                .map(MailOnDoc::into_mail_on)
                .unwrap_or_default(),
        };
        for name in self.depends.map(OneOrMany::into_vec).unwrap_or_default() {
            step.push_dependency(name);
        }
        step
    }

    pub(crate) fn from_step(step: Step) -> Self {
        // Sub-workflow steps are described entirely by `run`; everything else
        // gets its marker command back.
        let command = match (&step.run, step.script_kind) {
            (Some(_), _) => None,
            (None, ScriptKind::Shell) => Some(SHELL_COMMAND.to_string()),
            (None, ScriptKind::Interpreted) => Some(match &step.interpreter_ref {
                Some(reference) => format!("{INTERPRETER_COMMAND} {reference}"),
                None => INTERPRETER_COMMAND.to_string(),
            }),
        };
        StepDoc {
            name: step.name,
            description: step.description.filter(|d| !d.trim().is_empty()),
            command,
            script: step.script.filter(|s| !s.is_empty()),
            run: step.run,
            params: step.params.filter(|p| !p.trim().is_empty()),
            output: step.output.filter(|o| !o.trim().is_empty()),
            depends: (!step.depends_on.is_empty()).then_some(OneOrMany::Many(step.depends_on)),
            preconditions: (!step.preconditions.is_empty()).then(|| {
                OneOrMany::Many(
                    step.preconditions
                        .into_iter()
                        .map(|p| PreconditionDoc::Full {
                            condition: p.condition,
                            expected: p.expected,
                        })
                        .collect(),
                )
            }),
            retry_policy: step.retry_policy.filter(|r| r.limit > 0).map(|r| {
                RetryPolicyDoc {
                    limit: r.limit,
                    interval_sec: r.interval_sec,
                }
            }),
            continue_on: step.continue_on.any().then_some(ContinueOnDoc {
                failure: step.continue_on.failure,
                skipped: step.continue_on.skipped,
                mark_success: step.continue_on.mark_success,
            }),
            mail_on: MailOnDoc::from_mail_on(&step.mail_on),
        }
    }
}
