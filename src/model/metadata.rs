use serde::{Deserialize, Serialize};

use crate::model::MailOn;

/// A positional or named workflow parameter with its default value.
///
/// The default is kept as a *display literal*: numeric values stay unquoted
/// (`42`, `3.14`) while everything else carries surrounding double quotes.
/// This is the convention used by the visual editor's text fields, not a
/// semantic interpretation of the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub default: String,
}

/// One workflow-level environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// Workflow-level settings that live outside the step list.
///
/// `schedule` is a cron expression; an empty string means the workflow has no
/// configured schedule (a webhook-style trigger). The `timeout_sec`,
/// `delay_sec` and `hist_retention_days` fields mirror the workflow tuning
/// knobs of the configuration panel and pass through the codec untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    pub name: String,
    pub description: String,
    pub params: Vec<Param>,
    pub env: Vec<EnvVar>,
    pub mail_on: MailOn,
    pub schedule: String,
    pub timeout_sec: Option<u32>,
    pub delay_sec: Option<u32>,
    pub hist_retention_days: Option<u32>,
}
