// src/interact.rs

//! User interaction primitives: transient notifications and modal requests.
//!
//! All user-visible outcomes flow through a single [`Notifier`] slot
//! (message + severity, auto-dismissed after a fixed duration, manually
//! dismissible). Blocking questions are modeled as a tagged
//! [`ModalRequest`]; an implementation resolves one request at a time, so
//! two modals can never overlap.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// How long a notification stays visible without manual dismissal.
pub const NOTIFICATION_TTL_SECS: i64 = 4;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub expires_at: DateTime<Utc>,
}

/// Single-slot transient notification channel. Pushing replaces whatever is
/// currently shown.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification, replacing the current one.
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        self.current = Some(Notification {
            message: message.into(),
            severity,
            expires_at: Utc::now() + chrono::Duration::seconds(NOTIFICATION_TTL_SECS),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error);
    }

    /// The visible notification, if it has not expired.
    pub fn current(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.current.as_ref().filter(|n| n.expires_at > now)
    }

    /// Manual dismissal.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Take the pending notification regardless of expiry (CLI drain).
    pub fn take(&mut self) -> Option<Notification> {
        self.current.take()
    }
}

/// A pending modal interaction. Only one may be active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalRequest {
    /// Ask for a line of text.
    Prompt {
        title: String,
        message: Option<String>,
        default_value: String,
    },
    /// Ask a yes/no question.
    Confirm {
        title: String,
        message: Option<String>,
    },
    /// Announce something; only acknowledgement possible.
    Alert {
        title: String,
        message: Option<String>,
    },
}

/// Resolution of a [`ModalRequest`], matching its variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalResponse {
    /// Prompt result; `None` means cancelled.
    Text(Option<String>),
    /// Confirm result.
    Answer(bool),
    /// Alert acknowledged.
    Acknowledged,
}

/// Resolves modal requests one at a time.
#[async_trait]
pub trait InteractionGate: Send + Sync {
    async fn request(&self, request: ModalRequest) -> ModalResponse;

    /// Yes/no convenience; any non-`Answer` resolution counts as "no".
    async fn confirm(&self, title: &str, message: &str) -> bool {
        match self
            .request(ModalRequest::Confirm {
                title: title.to_string(),
                message: Some(message.to_string()),
            })
            .await
        {
            ModalResponse::Answer(answer) => answer,
            _ => false,
        }
    }

    /// Text-entry convenience; `None` means cancelled.
    async fn prompt(&self, title: &str, default_value: &str) -> Option<String> {
        match self
            .request(ModalRequest::Prompt {
                title: title.to_string(),
                message: None,
                default_value: default_value.to_string(),
            })
            .await
        {
            ModalResponse::Text(text) => text.filter(|t| !t.trim().is_empty()),
            _ => None,
        }
    }

    /// Announcement convenience.
    async fn alert(&self, title: &str, message: &str) {
        let _ = self
            .request(ModalRequest::Alert {
                title: title.to_string(),
                message: Some(message.to_string()),
            })
            .await;
    }
}

/// Non-interactive gate with fixed answers (scripted runs and tests).
#[derive(Debug, Clone)]
pub struct AutoGate {
    pub approve: bool,
    pub prompt_reply: Option<String>,
}

impl AutoGate {
    /// Approve every confirm, cancel every prompt.
    pub fn approving() -> Self {
        Self {
            approve: true,
            prompt_reply: None,
        }
    }

    /// Deny every confirm.
    pub fn denying() -> Self {
        Self {
            approve: false,
            prompt_reply: None,
        }
    }
}

#[async_trait]
impl InteractionGate for AutoGate {
    async fn request(&self, request: ModalRequest) -> ModalResponse {
        match request {
            ModalRequest::Prompt { .. } => ModalResponse::Text(self.prompt_reply.clone()),
            ModalRequest::Confirm { .. } => ModalResponse::Answer(self.approve),
            ModalRequest::Alert { .. } => ModalResponse::Acknowledged,
        }
    }
}

/// Terminal gate reading answers from stdin.
#[derive(Debug, Clone, Default)]
pub struct StdioGate;

impl StdioGate {
    fn read_line() -> Option<String> {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).ok()?;
        Some(line.trim().to_string())
    }
}

#[async_trait]
impl InteractionGate for StdioGate {
    async fn request(&self, request: ModalRequest) -> ModalResponse {
        match request {
            ModalRequest::Prompt {
                title,
                message,
                default_value,
            } => {
                if let Some(msg) = message {
                    eprintln!("{msg}");
                }
                if default_value.is_empty() {
                    eprint!("{title}: ");
                } else {
                    eprint!("{title} [{default_value}]: ");
                }
                let reply = Self::read_line();
                let text = match reply {
                    Some(line) if line.is_empty() && !default_value.is_empty() => {
                        Some(default_value)
                    }
                    Some(line) if !line.is_empty() => Some(line),
                    _ => None,
                };
                ModalResponse::Text(text)
            }
            ModalRequest::Confirm { title, message } => {
                if let Some(msg) = message {
                    eprintln!("{msg}");
                }
                eprint!("{title} [y/N]: ");
                let answer = Self::read_line()
                    .map(|line| matches!(line.to_lowercase().as_str(), "y" | "yes"))
                    .unwrap_or(false);
                ModalResponse::Answer(answer)
            }
            ModalRequest::Alert { title, message } => {
                match message {
                    Some(msg) => eprintln!("{title}: {msg}"),
                    None => eprintln!("{title}"),
                }
                ModalResponse::Acknowledged
            }
        }
    }
}
