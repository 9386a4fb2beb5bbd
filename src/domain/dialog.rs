//! Confirmation and notification dialog model.
//!
//! A page holds at most one dialog at a time. Showing a new one replaces
//! whatever was displayed before.

use serde::{Deserialize, Serialize};

use crate::domain::types::LeadId;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    Info,
    Success,
    Error,
    Confirm,
}

/// Continuation behind the confirm button of a [`DialogKind::Confirm`] dialog.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConfirmAction {
    /// Form target receiving the confirmation.
    pub action: String,
    pub lead_id: LeadId,
    pub confirm_label: String,
    /// Where both the confirmed action and a cancel lead back to.
    pub return_to: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub confirm: Option<ConfirmAction>,
}

impl Dialog {
    fn plain(kind: DialogKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            confirm: None,
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::plain(DialogKind::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::plain(DialogKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::plain(DialogKind::Error, title, message)
    }

    pub fn confirm(
        title: impl Into<String>,
        message: impl Into<String>,
        action: ConfirmAction,
    ) -> Self {
        Self {
            confirm: Some(action),
            ..Self::plain(DialogKind::Confirm, title, message)
        }
    }

    /// Confirm dialogs offer cancel + confirm, every other kind a single dismiss.
    pub fn is_confirmation(&self) -> bool {
        self.kind == DialogKind::Confirm && self.confirm.is_some()
    }
}

/// Single-slot holder for the dialog currently shown on a page.
#[derive(Debug, Default)]
pub struct DialogSlot {
    current: Option<Dialog>,
}

impl DialogSlot {
    /// Displays `dialog`, replacing any dialog already open.
    pub fn show(&mut self, dialog: Dialog) {
        self.current = Some(dialog);
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Dialog> {
        self.current.as_ref()
    }

    pub fn into_current(self) -> Option<Dialog> {
        self.current
    }
}
