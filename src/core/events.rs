//! Library Events
//!
//! Everything the presentation layer needs to hear about, from error notices
//! to progress ticks, travels over one unbounded channel. The core never
//! renders anything itself.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    Notice(Notice),
    /// The collection was reloaded from the backend.
    Reloaded { count: usize },
    /// A delete confirmation should be shown with this prompt.
    DeleteConfirmation { message: String },
    Deleted { id: String },
    UploadProgress { percent: u8 },
    Uploaded { file_name: String },
}

/// Sending half held by the library controller.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: UnboundedSender<LibraryEvent>,
}

impl EventSink {
    pub fn channel() -> (Self, UnboundedReceiver<LibraryEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: LibraryEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("library event dropped: no receiver");
        }
    }

    fn notice(&self, level: NoticeLevel, title: &str, message: Option<String>) {
        self.emit(LibraryEvent::Notice(Notice {
            level,
            title: title.to_string(),
            message,
        }));
    }

    pub fn success(&self, title: &str, message: Option<String>) {
        self.notice(NoticeLevel::Success, title, message);
    }

    pub fn error(&self, title: &str, message: Option<String>) {
        self.notice(NoticeLevel::Error, title, message);
    }

    pub fn warning(&self, title: &str, message: Option<String>) {
        self.notice(NoticeLevel::Warning, title, message);
    }
}
