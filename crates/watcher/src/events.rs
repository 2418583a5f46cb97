//! File change event types
//!
//! Raw notify events are narrowed to [`FileChange`] values for the single
//! watched file before they reach the debounce gate.

use notify::event::{MetadataKind, ModifyKind};
use notify::EventKind;
use std::path::PathBuf;
use std::time::SystemTime;

/// What kind of modification a notification reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File content was written
    Content,
    /// Write time changed
    WriteTime,
    /// Backend could not tell what changed
    Unknown,
}

impl ChangeKind {
    /// Classify a notify event kind, keeping only modification and size changes
    pub fn from_event_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Modify(ModifyKind::Data(_)) => Some(Self::Content),
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime))
            | EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)) => Some(Self::WriteTime),
            EventKind::Modify(ModifyKind::Any) | EventKind::Modify(ModifyKind::Other) => {
                Some(Self::Unknown)
            }
            _ => None,
        }
    }
}

/// A modification notification for the watched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path of the watched file
    pub path: PathBuf,
    /// Kind of modification reported
    pub kind: ChangeKind,
    /// When the notification was received
    pub observed_at: SystemTime,
}

impl FileChange {
    /// Create a new change observed now
    pub fn new(path: PathBuf, kind: ChangeKind) -> Self {
        Self {
            path,
            kind,
            observed_at: SystemTime::now(),
        }
    }

    /// Get the path associated with this change
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind, RenameMode};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_modify_kinds_are_kept() {
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Modify(ModifyKind::Data(DataChange::Any))),
            Some(ChangeKind::Content)
        );
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Modify(ModifyKind::Metadata(
                MetadataKind::WriteTime
            ))),
            Some(ChangeKind::WriteTime)
        );
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Modify(ModifyKind::Any)),
            Some(ChangeKind::Unknown)
        );
    }

    #[test]
    fn test_other_kinds_are_dropped() {
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Create(CreateKind::File)),
            None
        );
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Remove(RemoveKind::File)),
            None
        );
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Access(AccessKind::Any)),
            None
        );
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            None
        );
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Modify(ModifyKind::Metadata(
                MetadataKind::Permissions
            ))),
            None
        );
    }
}
