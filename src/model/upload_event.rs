//! Lifecycle notifications sent from a running upload back to the state owner
use std::fmt;

use crate::model::error::UploadError;

/// Identifies one upload attempt of one screen instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptId {
    pub screen: u64,
    pub seq: u64,
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "screen-{}/attempt-{}", self.screen, self.seq)
    }
}

/// What the server answered to a successful upload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEventKind {
    /// `total` is `None` when the size is unknown
    Progress { sent: u64, total: Option<u64> },
    Succeeded(UploadResponse),
    Failed(UploadError),
}

/// A callback from the request client, tagged with the attempt it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct UploadEvent {
    pub attempt: AttemptId,
    pub kind: UploadEventKind,
}

impl UploadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self.kind, UploadEventKind::Progress { .. })
    }
}
