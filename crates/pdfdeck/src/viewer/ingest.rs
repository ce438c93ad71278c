use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File types the viewer recognises, by lowercased extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    PowerPoint,
    OpenDocument,
    Unsupported,
}

/// Guidance shown when a file is turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub alert: &'static str,
    /// New status line. `None` clears it.
    pub status: Option<&'static str>,
}

impl FileKind {
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            Self::Pdf
        } else if lower.ends_with(".pptx") || lower.ends_with(".ppt") {
            Self::PowerPoint
        } else if lower.ends_with(".odp") {
            Self::OpenDocument
        } else {
            Self::Unsupported
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Pdf => None,
            Self::PowerPoint => Some(Rejection {
                alert: "PowerPoint files cannot be displayed directly.\n\n\
                        Tip: Convert to PDF for full support!",
                status: Some("Please convert PowerPoint to PDF"),
            }),
            Self::OpenDocument => Some(Rejection {
                alert: "ODP files cannot be displayed directly.\n\n\
                        Tip: Export as PDF for easier viewing!",
                status: Some("Please export ODP as PDF"),
            }),
            Self::Unsupported => Some(Rejection {
                alert: "Please upload a PDF file (.pdf)",
                status: None,
            }),
        }
    }
}

/// Where the bytes of a selected file come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    /// Contents already in memory, e.g. from a drop without a backing path.
    Bytes(Arc<[u8]>),
}

/// A single user-selected file.
#[derive(Debug, Clone)]
pub struct FileSelection {
    pub name: String,
    pub source: FileSource,
}

impl FileSelection {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_name(&self.name)
    }
}

/// Only the first of several selected files is considered.
pub fn first_selection(files: impl IntoIterator<Item = FileSelection>) -> Option<FileSelection> {
    files.into_iter().next()
}

/// A PDF load handed to the worker.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub token: u64,
    pub selection: FileSelection,
}
