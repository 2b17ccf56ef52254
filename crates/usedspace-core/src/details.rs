/// Per-object properties for a "details" view: kind, timestamps, and how
/// many objects a directory currently holds on disk.
///
/// Everything except `size` is read fresh from the filesystem; `size` is
/// the engine's stored (aggregate) value.
use crate::error::{Error, Result};
use crate::model::Entry;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{FileType, Metadata};
use std::path::PathBuf;

/// Kind of filesystem object, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    File,
    Directory,
    Symlink,
    NamedPipe,
    Other,
}

impl ObjectKind {
    fn from_file_type(ft: FileType) -> Self {
        if ft.is_symlink() {
            return Self::Symlink;
        }
        if ft.is_dir() {
            return Self::Directory;
        }
        if ft.is_file() {
            return Self::File;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if ft.is_fifo() {
                return Self::NamedPipe;
            }
        }
        Self::Other
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Directory => "Directory",
            Self::Symlink => "Symbolic link",
            Self::NamedPipe => "Named pipe",
            Self::Other => "Unknown type",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Properties {
    pub name: String,
    pub parent: Option<PathBuf>,
    pub kind: ObjectKind,
    /// Stored size: raw length for files, rolled-up total for directories.
    pub size: u64,
    pub accessed: Option<DateTime<Local>>,
    pub modified: Option<DateTime<Local>>,
    /// Number of objects directly inside a directory right now.
    pub contents: Option<usize>,
}

/// Gather properties for `entry`, or [`Error::StaleReference`] if it no
/// longer exists.
pub fn properties(entry: &Entry) -> Result<Properties> {
    let meta = std::fs::symlink_metadata(&entry.path).map_err(|_| Error::StaleReference {
        path: entry.path.clone(),
    })?;
    let kind = ObjectKind::from_file_type(meta.file_type());

    let contents = if kind == ObjectKind::Directory {
        std::fs::read_dir(&entry.path).ok().map(|rd| rd.count())
    } else {
        None
    };

    Ok(Properties {
        name: entry.name(),
        parent: entry.parent().map(|p| p.to_path_buf()),
        kind,
        size: entry.size,
        accessed: local_time(&meta, Metadata::accessed),
        modified: local_time(&meta, Metadata::modified),
        contents,
    })
}

fn local_time(
    meta: &Metadata,
    get: fn(&Metadata) -> std::io::Result<std::time::SystemTime>,
) -> Option<DateTime<Local>> {
    get(meta).ok().map(DateTime::<Local>::from)
}
