use std::path::PathBuf;

use indexmap::IndexMap;

use crate::errors::InvalidUploadedFiles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// The outcome of a file upload, as reported by the server.
pub enum UploadStatus {
    /// The file was received successfully.
    #[default]
    Ok,
    /// The file is larger than the maximum size allowed by the server.
    ExceedsServerLimit,
    /// The file is larger than the maximum size declared by the form.
    ExceedsFormLimit,
    /// The file was only partially received.
    Partial,
    /// The field was submitted without a file.
    NoFile,
    /// The server has no temporary directory to store the file in.
    MissingTempDir,
    /// The file couldn't be written to disk.
    WriteFailed,
    /// A server extension stopped the upload.
    StoppedByExtension,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The metadata of a file uploaded by the client.
///
/// The content of the file is not loaded in memory: it lives at [`path`](UploadedFile::path).
pub struct UploadedFile {
    /// Where the server stored the file.
    /// It's empty if the upload didn't succeed.
    pub path: PathBuf,
    /// The file name sent by the client.
    /// Don't trust it: it's user input.
    pub client_filename: Option<String>,
    /// The media type sent by the client.
    /// Don't trust it: it's user input.
    pub client_media_type: Option<String>,
    /// The size of the file, in bytes, if known.
    pub size: Option<u64>,
    /// The outcome of the upload.
    pub status: UploadStatus,
}

impl UploadedFile {
    /// A file that was received successfully and stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            client_filename: None,
            client_media_type: None,
            size: None,
            status: UploadStatus::Ok,
        }
    }

    /// Set the file name sent by the client.
    pub fn client_filename(mut self, filename: impl Into<String>) -> Self {
        self.client_filename = Some(filename.into());
        self
    }

    /// Set the media type sent by the client.
    pub fn client_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.client_media_type = Some(media_type.into());
        self
    }

    /// Set the size of the file.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the outcome of the upload.
    pub fn status(mut self, status: UploadStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A node in the tree of uploaded files.
///
/// Forms can nest file fields (`docs[cv]`, `photos[]`): the tree mirrors that nesting.
pub enum UploadedFileTree {
    /// A single file.
    File(UploadedFile),
    /// Files keyed by name, e.g. `docs[cv]` and `docs[letter]`.
    Map(IndexMap<String, UploadedFileTree>),
    /// Files keyed by position, e.g. `photos[]`.
    List(Vec<UploadedFileTree>),
}

impl From<UploadedFile> for UploadedFileTree {
    fn from(file: UploadedFile) -> Self {
        Self::File(file)
    }
}

/// Check that every branch of the tree leads to at least one file and
/// that every successful upload points to a temporary file.
pub(crate) fn validate(
    files: &IndexMap<String, UploadedFileTree>,
) -> Result<(), InvalidUploadedFiles> {
    for (name, node) in files {
        if name.is_empty() {
            return Err(InvalidUploadedFiles::EmptyFieldName {
                path: String::new(),
            });
        }
        validate_node(node, name.clone())?;
    }
    Ok(())
}

fn validate_node(node: &UploadedFileTree, path: String) -> Result<(), InvalidUploadedFiles> {
    match node {
        UploadedFileTree::File(file) => {
            if file.status == UploadStatus::Ok && file.path.as_os_str().is_empty() {
                return Err(InvalidUploadedFiles::MissingTemporaryPath { path });
            }
        }
        UploadedFileTree::Map(children) => {
            if children.is_empty() {
                return Err(InvalidUploadedFiles::EmptyNode { path });
            }
            for (name, child) in children {
                if name.is_empty() {
                    return Err(InvalidUploadedFiles::EmptyFieldName { path });
                }
                validate_node(child, format!("{path}[{name}]"))?;
            }
        }
        UploadedFileTree::List(children) => {
            if children.is_empty() {
                return Err(InvalidUploadedFiles::EmptyNode { path });
            }
            for (index, child) in children.iter().enumerate() {
                validate_node(child, format!("{path}[{index}]"))?;
            }
        }
    }
    Ok(())
}
