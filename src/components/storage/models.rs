use serde::Deserialize;

/// Mime type of native spreadsheet documents
pub const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Mime type of folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// A storage folder documents can be placed into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

/// A spreadsheet document known to the storage service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    pub name: String,
}

/// One entry of a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

impl FileEntry {
    pub fn is_spreadsheet(&self) -> bool {
        self.mime_type == SPREADSHEET_MIME_TYPE
    }
}
