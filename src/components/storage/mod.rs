pub mod google;
pub mod models;

pub use google::GoogleDriveClient;
pub use models::{DocumentRef, FileEntry, Folder};

use crate::error::SummaryResult;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Lazy listing of a folder. Dropping it stops fetching further pages and
/// calling [`StorageService::list_files`] again restarts from the first page.
pub type FileListing<'a> = BoxStream<'a, SummaryResult<FileEntry>>;

/// Folder and file operations
#[async_trait]
pub trait StorageService: Send + Sync + 'static {
    /// The default location for new documents
    async fn root_folder(&self) -> SummaryResult<Folder>;

    /// Look up a folder, `None` when it does not exist or is not accessible
    async fn resolve_folder(&self, folder_id: &str) -> SummaryResult<Option<Folder>>;

    /// Create an empty spreadsheet document in the root folder
    async fn create_document(&self, name: &str) -> SummaryResult<DocumentRef>;

    /// Move a document so that `folder` is its only parent
    async fn move_document(&self, document: &DocumentRef, folder: &Folder) -> SummaryResult<()>;

    /// Give a document a new name
    async fn rename_document(&self, document_id: &str, name: &str) -> SummaryResult<()>;

    /// Stream the non-trashed files of a folder
    fn list_files<'a>(&'a self, folder: &'a Folder) -> FileListing<'a>;

    /// Whether a file exists and is not in the trash
    async fn file_exists(&self, file_id: &str) -> SummaryResult<bool>;

    /// Move a file to the trash
    async fn trash_document(&self, file_id: &str) -> SummaryResult<()>;
}
