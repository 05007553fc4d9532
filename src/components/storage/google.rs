use super::models::{DocumentRef, FileEntry, Folder, FOLDER_MIME_TYPE, SPREADSHEET_MIME_TYPE};
use super::{FileListing, StorageService};
use crate::components::google_auth::GoogleApi;
use crate::error::{storage_error, Error, SummaryResult};
use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

const DRIVE_FILES: &str = "https://www.googleapis.com/drive/v3/files";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    trashed: bool,
    #[serde(default)]
    parents: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListPage {
    #[serde(default)]
    files: Vec<FileEntry>,
    next_page_token: Option<String>,
}

/// Where a paginated listing currently is
enum PageCursor {
    First,
    Next(String),
    Done,
}

/// Drive v3 binding
pub struct GoogleDriveClient {
    api: GoogleApi,
}

impl GoogleDriveClient {
    pub fn new(api: GoogleApi) -> Self {
        Self { api }
    }

    async fn get_file(&self, file_id: &str, fields: &str) -> SummaryResult<Option<DriveFile>> {
        let mut url = GoogleApi::endpoint(DRIVE_FILES, &[file_id], storage_error)?;
        url.query_pairs_mut().append_pair("fields", fields);
        self.api.json_optional(Method::GET, url, storage_error).await
    }

    async fn fetch_page(&self, folder_id: &str, page_token: Option<&str>) -> SummaryResult<FileListPage> {
        let mut url = GoogleApi::endpoint(DRIVE_FILES, &[], storage_error)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("q", &folder_query(folder_id))
                .append_pair("fields", "nextPageToken,files(id,name,mimeType)")
                .append_pair("pageSize", "100");
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }
        self.api.json(Method::GET, url, None, storage_error).await
    }
}

/// Drive search query selecting the live children of a folder
fn folder_query(folder_id: &str) -> String {
    let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}' in parents and trashed = false", escaped)
}

#[async_trait]
impl StorageService for GoogleDriveClient {
    async fn root_folder(&self) -> SummaryResult<Folder> {
        let root = self
            .get_file("root", "id,name")
            .await?
            .ok_or_else(|| storage_error("Root folder is not accessible"))?;
        Ok(Folder {
            id: root.id,
            name: root.name,
        })
    }

    async fn resolve_folder(&self, folder_id: &str) -> SummaryResult<Option<Folder>> {
        let file = self.get_file(folder_id, "id,name,mimeType,trashed").await?;
        Ok(file
            .filter(|f| f.mime_type == FOLDER_MIME_TYPE && !f.trashed)
            .map(|f| Folder {
                id: f.id,
                name: f.name,
            }))
    }

    async fn create_document(&self, name: &str) -> SummaryResult<DocumentRef> {
        let mut url = GoogleApi::endpoint(DRIVE_FILES, &[], storage_error)?;
        url.query_pairs_mut().append_pair("fields", "id,name");
        let body = json!({ "name": name, "mimeType": SPREADSHEET_MIME_TYPE });

        let file: DriveFile = self
            .api
            .json(Method::POST, url, Some(&body), storage_error)
            .await?;
        Ok(DocumentRef {
            id: file.id,
            name: file.name,
        })
    }

    async fn move_document(&self, document: &DocumentRef, folder: &Folder) -> SummaryResult<()> {
        let current = self
            .get_file(&document.id, "id,parents")
            .await?
            .ok_or_else(|| storage_error(&format!("Document {} not found", document.id)))?;

        let mut url = GoogleApi::endpoint(DRIVE_FILES, &[&document.id], storage_error)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("addParents", &folder.id);
            let previous: Vec<&str> = current
                .parents
                .iter()
                .map(String::as_str)
                .filter(|parent| *parent != folder.id)
                .collect();
            if !previous.is_empty() {
                query.append_pair("removeParents", &previous.join(","));
            }
        }

        self.api
            .execute(Method::PATCH, url, Some(&json!({})), storage_error)
            .await
    }

    async fn rename_document(&self, document_id: &str, name: &str) -> SummaryResult<()> {
        let url = GoogleApi::endpoint(DRIVE_FILES, &[document_id], storage_error)?;
        self.api
            .execute(Method::PATCH, url, Some(&json!({ "name": name })), storage_error)
            .await
    }

    fn list_files<'a>(&'a self, folder: &'a Folder) -> FileListing<'a> {
        stream::try_unfold(PageCursor::First, move |cursor| async move {
            let page_token = match cursor {
                PageCursor::Done => return Ok(None),
                PageCursor::First => None,
                PageCursor::Next(token) => Some(token),
            };
            let page = self.fetch_page(&folder.id, page_token.as_deref()).await?;
            let next = match page.next_page_token {
                Some(token) => PageCursor::Next(token),
                None => PageCursor::Done,
            };
            Ok::<_, Error>(Some((page.files, next)))
        })
        .map_ok(|files| stream::iter(files.into_iter().map(Ok::<_, Error>)))
        .try_flatten()
        .boxed()
    }

    async fn file_exists(&self, file_id: &str) -> SummaryResult<bool> {
        let file = self.get_file(file_id, "id,trashed").await?;
        Ok(file.map(|f| !f.trashed).unwrap_or(false))
    }

    async fn trash_document(&self, file_id: &str) -> SummaryResult<()> {
        let url = GoogleApi::endpoint(DRIVE_FILES, &[file_id], storage_error)?;
        self.api
            .execute(Method::PATCH, url, Some(&json!({ "trashed": true })), storage_error)
            .await
    }
}
