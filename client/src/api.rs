use std::io;

use async_trait::async_trait;
use futures::TryStreamExt;
use kernel::{
    CategoryFilter, FileId, FileStats, MediaFile, PermanentRequest, PermanentResponse,
    StoragePath,
};
use reqwest::{Client, RequestBuilder, Response};
use tokio::io::AsyncWrite;
use tokio_util::io::StreamReader;

use crate::error::{ClientError, Result};
use crate::resource::Resource;
use crate::session::Session;
use crate::upload::Batch;

const FILES_PATH: &str = "api/files";
const CATEGORY_PARAM: &str = "category";

/// Operations the remote storage service exposes to the dashboard.
#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn list_files(&self, filter: CategoryFilter) -> Result<Vec<MediaFile>>;

    async fn stats(&self) -> Result<FileStats>;

    async fn storage_path(&self) -> Result<String>;

    /// Sends the whole batch as one multipart transfer.
    async fn upload(&self, batch: Batch) -> Result<()>;

    async fn process_knowledge(&self, id: &FileId) -> Result<()>;

    async fn delete(&self, id: &FileId) -> Result<()>;

    /// Returns the retention value the service actually applied.
    async fn set_permanent(&self, id: &FileId, desired: bool) -> Result<bool>;

    /// Streams file content into `sink`, returns bytes written.
    async fn download(
        &self,
        id: &FileId,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64>;
}

/// `StorageApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorage {
    base: Resource,
    client: Client,
    session: Option<Session>,
}

impl HttpStorage {
    /// # Errors
    ///
    /// `ClientError::InvalidUri` when `uri` cannot serve as a base address.
    pub fn new(uri: &str, session: Option<Session>) -> Result<Self> {
        let base = Resource::new(uri).ok_or_else(|| ClientError::InvalidUri(uri.to_owned()))?;
        Ok(Self {
            base,
            client: Client::new(),
            session,
        })
    }

    fn files(&self) -> Resource {
        let mut resource = self.base.clone();
        resource.append_path(FILES_PATH);
        resource
    }

    fn file(&self, id: &FileId, action: Option<&str>) -> Result<Resource> {
        let mut resource = self.files();
        resource
            .append_segment(id.as_str())
            .ok_or_else(|| ClientError::InvalidFileId(id.to_string()))?;
        if let Some(action) = action {
            resource.append_path(action);
        }
        Ok(resource)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(session) => request.bearer_auth(session.token()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("request rejected with {status}: {body}");
        Err(ClientError::Status { status, body })
    }
}

#[async_trait]
impl StorageApi for HttpStorage {
    async fn list_files(&self, filter: CategoryFilter) -> Result<Vec<MediaFile>> {
        let mut resource = self.files();
        resource.set_query(CATEGORY_PARAM, filter.query_value());
        let response = self.send(self.client.get(resource.url().clone())).await?;
        Ok(response.json().await?)
    }

    async fn stats(&self) -> Result<FileStats> {
        let mut resource = self.files();
        resource.append_path("stats");
        let response = self.send(self.client.get(resource.url().clone())).await?;
        Ok(response.json().await?)
    }

    async fn storage_path(&self) -> Result<String> {
        let mut resource = self.files();
        resource.append_path("path");
        let response = self.send(self.client.get(resource.url().clone())).await?;
        let path: StoragePath = response.json().await?;
        Ok(path.path)
    }

    async fn upload(&self, batch: Batch) -> Result<()> {
        if self.session.is_none() {
            tracing::warn!("uploading without a session token");
        }
        let mut resource = self.files();
        resource.append_path("upload");
        let form = batch.into_form().await?;
        self.send(self.client.post(resource.url().clone()).multipart(form))
            .await?;
        Ok(())
    }

    async fn process_knowledge(&self, id: &FileId) -> Result<()> {
        let resource = self.file(id, Some("process-knowledge"))?;
        self.send(self.client.post(resource.url().clone())).await?;
        Ok(())
    }

    async fn delete(&self, id: &FileId) -> Result<()> {
        let resource = self.file(id, None)?;
        self.send(self.client.delete(resource.url().clone())).await?;
        Ok(())
    }

    async fn set_permanent(&self, id: &FileId, desired: bool) -> Result<bool> {
        let resource = self.file(id, Some("permanent"))?;
        let body = PermanentRequest {
            is_permanent: desired,
        };
        let response = self
            .send(self.client.put(resource.url().clone()).json(&body))
            .await?;
        let applied: PermanentResponse = response.json().await?;
        Ok(applied.is_permanent)
    }

    async fn download(
        &self,
        id: &FileId,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64> {
        let resource = self.file(id, Some("content"))?;
        let response = self.send(self.client.get(resource.url().clone())).await?;
        let stream = response.bytes_stream().map_err(io::Error::other);
        let reader = StreamReader::new(stream);
        futures::pin_mut!(reader);
        Ok(tokio::io::copy(&mut reader, sink).await?)
    }
}
