//! `RequestClient` backed by reqwest, sending the resource as `multipart/form-data`
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use color_eyre::eyre;
use futures::Stream;
use pin_project::pin_project;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use url::Url;

use crate::model::error::{UploadError, UploadResult};
use crate::model::resource_preview::media_type_for;
use crate::model::upload_event::UploadResponse;
use crate::services::request_client::{ProgressReporter, RequestClient, UploadDelegate, UploadHandle};
use crate::settings::upload_settings::{FormParam, UploadSettings};

/// Size of the chunks the file part is streamed in (64 KB)
const CHUNK_SIZE: usize = 64 * 1024;

struct ProgressTracker {
    bytes_sent: u64,
    content_length: u64,
    reporter: ProgressReporter,
}

impl ProgressTracker {
    fn track(&mut self, len: u64) {
        self.bytes_sent += len;
        self.reporter.report(self.bytes_sent, Some(self.content_length));
    }
}

/// Wraps the body stream of the file part and reports every chunk pulled by the transport
#[pin_project]
pub struct ProgressStream<S> {
    #[pin]
    inner: S,
    progress_tracker: ProgressTracker,
}

impl<S> ProgressStream<S> {
    pub fn new(inner: S, content_length: u64, reporter: ProgressReporter) -> Self {
        ProgressStream {
            inner,
            progress_tracker: ProgressTracker {
                bytes_sent: 0,
                content_length,
                reporter,
            },
        }
    }
}

impl<S> Stream for ProgressStream<S>
where
    S: Stream<Item = Result<Bytes, std::io::Error>>,
{
    type Item = Result<Bytes, std::io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        match this.inner.poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.progress_tracker.track(chunk.len() as u64);
                Poll::Ready(Some(Ok(chunk)))
            }
            other => other,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[derive(Clone)]
pub struct HttpRequestClient {
    client: Client,
    file_field: String,
    params: Vec<FormParam>,
}

impl HttpRequestClient {
    pub fn new(settings: &UploadSettings) -> eyre::Result<Self> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(HttpRequestClient {
            client,
            file_field: settings.file_field.clone(),
            params: settings.params.clone(),
        })
    }

    async fn send(
        &self,
        resource_path: &Path,
        destination: Url,
        reporter: ProgressReporter,
    ) -> UploadResult<UploadResponse> {
        let data = tokio::fs::read(resource_path)
            .await
            .map_err(|e| UploadError::failed(format!("could not read {}: {}", resource_path.display(), e)))?;
        let content_length = data.len() as u64;
        let file_name = resource_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let extension = resource_path
            .extension()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();

        let stream = ProgressStream::new(chunked(Bytes::from(data)), content_length, reporter);
        let part = Part::stream_with_length(Body::wrap_stream(stream), content_length)
            .file_name(file_name)
            .mime_str(media_type_for(&extension))
            .map_err(|e| UploadError::failed(describe(&e)))?;

        // quoted names; a percent-encoded `name*=` is dropped by most servers
        let mut form = Form::new().percent_encode_noop();
        for param in &self.params {
            form = form.text(param.name.clone(), param.value.clone());
        }
        form = form.part(self.file_field.clone(), part);

        let response = self
            .client
            .post(destination)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::failed(describe(&e)))?;
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Could not read the response body: {}", describe(&e));
                String::new()
            }
        };
        if !status.is_success() {
            return Err(UploadError::failed(format!("server responded with {}", status.as_u16())));
        }

        Ok(UploadResponse {
            status: status.as_u16(),
            body,
        })
    }
}

impl RequestClient for HttpRequestClient {
    fn start_multipart_upload(
        &self,
        resource_path: &Path,
        destination: &Url,
        delegate: UploadDelegate,
    ) -> UploadResult<UploadHandle> {
        let is_file = std::fs::metadata(resource_path)
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            delegate.dismiss();
            return Err(UploadError::ResourceMissing(resource_path.display().to_string()));
        }

        let attempt = delegate.attempt();
        let this = self.clone();
        let path: PathBuf = resource_path.to_path_buf();
        let destination = destination.clone();
        tracing::info!("Uploading {} to {} ({})", path.display(), destination, attempt);

        let task = tokio::spawn(async move {
            let reporter = delegate.progress_reporter();
            match this.send(&path, destination, reporter).await {
                Ok(response) => {
                    tracing::info!("{} finished with status {}", attempt, response.status);
                    delegate.succeeded(response);
                }
                Err(e) => {
                    tracing::warn!("{} failed: {}", attempt, e);
                    delegate.failed(e);
                }
            }
        });

        Ok(UploadHandle::new(attempt, task.abort_handle()))
    }
}

fn chunked(data: Bytes) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let chunks: Vec<Result<Bytes, std::io::Error>> = (0..data.len())
        .step_by(CHUNK_SIZE)
        .map(|start| Ok(data.slice(start..(start + CHUNK_SIZE).min(data.len()))))
        .collect();
    futures::stream::iter(chunks)
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "timeout".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
