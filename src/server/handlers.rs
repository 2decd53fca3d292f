//! The routes the server ships with.

use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::parser::HttpRequest;
use crate::server::handler::{Handler, HandlerFuture};
use crate::server::{Error, HttpResponse, StatusCode};

/// Uploads are written to disk in chunks of this size, flushing after each.
pub const UPLOAD_CHUNK_SIZE: usize = 1024;

/// `GET /`
pub async fn root(_capture: String, _request: HttpRequest) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::text(StatusCode::Ok, ""))
}

/// `GET /echo/{str}`: the captured segment, verbatim.
pub async fn echo(capture: String, _request: HttpRequest) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::text(StatusCode::Ok, capture))
}

/// `GET /user-agent`: the `User-Agent` header, or an empty body without one.
pub async fn user_agent(_capture: String, request: HttpRequest) -> Result<HttpResponse, Error> {
    let agent = request.get_header("User-Agent").cloned().unwrap_or_default();
    Ok(HttpResponse::text(StatusCode::Ok, agent))
}

/// `GET /files/{str}`: streams a file out of the base directory.
#[derive(Debug, Clone)]
pub struct FileDownload {
    base_dir: PathBuf,
}

impl FileDownload {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl Handler for FileDownload {
    fn call(&self, capture: String, _request: HttpRequest) -> HandlerFuture {
        let path = self.base_dir.join(&capture);
        Box::pin(async move { serve_file(path, capture).await })
    }
}

async fn serve_file(path: PathBuf, name: String) -> Result<HttpResponse, Error> {
    if !fs::try_exists(&path).await.unwrap_or(false) {
        debug!("{} does not exist", path.display());
        return Ok(HttpResponse::text(
            StatusCode::NotFound,
            format!("File path not found: {}", path.display()),
        ));
    }

    let file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            debug!("cannot open {}: {e}", path.display());
            return Ok(HttpResponse::text(StatusCode::NotFound, "Unable to open resource."));
        }
    };

    let metadata = match file.metadata().await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("cannot stat {}: {e}", path.display());
            return Ok(HttpResponse::text(
                StatusCode::InternalServerError,
                "Unable to get file information.",
            ));
        }
    };
    if !metadata.is_file() {
        return Ok(HttpResponse::text(
            StatusCode::NotFound,
            format!("Not a regular file: {}", path.display()),
        ));
    }

    Ok(HttpResponse::new(StatusCode::Ok)
        .with_content_type("application/octet-stream")
        .with_header("Content-Disposition", format!("attachment; filename={name}"))
        .with_body_stream(file, metadata.len()))
}

/// `POST /files/{str}`: stores the request body in the base directory.
#[derive(Debug, Clone)]
pub struct FileUpload {
    base_dir: PathBuf,
}

impl FileUpload {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl Handler for FileUpload {
    fn call(&self, capture: String, request: HttpRequest) -> HandlerFuture {
        let path = self.base_dir.join(capture);
        Box::pin(async move {
            let Some(len) = request.content_length() else {
                return Ok(HttpResponse::text(
                    StatusCode::BadRequest,
                    "Content-Length header or length value missing.",
                ));
            };

            match store_upload(&path, &request.body, len).await {
                Ok(()) => {
                    debug!("stored {len} bytes at {}", path.display());
                    Ok(HttpResponse::new(StatusCode::Created))
                }
                Err(e) => {
                    warn!("upload to {} failed: {e}", path.display());
                    Ok(HttpResponse::text(
                        StatusCode::InternalServerError,
                        "Problem with uploading file.",
                    ))
                }
            }
        })
    }
}

// Concurrent uploads to the same name are not serialized; the last writer wins.
async fn store_upload(path: &Path, body: &[u8], len: usize) -> io::Result<()> {
    let body = body.get(..len).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("request body holds {} of {len} bytes", body.len()),
        )
    })?;

    let mut writer = BufWriter::new(File::create(path).await?);
    for chunk in body.chunks(UPLOAD_CHUNK_SIZE) {
        writer.write_all(chunk).await?;
        writer.flush().await?;
    }
    writer.flush().await?;

    Ok(())
}
