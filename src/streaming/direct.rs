//! Direct streaming with HTTP range requests.
//!
//! Serves library files with support for single-range HTTP requests. The
//! body is produced lazily in fixed-size chunks: hyper pulls the next chunk
//! only after the transport has accepted the previous one, so a slow client
//! throttles disk reads instead of ballooning memory. Dropping the response
//! (client disconnect) drops the file handle with it.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::error::{Error, Result};
use crate::library::ResolvedPath;
use crate::server::{error::AppError, AppContext};
use crate::streaming::range::{self, ParsedRange};

/// Read granularity for streamed bodies.
const CHUNK_SIZE: usize = 8192;

/// `GET /stream/{identifier}` — progressive playback with range support.
pub async fn stream_media(
    State(ctx): State<AppContext>,
    Path(identifier): Path<String>,
    headers: HeaderMap,
) -> std::result::Result<Response, AppError> {
    let resolved = ctx.store.resolve(&identifier).await?;

    let range = range::parse(
        headers.get(header::RANGE).and_then(|h| h.to_str().ok()),
        resolved.size(),
    );

    Ok(respond(&resolved, range).await?)
}

/// `GET /download/{identifier}` — whole file as an attachment.
///
/// Ignores any `Range` header; downloads always deliver the full file.
pub async fn download_media(
    State(ctx): State<AppContext>,
    Path(identifier): Path<String>,
) -> std::result::Result<Response, AppError> {
    let resolved = ctx.store.resolve(&identifier).await?;
    let response = respond(&resolved, ParsedRange::Absent).await?;

    let (mut parts, body) = response.into_parts();
    let disposition = format!(
        "attachment; filename=\"{}\"",
        resolved.file_name().replace('"', "")
    );
    parts.headers.insert(
        header::CONTENT_DISPOSITION,
        disposition
            .parse()
            .map_err(|_| Error::Internal("invalid content-disposition".into()))?,
    );

    Ok(Response::from_parts(parts, body))
}

/// Build the 200/206 response for a resolved file and parsed range.
///
/// `Absent` and `Invalid` both yield the full file with 200: a malformed
/// header degrades instead of erroring. Exactly one handle is opened per
/// call; a file deleted between resolution and open surfaces as NotFound.
pub async fn respond(resolved: &ResolvedPath, range: ParsedRange) -> Result<Response> {
    let file_size = resolved.size();
    let mime = mime_guess::from_path(resolved.path()).first_or_octet_stream();

    let mut file = File::open(resolved.path())
        .await
        .map_err(|_| Error::not_found("media file", resolved.file_name()))?;

    match range {
        ParsedRange::Single { start, end } => {
            let length = end - start + 1;

            file.seek(SeekFrom::Start(start)).await?;

            let stream = ReaderStream::with_capacity(file.take(length), CHUNK_SIZE);
            let body = Body::from_stream(stream);

            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .header(header::CONTENT_LENGTH, length.to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, file_size),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .body(body)
                .map_err(|e| Error::Internal(e.to_string()))
        }
        ParsedRange::Absent | ParsedRange::Invalid => {
            let stream = ReaderStream::with_capacity(file, CHUNK_SIZE);
            let body = Body::from_stream(stream);

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .header(header::CONTENT_LENGTH, file_size.to_string())
                .header(header::ACCEPT_RANGES, "bytes")
                .body(body)
                .map_err(|e| Error::Internal(e.to_string()))
        }
    }
}
