//! Streaming object bodies

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::io::StreamReader;

use crate::error::{StorageError, StorageResult};

/// Body of a stored audio object, read chunk by chunk.
///
/// The stream has a single consumer. Dropping it, or calling [`close`],
/// aborts the transfer; the remaining bytes are never fetched.
///
/// [`close`]: AudioStream::close
pub struct AudioStream {
    key: String,
    size: u64,
    inner: BoxStream<'static, StorageResult<Bytes>>,
}

impl AudioStream {
    pub(crate) fn new(
        key: String,
        size: u64,
        body: BoxStream<'static, object_store::Result<Bytes>>,
    ) -> Self {
        let chunk_key = key.clone();
        let inner = body
            .map(move |chunk| {
                chunk.map_err(|source| {
                    tracing::error!(
                        error = %source,
                        key = %chunk_key,
                        "Audio stream read failed"
                    );
                    StorageError::StreamFailed {
                        key: chunk_key.clone(),
                        source,
                    }
                })
            })
            .boxed();

        AudioStream { key, size, inner }
    }

    /// Storage key the body belongs to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Total object size in bytes as reported by the service
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Adapt the body into an [`tokio::io::AsyncRead`] for players and decoders.
    pub fn into_async_read(self) -> StreamReader<BoxStream<'static, io::Result<Bytes>>, Bytes> {
        let chunks = self.inner.map(|chunk| chunk.map_err(io::Error::other)).boxed();
        StreamReader::new(chunks)
    }

    /// Drain the body into `writer`, returning the number of bytes written.
    pub async fn copy_to<W>(mut self, writer: &mut W) -> StorageResult<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written = 0u64;
        while let Some(chunk) = self.inner.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;
        Ok(written)
    }

    /// Abandon the stream without reading the rest of the body.
    pub fn close(self) {
        tracing::debug!(key = %self.key, "Audio stream closed");
    }
}

impl Stream for AudioStream {
    type Item = StorageResult<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl fmt::Debug for AudioStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioStream")
            .field("key", &self.key)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tokio::io::AsyncReadExt;

    fn body(chunks: Vec<&'static [u8]>) -> BoxStream<'static, object_store::Result<Bytes>> {
        stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from_static(c)))).boxed()
    }

    #[tokio::test]
    async fn yields_chunks_in_order() {
        let stream = AudioStream::new("a.mp3".to_string(), 6, body(vec![b"abc", b"def"]));
        let chunks: Vec<Bytes> = stream.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks, vec![Bytes::from_static(b"abc"), Bytes::from_static(b"def")]);
    }

    #[tokio::test]
    async fn reads_through_async_read() {
        let stream = AudioStream::new("a.mp3".to_string(), 6, body(vec![b"abc", b"def"]));
        let mut reader = stream.into_async_read();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"abcdef");
    }

    #[tokio::test]
    async fn copy_counts_bytes() {
        let stream = AudioStream::new("a.mp3".to_string(), 5, body(vec![b"ab", b"cde"]));
        let mut out = Vec::new();
        let written = stream.copy_to(&mut out).await.unwrap();
        assert_eq!(written, 5);
        assert_eq!(out, b"abcde");
    }

    #[tokio::test]
    async fn read_errors_name_the_key() {
        let failing = stream::iter(vec![
            Ok(Bytes::from_static(b"ab")),
            Err(object_store::Error::Generic {
                store: "test",
                source: "connection reset".into(),
            }),
        ])
        .boxed();
        let mut stream = AudioStream::new("broken.mp3".to_string(), 10, failing);
        assert!(stream.next().await.unwrap().is_ok());
        match stream.next().await.unwrap() {
            Err(StorageError::StreamFailed { key, .. }) => assert_eq!(key, "broken.mp3"),
            other => panic!("unexpected item: {:?}", other),
        }
    }

    #[test]
    fn debug_omits_body() {
        let stream = AudioStream::new("a.mp3".to_string(), 3, body(vec![b"abc"]));
        assert_eq!(stream.key(), "a.mp3");
        assert_eq!(stream.size(), 3);
        assert!(format!("{:?}", stream).contains("a.mp3"));
        stream.close();
    }
}
