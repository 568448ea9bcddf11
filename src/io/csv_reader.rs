use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use chrono::Utc;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio_util::compat::TokioAsyncReadCompatExt;

use super::error::IoError;
use super::parse::RawAccountRecord;
use crate::domain::Account;

/// Async stream of accounts from a CSV seed file
///
/// Expected header: `id,full_name,email,password,role,currency,balance`.
/// `currency` and `balance` may be empty for accounts without a wallet.
pub struct CsvAccountStream {
    inner: Pin<Box<dyn Stream<Item = Result<Account, IoError>> + Send>>,
}

impl CsvAccountStream {
    /// Create a new account stream from an async reader
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let csv_reader = AsyncReaderBuilder::new()
            .trim(csv_async::Trim::All)
            .flexible(true)
            .create_deserializer(reader);

        let stream = csv_reader
            .into_deserialize::<RawAccountRecord>()
            .map(|result| {
                result
                    .map_err(IoError::from)
                    .and_then(|raw| raw.parse(Utc::now()))
            });

        Self {
            inner: Box::pin(stream),
        }
    }

    /// Open a seed file and stream its accounts
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file = File::open(path.as_ref()).await?;
        Ok(Self::new(file.compat()))
    }
}

impl Stream for CsvAccountStream {
    type Item = Result<Account, IoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
