//! Async row sources.
//!
//! Database drivers built on tokio hand out rows asynchronously. The
//! decoding itself stays synchronous; only fetching the next row awaits.

use async_trait::async_trait;
use tracing::debug;

use super::Incomplete;
use super::rows::MemoryRows;
use super::RowSource;
use crate::agtype::Decoder;
use crate::model::Entity;
use crate::{Error, Result};

/// Async counterpart of [`RowSource`].
#[async_trait]
pub trait AsyncRowSource: Send {
    /// Fetch the next row. Returns false once the rows are exhausted.
    async fn advance(&mut self) -> bool;

    /// Take the column text of the current row. `None` is SQL `NULL`.
    async fn take_text(&mut self) -> Result<Option<String>>;
}

#[async_trait]
impl AsyncRowSource for MemoryRows {
    async fn advance(&mut self) -> bool {
        RowSource::advance(self)
    }

    async fn take_text(&mut self) -> Result<Option<String>> {
        RowSource::take_text(self)
    }
}

/// [`Cursor`](super::Cursor) over an [`AsyncRowSource`].
#[derive(Debug)]
pub struct AsyncCursor<R> {
    source: R,
    decoder: Decoder,
    on_row: bool,
    position: usize,
}

impl<R: AsyncRowSource> AsyncCursor<R> {
    pub fn new(source: R) -> Self {
        Self::with_decoder(source, Decoder::new())
    }

    pub fn with_decoder(source: R, decoder: Decoder) -> Self {
        Self { source, decoder, on_row: false, position: 0 }
    }

    pub async fn next(&mut self) -> bool {
        self.on_row = self.source.advance().await;
        if self.on_row {
            self.position += 1;
        }
        self.on_row
    }

    pub async fn get_row(&mut self) -> Result<Entity> {
        if !self.on_row {
            return Err(Error::NoCurrentRow);
        }
        self.on_row = false;
        match self.source.take_text().await? {
            Some(text) => Ok(self.decoder.decode(&text)?),
            None => Ok(Entity::Null),
        }
    }

    pub async fn all(&mut self) -> std::result::Result<Vec<Entity>, Incomplete<Entity>> {
        let mut rows = Vec::new();
        while self.next().await {
            match self.get_row().await {
                Ok(entity) => rows.push(entity),
                Err(error) => {
                    debug!(
                        row = self.position,
                        decoded = rows.len(),
                        %error,
                        "async cursor stopped on failing row"
                    );
                    return Err(Incomplete { rows, error });
                }
            }
        }
        Ok(rows)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

#[cfg(feature = "tokio")]
pub use channel::{ChannelRows, RowMessage};

#[cfg(feature = "tokio")]
mod channel {
    use std::fmt::Display;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::AsyncRowSource;
    use crate::{Error, Result};

    /// One message from the driver task: row text, SQL `NULL`, or a failure.
    pub type RowMessage<E> = std::result::Result<Option<String>, E>;

    /// Rows pushed through a tokio channel by a driver task.
    ///
    /// The stream ends when every sender is dropped.
    #[derive(Debug)]
    pub struct ChannelRows<E> {
        rx: mpsc::Receiver<RowMessage<E>>,
        current: Option<RowMessage<E>>,
    }

    impl<E> ChannelRows<E> {
        pub fn new(rx: mpsc::Receiver<RowMessage<E>>) -> Self {
            Self { rx, current: None }
        }

        /// Channel of `capacity` rows plus the sender half for the driver.
        /// A capacity of zero is raised to one.
        pub fn channel(capacity: usize) -> (mpsc::Sender<RowMessage<E>>, Self) {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            (tx, Self::new(rx))
        }
    }

    #[async_trait]
    impl<E: Display + Send> AsyncRowSource for ChannelRows<E> {
        async fn advance(&mut self) -> bool {
            self.current = self.rx.recv().await;
            self.current.is_some()
        }

        async fn take_text(&mut self) -> Result<Option<String>> {
            match self.current.take() {
                Some(Ok(text)) => Ok(text),
                Some(Err(e)) => Err(Error::Row(e.to_string())),
                None => Err(Error::NoCurrentRow),
            }
        }
    }
}
