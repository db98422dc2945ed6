//! Result cursors.
//!
//! A cursor walks the rows of one query result and decodes the agtype
//! column of each row on demand. Fetching rows is the job of a
//! [`RowSource`]; the cursor never touches the database itself.

pub mod mapping;
pub mod rows;
pub mod stream;

use std::fmt;

use tracing::debug;

use crate::agtype::Decoder;
use crate::config::DecoderConfig;
use crate::model::Entity;
use crate::{Error, Result};

use rows::MemoryRows;

/// Anything that can hand out rows holding one agtype text column.
///
/// Implementations wrap a database driver's result stream. The text of a
/// row is read at most once; `None` stands for SQL `NULL`.
pub trait RowSource {
    /// Move to the next row. Returns false once the rows are exhausted.
    fn advance(&mut self) -> bool;

    /// Take the column text of the current row.
    fn take_text(&mut self) -> Result<Option<String>>;
}

impl<R: RowSource + ?Sized> RowSource for Box<R> {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn take_text(&mut self) -> Result<Option<String>> {
        (**self).take_text()
    }
}

/// Streaming decoder over a [`RowSource`].
///
/// One [`Decoder`] is reused across rows; its vertex cache is still reset
/// for every row.
#[derive(Debug)]
pub struct Cursor<R> {
    source: R,
    decoder: Decoder,
    on_row: bool,
    position: usize,
}

impl Cursor<MemoryRows> {
    /// Cursor over rows already held in memory.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MemoryRows::new(rows))
    }
}

impl<R: RowSource> Cursor<R> {
    pub fn new(source: R) -> Self {
        Self::with_decoder(source, Decoder::new())
    }

    pub fn with_config(source: R, config: DecoderConfig) -> Self {
        Self::with_decoder(source, Decoder::with_config(config))
    }

    pub fn with_decoder(source: R, decoder: Decoder) -> Self {
        Self { source, decoder, on_row: false, position: 0 }
    }

    /// Advance to the next row without decoding it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        self.on_row = self.source.advance();
        if self.on_row {
            self.position += 1;
        }
        self.on_row
    }

    /// Decode the current row. SQL `NULL` decodes to [`Entity::Null`].
    pub fn get_row(&mut self) -> Result<Entity> {
        if !self.on_row {
            return Err(Error::NoCurrentRow);
        }
        self.on_row = false;
        match self.source.take_text()? {
            Some(text) => Ok(self.decoder.decode(&text)?),
            None => Ok(Entity::Null),
        }
    }

    /// Drain the remaining rows.
    ///
    /// Stops at the first failing row; the rows decoded before it travel
    /// with the error.
    pub fn all(&mut self) -> std::result::Result<Vec<Entity>, Incomplete<Entity>> {
        let mut rows = Vec::new();
        while self.next() {
            match self.get_row() {
                Ok(entity) => rows.push(entity),
                Err(error) => {
                    debug!(
                        row = self.position,
                        decoded = rows.len(),
                        %error,
                        "cursor stopped on failing row"
                    );
                    return Err(Incomplete { rows, error });
                }
            }
        }
        Ok(rows)
    }

    /// Number of rows advanced over so far (1-based index of the current row).
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Rows gathered before a failure, plus the failure itself.
pub struct Incomplete<T> {
    pub rows: Vec<T>,
    pub error: Error,
}

impl<T> Incomplete<T> {
    pub fn into_parts(self) -> (Vec<T>, Error) {
        (self.rows, self.error)
    }
}

impl<T> From<Incomplete<T>> for Error {
    fn from(incomplete: Incomplete<T>) -> Self {
        incomplete.error
    }
}

impl<T: fmt::Debug> fmt::Debug for Incomplete<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Incomplete")
            .field("rows", &self.rows)
            .field("error", &self.error)
            .finish()
    }
}

impl<T> fmt::Display for Incomplete<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stopped after {} row(s): {}", self.rows.len(), self.error)
    }
}

impl<T: fmt::Debug> std::error::Error for Incomplete<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
