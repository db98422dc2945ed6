//! Ready-made [`RowSource`] implementations.

use std::fmt::Display;

use super::RowSource;
use crate::{Error, Result};

/// Rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRows {
    rows: std::vec::IntoIter<Option<String>>,
    current: Option<Option<String>>,
}

impl MemoryRows {
    pub fn new<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_nulls(rows.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Rows where `None` is a SQL `NULL` column.
    pub fn with_nulls(rows: Vec<Option<String>>) -> Self {
        Self { rows: rows.into_iter(), current: None }
    }

    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for MemoryRows {
    fn advance(&mut self) -> bool {
        self.current = self.rows.next();
        self.current.is_some()
    }

    fn take_text(&mut self) -> Result<Option<String>> {
        self.current.take().ok_or(Error::NoCurrentRow)
    }
}

/// Adapter over any fallible row iterator, e.g. a driver's result stream.
///
/// Iterator errors surface from [`take_text`](RowSource::take_text) as
/// [`Error::Row`].
#[derive(Debug)]
pub struct IterRows<I, E> {
    iter: I,
    current: Option<std::result::Result<Option<String>, E>>,
}

impl<I, E> IterRows<I, E>
where
    I: Iterator<Item = std::result::Result<Option<String>, E>>,
{
    pub fn new(iter: I) -> Self {
        Self { iter, current: None }
    }
}

impl<I, E> RowSource for IterRows<I, E>
where
    I: Iterator<Item = std::result::Result<Option<String>, E>>,
    E: Display,
{
    fn advance(&mut self) -> bool {
        self.current = self.iter.next();
        self.current.is_some()
    }

    fn take_text(&mut self) -> Result<Option<String>> {
        match self.current.take() {
            Some(Ok(text)) => Ok(text),
            Some(Err(e)) => Err(Error::Row(e.to_string())),
            None => Err(Error::NoCurrentRow),
        }
    }
}
