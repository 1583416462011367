use std::fmt::{Display, Formatter};

use log::debug;

use crate::config::DEFAULT_TOP_K;
use crate::error::Result;

/// A documentation hit for a question: the command it documents and a summary
/// of its manual page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedDocument {
    pub command: String,
    pub summary: String,
}

impl Display for RetrievedDocument {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}: {}", self.command, self.summary)
    }
}

/// A semantic index that can be queried for the `k` most relevant documents.
pub trait RetrievalBackend {
    /// Returns documents in descending relevance.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Service`] if the index cannot be reached
    /// or answers with something unusable.
    fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedDocument>>;
}

pub struct DocumentRetriever {
    backend: Box<dyn RetrievalBackend>,
    top_k: usize,
}

impl DocumentRetriever {
    pub fn new(backend: Box<dyn RetrievalBackend>, top_k: usize) -> Self {
        Self {
            backend,
            top_k: top_k.max(1),
        }
    }

    pub fn with_default_depth(backend: Box<dyn RetrievalBackend>) -> Self {
        Self::new(backend, DEFAULT_TOP_K)
    }

    #[must_use]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Retrieves at most `top_k` documents for `query`, in rank order.
    ///
    /// Duplicates are kept. Backend errors are passed through untouched.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`crate::error::Error::Service`] on failure.
    pub fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>> {
        let mut documents = self.backend.query(query, self.top_k)?;
        documents.truncate(self.top_k);

        debug!(
            "Retrieved {} document(s): {:?}",
            documents.len(),
            documents.iter().map(|d| d.command.as_str()).collect::<Vec<_>>()
        );

        Ok(documents)
    }
}
