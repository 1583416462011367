use log::debug;

use crate::conversation::{ContextBuffer, ConversationMessage, Role};
use crate::error::{Error, Result};
use crate::history::HistoryCorrelator;
use crate::retrieval::DocumentRetriever;

/// Everything the response generator needs for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub question: String,
    pub chat_history: Vec<ConversationMessage>,
    pub summaries: Vec<String>,
    pub commands: Vec<String>,
}

pub struct ContextAssembler {
    retriever: DocumentRetriever,
    correlator: HistoryCorrelator,
}

impl ContextAssembler {
    pub fn new(retriever: DocumentRetriever, correlator: HistoryCorrelator) -> Self {
        Self {
            retriever,
            correlator,
        }
    }

    /// Builds the prompt context for the latest question in `buffer`.
    ///
    /// The history store is read once per call and every retrieved command is
    /// correlated against that snapshot, in retrieval rank order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyConversation`] or [`Error::QuestionNotFromUser`]
    /// if the buffer does not end with a user message, and passes through
    /// retrieval service errors.
    pub fn assemble(&self, buffer: &ContextBuffer) -> Result<PromptContext> {
        let (latest, earlier) = buffer
            .messages()
            .split_last()
            .ok_or(Error::EmptyConversation)?;

        if latest.role() != Role::User {
            return Err(Error::QuestionNotFromUser(latest.role()));
        }

        let question = latest.content().to_string();
        let documents = self.retriever.retrieve(&question)?;

        let history = self.correlator.snapshot();
        let max_results = self.correlator.max_results();

        let mut commands = Vec::new();
        let mut summaries = Vec::with_capacity(documents.len());
        for document in documents {
            commands.extend(history.correlate(&document.command, max_results));
            summaries.push(document.summary);
        }

        debug!(
            "Assembled context with {} earlier message(s), {} summaries and {} history entries",
            earlier.len(),
            summaries.len(),
            commands.len()
        );

        Ok(PromptContext {
            question,
            chat_history: earlier.to_vec(),
            summaries,
            commands,
        })
    }
}
