use crate::config::Settings;
use crate::context::ContextAssembler;
use crate::conversation::ContextBuffer;
use crate::databricks::{ServingEndpointClient, VectorSearchClient};
use crate::error::Result;
use crate::generation::ResponseGenerator;
use crate::history::HistoryCorrelator;
use crate::retrieval::DocumentRetriever;

/// Retrieval, context assembly and generation for one turn.
pub struct RagPipeline {
    assembler: ContextAssembler,
    generator: ResponseGenerator,
}

impl RagPipeline {
    pub fn new(assembler: ContextAssembler, generator: ResponseGenerator) -> Self {
        Self {
            assembler,
            generator,
        }
    }

    /// Wires the Databricks backends and the history file from `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if a host or the token is missing, or an HTTP client
    /// cannot be built.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let retriever = DocumentRetriever::new(
            Box::new(VectorSearchClient::from_settings(settings)?),
            settings.retrieval.top_k(),
        );
        let correlator =
            HistoryCorrelator::new(settings.history.path(), settings.history.max_results());
        let generator = ResponseGenerator::new(
            Box::new(ServingEndpointClient::from_settings(settings)?),
            settings.generation.max_tokens(),
        );

        Ok(Self::new(
            ContextAssembler::new(retriever, correlator),
            generator,
        ))
    }

    /// Answers the latest question in `buffer`.
    ///
    /// # Errors
    ///
    /// Returns validation, retrieval and generation errors unchanged.
    pub fn respond(&self, buffer: &ContextBuffer) -> Result<String> {
        let context = self.assembler.assemble(buffer)?;
        self.generator.generate(&context)
    }
}
