use log::debug;

use crate::config::DEFAULT_MAX_TOKENS;
use crate::context::PromptContext;
use crate::error::{Error, Result};
use crate::prompt::render_prompt;

/// A text-generation service that completes a rendered prompt.
pub trait GenerationBackend {
    /// # Errors
    ///
    /// Returns [`Error::Generation`] if the service cannot produce a completion.
    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

pub struct ResponseGenerator {
    backend: Box<dyn GenerationBackend>,
    max_tokens: u32,
}

impl ResponseGenerator {
    pub fn new(backend: Box<dyn GenerationBackend>, max_tokens: u32) -> Self {
        Self {
            backend,
            max_tokens,
        }
    }

    pub fn with_default_limit(backend: Box<dyn GenerationBackend>) -> Self {
        Self::new(backend, DEFAULT_MAX_TOKENS)
    }

    /// Renders `context` into the prompt template and asks the backend for a
    /// completion. There is no retry, any backend failure is reported as
    /// [`Error::Generation`].
    ///
    /// # Errors
    ///
    /// Returns a template error if rendering fails, or [`Error::Generation`].
    pub fn generate(&self, context: &PromptContext) -> Result<String> {
        let prompt = render_prompt(context)?;
        debug!("Rendered prompt of {} characters", prompt.len());

        self.backend
            .complete(&prompt, self.max_tokens)
            .map_err(|e| match e {
                Error::Generation { .. } => e,
                other => Error::generation(other),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingBackend {
        prompts: Rc<RefCell<Vec<(String, u32)>>>,
    }

    impl GenerationBackend for RecordingBackend {
        fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
            self.prompts
                .borrow_mut()
                .push((prompt.to_string(), max_tokens));
            Ok("```bash\nls -la\n```".to_string())
        }
    }

    struct UnreachableBackend;

    impl GenerationBackend for UnreachableBackend {
        fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
            Err(Error::service("generation", "timed out"))
        }
    }

    fn context() -> PromptContext {
        PromptContext {
            question: "list files in the current directory".to_string(),
            chat_history: Vec::new(),
            summaries: vec!["ls - list directory contents".to_string()],
            commands: vec!["ls -lh".to_string()],
        }
    }

    #[test]
    fn test_generate_sends_rendered_prompt() {
        let prompts = Rc::new(RefCell::new(Vec::new()));
        let generator = ResponseGenerator::new(
            Box::new(RecordingBackend {
                prompts: prompts.clone(),
            }),
            256,
        );

        let response = generator.generate(&context()).unwrap();
        assert_eq!(response, "```bash\nls -la\n```");

        let prompts = prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.contains("Question: list files in the current directory"));
        assert!(prompts[0].0.contains("ls -lh"));
        assert_eq!(prompts[0].1, 256);
    }

    #[test]
    fn test_generate_reports_generation_error() {
        let generator = ResponseGenerator::with_default_limit(Box::new(UnreachableBackend));
        let result = generator.generate(&context());
        assert!(matches!(result, Err(Error::Generation { .. })));
    }
}
