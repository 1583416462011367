use std::collections::HashMap;

use itertools::Itertools;
use leon::Template;

use crate::context::PromptContext;
use crate::error::Result;

const EMPTY_SECTION: &str = "none";

pub const PROMPT_TEMPLATE: &str = "\
You are an assistant for Linux terminal users. You answer questions about terminal commands and your goal is to generate a relevant CLI command the user can run in their terminal.
Return the generated CLI command as the first line of your response, followed by an explanation of the command and any arguments or option flags you used. Wrap the generated command in a ```bash code block. Make sure the command can be copied into a terminal one-to-one.

Question: {question}

You can use the following relevant Linux manual documentation to provide a response:
{summaries}

Use the user's historical CLI commands to generate customized recommendations:
{commands}

Here is the chat history between you and the human:
{chat_history}
";

fn join_section<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    let joined = items.into_iter().join("\n");
    if joined.is_empty() {
        EMPTY_SECTION.to_string()
    } else {
        joined
    }
}

/// Renders [`PROMPT_TEMPLATE`] for `context`.
///
/// Chat history is rendered one labelled turn per line, summaries and history
/// commands one per line. Empty sections render as `none`.
///
/// # Errors
///
/// Returns a template parse or render error.
pub fn render_prompt(context: &PromptContext) -> Result<String> {
    let template = Template::parse(PROMPT_TEMPLATE)?;

    let mut values: HashMap<&str, String> = HashMap::new();
    values.insert("question", context.question.clone());
    values.insert("chat_history", join_section(&context.chat_history));
    values.insert("summaries", join_section(&context.summaries));
    values.insert("commands", join_section(&context.commands));

    Ok(template.render(&values)?)
}
