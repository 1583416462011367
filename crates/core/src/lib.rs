//! clhi Core Library
//!
//! This crate provides the core functionality for clhi, a terminal assistant
//! that turns a natural-language question into a recommended shell command.
//! Answers are generated from manual-page documentation retrieved from a
//! semantic index together with the user's own shell history, and the user
//! decides whether to apply, edit or follow up on each recommendation.
//!
//! # Key Features
//!
//! - **Retrieval**: Ranked documentation hits from a vector search index
//! - **History Correlation**: Previous invocations of the retrieved commands
//! - **Prompt Assembly**: Question, conversation, documentation and history in one prompt
//! - **Command Extraction**: The executable line of a generated answer
//! - **Interaction State Machine**: Apply, edit, follow up or quit, with confirmation
//!
//! # Examples
//!
//! Extracting the command from a generated response:
//!
//! ```
//! use clhi_core::extraction::{extract, ExtractedCommand};
//!
//! let response = "```bash\nls -la\n```\nLists all files, including hidden ones.";
//! assert_eq!(extract(response), ExtractedCommand::Found("ls -la".to_string()));
//! ```

pub mod config;
pub mod context;
pub mod conversation;
pub mod databricks;
pub mod editor;
pub mod error;
pub mod execution;
pub mod extraction;
pub mod file_handling;
pub mod generation;
pub mod history;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;
pub mod session;
