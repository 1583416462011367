/// Marker the generation service is asked to wrap commands in.
pub const FENCE_MARKER: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedCommand {
    Found(String),
    NotFound,
}

impl ExtractedCommand {
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, ExtractedCommand::Found(_))
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            ExtractedCommand::Found(text) => Some(text),
            ExtractedCommand::NotFound => None,
        }
    }
}

/// Isolates the command line in a generated response.
///
/// The command is the line right after the first line containing
/// [`FENCE_MARKER`]. A marker on the last line, or a following line that is
/// blank or another fence, means there is no command.
#[must_use]
pub fn extract(response: &str) -> ExtractedCommand {
    let mut lines = response.lines();

    if lines.by_ref().find(|line| line.contains(FENCE_MARKER)).is_none() {
        return ExtractedCommand::NotFound;
    }

    match lines.next().map(str::trim) {
        Some(command) if !command.is_empty() && !command.contains(FENCE_MARKER) => {
            ExtractedCommand::Found(command.to_string())
        }
        _ => ExtractedCommand::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced_command() {
        assert_eq!(
            extract("```\nls -la\n```\nLists files"),
            ExtractedCommand::Found("ls -la".to_string())
        );
    }

    #[test]
    fn test_extract_language_tagged_fence() {
        let response = "Here you go:\n```bash\ntar -xzf archive.tar.gz -C /tmp/out\n```\n\
                        `-C` changes to the directory before extracting.";
        assert_eq!(
            extract(response).text(),
            Some("tar -xzf archive.tar.gz -C /tmp/out")
        );
    }

    #[test]
    fn test_extract_uses_first_fence() {
        let response = "```\nfind . -name '*.rs'\n```\nor\n```\nfd -e rs\n```";
        assert_eq!(extract(response).text(), Some("find . -name '*.rs'"));
    }

    #[test]
    fn test_extract_marker_on_final_line() {
        assert_eq!(extract("some text ```"), ExtractedCommand::NotFound);
        assert_eq!(extract("explanation\n```"), ExtractedCommand::NotFound);
    }

    #[test]
    fn test_extract_without_markers() {
        let extracted = extract("no markers here");
        assert!(!extracted.is_found());
        assert_eq!(extracted.text(), None);
    }

    #[test]
    fn test_extract_empty_fenced_block() {
        assert_eq!(extract("```\n```\ntext"), ExtractedCommand::NotFound);
        assert_eq!(extract("```\n   \nls\n```"), ExtractedCommand::NotFound);
    }
}
