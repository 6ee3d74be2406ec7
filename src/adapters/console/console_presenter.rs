//! Presenter writing the operator channel to stdout.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::extraction::DocumentReference;
use crate::domain::foundation::RetrievalError;
use crate::domain::tools::ToolCatalog;
use crate::ports::{RetrievalPresenter, Stage};

/// Line-oriented console output.
pub struct ConsolePresenter {
    out: Mutex<Box<dyn Write + Send>>,
    show_diagnostics: bool,
}

impl ConsolePresenter {
    /// Presenter over standard output.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Presenter over any writer.
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            show_diagnostics: true,
        }
    }

    /// Hides per-stage diagnostics, leaving results and errors.
    pub fn quiet(mut self) -> Self {
        self.show_diagnostics = false;
        self
    }

    fn write(&self, text: &str, newline: bool) {
        // Output is best effort; a closed stdout must not abort the loop.
        if let Ok(mut out) = self.out.lock() {
            let _ = if newline {
                writeln!(out, "{}", text)
            } else {
                write!(out, "{}", text)
            };
            let _ = out.flush();
        }
    }
}

/// `Connected to server with tools: ["a", "b"]`
pub(crate) fn format_connected(catalog: &ToolCatalog) -> String {
    format!("\nConnected to server with tools: {:?}", catalog.names())
}

pub(crate) fn format_references(references: &[DocumentReference]) -> String {
    if references.is_empty() {
        return "No document references found.".to_string();
    }

    let mut text = format!("Document references ({}):", references.len());
    for reference in references {
        text.push_str("\n  ");
        text.push_str(reference.as_str());
    }
    text
}

impl RetrievalPresenter for ConsolePresenter {
    fn connected(&self, catalog: &ToolCatalog) {
        self.write(&format_connected(catalog), true);
    }

    fn started(&self, quit_sentinel: &str) {
        self.write(
            &format!(
                "\nRetrieval client started!\nType your queries or '{}' to exit.",
                quit_sentinel
            ),
            true,
        );
    }

    fn prompt(&self) {
        self.write("\nQuery: ", false);
    }

    fn diagnostic(&self, stage: Stage, message: &str) {
        if self.show_diagnostics {
            self.write(&format!("[{}] {}", stage, message), true);
        }
    }

    fn references(&self, references: &[DocumentReference]) {
        self.write(&format_references(references), true);
    }

    fn query_failed(&self, error: &RetrievalError) {
        self.write(&format!("\nError: {}", error), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::ResultExtractor;
    use crate::domain::tools::ToolDescriptor;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn connected_lists_tool_names_in_order() {
        let catalog = ToolCatalog::new(vec![
            ToolDescriptor::new("search_docs", "", json!({})),
            ToolDescriptor::new("fetch_doc", "", json!({})),
        ]);
        assert_eq!(
            format_connected(&catalog),
            "\nConnected to server with tools: [\"search_docs\", \"fetch_doc\"]"
        );
    }

    #[test]
    fn empty_references_are_reported_plainly() {
        assert_eq!(format_references(&[]), "No document references found.");
    }

    #[test]
    fn references_are_listed_one_per_line() {
        let refs = ResultExtractor::new().extract_from_text("(File: a.md) (File: b.md)");
        assert_eq!(
            format_references(&refs),
            "Document references (2):\n  a.md\n  b.md"
        );
    }

    #[test]
    fn quiet_presenter_drops_diagnostics() {
        let buffer = SharedBuffer::default();
        let presenter = ConsolePresenter::new(Box::new(buffer.clone())).quiet();

        presenter.diagnostic(Stage::Dispatch, "asking model");
        presenter.references(&[]);

        assert_eq!(buffer.contents(), "No document references found.\n");
    }

    #[test]
    fn diagnostics_are_prefixed_with_stage() {
        let buffer = SharedBuffer::default();
        let presenter = ConsolePresenter::new(Box::new(buffer.clone()));

        presenter.diagnostic(Stage::ToolCall, "search_docs {}");

        assert_eq!(buffer.contents(), "[tool call] search_docs {}\n");
    }
}
