//! Document session state
//!
//! Tracks which file is loaded, the current page and the page count.
//! Page numbers are 1-based throughout.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle to a user-selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for display, falling back to the full path
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Extension check used to filter picked or dropped files
    pub fn has_pdf_extension(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
    }
}

/// Loaded file and page position
///
/// Invariant: while a file is loaded and has pages,
/// `1 <= current_page <= total_pages`.
#[derive(Debug, Clone)]
pub struct DocumentSession {
    loaded_file: Option<FileHandle>,
    current_page: u32,
    total_pages: u32,
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSession {
    pub fn new() -> Self {
        Self {
            loaded_file: None,
            current_page: 1,
            total_pages: 0,
        }
    }

    /// Replace the loaded file and go back to page 1
    ///
    /// The page count stays 0 until the renderer reports it through
    /// [`set_total_pages`](Self::set_total_pages).
    pub fn load_file(&mut self, file: FileHandle) {
        debug!(file = %file.path().display(), "session file loaded");
        self.loaded_file = Some(file);
        self.current_page = 1;
        self.total_pages = 0;
    }

    /// Record the page count reported by the renderer
    pub fn set_total_pages(&mut self, total: u32) {
        self.total_pages = total;
        if self.current_page > total.max(1) {
            self.current_page = total.max(1);
        }
    }

    /// Move to `target` if it is a valid page; returns whether it was accepted
    pub fn go_to_page(&mut self, target: u32) -> bool {
        if !self.is_valid_page(target) {
            return false;
        }
        self.current_page = target;
        true
    }

    /// Forget the loaded file
    pub fn close(&mut self) {
        *self = Self::new();
    }

    pub fn is_valid_page(&self, page: u32) -> bool {
        self.is_loaded() && page >= 1 && page <= self.total_pages
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_file.is_some()
    }

    pub fn loaded_file(&self) -> Option<&FileHandle> {
        self.loaded_file.as_ref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn can_go_previous(&self) -> bool {
        self.is_valid_page(self.current_page.saturating_sub(1))
    }

    pub fn can_go_next(&self) -> bool {
        self.is_valid_page(self.current_page.saturating_add(1))
    }

    /// "current / total", "0 / 0" for a document without pages, or "– / –"
    /// when nothing is loaded
    pub fn page_indicator(&self) -> String {
        match (self.is_loaded(), self.total_pages) {
            (false, _) => "– / –".to_string(),
            (true, 0) => "0 / 0".to_string(),
            (true, total) => format!("{} / {}", self.current_page, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(total: u32) -> DocumentSession {
        let mut session = DocumentSession::new();
        session.load_file(FileHandle::new("/docs/report.pdf"));
        session.set_total_pages(total);
        session
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = DocumentSession::new();
        assert!(!session.is_loaded());
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.total_pages(), 0);
        assert!(!session.can_go_next());
        assert!(!session.can_go_previous());
        assert_eq!(session.page_indicator(), "– / –");
    }

    #[test]
    fn test_go_to_page_within_range() {
        let mut session = loaded(3);
        assert!(session.go_to_page(3));
        assert_eq!(session.current_page(), 3);
        assert!(session.go_to_page(1));
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_go_to_page_out_of_range_is_noop() {
        let mut session = loaded(3);
        session.go_to_page(2);

        assert!(!session.go_to_page(0));
        assert!(!session.go_to_page(4));
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn test_go_to_page_without_file_is_noop() {
        let mut session = DocumentSession::new();
        session.set_total_pages(5);
        assert!(!session.go_to_page(2));
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_load_file_resets_page() {
        let mut session = loaded(10);
        session.go_to_page(7);

        session.load_file(FileHandle::new("/docs/other.pdf"));
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.total_pages(), 0);
        assert_eq!(
            session.loaded_file().map(|f| f.display_name()),
            Some("other.pdf".to_string())
        );
    }

    #[test]
    fn test_navigation_affordances() {
        let mut session = loaded(3);
        assert!(!session.can_go_previous());
        assert!(session.can_go_next());
        assert_eq!(session.page_indicator(), "1 / 3");

        session.go_to_page(3);
        assert!(session.can_go_previous());
        assert!(!session.can_go_next());
        assert_eq!(session.page_indicator(), "3 / 3");
    }

    #[test]
    fn test_empty_document_has_no_valid_pages() {
        let session = loaded(0);
        assert!(session.is_loaded());
        assert!(!session.is_valid_page(1));
        assert_eq!(session.page_indicator(), "0 / 0");
    }

    #[test]
    fn test_close_returns_to_empty_state() {
        let mut session = loaded(4);
        session.go_to_page(4);
        session.close();
        assert!(!session.is_loaded());
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.total_pages(), 0);
        assert_eq!(session.page_indicator(), "– / –");
    }

    #[test]
    fn test_pdf_extension_check() {
        assert!(FileHandle::new("a/b/Report.PDF").has_pdf_extension());
        assert!(FileHandle::new("x.pdf").has_pdf_extension());
        assert!(!FileHandle::new("x.pdf.txt").has_pdf_extension());
        assert!(!FileHandle::new("noext").has_pdf_extension());
    }
}
