//! Styled messages on stderr.

use console::{Style, Term};

/// User-facing status lines. Logs go through `tracing`; this is for results.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.styled(&Style::new().green(), msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&Style::new().yellow(), msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.styled(&Style::new().red(), msg);
    }

    /// Section heading, e.g. the feed being posted to.
    pub(crate) fn highlight(&self, msg: &str) {
        self.styled(&Style::new().cyan().bold(), msg);
    }

    /// Indented, dimmed line under a heading (artifact names, enclosures).
    pub(crate) fn detail(&self, msg: &str) {
        self.line(&detail_line(msg));
    }

    fn styled(&self, style: &Style, msg: &str) {
        self.line(&style.apply_to(msg).to_string());
    }

    // Write errors on stderr have nowhere to go.
    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

fn detail_line(msg: &str) -> String {
    format!("  {}", Style::new().dim().apply_to(msg))
}
