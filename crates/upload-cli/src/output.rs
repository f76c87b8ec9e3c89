//! Terminal rendering of the form: status line and navigation

use colored::Colorize;
use tracing::debug;
use upload_core::error::ERROR_PREFIX;
use upload_core::{FormView, Navigator, SelectedFile};
use url::Url;

/// Context for output rendering
#[derive(Debug, Clone, Copy)]
pub struct OutputContext {
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }
}

/// The form as seen from a terminal
///
/// The file input is the path given on the command line. The status
/// element is the terminal itself; there is no hidden state to lift, so
/// every status text is printed as it is set.
pub struct ConsoleView {
    file: Option<SelectedFile>,
    ctx: OutputContext,
}

impl ConsoleView {
    pub fn new(file: Option<SelectedFile>, ctx: OutputContext) -> Self {
        Self { file, ctx }
    }
}

impl FormView for ConsoleView {
    fn selected_file(&self) -> Option<SelectedFile> {
        self.file.clone()
    }

    fn set_status_text(&self, text: &str) {
        if text.starts_with(ERROR_PREFIX) {
            self.ctx.error(text);
        } else {
            self.ctx.info(text);
        }
    }

    fn reveal_status(&self) {
        debug!("Status revealed");
    }
}

/// Reports the next page instead of opening it
pub struct ConsoleNavigator {
    base_url: Url,
    ctx: OutputContext,
}

impl ConsoleNavigator {
    pub fn new(base_url: Url, ctx: OutputContext) -> Self {
        Self { base_url, ctx }
    }

    /// Absolute URL of `target` relative to the server
    pub fn resolve(&self, target: &str) -> String {
        self.base_url
            .join(target)
            .map(String::from)
            .unwrap_or_else(|_| target.to_string())
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, target: &str) {
        self.ctx
            .success(&format!("Continue at {}", self.resolve(target)));
    }
}
