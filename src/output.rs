//! User-facing progress output.
//!
//! The installer reports progress through this trait instead of printing
//! directly, so commands get console output while tests capture plain text.

pub trait Output {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Console output used by the CLI commands.
pub struct Console;

impl Output for Console {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("⚠️  Warning: {message}");
    }
}
