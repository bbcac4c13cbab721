//! Subcommand implementations.

pub mod auth;
pub mod chat;
pub mod diary;
pub mod media;
pub mod plan;

use std::io::Write;

/// Prints typewriter frames as they grow, without reprinting.
#[derive(Debug, Default)]
pub struct FramePrinter {
    printed: usize,
}

impl FramePrinter {
    pub fn frame(&mut self, frame: &str) {
        if let Some(rest) = frame.get(self.printed..) {
            let mut stdout = std::io::stdout().lock();
            // Best effort: a closed stdout only loses output
            let _ = write!(stdout, "{rest}");
            let _ = stdout.flush();
        }
        self.printed = frame.len();
    }

    pub fn finish(self) {
        if self.printed > 0 {
            println!();
        }
    }
}
