//! Terminal rendering of migration progress

use colored::Colorize;
use mg_core::{Direction, MigrationFile};
use mg_exec::ProgressEvent;
use std::time::Duration;

/// Print one progress event.
pub(crate) fn event(event: ProgressEvent) {
    match event {
        ProgressEvent::Info(text) => println!("{text}"),
        ProgressEvent::FileApplied(file) => applied(&file),
        ProgressEvent::Error(err) => error(&err.to_string()),
    }
}

/// `> file` for up, `< file` for down.
pub(crate) fn applied(file: &MigrationFile) {
    println!("{} {}", glyph(file.direction).blue(), file.file_name);
}

fn glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => ">",
        Direction::Down => "<",
    }
}

/// Print an error message.
pub(crate) fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
}

/// Print how long a command took.
pub(crate) fn elapsed(duration: Duration) {
    println!("{}", format_elapsed(duration));
}

pub(crate) fn format_elapsed(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs > 60.0 {
        format!("{:.4} minutes", secs / 60.0)
    } else {
        format!("{secs:.4} seconds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed_seconds() {
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.5000 seconds");
        assert_eq!(format_elapsed(Duration::from_secs(60)), "60.0000 seconds");
    }

    #[test]
    fn test_format_elapsed_minutes() {
        assert_eq!(format_elapsed(Duration::from_secs(90)), "1.5000 minutes");
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(glyph(Direction::Up), ">");
        assert_eq!(glyph(Direction::Down), "<");
    }
}
