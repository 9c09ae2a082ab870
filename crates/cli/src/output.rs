//! Terminal output utilities
//!
//! Human-readable messages go to stdout, except errors and warnings which go to
//! stderr. JSON output is always pretty-printed to stdout.

use nearby_core::Error;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{self, Write};

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a labelled value, e.g. `Distance  12.4 km`
    pub fn field(label: &str, value: &str) {
        println!("  {:<12}{}", label.dimmed(), value);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Pretty-print any serializable value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    write_json(&mut io::stdout().lock(), value)
}

/// Pretty-print `value` as JSON followed by a newline
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()
}

/// Report an error in the selected output mode
///
/// JSON mode writes the serialized [`ErrorReport`](nearby_core::error::ErrorReport)
/// to stdout so scripts can parse it; text mode writes to stderr.
pub fn print_error(error: &Error, json: bool) {
    if json {
        match serde_json::to_string_pretty(&error.to_report()) {
            Ok(report) => println!("{}", report),
            Err(_) => Status::error(&error.to_string()),
        }
        return;
    }

    Status::error(&format!("{} {}", error.code.to_string().dimmed(), error.message));
    if let Some(context) = &error.context {
        eprintln!("  {} {}", "context:".dimmed(), context);
    }
    if let Some(suggestion) = &error.suggestion {
        eprintln!("  {} {}", "hint:".cyan(), suggestion);
    }
}

/// Format a distance in kilometers for display
///
/// Under 1 km it is shown in whole meters, under 100 km with two decimals,
/// beyond that with one.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else if km < 100.0 {
        format!("{:.2} km", km)
    } else {
        format!("{:.1} km", km)
    }
}

/// Format a travel time in whole minutes for display
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        format!("{} min", minutes)
    } else {
        format!("{} h {:02} min", minutes / 60, minutes % 60)
    }
}

/// Format an elapsed wall-clock duration for display
pub fn format_elapsed(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if secs < 1.0 {
        format!("{:.1}ms", secs * 1000.0)
    } else {
        format!("{:.2}s", secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
