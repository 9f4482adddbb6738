//! Console output utilities.

use std::io::{self, Write};

use console::{style, StyledObject};

/// Severity tag shown in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Info,
    Warning,
    Error,
}

impl Status {
    fn tag(self) -> StyledObject<&'static str> {
        match self {
            Status::Info => style("INFO").cyan().bold(),
            Status::Warning => style("WARN").yellow().bold(),
            Status::Error => style("ERROR").red().bold(),
        }
    }
}

/// Write one tagged status line to `out`.
pub fn write_status<W: Write>(out: &mut W, status: Status, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", status.tag(), message)
}

// Write errors on the console streams are ignored.
pub fn print_info(message: &str) {
    let _ = write_status(&mut io::stdout(), Status::Info, message);
}

pub fn print_warning(message: &str) {
    let _ = write_status(&mut io::stdout(), Status::Warning, message);
}

pub fn print_error(message: &str) {
    let _ = write_status(&mut io::stderr(), Status::Error, message);
}

/// Print the program name and version.
pub fn print_banner() {
    println!(
        "{} {}",
        style("synapse-downloader").cyan().bold(),
        style(env!("CARGO_PKG_VERSION")).dim()
    );
}

/// Print what is about to be mirrored and where.
pub fn print_config_summary(entity_id: &str, download_dir: &str, collision_policy: &str) {
    println!();
    println!("  {:<14}{}", "Entity:", entity_id);
    println!("  {:<14}{}", "Destination:", download_dir);
    println!("  {:<14}{}", "If collision:", collision_policy);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(status: Status, message: &str) -> String {
        let mut out = Vec::new();
        write_status(&mut out, status, message).unwrap();
        console::strip_ansi_codes(&String::from_utf8(out).unwrap()).into_owned()
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(render(Status::Info, "Logging in"), "INFO Logging in\n");
        assert_eq!(render(Status::Warning, "no config"), "WARN no config\n");
        assert_eq!(render(Status::Error, "boom"), "ERROR boom\n");
    }
}
