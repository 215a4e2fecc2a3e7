//! Message printing shared by every gnit command.
//!
//! Everything goes to stdout so a command's report reads top to bottom:
//! errors in red, warnings in yellow, usage headings in blue and per-file
//! lines with a green action verb.

use colored::*;

/// Print a failed command's message
///
/// ```text
///
/// ✕ Error: Not a gnit repository (no .gnit file found in /tmp/x)
///
/// ```
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Print an error followed by the invocations that would have worked.
///
/// ```text
///
/// ✕ Error: No files or directories specified.
///
/// Usage:
///   gnit add <file|directory>...
///
/// Options:
///   -h, --help  Show this help message
///
/// ```
pub fn print_error_with_structured_usage(
    message: &str,
    usage_patterns: &[&str],
    options: &[(&str, &str)],
) {
    println!("\n{} {}.\n", "✕ Error:".red(), message.white());
    println!("{}", "Usage:".blue());
    usage_patterns
        .iter()
        .for_each(|pattern| println!("  {}", pattern.white()));

    if !options.is_empty() {
        println!("\n{}", "Options:".blue());
        for (flag, description) in options {
            println!("  {}  {}", flag.bright_black(), description.bright_black());
        }
    }
    println!();
}

/// `✓ <message>` after a blank line
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Something was skipped but the command carried on
pub fn print_warning(message: &str) {
    println!("{} {}", "! Warning:".yellow(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Heading above a file listing, e.g. `Files to commit (3):`
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// One line of a file listing: `  <verb>: <path> (<n> bytes)`
pub fn print_file_action(verb: &str, path: &str, size: Option<usize>) {
    let verb = format!("{verb}:").green();
    match size {
        Some(size) => println!(
            "  {} {} {}",
            verb,
            path.white(),
            format!("({size} bytes)").bright_black()
        ),
        None => println!("  {} {}", verb, path.white()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers_do_not_panic() {
        print_error("Realm 'gno.land/r/demo/x' does not exist or is not accessible");
        print_error_with_structured_usage(
            "No files or directories specified",
            &["gnit add <file|directory>..."],
            &[("-h, --help", "Show this help message")],
        );
        print_error_with_structured_usage(
            "Not a gnit repository",
            &["gnit clone <realm-path>"],
            &[],
        );
    }

    #[test]
    fn test_progress_helpers_do_not_panic() {
        print_success("Successfully pulled 2 file(s)");
        print_warning("'missing.gno' not found in repository");
        print_info("No files found in repository");
        print_section_header("Files to commit (1)");
    }

    #[test]
    fn test_print_file_action_does_not_panic() {
        print_file_action("pulled", "realm.gno", Some(42));
        print_file_action("added", "realm.gno", None);
    }
}
