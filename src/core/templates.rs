//! Template system for consistent output formatting.
//!
//! # Public API
//! - [`Templates`]: Template definitions for all output sections
//! - [`TemplateContext`]: Context data for template rendering
//! - [`TEMPLATES`]: Global template instance with default formatting
//! - [`render_template`]: Main rendering function with colors
//! - [`render_template_plain`]: Plain text rendering for testing
//! - [`strip_ansi_codes`]: Utility for removing color codes
//!
//! # Template Categories
//! - **Headers**: Realm path
//! - **Sections**: Staged, not staged and untracked file groups
//! - **File lines**: Individual file entries with their status description

use crate::core::{colors::get_colored_path, file_status::FileStatus};
use colored::*;

/// Template definitions for all output formatting
pub struct Templates {
    pub header_empty_line: &'static str,
    pub header_realm: &'static str,

    pub section_staged: &'static str,
    pub section_unstaged: &'static str,
    pub section_untracked: &'static str,
    pub section_spacing: &'static str,

    pub file_line: &'static str,
    pub status_clean: &'static str,
}

/// Global templates instance
pub static TEMPLATES: Templates = Templates {
    header_empty_line: "",
    header_realm: "Realm: {realm_path}",
    section_staged: "➤ Staged:",
    section_unstaged: "➤ Not staged:",
    section_untracked: "➤ Untracked:",
    section_spacing: "",
    file_line: "   ({file_status}) {filename}",
    status_clean: "nothing to commit, working tree clean",
};

/// Width of the `(description)` column in file lines
const STATUS_COLUMN_WIDTH: usize = 11;

#[derive(Debug, Default)]
pub struct TemplateContext<'a> {
    pub realm_path: Option<&'a str>,
    pub file_status: Option<&'a str>,
    pub filename: Option<&'a str>,
    pub status: Option<FileStatus>,
}

/// Render a template with context and apply colors
pub fn render_template(template: &str, context: &TemplateContext) -> String {
    let estimated_capacity = template.len()
        + context.realm_path.map_or(0, |s| s.len())
        + context.file_status.map_or(0, |s| s.len())
        + context.filename.map_or(0, |s| s.len())
        + 64;

    let mut result = String::with_capacity(estimated_capacity);
    render_template_single_pass(template, context, &mut result);
    apply_colors(&result, template, context)
}

fn render_template_single_pass(template: &str, context: &TemplateContext, output: &mut String) {
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            // no closing brace, keep the remainder literally
            output.push_str(&rest[open..]);
            return;
        };

        let placeholder = &after[..close];
        let value = match placeholder {
            "realm_path" => Some(context.realm_path),
            "file_status" => Some(context.file_status),
            "filename" => Some(context.filename),
            _ => None,
        };

        match value {
            Some(value) => output.push_str(value.unwrap_or_default()),
            None => {
                output.push('{');
                output.push_str(placeholder);
                output.push('}');
            }
        }

        rest = &after[close + 1..];
    }

    output.push_str(rest);
}

fn apply_colors(text: &str, template: &str, context: &TemplateContext) -> String {
    use std::fmt::Write;

    let mut result = String::with_capacity(text.len() + 64);

    match template {
        t if t.starts_with("Realm:") => match context.realm_path {
            Some(realm_path) => {
                let _ = write!(result, "Realm: {}", realm_path.blue());
            }
            None => result.push_str(text),
        },

        t if t == TEMPLATES.section_staged => {
            let _ = write!(result, "{} {}", "➤".green(), "Staged:".green());
        }
        t if t == TEMPLATES.section_unstaged => {
            let _ = write!(result, "{} {}", "➤".yellow(), "Not staged:".yellow());
        }
        t if t == TEMPLATES.section_untracked => {
            let _ = write!(result, "{} {}", "➤".cyan(), "Untracked:".cyan());
        }

        t if t.contains("({file_status}) {filename}") => {
            result.push_str("   ");

            if let Some(file_status) = context.file_status {
                let _ = write!(
                    result,
                    "{}{}{}",
                    "(".bright_black(),
                    file_status.bright_black(),
                    ")".bright_black()
                );
                let padding = STATUS_COLUMN_WIDTH.saturating_sub(file_status.len() + 2);
                result.extend(std::iter::repeat(' ').take(padding));
            }

            result.push(' ');

            match (context.filename, context.status) {
                (Some(filename), Some(status)) => {
                    let _ = write!(result, "{}", get_colored_path(status, filename));
                }
                (Some(filename), None) => result.push_str(filename),
                _ => {}
            }
        }

        _ => result.push_str(text),
    }

    result
}

/// Strip ANSI color codes for testing
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Render template without colors for testing
pub fn render_template_plain(template: &str, context: &TemplateContext) -> String {
    strip_ansi_codes(&render_template(template, context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_realm_header() {
        let context = TemplateContext {
            realm_path: Some("gno.land/r/demo/myrepo"),
            ..Default::default()
        };
        let result = render_template_plain(TEMPLATES.header_realm, &context);
        assert_eq!(result, "Realm: gno.land/r/demo/myrepo");
    }

    #[test]
    fn test_render_file_line() {
        let context = TemplateContext {
            file_status: Some("modified"),
            filename: Some("realm.gno"),
            status: Some(FileStatus::Modified),
            ..Default::default()
        };
        let result = render_template_plain(TEMPLATES.file_line, &context);
        assert_eq!(result, "   (modified)  realm.gno");
    }

    #[test]
    fn test_file_lines_align() {
        let line = |desc, status| {
            render_template_plain(
                TEMPLATES.file_line,
                &TemplateContext {
                    file_status: Some(desc),
                    filename: Some("x"),
                    status: Some(status),
                    ..Default::default()
                },
            )
        };
        let new_file = line("new file", FileStatus::StagedNew);
        let deleted = line("deleted", FileStatus::Deleted);
        let untracked = line("untracked", FileStatus::Untracked);
        assert_eq!(new_file.find('x'), deleted.find('x'));
        assert_eq!(new_file.find('x'), untracked.find('x'));
    }

    #[test]
    fn test_render_section_templates() {
        let ctx = TemplateContext::default();
        assert_eq!(render_template_plain(TEMPLATES.section_staged, &ctx), "➤ Staged:");
        assert_eq!(render_template_plain(TEMPLATES.section_unstaged, &ctx), "➤ Not staged:");
        assert_eq!(render_template_plain(TEMPLATES.section_untracked, &ctx), "➤ Untracked:");
    }

    #[test]
    fn test_single_pass_renderer_unknown_placeholder() {
        let mut output = String::new();
        render_template_single_pass("Hello {unknown}!", &TemplateContext::default(), &mut output);
        assert_eq!(output, "Hello {unknown}!");
    }

    #[test]
    fn test_single_pass_renderer_malformed_placeholder() {
        let mut output = String::new();
        render_template_single_pass("Hello {incomplete", &TemplateContext::default(), &mut output);
        assert_eq!(output, "Hello {incomplete");
    }

    #[test]
    fn test_single_pass_renderer_missing_value() {
        let mut output = String::new();
        render_template_single_pass("[{filename}]", &TemplateContext::default(), &mut output);
        assert_eq!(output, "[]");
    }

    #[test]
    fn test_strip_ansi_codes() {
        assert_eq!(strip_ansi_codes("\x1b[32mgreen\x1b[0m"), "green");
        assert_eq!(strip_ansi_codes("plain"), "plain");
    }

    #[test]
    fn test_clean_message() {
        assert_eq!(
            render_template_plain(TEMPLATES.status_clean, &TemplateContext::default()),
            "nothing to commit, working tree clean"
        );
    }
}
