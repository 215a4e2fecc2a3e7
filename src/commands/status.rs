use crate::core::{
    bundle::FileBundle,
    colors::{get_aligned_status, get_colored_path},
    command_init::CommandContext,
    config::{ClientConfig, GNOMOD_FILE},
    diff::{diff, StatusEntry, StatusReport},
    error::Result,
    evaluator::Evaluator,
    file_status::FileStatus,
    ignore::{GnitIgnore, IgnoreMatcher},
    print_warning,
    templates::{render_template, TemplateContext, TEMPLATES},
    worktree::collect_files,
};
use std::path::Path;

/// Compare the working tree and staging index with the committed files and
/// print the result.
///
/// When the committed files cannot be fetched the comparison runs against an
/// empty repository and a warning is printed.
pub fn execute_status<E: Evaluator + Sync + ?Sized>(
    root: &Path,
    evaluator: &E,
    config: &ClientConfig,
    short: bool,
) -> Result<StatusReport> {
    let ctx = CommandContext::open(root, evaluator, config)?;
    let matcher = GnitIgnore::load(ctx.root())?;

    let mut committed = match ctx.client.fetch_bundle() {
        Ok(files) => files,
        Err(e) => {
            log::warn!("Fetching committed files failed: {e}");
            print_warning(&format!(
                "could not fetch committed files ({e}), comparing against an empty repository"
            ));
            FileBundle::new()
        }
    };
    committed.retain(|path, _| !matcher.is_ignored(path));

    let staged: Vec<String> = ctx
        .repo
        .staged()
        .iter()
        .filter(|path| !matcher.is_ignored(path))
        .cloned()
        .collect();
    let mut local = collect_files(ctx.root(), &matcher)?;

    // the module descriptor only counts once it is committed or staged
    if !committed.contains_key(GNOMOD_FILE) && !staged.iter().any(|p| p == GNOMOD_FILE) {
        local.remove(GNOMOD_FILE);
    }

    let report = diff(&committed, &staged, &local);
    log::debug!(
        "Status: {} changed, {} unchanged",
        report.entries().len(),
        report.unchanged().len()
    );

    if short {
        print_short_status(&report);
    } else {
        print_header(ctx.client.realm_path());
        print_grouped_status_sections(&report);
    }

    Ok(report)
}

fn print_header(realm_path: &str) {
    println!(
        "{}",
        render_template(TEMPLATES.header_empty_line, &TemplateContext::default())
    );
    let context = TemplateContext {
        realm_path: Some(realm_path),
        ..Default::default()
    };
    println!("{}", render_template(TEMPLATES.header_realm, &context));
    println!(
        "{}",
        render_template(TEMPLATES.header_empty_line, &TemplateContext::default())
    );
}

fn print_grouped_status_sections(report: &StatusReport) {
    if report.is_clean() {
        println!(
            "{}",
            render_template(TEMPLATES.status_clean, &TemplateContext::default())
        );
        return;
    }

    let sections: [(&str, &[FileStatus]); 3] = [
        (
            TEMPLATES.section_staged,
            &[FileStatus::StagedNew, FileStatus::StagedModified],
        ),
        (
            TEMPLATES.section_unstaged,
            &[FileStatus::Modified, FileStatus::Deleted],
        ),
        (TEMPLATES.section_untracked, &[FileStatus::Untracked]),
    ];

    for (header, statuses) in sections {
        let entries: Vec<&StatusEntry> = report
            .entries()
            .iter()
            .filter(|e| statuses.contains(&e.status))
            .collect();
        if entries.is_empty() {
            continue;
        }

        println!("{}", render_template(header, &TemplateContext::default()));
        for entry in entries {
            print_status_line(entry);
        }
        println!(
            "{}",
            render_template(TEMPLATES.section_spacing, &TemplateContext::default())
        );
    }
}

fn print_status_line(entry: &StatusEntry) {
    let context = TemplateContext {
        file_status: Some(entry.status.description()),
        filename: Some(&entry.path),
        status: Some(entry.status),
        ..Default::default()
    };
    println!("{}", render_template(TEMPLATES.file_line, &context));
}

/// One `XY path` line per entry
fn print_short_status(report: &StatusReport) {
    for entry in report.entries() {
        println!(
            "{} {}",
            get_aligned_status(entry.status),
            get_colored_path(entry.status, &entry.path)
        );
    }
}
