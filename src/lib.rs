//! Gnit - a git-like client for file repositories hosted in Gno realms.
//!
//! The working directory is bound to a realm through a small `.gnit` record.
//! Files are staged locally, compared against the realm's committed files,
//! and committed by broadcasting a generated program. All realm access goes
//! through an [`Evaluator`], so the engine can run against a fake in tests.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Evaluator access and the realm client
//! - Response decoding, bundle codec and chunked retrieval
//! - Local repository state and the status diff
//! - Error handling and result types
//! - UI templates and color system

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    // Engine
    diff,
    // Output
    get_status_color_style,
    render_template,
    render_template_plain,
    strip_ansi_codes,
    // Configuration
    ClientConfig,
    // Evaluator access
    Evaluator,
    FileBundle,
    FileStatus,
    // Error handling
    GnitError,
    // Local state
    GnitIgnore,
    GnokeyEvaluator,
    IgnoreMatcher,
    LocalRepo,
    RealmClient,
    Result,
    StatusReport,
    TemplateContext,
    Templates,
    TransferMode,
    TEMPLATES,
};
