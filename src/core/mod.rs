//! Core functionality for the gnit tool.
//!
//! This module provides the building blocks shared by every command: decoding
//! evaluator output, the bundle and chunk transfer formats, the local
//! repository record, the status diff, error handling and UI components.

pub mod bundle;
pub mod chunked;
pub mod colors;
pub mod command_init;
pub mod config;
pub mod diff;
pub mod dirs;
pub mod error;
pub mod evaluator;
pub mod file_status;
pub mod ignore;
pub mod output;
pub mod realm;
pub mod response;
pub mod state;
pub mod templates;
pub mod worktree;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{GnitError, Result};

// === Evaluator access ===
// Capability interface to the realm and the gnokey-backed implementation
pub use evaluator::{Evaluator, GnokeyEvaluator};
pub use realm::RealmClient;

// === Wire formats ===
// Typed evaluator literals, the multi-file bundle and chunked reads
pub use bundle::{EncodedBundle, FileBundle};
pub use chunked::{ChunkDescriptor, ChunkSource, ChunkedRetrieval, Retrieval, DEFAULT_CHUNK_SIZE};
pub use response::Literal;

// === Configuration ===
pub use config::{ClientConfig, TransferMode};

// === Local state ===
// The .gnit record and working-tree helpers
pub use ignore::{GnitIgnore, IgnoreMatcher};
pub use state::{LocalRepo, RepoRecord, UnstageOutcome};

// === Status ===
// Type-safe status enumeration and the diff producing it
pub use diff::{diff, StatusEntry, StatusReport};
pub use file_status::FileStatus;

// === Command initialization ===
pub use command_init::CommandContext;

// === UI templates ===
// Template system for consistent output formatting with colors
pub use templates::{
    render_template, render_template_plain, strip_ansi_codes, TemplateContext, Templates, TEMPLATES,
};

// === Color system ===
pub use colors::{get_aligned_status, get_colored_path, get_status_color_style};

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{
    print_error, print_error_with_structured_usage, print_file_action, print_info,
    print_section_header, print_success, print_warning,
};
