//! Common assertion helpers for test output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// Guidance printed when the directory has no `.gnit` record
pub fn not_a_repository() -> impl Predicate<str> {
    predicates::str::contains("Not a gnit repository")
}

pub fn has_realm_header(realm: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Realm: {realm}"))
}

pub fn has_section(section: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("➤ {section}:"))
}

/// A status file line with its description
pub fn has_status(status: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("({status})"))
}

pub fn working_tree_clean() -> impl Predicate<str> {
    predicates::str::contains("nothing to commit, working tree clean")
}

pub fn has_warning() -> impl Predicate<str> {
    predicates::str::contains("Warning:")
}
