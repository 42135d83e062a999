//! URL handling: canonicalization, domain extraction, exclude patterns
//!
//! Canonical URLs are the uniqueness key for the visited set and the page
//! store, so two URLs differing only by fragment or a single trailing slash
//! must normalize identically.

mod domain;
mod matcher;
mod normalize;

pub use domain::extract_domain;
pub use matcher::{matches_exclude, matches_pattern};
pub use normalize::normalize_url;
