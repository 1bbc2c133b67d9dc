//! Request header allow-listing.
//!
//! # Responsibilities
//! - Compile the configured header-name patterns once at startup
//! - Decide which inbound request headers may be forwarded upstream
//!
//! # Design Decisions
//! - Fail closed: an empty allow-list forwards no headers at all
//! - A pattern must match the whole header name, case-sensitively
//! - Pattern order is preserved; the first match short-circuits

use regex::Regex;

use crate::http::Headers;

/// Ordered set of compiled header-name patterns.
#[derive(Debug, Clone, Default)]
pub struct AllowedHeaders {
    patterns: Vec<Regex>,
}

impl AllowedHeaders {
    /// Compile the given patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if `name` matches at least one pattern.
    pub fn allows(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }

    /// Keep only allowed headers, with all of their values.
    pub fn filter(&self, headers: &Headers) -> Headers {
        headers
            .iter()
            .filter(|(name, _)| self.allows(name))
            .map(|(name, values)| (name.clone(), values.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// Compile a single pattern anchored to the whole header name.
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}
