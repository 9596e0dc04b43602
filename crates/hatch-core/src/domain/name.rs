//! Project name validation.
//!
//! The generated manifest is an npm `package.json`, so the project name must
//! be a name npm would accept for a *new* package. All violated rules are
//! collected so the user can fix them in one go.

use std::fmt;

use super::DomainError;

/// Maximum package name length accepted by the npm registry.
pub const MAX_NAME_LENGTH: usize = 214;

/// Names npm refuses outright.
const BLACKLIST: &[&str] = &["node_modules", "favicon.ico"];

/// Node.js core modules; a package may not shadow one of these.
const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// A project name that passed npm's rules for new packages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NameInvalid`] listing every rule the name breaks.
    pub fn parse(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let reasons = violations(&name);
        if reasons.is_empty() {
            Ok(Self(name))
        } else {
            Err(DomainError::NameInvalid { name, reasons })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn violations(name: &str) -> Vec<String> {
    let mut reasons = Vec::new();

    if name.is_empty() {
        reasons.push("name length must be greater than zero".to_string());
        return reasons;
    }
    if name.starts_with('.') {
        reasons.push("name cannot start with a period".into());
    }
    if name.starts_with('_') {
        reasons.push("name cannot start with an underscore".into());
    }
    if name.trim() != name {
        reasons.push("name cannot contain leading or trailing spaces".into());
    }
    if BLACKLIST.iter().any(|b| b.eq_ignore_ascii_case(name)) {
        reasons.push(format!("{name} is a blacklisted name"));
    }
    if NODE_BUILTINS.contains(&name) {
        reasons.push(format!("{name} is a core module name"));
    }
    if name.len() > MAX_NAME_LENGTH {
        reasons.push(format!(
            "name can no longer contain more than {MAX_NAME_LENGTH} characters"
        ));
    }
    if name.to_lowercase() != name {
        reasons.push("name can no longer contain capital letters".into());
    }

    // Scoped names (`@scope/pkg`) are checked per segment.
    let last = name.rsplit('/').next().unwrap_or(name);
    if last.chars().any(|c| "~'!()*".contains(c)) {
        reasons.push(r#"name can no longer contain special characters ("~'!()*")"#.into());
    }
    if !is_url_safe(name) {
        reasons.push("name can only contain URL-friendly characters".into());
    }

    reasons
}

/// Mirrors `encodeURIComponent(name) === name`, allowing one `@scope/` prefix.
fn is_url_safe(name: &str) -> bool {
    let body = match name.strip_prefix('@').and_then(|rest| rest.split_once('/')) {
        Some((scope, pkg)) => return is_uri_component(scope) && is_uri_component(pkg),
        None => name,
    };
    is_uri_component(body)
}

fn is_uri_component(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c))
}
