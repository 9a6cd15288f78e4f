//! Standard-library deny tables.
//!
//! Imports of well-known runtime modules carry no information about a
//! project's structure, so each grammar lists the ones to drop. The tables
//! are explicit; nothing is inferred.

/// Per-language rule for recognising standard-library imports.
#[derive(Debug, Clone, Copy)]
pub struct StdlibFilter {
    /// Module names dropped on exact match.
    pub exact: &'static [&'static str],
    /// Module names dropped when they start with one of these.
    pub prefixes: &'static [&'static str],
    /// When set, `exact` is also checked against the name's first segment
    /// (Python `os.path` is dropped because `os` is listed).
    pub root_separator: Option<char>,
}

impl StdlibFilter {
    pub const NONE: StdlibFilter = StdlibFilter {
        exact: &[],
        prefixes: &[],
        root_separator: None,
    };

    pub fn matches(&self, module: &str) -> bool {
        if self.exact.contains(&module) {
            return true;
        }
        if self.prefixes.iter().any(|p| module.starts_with(p)) {
            return true;
        }
        match self.root_separator {
            Some(sep) => module
                .split(sep)
                .next()
                .is_some_and(|root| self.exact.contains(&root)),
            None => false,
        }
    }
}

pub const PYTHON_STDLIB: &[&str] = &[
    "os", "sys", "json", "re", "math", "datetime", "collections", "itertools", "functools",
    "operator", "typing", "pathlib", "urllib", "http", "socket", "threading",
    "multiprocessing", "asyncio", "sqlite3", "pickle", "csv", "xml", "html",
];

pub const JAVA_STDLIB_PREFIXES: &[&str] = &["java.", "javax.", "org.w3c.", "org.xml."];

pub const GO_STDLIB: &[&str] = &[
    "fmt", "os", "io", "strings", "strconv", "time", "math", "net", "net/http",
    "encoding/json", "log", "bufio", "bytes", "context", "sync", "regexp", "sort", "errors",
    "flag",
];

pub const C_STDLIB: &[&str] = &[
    "stdio.h", "stdlib.h", "string.h", "math.h", "time.h", "ctype.h", "assert.h", "errno.h",
    "limits.h", "float.h", "stdarg.h", "setjmp.h", "signal.h", "locale.h",
];

pub const RUBY_STDLIB: &[&str] = &[
    "json", "yaml", "csv", "uri", "net/http", "openssl", "digest", "base64", "zlib",
    "fileutils", "pathname", "logger", "benchmark", "optparse", "ostruct",
];

pub const RUST_STDLIB: &[&str] = &["std", "core", "alloc"];

pub const RUST_STDLIB_PREFIXES: &[&str] = &["std::", "core::", "alloc::"];

pub const JS_BUILTINS: &[&str] = &[
    "fs", "path", "os", "util", "events", "stream", "buffer", "crypto", "http", "https", "url",
    "querystring", "zlib",
];

pub const JS_BUILTIN_PREFIXES: &[&str] = &["node:"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_root_match() {
        let filter = StdlibFilter {
            exact: PYTHON_STDLIB,
            prefixes: &[],
            root_separator: Some('.'),
        };
        assert!(filter.matches("os"));
        assert!(filter.matches("os.path"));
        assert!(!filter.matches("numpy"));
        assert!(!filter.matches("osx_helpers"));
    }

    #[test]
    fn prefix_match() {
        let filter = StdlibFilter {
            exact: RUST_STDLIB,
            prefixes: RUST_STDLIB_PREFIXES,
            root_separator: None,
        };
        assert!(filter.matches("std::collections::HashMap"));
        assert!(filter.matches("core"));
        assert!(!filter.matches("serde::Deserialize"));
        assert!(!filter.matches("stdx"));
    }

    #[test]
    fn none_matches_nothing() {
        assert!(!StdlibFilter::NONE.matches("anything"));
    }
}
