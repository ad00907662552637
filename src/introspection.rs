use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Queries containing this keyword skip the guard outside production.
pub const BYPASS_KEYWORD: &str = "BYPASS_FOR_TESTING";

static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
// Separator and encoding artifacts commonly used for obfuscation
static SEPARATOR_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[\r\t+%209d]").unwrap());
static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{0000}-\u{001F}\u{007F}-\u{009F}]").unwrap());
static UNICODE_SPACES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\u{00A0}\u{1680}\u{2000}-\u{200A}\u{202F}\u{205F}\u{3000}\u{FEFF}]").unwrap()
});

// Core patterns the guard refuses. Only the brace-adjacent spellings are
// covered; `__schema {` with a space sails through.
static BLOCK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"__schema\{").unwrap(),
        Regex::new(r"__type\{").unwrap(),
    ]
});

/// The naive introspection blocker. Normalizes the query, then tests it
/// against the block list. Deliberately bypassable.
pub fn is_blocked_introspection(query: &str) -> bool {
    let cleaned = normalize(query);
    for pattern in BLOCK_PATTERNS.iter() {
        if pattern.is_match(&cleaned) {
            debug!(
                pattern = pattern.as_str(),
                "introspection pattern matched, rejecting query"
            );
            return true;
        }
    }
    false
}

fn normalize(query: &str) -> String {
    let cleaned = WHITESPACE_RUNS.replace_all(query, " ");
    let cleaned = SEPARATOR_CHARS.replace_all(&cleaned, "");
    let cleaned = CONTROL_CHARS.replace_all(&cleaned, "");
    UNICODE_SPACES.replace_all(&cleaned, "").into_owned()
}

/// Undo up to three rounds of percent-encoding, stopping early once the
/// text stops changing.
pub fn decode_query(raw: &str) -> Result<String, std::string::FromUtf8Error> {
    let mut decoded = raw.to_string();
    for _ in 0..3 {
        let next = urlencoding::decode(&decoded)?.into_owned();
        if next == decoded {
            break;
        }
        decoded = next;
    }
    Ok(decoded)
}

/// Deployment switch for the development-only guard bypass. Accepts the
/// usual boolean spellings: "1", "true", "yes", "on".
pub fn production_mode() -> bool {
    std::env::var("LABS_PRODUCTION")
        .ok()
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_compact_introspection() {
        assert!(is_blocked_introspection("{__schema{types{name}}}"));
        assert!(is_blocked_introspection("{__type{name}}"));
    }

    #[test]
    fn test_space_before_brace_bypasses() {
        assert!(!is_blocked_introspection(
            "query IntrospectionQuery { __schema { types { name } } }"
        ));
        assert!(!is_blocked_introspection("{__schema {types{name}}}"));
    }

    #[test]
    fn test_tab_collapses_to_space_and_bypasses() {
        assert!(!is_blocked_introspection("{__schema\t{types{name}}}"));
    }

    #[test]
    fn test_separator_stripping_still_blocks() {
        // '+' is stripped before matching, so it does not hide the brace
        assert!(is_blocked_introspection("{__schema+{types{name}}}"));
        // control characters are stripped too
        assert!(is_blocked_introspection("{__schema\u{1}{types{name}}}"));
    }

    #[test]
    fn test_plain_queries_pass() {
        assert!(!is_blocked_introspection(
            "query { getUser(id: \"2\") { username } }"
        ));
        assert!(!is_blocked_introspection(
            "mutation { deleteOrganizationUser(input: {id: \"3\"}) { user { id } } }"
        ));
    }

    #[test]
    fn test_decode_query_rounds() {
        assert_eq!(decode_query("{getUser}").unwrap(), "{getUser}");
        assert_eq!(decode_query("%7BgetUser%7D").unwrap(), "{getUser}");
        assert_eq!(decode_query("%257BgetUser%257D").unwrap(), "{getUser}");
        assert_eq!(decode_query("%25257BgetUser%25257D").unwrap(), "{getUser}");
    }

    #[test]
    fn test_decode_query_stops_after_three_rounds() {
        // four layers of encoding leaves one behind
        assert_eq!(decode_query("%2525257BgetUser").unwrap(), "%7BgetUser");
    }

    #[test]
    fn test_decode_query_rejects_invalid_utf8() {
        assert!(decode_query("%FF").is_err());
    }
}
