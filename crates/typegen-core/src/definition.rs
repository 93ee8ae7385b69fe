//! Parsing of raw `DEFINE FIELD` statements.
//!
//! Field definitions are semi-structured text, so this parser never fails:
//! anything it cannot recognise degrades to an optional `string` field.

/// Kind used when a definition carries no `TYPE` clause.
pub const DEFAULT_KIND: &str = "string";

/// Typed view of a single `DEFINE FIELD` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDefinition {
    /// Base kind name (`string`, `int`, `object`, `array`, `record`, ...)
    pub kind: String,
    /// Whether an `ASSERT $value != NONE` clause is present
    pub not_null: bool,
    /// Target table of a `record(table)` kind
    pub ref_target: Option<String>,
    /// Item type declared inline as `array<T>`
    pub item: Option<Box<ParsedDefinition>>,
}

impl ParsedDefinition {
    pub fn is_object(&self) -> bool {
        self.kind == "object"
    }

    pub fn is_array(&self) -> bool {
        self.kind == "array"
    }
}

/// Parse a raw field definition.
///
/// ```rust
/// use typegen_core::parse_definition;
///
/// let parsed = parse_definition("DEFINE FIELD author ON post TYPE record(user) ASSERT $value != NONE");
/// assert_eq!(parsed.kind, "record");
/// assert_eq!(parsed.ref_target.as_deref(), Some("user"));
/// assert!(parsed.not_null);
/// ```
pub fn parse_definition(definition: &str) -> ParsedDefinition {
    let raw_kind = type_token(definition).unwrap_or(DEFAULT_KIND);
    let mut parsed = parse_kind(raw_kind);
    parsed.not_null = asserts_not_null(definition);
    parsed
}

/// The whitespace-delimited token following the `TYPE` keyword.
fn type_token(definition: &str) -> Option<&str> {
    let mut tokens = definition.split_whitespace();
    tokens.find(|token| *token == "TYPE")?;
    let token = tokens.next()?.trim_end_matches(';');
    (!token.is_empty()).then_some(token)
}

/// Split a kind token such as `record(user)` or `array<record<user>>`.
fn parse_kind(raw: &str) -> ParsedDefinition {
    let Some(open) = raw.find(['(', '<']) else {
        return leaf_kind(raw);
    };

    let base = &raw[..open];
    let rest = &raw[open + 1..];
    let (inner, closed) = match rest.strip_suffix([')', '>']) {
        Some(inner) => (inner, true),
        None => (rest, false),
    };

    match base {
        "option" => parse_kind(inner),
        "record" => ParsedDefinition {
            kind: "record".to_string(),
            not_null: false,
            ref_target: closed.then(|| table_identifier(inner)).flatten(),
            item: None,
        },
        "array" | "set" => {
            let item = first_argument(inner);
            ParsedDefinition {
                kind: "array".to_string(),
                not_null: false,
                ref_target: None,
                item: (!item.is_empty()).then(|| Box::new(parse_kind(item))),
            }
        }
        _ => leaf_kind(base),
    }
}

fn leaf_kind(kind: &str) -> ParsedDefinition {
    let kind = if kind.is_empty() { DEFAULT_KIND } else { kind };
    ParsedDefinition {
        kind: if kind == "set" { "array" } else { kind }.to_string(),
        not_null: false,
        ref_target: None,
        item: None,
    }
}

/// First top-level argument of a generic list, e.g. `int` in `int, 10`.
fn first_argument(args: &str) -> &str {
    let mut depth = 0usize;
    for (idx, c) in args.char_indices() {
        match c {
            '(' | '<' => depth += 1,
            ')' | '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return args[..idx].trim(),
            _ => {}
        }
    }
    args.trim()
}

fn table_identifier(s: &str) -> Option<String> {
    let s = s.trim();
    let valid = !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| s.to_string())
}

/// Whether the `ASSERT` clause rejects the NONE/NULL sentinel.
///
/// `ASSERT` must be a whole word, and the sentinel must end at a word
/// boundary (`$value != NONEXISTENT` does not count).
fn asserts_not_null(definition: &str) -> bool {
    let Some(clause) = assert_clause(definition) else {
        return false;
    };
    let clause = clause.to_ascii_uppercase();
    clause
        .match_indices("$VALUE")
        .any(|(pos, var)| rejects_sentinel(&clause[pos + var.len()..]))
}

/// Text following the first standalone `ASSERT` keyword.
fn assert_clause(definition: &str) -> Option<&str> {
    definition
        .match_indices("ASSERT")
        .find_map(|(pos, keyword)| {
            let after = &definition[pos + keyword.len()..];
            let standalone = definition[..pos]
                .chars()
                .next_back()
                .map_or(true, char::is_whitespace)
                && after.starts_with(char::is_whitespace);
            standalone.then_some(after)
        })
}

/// Whether `rest` (following `$VALUE`) reads `!= NONE` or `!= NULL`.
fn rejects_sentinel(rest: &str) -> bool {
    let Some(rest) = rest.trim_start().strip_prefix("!=") else {
        return false;
    };
    let rest = rest.trim_start();
    ["NONE", "NULL"].iter().any(|sentinel| {
        rest.strip_prefix(sentinel)
            .is_some_and(|tail| !tail.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_'))
    })
}
