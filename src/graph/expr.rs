use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// A dependency token that did not read cleanly as a bare unit name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedToken {
    pub token: String,
    /// Name recovered from the front of the token, if any.
    pub salvaged: Option<String>,
}

impl fmt::Display for MalformedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.salvaged {
            Some(name) => write!(f, "malformed dependency '{}', using '{}'", self.token, name),
            None => write!(f, "malformed dependency '{}', dropped", self.token),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedExpression {
    pub names: Vec<String>,
    pub malformed: Vec<MalformedToken>,
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9+.\-_]*(?::[A-Za-z0-9\-]+)?")
            .expect("unit name pattern is valid")
    })
}

/// Splits a `Depends`-style expression into unit names.
///
/// Commas separate required clauses and pipes separate alternatives; every
/// alternative is kept. Version annotations such as `(>= 1.2)` are dropped,
/// and repeated names collapse to their first occurrence.
pub fn parse_dependency_expression(expression: &str) -> ParsedExpression {
    let mut parsed = ParsedExpression::default();
    if expression.trim().is_empty() {
        return parsed;
    }

    let mut seen = HashSet::new();
    for token in expression.split([',', '|']) {
        let token = token.trim();
        let Some(name) = extract_name(token, &mut parsed.malformed) else {
            continue;
        };
        if seen.insert(name.clone()) {
            parsed.names.push(name);
        }
    }
    parsed
}

fn extract_name(token: &str, malformed: &mut Vec<MalformedToken>) -> Option<String> {
    let leading = token
        .split(|ch: char| ch.is_whitespace() || ch == '(')
        .next()
        .unwrap_or("");
    if leading.is_empty() {
        malformed.push(MalformedToken {
            token: token.to_string(),
            salvaged: None,
        });
        return None;
    }

    match name_pattern().find(leading) {
        Some(found) if found.as_str() == leading => Some(leading.to_string()),
        Some(found) => {
            let name = found.as_str().to_string();
            malformed.push(MalformedToken {
                token: token.to_string(),
                salvaged: Some(name.clone()),
            });
            Some(name)
        }
        None => {
            malformed.push(MalformedToken {
                token: token.to_string(),
                salvaged: None,
            });
            None
        }
    }
}
