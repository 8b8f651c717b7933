//! Variable-name helpers: the `$`/`#`/`?`/`%` prefix conventions.

use super::{Name, Op};
use crate::error::TermError;
use smartstring::SmartString;

pub fn prefix(kind: Op) -> char {
    match kind {
        Op::VarIndep => '$',
        Op::VarDep => '#',
        Op::VarQuery => '?',
        Op::VarPattern => '%',
        _ => unreachable!("prefix() called on a non-variable Op"),
    }
}

/// Normalize a variable name to carry its kind's prefix exactly once.
pub fn normalize(kind: Op, name: &str) -> Result<Name, TermError> {
    let bare = name.trim_start_matches(prefix(kind));
    if bare.is_empty() {
        return Err(TermError::EmptyVariableName(name.to_string()));
    }
    Ok(SmartString::from(format!("{}{}", prefix(kind), bare)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_missing_prefix() {
        assert_eq!(normalize(Op::VarIndep, "x").unwrap(), "$x");
        assert_eq!(normalize(Op::VarQuery, "?x").unwrap(), "?x");
    }

    #[test]
    fn normalize_rejects_bare_prefix() {
        assert!(normalize(Op::VarDep, "#").is_err());
    }
}
