//! Compound-term arity rules and surface-syntax formatting.
//!
//! Display follows the two compound productions in spec §6's grammar —
//! `'<' term op term '>'` for the four binary copulas, `'(' op ',' term
//! {',' term} ')'` for the rest — plus the bracket forms NARS literature
//! uses for extensional/intensional sets.

use super::{Op, Term};
use crate::error::TermError;
use std::fmt;

/// Minimum arity for each compound operator. `None` means "unbounded above
/// the minimum" is also fine — all compounds here have no fixed maximum.
pub fn min_arity(op: Op) -> usize {
    match op {
        Op::Negation => 1,
        Op::Inheritance
        | Op::Similarity
        | Op::Implication
        | Op::Equivalence
        | Op::IntersectionExt
        | Op::IntersectionInt
        | Op::DifferenceExt
        | Op::DifferenceInt => 2,
        Op::Conjunction | Op::Disjunction => 2,
        Op::Product | Op::SetExt | Op::SetInt => 1,
        Op::Atom | Op::VarIndep | Op::VarDep | Op::VarQuery | Op::VarPattern => 0,
    }
}

/// Strict maximum, where the operator is fixed-arity (the binary copulas and
/// negation). `None` for variadic operators.
pub fn max_arity(op: Op) -> Option<usize> {
    match op {
        Op::Negation => Some(1),
        Op::Inheritance
        | Op::Similarity
        | Op::Implication
        | Op::Equivalence
        | Op::IntersectionExt
        | Op::IntersectionInt
        | Op::DifferenceExt
        | Op::DifferenceInt => Some(2),
        _ => None,
    }
}

pub fn validate_arity(op: Op, len: usize) -> Result<(), TermError> {
    let min = min_arity(op);
    if len < min {
        return Err(TermError::Arity { op: op.symbol_name(), min, got: len });
    }
    if let Some(max) = max_arity(op) {
        if len > max {
            return Err(TermError::Arity { op: op.symbol_name(), min: max, got: len });
        }
    }
    Ok(())
}

impl Op {
    pub(crate) fn symbol_name(self) -> &'static str {
        match self {
            Op::Inheritance => "-->",
            Op::Similarity => "<->",
            Op::Implication => "==>",
            Op::Equivalence => "<=>",
            Op::Conjunction => "&&",
            Op::Disjunction => "||",
            Op::Product => "*",
            Op::IntersectionExt => "&",
            Op::IntersectionInt => "|",
            Op::DifferenceExt => "-",
            Op::DifferenceInt => "~",
            Op::Negation => "--",
            Op::SetExt => "{}",
            Op::SetInt => "[]",
            Op::Atom | Op::VarIndep | Op::VarDep | Op::VarQuery | Op::VarPattern => "",
        }
    }
}

pub fn format(op: Op, subterms: &[Term], dt: Option<i32>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match op {
        Op::Inheritance | Op::Similarity | Op::Implication | Op::Equivalence => {
            write!(f, "<{} {} {}>", subterms[0], op, subterms[1])?;
        }
        Op::Negation => {
            write!(f, "(--, {})", subterms[0])?;
        }
        Op::SetExt | Op::SetInt => {
            let (open, close) = if op == Op::SetExt { ('{', '}') } else { ('[', ']') };
            write!(f, "{}", open)?;
            for (i, t) in subterms.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", t)?;
            }
            write!(f, "{}", close)?;
        }
        _ => {
            write!(f, "({}", op)?;
            for t in subterms {
                write!(f, ", {}", t)?;
            }
            write!(f, ")")?;
        }
    }
    if let Some(dt) = dt {
        write!(f, "_{}", dt)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_rules() {
        assert!(validate_arity(Op::Inheritance, 2).is_ok());
        assert!(validate_arity(Op::Inheritance, 1).is_err());
        assert!(validate_arity(Op::Inheritance, 3).is_err());
        assert!(validate_arity(Op::Negation, 1).is_ok());
        assert!(validate_arity(Op::Negation, 2).is_err());
        assert!(validate_arity(Op::Product, 5).is_ok());
    }
}
