//! Narsese surface-syntax parser (spec §6).
//!
//! Grounded on the teacher's hand-rolled recursive-descent parser, rewritten
//! against `pest`/`pest_derive` the way the other example repos in this
//! corpus parse small domain languages: a `.pest` grammar file plus a thin
//! tree-walking pass that builds `Term`s bottom-up through `TermStore`.

use crate::error::{NarError, ParseError};
use crate::stamp::Stamp;
use crate::task::{Punctuation, Task, TaskBuilder, Tense};
use crate::term::{Op, Term, TermStore};
use crate::time::Clock;
use crate::truth::Truth;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "parser/narsese.pest"]
struct NarseseParser;

/// Parse one line of Narsese into a `Task`, interning every term through
/// `store` (spec §6 grammar). `stamp_max_length` bounds the fresh input
/// stamp; `clock` supplies occurrence/creation time.
pub fn parse_task(
    store: &mut TermStore,
    input: &str,
    clock: &Clock,
    stamp_max_length: usize,
) -> Result<Task, NarError> {
    let input = input.trim();
    let mut pairs = NarseseParser::parse(Rule::sentence, input)
        .map_err(|e| ParseError::Syntax { pos: 0, message: e.to_string() })?;
    let sentence = pairs.next().ok_or(ParseError::Eof)?;

    let mut term = None;
    let mut punctuation = None;
    let mut tense = Tense::Eternal;
    let mut truth = None;

    for part in sentence.into_inner() {
        match part.as_rule() {
            Rule::budget => {} // attentional budget annotation: parsed, not yet threaded to Task::budget
            Rule::term => term = Some(build_term(store, part)?),
            Rule::punctuation => punctuation = Some(parse_punctuation(part.as_str())?),
            Rule::tense => tense = parse_tense(part.as_str(), clock),
            Rule::truth => truth = Some(parse_truth(part)?),
            Rule::EOI => {}
            _ => {}
        }
    }

    let term = term.ok_or(ParseError::Eof)?;
    let punctuation = punctuation.ok_or(ParseError::Eof)?;
    let now = clock.now();
    let stamp = Stamp::new_input(now, now, stamp_max_length);

    let mut builder = TaskBuilder::new().term(term).punctuation(punctuation).tense(tense).stamp(stamp);
    if let Some(truth) = truth {
        builder = builder.truth(truth);
    } else if punctuation.carries_truth() {
        builder = builder.truth(Truth::default_belief());
    }

    builder
        .build()
        .map_err(|msg| NarError::Parse(ParseError::Syntax { pos: 0, message: msg.to_string() }))
}

fn parse_punctuation(s: &str) -> Result<Punctuation, ParseError> {
    match s {
        "." => Ok(Punctuation::Belief),
        "!" => Ok(Punctuation::Goal),
        "?" => Ok(Punctuation::Question),
        "@" => Ok(Punctuation::Quest),
        ";" => Ok(Punctuation::Command),
        other => Err(ParseError::Syntax { pos: 0, message: format!("unknown punctuation {other:?}") }),
    }
}

fn parse_tense(s: &str, clock: &Clock) -> Tense {
    match s {
        ":/:" => Tense::At(clock.now() + 1),
        ":\\:" => Tense::At(clock.now() - 1),
        _ => Tense::Eternal,
    }
}

fn parse_truth(pair: Pair<Rule>) -> Result<Truth, ParseError> {
    let mut numbers = pair.into_inner().filter(|p| p.as_rule() == Rule::number);
    let f: f32 = numbers
        .next()
        .ok_or(ParseError::Eof)?
        .as_str()
        .parse()
        .map_err(|_| ParseError::Syntax { pos: 0, message: "invalid frequency".into() })?;
    let c: f32 = numbers
        .next()
        .ok_or(ParseError::Eof)?
        .as_str()
        .parse()
        .map_err(|_| ParseError::Syntax { pos: 0, message: "invalid confidence".into() })?;
    Ok(Truth::new(f, c))
}

/// Walk one `term` parse node, interning bottom-up through `store`.
fn build_term(store: &mut TermStore, pair: Pair<Rule>) -> Result<Term, NarError> {
    let inner = pair.into_inner().next().ok_or(ParseError::Eof)?;
    match inner.as_rule() {
        Rule::atom => Ok(store.intern_atomic(inner.as_str())?),
        Rule::variable => build_variable(store, inner),
        Rule::compound => build_compound(store, inner),
        other => Err(NarError::Parse(ParseError::Syntax {
            pos: 0,
            message: format!("unexpected term node {other:?}"),
        })),
    }
}

fn build_variable(store: &mut TermStore, pair: Pair<Rule>) -> Result<Term, NarError> {
    let text = pair.as_str();
    let kind = match text.chars().next() {
        Some('$') => Op::VarIndep,
        Some('#') => Op::VarDep,
        Some('?') => Op::VarQuery,
        _ => return Err(NarError::Parse(ParseError::Syntax { pos: 0, message: "malformed variable".into() })),
    };
    Ok(store.intern_variable(kind, text)?)
}

fn build_compound(store: &mut TermStore, pair: Pair<Rule>) -> Result<Term, NarError> {
    let inner = pair.into_inner().next().ok_or(ParseError::Eof)?;
    match inner.as_rule() {
        Rule::infix_compound => build_infix(store, inner),
        Rule::negation_compound => {
            let term = build_term(store, inner.into_inner().next().ok_or(ParseError::Eof)?)?;
            Ok(store.intern_compound(Op::Negation, vec![term], None)?)
        }
        Rule::prefix_compound => build_prefix(store, inner),
        Rule::ext_set => build_set(store, inner, Op::SetExt),
        Rule::int_set => build_set(store, inner, Op::SetInt),
        other => Err(NarError::Parse(ParseError::Syntax {
            pos: 0,
            message: format!("unexpected compound node {other:?}"),
        })),
    }
}

fn build_infix(store: &mut TermStore, pair: Pair<Rule>) -> Result<Term, NarError> {
    let mut parts = pair.into_inner();
    let lhs = build_term(store, parts.next().ok_or(ParseError::Eof)?)?;
    let op_text = parts.next().ok_or(ParseError::Eof)?.as_str();
    let rhs = build_term(store, parts.next().ok_or(ParseError::Eof)?)?;
    let op = match op_text {
        "-->" => Op::Inheritance,
        "<->" => Op::Similarity,
        "==>" => Op::Implication,
        "<=>" => Op::Equivalence,
        other => {
            return Err(NarError::Parse(ParseError::Syntax {
                pos: 0,
                message: format!("unknown infix operator {other:?}"),
            }))
        }
    };
    Ok(store.intern_compound(op, vec![lhs, rhs], None)?)
}

fn build_prefix(store: &mut TermStore, pair: Pair<Rule>) -> Result<Term, NarError> {
    let mut parts = pair.into_inner();
    let op_text = parts.next().ok_or(ParseError::Eof)?.as_str();
    let op = match op_text {
        "&&" => Op::Conjunction,
        "||" => Op::Disjunction,
        "*" => Op::Product,
        "&" => Op::IntersectionExt,
        "|" => Op::IntersectionInt,
        "-" => Op::DifferenceExt,
        "~" => Op::DifferenceInt,
        other => {
            return Err(NarError::Parse(ParseError::Syntax {
                pos: 0,
                message: format!("unknown prefix operator {other:?}"),
            }))
        }
    };
    let mut subterms = Vec::new();
    for part in parts {
        subterms.push(build_term(store, part)?);
    }
    Ok(store.intern_compound(op, subterms, None)?)
}

fn build_set(store: &mut TermStore, pair: Pair<Rule>, op: Op) -> Result<Term, NarError> {
    let mut subterms = Vec::new();
    for part in pair.into_inner() {
        subterms.push(build_term(store, part)?);
    }
    Ok(store.intern_compound(op, subterms, None)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_and_clock() -> (TermStore, Clock) {
        (TermStore::new(), Clock::new())
    }

    #[test]
    fn parses_plain_atomic_belief() {
        let (mut store, clock) = store_and_clock();
        let task = parse_task(&mut store, "cat.", &clock, 8).unwrap();
        assert!(task.is_belief());
        assert_eq!(task.term().atom_name(), Some("cat"));
    }

    #[test]
    fn parses_inheritance_with_truth() {
        let (mut store, clock) = store_and_clock();
        let task = parse_task(&mut store, "<robin --> bird>. %0.9;0.9%", &clock, 8).unwrap();
        assert_eq!(task.term().op(), Op::Inheritance);
        let truth = task.truth().unwrap();
        assert!((truth.frequency() - 0.9).abs() < 1e-6);
        assert!((truth.confidence() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn parses_question_without_truth() {
        let (mut store, clock) = store_and_clock();
        let task = parse_task(&mut store, "<robin --> animal>?", &clock, 8).unwrap();
        assert!(task.is_question());
        assert!(task.truth().is_none());
    }

    #[test]
    fn parses_query_variable() {
        let (mut store, clock) = store_and_clock();
        let task = parse_task(&mut store, "<?what --> animal>?", &clock, 8).unwrap();
        assert_eq!(task.term().subterms()[0].op(), Op::VarQuery);
    }

    #[test]
    fn parses_conjunction_and_negation() {
        let (mut store, clock) = store_and_clock();
        let conj = parse_task(&mut store, "(&&, a, b).", &clock, 8).unwrap();
        assert_eq!(conj.term().op(), Op::Conjunction);
        let neg = parse_task(&mut store, "(--, a).", &clock, 8).unwrap();
        assert_eq!(neg.term().op(), Op::Negation);
    }

    #[test]
    fn parses_extensional_set() {
        let (mut store, clock) = store_and_clock();
        let task = parse_task(&mut store, "{a, b, c}.", &clock, 8).unwrap();
        assert_eq!(task.term().op(), Op::SetExt);
        assert_eq!(task.term().subterms().len(), 3);
    }

    #[test]
    fn rejects_garbage_input() {
        let (mut store, clock) = store_and_clock();
        assert!(parse_task(&mut store, "<<< not valid", &clock, 8).is_err());
    }
}
