//! Boolean retrieval: `AND`, `OR`, `NOT` and parentheses over per-document token sets.
//!
//! Precedence is `NOT > AND > OR`. Chains of one operator are kept flat (`a OR b OR c` is a single
//! `Or` node), so only parentheses and `NOT` add depth, and that depth is capped. Two operands
//! written next to each other (`cat dog`, `cat NOT dog`) are joined by an implicit `AND`.

use crate::config::BOOLEAN_MAX_DEPTH;
use crate::error::{IrError, Result};
use crate::output::{BooleanResult, DocRef};
use crate::segment::Document;
use crate::tokenizer::Tokenizer;
use crate::DocId;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    And,
    Or,
    Not,
    Open,
    Close,
    Word(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Normalized term; `None` when the word normalizes to nothing and so matches nothing.
    Term(Option<String>),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

fn lex(query: &str) -> Vec<Token> {
    query
        .replace('(', " ( ")
        .replace(')', " ) ")
        .split_whitespace()
        .map(|w| match w {
            "(" => Token::Open,
            ")" => Token::Close,
            _ if w.eq_ignore_ascii_case("and") => Token::And,
            _ if w.eq_ignore_ascii_case("or") => Token::Or,
            _ if w.eq_ignore_ascii_case("not") => Token::Not,
            _ => Token::Word(w.to_string()),
        })
        .collect()
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    tokenizer: &'a Tokenizer,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> { self.tokens.get(self.pos) }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > BOOLEAN_MAX_DEPTH {
            return Err(IrError::MalformedQuery("query nested too deeply".into()));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr> {
        let mut operands = vec![self.and()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            operands.push(self.and()?);
        }
        Ok(if operands.len() == 1 { operands.remove(0) } else { Expr::Or(operands) })
    }

    fn and(&mut self) -> Result<Expr> {
        let mut operands = vec![self.unary()?];
        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.pos += 1;
                }
                Some(Token::Not) | Some(Token::Open) | Some(Token::Word(_)) => {}
                _ => break,
            }
            operands.push(self.unary()?);
        }
        Ok(if operands.len() == 1 { operands.remove(0) } else { Expr::And(operands) })
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            self.descend()?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.next() {
            Some(Token::Open) => {
                if self.peek() == Some(&Token::Close) {
                    return Err(IrError::MalformedQuery("empty parentheses".into()));
                }
                self.descend()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    _ => Err(IrError::MalformedQuery("missing closing parenthesis".into())),
                }
            }
            Some(Token::Word(w)) => Ok(Expr::Term(self.tokenizer.normalize_term(&w))),
            Some(Token::Close) => Err(IrError::MalformedQuery("unexpected closing parenthesis".into())),
            Some(op) => Err(IrError::MalformedQuery(format!("operator {} is missing an operand", op_name(&op)))),
            None => Err(IrError::MalformedQuery("query ends with a dangling operator".into())),
        }
    }
}

fn op_name(token: &Token) -> &'static str {
    match token {
        Token::And => "AND",
        Token::Or => "OR",
        Token::Not => "NOT",
        _ => "?",
    }
}

/// Parses a boolean query, normalizing every term the same way document tokens are.
pub fn parse(query: &str, tokenizer: &Tokenizer) -> Result<Expr> {
    let tokens = lex(query);
    if tokens.is_empty() {
        return Err(IrError::EmptyQuery);
    }
    let mut parser = Parser { tokens, pos: 0, depth: 0, tokenizer };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(Token::Close) => Err(IrError::MalformedQuery("unbalanced closing parenthesis".into())),
        Some(_) => Err(IrError::MalformedQuery("unexpected trailing input".into())),
    }
}

impl Expr {
    /// Set of documents satisfying the expression.
    pub fn evaluate(&self, docs: &[Document]) -> BTreeSet<DocId> {
        let sets: Vec<HashSet<&str>> = docs.iter().map(|d| d.tokens.iter().map(String::as_str).collect()).collect();
        self.eval(&sets)
    }

    fn eval(&self, sets: &[HashSet<&str>]) -> BTreeSet<DocId> {
        match self {
            Expr::Term(None) => BTreeSet::new(),
            Expr::Term(Some(t)) => (0..sets.len()).filter(|&i| sets[i].contains(t.as_str())).collect(),
            Expr::Not(inner) => {
                let excluded = inner.eval(sets);
                (0..sets.len()).filter(|i| !excluded.contains(i)).collect()
            }
            Expr::And(operands) => {
                let mut acc: BTreeSet<DocId> = (0..sets.len()).collect();
                for op in operands {
                    if acc.is_empty() {
                        break;
                    }
                    let next = op.eval(sets);
                    acc.retain(|id| next.contains(id));
                }
                acc
            }
            Expr::Or(operands) => operands.iter().flat_map(|op| op.eval(sets)).collect(),
        }
    }
}

pub fn boolean_search(expr: &Expr, docs: &[Document]) -> BooleanResult {
    let matched = expr.evaluate(docs);
    tracing::debug!(matched_docs = matched.len(), "boolean search");
    BooleanResult { matched_documents: matched.into_iter().map(|id| DocRef::from(&docs[id])).collect() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment;
    use crate::tokenizer::StemmerKind;

    fn tok() -> Tokenizer { Tokenizer::new(StemmerKind::None) }

    fn run(query: &str, raw: &str) -> Result<Vec<usize>> {
        let tokenizer = tok();
        let docs = segment(raw, &tokenizer)?;
        let expr = parse(query, &tokenizer)?;
        Ok(boolean_search(&expr, &docs).matched_documents.into_iter().map(|d| d.doc_id).collect())
    }

    #[test]
    fn and_or_not_with_parentheses() {
        let corpus = "alpha bravo\nalpha delta\nalpha charlie delta\nalpha charlie";
        let hits = run("alpha AND (bravo OR charlie) NOT delta", corpus).unwrap();
        assert_eq!(hits, vec![1, 4]);
    }

    #[test]
    fn precedence_not_and_or() {
        let tokenizer = tok();
        let expr = parse("alpha OR bravo AND NOT charlie", &tokenizer).unwrap();
        let term = |w: &str| Expr::Term(Some(w.to_string()));
        assert_eq!(
            expr,
            Expr::Or(vec![term("alpha"), Expr::And(vec![term("bravo"), Expr::Not(Box::new(term("charlie")))])])
        );
    }

    #[test]
    fn operator_chains_are_flat() {
        let tokenizer = tok();
        let term = |w: &str| Expr::Term(Some(w.to_string()));
        let expr = parse("aaaa OR bbbb OR cccc", &tokenizer).unwrap();
        assert_eq!(expr, Expr::Or(vec![term("aaaa"), term("bbbb"), term("cccc")]));
        let expr = parse("aaaa bbbb AND cccc", &tokenizer).unwrap();
        assert_eq!(expr, Expr::And(vec![term("aaaa"), term("bbbb"), term("cccc")]));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let tokenizer = tok();
        let parens = format!("{}alpha{}", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(parse(&parens, &tokenizer), Err(IrError::MalformedQuery("query nested too deeply".into())));
        let nots = format!("{}alpha", "NOT ".repeat(20_000));
        assert_eq!(parse(&nots, &tokenizer), Err(IrError::MalformedQuery("query nested too deeply".into())));

        let ok = format!("{}alpha{}", "(".repeat(BOOLEAN_MAX_DEPTH), ")".repeat(BOOLEAN_MAX_DEPTH));
        assert_eq!(run(&ok, "alpha\nbravo").unwrap(), vec![1]);
    }

    #[test]
    fn long_flat_query_evaluates() {
        let query = vec!["alpha"; 20_000].join(" OR ");
        assert_eq!(run(&query, "alpha\nbravo").unwrap(), vec![1]);
        let query = vec!["alpha"; 20_000].join(" ");
        assert_eq!(run(&query, "alpha\nbravo").unwrap(), vec![1]);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(run("alpha and not bravo", "alpha bravo\nalpha").unwrap(), vec![2]);
    }

    #[test]
    fn leading_not_is_complement() {
        assert_eq!(run("NOT alpha", "alpha\nbravo\ncharlie").unwrap(), vec![2, 3]);
    }

    #[test]
    fn malformed_queries() {
        for q in ["(alpha AND bravo", "alpha AND bravo)", "alpha AND", "OR alpha", "alpha AND ()", "NOT"] {
            let err = run(q, "alpha bravo").unwrap_err();
            assert!(matches!(err, IrError::MalformedQuery(_)), "{q:?} gave {err:?}");
        }
    }

    #[test]
    fn terms_are_normalized_like_documents() {
        let tokenizer = Tokenizer::new(StemmerKind::English);
        let docs = segment("The runners were running\nnothing relevant", &tokenizer).unwrap();
        let expr = parse("RUNNING", &tokenizer).unwrap();
        let ids: Vec<usize> = expr.evaluate(&docs).into_iter().collect();
        assert_eq!(ids, vec![0]);
    }
}
