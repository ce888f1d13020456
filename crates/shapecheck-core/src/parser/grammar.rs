//! The contract grammar as a fixed production table
//!
//! ```text
//! fun            := fixed_tup '->' typ
//! fixed_tup      := '(' ')' | '(' typ ',' more_fixed_tup ')'
//! more_fixed_tup := ε | typ | typ ',' more_fixed_tup
//! list           := '[' typ ']'
//! set            := '{' typ '}'
//! dict           := typ ':' typ
//! t              := fixed_tup | list | set | dict | TYPE_NAME | '(' typ ')' | fun
//! typ            := t '?' | t
//! ```
//!
//! The table is deliberately left ambiguous in places (`str -> str -> str`
//! style chains, `a:b:c`); the parser rejects such input instead of
//! picking a bracketing.

use serde::Serialize;

use super::tokenizer::Terminal;

/// Nonterminals of the contract grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NonTerminal {
    Fun,
    FixedTup,
    MoreFixedTup,
    List,
    Set,
    Dict,
    T,
    Typ,
}

impl std::fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            NonTerminal::Fun => "fun",
            NonTerminal::FixedTup => "fixed_tup",
            NonTerminal::MoreFixedTup => "more_fixed_tup",
            NonTerminal::List => "list",
            NonTerminal::Set => "set",
            NonTerminal::Dict => "dict",
            NonTerminal::T => "t",
            NonTerminal::Typ => "typ",
        };
        write!(f, "{}", name)
    }
}

/// Grammar symbol: something a rule's right-hand side can expect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Term(Terminal),
    NonTerm(NonTerminal),
}

/// Names every alternative so the checker can dispatch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Production {
    FunArrow,
    TupleEmpty,
    TupleElems,
    MoreEmpty,
    MoreLast,
    MoreNext,
    ListOf,
    SetOf,
    DictOf,
    TTuple,
    TList,
    TSet,
    TDict,
    TName,
    TParen,
    TFun,
    TypNullable,
    TypPlain,
}

/// A single production `lhs := rhs`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub production: Production,
    pub lhs: NonTerminal,
    pub rhs: &'static [Symbol],
}

use NonTerminal as N;
use Symbol::{NonTerm, Term};
use Terminal as Tm;

/// Start symbol of every contract
pub const ROOT: NonTerminal = NonTerminal::Fun;

/// The immutable, process-wide rule table
pub static RULES: &[Rule] = &[
    Rule {
        production: Production::FunArrow,
        lhs: N::Fun,
        rhs: &[NonTerm(N::FixedTup), Term(Tm::Arrow), NonTerm(N::Typ)],
    },
    Rule {
        production: Production::TupleEmpty,
        lhs: N::FixedTup,
        rhs: &[Term(Tm::LParen), Term(Tm::RParen)],
    },
    Rule {
        production: Production::TupleElems,
        lhs: N::FixedTup,
        rhs: &[
            Term(Tm::LParen),
            NonTerm(N::Typ),
            Term(Tm::Comma),
            NonTerm(N::MoreFixedTup),
            Term(Tm::RParen),
        ],
    },
    Rule {
        production: Production::MoreEmpty,
        lhs: N::MoreFixedTup,
        rhs: &[],
    },
    Rule {
        production: Production::MoreLast,
        lhs: N::MoreFixedTup,
        rhs: &[NonTerm(N::Typ)],
    },
    Rule {
        production: Production::MoreNext,
        lhs: N::MoreFixedTup,
        rhs: &[NonTerm(N::Typ), Term(Tm::Comma), NonTerm(N::MoreFixedTup)],
    },
    Rule {
        production: Production::ListOf,
        lhs: N::List,
        rhs: &[Term(Tm::LBracket), NonTerm(N::Typ), Term(Tm::RBracket)],
    },
    Rule {
        production: Production::SetOf,
        lhs: N::Set,
        rhs: &[Term(Tm::LBrace), NonTerm(N::Typ), Term(Tm::RBrace)],
    },
    Rule {
        production: Production::DictOf,
        lhs: N::Dict,
        rhs: &[NonTerm(N::Typ), Term(Tm::Colon), NonTerm(N::Typ)],
    },
    Rule {
        production: Production::TTuple,
        lhs: N::T,
        rhs: &[NonTerm(N::FixedTup)],
    },
    Rule {
        production: Production::TList,
        lhs: N::T,
        rhs: &[NonTerm(N::List)],
    },
    Rule {
        production: Production::TSet,
        lhs: N::T,
        rhs: &[NonTerm(N::Set)],
    },
    Rule {
        production: Production::TDict,
        lhs: N::T,
        rhs: &[NonTerm(N::Dict)],
    },
    Rule {
        production: Production::TName,
        lhs: N::T,
        rhs: &[Term(Tm::TypeName)],
    },
    Rule {
        production: Production::TParen,
        lhs: N::T,
        rhs: &[Term(Tm::LParen), NonTerm(N::Typ), Term(Tm::RParen)],
    },
    Rule {
        production: Production::TFun,
        lhs: N::T,
        rhs: &[NonTerm(N::Fun)],
    },
    Rule {
        production: Production::TypNullable,
        lhs: N::Typ,
        rhs: &[NonTerm(N::T), Term(Tm::Question)],
    },
    Rule {
        production: Production::TypPlain,
        lhs: N::Typ,
        rhs: &[NonTerm(N::T)],
    },
];

/// Index into [`RULES`]
pub type RuleId = usize;

/// All rules defining `lhs`, in table order
pub fn rules_for(lhs: NonTerminal) -> impl Iterator<Item = RuleId> {
    RULES
        .iter()
        .enumerate()
        .filter(move |(_, rule)| rule.lhs == lhs)
        .map(|(id, _)| id)
}
