//! Earley chart parser
//!
//! For an input of length N the chart holds N+1 columns. Column `i` holds
//! every state whose dot has advanced through input offset `i`. Each column
//! is driven to a fixpoint with predict / scan / complete before the next
//! one is looked at.
//!
//! States remember the children they have matched so far. A completed
//! child is referenced by its `(column, index)` slot; since columns never
//! hold two equal states, equal slots mean equal derivations and every
//! distinct full-span parse shows up as a distinct final state.

use std::collections::HashSet;

use super::ast::{Node, NodeId, ParseTree, TreeBuilder};
use super::grammar::{rules_for, RuleId, Symbol, ROOT, RULES};
use super::tokenizer::{self, Terminal};

/// Something a state has already matched
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Child {
    /// A scanned terminal covering `start..end`
    Leaf {
        terminal: Terminal,
        start: usize,
        end: usize,
    },
    /// A completed state living in `column` at `index`
    Completed { column: usize, index: usize },
}

/// A chart entry: rule `rule` with the dot after `dot` symbols
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct State {
    origin: usize,
    rule: RuleId,
    dot: usize,
    children: Vec<Child>,
}

impl State {
    fn predicted(origin: usize, rule: RuleId) -> Self {
        State {
            origin,
            rule,
            dot: 0,
            children: Vec::new(),
        }
    }

    fn next_symbol(&self) -> Option<Symbol> {
        RULES[self.rule].rhs.get(self.dot).copied()
    }

    fn is_complete(&self) -> bool {
        self.dot == RULES[self.rule].rhs.len()
    }

    fn advance(&self, child: Child) -> State {
        let mut children = self.children.clone();
        children.push(child);
        State {
            origin: self.origin,
            rule: self.rule,
            dot: self.dot + 1,
            children,
        }
    }
}

#[derive(Debug, Default)]
struct Column {
    states: Vec<State>,
    seen: HashSet<State>,
}

impl Column {
    /// Add a state unless an equal one is already present
    fn insert(&mut self, state: State) -> bool {
        if self.seen.contains(&state) {
            return false;
        }
        self.seen.insert(state.clone());
        self.states.push(state);
        true
    }
}

/// A fully computed chart over one whitespace-free input
#[derive(Debug)]
pub struct Chart<'a> {
    input: &'a str,
    columns: Vec<Column>,
}

impl<'a> Chart<'a> {
    /// Build the chart for `input` (which must already be whitespace-free)
    pub fn build(input: &'a str) -> Self {
        let mut columns: Vec<Column> = (0..=input.len()).map(|_| Column::default()).collect();
        for rule in rules_for(ROOT) {
            columns[0].insert(State::predicted(0, rule));
        }

        let mut chart = Chart { input, columns };
        for i in 0..chart.columns.len() {
            chart.fill_column(i);
        }
        chart
    }

    /// Total number of states across all columns
    pub fn state_count(&self) -> usize {
        self.columns.iter().map(|c| c.states.len()).sum()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn fill_column(&mut self, i: usize) {
        loop {
            let before = self.columns[i].states.len();
            let mut k = 0;
            while k < self.columns[i].states.len() {
                self.process(i, k);
                k += 1;
            }
            if self.columns[i].states.len() == before {
                break;
            }
        }
    }

    fn process(&mut self, i: usize, k: usize) {
        let state = self.columns[i].states[k].clone();
        match state.next_symbol() {
            Some(Symbol::NonTerm(nt)) => self.predict(i, nt),
            Some(Symbol::Term(terminal)) => self.scan(i, &state, terminal),
            None => self.complete(i, k, &state),
        }
    }

    fn predict(&mut self, i: usize, nt: super::grammar::NonTerminal) {
        for rule in rules_for(nt) {
            self.columns[i].insert(State::predicted(i, rule));
        }
    }

    fn scan(&mut self, i: usize, state: &State, terminal: Terminal) {
        if let Some(token) = tokenizer::scan(self.input, i, terminal) {
            let end = i + token.text.len();
            let next = state.advance(Child::Leaf {
                terminal,
                start: i,
                end,
            });
            self.columns[end].insert(next);
        }
    }

    fn complete(&mut self, i: usize, k: usize, state: &State) {
        let lhs = RULES[state.rule].lhs;
        let waiting: Vec<State> = self.columns[state.origin]
            .states
            .iter()
            .filter(|p| p.next_symbol() == Some(Symbol::NonTerm(lhs)))
            .cloned()
            .collect();
        for parent in waiting {
            self.columns[i].insert(parent.advance(Child::Completed {
                column: i,
                index: k,
            }));
        }
    }

    /// Indices of completed root states spanning the whole input
    fn accepted(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns[self.columns.len() - 1]
            .states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.origin == 0 && s.is_complete() && RULES[s.rule].lhs == ROOT)
            .map(|(index, _)| index)
    }

    /// Number of distinct full-span parses, without building any tree
    pub fn parse_count(&self) -> usize {
        self.accepted().count()
    }

    /// The parse tree when exactly one full-span parse exists
    pub fn single_parse(&self) -> Option<ParseTree> {
        let mut accepted = self.accepted();
        match (accepted.next(), accepted.next()) {
            (Some(index), None) => Some(self.tree_at(index)),
            _ => None,
        }
    }

    /// Every full-span parse as a tree
    pub fn parses(&self) -> Vec<ParseTree> {
        self.accepted().map(|index| self.tree_at(index)).collect()
    }

    fn tree_at(&self, index: usize) -> ParseTree {
        let mut builder = ParseTree::builder();
        let root = self.build_node(&mut builder, self.columns.len() - 1, index);
        builder.finish(root)
    }

    fn build_node(&self, builder: &mut TreeBuilder, column: usize, index: usize) -> NodeId {
        let state = &self.columns[column].states[index];
        let mut children = Vec::with_capacity(state.children.len());
        for child in &state.children {
            let id = match *child {
                Child::Leaf {
                    terminal,
                    start,
                    end,
                } => builder.push(Node::Leaf {
                    terminal,
                    text: self.input[start..end].to_string(),
                }),
                Child::Completed { column, index } => self.build_node(builder, column, index),
            };
            children.push(id);
        }
        debug_assert_eq!(
            children
                .iter()
                .map(|c| builder.span_of(*c).len())
                .sum::<usize>(),
            column - state.origin
        );
        builder.push(Node::Interior {
            production: RULES[state.rule].production,
            children,
            span: self.input[state.origin..column].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::Production;

    #[test]
    fn test_chart_has_one_column_per_offset() {
        let chart = Chart::build("(str,)->str");
        assert_eq!(chart.column_count(), 12);
        assert!(chart.state_count() > 0);
    }

    #[test]
    fn test_single_parse() {
        let parses = Chart::build("(str,)->str").parses();
        assert_eq!(parses.len(), 1);
        let tree = &parses[0];
        assert_eq!(tree.span(tree.root()), "(str,)->str");
        assert_eq!(tree.production(tree.root()), Some(Production::FunArrow));
    }

    #[test]
    fn test_parse_count_matches_parses() {
        let chart = Chart::build("(a:b:c,)->a");
        assert_eq!(chart.parse_count(), 2);
        assert_eq!(chart.parses().len(), 2);
        assert!(chart.single_parse().is_none());

        let chart = Chart::build("(a,)->a");
        assert_eq!(chart.parse_count(), 1);
        assert!(chart.single_parse().is_some());
    }

    #[test]
    fn test_no_parse_for_bare_arrow() {
        assert!(Chart::build("->").parses().is_empty());
    }

    #[test]
    fn test_no_parse_for_empty_input() {
        assert!(Chart::build("").parses().is_empty());
    }

    #[test]
    fn test_two_parses_for_nullable_chain() {
        // `t?` can attach to the inner or the outer function type
        let parses = Chart::build("(str,)->(str,)->str?").parses();
        assert_eq!(parses.len(), 2);
        assert_ne!(parses[0], parses[1]);
    }

    #[test]
    fn test_empty_tail_is_completed_within_column() {
        // more_fixed_tup := ε must complete in the same column it was predicted in
        let parses = Chart::build("((),)->()").parses();
        assert_eq!(parses.len(), 1);
    }

    #[test]
    fn test_leaf_spans_cover_input() {
        let parses = Chart::build("([int],)->{str}").parses();
        let tree = &parses[0];
        let leaves: String = (0..tree.len())
            .map(|i| tree.node(NodeId(i as u32)))
            .filter_map(|n| match n {
                Node::Leaf { text, .. } => Some(text.as_str()),
                Node::Interior { .. } => None,
            })
            .collect();
        assert_eq!(leaves, "([int],)->{str}");
    }
}
