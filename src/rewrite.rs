use crate::ast::{Char, Group, Node, QuantifierKind, Regex, Repetition};
use crate::Mode;

// Total copies one rewrite may create by expanding fixed repetitions. Past
// it, a repetition is rendered once.
pub const EXPANSION_LIMIT: u32 = 1024;

// The pattern body sits at depth 1. Alternatives above this depth (the body
// itself, or the alternative of a group that is the whole body) get no section.
const SECTION_DEPTH: usize = 3;

// Drops class ranges, assertions and negated classes. A disjunction becomes an
// alternative of its branches, each branch an alternative of its own.
pub fn strip(node: Node) -> Option<Node> {
    match node {
        Node::ClassRange { .. } | Node::Assertion(_) => None,
        Node::CharacterClass { negative: true, .. } => None,
        Node::Disjunction { left, right } => Some(Node::Alternative(
            branches(left, right).into_iter().map(Node::Alternative).collect(),
        )),
        node => Some(node),
    }
}

fn branches(left: Option<Box<Node>>, right: Option<Box<Node>>) -> Vec<Vec<Node>> {
    let mut branches = Vec::new();
    collect_branches(left, &mut branches);
    collect_branches(right, &mut branches);
    branches
}

fn collect_branches(branch: Option<Box<Node>>, branches: &mut Vec<Vec<Node>>) {
    match branch.map(|branch| *branch) {
        Some(Node::Disjunction { left, right }) => {
            collect_branches(left, branches);
            collect_branches(right, branches);
        }
        Some(Node::Alternative(expressions)) => branches.push(expressions),
        Some(node) => branches.push(vec![node]),
        None => branches.push(Vec::new()),
    }
}

// Pre-order: a node is filtered first, a fixed repetition is expanded before
// its copies are visited, and an alternative finds its section capture before
// its groups become placeholders.
#[derive(Clone, Copy, Debug)]
pub struct Rewriter {
    mode: Mode,
}

impl Rewriter {
    pub fn new(mode: Mode) -> Self {
        Rewriter { mode }
    }

    pub fn rewrite(&self, regex: Regex) -> Regex {
        let mut pass = Pass {
            mode: self.mode,
            remaining: EXPANSION_LIMIT,
        };
        let body = regex.body.and_then(|body| pass.rewrite_node(body, 1));
        Regex { body, ..regex }
    }
}

// State of a single rewrite: the expansion budget is shared by the whole tree
struct Pass {
    mode: Mode,
    remaining: u32,
}

impl Pass {
    fn rewrite_node(&mut self, node: Node, depth: usize) -> Option<Node> {
        if let Node::Disjunction { left, right } = node {
            // Every branch may open a section, even at the top of the pattern
            let branches = branches(left, right)
                .into_iter()
                .map(|expressions| self.annotate(expressions, depth + 1))
                .collect();
            return Some(Node::Alternative(branches));
        }
        match strip(node)? {
            Node::Repetition(repetition) => self.rewrite_repetition(repetition, depth),
            Node::Group(group) => Some(self.rewrite_group(group, depth)),
            Node::Alternative(expressions) if depth >= SECTION_DEPTH => Some(self.annotate(expressions, depth)),
            Node::Alternative(expressions) => Some(Node::Alternative(self.rewrite_all(expressions, depth + 1))),
            Node::CharacterClass { negative, expressions } => Some(Node::CharacterClass {
                negative,
                expressions: self.rewrite_all(expressions, depth + 1),
            }),
            node => Some(node),
        }
    }

    fn rewrite_all(&mut self, expressions: Vec<Node>, depth: usize) -> Vec<Node> {
        expressions
            .into_iter()
            .filter_map(|node| self.rewrite_node(node, depth))
            .collect()
    }

    // An expanded repetition takes the place of the repetition, so its copies
    // sit one level below it
    fn rewrite_repetition(&mut self, repetition: Repetition, depth: usize) -> Option<Node> {
        let Repetition { expression, quantifier } = repetition;
        match quantifier.kind {
            QuantifierKind::Exact(count) if count <= self.remaining => {
                self.remaining -= count;
                log::trace!("Expanding fixed repetition into {} copies ({} left)", count, self.remaining);
                let copies = vec![*expression; count as usize];
                Some(Node::Alternative(self.rewrite_all(copies, depth + 1)))
            }
            kind => {
                if let QuantifierKind::Exact(count) = kind {
                    log::warn!(
                        "Not expanding repetition of {} copies ({} of {} left), rendering it once",
                        count,
                        self.remaining,
                        EXPANSION_LIMIT
                    );
                }
                let expression = self.rewrite_node(*expression, depth + 1)?;
                Some(Node::Repetition(Repetition {
                    expression: Box::new(expression),
                    quantifier,
                }))
            }
        }
    }

    fn rewrite_group(&mut self, group: Group, depth: usize) -> Node {
        match group.capture {
            // Whatever the group matched is not part of the template
            Some(capture) => Node::Char(Char::placeholder(self.mode.placeholder(&capture.identity()))),
            None => Node::Group(Group {
                capture: None,
                expression: group
                    .expression
                    .and_then(|expression| self.rewrite_node(*expression, depth + 1))
                    .map(Box::new),
            }),
        }
    }

    fn annotate(&mut self, expressions: Vec<Node>, depth: usize) -> Node {
        let section = expressions
            .iter()
            .find_map(Node::capture)
            .and_then(|capture| self.mode.section(&capture.identity()));
        let mut expressions = self.rewrite_all(expressions, depth + 1);
        if let Some((open, close)) = section {
            log::trace!("Wrapping alternative in {}...{}", open, close);
            expressions.insert(0, Node::Char(Char::placeholder(open)));
            expressions.push(Node::Char(Char::placeholder(close)));
        }
        Node::Alternative(expressions)
    }
}
