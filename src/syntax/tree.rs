//! Native parse tree
//!
//! The concrete, per-language structure the block scanners produce. Nodes
//! carry raw text and line spans; classification into canonical constructs
//! is the source parsers' job.

/// Loop header style as written in the source. Range/for-each
/// discrimination happens later, from the header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStyle {
    For,
    While,
    DoWhile,
}

/// Coarse native node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeKind {
    /// One simple statement (declaration, assignment, call, ...).
    Simple,
    /// Full-line comment.
    Comment,
    /// Blank source line.
    Blank,
    /// Conditional with optional elif arms and else branch.
    If,
    Loop(LoopStyle),
    /// A block construct outside the supported subset (function other than
    /// the entry point, class member, try block, ...). Always degrades to
    /// commented passthrough.
    Foreign,
}

/// One node of the native parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeNode {
    pub kind: NativeKind,
    /// Meaning depends on `kind`: statement text for `Simple`, condition
    /// text for `If`/`While`/`DoWhile`, header interior for `For`, comment
    /// text for `Comment`, header line for `Foreign`, empty for `Blank`.
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Body statements (then-branch for `If`).
    pub children: Vec<NativeNode>,
    /// `elif`/`else if` arms: condition text plus body.
    pub elif_arms: Vec<(String, Vec<NativeNode>)>,
    pub else_children: Option<Vec<NativeNode>>,
    /// Same-line comment trailing the statement or header.
    pub trailing_comment: Option<String>,
    /// Original source text of the whole node, for passthrough rendering.
    pub raw: String,
}

impl NativeNode {
    pub fn new(kind: NativeKind, text: impl Into<String>, line: usize) -> Self {
        let text = text.into();
        Self {
            kind,
            raw: text.clone(),
            text,
            start_line: line,
            end_line: line,
            children: Vec::new(),
            elif_arms: Vec::new(),
            else_children: None,
            trailing_comment: None,
        }
    }

    pub fn simple(text: impl Into<String>, line: usize) -> Self {
        Self::new(NativeKind::Simple, text, line)
    }

    pub fn blank(line: usize) -> Self {
        Self::new(NativeKind::Blank, "", line)
    }

    pub fn comment(text: impl Into<String>, line: usize) -> Self {
        Self::new(NativeKind::Comment, text, line)
    }

    pub fn is_compound(&self) -> bool {
        matches!(self.kind, NativeKind::If | NativeKind::Loop(_))
    }
}
