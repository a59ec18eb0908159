//! Source-language frontends
//!
//! A frontend turns native nodes into canonical statements. Each language
//! registers an ordered list of construct parsers; for every node the
//! first parser whose `can_parse` accepts it gets to try. A parser may
//! still decline (`Ok(None)`) after a closer look, handing the node to the
//! next one. When no parser claims a node, or the claiming parser fails,
//! the node degrades to a commented passthrough and a warning is recorded
//! instead of failing the whole translation.

use crate::ast::{CanonNode, CanonStmt, SourceSpan};
use crate::context::TranslationContext;
use crate::error::Result;
use crate::lang::Language;
use crate::syntax::{self, NativeKind, NativeNode};

pub mod c;
mod common;
pub mod expr;
pub mod format;
pub mod java;
pub mod python;

/// One recognizer for a family of source constructs.
pub trait SourceParser {
    /// Cheap structural test, called before `parse`.
    fn can_parse(&self, node: &NativeNode) -> bool;

    /// Convert the node. `Ok(None)` declines and passes the node to the
    /// next registered parser; `Err` degrades it to a passthrough.
    fn parse(
        &self,
        node: &NativeNode,
        fe: &Frontend,
        ctx: &mut TranslationContext,
    ) -> Result<Option<Vec<CanonStmt>>>;
}

pub struct Frontend {
    lang: Language,
    parsers: Vec<Box<dyn SourceParser>>,
}

impl Frontend {
    pub fn new(lang: Language) -> Self {
        let parsers = match lang {
            Language::Python => python::parsers(),
            Language::C => c::parsers(),
            Language::Java => java::parsers(),
        };
        Frontend { lang, parsers }
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    /// Full pipeline front half: native parse, then canonicalization.
    /// Structural errors at the file level (unbalanced braces, broken
    /// indentation) are hard errors; everything below that degrades
    /// per-construct.
    pub fn parse_program(
        &self,
        source: &str,
        ctx: &mut TranslationContext,
    ) -> Result<Vec<CanonStmt>> {
        let nodes = syntax::parse_native(source, self.lang)?;
        Ok(self.parse_block(&nodes, ctx))
    }

    pub fn parse_block(&self, nodes: &[NativeNode], ctx: &mut TranslationContext) -> Vec<CanonStmt> {
        let mut stmts = Vec::new();
        for node in nodes {
            stmts.extend(self.parse_node(node, ctx));
        }
        stmts
    }

    pub fn parse_node(&self, node: &NativeNode, ctx: &mut TranslationContext) -> Vec<CanonStmt> {
        match node.kind {
            NativeKind::Blank => {
                return vec![CanonStmt::blank().with_span(self.span_of(node))];
            }
            NativeKind::Comment => {
                let stmt = CanonStmt::structural(CanonNode::Comment {
                    text: node.text.clone(),
                    is_inline: false,
                })
                .with_span(self.span_of(node));
                return vec![stmt];
            }
            NativeKind::Foreign => {
                return self.passthrough(node, ctx, "unsupported construct");
            }
            _ => {}
        }
        for parser in &self.parsers {
            if !parser.can_parse(node) {
                continue;
            }
            match parser.parse(node, self, ctx) {
                Ok(Some(stmts)) => return self.finish(stmts, node),
                Ok(None) => continue,
                Err(err) => {
                    return self.passthrough(node, ctx, &err.to_string());
                }
            }
        }
        self.passthrough(node, ctx, "no matching construct")
    }

    fn span_of(&self, node: &NativeNode) -> SourceSpan {
        SourceSpan::new(node.start_line, node.end_line, node.raw.clone())
    }

    /// Attach span and trailing comment the construct parser did not set.
    fn finish(&self, mut stmts: Vec<CanonStmt>, node: &NativeNode) -> Vec<CanonStmt> {
        for stmt in &mut stmts {
            if stmt.span.is_none() {
                stmt.span = Some(self.span_of(node));
            }
        }
        if let Some(comment) = &node.trailing_comment {
            if let Some(first) = stmts.first_mut() {
                if first.trailing_comment.is_none() {
                    first.trailing_comment = Some(comment.clone());
                }
            }
        }
        stmts
    }

    /// Degrade a node to its original text, to be emitted behind the
    /// target's comment marker.
    fn passthrough(
        &self,
        node: &NativeNode,
        ctx: &mut TranslationContext,
        reason: &str,
    ) -> Vec<CanonStmt> {
        let first_line = node.raw.lines().next().unwrap_or(&node.text).trim();
        ctx.warn(
            node.start_line,
            format!("{} source kept as comment ({reason}): '{first_line}'", self.lang),
        );
        let stmt = CanonStmt::structural(CanonNode::Passthrough {
            original: node.raw.clone(),
        })
        .with_span(self.span_of(node));
        vec![stmt]
    }
}
