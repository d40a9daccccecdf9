//! Index of a module's string literals, and in-place rewriting of them by span.

use std::collections::HashMap;

use swc_core::atoms::Atom;
use swc_core::common::Span;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{Visit, VisitMut, VisitMutWith, VisitWith};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringLiteral {
  pub span: Span,
  pub value: String,
}

/// Every string literal with a source position, in source order.
pub fn collect(module: &Module) -> Vec<StringLiteral> {
  let mut collector = LiteralCollector::default();
  module.visit_with(&mut collector);
  collector.literals.sort_by_key(|literal| literal.span.lo);
  collector.literals
}

/// Replace the value of every literal whose span has an entry in `rewrites`.
pub fn apply(module: &mut Module, rewrites: &HashMap<Span, String>) {
  if rewrites.is_empty() {
    return;
  }
  module.visit_mut_with(&mut LiteralRewriter { rewrites });
}

#[derive(Default)]
struct LiteralCollector {
  literals: Vec<StringLiteral>,
}

impl Visit for LiteralCollector {
  fn visit_str(&mut self, node: &Str) {
    if node.span.is_dummy() {
      return;
    }
    self.literals.push(StringLiteral {
      span: node.span,
      value: node.value.to_string(),
    });
  }

  // import sources are module specifiers, not class lists
  fn visit_import_decl(&mut self, _: &ImportDecl) {}
}

struct LiteralRewriter<'a> {
  rewrites: &'a HashMap<Span, String>,
}

impl VisitMut for LiteralRewriter<'_> {
  fn visit_mut_str(&mut self, node: &mut Str) {
    if let Some(value) = self.rewrites.get(&node.span) {
      node.value = Atom::from(value.as_str());
      node.raw = None;
    }
  }

  fn visit_mut_import_decl(&mut self, _: &mut ImportDecl) {}
}
