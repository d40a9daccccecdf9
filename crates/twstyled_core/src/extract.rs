//! Finds `css` and `styled` templates, evaluates what can be evaluated at build time, runs each
//! through the template processor and replaces it with its runtime form.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use swc_core::atoms::Atom;
use swc_core::common::sync::Lrc;
use swc_core::common::{SourceMap, SourceMapper, Span, Spanned, DUMMY_SP};
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::ast::{
  array, call, escape_template_raw, ident, key_value, str_expr, str_lit, tpl_element,
};
use crate::bindings::{literal_value, ModuleBindings};
use crate::hash::slug_hash;
use crate::imports::ImportTracker;
use crate::occurrence::{Interpolation, Location, TemplateOccurrence};
use crate::paths::relative_path;
use crate::processor::{ProcessedTemplate, TemplateProcessor};
use crate::state::FileState;
use crate::TransformError;

static UNIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(%|[a-z]+)").unwrap());

const UNITS: &[&str] = &[
  "%", "em", "ex", "cap", "ch", "ic", "rem", "lh", "rlh", "vw", "vh", "vi", "vb", "vmin", "vmax",
  "cm", "mm", "q", "in", "pt", "pc", "px", "deg", "grad", "rad", "turn", "s", "ms", "hz", "khz",
  "dpi", "dpcm", "dppx", "fr",
];

enum TemplateKind {
  Css,
  Styled(Box<Expr>),
}

/// Extract every template of `module` in source order. Returns the number of occurrences.
pub fn extract(
  module: &mut Module,
  source_map: &Lrc<SourceMap>,
  imports: &ImportTracker,
  processor: &TemplateProcessor,
  file: &mut FileState,
  display_name: bool,
) -> Result<usize, TransformError> {
  let css = imports.local_name("css").map(Atom::from);
  let styled = imports.local_name("styled").map(Atom::from);
  if css.is_none() && styled.is_none() {
    return Ok(0);
  }

  let relative_filename = relative_path(&file.cwd, &file.filename);
  let file_stem = file
    .filename
    .file_stem()
    .map(|stem| stem.to_string_lossy().to_string())
    .unwrap_or_default();

  let mut extractor = Extractor {
    source_map,
    processor,
    file,
    bindings: ModuleBindings::collect(module),
    css,
    styled,
    display_name,
    relative_filename,
    file_stem,
    index: 0,
    scopes: Vec::new(),
    names: Vec::new(),
    discarded: HashSet::new(),
    replaced: HashSet::new(),
    error: None,
  };
  module.visit_mut_with(&mut extractor);

  match extractor.error {
    Some(error) => Err(error),
    None => Ok(extractor.index),
  }
}

struct Extractor<'a> {
  source_map: &'a Lrc<SourceMap>,
  processor: &'a TemplateProcessor,
  file: &'a mut FileState,
  bindings: ModuleBindings,
  css: Option<Atom>,
  styled: Option<Atom>,
  display_name: bool,
  relative_filename: String,
  file_stem: String,
  index: usize,
  /// Spans of the enclosing functions, the module first
  scopes: Vec<Span>,
  /// Names of the enclosing bindings and JSX elements
  names: Vec<String>,
  /// Expressions whose value is thrown away
  discarded: HashSet<Span>,
  /// Spans of the class name strings that replaced `css` templates
  replaced: HashSet<Span>,
  error: Option<TransformError>,
}

impl Extractor<'_> {
  fn template_kind(&self, tagged: &TaggedTpl) -> Option<TemplateKind> {
    match &*tagged.tag {
      Expr::Ident(tag) if Some(&tag.sym) == self.css.as_ref() => Some(TemplateKind::Css),
      Expr::Call(CallExpr {
        callee: Callee::Expr(callee),
        args,
        ..
      }) if args.len() == 1 && args[0].spread.is_none() && self.is_styled(callee) => {
        Some(TemplateKind::Styled(args[0].expr.clone()))
      }
      Expr::Member(MemberExpr {
        obj,
        prop: MemberProp::Ident(tag),
        ..
      }) if self.is_styled(obj) => Some(TemplateKind::Styled(str_expr(&tag.sym, tag.span))),
      _ => None,
    }
  }

  fn is_styled(&self, expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(ident) if Some(&ident.sym) == self.styled.as_ref())
  }

  fn with_name(&mut self, name: Option<String>, visit: impl FnOnce(&mut Self)) {
    let pushed = name.is_some();
    if let Some(name) = name {
      self.names.push(name);
    }
    visit(self);
    if pushed {
      self.names.pop();
    }
  }

  fn with_scope(&mut self, scope: Span, visit: impl FnOnce(&mut Self)) {
    self.scopes.push(scope);
    visit(self);
    self.scopes.pop();
  }

  fn display(&self) -> String {
    self
      .names
      .last()
      .cloned()
      .unwrap_or_else(|| self.file_stem.clone())
  }

  fn slug(&self, display: &str, index: usize) -> String {
    let initial = display
      .chars()
      .next()
      .map(|ch| ch.to_ascii_lowercase())
      .unwrap_or('t');
    let hash = slug_hash(&format!("{}:{index}", self.relative_filename));
    to_valid_css_identifier(&format!("{initial}{hash}"))
  }

  fn evaluate(&self, expr: &Expr) -> Option<String> {
    if let Some(value) = literal_value(expr) {
      return Some(value);
    }
    match expr {
      Expr::Ident(ident) => self.bindings.constant(ident).map(String::from),
      _ => None,
    }
  }

  /// CSS text of `tpl` with evaluated interpolations inlined and the rest replaced by
  /// `var(--<slug>-<i>)`.
  fn evaluate_template(&self, tpl: &Tpl, slug: &str) -> (String, Vec<Interpolation>) {
    let scope = self.scopes.last().copied().unwrap_or(DUMMY_SP);
    let mut css_text = String::new();
    let mut interpolations = Vec::new();
    let mut consumed = 0;

    for (i, quasi) in tpl.quasis.iter().enumerate() {
      let text: &str = quasi.cooked.as_deref().unwrap_or(&*quasi.raw);
      css_text.push_str(text.get(consumed..).unwrap_or_default());
      consumed = 0;

      let Some(expr) = tpl.exprs.get(i) else {
        continue;
      };
      if let Some(value) = self.evaluate(expr) {
        css_text.push_str(&value);
        continue;
      }

      let unit = tpl
        .quasis
        .get(i + 1)
        .and_then(|next| unit_prefix(next.cooked.as_deref().unwrap_or(&*next.raw)));
      if let Some(unit) = &unit {
        consumed = unit.len();
      }

      let id = format!("{slug}-{i}");
      css_text.push_str(&format!("var(--{id})"));
      interpolations.push(Interpolation {
        id,
        expression: expr.clone(),
        scope,
        source: self
          .source_map
          .span_to_snippet(expr.span())
          .unwrap_or_default(),
        unit,
      });
    }

    (css_text, interpolations)
  }

  fn start(&self, span: Span) -> Option<Location> {
    if span.is_dummy() {
      return None;
    }
    let loc = self.source_map.lookup_char_pos(span.lo);
    Some(Location {
      line: loc.line as u32,
      column: loc.col.0 as u32,
    })
  }

  fn extract(&mut self, tagged: &TaggedTpl, kind: TemplateKind) -> Result<Expr, TransformError> {
    let index = self.index;
    self.index += 1;

    let display = self.display();
    let slug = self.slug(&display, index);
    let class_name = if self.display_name {
      to_valid_css_identifier(&format!("{display}_{slug}"))
    } else {
      slug.clone()
    };
    let (css_text, interpolations) = self.evaluate_template(&tagged.tpl, &slug);

    let mut occurrence = TemplateOccurrence {
      selector: format!(".{class_name}"),
      css_text,
      class_name,
      interpolations,
      start: self.start(tagged.span),
      is_referenced: !self.discarded.contains(&tagged.span),
      props: Vec::new(),
    };
    let processed = self.processor.process(self.file, index, &mut occurrence)?;
    tracing::debug!(
      index,
      class_name = %processed.class_name,
      "Processed template"
    );

    match kind {
      TemplateKind::Css => self.css_replacement(&occurrence, processed, tagged.span),
      TemplateKind::Styled(target) => {
        Ok(self.styled_replacement(&occurrence, processed, target, &display, tagged.span))
      }
    }
  }

  /// The class name, followed by the class expressions that resolve to utility classes.
  fn css_replacement(
    &self,
    occurrence: &TemplateOccurrence,
    processed: ProcessedTemplate,
    span: Span,
  ) -> Result<Expr, TransformError> {
    let twvars = occurrence.twvars();
    let mut dynamic = Vec::new();
    for interpolation in &occurrence.interpolations {
      if !twvars.contains(&interpolation.id) {
        return Err(TransformError::UnevaluatedInterpolation {
          filename: self.relative_filename.clone(),
          line: occurrence.start.map(|start| start.line as usize).unwrap_or(0),
          source_text: interpolation.source.clone(),
        });
      }
      dynamic.push(interpolation.expression.clone());
    }

    if dynamic.is_empty() {
      return Ok(Expr::Lit(Lit::Str(str_lit(&processed.class_name, span))));
    }

    let mut quasis = Vec::with_capacity(dynamic.len() + 1);
    let first = if processed.class_name.is_empty() {
      String::new()
    } else {
      format!("{} ", escape_template_raw(&processed.class_name))
    };
    quasis.push(tpl_element(&first, false, span));
    for _ in 1..dynamic.len() {
      quasis.push(tpl_element(" ", false, DUMMY_SP));
    }
    quasis.push(tpl_element("", true, DUMMY_SP));

    Ok(Expr::Tpl(Tpl {
      span,
      exprs: dynamic,
      quasis,
    }))
  }

  /// `styled(<target>)({ name, class, vars, ...props })`
  fn styled_replacement(
    &self,
    occurrence: &TemplateOccurrence,
    processed: ProcessedTemplate,
    target: Box<Expr>,
    display: &str,
    span: Span,
  ) -> Expr {
    let vars: Vec<PropOrSpread> = occurrence
      .interpolations
      .iter()
      .map(|interpolation| {
        let mut value = vec![interpolation.expression.clone()];
        if let Some(unit) = &interpolation.unit {
          value.push(str_expr(unit, DUMMY_SP));
        }
        key_value(&interpolation.id, Box::new(array(value)))
      })
      .collect();

    let mut props = vec![
      key_value("name", str_expr(display, DUMMY_SP)),
      key_value("class", str_expr(&processed.class_name, DUMMY_SP)),
    ];
    if !vars.is_empty() {
      props.push(key_value(
        "vars",
        Box::new(Expr::Object(ObjectLit {
          span: DUMMY_SP,
          props: vars,
        })),
      ));
    }
    props.extend(occurrence.props.iter().cloned());

    let styled = self
      .styled
      .as_ref()
      .map(|name| ident(name))
      .unwrap_or_else(|| ident("styled"));
    call(
      Box::new(call(Box::new(Expr::Ident(styled)), vec![target])),
      vec![Box::new(Expr::Object(ObjectLit { span, props }))],
    )
  }
}

impl VisitMut for Extractor<'_> {
  fn visit_mut_module(&mut self, node: &mut Module) {
    self.with_scope(node.span, |this| node.visit_mut_children_with(this));
  }

  fn visit_mut_function(&mut self, node: &mut Function) {
    self.with_scope(node.span, |this| node.visit_mut_children_with(this));
  }

  fn visit_mut_arrow_expr(&mut self, node: &mut ArrowExpr) {
    self.with_scope(node.span, |this| node.visit_mut_children_with(this));
  }

  fn visit_mut_var_declarator(&mut self, node: &mut VarDeclarator) {
    let name = match &node.name {
      Pat::Ident(binding) => Some(binding.id.sym.to_string()),
      _ => None,
    };
    self.with_name(name, |this| node.visit_mut_children_with(this));
  }

  fn visit_mut_jsx_element(&mut self, node: &mut JSXElement) {
    let name = match &node.opening.name {
      JSXElementName::Ident(ident) => Some(ident.sym.to_string()),
      JSXElementName::JSXMemberExpr(member) => Some(member.prop.sym.to_string()),
      JSXElementName::JSXNamespacedName(name) => Some(name.name.sym.to_string()),
    };
    self.with_name(name, |this| node.visit_mut_children_with(this));
  }

  fn visit_mut_jsx_attr(&mut self, node: &mut JSXAttr) {
    node.visit_mut_children_with(self);

    // className={"c1"} -> className="c1", for class names this pass produced
    if !matches!(&node.name, JSXAttrName::Ident(name) if &*name.sym == "className") {
      return;
    }
    let Some(JSXAttrValue::JSXExprContainer(JSXExprContainer {
      expr: JSXExpr::Expr(expr),
      ..
    })) = &node.value
    else {
      return;
    };
    let Expr::Lit(Lit::Str(value)) = &**expr else {
      return;
    };
    if !self.replaced.contains(&value.span)
      || value.value.contains(|ch: char| matches!(ch, '"' | '\\' | '\n'))
    {
      return;
    }
    node.value = Some(JSXAttrValue::Lit(Lit::Str(Str {
      span: value.span,
      value: value.value.clone(),
      raw: None,
    })));
  }

  fn visit_mut_expr_stmt(&mut self, node: &mut ExprStmt) {
    let mut expr = &*node.expr;
    while let Expr::Paren(paren) = expr {
      expr = &paren.expr;
    }
    self.discarded.insert(expr.span());
    node.visit_mut_children_with(self);
  }

  fn visit_mut_expr(&mut self, expr: &mut Expr) {
    if self.error.is_some() {
      return;
    }
    expr.visit_mut_children_with(self);
    if self.error.is_some() {
      return;
    }

    let Expr::TaggedTpl(tagged) = expr else {
      return;
    };
    let Some(kind) = self.template_kind(tagged) else {
      return;
    };
    match self.extract(tagged, kind) {
      Ok(replacement) => {
        if let Expr::Lit(Lit::Str(class_name)) = &replacement {
          self.replaced.insert(class_name.span);
        }
        *expr = replacement;
      }
      Err(error) => self.error = Some(error),
    }
  }
}

fn unit_prefix(text: &str) -> Option<String> {
  UNIT
    .captures(text)
    .map(|captures| captures[1].to_string())
    .filter(|unit| UNITS.contains(&unit.as_str()))
}

/// Replace characters not allowed in a CSS identifier and avoid a leading digit.
fn to_valid_css_identifier(name: &str) -> String {
  let mut identifier: String = name
    .chars()
    .map(|ch| {
      if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
        ch
      } else {
        '_'
      }
    })
    .collect();
  if identifier.starts_with(|ch: char| ch.is_ascii_digit()) {
    identifier.insert(0, '_');
  }
  identifier
}
