//! Turns every supported style-bearing syntax into one canonical template.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use swc_core::atoms::Atom;
use swc_core::common::{Span, Spanned};
use swc_core::ecma::ast::*;

use crate::ast::{escape_template_raw, expr_kind, tagged_template, tpl_element};
use crate::TransformError;

static STARTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(@tailwind)?\s*").unwrap());
static ENDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*;?\s*$").unwrap());

/// The shapes a style value can take.
#[derive(Debug)]
pub enum StyleSource<'a> {
  String(&'a Str),
  Template(&'a Tpl),
  TaggedTemplate(&'a TaggedTpl),
  Array(&'a ArrayLit),
  Empty,
  Function(&'a Expr),
  /// Any other expression; embedded as a single `${expr}` slot
  Expression(&'a Expr),
  Unsupported(&'static str),
}

pub fn classify(value: &JSXAttrValue) -> StyleSource<'_> {
  match value {
    JSXAttrValue::Lit(Lit::Str(string)) => StyleSource::String(string),
    JSXAttrValue::Lit(_) => StyleSource::Unsupported("Literal"),
    JSXAttrValue::JSXExprContainer(container) => match &container.expr {
      JSXExpr::JSXEmptyExpr(_) => StyleSource::Empty,
      JSXExpr::Expr(expr) => classify_expr(expr),
    },
    JSXAttrValue::JSXElement(_) => StyleSource::Unsupported("JSXElement"),
    JSXAttrValue::JSXFragment(_) => StyleSource::Unsupported("JSXFragment"),
  }
}

pub fn classify_expr(expr: &Expr) -> StyleSource<'_> {
  match expr {
    Expr::Lit(Lit::Str(string)) => StyleSource::String(string),
    Expr::Tpl(tpl) => StyleSource::Template(tpl),
    Expr::TaggedTpl(tagged) => StyleSource::TaggedTemplate(tagged),
    Expr::Array(array) => StyleSource::Array(array),
    Expr::Arrow(_) | Expr::Fn(_) => StyleSource::Function(expr),
    Expr::Paren(paren) => classify_expr(&paren.expr),
    Expr::Object(_) | Expr::JSXElement(_) | Expr::JSXFragment(_) | Expr::Class(_) => {
      StyleSource::Unsupported(expr_kind(expr))
    }
    _ => StyleSource::Expression(expr),
  }
}

/// Canonical template for a classified value. `css_tag` is the local name of the `css` helper:
/// a template tagged with it is unwrapped, any other tagged template becomes an embedded
/// expression. `Empty` yields no template.
pub fn to_template(source: StyleSource<'_>, css_tag: &str) -> Result<Option<Tpl>, TransformError> {
  let tpl = match source {
    StyleSource::String(string) => Tpl {
      span: string.span,
      exprs: vec![],
      quasis: vec![tpl_element(
        &escape_template_raw(&string.value),
        true,
        string.span,
      )],
    },
    StyleSource::Template(tpl) => tpl.clone(),
    StyleSource::TaggedTemplate(tagged) if is_tag(&tagged.tag, css_tag) => (*tagged.tpl).clone(),
    StyleSource::TaggedTemplate(tagged) => embed(Box::new(Expr::TaggedTpl(tagged.clone()))),
    StyleSource::Array(array) => embed(Box::new(Expr::Array(array.clone()))),
    StyleSource::Function(expr) | StyleSource::Expression(expr) => embed(Box::new(expr.clone())),
    StyleSource::Empty => return Ok(None),
    StyleSource::Unsupported("ObjectExpression") => {
      return Err(TransformError::UnsupportedObjectStyle)
    }
    StyleSource::Unsupported(kind) => return Err(TransformError::UnclassifiableNode { kind }),
  };
  Ok(Some(tpl))
}

fn is_tag(tag: &Expr, name: &str) -> bool {
  matches!(tag, Expr::Ident(ident) if ident.sym.as_ref() == name)
}

/// `${expr}` with empty quasis on both sides.
fn embed(expr: Box<Expr>) -> Tpl {
  let span = expr.span();
  Tpl {
    span,
    exprs: vec![expr],
    quasis: vec![tpl_element("", false, span), tpl_element("", true, span)],
  }
}

/// A template from the elements of an array: `prefix` goes before every element, each element
/// gets one expression slot. Holes are skipped, spreads are rejected.
pub fn template_from_array(
  prefix: &str,
  array: &ArrayLit,
  attribute: &str,
) -> Result<Tpl, TransformError> {
  let mut quasis = Vec::new();
  let mut exprs = Vec::new();

  for element in array.elems.iter().flatten() {
    if element.spread.is_some() {
      return Err(TransformError::SpreadInVariantArray {
        attribute: attribute.to_string(),
      });
    }
    quasis.push(tpl_element(prefix, false, element.expr.span()));
    exprs.push(element.expr.clone());
  }
  quasis.push(tpl_element("", true, array.span));

  Ok(Tpl {
    span: array.span,
    exprs,
    quasis,
  })
}

/// Replace the leading whitespace (and an optional `@tailwind`) of the first quasi with `start`,
/// and the trailing whitespace and optional `;` of the last quasi with `end`.
pub fn rewrite_bounds(tpl: &mut Tpl, start: &str, end: &str) {
  if let Some(first) = tpl.quasis.first_mut() {
    replace_quasi(first, &STARTER, start);
  }
  if let Some(last) = tpl.quasis.last_mut() {
    replace_quasi(last, &ENDING, end);
    last.tail = true;
  }
}

/// Prepend `start` to the first quasi and append `end` to the last one, verbatim.
pub fn surround(tpl: &mut Tpl, start: &str, end: &str) {
  if let Some(first) = tpl.quasis.first_mut() {
    set_quasi(first, format!("{start}{}", first.raw));
  }
  if let Some(last) = tpl.quasis.last_mut() {
    set_quasi(last, format!("{}{end}", last.raw));
  }
}

fn replace_quasi(quasi: &mut TplElement, pattern: &Regex, replacement: &str) {
  let raw = pattern
    .replace(&quasi.raw, NoExpand(replacement))
    .into_owned();
  let cooked = quasi
    .cooked
    .as_ref()
    .map(|cooked| pattern.replace(cooked, NoExpand(replacement)).into_owned());
  quasi.cooked = Some(Atom::from(cooked.unwrap_or_else(|| raw.clone())));
  quasi.raw = Atom::from(raw);
}

fn set_quasi(quasi: &mut TplElement, raw: String) {
  quasi.cooked = Some(Atom::from(raw.as_str()));
  quasi.raw = Atom::from(raw);
}

/// `tag\`...\`` with the bounds rewritten.
pub fn wrap_template(mut tpl: Tpl, tag: Ident, start: &str, end: &str) -> Expr {
  rewrite_bounds(&mut tpl, start, end);
  tagged_template(tag, tpl)
}

/// Whether any embedded expression needs component-scoped prop access.
pub fn requires_component(tpl: &Tpl) -> bool {
  tpl
    .exprs
    .iter()
    .any(|expr| matches!(**expr, Expr::Arrow(_) | Expr::Fn(_)))
}

/// Single-quasi template holding `text`.
pub fn text_template(text: &str, span: Span) -> Tpl {
  Tpl {
    span,
    exprs: vec![],
    quasis: vec![tpl_element(&escape_template_raw(text), true, span)],
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use swc_core::common::DUMMY_SP;

  use super::*;
  use crate::ast::{ident, str_lit};

  fn raw(tpl: &Tpl) -> Vec<String> {
    tpl.quasis.iter().map(|q| q.raw.to_string()).collect()
  }

  fn number(value: f64) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Num(Number {
      span: DUMMY_SP,
      value,
      raw: None,
    })))
  }

  #[test]
  fn test_string_becomes_single_quasi() {
    let value = JSXAttrValue::Lit(Lit::Str(str_lit("p-4 m-2", DUMMY_SP)));
    let tpl = to_template(classify(&value), "css").unwrap().unwrap();

    assert_eq!(raw(&tpl), vec!["p-4 m-2"]);
    assert!(tpl.exprs.is_empty());
  }

  #[test]
  fn test_expression_is_embedded() {
    let tpl = to_template(classify_expr(&number(4.0)), "css")
      .unwrap()
      .unwrap();

    assert_eq!(raw(&tpl), vec!["", ""]);
    assert_eq!(tpl.exprs.len(), 1);
  }

  #[test]
  fn test_css_tagged_template_is_unwrapped() {
    let tagged = tagged_template(ident("css"), text_template("color: red;", DUMMY_SP));
    let tpl = to_template(classify_expr(&tagged), "css").unwrap().unwrap();
    assert_eq!(raw(&tpl), vec!["color: red;"]);

    let other = to_template(classify_expr(&tagged), "other")
      .unwrap()
      .unwrap();
    assert_eq!(raw(&other), vec!["", ""]);
  }

  #[test]
  fn test_empty_and_unsupported() {
    let empty = JSXAttrValue::JSXExprContainer(JSXExprContainer {
      span: DUMMY_SP,
      expr: JSXExpr::JSXEmptyExpr(JSXEmptyExpr { span: DUMMY_SP }),
    });
    assert!(to_template(classify(&empty), "css").unwrap().is_none());

    let object = Expr::Object(ObjectLit {
      span: DUMMY_SP,
      props: vec![],
    });
    assert!(matches!(
      to_template(classify_expr(&object), "css"),
      Err(TransformError::UnsupportedObjectStyle)
    ));
  }

  #[test]
  fn test_rewrite_bounds() {
    let mut tpl = text_template("  @tailwind p-4 ;  ", DUMMY_SP);
    rewrite_bounds(&mut tpl, "@tailwind ", ";");
    assert_eq!(raw(&tpl), vec!["@tailwind p-4;"]);

    let mut css = text_template("\n  color: red;\n", DUMMY_SP);
    rewrite_bounds(&mut css, "", "");
    assert_eq!(raw(&css), vec!["color: red"]);

    let mut prefixed = text_template("red-500", DUMMY_SP);
    rewrite_bounds(&mut prefixed, "@tailwind bg-", ";");
    assert_eq!(raw(&prefixed), vec!["@tailwind bg-red-500;"]);
  }

  #[test]
  fn test_rewrite_bounds_does_not_expand_dollars() {
    let mut tpl = text_template("x", DUMMY_SP);
    rewrite_bounds(&mut tpl, "$1 ", "");
    assert_eq!(raw(&tpl), vec!["$1 x"]);
  }

  #[test]
  fn test_template_from_array() {
    let array = ArrayLit {
      span: DUMMY_SP,
      elems: vec![
        Some(ExprOrSpread {
          spread: None,
          expr: Box::new(Expr::Lit(Lit::Str(str_lit("bg-red-500", DUMMY_SP)))),
        }),
        None,
        Some(ExprOrSpread {
          spread: None,
          expr: Box::new(Expr::Ident(ident("active"))),
        }),
      ],
    };

    let mut tpl = template_from_array(" hover:", &array, "hover--").unwrap();
    surround(&mut tpl, "@tailwind", ";");

    assert_eq!(raw(&tpl), vec!["@tailwind hover:", " hover:", ";"]);
    assert_eq!(tpl.exprs.len(), 2);
  }

  #[test]
  fn test_template_from_array_rejects_spread() {
    let array = ArrayLit {
      span: DUMMY_SP,
      elems: vec![Some(ExprOrSpread {
        spread: Some(DUMMY_SP),
        expr: Box::new(Expr::Ident(ident("rest"))),
      })],
    };

    assert!(matches!(
      template_from_array(" md:", &array, "md--"),
      Err(TransformError::SpreadInVariantArray { attribute }) if attribute == "md--"
    ));
  }

  #[test]
  fn test_requires_component() {
    let mut tpl = text_template("", DUMMY_SP);
    assert!(!requires_component(&tpl));
    tpl.exprs.push(crate::ast::prop_accessor("color", DUMMY_SP));
    assert!(requires_component(&tpl));
  }
}
