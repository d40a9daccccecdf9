//! Merging a style expression into an element's `className`.

use swc_core::atoms::Atom;
use swc_core::common::{Span, Spanned, DUMMY_SP};
use swc_core::ecma::ast::*;

use crate::ast::{escape_template_raw, jsx_expression, str_lit};

/// A `className` value, by how it combines.
#[derive(Clone, Debug)]
pub enum ClassValue {
  Empty,
  Literal(Str),
  Dynamic(Box<Expr>),
}

enum Part {
  Text { raw: String, cooked: String, span: Span },
  Expr(Box<Expr>),
}

impl ClassValue {
  /// Missing attributes, valueless attributes and `{}` are all empty.
  pub fn from_attribute(value: Option<JSXAttrValue>) -> Self {
    match value {
      None => ClassValue::Empty,
      Some(JSXAttrValue::Lit(Lit::Str(string))) => ClassValue::Literal(string),
      Some(JSXAttrValue::JSXExprContainer(JSXExprContainer {
        expr: JSXExpr::JSXEmptyExpr(_),
        ..
      })) => ClassValue::Empty,
      Some(JSXAttrValue::JSXExprContainer(JSXExprContainer {
        expr: JSXExpr::Expr(expr),
        ..
      })) => match *expr {
        Expr::Lit(Lit::Str(string)) => ClassValue::Literal(string),
        expr => ClassValue::Dynamic(Box::new(expr)),
      },
      Some(JSXAttrValue::Lit(lit)) => ClassValue::Dynamic(Box::new(Expr::Lit(lit))),
      Some(JSXAttrValue::JSXElement(element)) => {
        ClassValue::Dynamic(Box::new(Expr::JSXElement(element)))
      }
      Some(JSXAttrValue::JSXFragment(fragment)) => {
        ClassValue::Dynamic(Box::new(Expr::JSXFragment(fragment)))
      }
    }
  }

  pub fn into_attribute(self) -> Option<JSXAttrValue> {
    match self {
      ClassValue::Empty => None,
      ClassValue::Literal(string) => Some(JSXAttrValue::Lit(Lit::Str(string))),
      ClassValue::Dynamic(expr) => Some(jsx_expression(expr)),
    }
  }

  fn span(&self) -> Span {
    match self {
      ClassValue::Empty => DUMMY_SP,
      ClassValue::Literal(string) => string.span,
      ClassValue::Dynamic(expr) => expr.span(),
    }
  }

  /// Untagged templates are spliced so repeated merges stay flat.
  fn into_parts(self) -> Vec<Part> {
    match self {
      ClassValue::Empty => vec![],
      ClassValue::Literal(string) => vec![Part::Text {
        raw: escape_template_raw(&string.value),
        cooked: string.value.to_string(),
        span: string.span,
      }],
      ClassValue::Dynamic(expr) => match *expr {
        Expr::Tpl(tpl) => {
          let mut parts = Vec::new();
          let mut exprs = tpl.exprs.into_iter();
          for quasi in tpl.quasis {
            let cooked = quasi
              .cooked
              .as_ref()
              .map(|cooked| cooked.to_string())
              .unwrap_or_else(|| quasi.raw.to_string());
            parts.push(Part::Text {
              raw: quasi.raw.to_string(),
              cooked,
              span: quasi.span,
            });
            if let Some(expr) = exprs.next() {
              parts.push(Part::Expr(expr));
            }
          }
          parts
        }
        expr => vec![Part::Expr(Box::new(expr))],
      },
    }
  }
}

/// Merge `left` (the new style expression) with `right` (the existing `className`).
///
/// | left    | right   | result                       |
/// |---------|---------|------------------------------|
/// | string  | string  | `"left right"`               |
/// | string  | empty   | left                         |
/// | string  | dynamic | `` `left ${right}` ``        |
/// | dynamic | string  | `` `${left} right` ``        |
/// | dynamic | empty   | left                         |
/// | dynamic | dynamic | `` `${left} ${right}` ``     |
pub fn combine(left: ClassValue, right: ClassValue) -> ClassValue {
  if matches!(right, ClassValue::Empty) {
    return left;
  }
  if matches!(left, ClassValue::Empty) {
    return right;
  }

  let left_span = left.span();
  let right_span = right.span();

  let mut parts = left.into_parts();
  parts.push(Part::Text {
    raw: String::from(" "),
    cooked: String::from(" "),
    span: left_span,
  });
  parts.extend(right.into_parts());

  render(parts, left_span, right_span)
}

fn render(parts: Vec<Part>, left_span: Span, right_span: Span) -> ClassValue {
  let mut quasis: Vec<(String, String, Span)> = vec![];
  let mut exprs = Vec::new();
  let mut open = true;

  for part in parts {
    match part {
      Part::Text { raw, cooked, span } => {
        if open {
          if let Some((last_raw, last_cooked, _)) = quasis.last_mut() {
            last_raw.push_str(&raw);
            last_cooked.push_str(&cooked);
            continue;
          }
        }
        quasis.push((raw, cooked, span));
        open = true;
      }
      Part::Expr(expr) => {
        if !open || quasis.is_empty() {
          quasis.push((String::new(), String::new(), expr.span()));
        }
        exprs.push(expr);
        open = false;
      }
    }
  }
  if !open || quasis.is_empty() {
    quasis.push((String::new(), String::new(), right_span));
  }

  if exprs.is_empty() {
    let cooked = quasis
      .into_iter()
      .map(|(_, cooked, _)| cooked)
      .collect::<String>();
    return ClassValue::Literal(str_lit(&cooked, left_span));
  }

  let count = quasis.len();
  let quasis = quasis
    .into_iter()
    .enumerate()
    .map(|(index, (raw, cooked, span))| TplElement {
      span,
      tail: index + 1 == count,
      cooked: Some(Atom::from(cooked)),
      raw: Atom::from(raw),
    })
    .collect();

  ClassValue::Dynamic(Box::new(Expr::Tpl(Tpl {
    span: right_span,
    exprs,
    quasis,
  })))
}
