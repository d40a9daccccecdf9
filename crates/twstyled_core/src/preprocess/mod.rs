//! Rewrites `tw` templates and style-bearing JSX attributes into `css` tagged templates (merged
//! into `className`) or hoisted `styled` components, ahead of extraction.

use std::collections::HashSet;

use swc_core::common::Span;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{VisitMut, VisitMutWith};
use twstyled_tailwind::Engine;

use crate::ast::jsx_attribute_name;
use crate::bindings::ModuleBindings;
use crate::imports::ImportTracker;
use crate::normalize::{
  classify, rewrite_bounds, requires_component, surround, template_from_array, text_template,
  to_template, wrap_template,
};
use crate::uid::UidGenerator;
use crate::TransformError;

mod to_css;
mod to_styled;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeKind {
  /// `css={…}` or `tw={…}`
  Style { tailwind: bool },
  /// `<utility>-` / `<utility>$`
  Utility { stem: String },
  /// `<variant>--`
  Variant { stem: String },
}

/// Item to insert into the module body: after the item at `after`, or at the end.
struct Insertion {
  after: Option<usize>,
  item: ModuleItem,
}

pub struct Preprocessor<'a> {
  imports: &'a mut ImportTracker,
  bindings: &'a ModuleBindings,
  uids: UidGenerator,
  utility_attributes: HashSet<String>,
  variant_attributes: HashSet<String>,
  insertions: Vec<Insertion>,
  error: Option<TransformError>,
}

/// Run the preprocess pass over `module`.
pub fn preprocess(
  module: &mut Module,
  imports: &mut ImportTracker,
  engine: &Engine,
) -> Result<(), TransformError> {
  let bindings = ModuleBindings::collect(module);
  let mut preprocessor = Preprocessor {
    uids: UidGenerator::for_module(module),
    imports,
    bindings: &bindings,
    utility_attributes: engine.attribute_names().into_iter().collect(),
    variant_attributes: engine.variant_names().into_iter().collect(),
    insertions: Vec::new(),
    error: None,
  };

  module.visit_mut_with(&mut preprocessor);
  if let Some(error) = preprocessor.error.take() {
    return Err(error);
  }

  let insertions = std::mem::take(&mut preprocessor.insertions);
  insert_items(module, insertions, preprocessor.imports);
  preprocessor.imports.apply(module);
  Ok(())
}

fn insert_items(module: &mut Module, mut insertions: Vec<Insertion>, imports: &mut ImportTracker) {
  if insertions.is_empty() {
    return;
  }

  let body = std::mem::take(&mut module.body);
  let mut result = Vec::with_capacity(body.len() + insertions.len());
  for (index, item) in body.into_iter().enumerate() {
    result.push(item);
    let (here, rest): (Vec<Insertion>, Vec<Insertion>) = insertions
      .into_iter()
      .partition(|insertion| insertion.after == Some(index));
    insertions = rest;
    if !here.is_empty() {
      imports.shift(result.len(), here.len());
    }
    result.extend(here.into_iter().map(|insertion| insertion.item));
  }
  result.extend(insertions.into_iter().map(|insertion| insertion.item));
  module.body = result;
}

impl Preprocessor<'_> {
  fn css_local(&self) -> String {
    self.imports.local_name("css").unwrap_or("css").to_string()
  }

  fn kind_of(&self, name: &str) -> Option<AttributeKind> {
    match name {
      "css" => Some(AttributeKind::Style { tailwind: false }),
      "tw" => Some(AttributeKind::Style { tailwind: true }),
      _ if name.ends_with("--") => {
        let stem = name.trim_end_matches(&['-', '$'][..]);
        self
          .variant_attributes
          .contains(stem)
          .then(|| AttributeKind::Variant {
            stem: stem.to_string(),
          })
      }
      _ if name.ends_with('-') || name.ends_with('$') => {
        let stem = &name[..name.len() - 1];
        self
          .utility_attributes
          .contains(stem)
          .then(|| AttributeKind::Utility {
            stem: stem.to_string(),
          })
      }
      _ => None,
    }
  }

  /// Process one attribute already detached from `element`. Returns the attribute when it must
  /// stay on the element untouched.
  fn process_attribute(
    &mut self,
    element: &mut JSXElement,
    attr: JSXAttr,
    kind: AttributeKind,
  ) -> Result<Option<JSXAttr>, TransformError> {
    match kind {
      AttributeKind::Style { tailwind } => {
        let Some(value) = &attr.value else {
          return Ok(Some(attr));
        };
        let Some(mut tpl) = to_template(classify(value), &self.css_local())? else {
          return Ok(None);
        };
        if tailwind {
          rewrite_bounds(&mut tpl, "@tailwind ", ";");
        } else {
          rewrite_bounds(&mut tpl, "", "");
        }

        if requires_component(&tpl) {
          self.to_styled(element, tpl, attr.span)?;
        } else {
          self.to_css(element, tpl);
        }
        Ok(None)
      }
      AttributeKind::Utility { stem } => {
        let tpl = match &attr.value {
          None => text_template(&format!("@tailwind {stem};"), attr.span),
          Some(value) => match negative_number(value) {
            Some(number) => text_template(&format!("@tailwind -{stem}-{number};"), attr.span),
            None => match to_template(classify(value), &self.css_local())? {
              Some(mut tpl) => {
                rewrite_bounds(&mut tpl, &format!("@tailwind {stem}-"), ";");
                tpl
              }
              None => text_template(&format!("@tailwind {stem};"), attr.span),
            },
          },
        };
        self.to_css(element, tpl);
        Ok(None)
      }
      AttributeKind::Variant { stem } => {
        let array = match &attr.value {
          Some(JSXAttrValue::JSXExprContainer(JSXExprContainer {
            expr: JSXExpr::Expr(expr),
            ..
          })) => match &**expr {
            Expr::Array(array) => array,
            _ => return Err(TransformError::VariantNotArray { attribute: stem }),
          },
          _ => return Err(TransformError::VariantNotArray { attribute: stem }),
        };

        let prefix = if stem == "tw" {
          String::from(" ")
        } else {
          format!(" {stem}:")
        };
        let mut tpl = template_from_array(&prefix, array, &format!("{stem}--"))?;
        surround(&mut tpl, "@tailwind", ";");
        self.to_css(element, tpl);
        Ok(None)
      }
    }
  }

  fn process_element(&mut self, element: &mut JSXElement) -> Result<(), TransformError> {
    let targets: Vec<(Span, AttributeKind)> = element
      .opening
      .attrs
      .iter()
      .filter_map(|attr| match attr {
        JSXAttrOrSpread::JSXAttr(attr) => jsx_attribute_name(attr)
          .and_then(|name| self.kind_of(name))
          .map(|kind| (attr.span, kind)),
        JSXAttrOrSpread::SpreadElement(_) => None,
      })
      .collect();

    for (span, kind) in targets {
      let position = element.opening.attrs.iter().position(
        |attr| matches!(attr, JSXAttrOrSpread::JSXAttr(attr) if attr.span == span),
      );
      let Some(position) = position else {
        continue;
      };
      let JSXAttrOrSpread::JSXAttr(attr) = element.opening.attrs.remove(position) else {
        continue;
      };

      if let Some(attr) = self.process_attribute(element, attr, kind)? {
        element
          .opening
          .attrs
          .insert(position, JSXAttrOrSpread::JSXAttr(attr));
      }
    }
    Ok(())
  }
}

/// `-N` written as an attribute value
fn negative_number(value: &JSXAttrValue) -> Option<String> {
  let JSXAttrValue::JSXExprContainer(JSXExprContainer {
    expr: JSXExpr::Expr(expr),
    ..
  }) = value
  else {
    return None;
  };
  match &**expr {
    Expr::Unary(UnaryExpr {
      op: UnaryOp::Minus,
      arg,
      ..
    }) => match &**arg {
      Expr::Lit(Lit::Num(number)) => Some(crate::bindings::format_number(number.value)),
      _ => None,
    },
    _ => None,
  }
}

impl VisitMut for Preprocessor<'_> {
  fn visit_mut_expr(&mut self, node: &mut Expr) {
    node.visit_mut_children_with(self);
    if self.error.is_some() {
      return;
    }

    let tw_local = self.imports.local_name("tw").unwrap_or("tw");
    let Expr::TaggedTpl(tagged) = node else {
      return;
    };
    if !matches!(&*tagged.tag, Expr::Ident(tag) if tag.sym.as_ref() == tw_local) {
      return;
    }

    let css = self.imports.ensure("css", &mut self.uids);
    let tpl = std::mem::replace(&mut *tagged.tpl, text_template("", tagged.span));
    *node = wrap_template(tpl, css, "@tailwind ", ";");
  }

  fn visit_mut_jsx_element(&mut self, node: &mut JSXElement) {
    if self.error.is_some() {
      return;
    }
    if let Err(error) = self.process_element(node) {
      self.error = Some(error);
      return;
    }
    node.visit_mut_children_with(self);
  }
}

#[cfg(test)]
mod tests;
