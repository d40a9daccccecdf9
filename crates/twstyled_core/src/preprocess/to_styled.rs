use inflector::Inflector;
use once_cell::sync::Lazy;
use regex::Regex;
use swc_core::common::{Span, DUMMY_SP};
use swc_core::ecma::ast::*;

use super::{Insertion, Preprocessor};
use crate::ast::{call, jsx_attribute, jsx_expression, prop_accessor, str_expr, tagged, var_declaration};
use crate::TransformError;

static TAG_NAME: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[a-z][a-z\d]*(-[a-z][a-z\d]*)?$").unwrap());

impl Preprocessor<'_> {
  /// Hoist the element into `var _TwCssX = styled(tag)\`…\`` and render that component instead.
  ///
  /// Embedded expressions that close over module scope, and functions, move as they are;
  /// anything else is handed to the component through a generated `_$p_` prop.
  pub(super) fn to_styled(
    &mut self,
    element: &mut JSXElement,
    mut tpl: Tpl,
    attr_span: Span,
  ) -> Result<(), TransformError> {
    let styled = self.imports.ensure("styled", &mut self.uids);
    let name = element_name(&element.opening.name)?;
    let name_expr = element_expr(&element.opening.name)?;
    let id = self
      .uids
      .generate(&format!("TwCss{}", name.to_pascal_case()));

    element.opening.name = JSXElementName::Ident(id.clone());
    if let Some(closing) = element.closing.as_mut() {
      closing.name = JSXElementName::Ident(id.clone());
    }

    let (target, after) = if TAG_NAME.is_match(&name) {
      (str_expr(&name, DUMMY_SP), None)
    } else {
      (name_expr, self.bindings.local_declaration(&name))
    };

    let exprs = std::mem::take(&mut tpl.exprs);
    for expr in exprs {
      let reference = match &*expr {
        Expr::Member(member) => &*member.obj,
        other => other,
      };
      let passes_through = matches!(reference, Expr::Ident(ident) if self.bindings.is_top_level(ident))
        || matches!(&*expr, Expr::Arrow(_) | Expr::Fn(_));

      if passes_through {
        tpl.exprs.push(expr);
      } else {
        let prop = self.uids.generate("_$p_");
        element
          .opening
          .attrs
          .push(jsx_attribute(&prop.sym, Some(jsx_expression(expr))));
        tpl.exprs.push(prop_accessor(&prop.sym, attr_span));
      }
    }

    let styled_call = call(Box::new(Expr::Ident(styled)), vec![target]);
    self.insertions.push(Insertion {
      after,
      item: var_declaration(id, tagged(Box::new(styled_call), tpl)),
    });
    Ok(())
  }
}

fn element_name(name: &JSXElementName) -> Result<String, TransformError> {
  match name {
    JSXElementName::Ident(ident) => Ok(ident.sym.to_string()),
    JSXElementName::JSXMemberExpr(member) => {
      Ok(format!("{}.{}", object_name(&member.obj), member.prop.sym))
    }
    JSXElementName::JSXNamespacedName(_) => Err(TransformError::CannotInferName {
      kind: "JSXNamespacedName",
    }),
  }
}

fn object_name(object: &JSXObject) -> String {
  match object {
    JSXObject::Ident(ident) => ident.sym.to_string(),
    JSXObject::JSXMemberExpr(member) => format!("{}.{}", object_name(&member.obj), member.prop.sym),
  }
}

fn element_expr(name: &JSXElementName) -> Result<Box<Expr>, TransformError> {
  match name {
    JSXElementName::Ident(ident) => Ok(Box::new(Expr::Ident(ident.clone()))),
    JSXElementName::JSXMemberExpr(member) => Ok(Box::new(Expr::Member(MemberExpr {
      span: DUMMY_SP,
      obj: object_expr(&member.obj),
      prop: MemberProp::Ident(member.prop.clone()),
    }))),
    JSXElementName::JSXNamespacedName(_) => Err(TransformError::CannotInferName {
      kind: "JSXNamespacedName",
    }),
  }
}

fn object_expr(object: &JSXObject) -> Box<Expr> {
  match object {
    JSXObject::Ident(ident) => Box::new(Expr::Ident(ident.clone())),
    JSXObject::JSXMemberExpr(member) => Box::new(Expr::Member(MemberExpr {
      span: DUMMY_SP,
      obj: object_expr(&member.obj),
      prop: MemberProp::Ident(member.prop.clone()),
    })),
  }
}
