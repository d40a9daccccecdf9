//! Small constructors for the nodes the pipeline synthesizes.

use swc_core::atoms::Atom;
use swc_core::common::{Span, SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::*;

pub fn ident(name: &str) -> Ident {
  Ident::new(Atom::from(name), DUMMY_SP, SyntaxContext::empty())
}

pub fn ident_name(name: &str) -> IdentName {
  IdentName::new(Atom::from(name), DUMMY_SP)
}

pub fn str_lit(value: &str, span: Span) -> Str {
  Str {
    span,
    value: Atom::from(value),
    raw: None,
  }
}

pub fn str_expr(value: &str, span: Span) -> Box<Expr> {
  Box::new(Expr::Lit(Lit::Str(str_lit(value, span))))
}

/// Escape text so it can be used as the raw value of a template quasi.
pub fn escape_template_raw(text: &str) -> String {
  text
    .replace('\\', "\\\\")
    .replace('`', "\\`")
    .replace("${", "\\${")
}

/// A quasi whose raw and cooked values are both `raw`.
pub fn tpl_element(raw: &str, tail: bool, span: Span) -> TplElement {
  TplElement {
    span,
    tail,
    cooked: Some(Atom::from(raw)),
    raw: Atom::from(raw),
  }
}

pub fn tagged_template(tag: Ident, tpl: Tpl) -> Expr {
  tagged(Box::new(Expr::Ident(tag)), tpl)
}

pub fn tagged(tag: Box<Expr>, tpl: Tpl) -> Expr {
  Expr::TaggedTpl(TaggedTpl {
    span: tpl.span,
    ctxt: SyntaxContext::empty(),
    tag,
    type_params: None,
    tpl: Box::new(tpl),
  })
}

pub fn call(callee: Box<Expr>, args: Vec<Box<Expr>>) -> Expr {
  Expr::Call(CallExpr {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    callee: Callee::Expr(callee),
    args: args
      .into_iter()
      .map(|expr| ExprOrSpread { spread: None, expr })
      .collect(),
    type_args: None,
  })
}

pub fn array(items: Vec<Box<Expr>>) -> Expr {
  Expr::Array(ArrayLit {
    span: DUMMY_SP,
    elems: items
      .into_iter()
      .map(|expr| Some(ExprOrSpread { spread: None, expr }))
      .collect(),
  })
}

pub fn key_value(key: &str, value: Box<Expr>) -> PropOrSpread {
  let key = if is_identifier_name(key) {
    PropName::Ident(ident_name(key))
  } else {
    PropName::Str(str_lit(key, DUMMY_SP))
  };
  PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp { key, value })))
}

fn is_identifier_name(name: &str) -> bool {
  let mut chars = name.chars();
  matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// `p => p.<property>`
pub fn prop_accessor(property: &str, span: Span) -> Box<Expr> {
  let param = ident("p");
  Box::new(Expr::Arrow(ArrowExpr {
    span,
    ctxt: SyntaxContext::empty(),
    params: vec![Pat::Ident(BindingIdent {
      id: param.clone(),
      type_ann: None,
    })],
    body: Box::new(BlockStmtOrExpr::Expr(Box::new(Expr::Member(MemberExpr {
      span,
      obj: Box::new(Expr::Ident(param)),
      prop: MemberProp::Ident(ident_name(property)),
    })))),
    is_async: false,
    is_generator: false,
    type_params: None,
    return_type: None,
  }))
}

/// `var <name> = <init>;`
pub fn var_declaration(name: Ident, init: Expr) -> ModuleItem {
  ModuleItem::Stmt(Stmt::Decl(Decl::Var(Box::new(VarDecl {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    kind: VarDeclKind::Var,
    declare: false,
    decls: vec![VarDeclarator {
      span: DUMMY_SP,
      name: Pat::Ident(BindingIdent {
        id: name,
        type_ann: None,
      }),
      init: Some(Box::new(init)),
      definite: false,
    }],
  }))))
}

/// `require("<path>");`
pub fn require_statement(path: &str) -> ModuleItem {
  ModuleItem::Stmt(Stmt::Expr(ExprStmt {
    span: DUMMY_SP,
    expr: Box::new(call(
      Box::new(Expr::Ident(ident("require"))),
      vec![str_expr(path, DUMMY_SP)],
    )),
  }))
}

pub fn jsx_attribute(name: &str, value: Option<JSXAttrValue>) -> JSXAttrOrSpread {
  JSXAttrOrSpread::JSXAttr(JSXAttr {
    span: DUMMY_SP,
    name: JSXAttrName::Ident(ident_name(name)),
    value,
  })
}

pub fn jsx_expression(expr: Box<Expr>) -> JSXAttrValue {
  JSXAttrValue::JSXExprContainer(JSXExprContainer {
    span: DUMMY_SP,
    expr: JSXExpr::Expr(expr),
  })
}

pub fn jsx_attribute_name(attr: &JSXAttr) -> Option<&str> {
  match &attr.name {
    JSXAttrName::Ident(name) => Some(name.sym.as_ref()),
    JSXAttrName::JSXNamespacedName(_) => None,
  }
}

/// Short node-type label used in diagnostics.
pub fn expr_kind(expr: &Expr) -> &'static str {
  match expr {
    Expr::Object(_) => "ObjectExpression",
    Expr::JSXElement(_) => "JSXElement",
    Expr::JSXFragment(_) => "JSXFragment",
    Expr::Class(_) => "ClassExpression",
    Expr::Array(_) => "ArrayExpression",
    Expr::Arrow(_) => "ArrowFunctionExpression",
    Expr::Fn(_) => "FunctionExpression",
    _ => "Expression",
  }
}
