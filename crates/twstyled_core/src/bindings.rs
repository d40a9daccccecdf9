//! Module-scope bindings: what is declared at the top level, where, and which constants can be
//! inlined into style templates.

use std::collections::{HashMap, HashSet};

use swc_core::ecma::ast::*;
use swc_core::ecma::utils::find_pat_ids;

#[derive(Debug, Default)]
pub struct ModuleBindings {
  top_level: HashSet<Id>,
  /// Index of the module item declaring each local (non-imported) top-level name
  declared_at: HashMap<Id, usize>,
  constants: HashMap<Id, String>,
}

impl ModuleBindings {
  pub fn collect(module: &Module) -> Self {
    let mut bindings = ModuleBindings::default();

    for (index, item) in module.body.iter().enumerate() {
      match item {
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
          for specifier in &import.specifiers {
            let local = match specifier {
              ImportSpecifier::Named(named) => &named.local,
              ImportSpecifier::Default(default) => &default.local,
              ImportSpecifier::Namespace(namespace) => &namespace.local,
            };
            bindings.top_level.insert(local.to_id());
          }
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
          bindings.add_decl(&export.decl, index);
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => {
          let ident = match &export.decl {
            DefaultDecl::Fn(function) => function.ident.as_ref(),
            DefaultDecl::Class(class) => class.ident.as_ref(),
            DefaultDecl::TsInterfaceDecl(_) => None,
          };
          if let Some(ident) = ident {
            bindings.add_local(ident.to_id(), index);
          }
        }
        ModuleItem::Stmt(Stmt::Decl(decl)) => bindings.add_decl(decl, index),
        _ => {}
      }
    }

    bindings
  }

  fn add_local(&mut self, id: Id, index: usize) {
    self.top_level.insert(id.clone());
    self.declared_at.insert(id, index);
  }

  fn add_decl(&mut self, decl: &Decl, index: usize) {
    match decl {
      Decl::Fn(function) => self.add_local(function.ident.to_id(), index),
      Decl::Class(class) => self.add_local(class.ident.to_id(), index),
      Decl::Var(var) => {
        for declarator in &var.decls {
          let ids: Vec<Id> = find_pat_ids(&declarator.name);
          if var.kind == VarDeclKind::Const {
            if let (Pat::Ident(name), Some(init)) = (&declarator.name, &declarator.init) {
              if let Some(value) = literal_value(init) {
                self.constants.insert(name.id.to_id(), value);
              }
            }
          }
          for id in ids {
            self.add_local(id, index);
          }
        }
      }
      _ => {}
    }
  }

  /// Whether `ident` refers to a module-scope binding (imports included).
  pub fn is_top_level(&self, ident: &Ident) -> bool {
    self.top_level.contains(&ident.to_id())
  }

  /// Module item index of the local declaration named `name`. Imports have none.
  pub fn local_declaration(&self, name: &str) -> Option<usize> {
    self
      .declared_at
      .iter()
      .find(|((sym, _), _)| sym.as_ref() == name)
      .map(|(_, index)| *index)
  }

  pub fn constant(&self, ident: &Ident) -> Option<&str> {
    self.constants.get(&ident.to_id()).map(String::as_str)
  }
}

/// Text of a string, number or expression-less template literal.
pub fn literal_value(expr: &Expr) -> Option<String> {
  match expr {
    Expr::Lit(Lit::Str(string)) => Some(string.value.to_string()),
    Expr::Lit(Lit::Num(number)) => Some(format_number(number.value)),
    Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
      .quasis
      .first()
      .map(|quasi| quasi.cooked.as_ref().unwrap_or(&quasi.raw).to_string()),
    Expr::Unary(UnaryExpr {
      op: UnaryOp::Minus,
      arg,
      ..
    }) => match &**arg {
      Expr::Lit(Lit::Num(number)) => Some(format_number(-number.value)),
      _ => None,
    },
    Expr::Paren(paren) => literal_value(&paren.expr),
    _ => None,
  }
}

/// Numbers render the way they would in a JS template string.
pub fn format_number(value: f64) -> String {
  if value.fract() == 0.0 && value.abs() < 1e15 {
    format!("{}", value as i64)
  } else {
    format!("{value}")
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use indoc::indoc;
  use pretty_assertions::assert_eq;
  use twstyled_swc_runner::run_with_transformation;
  use twstyled_swc_runner::RunOptions;

  use super::*;

  fn collect(code: &str) -> (ModuleBindings, Module) {
    run_with_transformation(
      RunOptions {
        code,
        filename: Path::new("test.jsx"),
        syntax: None,
      },
      |_, module| (ModuleBindings::collect(module), module.clone()),
    )
    .unwrap()
    .transform_result
  }

  #[test]
  fn test_collects_declarations_and_constants() {
    let (bindings, _) = collect(indoc! {r#"
      import { css } from '@twstyled/core';
      import Button from './Button';
      const size = 4;
      const color = 'red';
      let other = 'x';
      function Card() {}
      export const Title = () => null;
    "#});

    assert_eq!(bindings.local_declaration("Card"), Some(5));
    assert_eq!(bindings.local_declaration("Title"), Some(6));
    assert_eq!(bindings.local_declaration("Button"), None);
    assert_eq!(bindings.local_declaration("css"), None);
    assert_eq!(bindings.constants.len(), 2);
    assert!(bindings
      .constants
      .values()
      .any(|value| value == "4"));
  }

  #[test]
  fn test_literal_value() {
    assert_eq!(format_number(4.0), "4");
    assert_eq!(format_number(0.5), "0.5");
    assert_eq!(format_number(-2.0), "-2");
  }
}
