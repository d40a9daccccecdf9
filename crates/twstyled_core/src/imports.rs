use std::collections::BTreeMap;

use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::*;

use crate::ast::{ident, str_lit};
use crate::uid::UidGenerator;

/// Tracks the style-API import of one file: imported name -> local name, and the declaration
/// new specifiers are added to.
#[derive(Debug, Clone, Default)]
pub struct ImportTracker {
  source: String,
  local_names: BTreeMap<String, String>,
  /// Index of the tracked declaration in the module body
  declaration: Option<usize>,
  pending: Vec<(String, String)>,
}

impl ImportTracker {
  /// Record the specifiers of the first import from `source`. When `tw` is imported without
  /// `css`, `css` is added to that declaration.
  pub fn scan(module: &mut Module, source: &str) -> Self {
    let mut tracker = ImportTracker {
      source: source.to_string(),
      ..Default::default()
    };

    for (index, item) in module.body.iter_mut().enumerate() {
      let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
        continue;
      };
      if import.src.value.as_ref() != source || import.type_only {
        continue;
      }

      tracker.declaration = Some(index);
      for specifier in &import.specifiers {
        // default and namespace imports are not supported
        let ImportSpecifier::Named(named) = specifier else {
          continue;
        };
        let imported = match &named.imported {
          Some(ModuleExportName::Ident(name)) => name.sym.to_string(),
          Some(ModuleExportName::Str(name)) => name.value.to_string(),
          None => named.local.sym.to_string(),
        };
        tracker
          .local_names
          .insert(imported, named.local.sym.to_string());
      }

      if tracker.local_names.contains_key("tw") && !tracker.local_names.contains_key("css") {
        import.specifiers.push(named_specifier("css", "css"));
        tracker
          .local_names
          .insert(String::from("css"), String::from("css"));
      }
      break;
    }

    tracker
  }

  pub fn local_name(&self, imported: &str) -> Option<&str> {
    self.local_names.get(imported).map(String::as_str)
  }

  /// Local identifier for `imported`, importing it first when needed. `css` and `styled` keep
  /// their own names; anything else gets a fresh local.
  pub fn ensure(&mut self, imported: &str, uids: &mut UidGenerator) -> Ident {
    if let Some(local) = self.local_names.get(imported) {
      return ident(local);
    }

    let local = if imported == "css" || imported == "styled" {
      uids.reserve(imported);
      imported.to_string()
    } else {
      uids.generate(imported).sym.to_string()
    };
    self
      .local_names
      .insert(imported.to_string(), local.clone());
    self.pending.push((imported.to_string(), local.clone()));
    ident(&local)
  }

  /// Write the specifiers added by [`ImportTracker::ensure`] into the module: appended to the
  /// tracked declaration, or as a new declaration at the top.
  pub fn apply(&mut self, module: &mut Module) {
    if self.pending.is_empty() {
      return;
    }
    let specifiers: Vec<ImportSpecifier> = self
      .pending
      .drain(..)
      .map(|(imported, local)| named_specifier(&imported, &local))
      .collect();

    if let Some(ModuleItem::ModuleDecl(ModuleDecl::Import(import))) =
      self.declaration.and_then(|index| module.body.get_mut(index))
    {
      import.specifiers.extend(specifiers);
      return;
    }

    module.body.insert(
      0,
      ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers,
        src: Box::new(str_lit(&self.source, DUMMY_SP)),
        type_only: false,
        with: None,
        phase: Default::default(),
      })),
    );
    self.declaration = Some(0);
  }

  /// Shift the tracked declaration after `count` items were inserted at or before it.
  pub fn shift(&mut self, at: usize, count: usize) {
    if let Some(index) = self.declaration.as_mut() {
      if *index >= at {
        *index += count;
      }
    }
  }
}

fn named_specifier(imported: &str, local: &str) -> ImportSpecifier {
  ImportSpecifier::Named(ImportNamedSpecifier {
    span: DUMMY_SP,
    local: ident(local),
    imported: if imported == local {
      None
    } else {
      Some(ModuleExportName::Ident(ident(imported)))
    },
    is_type_only: false,
  })
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use indoc::indoc;
  use pretty_assertions::assert_eq;
  use twstyled_swc_runner::{run_with_transformation, RunOptions};

  use super::*;

  fn run(code: &str, transform: impl FnOnce(&mut Module) -> ImportTracker) -> (String, ImportTracker) {
    let output = run_with_transformation(
      RunOptions {
        code,
        filename: Path::new("test.jsx"),
        syntax: None,
      },
      |_, module| transform(module),
    )
    .unwrap();
    (output.output_code, output.transform_result)
  }

  #[test]
  fn test_scan_records_local_names() {
    let (_, tracker) = run(
      "import { styled as s, css } from '@twstyled/core';\nimport x from 'y';",
      |module| ImportTracker::scan(module, "@twstyled/core"),
    );

    assert_eq!(tracker.local_name("styled"), Some("s"));
    assert_eq!(tracker.local_name("css"), Some("css"));
    assert_eq!(tracker.local_name("tw"), None);
  }

  #[test]
  fn test_scan_adds_css_next_to_tw() {
    let (code, tracker) = run("import { tw } from '@twstyled/core';", |module| {
      ImportTracker::scan(module, "@twstyled/core")
    });

    assert_eq!(tracker.local_name("css"), Some("css"));
    assert_eq!(code, "import { tw, css } from '@twstyled/core';\n");
  }

  #[test]
  fn test_ensure_prepends_a_declaration_once() {
    let (code, _) = run(
      indoc! {r#"
        import React from 'react';
        const a = 1;
      "#},
      |module| {
        let mut uids = UidGenerator::for_module(module);
        let mut tracker = ImportTracker::scan(module, "@twstyled/core");
        assert_eq!(tracker.ensure("css", &mut uids).sym.as_ref(), "css");
        assert_eq!(tracker.ensure("css", &mut uids).sym.as_ref(), "css");
        tracker.ensure("styled", &mut uids);
        tracker.apply(module);
        tracker
      },
    );

    assert_eq!(
      code,
      indoc! {r#"
        import { css, styled } from "@twstyled/core";
        import React from 'react';
        const a = 1;
      "#}
    );
  }

  #[test]
  fn test_ensure_appends_to_existing_declaration() {
    let (code, _) = run("import { tw } from '@twstyled/core';", |module| {
      let mut uids = UidGenerator::for_module(module);
      let mut tracker = ImportTracker::scan(module, "@twstyled/core");
      tracker.ensure("styled", &mut uids);
      tracker.apply(module);
      tracker
    });

    assert_eq!(code, "import { tw, css, styled } from '@twstyled/core';\n");
  }
}
