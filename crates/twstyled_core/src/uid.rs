use std::collections::HashSet;

use swc_core::atoms::Atom;
use swc_core::ecma::ast::{Ident, Module};
use swc_core::ecma::visit::{Visit, VisitWith};

use crate::ast::ident;

/// Hands out identifiers that collide with no name used anywhere in the module.
///
/// Names follow the `_name`, `_name2`, `_name3` scheme.
#[derive(Debug, Default)]
pub struct UidGenerator {
  used: HashSet<Atom>,
}

struct NameCollector<'a>(&'a mut HashSet<Atom>);

impl Visit for NameCollector<'_> {
  fn visit_ident(&mut self, node: &Ident) {
    self.0.insert(node.sym.clone());
  }
}

impl UidGenerator {
  pub fn for_module(module: &Module) -> Self {
    let mut used = HashSet::new();
    module.visit_with(&mut NameCollector(&mut used));
    UidGenerator { used }
  }

  /// Mark `name` as taken without generating it.
  pub fn reserve(&mut self, name: &str) {
    self.used.insert(Atom::from(name));
  }

  pub fn generate(&mut self, name: &str) -> Ident {
    let base = to_identifier(name);
    let base = base.trim_start_matches('_').trim_end_matches(|c: char| c.is_ascii_digit());

    let mut counter = 1;
    loop {
      let candidate = if counter == 1 {
        format!("_{base}")
      } else {
        format!("_{base}{counter}")
      };
      let atom = Atom::from(candidate.as_str());
      if !self.used.contains(&atom) {
        self.used.insert(atom);
        return ident(&candidate);
      }
      counter += 1;
    }
  }
}

/// Camel-case the segments between characters that cannot appear in an identifier.
fn to_identifier(name: &str) -> String {
  let mut result = String::with_capacity(name.len());
  let mut upper_next = false;
  for c in name.chars() {
    if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
      if upper_next && !result.is_empty() {
        result.extend(c.to_uppercase());
      } else {
        result.push(c);
      }
      upper_next = false;
    } else {
      upper_next = true;
    }
  }
  let result = result.trim_start_matches(|c: char| c.is_ascii_digit());
  if result.is_empty() {
    String::from("_")
  } else {
    result.to_string()
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_generate_skips_used_names() {
    let mut uids = UidGenerator::default();
    uids.reserve("_TwCssDiv");

    assert_eq!(uids.generate("TwCssDiv").sym.as_ref(), "_TwCssDiv2");
    assert_eq!(uids.generate("TwCssDiv").sym.as_ref(), "_TwCssDiv3");
    assert_eq!(uids.generate("_$p_").sym.as_ref(), "_$p_");
    assert_eq!(uids.generate("_$p_").sym.as_ref(), "_$p_2");
  }

  #[test]
  fn test_to_identifier() {
    assert_eq!(to_identifier("TwCssmy-element"), "TwCssmyElement");
    assert_eq!(to_identifier("Foo.Bar"), "FooBar");
    assert_eq!(to_identifier("1a"), "a");
  }
}
