//! Records handed from the extraction pass to the template processor.

use swc_core::common::{Span, DUMMY_SP};
use swc_core::ecma::ast::*;

use crate::ast::{array, key_value, str_expr};

/// Position of a template in its source file. Lines are 1-based, columns 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
  pub line: u32,
  pub column: u32,
}

/// An interpolation that could not be evaluated at build time. Its place in the CSS text is
/// taken by `var(--<id>)`.
#[derive(Clone, Debug)]
pub struct Interpolation {
  pub id: String,
  pub expression: Box<Expr>,
  /// Span of the innermost function enclosing the template, or of the module
  pub scope: Span,
  pub source: String,
  /// Unit written right after the interpolation (`px`, `%`), consumed from the CSS text
  pub unit: Option<String>,
}

/// One style template found in a file.
#[derive(Clone, Debug)]
pub struct TemplateOccurrence {
  pub selector: String,
  pub css_text: String,
  pub class_name: String,
  pub interpolations: Vec<Interpolation>,
  pub start: Option<Location>,
  /// False when the template's value is discarded, e.g. a bare expression statement
  pub is_referenced: bool,
  /// Extra properties for the replacement `styled` call
  pub props: Vec<PropOrSpread>,
}

impl TemplateOccurrence {
  pub fn interpolation(&self, id: &str) -> Option<&Interpolation> {
    self
      .interpolations
      .iter()
      .find(|interpolation| interpolation.id == id)
  }

  /// Attach the interpolation ids that resolve to utility classes as a single `twvars`
  /// property, replacing an earlier one.
  pub fn set_twvars(&mut self, ids: &[String]) {
    self.props.retain(|prop| !is_twvars(prop));
    if ids.is_empty() {
      return;
    }
    let items = ids.iter().map(|id| str_expr(id, DUMMY_SP)).collect();
    self.props.push(key_value("twvars", Box::new(array(items))));
  }

  /// Ids recorded by [`TemplateOccurrence::set_twvars`].
  pub fn twvars(&self) -> Vec<String> {
    let mut ids = Vec::new();
    for prop in self.props.iter().filter(|prop| is_twvars(prop)) {
      let PropOrSpread::Prop(prop) = prop else {
        continue;
      };
      let Prop::KeyValue(KeyValueProp { value, .. }) = &**prop else {
        continue;
      };
      if let Expr::Array(array) = &**value {
        ids.extend(array.elems.iter().flatten().filter_map(|item| match &*item.expr {
          Expr::Lit(Lit::Str(id)) => Some(id.value.to_string()),
          _ => None,
        }));
      }
    }
    ids
  }
}

fn is_twvars(prop: &PropOrSpread) -> bool {
  let PropOrSpread::Prop(prop) = prop else {
    return false;
  };
  matches!(
    &**prop,
    Prop::KeyValue(KeyValueProp { key: PropName::Ident(name), .. }) if &*name.sym == "twvars"
  )
}

/// Scratch state of one template processor call.
#[derive(Debug)]
pub struct OccurrenceState<'a> {
  pub css_text: String,
  pub class_name: String,
  pub index: usize,
  pub occurrence: &'a mut TemplateOccurrence,
  /// Stylesheet the occurrence's CSS ends up in
  pub output_filename: Option<std::path::PathBuf>,
  /// Source file relative to the working directory
  pub resource_filename: Option<String>,
  /// Directive text collected from `@tailwind`/`@apply` nodes
  pub tw_declarations: Vec<String>,
  /// Interpolation ids resolved by any directive of the occurrence
  pub twvars: Vec<String>,
  /// Classes found in literals reached through interpolations, kept only if the occurrence is
  /// referenced
  pub pending_classes: Vec<String>,
}

impl<'a> OccurrenceState<'a> {
  pub fn new(index: usize, occurrence: &'a mut TemplateOccurrence) -> Self {
    OccurrenceState {
      css_text: occurrence.css_text.clone(),
      class_name: occurrence.class_name.clone(),
      index,
      occurrence,
      output_filename: None,
      resource_filename: None,
      tw_declarations: Vec::new(),
      twvars: Vec::new(),
      pending_classes: Vec::new(),
    }
  }
}
