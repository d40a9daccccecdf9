use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use swc_core::common::{Span, Spanned};
use twstyled_stylis::{Children, Element};
use twstyled_tailwind::Engine;

use super::Middleware;
use crate::occurrence::OccurrenceState;
use crate::state::FileState;
use crate::TransformError;

/// `var(--<id>)` left by an interpolation, with the variant prefix glued to it (`hover:`)
static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\S*?)var\(--([^)\s]*)\)").unwrap());
static DIRECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@(tailwind|apply)\s*").unwrap());

/// Resolves `@tailwind` and `@apply` directives into utility classes.
///
/// Directives produce no CSS. Their classes are added to the occurrence's class name, and
/// interpolated class expressions are resolved through the string literals of their scope.
#[derive(Debug)]
pub struct TailwindMiddleware {
  engine: Arc<Engine>,
}

impl TailwindMiddleware {
  pub fn new(engine: Arc<Engine>) -> Self {
    TailwindMiddleware { engine }
  }

  /// Rewrite every literal reachable from interpolation `id` and return whether it is known.
  fn resolve_marker(
    &self,
    file: &mut FileState,
    state: &mut OccurrenceState<'_>,
    prefix: &str,
    id: &str,
  ) -> bool {
    let Some(interpolation) = state.occurrence.interpolation(id) else {
      return false;
    };
    let scope = interpolation.scope;
    let expression = interpolation.expression.span();

    let mut rewrites = Vec::new();
    for literal in file.literals_within(scope) {
      if literal.value.trim().is_empty() {
        continue;
      }
      let declaration = if !prefix.is_empty() && contains(expression, literal.span) {
        format!("{prefix}({})", literal.value)
      } else {
        literal.value.clone()
      };
      rewrites.push((literal.span, self.engine.serialize(&[declaration])));
    }

    for (span, serialized) in rewrites {
      state
        .pending_classes
        .extend(serialized.split_whitespace().map(String::from));
      file.literal_rewrites.insert(span, serialized);
    }
    true
  }
}

impl Middleware for TailwindMiddleware {
  fn enter(
    &self,
    _file: &mut FileState,
    state: &mut OccurrenceState<'_>,
  ) -> Result<(), TransformError> {
    state.tw_declarations.clear();
    state.twvars.clear();
    state.pending_classes.clear();
    Ok(())
  }

  fn stylis(
    &self,
    file: &mut FileState,
    state: &mut OccurrenceState<'_>,
    mut element: Element,
  ) -> Result<Element, TransformError> {
    if !matches!(element.at_rule_name(), Some("@tailwind") | Some("@apply")) {
      return Ok(element);
    }

    let text = directive_text(&element);
    let mut twvars = Vec::new();
    let text = MARKER.replace_all(&text, |captures: &Captures<'_>| {
      let id = &captures[2];
      if self.resolve_marker(file, state, &captures[1], id) {
        twvars.push(id.to_string());
        String::new()
      } else {
        captures[0].to_string()
      }
    });
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    for id in twvars {
      if !state.twvars.contains(&id) {
        state.twvars.push(id);
      }
    }
    if !text.is_empty() {
      state.tw_declarations.push(text);
    }

    element.value = String::new();
    element.children = Children::default();
    Ok(element)
  }

  fn exit(
    &self,
    file: &mut FileState,
    state: &mut OccurrenceState<'_>,
  ) -> Result<(), TransformError> {
    let twvars = std::mem::take(&mut state.twvars);
    state.occurrence.set_twvars(&twvars);
    if !state.occurrence.is_referenced {
      return Ok(());
    }

    file.utility_classes.append(&mut state.pending_classes);
    if state.tw_declarations.is_empty() {
      return Ok(());
    }

    let serialized = self.engine.serialize(&state.tw_declarations);
    file
      .utility_classes
      .extend(serialized.split_whitespace().map(String::from));

    state.class_name = if state.css_text.is_empty() {
      serialized
    } else {
      join_class_names(&[&state.class_name, &serialized])
    };
    Ok(())
  }
}

/// Class tokens of a directive node, whichever way the compiler shaped its children.
fn directive_text(element: &Element) -> String {
  match &element.children {
    Children::Text(text) => text.clone(),
    Children::Nodes(nodes) if nodes.is_empty() => {
      let text = DIRECTIVE.replace(&element.value, "");
      text.trim_end().trim_end_matches(';').to_string()
    }
    Children::Nodes(nodes) => nodes
      .iter()
      .map(|node| node.value.trim_end_matches(';'))
      .collect::<Vec<_>>()
      .join(" "),
  }
}

fn contains(outer: Span, inner: Span) -> bool {
  inner.lo >= outer.lo && inner.hi <= outer.hi
}

fn join_class_names(names: &[&str]) -> String {
  names
    .iter()
    .filter(|name| !name.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use pretty_assertions::assert_eq;
  use swc_core::common::{BytePos, SyntaxContext};
  use swc_core::ecma::ast::{Expr, Ident};
  use twstyled_stylis::compile;
  use twstyled_tailwind::TailwindConfig;

  use super::*;
  use crate::literals::StringLiteral;
  use crate::occurrence::{Interpolation, TemplateOccurrence};

  fn span(lo: u32, hi: u32) -> Span {
    Span::new(BytePos(lo), BytePos(hi))
  }

  fn middleware() -> TailwindMiddleware {
    TailwindMiddleware::new(Arc::new(Engine::new(TailwindConfig::default()).unwrap()))
  }

  fn occurrence(is_referenced: bool) -> TemplateOccurrence {
    TemplateOccurrence {
      selector: ".a".into(),
      css_text: String::new(),
      class_name: "a".into(),
      interpolations: vec![Interpolation {
        id: "a-1".into(),
        expression: Box::new(Expr::Ident(Ident::new(
          "active".into(),
          span(20, 45),
          SyntaxContext::empty(),
        ))),
        scope: span(1, 100),
        source: "active && 'text-white'".into(),
        unit: None,
      }],
      start: None,
      is_referenced,
      props: Vec::new(),
    }
  }

  fn file() -> FileState {
    let mut file = FileState::new(PathBuf::from("/app/a.jsx"), PathBuf::from("/app"), "");
    file.literals = vec![
      StringLiteral {
        span: span(30, 42),
        value: "text-white".into(),
      },
      StringLiteral {
        span: span(50, 60),
        value: "(m-2 p-2)".into(),
      },
      StringLiteral {
        span: span(120, 130),
        value: "outside".into(),
      },
    ];
    file
  }

  /// Run the middleware over `css` the way the processor does.
  fn run(
    file: &mut FileState,
    occurrence: &mut TemplateOccurrence,
    css: &str,
  ) -> (String, String) {
    let middleware = middleware();
    let mut state = OccurrenceState::new(0, occurrence);
    middleware.enter(file, &mut state).unwrap();
    let output = twstyled_stylis::serialize(compile(css), &mut |element| {
      middleware.stylis(file, &mut state, element)
    })
    .unwrap();
    state.css_text = output.clone();
    middleware.exit(file, &mut state).unwrap();
    (output, state.class_name)
  }

  #[test]
  fn test_directive_resolves_to_class_name() {
    let mut file = file();
    let mut occurrence = occurrence(true);
    let (css, class_name) = run(
      &mut file,
      &mut occurrence,
      ".a{@tailwind p-4 text-red-500;}",
    );

    assert_eq!(css, "");
    assert_eq!(class_name, "p-4 text-red-500");
    assert_eq!(file.utility_classes, vec!["p-4", "text-red-500"]);
  }

  #[test]
  fn test_directive_classes_join_existing_css_class() {
    let mut file = file();
    let mut occurrence = occurrence(true);
    let (css, class_name) = run(
      &mut file,
      &mut occurrence,
      ".a{color:red;@apply { hover:(bg-red-500 m-2); }}",
    );

    assert_eq!(css, ".a{color:red;}");
    assert_eq!(class_name, "a hover:bg-red-500 hover:m-2");
  }

  #[test]
  fn test_markers_rewrite_scope_literals() {
    let mut file = file();
    let mut occurrence = occurrence(true);
    let (_, class_name) = run(
      &mut file,
      &mut occurrence,
      ".a{@tailwind flex hover:var(--a-1);}",
    );

    assert_eq!(class_name, "flex");
    assert_eq!(occurrence.twvars(), vec!["a-1"]);
    assert_eq!(
      file.literal_rewrites.get(&span(30, 42)).map(String::as_str),
      Some("hover:text-white")
    );
    assert_eq!(
      file.literal_rewrites.get(&span(50, 60)).map(String::as_str),
      Some("m-2 p-2")
    );
    assert!(!file.literal_rewrites.contains_key(&span(120, 130)));
    assert_eq!(
      file.utility_classes,
      vec!["hover:text-white", "m-2", "p-2", "flex"]
    );
  }

  #[test]
  fn test_markers_of_every_directive_share_one_twvars_prop() {
    let mut file = file();
    let mut occurrence = occurrence(true);
    let mut second = occurrence.interpolations[0].clone();
    second.id = "a-2".into();
    occurrence.interpolations.push(second);

    run(
      &mut file,
      &mut occurrence,
      ".a{@tailwind var(--a-1);@apply flex var(--a-2) var(--a-1);}",
    );

    assert_eq!(occurrence.props.len(), 1);
    assert_eq!(occurrence.twvars(), vec!["a-1", "a-2"]);
  }

  #[test]
  fn test_unknown_markers_are_kept() {
    let mut file = file();
    let mut occurrence = occurrence(true);
    let (_, class_name) = run(&mut file, &mut occurrence, ".a{@tailwind var(--b-0);}");

    assert_eq!(class_name, "var(--b-0)");
    assert!(occurrence.twvars().is_empty());
  }

  #[test]
  fn test_unreferenced_occurrence_contributes_no_classes() {
    let mut file = file();
    let mut occurrence = occurrence(false);
    let (_, class_name) = run(
      &mut file,
      &mut occurrence,
      ".a{@tailwind p-4 var(--a-1);}",
    );

    assert_eq!(class_name, "a");
    assert!(file.utility_classes.is_empty());
  }

  #[test]
  fn test_directive_text_from_each_child_shape() {
    let mut element = compile(".a{@tailwind p-4 m-2;}").remove(1);
    assert_eq!(directive_text(&element), "p-4 m-2");

    element.children = Children::Text("flex".into());
    assert_eq!(directive_text(&element), "flex");

    let element = compile(".a{@apply { p-4; m-2 }}").remove(1);
    assert_eq!(directive_text(&element), "p-4 m-2");
  }
}
