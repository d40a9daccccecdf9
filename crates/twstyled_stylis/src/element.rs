#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
  Rule,
  Declaration,
  Comment,
  /// At-rule name including the leading `@`, lower-cased (`@media`, `@tailwind`)
  AtRule(String),
}

/// Children of a node.
///
/// The compiler only produces `Nodes`; middlewares may collapse a node into raw `Text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Children {
  Text(String),
  Nodes(Vec<Element>),
}

impl Default for Children {
  fn default() -> Self {
    Children::Nodes(Vec::new())
  }
}

impl Children {
  pub fn is_empty(&self) -> bool {
    match self {
      Children::Text(text) => text.is_empty(),
      Children::Nodes(nodes) => nodes.is_empty(),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
  pub kind: ElementKind,
  /// Rule: joined selector list. Declaration: `prop:value;`. At-rule: `@name params`, with a
  /// trailing `;` for statement at-rules.
  pub value: String,
  /// Rule: selectors. Declaration: `[prop, value]`. At-rule: `[params]`.
  pub props: Vec<String>,
  pub children: Children,
  /// Pre-rendered output; when set on a declaration it replaces `value` in the stylesheet
  pub output: Option<String>,
}

impl Element {
  pub fn rule(selectors: Vec<String>, children: Vec<Element>) -> Self {
    Element {
      kind: ElementKind::Rule,
      value: selectors.join(","),
      props: selectors,
      children: Children::Nodes(children),
      output: None,
    }
  }

  pub fn declaration(property: &str, value: &str) -> Self {
    Element {
      kind: ElementKind::Declaration,
      value: format!("{property}:{value};"),
      props: vec![property.to_string(), value.to_string()],
      children: Children::default(),
      output: None,
    }
  }

  pub fn at_rule(name: &str, params: &str, children: Vec<Element>, statement: bool) -> Self {
    let mut value = if params.is_empty() {
      name.to_string()
    } else {
      format!("{name} {params}")
    };
    if statement {
      value.push(';');
    }

    Element {
      kind: ElementKind::AtRule(name.to_ascii_lowercase()),
      value,
      props: vec![params.to_string()],
      children: Children::Nodes(children),
      output: None,
    }
  }

  pub fn is_declaration(&self) -> bool {
    self.kind == ElementKind::Declaration
  }

  /// Name of the at-rule (`@media`), if this is one.
  pub fn at_rule_name(&self) -> Option<&str> {
    match &self.kind {
      ElementKind::AtRule(name) => Some(name),
      _ => None,
    }
  }
}
