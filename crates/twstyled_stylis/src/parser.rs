use crate::element::{Element, ElementKind};
use crate::list;

/// At-rules whose body is re-scoped under the enclosing rule's selectors.
const CONDITIONAL_AT_RULES: &[&str] = &[
  "@media",
  "@supports",
  "@container",
  "@layer",
  "@document",
  "@scope",
];

/// Compile CSS-like text into a flat list of element trees.
///
/// Nested rules are resolved against their parent selectors and emitted as siblings that
/// follow the parent rule. Conditional at-rules nested in a rule wrap a copy of the parent rule.
/// Statement at-rules (`@tailwind a b;`) become at-rule elements with no children whose value
/// keeps the trailing `;`.
///
/// Compilation never fails: unterminated blocks, strings and comments end at end of input.
pub fn compile(text: &str) -> Vec<Element> {
  let mut parser = Parser {
    chars: text.chars().collect(),
    pos: 0,
  };
  parser.parse_body(&[], true).own
}

#[derive(Debug, PartialEq)]
enum Terminator {
  Open,
  Semicolon,
  Close,
  End,
}

struct Body {
  /// Declarations (and, for flat bodies, everything else) in source order
  own: Vec<Element>,
  /// Rules and at-rules that follow the enclosing rule
  nested: Vec<Element>,
  flat: bool,
}

impl Body {
  fn new(flat: bool) -> Self {
    Body {
      own: Vec::new(),
      nested: Vec::new(),
      flat,
    }
  }

  fn push_nested(&mut self, element: Element) {
    if self.flat {
      self.own.push(element);
    } else {
      self.nested.push(element);
    }
  }
}

struct Parser {
  chars: Vec<char>,
  pos: usize,
}

impl Parser {
  fn peek(&self) -> Option<char> {
    self.chars.get(self.pos).copied()
  }

  fn peek_at(&self, offset: usize) -> Option<char> {
    self.chars.get(self.pos + offset).copied()
  }

  fn skip_whitespace(&mut self) {
    while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
      self.pos += 1;
    }
  }

  /// Parse declarations and nested blocks until the closing `}` of the current block (which is
  /// consumed) or end of input.
  fn parse_body(&mut self, parents: &[String], flat: bool) -> Body {
    let mut body = Body::new(flat);

    loop {
      self.skip_whitespace();
      match (self.peek(), self.peek_at(1)) {
        (None, _) => break,
        (Some('}'), _) => {
          self.pos += 1;
          break;
        }
        (Some(';'), _) => {
          self.pos += 1;
          continue;
        }
        (Some('/'), Some('*')) => {
          let comment = self.read_block_comment();
          body.own.push(Element {
            kind: ElementKind::Comment,
            value: comment,
            props: Vec::new(),
            children: Default::default(),
            output: None,
          });
          continue;
        }
        _ => {}
      }

      let (segment, terminator) = self.read_segment();
      match terminator {
        Terminator::Open if segment.is_empty() => {
          self.parse_body(&[], true);
        }
        Terminator::Open => self.parse_block(&segment, parents, &mut body),
        _ if segment.is_empty() => {}
        _ => push_statement(&segment, &mut body),
      }
    }

    body
  }

  fn parse_block(&mut self, head: &str, parents: &[String], body: &mut Body) {
    if head.starts_with('@') {
      let (name, params) = split_at_rule(head);

      if name.ends_with("keyframes") {
        let inner = self.parse_body(&[], true);
        body.push_nested(Element::at_rule(&name, &params, inner.own, false));
      } else if CONDITIONAL_AT_RULES.contains(&name.as_str()) {
        let inner = self.parse_body(parents, false);
        let mut children = Vec::new();
        if !inner.own.is_empty() {
          if parents.is_empty() {
            children.extend(inner.own);
          } else {
            children.push(Element::rule(parents.to_vec(), inner.own));
          }
        }
        children.extend(inner.nested);
        body.push_nested(Element::at_rule(&name, &params, children, false));
      } else {
        let inner = self.parse_body(&[], true);
        body.push_nested(Element::at_rule(&name, &params, inner.own, false));
      }
      return;
    }

    let selectors = resolve_selectors(head, parents);
    let inner = self.parse_body(&selectors, false);
    body.push_nested(Element::rule(selectors, inner.own));
    for element in inner.nested {
      body.push_nested(element);
    }
  }

  fn read_block_comment(&mut self) -> String {
    let start = self.pos;
    self.pos += 2;
    while self.pos < self.chars.len() {
      if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
        self.pos += 2;
        break;
      }
      self.pos += 1;
    }
    self.chars[start..self.pos.min(self.chars.len())]
      .iter()
      .collect()
  }

  fn skip_line_comment(&mut self) {
    while let Some(ch) = self.peek() {
      if ch == '\n' {
        break;
      }
      self.pos += 1;
    }
  }

  /// Read up to the next top-level `{`, `;` or `}`, collapsing whitespace and dropping comments.
  /// `{` and `;` are consumed, `}` is left for the caller.
  fn read_segment(&mut self) -> (String, Terminator) {
    let mut segment = String::new();
    let mut depth = 0u32;

    let terminator = loop {
      let Some(ch) = self.peek() else {
        break Terminator::End;
      };

      match ch {
        '{' if depth == 0 => {
          self.pos += 1;
          break Terminator::Open;
        }
        ';' if depth == 0 => {
          self.pos += 1;
          break Terminator::Semicolon;
        }
        '}' if depth == 0 => break Terminator::Close,
        '/' if self.peek_at(1) == Some('*') => {
          self.read_block_comment();
          continue;
        }
        '/' if depth == 0 && self.peek_at(1) == Some('/') => {
          self.skip_line_comment();
          continue;
        }
        '"' | '\'' => {
          self.read_string(ch, &mut segment);
          continue;
        }
        '\\' => {
          segment.push(ch);
          self.pos += 1;
          if let Some(escaped) = self.peek() {
            segment.push(escaped);
            self.pos += 1;
          }
          continue;
        }
        '(' => depth += 1,
        ')' => depth = depth.saturating_sub(1),
        _ => {}
      }

      if ch.is_whitespace() {
        if !segment.is_empty() && !segment.ends_with(' ') {
          segment.push(' ');
        }
      } else {
        segment.push(ch);
      }
      self.pos += 1;
    };

    let trimmed = segment.trim_end().len();
    segment.truncate(trimmed);
    (segment, terminator)
  }

  fn read_string(&mut self, quote: char, segment: &mut String) {
    segment.push(quote);
    self.pos += 1;
    while let Some(ch) = self.peek() {
      segment.push(ch);
      self.pos += 1;
      if ch == '\\' {
        if let Some(escaped) = self.peek() {
          segment.push(escaped);
          self.pos += 1;
        }
      } else if ch == quote {
        break;
      }
    }
  }
}

fn push_statement(segment: &str, body: &mut Body) {
  if segment.starts_with('@') {
    let (name, params) = split_at_rule(segment);
    body.push_nested(Element::at_rule(&name, &params, Vec::new(), true));
    return;
  }

  match find_top_level(segment, ':') {
    Some(index) => {
      let property = segment[..index].trim();
      let value = segment[index + 1..].trim();
      body.own.push(Element::declaration(property, value));
    }
    None => body.own.push(Element {
      kind: ElementKind::Declaration,
      value: format!("{segment};"),
      props: vec![segment.to_string(), String::new()],
      children: Default::default(),
      output: None,
    }),
  }
}

/// `@media (min-width: 1px)` -> (`@media`, `(min-width: 1px)`)
fn split_at_rule(head: &str) -> (String, String) {
  let end = head
    .char_indices()
    .skip(1)
    .find(|(_, ch)| ch.is_whitespace() || *ch == '(' || *ch == '"' || *ch == '\'')
    .map(|(index, _)| index)
    .unwrap_or(head.len());
  (
    head[..end].to_ascii_lowercase(),
    head[end..].trim().to_string(),
  )
}

fn find_top_level(text: &str, needle: char) -> Option<usize> {
  let mut depth = 0u32;
  let mut quote: Option<char> = None;
  for (index, ch) in text.char_indices() {
    match (quote, ch) {
      (Some(open), _) if ch == open => quote = None,
      (Some(_), _) => {}
      (None, '"') | (None, '\'') => quote = Some(ch),
      (None, '(') => depth += 1,
      (None, ')') => depth = depth.saturating_sub(1),
      (None, _) if depth == 0 && ch == needle => return Some(index),
      _ => {}
    }
  }
  None
}

/// Resolve a nested selector list against its parents.
///
/// `&` is replaced by the parent, a leading pseudo selector attaches to the parent and anything
/// else becomes a descendant. Lists expand as a cross product, own selectors outermost.
fn resolve_selectors(head: &str, parents: &[String]) -> Vec<String> {
  let own = list::comma(head);
  if parents.is_empty() {
    return own;
  }

  let mut selectors = Vec::with_capacity(own.len() * parents.len());
  for selector in &own {
    for parent in parents {
      let resolved = if selector.contains('&') {
        selector.replace('&', parent)
      } else if selector.starts_with(':') {
        format!("{parent}{selector}")
      } else {
        format!("{parent} {selector}")
      };
      selectors.push(resolved);
    }
  }
  selectors
}

#[cfg(test)]
mod tests {
  use indoc::indoc;
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::Children;

  fn nodes(element: &Element) -> &[Element] {
    match &element.children {
      Children::Nodes(nodes) => nodes,
      Children::Text(_) => panic!("expected element nodes"),
    }
  }

  #[test]
  fn test_compile_declarations_collapse_whitespace() {
    let elements = compile(".a{ color :  red ;\n  margin: 0   auto }");
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].props, vec![".a"]);
    let values: Vec<&str> = nodes(&elements[0])
      .iter()
      .map(|e| e.value.as_str())
      .collect();
    assert_eq!(values, vec!["color:red;", "margin:0 auto;"]);
  }

  #[test]
  fn test_compile_nested_rules_follow_parent() {
    let elements = compile(indoc! {"
      .a, .b {
        color: red;
        &:hover { color: blue; }
        :focus { color: green; }
        span { color: black; }
      }
    "});
    let selectors: Vec<String> = elements.iter().map(|e| e.value.clone()).collect();
    assert_eq!(
      selectors,
      vec![
        ".a,.b",
        ".a:hover,.b:hover",
        ".a:focus,.b:focus",
        ".a span,.b span",
      ]
    );
  }

  #[test]
  fn test_compile_statement_at_rule_has_no_children() {
    let elements = compile(".x{@tailwind p-4 text-red-500;}");
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].kind, ElementKind::Rule);
    assert!(elements[0].children.is_empty());
    assert_eq!(elements[1].at_rule_name(), Some("@tailwind"));
    assert_eq!(elements[1].value, "@tailwind p-4 text-red-500;");
    assert!(elements[1].children.is_empty());
  }

  #[test]
  fn test_compile_media_wraps_parent_rule() {
    let elements = compile(".a{@media (min-width: 640px){color:red;}}");
    assert_eq!(elements.len(), 2);
    let media = &elements[1];
    assert_eq!(media.at_rule_name(), Some("@media"));
    assert_eq!(media.props, vec!["(min-width: 640px)"]);
    assert_eq!(nodes(media)[0].props, vec![".a"]);
    assert_eq!(nodes(&nodes(media)[0])[0].value, "color:red;");
  }

  #[test]
  fn test_compile_keeps_parenthesised_groups_atomic() {
    let elements = compile(r#".a{background:url(./a;b.png);content:"x;y"}"#);
    let values: Vec<&str> = nodes(&elements[0])
      .iter()
      .map(|e| e.value.as_str())
      .collect();
    assert_eq!(values, vec!["background:url(./a;b.png);", r#"content:"x;y";"#]);
  }

  #[test]
  fn test_compile_keyframes_are_not_scoped() {
    let elements = compile(".a{@keyframes spin{from{opacity:0}to{opacity:1}}}");
    let keyframes = &elements[1];
    assert_eq!(keyframes.at_rule_name(), Some("@keyframes"));
    let selectors: Vec<&str> = nodes(keyframes).iter().map(|e| e.value.as_str()).collect();
    assert_eq!(selectors, vec!["from", "to"]);
  }

  #[test]
  fn test_compile_block_directive_keeps_children() {
    let elements = compile(".a{@apply { p-4; m-2 }}");
    let apply = &elements[1];
    assert_eq!(apply.at_rule_name(), Some("@apply"));
    let values: Vec<&str> = nodes(apply).iter().map(|e| e.value.as_str()).collect();
    assert_eq!(values, vec!["p-4;", "m-2;"]);
  }

  #[test]
  fn test_compile_drops_comments_inside_segments() {
    let elements = compile(".a{color:/* c */red; // trailing\n}");
    assert_eq!(nodes(&elements[0])[0].value, "color:red;");
  }

  #[test]
  fn test_compile_unterminated_input() {
    let elements = compile(".a{color:red");
    assert_eq!(nodes(&elements[0])[0].value, "color:red;");
  }
}
