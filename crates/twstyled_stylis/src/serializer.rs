use crate::element::{Children, Element, ElementKind};

/// At-rules that render their value even without a body.
const STATEMENT_AT_RULES: &[&str] = &["@import", "@charset", "@namespace"];

/// Render `elements` to CSS.
///
/// Every node, children included, goes through `callback` before it is stringified; parents are
/// visited before their children.
pub fn serialize<E>(
  elements: Vec<Element>,
  callback: &mut dyn FnMut(Element) -> Result<Element, E>,
) -> Result<String, E> {
  let mut output = String::new();
  for element in elements {
    let element = callback(element)?;
    output.push_str(&stringify(element, callback)?);
  }
  Ok(output)
}

/// Default stringifier for a single node.
pub fn stringify<E>(
  element: Element,
  callback: &mut dyn FnMut(Element) -> Result<Element, E>,
) -> Result<String, E> {
  match &element.kind {
    ElementKind::Declaration => Ok(element.output.unwrap_or(element.value)),
    ElementKind::Comment => Ok(String::new()),
    ElementKind::Rule => {
      if element.props.is_empty() {
        return Ok(String::new());
      }
      let selector = element.props.join(",");
      let body = render_children(element.children, callback)?;
      Ok(wrap(&selector, &body))
    }
    ElementKind::AtRule(name) => {
      if let Some(output) = element.output {
        return Ok(output);
      }
      if STATEMENT_AT_RULES.contains(&name.as_str()) {
        return Ok(element.value);
      }
      let keyframes = name.ends_with("keyframes");
      let body = render_children(element.children, callback)?;
      if keyframes {
        Ok(format!("{}{{{}}}", element.value, body))
      } else {
        Ok(wrap(&element.value, &body))
      }
    }
  }
}

fn render_children<E>(
  children: Children,
  callback: &mut dyn FnMut(Element) -> Result<Element, E>,
) -> Result<String, E> {
  match children {
    Children::Text(text) => Ok(text),
    Children::Nodes(nodes) => serialize(nodes, callback),
  }
}

fn wrap(head: &str, body: &str) -> String {
  if body.is_empty() {
    String::new()
  } else {
    format!("{head}{{{body}}}")
  }
}

#[cfg(test)]
mod tests {
  use std::convert::Infallible;

  use pretty_assertions::assert_eq;

  use super::*;
  use crate::compile;

  fn passthrough(element: Element) -> Result<Element, Infallible> {
    Ok(element)
  }

  fn render(css: &str) -> String {
    serialize(compile(css), &mut passthrough).unwrap()
  }

  #[test]
  fn test_serialize_flattens_nesting() {
    assert_eq!(
      render(".a{color:red;&:hover{color:blue;}span{margin:0}}"),
      ".a{color:red;}.a:hover{color:blue;}.a span{margin:0;}"
    );
  }

  #[test]
  fn test_serialize_media_query() {
    assert_eq!(
      render(".a{color:red;@media (min-width: 640px){color:blue;}}"),
      ".a{color:red;}@media (min-width: 640px){.a{color:blue;}}"
    );
  }

  #[test]
  fn test_serialize_drops_empty_rules_and_unresolved_directives() {
    assert_eq!(render(".a{@tailwind p-4;}"), "");
    assert_eq!(render("@import url(a.css);.b{}"), "@import url(a.css);");
  }

  #[test]
  fn test_serialize_keyframes() {
    assert_eq!(
      render("@keyframes spin{from{opacity:0}to{opacity:1}}"),
      "@keyframes spin{from{opacity:0;}to{opacity:1;}}"
    );
  }

  #[test]
  fn test_serialize_propagates_stage_errors() {
    let result = serialize(compile(".a{color:red;}"), &mut |element: Element| {
      if element.is_declaration() {
        Err("declaration rejected")
      } else {
        Ok(element)
      }
    });
    assert_eq!(result, Err("declaration rejected"));
  }

  #[test]
  fn test_text_children_render_verbatim() {
    let mut elements = compile(".a{color:red}");
    elements[0].children = Children::Text("margin:0;".into());
    let output = serialize(elements, &mut passthrough).unwrap();
    assert_eq!(output, ".a{margin:0;}");
  }
}
