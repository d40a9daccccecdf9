//! Parsing and normalization of utility-class strings.

use indexmap::IndexSet;

/// A class split into its variant prefixes and the utility name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedClass<'a> {
  pub variants: Vec<&'a str>,
  pub utility: &'a str,
}

/// `md:hover:bg-red-500` -> variants `[md, hover]`, utility `bg-red-500`.
///
/// Separators inside `[...]` arbitrary values do not split.
pub fn parse_class<'a>(class: &'a str, separator: &str) -> ParsedClass<'a> {
  let mut variants = Vec::new();
  let mut depth = 0u32;
  let mut start = 0;
  let mut index = 0;

  while index < class.len() {
    let rest = &class[index..];
    if rest.starts_with('[') {
      depth += 1;
    } else if rest.starts_with(']') {
      depth = depth.saturating_sub(1);
    } else if depth == 0 && !separator.is_empty() && rest.starts_with(separator) {
      variants.push(&class[start..index]);
      index += separator.len();
      start = index;
      continue;
    }
    index += rest.chars().next().map(char::len_utf8).unwrap_or(1);
  }

  ParsedClass {
    variants,
    utility: &class[start..],
  }
}

/// Split on whitespace outside parentheses and brackets.
fn tokens(text: &str) -> Vec<&str> {
  let mut tokens = Vec::new();
  let mut depth = 0u32;
  let mut start: Option<usize> = None;

  for (index, ch) in text.char_indices() {
    match ch {
      '(' | '[' => depth += 1,
      ')' | ']' => depth = depth.saturating_sub(1),
      _ => {}
    }
    if ch.is_whitespace() && depth == 0 {
      if let Some(from) = start.take() {
        tokens.push(&text[from..index]);
      }
    } else if start.is_none() {
      start = Some(index);
    }
  }
  if let Some(from) = start {
    tokens.push(&text[from..]);
  }
  tokens
}

/// Expand variant groups: `hover:(bg-red-500 focus:(underline))` ->
/// `hover:bg-red-500 hover:focus:underline`.
pub fn expand_groups(declaration: &str, separator: &str) -> Vec<String> {
  let mut classes = Vec::new();
  for token in tokens(declaration) {
    let group = token
      .find('(')
      .filter(|open| token.ends_with(')') && *open < token.len() - 1)
      .filter(|open| {
        let prefix = &token[..*open];
        prefix.is_empty() || prefix.ends_with(separator)
      });

    match group {
      Some(open) => {
        let prefix = &token[..open];
        let inner = &token[open + 1..token.len() - 1];
        for class in expand_groups(inner, separator) {
          classes.push(format!("{prefix}{class}"));
        }
      }
      None => classes.push(token.to_string()),
    }
  }
  classes
}

/// Serialize directive text into a class string: groups expanded, duplicates dropped in
/// first-seen order, single-space separated.
pub fn serialize_classes<S: AsRef<str>>(declarations: &[S], separator: &str) -> String {
  let mut classes: IndexSet<String> = IndexSet::new();
  for declaration in declarations {
    classes.extend(expand_groups(declaration.as_ref(), separator));
  }
  classes.into_iter().collect::<Vec<_>>().join(" ")
}

/// Flatten several class lists (each entry may itself hold several classes or groups) into one
/// list of unique classes, in first-seen order.
pub fn compose_classes<'a, I>(lists: I, separator: &str) -> Vec<String>
where
  I: IntoIterator<Item = &'a [String]>,
{
  let mut classes: IndexSet<String> = IndexSet::new();
  for list in lists {
    for entry in list {
      classes.extend(expand_groups(entry, separator));
    }
  }
  classes.into_iter().collect()
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_parse_class() {
    assert_eq!(
      parse_class("md:hover:bg-red-500", ":"),
      ParsedClass {
        variants: vec!["md", "hover"],
        utility: "bg-red-500"
      }
    );
    assert_eq!(parse_class("p-4", ":").utility, "p-4");
    assert_eq!(
      parse_class("lg:bg-[url(a:b)]", ":"),
      ParsedClass {
        variants: vec!["lg"],
        utility: "bg-[url(a:b)]"
      }
    );
    assert_eq!(parse_class("sm__p-4", "__").variants, vec!["sm"]);
  }

  #[test]
  fn test_expand_groups() {
    assert_eq!(
      expand_groups("p-4 hover:(bg-red-500 focus:(underline)) m-2", ":"),
      vec!["p-4", "hover:bg-red-500", "hover:focus:underline", "m-2"]
    );
    assert_eq!(expand_groups("(a b)", ":"), vec!["a", "b"]);
  }

  #[test]
  fn test_serialize_classes_dedupes_in_order() {
    assert_eq!(
      serialize_classes(&["p-4 m-2", "  p-4\n text-red-500 "], ":"),
      "p-4 m-2 text-red-500"
    );
    assert_eq!(serialize_classes::<&str>(&[], ":"), "");
  }

  #[test]
  fn test_compose_classes_flattens_lists() {
    let a = vec!["p-4".to_string(), "hover:(m-2 p-4)".to_string()];
    let b = vec!["p-4".to_string(), "m-2".to_string()];
    assert_eq!(
      compose_classes([a.as_slice(), b.as_slice()], ":"),
      vec!["p-4", "hover:m-2", "hover:p-4", "m-2"]
    );
  }
}
