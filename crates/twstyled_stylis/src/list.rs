//! Splitting of CSS value and selector lists.
//!
//! Quoted strings, escapes and parenthesised groups are kept intact.

/// Split on top-level commas, e.g. a selector list.
pub fn comma(string: &str) -> Vec<String> {
  split(string, &[','])
}

/// Split on top-level whitespace, e.g. a list of utility classes.
pub fn space(string: &str) -> Vec<String> {
  split(string, &[' ', '\n', '\t', '\r'])
}

/// Split `string` on any of `separators` outside quotes and parentheses. Items are trimmed and
/// empty items dropped.
pub fn split(string: &str, separators: &[char]) -> Vec<String> {
  let mut items: Vec<String> = Vec::new();
  let mut current = String::new();

  let mut paren_level = 0u32;
  let mut quote: Option<char> = None;
  let mut escape = false;

  for ch in string.chars() {
    if escape {
      escape = false;
    } else if ch == '\\' {
      escape = true;
    } else if let Some(open) = quote {
      if ch == open {
        quote = None;
      }
    } else if ch == '"' || ch == '\'' {
      quote = Some(ch);
    } else if ch == '(' {
      paren_level = paren_level.saturating_add(1);
    } else if ch == ')' {
      paren_level = paren_level.saturating_sub(1);
    } else if paren_level == 0 && separators.contains(&ch) {
      push_trimmed(&mut items, &current);
      current.clear();
      continue;
    }

    current.push(ch);
  }

  push_trimmed(&mut items, &current);
  items
}

fn push_trimmed(items: &mut Vec<String>, item: &str) {
  let item = item.trim();
  if !item.is_empty() {
    items.push(item.to_string());
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn space_trims_values() {
    assert_eq!(space(" a  b "), vec!["a", "b"]);
  }

  #[test]
  fn space_respects_functions() {
    assert_eq!(space("hover:(a b) c"), vec!["hover:(a b)", "c"]);
  }

  #[test]
  fn space_respects_quotes() {
    assert_eq!(space("\"a b\" c"), vec!["\"a b\"", "c"]);
  }

  #[test]
  fn comma_respects_functions() {
    assert_eq!(comma(".a:is(.b, .c), .d"), vec![".a:is(.b, .c)", ".d"]);
  }

  #[test]
  fn comma_keeps_escaped_commas() {
    assert_eq!(comma(".a\\,b, .c"), vec![".a\\,b", ".c"]);
  }
}
