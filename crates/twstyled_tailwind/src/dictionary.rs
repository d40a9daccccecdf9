use indexmap::IndexMap;

use crate::theme::{Scale, Theme};

/// `(property, value)` pairs a utility expands to
pub type Declarations = Vec<(String, String)>;

/// Every utility class the theme defines, mapped to its declarations.
#[derive(Clone, Debug, Default)]
pub struct UtilityDictionary {
  utilities: IndexMap<String, Declarations>,
}

const SPACING_FAMILIES: &[(&str, &[&str])] = &[
  ("p", &["padding"]),
  ("px", &["padding-left", "padding-right"]),
  ("py", &["padding-top", "padding-bottom"]),
  ("pt", &["padding-top"]),
  ("pr", &["padding-right"]),
  ("pb", &["padding-bottom"]),
  ("pl", &["padding-left"]),
  ("gap", &["gap"]),
  ("gap-x", &["column-gap"]),
  ("gap-y", &["row-gap"]),
  ("w", &["width"]),
  ("h", &["height"]),
];

/// Spacing families that also get negative (`-m-2`) and `auto` variants
const OFFSET_FAMILIES: &[(&str, &[&str])] = &[
  ("m", &["margin"]),
  ("mx", &["margin-left", "margin-right"]),
  ("my", &["margin-top", "margin-bottom"]),
  ("mt", &["margin-top"]),
  ("mr", &["margin-right"]),
  ("mb", &["margin-bottom"]),
  ("ml", &["margin-left"]),
  ("inset", &["top", "right", "bottom", "left"]),
  ("top", &["top"]),
  ("right", &["right"]),
  ("bottom", &["bottom"]),
  ("left", &["left"]),
];

const STATIC_UTILITIES: &[(&str, &[(&str, &str)])] = &[
  ("block", &[("display", "block")]),
  ("inline-block", &[("display", "inline-block")]),
  ("inline", &[("display", "inline")]),
  ("flex", &[("display", "flex")]),
  ("inline-flex", &[("display", "inline-flex")]),
  ("grid", &[("display", "grid")]),
  ("inline-grid", &[("display", "inline-grid")]),
  ("contents", &[("display", "contents")]),
  ("hidden", &[("display", "none")]),
  ("static", &[("position", "static")]),
  ("fixed", &[("position", "fixed")]),
  ("absolute", &[("position", "absolute")]),
  ("relative", &[("position", "relative")]),
  ("sticky", &[("position", "sticky")]),
  ("flex-row", &[("flex-direction", "row")]),
  ("flex-row-reverse", &[("flex-direction", "row-reverse")]),
  ("flex-col", &[("flex-direction", "column")]),
  ("flex-col-reverse", &[("flex-direction", "column-reverse")]),
  ("flex-wrap", &[("flex-wrap", "wrap")]),
  ("flex-nowrap", &[("flex-wrap", "nowrap")]),
  ("flex-1", &[("flex", "1 1 0%")]),
  ("flex-auto", &[("flex", "1 1 auto")]),
  ("flex-initial", &[("flex", "0 1 auto")]),
  ("flex-none", &[("flex", "none")]),
  ("flex-grow", &[("flex-grow", "1")]),
  ("flex-grow-0", &[("flex-grow", "0")]),
  ("flex-shrink", &[("flex-shrink", "1")]),
  ("flex-shrink-0", &[("flex-shrink", "0")]),
  ("items-start", &[("align-items", "flex-start")]),
  ("items-end", &[("align-items", "flex-end")]),
  ("items-center", &[("align-items", "center")]),
  ("items-baseline", &[("align-items", "baseline")]),
  ("items-stretch", &[("align-items", "stretch")]),
  ("justify-start", &[("justify-content", "flex-start")]),
  ("justify-end", &[("justify-content", "flex-end")]),
  ("justify-center", &[("justify-content", "center")]),
  ("justify-between", &[("justify-content", "space-between")]),
  ("justify-around", &[("justify-content", "space-around")]),
  ("justify-evenly", &[("justify-content", "space-evenly")]),
  ("text-left", &[("text-align", "left")]),
  ("text-center", &[("text-align", "center")]),
  ("text-right", &[("text-align", "right")]),
  ("text-justify", &[("text-align", "justify")]),
  ("italic", &[("font-style", "italic")]),
  ("not-italic", &[("font-style", "normal")]),
  ("uppercase", &[("text-transform", "uppercase")]),
  ("lowercase", &[("text-transform", "lowercase")]),
  ("capitalize", &[("text-transform", "capitalize")]),
  ("normal-case", &[("text-transform", "none")]),
  ("underline", &[("text-decoration", "underline")]),
  ("line-through", &[("text-decoration", "line-through")]),
  ("no-underline", &[("text-decoration", "none")]),
  ("overflow-auto", &[("overflow", "auto")]),
  ("overflow-hidden", &[("overflow", "hidden")]),
  ("overflow-visible", &[("overflow", "visible")]),
  ("overflow-scroll", &[("overflow", "scroll")]),
  ("cursor-auto", &[("cursor", "auto")]),
  ("cursor-default", &[("cursor", "default")]),
  ("cursor-pointer", &[("cursor", "pointer")]),
  ("cursor-not-allowed", &[("cursor", "not-allowed")]),
  ("pointer-events-none", &[("pointer-events", "none")]),
  ("pointer-events-auto", &[("pointer-events", "auto")]),
  ("select-none", &[("user-select", "none")]),
  ("select-all", &[("user-select", "all")]),
  ("whitespace-normal", &[("white-space", "normal")]),
  ("whitespace-nowrap", &[("white-space", "nowrap")]),
  ("whitespace-pre", &[("white-space", "pre")]),
  (
    "truncate",
    &[
      ("overflow", "hidden"),
      ("text-overflow", "ellipsis"),
      ("white-space", "nowrap"),
    ],
  ),
  ("border-solid", &[("border-style", "solid")]),
  ("border-dashed", &[("border-style", "dashed")]),
  ("border-dotted", &[("border-style", "dotted")]),
  ("border-none", &[("border-style", "none")]),
  (
    "outline-none",
    &[("outline", "2px solid transparent"), ("outline-offset", "2px")],
  ),
  (
    "transition",
    &[
      (
        "transition-property",
        "background-color, border-color, color, fill, stroke, opacity, box-shadow, transform",
      ),
      ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
      ("transition-duration", "150ms"),
    ],
  ),
  ("w-auto", &[("width", "auto")]),
  ("w-full", &[("width", "100%")]),
  ("w-screen", &[("width", "100vw")]),
  ("w-1/2", &[("width", "50%")]),
  ("w-1/3", &[("width", "33.333333%")]),
  ("w-2/3", &[("width", "66.666667%")]),
  ("w-1/4", &[("width", "25%")]),
  ("w-3/4", &[("width", "75%")]),
  ("h-auto", &[("height", "auto")]),
  ("h-full", &[("height", "100%")]),
  ("h-screen", &[("height", "100vh")]),
  ("min-w-0", &[("min-width", "0px")]),
  ("min-w-full", &[("min-width", "100%")]),
  ("min-h-0", &[("min-height", "0px")]),
  ("min-h-full", &[("min-height", "100%")]),
  ("min-h-screen", &[("min-height", "100vh")]),
];

fn negate(value: &str) -> Option<String> {
  match value {
    "0" | "0px" => Some(value.to_string()),
    _ if value.starts_with(|ch: char| ch.is_ascii_digit() || ch == '.') => {
      Some(format!("-{value}"))
    }
    _ => None,
  }
}

/// `rounded` + `DEFAULT` -> `rounded`, `rounded` + `lg` -> `rounded-lg`
fn scale_name(family: &str, key: &str) -> String {
  if key == "DEFAULT" {
    family.to_string()
  } else {
    format!("{family}-{key}")
  }
}

impl UtilityDictionary {
  pub fn from_theme(theme: &Theme) -> Self {
    let mut dictionary = UtilityDictionary::default();

    for (family, properties) in SPACING_FAMILIES {
      dictionary.insert_scale(family, properties, &theme.spacing);
    }

    for (family, properties) in OFFSET_FAMILIES {
      dictionary.insert_scale(family, properties, &theme.spacing);
      dictionary.insert_value(&format!("{family}-auto"), properties, "auto");
      for (key, value) in &theme.spacing {
        if let Some(negative) = negate(value) {
          dictionary.insert_value(&format!("-{family}-{key}"), properties, &negative);
        }
      }
    }

    let colors = theme.flat_colors();
    dictionary.insert_scale("text", &["color"], &colors);
    dictionary.insert_scale("bg", &["background-color"], &colors);
    dictionary.insert_scale("border", &["border-color"], &colors);

    dictionary.insert_scale("text", &["font-size"], &theme.font_size);
    dictionary.insert_scale("font", &["font-weight"], &theme.font_weight);
    dictionary.insert_scale("leading", &["line-height"], &theme.line_height);
    dictionary.insert_scale("rounded", &["border-radius"], &theme.border_radius);
    dictionary.insert_scale("border", &["border-width"], &theme.border_width);
    dictionary.insert_scale("opacity", &["opacity"], &theme.opacity);
    dictionary.insert_scale("z", &["z-index"], &theme.z_index);
    dictionary.insert_scale("shadow", &["box-shadow"], &theme.box_shadow);

    for columns in 1..=12 {
      dictionary.insert_value(
        &format!("grid-cols-{columns}"),
        &["grid-template-columns"],
        &format!("repeat({columns}, minmax(0, 1fr))"),
      );
      dictionary.insert_value(
        &format!("col-span-{columns}"),
        &["grid-column"],
        &format!("span {columns} / span {columns}"),
      );
    }

    for (name, declarations) in STATIC_UTILITIES {
      dictionary.utilities.insert(
        name.to_string(),
        declarations
          .iter()
          .map(|(property, value)| (property.to_string(), value.to_string()))
          .collect(),
      );
    }

    dictionary
  }

  fn insert_scale(&mut self, family: &str, properties: &[&str], scale: &Scale) {
    for (key, value) in scale {
      self.insert_value(&scale_name(family, key), properties, value);
    }
  }

  fn insert_value(&mut self, name: &str, properties: &[&str], value: &str) {
    self.utilities.insert(
      name.to_string(),
      properties
        .iter()
        .map(|property| (property.to_string(), value.to_string()))
        .collect(),
    );
  }

  pub fn get(&self, name: &str) -> Option<&Declarations> {
    self.utilities.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.utilities.contains_key(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.utilities.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.utilities.len()
  }

  pub fn is_empty(&self) -> bool {
    self.utilities.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn declarations(dictionary: &UtilityDictionary, name: &str) -> Vec<(String, String)> {
    dictionary.get(name).cloned().unwrap_or_default()
  }

  fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
      .iter()
      .map(|(a, b)| (a.to_string(), b.to_string()))
      .collect()
  }

  #[test]
  fn test_spacing_utilities() {
    let dictionary = UtilityDictionary::from_theme(&Theme::default());
    assert_eq!(
      declarations(&dictionary, "p-4"),
      pairs(&[("padding", "1rem")])
    );
    assert_eq!(
      declarations(&dictionary, "px-0.5"),
      pairs(&[("padding-left", "0.125rem"), ("padding-right", "0.125rem")])
    );
    assert_eq!(
      declarations(&dictionary, "-mt-2"),
      pairs(&[("margin-top", "-0.5rem")])
    );
    assert_eq!(
      declarations(&dictionary, "mx-auto"),
      pairs(&[("margin-left", "auto"), ("margin-right", "auto")])
    );
    assert!(!dictionary.contains("-p-4"));
  }

  #[test]
  fn test_color_and_scale_utilities_share_prefixes() {
    let dictionary = UtilityDictionary::from_theme(&Theme::default());
    assert_eq!(
      declarations(&dictionary, "text-red-500"),
      pairs(&[("color", "#ef4444")])
    );
    assert_eq!(
      declarations(&dictionary, "text-lg"),
      pairs(&[("font-size", "1.125rem")])
    );
    assert_eq!(
      declarations(&dictionary, "border"),
      pairs(&[("border-width", "1px")])
    );
    assert_eq!(
      declarations(&dictionary, "rounded"),
      pairs(&[("border-radius", "0.25rem")])
    );
  }

  #[test]
  fn test_static_utilities() {
    let dictionary = UtilityDictionary::from_theme(&Theme::default());
    assert_eq!(
      declarations(&dictionary, "hidden"),
      pairs(&[("display", "none")])
    );
    assert_eq!(declarations(&dictionary, "truncate").len(), 3);
    assert!(dictionary.contains("grid-cols-12"));
  }
}
