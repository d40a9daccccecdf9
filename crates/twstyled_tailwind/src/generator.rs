use indexmap::IndexMap;

use crate::classes::parse_class;
use crate::escape::escape_class_name;
use crate::{Declarations, Engine};

const BASE: &str = "*,
::before,
::after {
  box-sizing: border-box;
  border-width: 0;
  border-style: solid;
  border-color: #e5e7eb;
}

html {
  line-height: 1.5;
  -webkit-text-size-adjust: 100%;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
}
";

enum VariantSelector {
  /// Appended to the class selector, `:hover`
  Pseudo(String),
  /// Ancestor selector, `.group:hover`
  Parent(&'static str),
}

fn variant_selector(variant: &str) -> VariantSelector {
  match variant {
    "group-hover" => VariantSelector::Parent(".group:hover"),
    "group-focus" => VariantSelector::Parent(".group:focus"),
    "dark" => VariantSelector::Parent(".dark"),
    "first" => VariantSelector::Pseudo(":first-child".into()),
    "last" => VariantSelector::Pseudo(":last-child".into()),
    "odd" => VariantSelector::Pseudo(":nth-child(odd)".into()),
    "even" => VariantSelector::Pseudo(":nth-child(even)".into()),
    other => VariantSelector::Pseudo(format!(":{other}")),
  }
}

struct GeneratedRule {
  /// Position of the strongest variant; rules with stronger variants come later
  rank: usize,
  css: String,
}

fn render_rule(selector: &str, declarations: &Declarations) -> String {
  let mut css = format!("{selector} {{\n");
  for (property, value) in declarations {
    css.push_str(&format!("  {property}: {value};\n"));
  }
  css.push_str("}\n");
  css
}

fn indent(css: &str) -> String {
  css
    .lines()
    .map(|line| {
      if line.is_empty() {
        String::from("\n")
      } else {
        format!("  {line}\n")
      }
    })
    .collect()
}

/// Render CSS for exactly `classes`, in their given order within each precedence group.
pub(crate) fn generate(engine: &Engine, classes: &[String], include_base: bool) -> String {
  let config = engine.config();
  let screens = &config.theme.screens;

  let mut groups: IndexMap<Option<&str>, Vec<GeneratedRule>> = IndexMap::new();
  groups.insert(None, Vec::new());
  for screen in screens.keys() {
    groups.insert(Some(screen.as_str()), Vec::new());
  }

  for class in classes {
    let parsed = parse_class(class, &config.separator);
    let Some(declarations) = engine.lookup(parsed.utility) else {
      tracing::debug!(class = %class, "Skipping unknown utility class");
      continue;
    };

    let mut screen: Option<&str> = None;
    let mut pseudo = String::new();
    let mut parents: Vec<&str> = Vec::new();
    let mut rank = 0;
    let mut supported = true;

    for variant in &parsed.variants {
      if let Some((name, _)) = screens.get_key_value(*variant) {
        if screen.is_some() {
          supported = false;
        }
        screen = Some(name.as_str());
      } else if let Some(position) = config.variants.iter().position(|v| v == variant) {
        rank = rank.max(position + 1);
        match variant_selector(variant) {
          VariantSelector::Pseudo(selector) => pseudo.push_str(&selector),
          VariantSelector::Parent(selector) => parents.push(selector),
        }
      } else {
        supported = false;
      }
    }

    if !supported {
      tracing::debug!(class = %class, "Skipping class with unsupported variants");
      continue;
    }

    let mut selector = String::new();
    for parent in parents {
      selector.push_str(parent);
      selector.push(' ');
    }
    selector.push('.');
    selector.push_str(&escape_class_name(class));
    selector.push_str(&pseudo);

    if let Some(rules) = groups.get_mut(&screen) {
      rules.push(GeneratedRule {
        rank,
        css: render_rule(&selector, declarations),
      });
    }
  }

  let mut output = String::new();
  if include_base {
    output.push_str(BASE);
  }

  for (screen, mut rules) in groups {
    if rules.is_empty() {
      continue;
    }
    rules.sort_by_key(|rule| rule.rank);
    let body: String = rules
      .iter()
      .map(|rule| rule.css.as_str())
      .collect::<Vec<_>>()
      .join("\n");

    if !output.is_empty() {
      output.push('\n');
    }
    match screen.and_then(|name| screens.get(name)) {
      Some(min_width) => {
        output.push_str(&format!("@media (min-width: {min_width}) {{\n"));
        output.push_str(&indent(&body));
        output.push_str("}\n");
      }
      None => output.push_str(&body),
    }
  }

  output
}
