use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered `key -> css value` scale, e.g. spacing `4 -> 1rem`
pub type Scale = IndexMap<String, String>;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Color {
  Value(String),
  Shades(Scale),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
  pub screens: Scale,
  pub spacing: Scale,
  pub colors: IndexMap<String, Color>,
  pub font_size: Scale,
  pub font_weight: Scale,
  pub line_height: Scale,
  pub border_radius: Scale,
  pub border_width: Scale,
  pub opacity: Scale,
  pub z_index: Scale,
  pub box_shadow: Scale,
  pub extend: ThemeExtension,
}

/// Entries merged over the base theme instead of replacing it
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeExtension {
  pub screens: Scale,
  pub spacing: Scale,
  pub colors: IndexMap<String, Color>,
  pub font_size: Scale,
  pub font_weight: Scale,
  pub line_height: Scale,
  pub border_radius: Scale,
  pub border_width: Scale,
  pub opacity: Scale,
  pub z_index: Scale,
  pub box_shadow: Scale,
}

impl Theme {
  /// The theme with `extend` folded into its scales.
  pub fn resolved(&self) -> Theme {
    let mut theme = self.clone();
    let extend = std::mem::take(&mut theme.extend);

    theme.screens.extend(extend.screens);
    theme.spacing.extend(extend.spacing);
    theme.colors.extend(extend.colors);
    theme.font_size.extend(extend.font_size);
    theme.font_weight.extend(extend.font_weight);
    theme.line_height.extend(extend.line_height);
    theme.border_radius.extend(extend.border_radius);
    theme.border_width.extend(extend.border_width);
    theme.opacity.extend(extend.opacity);
    theme.z_index.extend(extend.z_index);
    theme.box_shadow.extend(extend.box_shadow);

    theme
  }

  /// Flattened `name -> value` colors: `red-500 -> #ef4444`, `white -> #fff`
  pub fn flat_colors(&self) -> Scale {
    let mut colors = Scale::new();
    for (name, color) in &self.colors {
      match color {
        Color::Value(value) => {
          colors.insert(name.clone(), value.clone());
        }
        Color::Shades(shades) => {
          for (shade, value) in shades {
            let key = if shade == "DEFAULT" {
              name.clone()
            } else {
              format!("{name}-{shade}")
            };
            colors.insert(key, value.clone());
          }
        }
      }
    }
    colors
  }
}

fn scale(entries: &[(&str, &str)]) -> Scale {
  entries
    .iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

fn shades(values: [&str; 10]) -> Color {
  const KEYS: [&str; 10] = [
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900",
  ];
  Color::Shades(
    KEYS
      .iter()
      .zip(values)
      .map(|(key, value)| (key.to_string(), value.to_string()))
      .collect(),
  )
}

impl Default for Theme {
  fn default() -> Self {
    let colors = [
      ("transparent", Color::Value("transparent".into())),
      ("current", Color::Value("currentColor".into())),
      ("black", Color::Value("#000".into())),
      ("white", Color::Value("#fff".into())),
      (
        "gray",
        shades([
          "#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151",
          "#1f2937", "#111827",
        ]),
      ),
      (
        "red",
        shades([
          "#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c",
          "#991b1b", "#7f1d1d",
        ]),
      ),
      (
        "yellow",
        shades([
          "#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309",
          "#92400e", "#78350f",
        ]),
      ),
      (
        "green",
        shades([
          "#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857",
          "#065f46", "#064e3b",
        ]),
      ),
      (
        "blue",
        shades([
          "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8",
          "#1e40af", "#1e3a8a",
        ]),
      ),
      (
        "indigo",
        shades([
          "#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca",
          "#3730a3", "#312e81",
        ]),
      ),
      (
        "purple",
        shades([
          "#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9",
          "#5b21b6", "#4c1d95",
        ]),
      ),
      (
        "pink",
        shades([
          "#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d",
          "#9d174d", "#831843",
        ]),
      ),
    ]
    .into_iter()
    .map(|(name, color)| (name.to_string(), color))
    .collect();

    Theme {
      screens: scale(&[
        ("sm", "640px"),
        ("md", "768px"),
        ("lg", "1024px"),
        ("xl", "1280px"),
        ("2xl", "1536px"),
      ]),
      spacing: scale(&[
        ("0", "0px"),
        ("px", "1px"),
        ("0.5", "0.125rem"),
        ("1", "0.25rem"),
        ("1.5", "0.375rem"),
        ("2", "0.5rem"),
        ("2.5", "0.625rem"),
        ("3", "0.75rem"),
        ("3.5", "0.875rem"),
        ("4", "1rem"),
        ("5", "1.25rem"),
        ("6", "1.5rem"),
        ("7", "1.75rem"),
        ("8", "2rem"),
        ("9", "2.25rem"),
        ("10", "2.5rem"),
        ("11", "2.75rem"),
        ("12", "3rem"),
        ("14", "3.5rem"),
        ("16", "4rem"),
        ("20", "5rem"),
        ("24", "6rem"),
        ("28", "7rem"),
        ("32", "8rem"),
        ("36", "9rem"),
        ("40", "10rem"),
        ("44", "11rem"),
        ("48", "12rem"),
        ("52", "13rem"),
        ("56", "14rem"),
        ("60", "15rem"),
        ("64", "16rem"),
        ("72", "18rem"),
        ("80", "20rem"),
        ("96", "24rem"),
      ]),
      colors,
      font_size: scale(&[
        ("xs", "0.75rem"),
        ("sm", "0.875rem"),
        ("base", "1rem"),
        ("lg", "1.125rem"),
        ("xl", "1.25rem"),
        ("2xl", "1.5rem"),
        ("3xl", "1.875rem"),
        ("4xl", "2.25rem"),
        ("5xl", "3rem"),
        ("6xl", "3.75rem"),
      ]),
      font_weight: scale(&[
        ("thin", "100"),
        ("extralight", "200"),
        ("light", "300"),
        ("normal", "400"),
        ("medium", "500"),
        ("semibold", "600"),
        ("bold", "700"),
        ("extrabold", "800"),
        ("black", "900"),
      ]),
      line_height: scale(&[
        ("none", "1"),
        ("tight", "1.25"),
        ("snug", "1.375"),
        ("normal", "1.5"),
        ("relaxed", "1.625"),
        ("loose", "2"),
      ]),
      border_radius: scale(&[
        ("none", "0px"),
        ("sm", "0.125rem"),
        ("DEFAULT", "0.25rem"),
        ("md", "0.375rem"),
        ("lg", "0.5rem"),
        ("xl", "0.75rem"),
        ("2xl", "1rem"),
        ("3xl", "1.5rem"),
        ("full", "9999px"),
      ]),
      border_width: scale(&[
        ("DEFAULT", "1px"),
        ("0", "0px"),
        ("2", "2px"),
        ("4", "4px"),
        ("8", "8px"),
      ]),
      opacity: scale(&[
        ("0", "0"),
        ("5", "0.05"),
        ("10", "0.1"),
        ("20", "0.2"),
        ("25", "0.25"),
        ("30", "0.3"),
        ("40", "0.4"),
        ("50", "0.5"),
        ("60", "0.6"),
        ("70", "0.7"),
        ("75", "0.75"),
        ("80", "0.8"),
        ("90", "0.9"),
        ("95", "0.95"),
        ("100", "1"),
      ]),
      z_index: scale(&[
        ("auto", "auto"),
        ("0", "0"),
        ("10", "10"),
        ("20", "20"),
        ("30", "30"),
        ("40", "40"),
        ("50", "50"),
      ]),
      box_shadow: scale(&[
        ("sm", "0 1px 2px 0 rgba(0, 0, 0, 0.05)"),
        (
          "DEFAULT",
          "0 1px 3px 0 rgba(0, 0, 0, 0.1), 0 1px 2px 0 rgba(0, 0, 0, 0.06)",
        ),
        (
          "md",
          "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -1px rgba(0, 0, 0, 0.06)",
        ),
        (
          "lg",
          "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -2px rgba(0, 0, 0, 0.05)",
        ),
        ("inner", "inset 0 2px 4px 0 rgba(0, 0, 0, 0.06)"),
        ("none", "none"),
      ]),
      extend: ThemeExtension::default(),
    }
  }
}
