//! JSX shorthand vocabulary derived from the utility dictionary.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{TailwindConfig, UtilityDictionary};

static COLOR_FAMILY: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^(divide|bg|from|via|to|border|placeholder|ring-offset|ring|text)-").unwrap()
});

/// Attribute name for a utility: everything before the last `-`, or before the second-to-last
/// `-` for color families (`bg-red-500` -> `bg`). A name without a usable stem stands alone.
fn attribute_stem(name: &str) -> &str {
  let Some(last) = name.rfind('-') else {
    return name;
  };

  let cut = if COLOR_FAMILY.is_match(name) {
    match name[..last].rfind('-') {
      Some(second) if second > 0 => second,
      _ => last,
    }
  } else {
    last
  };

  if cut == 0 {
    name
  } else {
    &name[..cut]
  }
}

/// Every utility name plus every stem, sorted. Negative utilities are excluded.
pub fn attribute_names(dictionary: &UtilityDictionary) -> Vec<String> {
  let mut names = BTreeSet::new();
  for name in dictionary.names().filter(|name| !name.starts_with('-')) {
    names.insert(name.to_string());
    names.insert(attribute_stem(name).to_string());
  }
  names.into_iter().collect()
}

/// Screens, then variants, then `tw` (the variant-less list attribute).
pub fn variant_names(config: &TailwindConfig) -> Vec<String> {
  config
    .theme
    .screens
    .keys()
    .chain(config.variants.iter())
    .cloned()
    .chain(std::iter::once(String::from("tw")))
    .collect()
}
