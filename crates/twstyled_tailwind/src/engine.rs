use crate::attributes;
use crate::classes::{compose_classes, serialize_classes};
use crate::generator;
use crate::{Declarations, EngineError, TailwindConfig, UtilityDictionary};

/// A utility-class engine built from one resolved config.
#[derive(Debug)]
pub struct Engine {
  config: TailwindConfig,
  config_hash: String,
  dictionary: UtilityDictionary,
}

impl Engine {
  pub fn new(mut config: TailwindConfig) -> Result<Self, EngineError> {
    let config_hash = config.content_hash()?;
    config.theme = config.theme.resolved();
    let dictionary = UtilityDictionary::from_theme(&config.theme);

    tracing::debug!(
      config_hash = %config_hash,
      utilities = dictionary.len(),
      "Built utility dictionary"
    );

    Ok(Engine {
      config,
      config_hash,
      dictionary,
    })
  }

  pub fn config(&self) -> &TailwindConfig {
    &self.config
  }

  /// Content hash of the config this engine was built from
  pub fn config_hash(&self) -> &str {
    &self.config_hash
  }

  pub fn separator(&self) -> &str {
    &self.config.separator
  }

  pub fn dictionary(&self) -> &UtilityDictionary {
    &self.dictionary
  }

  /// Declarations for a utility name, honouring the configured prefix (`-tw-m-2`).
  pub fn lookup(&self, utility: &str) -> Option<&Declarations> {
    let prefix = &self.config.prefix;
    if prefix.is_empty() {
      return self.dictionary.get(utility);
    }

    match utility.strip_prefix('-') {
      Some(rest) => rest
        .strip_prefix(prefix.as_str())
        .and_then(|name| self.dictionary.get(&format!("-{name}"))),
      None => utility
        .strip_prefix(prefix.as_str())
        .and_then(|name| self.dictionary.get(name)),
    }
  }

  /// Resolve directive text into the class string applied to the element.
  pub fn serialize<S: AsRef<str>>(&self, declarations: &[S]) -> String {
    serialize_classes(declarations, self.separator())
  }

  /// Merge many class lists into one list of unique classes.
  pub fn compose<'a>(&self, lists: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    compose_classes(lists, self.separator())
  }

  /// Generate the stylesheet for exactly `classes`. Unknown classes produce no output.
  pub fn generate(&self, classes: &[String], include_base: bool) -> String {
    generator::generate(self, classes, include_base)
  }

  /// JSX attribute names usable as `<util>-` / `<util>$` shorthands
  pub fn attribute_names(&self) -> Vec<String> {
    attributes::attribute_names(&self.dictionary)
  }

  /// JSX attribute names usable as `<variant>--` shorthands
  pub fn variant_names(&self) -> Vec<String> {
    attributes::variant_names(&self.config)
  }
}
