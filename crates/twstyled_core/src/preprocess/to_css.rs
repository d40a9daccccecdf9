use swc_core::ecma::ast::*;

use super::Preprocessor;
use crate::ast::{jsx_attribute, jsx_attribute_name, tagged_template};
use crate::combine::{combine, ClassValue};

impl Preprocessor<'_> {
  /// Tag `tpl` with `css` and merge it into the element's `className`, creating the attribute
  /// as the first one when missing.
  pub(super) fn to_css(&mut self, element: &mut JSXElement, tpl: Tpl) {
    let css = self.imports.ensure("css", &mut self.uids);
    let left = ClassValue::Dynamic(Box::new(tagged_template(css, tpl)));

    let existing = element.opening.attrs.iter_mut().find_map(|attr| match attr {
      JSXAttrOrSpread::JSXAttr(attr) if jsx_attribute_name(attr) == Some("className") => {
        Some(attr)
      }
      _ => None,
    });

    match existing {
      Some(attr) => {
        let right = ClassValue::from_attribute(attr.value.take());
        attr.value = combine(left, right).into_attribute();
      }
      None => {
        let value = combine(left, ClassValue::Empty).into_attribute();
        element
          .opening
          .attrs
          .insert(0, jsx_attribute("className", value));
      }
    }
  }
}
