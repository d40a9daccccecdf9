/// Escape a class name for use in a CSS selector: `md:p-0.5` -> `md\:p-0\.5`.
///
/// A leading digit is written as a hex escape, `2xl:p-4` -> `\32 xl\:p-4`.
pub fn escape_class_name(name: &str) -> String {
  let mut escaped = String::with_capacity(name.len() + 4);
  for (index, ch) in name.chars().enumerate() {
    if index == 0 && ch.is_ascii_digit() {
      escaped.push_str(&format!("\\{:x} ", ch as u32));
    } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
      escaped.push(ch);
    } else {
      escaped.push('\\');
      escaped.push(ch);
    }
  }
  escaped
}
