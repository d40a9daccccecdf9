use xxhash_rust::xxh3::xxh3_64;

/// Cache key for a source text or a joined class list.
pub fn content_hash(text: &str) -> String {
  format!("{:016x}", xxh3_64(text.as_bytes()))
}

const M: u32 = 0x5bd1e995;

/// 32-bit murmur2 of `key` rendered in base 36. Used for class-name slugs, which must stay short
/// and stable across runs.
pub fn slug_hash(key: &str) -> String {
  let bytes = key.as_bytes();
  let mut remaining = bytes.len();
  let mut h = remaining as u32;
  let mut chunks = bytes.chunks_exact(4);

  for chunk in chunks.by_ref() {
    let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    k = k.wrapping_mul(M);
    k ^= k >> 24;
    k = k.wrapping_mul(M);
    h = h.wrapping_mul(M) ^ k;
    remaining -= 4;
  }

  let tail = chunks.remainder();
  if remaining >= 3 {
    h ^= (tail[2] as u32) << 16;
  }
  if remaining >= 2 {
    h ^= (tail[1] as u32) << 8;
  }
  if remaining >= 1 {
    h ^= tail[0] as u32;
    h = h.wrapping_mul(M);
  }

  h ^= h >> 13;
  h = h.wrapping_mul(M);
  h ^= h >> 15;

  to_base36(h)
}

fn to_base36(mut value: u32) -> String {
  const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
  if value == 0 {
    return String::from("0");
  }

  let mut digits = Vec::new();
  while value > 0 {
    digits.push(DIGITS[(value % 36) as usize] as char);
    value /= 36;
  }
  digits.iter().rev().collect()
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_content_hash_is_stable() {
    assert_eq!(content_hash("a"), content_hash("a"));
    assert_ne!(content_hash("a"), content_hash("b"));
    assert_eq!(content_hash("").len(), 16);
  }

  #[test]
  fn test_slug_hash() {
    assert_eq!(slug_hash(""), "0");
    assert_eq!(slug_hash("src/Button.tsx:0"), slug_hash("src/Button.tsx:0"));
    assert_ne!(slug_hash("src/Button.tsx:0"), slug_hash("src/Button.tsx:1"));
    assert!(slug_hash("src/Button.tsx:0")
      .chars()
      .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
  }

  #[test]
  fn test_to_base36() {
    assert_eq!(to_base36(35), "z");
    assert_eq!(to_base36(36), "10");
    assert_eq!(to_base36(u32::MAX), "1z141z3");
  }
}
