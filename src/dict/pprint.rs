//! Pretty printer. Cosmetic only.

use core::fmt;

use crate::dict::value::Value;
use crate::dict::HierDict;

fn truncated(text: String, max_len: Option<usize>) -> String {
    match max_len {
        Some(max) if text.chars().count() > max => {
            let mut out: String = text.chars().take(max).collect();
            out.push_str("...");
            out
        }
        _ => text,
    }
}

impl<T: fmt::Display> HierDict<T> {
    fn to_display_json(&self, max_len: Option<usize>) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (name, value) in self.iter() {
            let rendered = match value {
                Value::Node(d) => d.to_display_json(max_len),
                Value::Leaf(v) => {
                    serde_json::Value::String(truncated(v.to_string(), max_len))
                }
            };
            object.insert(name.clone(), rendered);
        }
        serde_json::Value::Object(object)
    }

    /// Render as an indented, key-sorted textual form with leaf string
    /// representations truncated to `str_max_len` characters (no
    /// truncation when `None`).
    pub fn pprint(&self, str_max_len: Option<usize>) -> String {
        serde_json::to_string_pretty(&self.to_display_json(str_max_len)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pprint_sorts_keys_and_indents() {
        let mut d = HierDict::new();
        d.set_leaf("b", 2).unwrap();
        d.set_leaf("a/z", 1).unwrap();

        let text = d.pprint(None);
        assert!(text.contains("\"a\""));
        assert!(text.contains("\"z\": \"1\""));
        // serde_json's default map is sorted, so "a" renders before "b".
        assert!(text.find("\"a\"").unwrap() < text.find("\"b\"").unwrap());
    }

    #[test]
    fn test_pprint_truncates_long_leaves() {
        let mut d = HierDict::new();
        d.set_leaf("s", "abcdefghij".to_string()).unwrap();

        let text = d.pprint(Some(4));
        assert!(text.contains("abcd..."));
        assert!(!text.contains("abcde"));
    }
}
