//! Node names

use serde_json::Value as Json;

/// Generates the `##<letters>` names of untyped, unnamed metadata nodes.
///
/// The counter starts at 777 and steps by 11, so the first names are `##bdx`, `##bei`, ...
/// Every assembly run starts its own generator.
#[derive(Debug, Clone)]
pub struct UniqueNames {
    next: u64,
}

impl Default for UniqueNames {
    fn default() -> Self {
        Self { next: 777 }
    }
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self) -> String {
        let mut n = self.next;
        let mut letters = Vec::new();
        while n >= 25 {
            letters.push(letter(n % 26));
            n /= 26;
        }
        letters.push(letter(n));
        self.next += 11;

        let name: String = letters.into_iter().rev().collect();
        format!("##{}", name)
    }
}

fn letter(n: u64) -> char {
    char::from(b'a' + n as u8)
}

/// A claim value read as a name.
///
/// Strings are taken as is, numbers and booleans are printed, lists join their parts with `.`.
/// Empty names, `null` and maps are no name at all.
pub fn name_of(value: &Json) -> Option<String> {
    let name = match value {
        Json::String(s) => s.clone(),
        Json::Number(n) => n.to_string(),
        Json::Bool(b) => b.to_string(),
        Json::Array(parts) => parts
            .iter()
            .filter_map(name_of)
            .collect::<Vec<_>>()
            .join("."),
        Json::Null | Json::Object(_) => return None,
    };
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// The first name of a value that may hold several.
pub fn first_name(value: &Json) -> Option<String> {
    match value {
        Json::Array(values) => values.first().and_then(name_of),
        value => name_of(value),
    }
}
