//! Ordering for Russian display strings.

/// Sort key for names and labels: case-insensitive, with `ё` ranked as `е`.
///
/// Strings that differ only there order `е` before `ё`, then by case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: String,
    yo: Vec<bool>,
    exact: String,
}

impl CollationKey {
    #[must_use]
    pub fn new(s: &str) -> Self {
        let mut primary = String::with_capacity(s.len());
        let mut yo = Vec::new();
        for c in s.chars().flat_map(char::to_lowercase) {
            if c == 'ё' {
                primary.push('е');
                yo.push(true);
            } else {
                primary.push(c);
                yo.push(false);
            }
        }
        Self {
            primary,
            yo,
            exact: s.to_string(),
        }
    }
}

/// Compares two display strings by [`CollationKey`].
#[must_use]
pub fn collate(a: &str, b: &str) -> std::cmp::Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(words: &[&str]) -> Vec<String> {
        let mut out: Vec<String> = words.iter().map(|w| (*w).to_string()).collect();
        out.sort_by(|a, b| collate(a, b));
        out
    }

    #[test]
    fn yo_sorts_with_ye_not_after_ya() {
        assert_eq!(
            sorted(&["Яблоновка", "Ёлкино", "Жданово", "Есиповка"]),
            vec!["Ёлкино", "Есиповка", "Жданово", "Яблоновка"]
        );
    }

    #[test]
    fn ye_precedes_yo_on_tie() {
        assert_eq!(sorted(&["ёж", "еж"]), vec!["еж", "ёж"]);
    }

    #[test]
    fn case_is_ignored_before_tie_break() {
        assert_eq!(
            sorted(&["бор", "Астара", "Бор", "арка"]),
            vec!["арка", "Астара", "Бор", "бор"]
        );
    }
}
