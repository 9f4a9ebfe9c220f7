use std::collections::HashMap;

/// Column names keyed by their ASCII-uppercased form.
///
/// When two names collide case-insensitively the first one wins.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveSet {
    map: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            map.entry(name.to_ascii_uppercase())
                .or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    /// The original spelling of `name`, if present in any case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_keeps_first_spelling() {
        let set = CaseInsensitiveSet::new(["_bmi5", "_BMI5", "SEX"]);
        assert_eq!(set.get("_BMI5"), Some("_bmi5"));
        assert_eq!(set.get("sex"), Some("SEX"));
        assert_eq!(set.get("AGE"), None);
    }
}
