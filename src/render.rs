use std::cmp::Reverse;
use std::collections::BTreeMap;

pub const CONDA_ENV_DIR: &str = "@CONDA_ENV_DIR@";
pub const SCHROOT_NAME: &str = "@SCHROOT_NAME@";
pub const SCHROOT_OPTIONS: &str = "@SCHROOT_OPTIONS@";
pub const EXECUTABLE: &str = "@EXECUTABLE@";

/// Placeholder token -> literal replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: BTreeMap<&'static str, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: &'static str, value: impl Into<String>) -> &mut Self {
        if !token.is_empty() {
            self.values.insert(token, value.into());
        }
        self
    }

    pub fn with(mut self, token: &'static str, value: impl Into<String>) -> Self {
        self.insert(token, value);
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    fn next_match<'a>(&'a self, text: &str) -> Option<(usize, &'static str, &'a str)> {
        self.values
            .iter()
            .filter_map(|(token, value)| text.find(token).map(|pos| (pos, *token, value.as_str())))
            .min_by_key(|(pos, token, _)| (*pos, Reverse(token.len())))
    }
}

/// Literal token replacement in one left-to-right pass. Replaced values are
/// not rescanned and unknown tokens are copied through as-is.
pub fn render(template: &str, subs: &Substitutions) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((pos, token, value)) = subs.next_match(rest) {
        out.push_str(&rest[..pos]);
        out.push_str(value);
        rest = &rest[pos + token.len()..];
    }
    out.push_str(rest);
    out
}
