//! Directive tree produced by the parser.
//!
//! A parse yields an ordered forest of [`Directive`] nodes. Every node owns
//! its children outright, so the tree is free of shared or back references
//! and can be moved, cloned, and serialized without bookkeeping.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// A named configuration entry: `name arg1 "arg 2" { ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// First token of the directive line.
    pub name: String,

    /// Positional arguments, in source order. May be empty.
    pub arguments: Vec<Argument>,

    /// Nested directives from a trailing `{ ... }` block. Non-empty only
    /// when the source carried such a block.
    pub subdirectives: Directives,
}

/// A single positional argument. The value is opaque to the parser; quoted
/// and unquoted arguments are indistinguishable once parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Argument(pub String);

impl Deref for Argument {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Argument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<&str> for Argument {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered sequence of directives: either the top-level parse result or
/// the children of one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directives(pub Vec<Directive>);

impl Deref for Directives {
    type Target = [Directive];

    fn deref(&self) -> &[Directive] {
        &self.0
    }
}

impl IntoIterator for Directives {
    type Item = Directive;
    type IntoIter = std::vec::IntoIter<Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Directives {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Directives {
    /// Resolves `path` one level at a time, taking the first directive whose
    /// name equals the current segment and descending into its subdirectives
    /// for the next one. Returns `None` for an empty path or a dead end.
    pub fn first_match(&self, path: &[&str]) -> Option<&Directive> {
        let (segment, rest) = path.split_first()?;
        let found = self.0.iter().find(|d| d.name == *segment)?;
        if rest.is_empty() {
            Some(found)
        } else {
            found.subdirectives.first_match(rest)
        }
    }

    /// Collects every directive matching the last segment of `path`.
    ///
    /// The walk starts once per directive at this level whose name equals
    /// the first segment. Intermediate segments resolve like
    /// [`first_match`](Self::first_match); at the final level all matching
    /// directives are collected, in source order, unioned across the
    /// starting points. An empty path yields an empty result.
    pub fn all_matches(&self, path: &[&str]) -> Vec<&Directive> {
        let mut matches = Vec::new();
        let Some((first, rest)) = path.split_first() else {
            return matches;
        };

        for top in self.0.iter().filter(|d| d.name == *first) {
            let Some((last, intermediate)) = rest.split_last() else {
                matches.push(top);
                continue;
            };

            let mut level = &top.subdirectives;
            let mut resolved = true;
            for segment in intermediate {
                match level.0.iter().find(|d| d.name == *segment) {
                    Some(next) => level = &next.subdirectives,
                    None => {
                        resolved = false;
                        break;
                    }
                }
            }

            if resolved {
                matches.extend(level.0.iter().filter(|d| d.name == *last));
            }
        }

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, args: &[&str]) -> Directive {
        Directive {
            name: name.to_string(),
            arguments: args.iter().map(|a| Argument::from(*a)).collect(),
            subdirectives: Directives::default(),
        }
    }

    fn block(name: &str, children: Vec<Directive>) -> Directive {
        Directive {
            name: name.to_string(),
            arguments: Vec::new(),
            subdirectives: Directives(children),
        }
    }

    fn sample() -> Directives {
        Directives(vec![
            block("node", vec![leaf("role", &["one"]), leaf("role", &["two"])]),
            block("node", vec![leaf("role", &["three"])]),
            leaf("stray", &[]),
        ])
    }

    #[test]
    fn first_match_takes_first_at_each_level() {
        let dirs = sample();
        let role = dirs.first_match(&["node", "role"]).unwrap();
        assert_eq!(role.arguments[0], "one");
    }

    #[test]
    fn first_match_misses() {
        let dirs = sample();
        assert!(dirs.first_match(&[]).is_none());
        assert!(dirs.first_match(&["missing"]).is_none());
        assert!(dirs.first_match(&["node", "missing"]).is_none());
    }

    #[test]
    fn all_matches_unions_across_top_level_occurrences() {
        let dirs = sample();
        let roles = dirs.all_matches(&["node", "role"]);
        let values: Vec<&str> = roles.iter().map(|d| &*d.arguments[0]).collect();
        assert_eq!(values, ["one", "two", "three"]);
    }

    #[test]
    fn all_matches_single_segment_returns_every_occurrence() {
        let dirs = sample();
        assert_eq!(dirs.all_matches(&["node"]).len(), 2);
        assert!(dirs.all_matches(&[]).is_empty());
    }
}
