//! `$NAME` variable resolution over flattened configs
//!
//! Every keyed entry of a config is a potential variable declaration. A call
//! `$NAME` (case-insensitive) is replaced by the value of the nearest
//! declaration before the calling entry, or failing that the nearest one
//! after it. Host environment variables behave as declarations placed in
//! front of the package's own entries.
//!
//! Resolution is a fixed-point loop: calls introduced by substituted text
//! are followed transitively, and a call that leads back to a variable
//! already being substituted is a circular reference which stops
//! resolution for the whole config.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::flatten::{FlattenedConfig, FlattenedEntry, Scalar, Segment};

static VARIABLE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z0-9_]+)").unwrap());

/// Upper bound on fixed-point passes. Substitutions can only create new
/// calls by completing a `$` left over from earlier text, so real configs
/// settle in a handful of passes.
const MAX_PASSES: usize = 64;

/// A circular reference stopped resolution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Circular reference detected for variable: '{variable}'")]
pub struct ResolutionFailure {
    /// Lower-cased name of the variable that closed the cycle
    pub variable: String,

    /// The config as far as it was resolved before the cycle was found
    pub partial: FlattenedConfig,
}

/// Resolve every variable call in `config` using only its own declarations.
pub fn resolve(config: &FlattenedConfig) -> Result<FlattenedConfig, ResolutionFailure> {
    Resolver::new(config.entries().to_vec(), 0).run()
}

/// Resolve `config` with host environment variables declared in front of
/// the package's own entries. The environment entries are not part of the
/// result.
///
/// Environment values are only resolved where the package calls them, so a
/// host variable that refers to itself fails a package only when the
/// package uses it.
pub fn resolve_with_env(
    config: &FlattenedConfig,
    env: &BTreeMap<String, String>,
) -> Result<FlattenedConfig, ResolutionFailure> {
    let env_len = env.len();
    let mut entries: Vec<FlattenedEntry> = env
        .iter()
        .map(|(name, value)| FlattenedEntry::new(vec![Segment::Key(name.clone())], value.as_str()))
        .collect();
    entries.extend(config.entries().iter().cloned());

    let strip = |resolved: FlattenedConfig| {
        FlattenedConfig::new(resolved.into_entries().into_iter().skip(env_len).collect())
    };

    match Resolver::new(entries, env_len).run() {
        Ok(resolved) => Ok(strip(resolved)),
        Err(failure) => Err(ResolutionFailure {
            variable: failure.variable,
            partial: strip(failure.partial),
        }),
    }
}

/// Lower-cased names of every `$NAME` call in `text`, in order of appearance.
pub fn variable_calls(text: &str) -> Vec<String> {
    VARIABLE_CALL
        .captures_iter(text)
        .map(|caps| caps[1].to_ascii_lowercase())
        .collect()
}

/// Replace every `$NAME` call of `name` (case-insensitively) in `text`.
///
/// A call only matches when the name is not followed by another identifier
/// character, so `$BASE` does not match inside `$BASE_DIR`.
pub fn substitute(text: &str, name: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let matches = after
            .get(..name.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            && !after[name.len()..]
                .chars()
                .next()
                .is_some_and(is_identifier_char);

        if matches {
            out.push_str(replacement);
            rest = &after[name.len()..];
        } else {
            out.push('$');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Resolver {
    entries: Vec<FlattenedEntry>,
    /// Entries before this index only declare and are never scanned for calls
    first_caller: usize,
    /// Lower-cased key to ascending indexes of the entries declaring it
    declarations: HashMap<String, Vec<usize>>,
}

impl Resolver {
    fn new(mut entries: Vec<FlattenedEntry>, first_caller: usize) -> Self {
        for entry in &mut entries {
            if let Scalar::String(text) = &mut entry.value
                && text.contains('\\')
            {
                *text = text.replace('\\', "/");
            }
        }

        // Keys never change during resolution, so the index is built once
        let mut declarations: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            if let Some(key) = entry.key() {
                declarations
                    .entry(key.to_ascii_lowercase())
                    .or_default()
                    .push(index);
            }
        }

        Self {
            entries,
            first_caller,
            declarations,
        }
    }

    fn run(mut self) -> Result<FlattenedConfig, ResolutionFailure> {
        for pass in 0..MAX_PASSES {
            let calls = self.call_sites();
            if calls.is_empty() {
                return Ok(FlattenedConfig::new(self.entries));
            }
            tracing::debug!(pass, calls = calls.len(), "Resolving variable calls");

            for (index, name) in calls {
                if let Err(variable) = self.resolve_call(index, &name, &HashSet::new()) {
                    tracing::debug!(%variable, entry = index, "Circular variable reference");
                    return Err(self.fail(variable));
                }
            }
        }

        let variable = self
            .call_sites()
            .into_iter()
            .next()
            .map(|(_, name)| name)
            .unwrap_or_default();
        Err(self.fail(variable))
    }

    fn fail(self, variable: String) -> ResolutionFailure {
        ResolutionFailure {
            variable,
            partial: FlattenedConfig::new(self.entries),
        }
    }

    /// Calls to declared names, once per entry and name.
    fn call_sites(&self) -> Vec<(usize, String)> {
        let mut calls = Vec::new();
        for (index, entry) in self.entries.iter().enumerate().skip(self.first_caller) {
            let Some(text) = entry.value.as_str() else {
                continue;
            };
            for name in self.declared_calls(text) {
                calls.push((index, name));
            }
        }
        calls
    }

    fn declared_calls(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        variable_calls(text)
            .into_iter()
            .filter(|name| self.declarations.contains_key(name))
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    /// Nearest declaration before `call`, else nearest after, else `call`
    /// itself when it is the only entry declaring `name`.
    fn declaration_for(&self, name: &str, call: usize) -> usize {
        let Some(indexes) = self.declarations.get(name) else {
            return call;
        };
        indexes
            .iter()
            .rev()
            .find(|&&i| i < call)
            .or_else(|| indexes.iter().find(|&&i| i > call))
            .copied()
            .unwrap_or(call)
    }

    /// Substitute `name` in entry `index`, then follow the calls the
    /// substituted text brought in. Returns the cycle-closing name on failure.
    fn resolve_call(
        &mut self,
        index: usize,
        name: &str,
        visited: &HashSet<String>,
    ) -> Result<(), String> {
        let declaration = self.declaration_for(name, index);
        let replacement = self.entries[declaration].value.render();

        let Some(text) = self.entries[index].value.as_str() else {
            return Ok(());
        };
        let substituted = substitute(text, name, &replacement);
        self.entries[index].value = Scalar::String(substituted);

        let mut visited = visited.clone();
        visited.insert(name.to_string());

        for call in self.declared_calls(&replacement) {
            if visited.contains(&call) {
                return Err(call);
            }
            self.resolve_call(index, &call, &visited)?;
        }
        Ok(())
    }
}
