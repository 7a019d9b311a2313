//! Dependency collection from declaration bodies.
//!
//! Collects names a body reaches through call syntax (`name(`), receiver field
//! access (`this.name` / `this->name`), construction (`new Type`), and, where
//! the language has one, scoped calls (`Type::member(`).

use std::collections::BTreeSet;

use regex::Regex;

use crate::analysis::ExtractError;

/// Language conventions for dependency collection.
#[derive(Debug, Clone, Copy)]
pub struct DependencyRules {
    /// `(receiver, operator)` pairs, e.g. `("this", ".")`.
    pub field_access: &'static [(&'static str, &'static str)],
    /// Collect `Type::member(` as a qualified dependency.
    pub scoped_calls: bool,
    /// Words never reported (keywords, primitive types, literals).
    pub ignored: &'static [&'static str],
}

/// Compiled dependency patterns for one language.
#[derive(Debug)]
pub struct DependencyCollector {
    call: Regex,
    construction: Regex,
    fields: Vec<Regex>,
    scoped: Option<Regex>,
    ignored: &'static [&'static str],
}

impl DependencyCollector {
    pub fn new(rules: &DependencyRules) -> Result<Self, ExtractError> {
        let fields = rules
            .field_access
            .iter()
            .map(|(receiver, op)| {
                Regex::new(&format!(
                    r"\b{}\s*{}\s*([A-Za-z_$][\w$]*)",
                    regex::escape(receiver),
                    regex::escape(op)
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let scoped = if rules.scoped_calls {
            Some(Regex::new(r"\b([A-Za-z_]\w*)\s*::\s*([A-Za-z_]\w*)\s*\(")?)
        } else {
            None
        };

        Ok(Self {
            call: Regex::new(r"([A-Za-z_$][\w$]*)\s*\(")?,
            construction: Regex::new(r"\bnew\s+([A-Za-z_$][\w$.:]*)")?,
            fields,
            scoped,
            ignored: rules.ignored,
        })
    }

    /// Collect dependencies referenced by masked `body` text.
    pub fn collect(&self, body: &str) -> BTreeSet<String> {
        let mut deps = BTreeSet::new();

        for caps in self.call.captures_iter(body) {
            self.insert(&mut deps, &caps[1]);
        }
        for field in &self.fields {
            for caps in field.captures_iter(body) {
                self.insert(&mut deps, &caps[1]);
            }
        }
        for caps in self.construction.captures_iter(body) {
            self.insert(&mut deps, caps[1].trim_end_matches(['.', ':']));
        }
        if let Some(scoped) = &self.scoped {
            for caps in scoped.captures_iter(body) {
                if !self.ignored.contains(&&caps[1]) {
                    deps.insert(format!("{}::{}", &caps[1], &caps[2]));
                }
            }
        }

        deps
    }

    fn insert(&self, deps: &mut BTreeSet<String>, name: &str) {
        if name.is_empty() || self.ignored.contains(&name) {
            return;
        }
        deps.insert(name.to_string());
    }
}
