//! STRUCT layer: type declarations.

use regex::{Captures, Regex};

use depscan_core::errors::ExtractError;
use depscan_core::types::{FxHashSet, SmallVec4};

use super::{DependencyDetail, ExtractContext, ExtractedDependency};
use crate::grammar::Layer;

/// Keywords recognised as the declaring word of a structure match.
const DECLARATION_WORDS: &[&str] = &[
    "struct", "enum", "union", "class", "interface", "trait", "impl", "type", "module",
    "record",
];

pub fn extract(ctx: &ExtractContext<'_>, out: &mut Vec<ExtractedDependency>) -> Result<(), ExtractError> {
    let set = ctx.layer_patterns(Layer::Struct)?;
    let mut seen: FxHashSet<(String, String, Option<String>)> = FxHashSet::default();

    for pattern in set.iter() {
        let positional = positional_groups(&pattern.regex);
        for caps in pattern.regex.captures_iter(ctx.content) {
            let Some(name) = declared_name(&caps, &positional) else {
                continue;
            };
            let Some(whole) = caps.get(0) else { continue };
            let declaration = declaration_word(whole.as_str());
            let base = caps.name("base").map(|m| m.as_str().to_string());

            let key = (name.as_str().to_string(), declaration.to_string(), base.clone());
            if !seen.insert(key) {
                continue;
            }
            out.push(ctx.record(
                name.as_str().to_string(),
                Layer::Struct,
                name.start(),
                Some(DependencyDetail::Struct {
                    declaration: declaration.to_string(),
                    base,
                }),
            ));
        }
    }
    Ok(())
}

/// Indices of unnamed capture groups.
fn positional_groups(regex: &Regex) -> SmallVec4<usize> {
    regex
        .capture_names()
        .enumerate()
        .skip(1)
        .filter(|(_, name)| name.is_none())
        .map(|(i, _)| i)
        .collect()
}

/// Last positional group that matched non-empty.
fn declared_name<'h>(caps: &Captures<'h>, positional: &[usize]) -> Option<regex::Match<'h>> {
    positional
        .iter()
        .rev()
        .filter_map(|&i| caps.get(i))
        .find(|m| !m.as_str().is_empty())
}

fn declaration_word(text: &str) -> &'static str {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .find_map(|word| DECLARATION_WORDS.iter().find(|kw| **kw == word).copied())
        .unwrap_or("struct")
}
