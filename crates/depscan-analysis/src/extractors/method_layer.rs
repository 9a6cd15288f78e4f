//! METHOD layer: function and method definitions with their outgoing calls.
//!
//! A definition-pattern match is only a candidate. Brace languages accept
//! it when a parameter list is followed by `{` before any `;` at paren
//! depth 0 (this rejects prototypes and call statements). Indented
//! languages accept it when the match starts with a definition keyword.
//! The body of each accepted definition is scanned with the call patterns.

use regex::Captures;

use depscan_core::errors::ExtractError;
use depscan_core::types::FxHashSet;

use super::{DependencyDetail, ExtractContext, ExtractedDependency};
use crate::grammar::{BodyStyle, Layer, LanguageGrammar};
use crate::patterns::CompiledPatterns;

/// Words a greedy `ret` capture can pick up that are not types.
const DECLARATION_MODIFIERS: &[&str] = &[
    "public", "private", "protected", "static", "final", "abstract", "synchronized", "native",
    "default", "virtual", "inline", "extern", "const",
];

pub fn extract(ctx: &ExtractContext<'_>, out: &mut Vec<ExtractedDependency>) -> Result<(), ExtractError> {
    let set = ctx.layer_patterns(Layer::Method)?;
    let grammar = ctx.grammar;
    let content = ctx.content;
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for regex in set.definitions() {
        for caps in regex.captures_iter(content) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
                continue;
            };
            if grammar.is_keyword(name.as_str()) || seen.contains(name.as_str()) {
                continue;
            }
            if ret_capture(&caps).is_some_and(|r| grammar.is_keyword(r)) {
                continue;
            }
            let Some(span) = definition_span(grammar, content, whole.start(), name.end()) else {
                continue;
            };
            seen.insert(name.as_str());

            let body = &content[span.body_start..span.body_end];
            let calls = scan_calls(set, grammar, body, name.as_str());
            let return_type = return_type(grammar, &caps, content, name.start(), &span);

            out.push(ctx.record(
                name.as_str().to_string(),
                Layer::Method,
                name.start(),
                Some(DependencyDetail::Method { return_type, calls }),
            ));
        }
    }
    Ok(())
}

/// Where an accepted definition's signature and body live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionSpan {
    /// Closing paren of the parameter list, if one was found.
    pub params_end: Option<usize>,
    /// End of the signature: the opening brace, the separator before an
    /// inline body, or the end of the def line.
    pub signature_end: usize,
    pub body_start: usize,
    pub body_end: usize,
}

/// Accept or reject a candidate and locate its body.
pub fn definition_span(
    grammar: &LanguageGrammar,
    content: &str,
    start: usize,
    name_end: usize,
) -> Option<DefinitionSpan> {
    match grammar.body_style {
        BodyStyle::Braces => braces_span(content, start, name_end),
        BodyStyle::Indented => indented_span(grammar, content, start, name_end),
    }
}

fn braces_span(content: &str, start: usize, name_end: usize) -> Option<DefinitionSpan> {
    let bytes = content.as_bytes();
    let mut depth: i32 = 0;
    let mut saw_params = false;
    let mut params_end = None;
    let mut open = None;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'(' => {
                depth += 1;
                saw_params = true;
            }
            b')' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
                if depth == 0 && params_end.is_none() && i > name_end {
                    params_end = Some(i);
                }
            }
            b'{' if depth == 0 => {
                if !saw_params {
                    return None;
                }
                open = Some(i);
                break;
            }
            b';' if depth == 0 => return None,
            _ => {}
        }
    }

    let open = open?;
    let close = matching_brace(bytes, open).unwrap_or(bytes.len());
    Some(DefinitionSpan {
        params_end,
        signature_end: open,
        body_start: open + 1,
        body_end: close,
    })
}

/// Offset of the `}` closing the block opened at `open`.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn indented_span(
    grammar: &LanguageGrammar,
    content: &str,
    start: usize,
    name_end: usize,
) -> Option<DefinitionSpan> {
    let line_start = content[..start].rfind('\n').map_or(0, |i| i + 1);
    let head = content[start..].trim_start_matches([' ', '\t']);
    if !starts_with_definition_keyword(grammar, head) {
        return None;
    }

    let indent = indentation(&content[line_start..]);
    let params_end = params_close(content, name_end);
    let from = params_end.unwrap_or(name_end);
    let line_end = content[from..].find('\n').map_or(content.len(), |i| from + i);
    let next_line = (line_end + 1).min(content.len());

    // `def f(x): return g(x)` and `def f; g; end` keep a body on the def line.
    let inline = inline_body(&content[from..line_end]).map(|sep| from + sep);
    let (signature_end, body_start, mut body_end) = match inline {
        Some(sep) => (sep, sep + 1, line_end),
        None => (line_end, next_line, next_line),
    };
    let mut cursor = next_line;
    for line in content[next_line..].split_inclusive('\n') {
        if !line.trim().is_empty() {
            if indentation(line) <= indent {
                break;
            }
            body_end = cursor + line.len();
        }
        cursor += line.len();
    }

    Some(DefinitionSpan {
        params_end,
        signature_end,
        body_start,
        body_end: body_end.max(body_start),
    })
}

/// Offset of the `:` or `;` ending a signature that has code after it.
fn inline_body(rest: &str) -> Option<usize> {
    let sep = rest.find([':', ';'])?;
    let tail = rest[sep + 1..].trim();
    (!tail.is_empty() && !tail.starts_with('#')).then_some(sep)
}

fn starts_with_definition_keyword(grammar: &LanguageGrammar, text: &str) -> bool {
    grammar.definition_keywords.iter().any(|kw| {
        text.strip_prefix(kw)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
    })
}

fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// Closing paren of a parameter list opening right after `from`.
fn params_close(content: &str, from: usize) -> Option<usize> {
    let rest = &content[from..];
    let open = rest.find('(')?;
    if !rest[..open].trim_matches([' ', '\t']).is_empty() {
        return None;
    }
    let mut depth = 0usize;
    for (i, b) in rest.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Call names in `body`, in order of first appearance, without keywords or
/// recursive self-calls.
pub fn scan_calls(set: &CompiledPatterns, grammar: &LanguageGrammar, body: &str, own_name: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = Vec::new();
    for regex in set.calls() {
        for caps in regex.captures_iter(body) {
            if let Some(m) = caps.name("name") {
                found.push((m.start(), m.as_str()));
            }
        }
    }
    found.sort_by_key(|(pos, _)| *pos);

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    found
        .into_iter()
        .filter(|(_, name)| *name != own_name && !grammar.is_keyword(name))
        .filter(|(_, name)| seen.insert(name))
        .map(|(_, name)| name.to_string())
        .collect()
}

fn ret_capture<'h>(caps: &Captures<'h>) -> Option<&'h str> {
    caps.name("ret").map(|m| m.as_str().trim()).filter(|r| !r.is_empty())
}

/// Return type from the `ret` group, the signature tail (`-> T`, `: T`,
/// Go-style trailing type), or a builtin type word before the name.
fn return_type(
    grammar: &LanguageGrammar,
    caps: &Captures<'_>,
    content: &str,
    name_start: usize,
    span: &DefinitionSpan,
) -> Option<String> {
    if let Some(ret) = ret_capture(caps) {
        if !DECLARATION_MODIFIERS.contains(&ret) {
            return Some(ret.to_string());
        }
    }

    if let Some(params_end) = span.params_end {
        if params_end < span.signature_end {
            if let Some(ret) = signature_tail_type(&content[params_end + 1..span.signature_end]) {
                return Some(ret);
            }
        }
    }

    let prefix_start = caps.get(0).map_or(name_start, |m| m.start());
    content[prefix_start..name_start]
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .find(|word| grammar.is_builtin_type(word))
        .map(str::to_string)
}

fn signature_tail_type(tail: &str) -> Option<String> {
    let tail = tail.trim();
    let ty = if let Some(idx) = tail.find("->") {
        &tail[idx + 2..]
    } else if let Some(rest) = tail.strip_prefix(':') {
        rest
    } else if tail.starts_with("throws") {
        return None;
    } else {
        tail
    };
    let ty = ty.split(" where").next().unwrap_or(ty);
    let ty = ty.split("=>").next().unwrap_or(ty);
    let ty = ty.trim().trim_end_matches(':').trim();
    (!ty.is_empty()).then(|| ty.to_string())
}
