//! MODULE layer: import statements.

use depscan_core::errors::ExtractError;

use super::{ExtractContext, ExtractedDependency, LanguageExtractor};
use crate::grammar::Layer;

pub fn extract(
    ctx: &ExtractContext<'_>,
    extractor: LanguageExtractor,
    out: &mut Vec<ExtractedDependency>,
) -> Result<(), ExtractError> {
    let set = ctx.layer_patterns(Layer::Module)?;

    for pattern in set.iter() {
        for caps in pattern.regex.captures_iter(ctx.content) {
            let Some(group) = caps.get(1) else { continue };
            push_module(ctx, extractor, group.as_str(), group.start(), out);
        }
    }

    if extractor.has_import_blocks() {
        if let Some(block) = set.import_block() {
            for caps in block.captures_iter(ctx.content) {
                let Some(body) = caps.get(1) else { continue };
                let mut offset = body.start();
                for line in body.as_str().split_inclusive('\n') {
                    if let Some((rel, name)) = quoted_import(line) {
                        push_module(ctx, extractor, name, offset + rel, out);
                    }
                    offset += line.len();
                }
            }
        }
    }
    Ok(())
}

fn push_module(
    ctx: &ExtractContext<'_>,
    extractor: LanguageExtractor,
    raw: &str,
    offset: usize,
    out: &mut Vec<ExtractedDependency>,
) {
    let Some(name) = extractor.normalize_module(raw) else {
        return;
    };
    if ctx.grammar.skip_relative_imports && (name.starts_with('.') || name.starts_with('/')) {
        return;
    }
    if ctx.grammar.is_stdlib(&name) {
        return;
    }
    out.push(ctx.record(name, Layer::Module, offset, None));
}

/// Quoted path on one line of an import block, with its offset in the line.
/// Aliases, blank imports and comments are dropped.
fn quoted_import(line: &str) -> Option<(usize, &str)> {
    let code = match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    };
    let open = code.find('"')?;
    let rest = &code[open + 1..];
    let close = rest.find('"')?;
    Some((open + 1, &rest[..close]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_import_strips_alias_and_comments() {
        assert_eq!(quoted_import("\tlog \"github.com/x/log\"\n"), Some((6, "github.com/x/log")));
        assert_eq!(quoted_import("\t_ \"embed\" // side effects"), Some((4, "embed")));
        assert_eq!(quoted_import("\t// \"commented\""), None);
        assert_eq!(quoted_import("\n"), None);
    }
}
