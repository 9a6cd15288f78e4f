//! Plain-text report grouped by source file.

use std::io::{self, Write};
use std::path::Path;

use depscan_analysis::crawler::{CrawlStats, DependencyGraph};
use depscan_analysis::extractors::{DependencyDetail, ExtractedDependency};

use super::RenderOptions;

const RULE: &str = "================================";

pub(super) fn write(graph: &DependencyGraph, options: &RenderOptions, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Dependency Analysis Results")?;
    writeln!(out, "{RULE}")?;

    let mut current: Option<&Path> = None;
    let mut shown = 0usize;
    for dep in options.filter.dependencies(graph) {
        if current != Some(dep.source.as_path()) {
            writeln!(out)?;
            writeln!(out, "{}", dep.source.display())?;
            current = Some(dep.source.as_path());
        }
        write_dependency(dep, out)?;
        shown += 1;
    }
    if shown == 0 {
        writeln!(out)?;
        writeln!(out, "No dependencies found.")?;
    }

    let cycles: Vec<&Vec<String>> = graph
        .cycles
        .iter()
        .filter(|cycle| {
            graph
                .methods
                .iter()
                .filter(|m| cycle.contains(&m.name))
                .any(|m| options.filter.accepts_method(m))
        })
        .collect();
    if !cycles.is_empty() {
        writeln!(out)?;
        writeln!(out, "Call cycles")?;
        for cycle in cycles {
            writeln!(out, "  {}", cycle.join(" -> "))?;
        }
    }

    if !graph.changes.is_empty() {
        writeln!(out)?;
        writeln!(out, "Changes since last run")?;
        for change in &graph.changes {
            writeln!(out, "  {}", change.path.display())?;
            for added in &change.added {
                writeln!(out, "    + {added}")?;
            }
            for removed in &change.removed {
                writeln!(out, "    - {removed}")?;
            }
        }
    }

    if !graph.failures.is_empty() {
        writeln!(out)?;
        writeln!(out, "Failed files ({})", graph.failures.len())?;
        for failure in &graph.failures {
            writeln!(out, "  {} [{}] {}", failure.path.display(), failure.code, failure.message)?;
        }
    }

    if options.stats {
        write_stats(&graph.stats, out)?;
    }
    Ok(())
}

fn write_dependency(dep: &ExtractedDependency, out: &mut dyn Write) -> io::Result<()> {
    match &dep.detail {
        Some(DependencyDetail::Struct { declaration, base }) => {
            write!(out, "  [{}] {} {}", dep.layer, declaration, dep.target)?;
            if let Some(base) = base {
                write!(out, " : {base}")?;
            }
            writeln!(out, " (line {})", dep.line)
        }
        Some(DependencyDetail::Method { return_type, calls }) => {
            write!(out, "  [{}] {}()", dep.layer, dep.target)?;
            if let Some(ret) = return_type {
                write!(out, " -> {ret}")?;
            }
            writeln!(out, " (line {})", dep.line)?;
            for (i, call) in calls.iter().enumerate() {
                let branch = if i + 1 == calls.len() { "└─" } else { "├─" };
                writeln!(out, "      {branch} {call}()")?;
            }
            Ok(())
        }
        None => writeln!(out, "  [{}] {} (line {})", dep.layer, dep.target, dep.line),
    }
}

fn write_stats(stats: &CrawlStats, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Statistics")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "  files discovered:   {}", stats.files_discovered)?;
    writeln!(out, "  files analyzed:     {}", stats.files_analyzed)?;
    writeln!(out, "  files reused:       {}", stats.files_reused)?;
    writeln!(out, "  files unsupported:  {}", stats.files_unsupported)?;
    writeln!(out, "  files failed:       {}", stats.files_failed)?;
    if stats.files_deleted > 0 {
        writeln!(out, "  files deleted:      {}", stats.files_deleted)?;
    }
    if stats.walk_errors > 0 {
        writeln!(out, "  unreadable entries: {}", stats.walk_errors)?;
    }
    writeln!(out, "  dependencies:       {}", stats.dependencies)?;
    for (layer, count) in &stats.by_layer {
        writeln!(out, "    {layer:<8} {count}")?;
    }
    for (language, count) in &stats.by_language {
        writeln!(out, "  {language:<19} {count} files")?;
    }
    writeln!(
        out,
        "  call resolution:    {}/{} ({:.1}%)",
        stats.call_graph.resolved_edges,
        stats.call_graph.call_edges,
        stats.call_graph.resolution_rate() * 100.0
    )?;
    if let Some(cache) = &stats.file_cache {
        writeln!(out, "  cache hit rate:     {:.1}%", cache.hit_ratio() * 100.0)?;
    }
    if let Some(incremental) = &stats.incremental {
        writeln!(out, "  incremental reuse:  {:.1}%", incremental.efficiency() * 100.0)?;
    }
    writeln!(out, "  duration:           {} ms", stats.duration.as_millis())?;
    Ok(())
}
