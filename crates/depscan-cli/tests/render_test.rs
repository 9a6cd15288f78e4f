//! Renderer tests over a real crawl of a small Python + Rust tree.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use depscan_analysis::crawler::{Crawler, DependencyGraph};
use depscan_analysis::grammar::LayerMask;
use depscan_cli::{render_to_string, OutputFormat, RenderFilter, RenderOptions};
use depscan_core::config::DepscanConfig;

const SERVICE_PY: &str = "\
import os
import numpy
from app.models import User

class Service(Base):
    def run(self, x):
        helper(x)
        return self.save()

def helper(x):
    return len(x)
";

const ENGINE_RS: &str = "pub fn boot() {\n    warm_up();\n}\n\nfn warm_up() {\n}\n";

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("service.py"), SERVICE_PY).unwrap();
    fs::write(dir.path().join("engine.rs"), ENGINE_RS).unwrap();
    dir
}

fn crawl(root: &Path) -> DependencyGraph {
    Crawler::new(DepscanConfig::default(), vec![root.to_path_buf()])
        .unwrap()
        .run()
        .unwrap()
}

fn module_only() -> RenderOptions {
    RenderOptions {
        filter: RenderFilter {
            layers: LayerMask::MODULE,
            ..RenderFilter::default()
        },
        stats: false,
    }
}

#[test]
fn terminal_groups_by_file() {
    let dir = project();
    let graph = crawl(dir.path());
    let text = render_to_string(&graph, OutputFormat::Terminal, &RenderOptions::default()).unwrap();

    assert!(text.starts_with("Dependency Analysis Results\n"));
    assert!(text.contains("  [module] numpy (line 2)\n"));
    assert!(text.contains("Service : Base (line 5)\n"));
    assert!(text.contains("  [method] run() (line 6)\n      ├─ helper()\n      └─ save()\n"));
    assert!(text.contains("  [method] boot() (line 1)\n      └─ warm_up()\n"));
    assert!(!text.contains("[module] os"));

    let engine = text.find("engine.rs").unwrap();
    let service = text.find("service.py").unwrap();
    assert!(engine < service);
    assert!(!text.contains("Statistics"));
}

#[test]
fn terminal_stats_section() {
    let dir = project();
    let graph = crawl(dir.path());
    let options = RenderOptions {
        stats: true,
        ..RenderOptions::default()
    };
    let text = render_to_string(&graph, OutputFormat::Terminal, &options).unwrap();
    assert!(text.contains("Statistics"));
    assert!(text.contains("  files analyzed:     2\n"));
    assert!(text.contains("call resolution:"));
}

#[test]
fn terminal_reports_empty_output() {
    let dir = project();
    let graph = crawl(dir.path());
    let options = RenderOptions {
        filter: RenderFilter {
            include: vec!["no-such-name".to_string()],
            ..RenderFilter::default()
        },
        stats: false,
    };
    let text = render_to_string(&graph, OutputFormat::Terminal, &options).unwrap();
    assert!(text.contains("No dependencies found."));
}

#[test]
fn json_honours_layer_filter() {
    let dir = project();
    let graph = crawl(dir.path());
    let text = render_to_string(&graph, OutputFormat::Json, &module_only()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    let deps = json["dependencies"].as_array().unwrap();
    let targets: Vec<&str> = deps.iter().map(|d| d["target"].as_str().unwrap()).collect();
    assert_eq!(targets, vec!["numpy", "app.models"]);
    assert!(deps.iter().all(|d| d["layer"] == "module"));
    assert_eq!(json["metadata"]["total_dependencies"], 2);
    assert_eq!(json["metadata"]["format_version"], "1.0");
    assert!(json["methods"].as_array().unwrap().is_empty());
    assert!(json["structures"].as_array().unwrap().is_empty());
    assert!(json.get("stats").is_none());
    assert!(json.get("failures").is_none());
}

#[test]
fn json_carries_method_details_and_stats() {
    let dir = project();
    let graph = crawl(dir.path());
    let options = RenderOptions {
        stats: true,
        ..RenderOptions::default()
    };
    let text = render_to_string(&graph, OutputFormat::Json, &options).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    let run = json["dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["target"] == "run")
        .unwrap();
    assert_eq!(run["detail"]["kind"], "method");
    assert_eq!(run["detail"]["calls"], serde_json::json!(["helper", "save"]));

    let methods: Vec<&str> = json["methods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(methods, vec!["boot", "helper", "run", "warm_up"]);
    assert_eq!(json["stats"]["files_analyzed"], 2);
}

#[test]
fn dot_links_files_modules_and_calls() {
    let dir = project();
    let graph = crawl(dir.path());
    let text = render_to_string(&graph, OutputFormat::Dot, &RenderOptions::default()).unwrap();

    assert!(text.starts_with("digraph dependencies {\n"));
    assert!(text.trim_end().ends_with('}'));
    assert!(text.contains("\"module:numpy\" [label=\"numpy\", shape=ellipse];"));
    assert!(text.contains("\"struct:Service\" -> \"struct:Base\" [label=\"extends\"];"));
    assert!(text.contains("\"method:run\" -> \"method:helper\" [label=\"calls\"];"));
    assert!(text.contains("\"method:boot\" -> \"method:warm_up\" [label=\"calls\"];"));
    // `save` and `len` are never defined, so they get no call edge.
    assert!(!text.contains("\"method:save\""));
    assert!(!text.contains("\"method:len\""));
}

#[test]
fn dot_output_is_stable() {
    let dir = project();
    let first = render_to_string(&crawl(dir.path()), OutputFormat::Dot, &RenderOptions::default()).unwrap();
    let second = render_to_string(&crawl(dir.path()), OutputFormat::Dot, &RenderOptions::default()).unwrap();
    assert_eq!(first, second);
}
