//! Extraction and crawl benchmarks.
//!
//! Benchmarks: single-file extraction per language, cold crawl (serial and
//! parallel), and an incremental re-crawl with nothing changed.
//! Run with: cargo bench -p depscan-analysis --bench extract_bench

use std::path::Path;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use depscan_analysis::crawler::Crawler;
use depscan_analysis::extractors::extract;
use depscan_analysis::grammar::LayerMask;
use depscan_analysis::patterns::PatternCache;
use depscan_core::config::DepscanConfig;
use tempfile::TempDir;

const RUST_SOURCE: &str = "\
use serde::Serialize;
use crate::engine::Engine;

pub struct Runner {
    engine: Engine,
}

impl Runner {
    pub fn run(&self, input: &str) -> Result<u32, String> {
        let parsed = self.parse(input)?;
        Ok(self.engine.execute(parsed))
    }

    fn parse(&self, input: &str) -> Result<u32, String> {
        input.parse::<u32>().map_err(|e| e.to_string())
    }
}
";

const PYTHON_SOURCE: &str = "\
import numpy
from app.models import User

class Service(Base):
    def run(self, items):
        cleaned = normalize(items)
        return self.store(cleaned)

    def store(self, rows):
        return save_all(rows)
";

/// Create a temp directory with N files spread over Rust and Python.
fn create_test_files(count: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..count {
        let subdir = dir.path().join(format!("pkg_{:03}", i / 100));
        std::fs::create_dir_all(&subdir).ok();
        if i % 2 == 0 {
            let content = format!("use crate::m{i};\n\npub fn f_{i}(x: u32) -> u32 {{\n    g_{i}(x)\n}}\n");
            std::fs::write(subdir.join(format!("f_{i:05}.rs")), content).unwrap();
        } else {
            let content = format!("import mod_{i}\n\ndef f_{i}(x):\n    return g_{i}(x)\n");
            std::fs::write(subdir.join(format!("f_{i:05}.py")), content).unwrap();
        }
    }
    dir
}

fn extract_single_file(c: &mut Criterion) {
    let cache = PatternCache::initialize().unwrap();
    let mut group = c.benchmark_group("extract_file");

    for (name, file, src) in [
        ("rust", "runner.rs", RUST_SOURCE),
        ("python", "service.py", PYTHON_SOURCE),
    ] {
        group.bench_with_input(BenchmarkId::new("all_layers", name), &src, |b, src| {
            b.iter(|| extract(&cache, Path::new(file), src, LayerMask::ALL).unwrap());
        });
    }
    group.finish();
}

fn crawl_cold(c: &mut Criterion) {
    let mut group = c.benchmark_group("crawl_cold");
    group.sample_size(10);
    let patterns = Arc::new(PatternCache::initialize().unwrap());

    for size in [500, 2000] {
        let dir = create_test_files(size);
        for (mode, toml) in [
            ("serial", "[cache]\nincremental = false\n"),
            ("parallel", "[performance]\nparallel = true\nthreads = 4\n"),
        ] {
            let config = DepscanConfig::from_toml(toml).unwrap();
            group.bench_with_input(BenchmarkId::new(mode, size), &size, |b, _| {
                b.iter(|| {
                    Crawler::with_patterns(config.clone(), vec![dir.path().to_path_buf()], Arc::clone(&patterns))
                        .run()
                        .unwrap()
                });
            });
        }
    }
    group.finish();
}

fn crawl_incremental_unchanged(c: &mut Criterion) {
    let mut group = c.benchmark_group("crawl_incremental");
    group.sample_size(10);
    let patterns = Arc::new(PatternCache::initialize().unwrap());

    let dir = create_test_files(2000);
    let config = DepscanConfig::from_toml("[cache]\nincremental = true\n").unwrap();
    let roots = vec![dir.path().to_path_buf()];

    // First crawl writes the state file the measured runs start from.
    Crawler::with_patterns(config.clone(), roots.clone(), Arc::clone(&patterns))
        .run()
        .unwrap();

    group.bench_function("unchanged_2000", |b| {
        b.iter(|| {
            Crawler::with_patterns(config.clone(), roots.clone(), Arc::clone(&patterns))
                .run()
                .unwrap()
        });
    });
    group.finish();
}

criterion_group!(benches, extract_single_file, crawl_cold, crawl_incremental_unchanged);
criterion_main!(benches);
