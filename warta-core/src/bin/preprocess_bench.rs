//! Preprocessing Benchmark
//!
//! Measures how fast raw Indonesian text goes through the preprocessing
//! pipeline. Feed it a large corpus (news dumps, one article per line) to get
//! throughput numbers that reflect real inputs.
//!
//! ## What It Benchmarks
//!
//! 1. **Normalize**: lowercasing, digit and punctuation removal, whitespace collapsing
//! 2. **Stem**: root extraction on pre-normalized text, with and without the word cache
//! 3. **Pipeline**: normalize + stem, as the classifier sees its input
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/preprocess_bench /path/to/corpus.txt
//!
//! # run one stage only
//! ./target/release/preprocess_bench /path/to/corpus.txt stem
//! ```
//!
//! ## Example Output
//!
//! ```text
//! === Stem (cached) ===
//! --------------------------------
//! Mode        : Stem (cached)
//! Elapsed     : 0.412 s
//! Throughput  : 96.310 MiB/s
//! Words       : 6_128_904
//! Words/sec   : 14_875_980
//! --------------------------------
//! ```
//!
//! Stemming is far slower than normalization, so input is processed line by
//! line and the stem stage runs fewer rounds.

use std::env;
use std::fs;
use std::time::{Duration, Instant};

use warta_core::analyzer::normalizer::TextNormalizer;
use warta_core::analyzer::stemmer::Stemmer;
use warta_core::analyzer::tokenizer::Tokenizer;

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;
const STEM_MEASURE_RUNS: usize = 2;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: preprocess_bench <path> [normalize|stem|pipeline|all]");
        std::process::exit(1);
    }

    let path = &args[1];
    let mode = args.get(2).map(String::as_str).unwrap_or("all");

    println!("Loading file...");
    let input = fs::read_to_string(path)?;
    let lines: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();

    println!("File size: {}", fmt_bytes(input.len() as u64));
    println!("Lines:     {}\n", fmt_count(lines.len() as u64));

    match mode {
        "normalize" => bench_normalize(&lines),
        "stem" => bench_stem(&lines),
        "pipeline" => bench_pipeline(&lines),
        _ => {
            bench_normalize(&lines);
            bench_stem(&lines);
            bench_pipeline(&lines);
        }
    }

    Ok(())
}

fn total_bytes(lines: &[&str]) -> usize {
    lines.iter().map(|l| l.len()).sum()
}

fn bench_normalize(lines: &[&str]) {
    let normalizer = TextNormalizer::default();
    let mut out = String::with_capacity(4096);

    println!("=== Normalize ===");

    let mut run = || {
        for line in lines {
            normalizer.normalize_into(line, &mut out);
            std::hint::black_box(&out);
        }
    };
    warmup(WARMUP_RUNS, &mut run);
    let elapsed = measure(MEASURE_RUNS, &mut run);

    print_perf("Normalize", total_bytes(lines), elapsed, 0);
}

fn bench_stem(lines: &[&str]) {
    let normalizer = TextNormalizer::default();
    let normalized: Vec<String> = lines.iter().map(|l| normalizer.normalize(l)).collect();
    let refs: Vec<&str> = normalized.iter().map(String::as_str).collect();
    let words = count_words(&refs);

    for (label, cached) in [("Stem (cached)", true), ("Stem (uncached)", false)] {
        println!("=== {label} ===");

        let mut stemmer = Stemmer::default().with_cache(cached);
        let mut out = String::with_capacity(4096);
        let mut run = || {
            for line in &refs {
                stemmer.stem_into(line, &mut out);
                std::hint::black_box(&out);
            }
        };
        warmup(WARMUP_RUNS, &mut run);
        let elapsed = measure(STEM_MEASURE_RUNS, &mut run);

        print_perf(label, total_bytes(&refs), elapsed, words);
    }
}

fn bench_pipeline(lines: &[&str]) {
    let normalizer = TextNormalizer::default();
    let mut stemmer = Stemmer::default();
    let mut norm_buf = String::with_capacity(4096);
    let mut out = String::with_capacity(4096);

    println!("=== Pipeline ===");

    let mut words = 0u64;
    let mut run = || {
        let mut local = 0u64;
        for line in lines {
            normalizer.normalize_into(line, &mut norm_buf);
            stemmer.stem_into(&norm_buf, &mut out);
            Tokenizer::new().tokenize(&out, |_w, _p| local += 1);
        }
        words = local;
        std::hint::black_box(words);
    };
    warmup(WARMUP_RUNS, &mut run);
    let elapsed = measure(STEM_MEASURE_RUNS, &mut run);

    print_perf("Pipeline", total_bytes(lines), elapsed, words);
}

fn count_words(lines: &[&str]) -> u64 {
    let tokenizer = Tokenizer::new();
    let mut n = 0u64;
    for line in lines {
        tokenizer.tokenize(line, |_w, _p| n += 1);
    }
    n
}

fn warmup<F: FnMut()>(runs: usize, f: &mut F) {
    for _ in 0..runs {
        f();
    }
}

fn measure<F: FnMut()>(runs: usize, f: &mut F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..runs {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / runs as u32
}

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, words: u64) {
    let secs = elapsed.as_secs_f64();
    let mib = input_bytes as f64 / (1024.0 * 1024.0);

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Throughput  : {:.3} MiB/s", mib / secs);

    if words > 0 {
        println!("Words       : {}", fmt_count(words));
        println!("Words/sec   : {}", fmt_count((words as f64 / secs) as u64));
    }

    println!("--------------------------------\n");
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 * 1024 {
        format!("{:.2} GiB", b as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if b >= 1024 * 1024 {
        format!("{:.2} MiB", b as f64 / (1024.0 * 1024.0))
    } else if b >= 1024 {
        format!("{:.2} KiB", b as f64 / 1024.0)
    } else {
        format!("{} B", b)
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
