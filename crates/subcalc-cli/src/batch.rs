//! Parallel batch evaluation using Rayon
//!
//! Reads one calculation per line, in either form:
//! - `192.168.1.10 24`
//! - `192.168.1.10/24`
//!
//! Blank lines and `#` comments are skipped. Each line is evaluated
//! independently and a bad line never stops the batch. Output order
//! follows input order.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

use subcalc_core::{calculate, calculate_cidr, Calculation, SubnetError};

/// One input line to evaluate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    /// 1-based line number in the source
    pub line: usize,
    pub text: String,
}

/// Outcome for one input line
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub line: usize,
    pub input: String,
    pub result: Result<Calculation, String>,
}

/// Open a file, or stdin for `None` / `-`
pub fn open_input(path: Option<&str>) -> Result<Box<dyn BufRead>> {
    match path {
        None | Some("-") => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Collect the non-empty, non-comment lines of a reader
pub fn read_inputs<R: BufRead>(reader: R) -> Result<Vec<BatchInput>> {
    let mut inputs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        inputs.push(BatchInput {
            line: idx + 1,
            text: text.to_string(),
        });
    }
    Ok(inputs)
}

/// Evaluate a single `ADDRESS PREFIX` or `ADDRESS/PREFIX` line
pub fn evaluate_line(text: &str) -> Result<Calculation, SubnetError> {
    let mut fields = text.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(notation), None, _) => calculate_cidr(notation),
        (Some(address), Some(prefix), None) => calculate(address, prefix),
        _ => Err(SubnetError::Format(format!(
            "expected 'ADDRESS PREFIX' or 'ADDRESS/PREFIX': '{}'",
            text
        ))),
    }
}

/// Batch processor with parallel execution
pub struct BatchProcessor {
    thread_pool: rayon::ThreadPool,
}

impl BatchProcessor {
    /// Create a new batch processor
    ///
    /// # Arguments
    ///
    /// * `num_threads` - Number of threads (default: CPU cores)
    pub fn new(num_threads: Option<usize>) -> Result<Self> {
        let num_threads = num_threads.unwrap_or_else(num_cpus::get).max(1);

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;

        debug!(threads = num_threads, "batch thread pool ready");

        Ok(Self { thread_pool })
    }

    /// Evaluate every input in parallel, keeping input order
    pub fn process(&self, inputs: Vec<BatchInput>) -> Vec<BatchResult> {
        let total = inputs.len();
        let processed = AtomicUsize::new(0);

        self.thread_pool.install(|| {
            inputs
                .into_par_iter()
                .map(|input| {
                    let result = evaluate_line(&input.text).map_err(|e| e.to_string());

                    let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % 1000 == 0 || count == total {
                        info!("Processed {}/{} lines", count, total);
                    }

                    BatchResult {
                        line: input.line,
                        input: input.text,
                        result,
                    }
                })
                .collect()
        })
    }

    /// Get thread pool info
    pub fn thread_count(&self) -> usize {
        self.thread_pool.current_num_threads()
    }
}
