use prngscope_core::GeneratedStream;
use prngscope_tests::{
    BatteryError, Catalog, Eligibility, FailurePolicy, TestVerdict, calculate_quality_score,
    check_eligibility, run_battery,
};
use serde::Serialize;

use super::InputArgs;

/// Eligibility and verdicts for one generator's stream.
pub struct GeneratorReport<'a> {
    pub stream: &'a GeneratedStream,
    pub eligibility: Eligibility,
    pub verdicts: Vec<TestVerdict>,
}

pub fn run(input: &InputArgs, output_path: Option<&str>, fail_fast: bool) {
    let streams = super::generate_or_exit(input);
    let reports = print(&streams, fail_fast);

    if let Some(path) = output_path {
        let json = JsonReport::new(&reports);
        let text = serde_json::to_string_pretty(&json).unwrap_or_else(|e| super::fail(e));
        if let Err(e) = std::fs::write(path, text) {
            super::fail(format!("failed to write report to {path}: {e}"));
        }
        println!("\nReport saved to: {path}");
    }
}

/// Evaluate every stream and print the console report.
pub fn print(streams: &[GeneratedStream], fail_fast: bool) -> Vec<GeneratorReport<'_>> {
    let catalog = Catalog::sp800_22r1a();
    let policy = if fail_fast {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Isolate
    };
    let reports = evaluate(streams, &catalog, policy).unwrap_or_else(|e| super::fail(e));
    print!("{}", render_console(&reports));
    reports
}

/// Eligibility for every stream first, then the battery for each.
pub fn evaluate<'a>(
    streams: &'a [GeneratedStream],
    catalog: &Catalog,
    policy: FailurePolicy,
) -> Result<Vec<GeneratorReport<'a>>, BatteryError> {
    let eligibility: Vec<Eligibility> = streams
        .iter()
        .map(|s| check_eligibility(s.bits.as_bits(), catalog))
        .collect();
    streams
        .iter()
        .zip(eligibility)
        .map(|(stream, eligibility)| {
            let verdicts = run_battery(stream.bits.as_bits(), catalog, &eligibility, policy)?;
            Ok(GeneratorReport {
                stream,
                eligibility,
                verdicts,
            })
        })
        .collect()
}

pub fn render_console(reports: &[GeneratorReport<'_>]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!("Eligible tests for {}:\n", report.stream.info.label));
        for name in report.eligibility.eligible_names() {
            out.push_str(&format!("- {name}\n"));
        }
    }
    out.push('\n');
    for report in reports {
        out.push_str(&format!("Test results for {}:\n", report.stream.info.label));
        for verdict in &report.verdicts {
            out.push_str(&format!("- {verdict}\n"));
        }
    }
    out
}

#[derive(Serialize)]
struct JsonReport {
    version: &'static str,
    generators: Vec<JsonGenerator>,
}

#[derive(Serialize)]
struct JsonGenerator {
    name: String,
    label: &'static str,
    size: usize,
    bit_length: usize,
    ones: usize,
    eligible: Vec<&'static str>,
    quality_score: f64,
    passed: usize,
    results: Vec<JsonVerdict>,
}

#[derive(Serialize)]
struct JsonVerdict {
    name: String,
    passed: bool,
    score: f64,
    grade: char,
    details: String,
    elapsed_ms: f64,
}

impl JsonReport {
    fn new(reports: &[GeneratorReport<'_>]) -> Self {
        Self {
            version: prngscope_core::VERSION,
            generators: reports
                .iter()
                .map(|r| JsonGenerator {
                    name: r.stream.info.kind.to_string(),
                    label: r.stream.info.label,
                    size: r.stream.sequence.len(),
                    bit_length: r.stream.bits.len(),
                    ones: r.stream.bits.ones(),
                    eligible: r.eligibility.eligible_names(),
                    quality_score: calculate_quality_score(&r.verdicts),
                    passed: r.verdicts.iter().filter(|v| v.passed).count(),
                    results: r
                        .verdicts
                        .iter()
                        .map(|v| JsonVerdict {
                            name: v.name.clone(),
                            passed: v.passed,
                            score: v.score,
                            grade: v.grade,
                            details: v.details.clone(),
                            elapsed_ms: v.elapsed_ms(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
