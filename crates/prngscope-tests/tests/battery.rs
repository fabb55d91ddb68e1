//! Integration tests: generated streams through eligibility and the battery.

use prngscope_core::{ResolvedConfig, generate_default_streams};
use prngscope_tests::sp800_22::excursion_cycles;
use prngscope_tests::{
    Catalog, FailurePolicy, StatisticalTest, TestError, TestOutcome, check_eligibility,
    run_battery,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_bits(seed: u64, n: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| u8::from(rng.random_bool(0.5))).collect()
}

/// Minimal synthetic test: needs `min_bits`, scores the proportion of ones.
struct Proportion {
    min_bits: usize,
}

impl StatisticalTest for Proportion {
    fn name(&self) -> &'static str {
        "Proportion"
    }

    fn min_bits(&self) -> usize {
        self.min_bits
    }

    fn run(&self, bits: &[u8]) -> Result<TestOutcome, TestError> {
        let ones = bits.iter().filter(|&&b| b == 1).count();
        let p = ones as f64 / bits.len() as f64;
        Ok(TestOutcome::from_p(p, format!("{ones}/{}", bits.len())))
    }
}

fn synthetic_catalog(min_bits: usize) -> Catalog {
    Catalog::new(vec![Box::new(Proportion { min_bits })]).unwrap()
}

#[test]
fn round_trip_seed_42_size_10() {
    let streams = generate_default_streams(&ResolvedConfig::new(42, 10)).unwrap();
    let lcg = &streams[0];
    assert_eq!(lcg.bits.len(), 62);

    let catalog = synthetic_catalog(50);
    let elig = check_eligibility(lcg.bits.as_bits(), &catalog);
    assert_eq!(elig.eligible_names(), vec!["Proportion"]);
    let verdicts =
        run_battery(lcg.bits.as_bits(), &catalog, &elig, FailurePolicy::Abort).unwrap();
    assert_eq!(verdicts.len(), 1);
    let test = catalog.iter().next().unwrap();
    assert!(test.score_range().contains(&verdicts[0].score));

    let catalog = synthetic_catalog(63);
    let elig = check_eligibility(lcg.bits.as_bits(), &catalog);
    assert!(elig.eligible_names().is_empty());
    let verdicts =
        run_battery(lcg.bits.as_bits(), &catalog, &elig, FailurePolicy::Abort).unwrap();
    assert!(verdicts.is_empty());
}

#[test]
fn eligibility_is_monotone_under_extension() {
    let catalog = Catalog::sp800_22r1a();
    let bits = random_bits(11, 40_000);
    let mut previous: Option<Vec<bool>> = None;
    for len in [0usize, 99, 100, 127, 128, 255, 256, 999, 1000, 4096, 38_912, 40_000] {
        let current: Vec<bool> = check_eligibility(&bits[..len], &catalog)
            .iter()
            .map(|(_, ok)| ok)
            .collect();
        if let Some(prev) = &previous {
            for (i, (&was, &now)) in prev.iter().zip(current.iter()).enumerate() {
                assert!(!was || now, "test #{i} lost eligibility at {len} bits");
            }
        }
        previous = Some(current);
    }
}

#[test]
fn battery_runs_eligible_tests_in_catalog_order() {
    let catalog = Catalog::sp800_22r1a();
    let bits = random_bits(2024, 40_000);
    let elig = check_eligibility(&bits, &catalog);
    let expected = elig.eligible_names();
    // Under 10^6 bits and under Maurer's minimum.
    assert_eq!(
        expected,
        vec![
            "Monobit",
            "Frequency Within Block",
            "Runs",
            "Longest Run Ones In A Block",
            "Binary Matrix Rank",
            "Discrete Fourier Transform",
            "Non Overlapping Template Matching",
            "Serial",
            "Approximate Entropy",
            "Cumulative Sums",
        ]
    );

    let verdicts = run_battery(&bits, &catalog, &elig, FailurePolicy::Abort).unwrap();
    let names: Vec<&str> = verdicts.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, expected);
    for (verdict, test) in verdicts
        .iter()
        .zip(catalog.iter().filter(|t| expected.contains(&t.name())))
    {
        assert!(
            test.score_range().contains(&verdict.score),
            "{} scored {}",
            verdict.name,
            verdict.score
        );
    }
}

#[test]
fn random_bits_mostly_pass() {
    let catalog = Catalog::sp800_22r1a();
    let bits = random_bits(99, 40_000);
    let elig = check_eligibility(&bits, &catalog);
    let verdicts = run_battery(&bits, &catalog, &elig, FailurePolicy::Isolate).unwrap();
    let passed = verdicts.iter().filter(|v| v.passed).count();
    assert!(passed * 2 > verdicts.len(), "{passed}/{} passed", verdicts.len());
}

#[test]
fn lcg_stream_is_biased_toward_ones() {
    let streams = generate_default_streams(&ResolvedConfig::new(42, 5000)).unwrap();
    let catalog = Catalog::sp800_22r1a();
    let lcg = streams[0].bits.as_bits();
    let elig = check_eligibility(lcg, &catalog);
    let verdicts = run_battery(lcg, &catalog, &elig, FailurePolicy::Isolate).unwrap();
    // Every non-zero value starts with a 1 bit, so ones dominate.
    for name in ["Monobit", "Runs"] {
        let verdict = verdicts.iter().find(|v| v.name == name).unwrap();
        assert!(!verdict.passed, "{name}: {}", verdict.details);
        assert_eq!(verdict.grade, 'F');
    }
}

#[test]
fn verdicts_are_deterministic() {
    let catalog = Catalog::sp800_22r1a();
    let streams = generate_default_streams(&ResolvedConfig::new(7, 2000)).unwrap();
    for stream in &streams {
        let bits = stream.bits.as_bits();
        let elig = check_eligibility(bits, &catalog);
        let a = run_battery(bits, &catalog, &elig, FailurePolicy::Isolate).unwrap();
        let b = run_battery(bits, &catalog, &elig, FailurePolicy::Isolate).unwrap();
        let scores = |v: &[prngscope_tests::TestVerdict]| -> Vec<(String, f64)> {
            v.iter().map(|x| (x.name.clone(), x.score)).collect()
        };
        assert_eq!(scores(&a), scores(&b));
    }
}

#[test]
fn million_bit_stream_runs_every_catalog_test() {
    let n = 1_000_000;
    // First seed whose walk has enough cycles for the excursion tests.
    let bits = (1u64..=32)
        .map(|seed| random_bits(seed, n))
        .find(|bits| excursion_cycles(bits) >= 500)
        .expect("no seed with at least 500 cycles");

    let catalog = Catalog::sp800_22r1a();
    let elig = check_eligibility(&bits, &catalog);
    assert_eq!(elig.eligible_names(), catalog.names());

    let verdicts = run_battery(&bits, &catalog, &elig, FailurePolicy::Abort).unwrap();
    assert_eq!(verdicts.len(), 15);
    for (verdict, test) in verdicts.iter().zip(catalog.iter()) {
        assert_eq!(verdict.name, test.name());
        assert!(
            test.score_range().contains(&verdict.score),
            "{} scored {} ({})",
            verdict.name,
            verdict.score,
            verdict.details
        );
    }

    let details = |name: &str| {
        verdicts
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.details.clone())
            .unwrap()
    };
    assert!(details("Maurers Universal").contains("L=7, K=141577"));
    assert!(details("Linear Complexity").starts_with("N=2000,"));
    assert!(details("Overlapping Template Matching").starts_with("N=968,"));
    assert!(details("Random Excursion").contains("min over 8 states"));
    assert!(details("Random Excursion Variant").contains("min over 18 states"));
}
