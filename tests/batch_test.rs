use aiornot::{process_batch, BatchOptions, BatchSummary, Error, MediaKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Mutex;

fn run_batch(
    size: usize,
    failing: &HashSet<usize>,
    options: &BatchOptions,
) -> BatchSummary<usize> {
    let items = (0..size).map(|i| (format!("file-{i}.jpg"), i)).collect();
    tokio_test::block_on(process_batch(items, options, None, |_, value| async move {
        tokio::task::yield_now().await;
        if failing.contains(&value) {
            Err(Error::Server {
                status_code: 500,
                message: "Server error".to_string(),
                response: None,
            })
        } else {
            Ok(value * 10)
        }
    }))
    .unwrap()
}

#[test]
fn test_random_failures_are_counted() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let size = rng.gen_range(1..40);
        let failing: HashSet<usize> = (0..size).filter(|_| rng.gen_bool(0.3)).collect();
        let options = BatchOptions {
            concurrency: rng.gen_range(1..8),
            ..BatchOptions::for_kind(MediaKind::Image)
        };

        let summary = run_batch(size, &failing, &options);

        assert_eq!(summary.total, size);
        assert_eq!(summary.failed, failing.len());
        assert_eq!(summary.succeeded, size - failing.len());
        let expected_rate = (size - failing.len()) as f64 / size as f64;
        assert!((summary.success_rate() - expected_rate).abs() < 1e-9);

        for (position, result) in summary.results.iter().enumerate() {
            assert_eq!(result.index, position);
            assert_eq!(result.input, format!("file-{position}.jpg"));
            assert_eq!(result.is_success(), !failing.contains(&position));
            if let Some(value) = result.result() {
                assert_eq!(*value, position * 10);
            }
        }
    }
}

#[test]
fn test_fail_fast_bounds_attempts() {
    let failing: HashSet<usize> = [2].into_iter().collect();
    let options = BatchOptions {
        concurrency: 2,
        fail_fast: true,
        external_id_prefix: None,
    };

    let summary = run_batch(10, &failing, &options);

    assert!(summary.total < 10);
    assert!(summary.total >= 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors().next().map(|r| r.index), Some(2));
}

#[test]
fn test_progress_reaches_total() {
    let seen = Mutex::new(Vec::new());
    let observer = |completed: usize, total: usize| seen.lock().unwrap().push((completed, total));
    let items: Vec<(String, u8)> = (0..5).map(|i| (i.to_string(), i)).collect();

    let summary = tokio_test::block_on(process_batch(
        items,
        &BatchOptions::for_kind(MediaKind::Voice),
        Some(&observer),
        |_, value| async move { Ok::<_, Error>(value) },
    ))
    .unwrap();

    assert_eq!(summary.succeeded, 5);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]
    );
}

#[test]
fn test_jsonl_lines() {
    let failing: HashSet<usize> = [1].into_iter().collect();
    let summary = run_batch(3, &failing, &BatchOptions::default());

    let mut buffer = Vec::new();
    summary.write_jsonl(&mut buffer).unwrap();
    let output = String::from_utf8(buffer).unwrap();
    let lines: Vec<Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["status"], "success");
    assert_eq!(lines[0]["input"], "file-0.jpg");
    assert_eq!(lines[0]["result"], 0);
    assert_eq!(lines[1]["status"], "error");
    assert_eq!(lines[1]["error"], "ServerError");
    assert_eq!(lines[1]["message"], "[500] Server error");
    assert!(lines[1]["duration_ms"].is_number());
    assert_eq!(lines[3]["status"], "summary");
    assert_eq!(lines[3]["total"], 3);
    assert_eq!(lines[3]["succeeded"], 2);
    assert_eq!(lines[3]["failed"], 1);
    assert!(output.ends_with('\n'));
}

#[test]
fn test_summary_line() {
    let summary = run_batch(4, &[3].into_iter().collect(), &BatchOptions::default());
    assert_eq!(
        summary.summary_line(),
        "Processed 4 files: 3 succeeded, 1 failed (75.0% success rate)"
    );
}
