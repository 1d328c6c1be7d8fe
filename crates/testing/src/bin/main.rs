//! Lifecycle core scenario runner.
//!
//! Runs the end-to-end scenarios once and prints a pass/fail summary,
//! exiting non-zero if anything failed.

use ignition_harness::{scenarios, TestOutcome};

fn main() {
    let report = scenarios::run_all();

    println!("ignition-harness scenario report");
    println!("=================================");
    for record in &report.records {
        let mark = match record.outcome {
            TestOutcome::Pass => "PASS",
            TestOutcome::Fail => "FAIL",
        };
        println!("[{mark}] {} ({:?}, {:.3}ms)", record.name, record.category, record.duration.as_secs_f64() * 1000.0);
        if let Some(message) = &record.error_message {
            println!("       {message}");
        }
    }

    println!();
    println!("{} passed, {} failed", report.pass_count(), report.fail_count());

    if !report.all_passed() {
        std::process::exit(1);
    }
}
