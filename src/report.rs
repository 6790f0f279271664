//! Text rendering of an estimation result.
//!
//! Three sections (bakes, endorsements, total), each with a mean and a max
//! row across count/deposits/rewards columns, plus a trailing note naming
//! the confidence level behind the max figures. Pure formatting; the values
//! are computed entirely by the estimator.

use crate::types::{BucketEstimate, Estimate, EstimationResult};

/// Column header width.
const COL: usize = 8;

/// Render the full report as plain text.
pub fn text(result: &EstimationResult) -> String {
    let mut out: Vec<String> = vec![
        format!("total active stake: {}", result.total_active_stake),
        format!("cycles: {}", result.cycles),
        String::new(),
    ];

    for (name, bucket) in [
        ("bakes", &result.bakes),
        ("endorsements", &result.endorsements),
        ("total", &result.total),
    ] {
        section(&mut out, name, bucket);
    }

    out.push(format!(
        "max estimates computed at {:.0}% confidence",
        result.confidence * 100.0
    ));
    out.join("\n")
}

fn section(out: &mut Vec<String>, name: &str, bucket: &BucketEstimate) {
    let header = format!(
        "{:width$}{:>w$} {:>w$} {:>w$}",
        "",
        "count",
        "deposits",
        "rewards",
        width = COL + 2,
        w = COL
    );
    out.push(name.to_string());
    out.push("-".repeat(header.len()));
    out.push(header);
    out.push(row("mean", &bucket.mean));
    out.push(row("max", &bucket.max));
    out.push(String::new());
}

fn row(label: &str, estimate: &Estimate) -> String {
    format!(
        "{:>w$}: {:>w$.2} {:>w$.2} {:>w$.2}",
        label,
        estimate.count,
        estimate.deposits,
        estimate.rewards,
        w = COL
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
