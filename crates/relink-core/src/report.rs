// crates/relink-core/src/report.rs
//
// Plain-text pass summary for a log line or the summary panel. Built purely
// from the result: same result in, same text out.

use std::fmt::Write;

use crate::result::RestorationResult;

pub fn generate_report(result: &RestorationResult) -> String {
    let s = &result.stats;
    let mut out = String::new();

    // Writing into a String can't fail.
    let _ = writeln!(out, "Media restoration report");
    let _ = writeln!(out, "  Total:     {}", s.total);
    let _ = writeln!(out, "  Restored:  {}", s.restored);
    let _ = writeln!(out, "  Relocated: {}", s.relocated);
    let _ = writeln!(out, "  Missing:   {}", s.missing);
    let _ = writeln!(out, "  Corrupted: {}", s.corrupted);

    if !result.relocated_files.is_empty() {
        let _ = writeln!(out, "\nRelocated files:");
        for r in &result.relocated_files {
            let _ = writeln!(out, "  - {} -> {}", r.original.name, r.new_path.display());
        }
    }

    if !result.corrupted_files.is_empty() {
        let _ = writeln!(out, "\nCorrupted files:");
        for c in &result.corrupted_files {
            let _ = writeln!(out, "  - {} ({})", c.reference.name, c.issues.join("; "));
        }
    }

    if !result.missing_files.is_empty() {
        let _ = writeln!(out, "\nMissing files:");
        for m in &result.missing_files {
            let _ = writeln!(out, "  - {} (last seen at {})", m.name, m.original_path.display());
        }
    }

    out
}
