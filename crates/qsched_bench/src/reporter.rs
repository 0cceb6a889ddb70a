//! Benchmark reporting
//!
//! Gantree: L8_Benchmark → Reporter
//!
//! Renders benchmark results as Markdown, JSON, CSV or plain text.

use crate::suite::{BenchmarkResult, BenchmarkStatistics};
use std::fmt::{self, Write};

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Markdown table
    Markdown,
    /// JSON
    Json,
    /// CSV
    Csv,
    /// Plain text summary
    Text,
}

/// Benchmark reporter
/// Gantree: Reporter // 결과 리포팅
pub struct Reporter;

impl Reporter {
    // ========================================================================
    // Format Converters
    // ========================================================================

    /// Generate report in specified format
    pub fn report(results: &[BenchmarkResult], format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => Self::to_markdown(results),
            ReportFormat::Json => Self::to_json(results),
            ReportFormat::Csv => Self::to_csv(results),
            ReportFormat::Text => Self::to_text(results),
        }
    }

    /// Convert results to Markdown table
    pub fn to_markdown(results: &[BenchmarkResult]) -> String {
        Self::render(|out| Self::write_markdown(out, results))
    }

    /// Convert results to JSON
    pub fn to_json(results: &[BenchmarkResult]) -> String {
        let stats = BenchmarkStatistics::from_results(results);

        let report = serde_json::json!({
            "statistics": stats,
            "results": results,
        });

        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Convert results to CSV
    pub fn to_csv(results: &[BenchmarkResult]) -> String {
        Self::render(|out| Self::write_csv(out, results))
    }

    /// Convert results to plain text summary
    pub fn to_text(results: &[BenchmarkResult]) -> String {
        Self::render(|out| Self::write_text(out, results))
    }

    // ========================================================================
    // Specialized Reports
    // ========================================================================

    /// Compare two result sets, e.g. single pass against randomized search
    pub fn comparison_report(
        baseline: &[BenchmarkResult],
        optimized: &[BenchmarkResult],
    ) -> String {
        Self::render(|out| {
            let base = BenchmarkStatistics::from_results(baseline);
            let opt = BenchmarkStatistics::from_results(optimized);

            writeln!(out, "# QSCHED Comparison Report\n")?;
            writeln!(out, "## Statistics Comparison\n")?;
            writeln!(out, "| Metric | Baseline | Optimized | Change |")?;
            writeln!(out, "|--------|----------|-----------|--------|")?;
            writeln!(
                out,
                "| Avg Makespan | {:.2} | {:.2} | {:.2} |",
                base.avg_makespan,
                opt.avg_makespan,
                opt.avg_makespan - base.avg_makespan
            )?;
            writeln!(
                out,
                "| Avg Parallelism | {:.2}x | {:.2}x | {:.2}x |",
                base.avg_parallelism,
                opt.avg_parallelism,
                opt.avg_parallelism - base.avg_parallelism
            )?;
            writeln!(
                out,
                "| Avg Time (us) | {:.0} | {:.0} | {:.0} |",
                base.avg_time_us,
                opt.avg_time_us,
                opt.avg_time_us - base.avg_time_us
            )
        })
    }

    /// Resource scaling table
    pub fn scaling_report(results: &[BenchmarkResult]) -> String {
        Self::render(|out| {
            writeln!(out, "# Resource Scaling Analysis\n")?;
            writeln!(out, "| Resources | Ops | Edges | Makespan | Time(us) | Time/Op(us) |")?;
            writeln!(out, "|-----------|-----|-------|----------|----------|-------------|")?;

            for r in results {
                let time_per_op = if r.ops > 0 {
                    r.time_us as f64 / r.ops as f64
                } else {
                    0.0
                };
                writeln!(
                    out,
                    "| {} | {} | {} | {:.2} | {} | {:.2} |",
                    r.resources, r.ops, r.edges, r.makespan, r.time_us, time_per_op
                )?;
            }
            Ok(())
        })
    }

    // ========================================================================
    // Writers
    // ========================================================================

    fn render<F>(body: F) -> String
    where
        F: FnOnce(&mut String) -> fmt::Result,
    {
        let mut output = String::new();
        // Writing into a String cannot fail
        let _ = body(&mut output);
        output
    }

    fn write_markdown(out: &mut String, results: &[BenchmarkResult]) -> fmt::Result {
        let stats = BenchmarkStatistics::from_results(results);

        writeln!(out, "# QSCHED Benchmark Results\n")?;
        writeln!(out, "## Summary\n")?;
        writeln!(out, "- **Benchmarks**: {}", stats.count)?;
        writeln!(out, "- **Avg Makespan**: {:.2}", stats.avg_makespan)?;
        writeln!(out, "- **Avg Parallelism**: {:.2}x", stats.avg_parallelism)?;
        writeln!(
            out,
            "- **Search Win Rate**: {:.1}%",
            stats.search_win_rate * 100.0
        )?;
        writeln!(
            out,
            "- **Total Time**: {:.3}ms\n",
            stats.total_time_us as f64 / 1000.0
        )?;

        writeln!(out, "## Detailed Results\n")?;
        writeln!(
            out,
            "| Name | Mode | Ops | Res | Edges | Makespan | First | Trials | Best | Par | Time(us) |"
        )?;
        writeln!(
            out,
            "|------|------|-----|-----|-------|----------|-------|--------|------|-----|----------|"
        )?;

        for r in results {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {:.2} | {:.2} | {} | {} | {:.2}x | {} |",
                r.name,
                r.mode,
                r.ops,
                r.resources,
                r.edges,
                r.makespan,
                r.first_makespan,
                r.trials,
                r.best_trial,
                r.parallelism,
                r.time_us
            )?;
        }

        Ok(())
    }

    fn write_csv(out: &mut String, results: &[BenchmarkResult]) -> fmt::Result {
        writeln!(
            out,
            "name,mode,ops,resources,edges,makespan,first_makespan,trials,best_trial,parallelism,time_us"
        )?;

        for r in results {
            writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{},{}",
                r.name,
                r.mode,
                r.ops,
                r.resources,
                r.edges,
                r.makespan,
                r.first_makespan,
                r.trials,
                r.best_trial,
                r.parallelism,
                r.time_us
            )?;
        }

        Ok(())
    }

    fn write_text(out: &mut String, results: &[BenchmarkResult]) -> fmt::Result {
        let stats = BenchmarkStatistics::from_results(results);

        writeln!(out, "QSCHED Benchmark Results")?;
        writeln!(out, "========================\n")?;

        writeln!(out, "Summary:")?;
        writeln!(out, "  Benchmarks run: {}", stats.count)?;
        writeln!(out, "  Makespan range: {:.2} .. {:.2}", stats.min_makespan, stats.max_makespan)?;
        writeln!(out, "  Average parallelism: {:.2}x", stats.avg_parallelism)?;
        writeln!(out, "  Search win rate: {:.1}%", stats.search_win_rate * 100.0)?;
        writeln!(out, "  Total time: {}us\n", stats.total_time_us)?;

        writeln!(out, "Individual Results:")?;
        for r in results {
            writeln!(
                out,
                "  {} ({}, {} ops on {}R): makespan {:.2}, {} trials, {}us{}",
                r.name,
                r.mode,
                r.ops,
                r.resources,
                r.makespan,
                r.trials,
                r.time_us,
                if r.improvement() > 0.0 {
                    format!(" [-{:.2} by trial {}]", r.improvement(), r.best_trial)
                } else {
                    String::new()
                }
            )?;
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qsched_schedule::SchedulingMode;

    fn make_test_results() -> Vec<BenchmarkResult> {
        vec![
            BenchmarkResult {
                name: "ghz_5q".to_string(),
                ops: 5,
                resources: 5,
                edges: 4,
                mode: SchedulingMode::Earliest,
                makespan: 5.0,
                first_makespan: 5.0,
                trials: 1,
                best_trial: 0,
                parallelism: 1.0,
                time_us: 40,
            },
            BenchmarkResult {
                name: "fanout_search8".to_string(),
                ops: 7,
                resources: 4,
                edges: 6,
                mode: SchedulingMode::Latest,
                makespan: 4.0,
                first_makespan: 5.0,
                trials: 8,
                best_trial: 3,
                parallelism: 1.75,
                time_us: 120,
            },
        ]
    }

    #[test]
    fn test_to_markdown() {
        let md = Reporter::to_markdown(&make_test_results());

        assert!(md.contains("# QSCHED Benchmark Results"));
        assert!(md.contains("| Name |"));
        assert!(md.contains("ghz_5q"));
        assert!(md.contains("fanout_search8"));
        assert!(md.contains("**Search Win Rate**: 100.0%"));
    }

    #[test]
    fn test_to_json() {
        let json = Reporter::to_json(&make_test_results());

        assert!(json.contains("\"statistics\""));
        assert!(json.contains("\"results\""));
        assert!(json.contains("\"latest\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["results"].as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_to_csv() {
        let csv = Reporter::to_csv(&make_test_results());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("name,mode,ops"));
        assert!(lines[1].starts_with("ghz_5q,earliest,5,5,4,5,5,1,0"));
    }

    #[test]
    fn test_to_text() {
        let text = Reporter::to_text(&make_test_results());

        assert!(text.contains("QSCHED Benchmark Results"));
        assert!(text.contains("[-1.00 by trial 3]"));
        assert!(!text.lines().any(|l| l.contains("ghz_5q") && l.contains("[-")));
    }

    #[test]
    fn test_report_dispatch() {
        let results = make_test_results();
        assert_eq!(
            Reporter::report(&results, ReportFormat::Csv),
            Reporter::to_csv(&results)
        );
        assert_eq!(
            Reporter::report(&results, ReportFormat::Text),
            Reporter::to_text(&results)
        );
    }

    #[test]
    fn test_comparison_report() {
        let results = make_test_results();
        let report = Reporter::comparison_report(&results[..1], &results[1..]);

        assert!(report.contains("# QSCHED Comparison Report"));
        assert!(report.contains("| Avg Makespan | 5.00 | 4.00 | -1.00 |"));
    }

    #[test]
    fn test_scaling_report() {
        let report = Reporter::scaling_report(&make_test_results());
        assert!(report.contains("| 5 | 5 | 4 | 5.00 | 40 | 8.00 |"));
    }

    #[test]
    fn test_empty_results() {
        let md = Reporter::to_markdown(&[]);
        assert!(md.contains("**Benchmarks**: 0"));
        assert_eq!(Reporter::to_csv(&[]).lines().count(), 1);
    }
}
