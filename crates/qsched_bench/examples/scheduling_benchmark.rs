//! QSCHED Scheduling Benchmark
//!
//! Schedules generated workloads in both directions, then compares a single
//! deterministic pass against seeded randomized search.

use qsched_bench::prelude::*;
use qsched_core::DurationTable;
use qsched_schedule::SchedulingMode;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║                 QSCHED Scheduling Benchmark Report                   ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let seed = 42u64;
    let trials = 32usize;
    let generator = InstructionGenerator::with_seed(seed);

    println!("Configuration:");
    println!("  • Random seed: {}", seed);
    println!("  • Search trials: {}", trials);
    println!();

    // =========================================================================
    // Benchmark 1: Direction Comparison
    // =========================================================================
    println!("═══════════════════════════════════════════════════════════════════════");
    println!("  BENCHMARK 1: Earliest vs Latest (superconducting timings, ns)");
    println!("═══════════════════════════════════════════════════════════════════════\n");

    let mut timed = BenchSuite::with_seed(seed).with_durations(DurationTable::superconducting());
    let workloads = vec![
        ("ghz_8q", generator.ghz(8)),
        ("qft_6q", generator.qft_like(6)),
        ("layered_8q", generator.layered(8, 6)),
        ("random_8q", generator.random(8, 8)),
    ];

    println!("┌──────────────┬──────────┬──────┬───────┬────────────┬──────────┐");
    println!("│ Workload     │ Mode     │ Ops  │ Edges │ Makespan   │ Time(us) │");
    println!("├──────────────┼──────────┼──────┼───────┼────────────┼──────────┤");

    for (name, list) in &workloads {
        match timed.bench_modes(name, list) {
            Ok(results) => {
                for r in results {
                    println!(
                        "│ {:12} │ {:8} │ {:4} │ {:5} │ {:10.1} │ {:8} │",
                        name, r.mode, r.ops, r.edges, r.makespan, r.time_us
                    );
                }
            }
            Err(e) => println!("│ {:12} │ error: {}", name, e),
        }
    }

    println!("└──────────────┴──────────┴──────┴───────┴────────────┴──────────┘\n");

    // =========================================================================
    // Benchmark 2: Randomized Search
    // =========================================================================
    println!("═══════════════════════════════════════════════════════════════════════");
    println!("  BENCHMARK 2: Single Pass vs Randomized Search (unit timings)");
    println!("═══════════════════════════════════════════════════════════════════════\n");

    let mut suite = BenchSuite::with_seed(seed);
    let mut single_results = Vec::new();
    let mut search_results = Vec::new();

    for n in [4, 6, 8, 10] {
        let list = generator.commuting_fanout(n);
        match suite.bench_search(&format!("fanout_{}q", n), &list, SchedulingMode::Earliest, trials) {
            Ok((single, search)) => {
                single_results.push(single);
                search_results.push(search);
            }
            Err(e) => println!("fanout_{}q failed: {}", n, e),
        }
    }

    println!("{}", Reporter::comparison_report(&single_results, &search_results));
    println!("{}", Reporter::to_text(suite.results()));

    // =========================================================================
    // Benchmark 3: Resource Scaling
    // =========================================================================
    println!("═══════════════════════════════════════════════════════════════════════");
    println!("  BENCHMARK 3: Resource Scaling (GHZ)");
    println!("═══════════════════════════════════════════════════════════════════════\n");

    let mut scaling = BenchSuite::with_seed(seed);
    match scaling.run_qubit_scaling(16) {
        Ok(results) => println!("{}", Reporter::scaling_report(&results)),
        Err(e) => println!("scaling failed: {}", e),
    }
}
