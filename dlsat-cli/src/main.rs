use std::{
    fs::File,
    io::{Read, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use dlsat::{
    lit::Lit,
    log::{info, LogLevel},
    solver::{Solver, Verdict},
};
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
struct Args {
    /// Input formula in DIMACS CNF format.
    input_file: PathBuf,

    /// File receiving the satisfying assignment, or `0` if there is none.
    output_file: PathBuf,

    /// Make output more verbose (use multiple times for more verbose output).
    #[clap(long, short = 'v', parse(from_occurrences))]
    verbose: u8,

    /// Make output less verbose.
    #[clap(long, short = 'q', parse(from_occurrences), conflicts_with = "verbose")]
    quiet: u8,

    /// Include originating source locations in log messages.
    #[clap(long)]
    log_src: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let start = std::time::Instant::now();

    let mut solver = Solver::default();

    match (args.verbose, args.quiet) {
        (0, 0) => solver.ctx.logger.set_log_level(Some(LogLevel::Info)),
        (1, _) => solver.ctx.logger.set_log_level(Some(LogLevel::Verbose)),
        (2, _) => solver.ctx.logger.set_log_level(Some(LogLevel::Debug)),
        (_, 0) => solver.ctx.logger.set_log_level(Some(LogLevel::Trace)),
        _ => solver.ctx.logger.set_log_level(None),
    }

    solver.ctx.logger.log_source_locations(args.log_src);

    info!(solver, "dlsat DPLL SAT Solver");

    let input = File::open(&args.input_file)
        .with_context(|| format!("failed to open {}", args.input_file.display()))?;
    load_formula(&mut solver, input)?;

    info!(
        solver,
        vars = solver.var_count(),
        clauses = solver.clause_count()
    );

    let verdict = solver.solve()?;

    let duration = start.elapsed();
    let duration_secs = duration.as_secs_f64();

    info!(solver, satisfiable = verdict.is_satisfiable(), = duration);
    info!(
        solver,
        decisions = solver.ctx.stats.search.decisions,
        flips = solver.ctx.stats.search.flips,
        max_depth = solver.ctx.stats.search.max_depth,
    );
    info!(
        solver,
        conflicts = solver.ctx.stats.search.conflicts,
        per_sec = (solver.ctx.stats.search.conflicts as f64 / duration_secs),
    );
    info!(
        solver,
        propagations = solver.ctx.stats.prop.propagations,
        per_sec = solver.ctx.stats.prop.propagations as f64 / duration_secs,
    );

    if verdict.is_satisfiable() {
        println!("s SATISFIABLE");
    } else {
        println!("s UNSATISFIABLE");
    }

    let output = File::create(&args.output_file)
        .with_context(|| format!("failed to create {}", args.output_file.display()))?;
    write_verdict(output, &verdict)
        .with_context(|| format!("failed to write {}", args.output_file.display()))?;

    Ok(())
}

/// Reads a DIMACS CNF formula into the solver.
///
/// Without a `p cnf` header the variable count is the largest variable used.
fn load_formula(solver: &mut Solver, input: impl Read) -> anyhow::Result<()> {
    let mut input = flussab_cnf::cnf::Parser::<Lit>::from_read(
        input,
        flussab_cnf::cnf::Config::default(),
    )?;

    let header_var_count = input.header().map(|header| header.var_count);
    let mut max_var_count = 0;

    while let Some(clause) = input.next_clause()? {
        if let Some(max_index) = clause.iter().map(|lit| lit.index()).max() {
            max_var_count = max_var_count.max(max_index + 1);
        }
        solver.add_clause(clause);
    }

    solver.set_var_count(header_var_count.unwrap_or(max_var_count));
    Ok(())
}

/// Writes the model as signed DIMACS literals on a single line, or `0` if there is none.
fn write_verdict(output: impl Write, verdict: &Verdict) -> std::io::Result<()> {
    let mut target = flussab::DeferredWriter::from_write(output);

    match verdict {
        Verdict::Satisfiable(model) => {
            for (position, lit) in model.lits().enumerate() {
                if position > 0 {
                    target.write_all_defer_err(b" ");
                }
                flussab::write::text::ascii_digits(&mut target, lit.dimacs());
            }
        }
        Verdict::Unsatisfiable => target.write_all_defer_err(b"0"),
    }
    target.write_all_defer_err(b"\n");

    target.flush_defer_err();
    target.check_io_error()
}
