//! Progress reports.

use crate::{context::Ctx, log::LogLevel, search::Search};

/// Logs a progress report containing various useful statistics.
#[track_caller]
pub fn report(ctx: &Ctx, search: &Search) {
    let stats = &ctx.stats;
    ctx.logger.log(LogLevel::Info, |msg| {
        msg.add_message("dec:");
        msg.add_value(&format_args!("{:5}", stats.search.decisions));
        msg.add_message("cfl:");
        msg.add_value(&format_args!("{:5}", stats.search.conflicts));
        msg.add_message("flp:");
        msg.add_value(&format_args!("{:4}", stats.search.flips));
        msg.add_message("lvl:");
        msg.add_value(&format_args!("{:3}", search.frames().len()));
        msg.add_message("max:");
        msg.add_value(&format_args!("{:3}", stats.search.max_depth));

        let vars = search.formula.var_count();
        let assigned = search.formula.values().assigned_count();
        msg.add_message("var:");
        msg.add_value(&format_args!("{:3}", vars - assigned));
        msg.add_value(&format_args!("{}%", (vars - assigned) * 100 / vars.max(1)));

        let clauses = search.formula.clause_count();
        let live = clauses - search.formula.satisfied_count();
        msg.add_message("cls:");
        msg.add_value(&format_args!("{:3}", live));
        msg.add_value(&format_args!("{}%", live * 100 / clauses.max(1)));
    })
}
