//! Schedule commands (enumerate, earliest, compare)

use anyhow::Result;

use super::app::EnumerationStrategy;
use super::output::Output;
use crate::search::bfs::{self, EnumerateOptions};
use crate::search::{
    dfs, solve, Algorithm, CapacityScheme, Outcome, Problem, SearchReport, SharingPolicy,
};
use crate::storage::ProblemFile;

/// Parameters of `dayplan enumerate`
#[derive(Debug, Clone, Copy)]
pub struct EnumerateRequest {
    pub days: u32,
    pub sharing: SharingPolicy,
    pub strategy: EnumerationStrategy,
    pub idle: bool,
    pub limit: Option<usize>,
}

fn describe_scheme(scheme: &CapacityScheme) -> String {
    let capacities: Vec<String> = scheme
        .channels()
        .iter()
        .map(|c| c.capacity.to_string())
        .collect();
    let mut text = format!("{} channel(s), capacity {}", scheme.len(), capacities.join("/"));
    if let Some(limit) = scheme.tasks_per_day() {
        text.push_str(&format!(", at most {} task(s) per day", limit));
    }
    text
}

/// List every schedule that finishes within the day bound
pub fn enumerate(
    output: &Output,
    problem: &ProblemFile,
    scheme: &CapacityScheme,
    request: &EnumerateRequest,
) -> Result<()> {
    let query = Problem::new(&problem.graph, scheme, request.sharing);
    output.verbose_ctx(
        "enumerate",
        &format!(
            "{} tasks, {}, {} days, strategy {:?}",
            problem.graph.len(),
            describe_scheme(scheme),
            request.days,
            request.strategy
        ),
    );

    let options = EnumerateOptions::new(request.days)
        .with_idle(request.idle)
        .with_limit(request.limit);
    let result = match request.strategy {
        EnumerationStrategy::Bfs => bfs::enumerate(query, options),
        EnumerationStrategy::Dfs => dfs::enumerate(query, options),
    };

    output.verbose_ctx(
        "enumerate",
        &format!("Expanded {} nodes", result.nodes_expanded),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "sharing": request.sharing,
            "days": request.days,
            "schedules": result.schedules,
            "nodes_expanded": result.nodes_expanded,
            "truncated": result.truncated,
        }));
        return Ok(());
    }

    if result.schedules.is_empty() {
        println!("No schedule finishes within {} day(s).", request.days);
        return Ok(());
    }

    println!("Schedules ({}):", result.schedules.len());
    for (i, schedule) in result.schedules.iter().enumerate() {
        output.blank();
        println!("Schedule {} (done on day {}):", i + 1, schedule.last_day().unwrap_or(1));
        output.schedule(scheme, schedule);
    }
    if result.truncated {
        output.blank();
        println!("Stopped after {} schedules.", result.schedules.len());
    }

    Ok(())
}

fn print_report(
    output: &Output,
    scheme: &CapacityScheme,
    algorithm: Algorithm,
    report: &SearchReport,
) {
    match &report.outcome {
        Outcome::Solved { day, schedule } => {
            println!(
                "Earliest completion: day {} ({}, {} nodes expanded)",
                day, algorithm, report.nodes_expanded
            );
            output.schedule(scheme, schedule);
        }
        Outcome::NoSolution { max_day } => {
            println!(
                "No schedule finishes within {} day(s) ({}, {} nodes expanded)",
                max_day, algorithm, report.nodes_expanded
            );
        }
        Outcome::Infeasible { reason } => println!("Infeasible: {}", reason),
    }
}

/// Find the earliest completion day with one strategy
pub fn earliest(
    output: &Output,
    problem: &ProblemFile,
    scheme: &CapacityScheme,
    sharing: SharingPolicy,
    algorithm: Algorithm,
    max_day: Option<u32>,
) -> Result<()> {
    let query = Problem::new(&problem.graph, scheme, sharing);
    let max_day = max_day.unwrap_or_else(|| query.default_horizon());
    output.verbose_ctx(
        "earliest",
        &format!(
            "{} tasks, {}, {} sharing, {} up to day {}",
            problem.graph.len(),
            describe_scheme(scheme),
            sharing,
            algorithm,
            max_day
        ),
    );

    let report = solve(query, algorithm, max_day);

    if output.is_json() {
        output.data(&serde_json::json!({
            "algorithm": algorithm,
            "sharing": sharing,
            "scheme": scheme,
            "result": report,
        }));
    } else {
        print_report(output, scheme, algorithm, &report);
    }

    Ok(())
}

/// Run every strategy on the same query and show them side by side
pub fn compare(
    output: &Output,
    problem: &ProblemFile,
    scheme: &CapacityScheme,
    sharing: SharingPolicy,
    max_day: Option<u32>,
) -> Result<()> {
    let query = Problem::new(&problem.graph, scheme, sharing);
    let max_day = max_day.unwrap_or_else(|| query.default_horizon());

    let reports: Vec<(Algorithm, SearchReport)> = Algorithm::ALL
        .into_iter()
        .map(|algorithm| {
            output.verbose_ctx("compare", &format!("Running {}", algorithm));
            (algorithm, solve(query, algorithm, max_day))
        })
        .collect();

    if output.is_json() {
        let items: Vec<_> = reports
            .iter()
            .map(|(algorithm, report)| {
                serde_json::json!({
                    "algorithm": algorithm,
                    "result": report,
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "sharing": sharing,
            "scheme": scheme,
            "max_day": max_day,
            "results": items,
        }));
        return Ok(());
    }

    println!("{:<10} {:<8} NODES", "ALGORITHM", "DAY");
    println!("{}", "-".repeat(30));
    for (algorithm, report) in &reports {
        let day = match &report.outcome {
            Outcome::Solved { day, .. } => day.to_string(),
            Outcome::NoSolution { .. } => "none".to_string(),
            Outcome::Infeasible { .. } => "-".to_string(),
        };
        println!("{:<10} {:<8} {}", algorithm.as_str(), day, report.nodes_expanded);
    }

    if let Some((_, report)) = reports.iter().find(|(_, r)| r.is_solved()) {
        if let Some(schedule) = report.schedule() {
            output.blank();
            println!("Schedule:");
            output.schedule(scheme, schedule);
        }
    } else if let Some((
        _,
        SearchReport {
            outcome: Outcome::Infeasible { reason },
            ..
        },
    )) = reports.first()
    {
        output.blank();
        println!("Infeasible: {}", reason);
    }

    Ok(())
}
