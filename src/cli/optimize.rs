//! Capacity optimization commands (min-capacity, min-cost)

use anyhow::Result;

use super::output::Output;
use crate::search::capacity::{
    minimum_capacity, minimum_cost, CapacityOutcome, CapacityQuery, CostOutcome, CostQuery,
};
use crate::search::CapacityScheme;
use crate::storage::ProblemFile;

/// Smallest per-channel capacity meeting the deadline
pub fn min_capacity(output: &Output, problem: &ProblemFile, query: &CapacityQuery) -> Result<()> {
    output.verbose_ctx(
        "min-capacity",
        &format!(
            "{} tasks, {} channel(s), deadline {}, {} sharing, {}",
            problem.graph.len(),
            query.channels,
            query.deadline,
            query.policy,
            query.algorithm
        ),
    );

    let report = minimum_capacity(&problem.graph, query)?;
    output.verbose_ctx(
        "min-capacity",
        &format!("{} attempts, {} nodes expanded", report.attempts, report.nodes_expanded),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "channels": query.channels,
            "deadline": query.deadline,
            "sharing": query.policy,
            "algorithm": query.algorithm,
            "result": report,
        }));
        return Ok(());
    }

    match &report.outcome {
        CapacityOutcome::Found {
            capacity,
            day,
            schedule,
        } => {
            println!(
                "Minimum capacity: {} per channel (done on day {}, {} attempts)",
                capacity, day, report.attempts
            );
            let scheme = CapacityScheme::uniform(query.channels, *capacity)?;
            output.schedule(&scheme, schedule);
        }
        CapacityOutcome::Impossible { reason } => {
            println!("No capacity meets a {}-day deadline.", query.deadline);
            if let Some(reason) = reason {
                println!("Reason: {}", reason);
            }
        }
    }

    Ok(())
}

/// Cheapest even/odd capacity pair meeting the deadline
pub fn min_cost(output: &Output, problem: &ProblemFile, query: &CostQuery) -> Result<()> {
    output.verbose_ctx(
        "min-cost",
        &format!(
            "{} tasks, deadline {}, unit costs {}/{}, {} sharing, {}",
            problem.graph.len(),
            query.deadline,
            query.even_unit_cost,
            query.odd_unit_cost,
            query.policy,
            query.algorithm
        ),
    );

    let report = minimum_cost(&problem.graph, query)?;
    output.verbose_ctx(
        "min-cost",
        &format!(
            "{} pairs searched, {} skipped, {} nodes expanded",
            report.candidates_evaluated, report.candidates_skipped, report.nodes_expanded
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "deadline": query.deadline,
            "even_unit_cost": query.even_unit_cost,
            "odd_unit_cost": query.odd_unit_cost,
            "sharing": query.policy,
            "algorithm": query.algorithm,
            "result": report,
        }));
        return Ok(());
    }

    match &report.outcome {
        CostOutcome::Found {
            even_capacity,
            odd_capacity,
            cost,
            day,
            schedule,
        } => {
            println!(
                "Cheapest scheme: even {}, odd {}, cost {} (done on day {})",
                even_capacity, odd_capacity, cost, day
            );
            println!(
                "Searched {} pair(s), skipped {}",
                report.candidates_evaluated, report.candidates_skipped
            );
            output.schedule(&CapacityScheme::per_class(*even_capacity, *odd_capacity), schedule);
        }
        CostOutcome::Impossible { reason } => {
            println!("No capacity pair meets a {}-day deadline.", query.deadline);
            if let Some(reason) = reason {
                println!("Reason: {}", reason);
            }
        }
    }

    Ok(())
}
