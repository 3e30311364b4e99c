//! ledger commands - init, query, query-all, vote, invoke, tally

use crate::cli::Context;
use crate::contract::Function;
use crate::core::dataset::SEED_COUNT;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Seed the voter roll.
pub fn init(ctx: &Context) -> Result<()> {
    let contract = ctx.open_contract()?;
    contract.invoke(Function::InitLedger.name(), &[])?;

    output::success(
        format!(
            "Seeded {} voters (policy: {})",
            SEED_COUNT,
            contract.seed_policy()
        ),
        ctx.verbosity(),
    );
    Ok(())
}

/// Print the record stored at `key`. Prints nothing for a missing key.
pub fn query(ctx: &Context, key: &str) -> Result<()> {
    let contract = ctx.open_contract()?;
    let payload = contract.invoke(Function::QueryVoter.name(), &[key.to_string()])?;

    if payload.is_empty() {
        output::debug(format!("no record at {}", key), ctx.verbosity());
    } else {
        output::payload(&payload);
    }
    Ok(())
}

/// Print every record in the roll.
pub fn query_all(ctx: &Context, pretty: bool) -> Result<()> {
    let contract = ctx.open_contract()?;
    let payload = contract.invoke(Function::QueryAllVotes.name(), &[])?;

    if pretty {
        let value: serde_json::Value =
            serde_json::from_slice(&payload).context("Scan output is not valid JSON")?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        output::payload(&payload);
    }
    Ok(())
}

/// Cast a vote.
pub fn vote(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let contract = ctx.open_contract()?;
    contract.invoke(
        Function::DoVoting.name(),
        &[key.to_string(), value.to_string()],
    )?;

    output::success(format!("Vote recorded for {}", key), ctx.verbosity());
    Ok(())
}

/// Dispatch a function by name with raw arguments.
pub fn invoke(ctx: &Context, function: &str, args: &[String]) -> Result<()> {
    let contract = ctx.open_contract()?;
    let payload = contract.invoke(function, args)?;

    if !payload.is_empty() {
        output::payload(&payload);
    }
    Ok(())
}

/// Print vote counts by value.
pub fn tally(ctx: &Context) -> Result<()> {
    let contract = ctx.open_contract()?;
    let tally = contract.tally()?;

    let lines: Vec<String> = tally
        .counts
        .iter()
        .map(|(value, count)| format!("{}: {}", value, count))
        .collect();
    if !lines.is_empty() {
        println!("{}", output::format_list(&lines, ""));
    }
    println!("unvoted: {}", tally.unvoted);

    output::print(
        format!(
            "{} of {} voters have voted",
            tally.total_cast(),
            tally.total_voters()
        ),
        ctx.verbosity(),
    );
    Ok(())
}
