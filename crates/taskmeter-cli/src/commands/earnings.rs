use clap::Args;
use taskmeter_core::format::format_currency;
use taskmeter_core::{Config, Session};

#[derive(Args)]
pub struct EarningsArgs {
    /// Elapsed seconds for a task, as `ID=SECONDS` (repeatable)
    #[arg(long = "elapsed", value_parser = parse_elapsed)]
    elapsed: Vec<(u32, u64)>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn parse_elapsed(s: &str) -> Result<(u32, u64), String> {
    let (id, secs) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=SECONDS, got '{s}'"))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid task id '{id}'"))?;
    let secs = secs
        .trim()
        .parse()
        .map_err(|_| format!("invalid seconds '{secs}'"))?;
    Ok((id, secs))
}

pub fn run(args: EarningsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut session = Session::from_config(&config);

    for (id, secs) in &args.elapsed {
        if !session.record_elapsed(*id, *secs) {
            tracing::warn!(id, "ignoring elapsed time for unknown task");
        }
    }
    session.stop_all_and_compute_earnings()?;

    if args.json {
        if let Some(event) = session.earnings_event() {
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    } else if let Some(total) = session.total_earnings() {
        println!(
            "Total Earnings From This Session: {}",
            format_currency(total, &config.currency)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_elapsed_accepts_id_and_seconds() {
        assert_eq!(parse_elapsed("3=600"), Ok((3, 600)));
        assert_eq!(parse_elapsed(" 1 = 5 "), Ok((1, 5)));
    }

    #[test]
    fn parse_elapsed_rejects_malformed() {
        assert!(parse_elapsed("3:600").is_err());
        assert!(parse_elapsed("x=1").is_err());
        assert!(parse_elapsed("1=-5").is_err());
    }
}
