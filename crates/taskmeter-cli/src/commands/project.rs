use clap::Args;
use rust_decimal::Decimal;
use taskmeter_core::format::{format_currency, format_projection};
use taskmeter_core::{project_future_value, Config, ProjectionParams, ProjectionRecord};

use crate::render::projection_caption;

#[derive(Args)]
pub struct ProjectArgs {
    /// Amount earned per day
    #[arg(long, allow_negative_numbers = true)]
    principal: Decimal,
    /// Investment duration in years [default: from config]
    #[arg(long)]
    years: Option<u32>,
    /// Daily compound interest in percent [default: from config]
    #[arg(long, allow_negative_numbers = true)]
    rate: Option<Decimal>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ProjectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let defaults = config.projection_params();
    let params = ProjectionParams::new(
        args.years.unwrap_or(defaults.years),
        args.rate.unwrap_or(defaults.daily_rate_pct),
    );

    if args.principal <= Decimal::ZERO {
        eprintln!("nothing to project: principal must be positive");
        return Ok(());
    }

    let record = ProjectionRecord {
        principal: args.principal,
        params,
        outcome: project_future_value(args.principal, &params),
    };

    if args.json {
        let value = match &record.outcome {
            Ok(v) => serde_json::json!({
                "principal": record.principal,
                "years": params.years,
                "daily_rate_pct": params.daily_rate_pct,
                "periods": v.periods,
                "compounded": v.compounded,
                "value": v.digits(),
            }),
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!(
            "Principal: {}",
            format_currency(record.principal, &config.currency)
        );
        println!("{}", projection_caption(&record));
        println!("{}", format_projection(&record.outcome, &config.currency));
    }
    Ok(())
}
