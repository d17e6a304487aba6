//! Retirement Planner CLI
//!
//! Command-line interface for projecting a retirement corpus

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use retirement_planner::plan::{load_plan_json, load_plans_csv};
use retirement_planner::report::{render_table, write_csv_path};
use retirement_planner::{
    project, AdviceConfig, AdviceOutcome, AdviceSession, HttpAdviceClient, JsonFileStore, PlanField,
    PlanStore, RawPlan, RetirementPlan, ScenarioRunner,
};

/// Project a retirement corpus year by year
#[derive(Parser)]
#[command(name = "retirement-planner", version, about = "Project a retirement corpus year by year")]
struct Cli {
    /// Saved plan file (defaults to the user data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a plan and print its yearly projection
    Project {
        #[command(flatten)]
        plan: PlanArgs,

        /// Also write the entries to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the projection as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the projection, then ask the advice service about the plan
    Advise {
        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Validate a plan and save it for later runs
    Save {
        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Show the saved plan
    Show,

    /// Forget the saved plan
    Reset,

    /// Project every plan in a CSV file (one plan per row)
    Batch {
        /// CSV file with the plan field names as headers
        input: PathBuf,
    },
}

/// Plan fields; values are validated, not parsed, by the CLI
#[derive(Args)]
struct PlanArgs {
    /// JSON file with plan fields (applied over the saved plan or defaults)
    #[arg(long)]
    plan_file: Option<PathBuf>,

    /// Inflation rate (%)
    #[arg(long)]
    inflation_rate: Option<String>,

    /// Retirement corpus (Lacs)
    #[arg(long)]
    retirement_corpus: Option<String>,

    /// Debt fund yield (%)
    #[arg(long)]
    debt_fund_yield: Option<String>,

    /// Passive MF yield (%)
    #[arg(long)]
    passive_mf_yield: Option<String>,

    /// Hybrid MF yield (%)
    #[arg(long)]
    hybrid_mf_yield: Option<String>,

    /// Planning horizon (years)
    #[arg(long)]
    years_planned: Option<String>,

    /// Debt fund allocation (%)
    #[arg(long)]
    debt_fund_allocation: Option<String>,

    /// Passive MF allocation (%)
    #[arg(long)]
    passive_mf_allocation: Option<String>,

    /// Hybrid MF allocation (%)
    #[arg(long)]
    hybrid_mf_allocation: Option<String>,

    /// Yearly expenses (Lacs)
    #[arg(long)]
    yearly_expenses: Option<String>,
}

impl PlanArgs {
    fn overrides(&self) -> RawPlan {
        let flags = [
            (PlanField::InflationRate, &self.inflation_rate),
            (PlanField::RetirementCorpus, &self.retirement_corpus),
            (PlanField::DebtFundYield, &self.debt_fund_yield),
            (PlanField::PassiveMFYield, &self.passive_mf_yield),
            (PlanField::HybridMFYield, &self.hybrid_mf_yield),
            (PlanField::YearsPlanned, &self.years_planned),
            (PlanField::DebtFundAllocation, &self.debt_fund_allocation),
            (PlanField::PassiveMFAllocation, &self.passive_mf_allocation),
            (PlanField::HybridMFAllocation, &self.hybrid_mf_allocation),
            (PlanField::YearlyExpenses, &self.yearly_expenses),
        ];

        let mut raw = RawPlan::new();
        for (field, value) in flags {
            if let Some(value) = value {
                raw.set(field, value.as_str());
            }
        }
        raw
    }

    /// Layering: saved plan (or defaults), then plan file, then flags
    fn resolve(&self, store: &JsonFileStore) -> Result<RawPlan> {
        let mut raw = match store.load_validated().context("Failed to read saved plan")? {
            Some(saved) => RawPlan::from(&saved),
            None => RawPlan::defaults(),
        };
        if let Some(path) = &self.plan_file {
            let file_plan = load_plan_json(path)
                .with_context(|| format!("Failed to load plan file {}", path.display()))?;
            raw.merge(&file_plan);
        }
        raw.merge(&self.overrides());
        Ok(raw)
    }

    fn validated(&self, store: &JsonFileStore) -> Result<RetirementPlan> {
        validate_or_report(&self.resolve(store)?)
    }
}

/// Print field errors and fail, or return the plan
fn validate_or_report(raw: &RawPlan) -> Result<RetirementPlan> {
    match raw.validate() {
        Ok(plan) => Ok(plan),
        Err(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("  {} ({}): {}", field.label(), field, message);
            }
            bail!("{}", errors)
        }
    }
}

fn print_plan(plan: &RetirementPlan) {
    for field in PlanField::ALL {
        println!("  {:<26} {}", field.label(), plan.value(field));
    }
}

fn print_projection(plan: &RetirementPlan) {
    let result = project(plan);
    println!("Projection over {} years:\n", plan.years_planned());
    print!("{}", render_table(&result));
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let store = match cli.store {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::default_location()?,
    };

    match cli.command {
        Command::Project { plan, csv, json } => {
            let plan = plan.validated(&store)?;
            let result = project(&plan);

            if json {
                let output = serde_json::json!({
                    "projection": result.entries(),
                    "summary": result.summary(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Projection over {} years:\n", plan.years_planned());
                print!("{}", render_table(&result));
            }

            if let Some(path) = csv {
                write_csv_path(&result, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote projection CSV to {}", path.display());
                println!("\nFull results written to: {}", path.display());
            }
        }

        Command::Advise { plan } => {
            let plan = plan.validated(&store)?;
            print_projection(&plan);

            let client = HttpAdviceClient::from_config(&AdviceConfig::from_env())?;
            let session = AdviceSession::new(Arc::new(client));

            println!("\nGetting advice...");
            match session.request(plan).outcome().await {
                AdviceOutcome::Advice(text) => println!("\nPersonalized Advice:\n\n{}", text),
                AdviceOutcome::Failed(err) => {
                    eprintln!("\nCould not fetch advice. Please try again later. ({})", err);
                }
                AdviceOutcome::Superseded => {}
            }
        }

        Command::Save { plan } => {
            let plan = plan.validated(&store)?;
            store
                .save(&RawPlan::from(&plan))
                .with_context(|| format!("Failed to save plan to {}", store.path().display()))?;
            println!("Plan saved to {}", store.path().display());
        }

        Command::Show => match store.load_validated()? {
            Some(plan) => {
                println!("Saved plan ({}):", store.path().display());
                print_plan(&plan);
            }
            None => println!("No saved plan; defaults apply."),
        },

        Command::Reset => {
            store.clear()?;
            println!("Plan reset; defaults apply.");
            print_plan(&validate_or_report(&RawPlan::defaults())?);
        }

        Command::Batch { input } => {
            let rows = load_plans_csv(&input)
                .with_context(|| format!("Failed to load plans from {}", input.display()))?;

            let mut row_numbers = Vec::new();
            let mut plans = Vec::new();
            for (index, row) in rows.into_iter().enumerate() {
                match row {
                    Ok(plan) => {
                        row_numbers.push(index + 1);
                        plans.push(plan);
                    }
                    Err(errors) => {
                        eprintln!("Row {}: {}", index + 1, errors);
                        for (field, message) in errors.iter() {
                            eprintln!("  {}: {}", field, message);
                        }
                    }
                }
            }
            info!("Projecting {} valid plan(s) from {}", plans.len(), input.display());
            let results = ScenarioRunner::run_batch(&plans);

            println!("{:>4} {:>6} {:>16} {:>10}", "Row", "Years", "Final (L)", "Depleted");
            for ((row, plan), result) in row_numbers.iter().zip(&plans).zip(&results) {
                let summary = result.summary();
                let depleted = summary
                    .depletion_year
                    .map(|y| format!("year {}", y))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>4} {:>6} {:>16.2} {:>10}",
                    row,
                    plan.years_planned(),
                    summary.final_balance,
                    depleted
                );
            }
        }
    }

    Ok(())
}
