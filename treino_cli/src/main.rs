use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use treino_core::*;

#[derive(Parser)]
#[command(name = "treino")]
#[command(about = "Training-plan decision engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Override the config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a workout plan from an assessment
    Assemble {
        /// Path to the assessment JSON file
        #[arg(long)]
        assessment: PathBuf,

        /// Optional rule set JSON; a matching rule's block selection is
        /// reported alongside the plan
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Run the schedule validator on the assembled plan; exits
        /// non-zero when the plan is structurally invalid
        #[arg(long)]
        check: bool,
    },

    /// Validate an assembled plan against the method's shape rules
    Validate {
        /// Path to the plan JSON file
        #[arg(long)]
        plan: PathBuf,
    },

    /// Select a training-block code for an assessment via the rule engine
    SelectBlock {
        #[arg(long)]
        assessment: PathBuf,

        #[arg(long)]
        rules: PathBuf,
    },

    /// Dry-run every rule with per-condition traces
    Explain {
        #[arg(long)]
        assessment: PathBuf,

        #[arg(long)]
        rules: PathBuf,
    },

    /// List the built-in exercise catalog
    Catalog,
}

/// Output shape of `assemble` when a rule set is supplied.
#[derive(Serialize)]
struct AssembleOutput {
    block_selection: Option<BlockSelection>,
    plan: WorkoutPlan,
}

fn main() -> ExitCode {
    // Default to warn so stdout stays clean JSON; RUST_LOG overrides.
    treino_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Assemble {
            assessment,
            rules,
            check,
        } => cmd_assemble(&assessment, rules.as_deref(), check, &config, cli.pretty),
        Commands::Validate { plan } => cmd_validate(&plan, cli.pretty),
        Commands::SelectBlock { assessment, rules } => {
            cmd_select_block(&assessment, &rules, cli.pretty)
        }
        Commands::Explain { assessment, rules } => {
            cmd_explain(&assessment, &rules, cli.pretty)
        }
        Commands::Catalog => cmd_catalog(cli.pretty),
    }
}

fn load_assessment(path: &Path) -> Result<Assessment> {
    let contents = std::fs::read_to_string(path)?;
    let assessment: Assessment = serde_json::from_str(&contents)?;
    tracing::debug!("Loaded assessment from {:?}", path);
    Ok(assessment)
}

fn load_rules(path: &Path) -> Result<RuleSet> {
    let contents = std::fs::read_to_string(path)?;
    let rule_set: RuleSet = serde_json::from_str(&contents)?;
    tracing::debug!("Loaded {} rules from {:?}", rule_set.rules.len(), path);
    Ok(rule_set)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

fn validated_catalog() -> Result<&'static Catalog> {
    let catalog = default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    Ok(catalog)
}

fn cmd_assemble(
    assessment_path: &Path,
    rules_path: Option<&Path>,
    check: bool,
    config: &Config,
    pretty: bool,
) -> Result<ExitCode> {
    let catalog = validated_catalog()?;
    let assessment = load_assessment(assessment_path)?;

    let plan = assemble_workout(Some(&assessment), catalog, &config.assembly)?;

    let report = validate_schedule(&plan);
    if check && !report.valid {
        for error in &report.errors {
            eprintln!("invalid schedule: {}", error);
        }
    }

    match rules_path {
        Some(path) => {
            let rule_set = load_rules(path)?;
            let block_selection = select_block(&assessment, &rule_set.rules);
            print_json(
                &AssembleOutput {
                    block_selection,
                    plan,
                },
                pretty,
            )?;
        }
        None => print_json(&plan, pretty)?,
    }

    if check && !report.valid {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(plan_path: &Path, pretty: bool) -> Result<ExitCode> {
    let contents = std::fs::read_to_string(plan_path)?;
    let plan: WorkoutPlan = serde_json::from_str(&contents)?;

    let report = validate_schedule(&plan);
    print_json(&report, pretty)?;

    if report.valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_select_block(
    assessment_path: &Path,
    rules_path: &Path,
    pretty: bool,
) -> Result<ExitCode> {
    let assessment = load_assessment(assessment_path)?;
    let rule_set = load_rules(rules_path)?;

    let selection = select_block(&assessment, &rule_set.rules);
    print_json(&selection, pretty)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_explain(assessment_path: &Path, rules_path: &Path, pretty: bool) -> Result<ExitCode> {
    let assessment = load_assessment(assessment_path)?;
    let rule_set = load_rules(rules_path)?;

    let traces = explain_all(&assessment, &rule_set.rules);
    print_json(&traces, pretty)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_catalog(pretty: bool) -> Result<ExitCode> {
    let catalog = validated_catalog()?;
    print_json(&catalog.exercises, pretty)?;
    Ok(ExitCode::SUCCESS)
}
