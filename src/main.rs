use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use pmkit::client::ApiClient;
use pmkit::config::{DatabaseArgs, RemoteArgs, ServeArgs, ServerConfig};
use pmkit::export::ExportFormat;
use pmkit::growth::{
    self, AbTestInput, ActivationInput, ChurnReductionInput, FunnelInput, FunnelStageInput,
    ReferralInput, RetentionCurveInput, ViralLoopInput,
};
use pmkit::models::{CohortInput, DocumentKind, StickinessInput};
use pmkit::{api, mcp};

#[derive(Parser)]
#[command(name = "pmkit")]
#[command(about = "Product management toolkit: PM documents, cohort dashboards and growth calculators")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Server options used when no subcommand is given
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the pmkit HTTP server
    Serve(ServeArgs),
    /// Start MCP server via stdio
    Mcp {
        #[command(flatten)]
        database: DatabaseArgs,
    },
    /// Check server status
    Status {
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Users on a server
    User {
        #[command(subcommand)]
        action: UserCommand,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Cohort retention records on a server
    Cohorts {
        #[command(subcommand)]
        action: CohortCommand,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// DAU/MAU stickiness snapshots on a server
    Stickiness {
        #[command(subcommand)]
        action: StickinessCommand,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Export a PRD or UAT form
    Export {
        #[arg(value_enum)]
        kind: DocumentArg,
        id: Uuid,
        #[arg(short, long, value_enum, default_value_t = FormatArg::Doc)]
        format: FormatArg,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Growth calculators (computed locally)
    Calc {
        #[command(subcommand)]
        formula: CalcCommand,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    /// Register an email (idempotent)
    Register { email: String },
    /// Show the acting user
    Me,
}

#[derive(Subcommand)]
enum CohortCommand {
    /// List saved cohorts
    List,
    /// Save a cohort
    Add {
        /// Cohort start date (YYYY-MM-DD)
        date: String,
        total_users: i64,
        retained_users: i64,
    },
    /// Retention rate, change and recommendation per cohort
    Analyze,
}

#[derive(Subcommand)]
enum StickinessCommand {
    /// List saved snapshots
    List,
    /// Save a snapshot
    Add {
        /// Analysis date (YYYY-MM-DD)
        date: String,
        dau: i64,
        mau: i64,
    },
    /// DAU/MAU ratio, change and recommendation per snapshot
    Analyze,
}

#[derive(Subcommand)]
enum CalcCommand {
    /// total = initial * multiplier ^ cycles
    Referral {
        initial_users: u64,
        multiplier: f64,
        cycles: u32,
    },
    /// Viral loop with k-factor = invites * conversion
    ViralLoop {
        initial_users: u64,
        invites_per_user: f64,
        conversion_rate: f64,
        cycles: u32,
    },
    /// Funnel attrition, stages given as NAME:RATE
    Funnel {
        visitors: u64,
        #[arg(value_parser = parse_stage, required = true)]
        stages: Vec<FunnelStageInput>,
    },
    /// Users retained per period at a constant churn rate
    Retention {
        users: u64,
        churn_rate: f64,
        periods: u32,
    },
    /// Churn after habit/personalization/re-engagement work
    Churn {
        base_churn_rate: f64,
        habit_score: f64,
        personalization_score: f64,
        reengagement_score: f64,
    },
    /// Activation rate from sign-up complexity
    Activation {
        signup_steps: u32,
        required_fields: u32,
        #[arg(long)]
        social_login: bool,
    },
    /// Simulated A/B test
    AbTest {
        control_rate: f64,
        variant_rate: f64,
        sample_size: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DocumentArg {
    Prd,
    Uat,
}

impl From<DocumentArg> for DocumentKind {
    fn from(arg: DocumentArg) -> Self {
        match arg {
            DocumentArg::Prd => DocumentKind::Prd,
            DocumentArg::Uat => DocumentKind::Uat,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Doc,
    Markdown,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Doc => ExportFormat::Doc,
            FormatArg::Markdown => ExportFormat::Markdown,
        }
    }
}

fn parse_stage(raw: &str) -> Result<FunnelStageInput, String> {
    let (name, rate) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:RATE, got '{raw}'"))?;
    let rate = rate
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid rate in '{raw}': {e}"))?;
    Ok(FunnelStageInput {
        name: name.trim().to_string(),
        rate,
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn serve(args: &ServeArgs) -> anyhow::Result<()> {
    let config = ServerConfig::from(args);
    tracing::info!("Starting pmkit server on {}", config.addr());

    let db = args.database.open()?;
    let app = api::create_router(api::AppState::new(db, &config));

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.addr()))?;
    tracing::info!("pmkit server listening on http://{}", config.addr());

    axum::serve(listener, app).await?;
    Ok(())
}

fn calc(formula: CalcCommand) -> anyhow::Result<()> {
    match formula {
        CalcCommand::Referral {
            initial_users,
            multiplier,
            cycles,
        } => print_json(&growth::referral_growth(&ReferralInput {
            initial_users,
            multiplier,
            cycles,
        })?),
        CalcCommand::ViralLoop {
            initial_users,
            invites_per_user,
            conversion_rate,
            cycles,
        } => print_json(&growth::viral_loop(&ViralLoopInput {
            initial_users,
            invites_per_user,
            conversion_rate,
            cycles,
        })?),
        CalcCommand::Funnel { visitors, stages } => {
            print_json(&growth::simulate_funnel(&FunnelInput { visitors, stages })?)
        }
        CalcCommand::Retention {
            users,
            churn_rate,
            periods,
        } => print_json(&growth::retention_curve(&RetentionCurveInput {
            users,
            churn_rate,
            periods,
        })?),
        CalcCommand::Churn {
            base_churn_rate,
            habit_score,
            personalization_score,
            reengagement_score,
        } => print_json(&growth::churn_reduction(&ChurnReductionInput {
            base_churn_rate,
            habit_score,
            personalization_score,
            reengagement_score,
        })?),
        CalcCommand::Activation {
            signup_steps,
            required_fields,
            social_login,
        } => print_json(&growth::activation_rate(&ActivationInput {
            signup_steps,
            required_fields,
            social_login,
        })?),
        CalcCommand::AbTest {
            control_rate,
            variant_rate,
            sample_size,
        } => print_json(&growth::simulate_ab_test(&AbTestInput {
            control_rate,
            variant_rate,
            sample_size,
        })?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays free for command output and MCP.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "pmkit=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => serve(&args).await?,
        Some(Commands::Mcp { database }) => {
            let db = database.open()?;
            mcp::run_stdio_server(db).await?;
        }
        Some(Commands::Status { remote }) => {
            let client = ApiClient::new(&remote.server, remote.email);
            match client.health().await {
                Ok(health) => println!("pmkit server at {} is up: {}", remote.server, health),
                Err(err) => println!(
                    "pmkit server at {} is not reachable: {:#}",
                    remote.server, err
                ),
            }
        }
        Some(Commands::User { action, remote }) => {
            let client = ApiClient::new(&remote.server, remote.email);
            match action {
                UserCommand::Register { email } => print_json(&client.register(&email).await?)?,
                UserCommand::Me => print_json(&client.current_user().await?)?,
            }
        }
        Some(Commands::Cohorts { action, remote }) => {
            let client = ApiClient::new(&remote.server, remote.email);
            match action {
                CohortCommand::List => print_json(&client.list_cohorts().await?)?,
                CohortCommand::Add {
                    date,
                    total_users,
                    retained_users,
                } => {
                    let input = CohortInput {
                        cohort_date: Some(date),
                        total_users: Some(total_users),
                        retained_users: Some(retained_users),
                    };
                    input.validate()?;
                    print_json(&client.create_cohort(&input).await?)?;
                }
                CohortCommand::Analyze => print_json(&client.cohort_analysis().await?)?,
            }
        }
        Some(Commands::Stickiness { action, remote }) => {
            let client = ApiClient::new(&remote.server, remote.email);
            match action {
                StickinessCommand::List => print_json(&client.list_stickiness().await?)?,
                StickinessCommand::Add { date, dau, mau } => {
                    let input = StickinessInput {
                        analysis_date: Some(date),
                        dau: Some(dau),
                        mau: Some(mau),
                    };
                    input.validate()?;
                    print_json(&client.create_stickiness(&input).await?)?;
                }
                StickinessCommand::Analyze => print_json(&client.stickiness_analysis().await?)?,
            }
        }
        Some(Commands::Export {
            kind,
            id,
            format,
            out,
            remote,
        }) => {
            let client = ApiClient::new(&remote.server, remote.email);
            let body = client
                .export_document(kind.into(), id, format.into())
                .await?;
            match out {
                Some(path) => {
                    std::fs::write(&path, body)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Exported document to {}", path.display());
                }
                None => print!("{body}"),
            }
        }
        Some(Commands::Calc { formula }) => calc(formula)?,
        // Default: start server
        None => serve(&cli.serve).await?,
    }

    Ok(())
}
