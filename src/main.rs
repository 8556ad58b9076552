use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use planwright::{
    zip_reports, ArtifactDir, ChatClient, ChatConfig, ExportFormat, Language, NewUser,
    RenderConfig, ReportBuilder, Store,
};

#[derive(Parser)]
#[command(name = "planwright")]
#[command(author, version, about = "Business-idea to strategy-report pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a strategy report from a business idea
    Generate {
        /// The business idea text
        #[arg(short, long)]
        idea: Option<String>,

        /// Read the business idea from a file instead
        #[arg(long, conflicts_with = "idea")]
        idea_file: Option<PathBuf>,

        /// Report language (en or nl)
        #[arg(short, long, default_value = "en")]
        language: Language,

        /// Account the report is generated for
        #[arg(short, long)]
        username: String,

        /// SQLite database path
        #[arg(long, default_value = "planwright.db")]
        db: PathBuf,

        /// Directory for the generated txt/pdf artifacts
        #[arg(long, default_value = "generated_files")]
        out_dir: PathBuf,

        /// Optional JPEG cover logo
        #[arg(long)]
        logo: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List stored reports
    History {
        /// Restrict to one owner's reports
        #[arg(short, long)]
        username: Option<String>,

        /// SQLite database path
        #[arg(long, default_value = "planwright.db")]
        db: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Export stored reports as a zip archive
    Export {
        /// Output zip path
        #[arg(short, long)]
        output: PathBuf,

        /// Which artifact to pack (pdf or txt)
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,

        /// Restrict to one owner's reports
        #[arg(short, long)]
        username: Option<String>,

        /// SQLite database path
        #[arg(long, default_value = "planwright.db")]
        db: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,

        /// SQLite database path
        #[arg(long, default_value = "planwright.db")]
        db: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new account
    Add {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// Initial credit balance
        #[arg(long, default_value = "5")]
        credits: i64,
        /// Grant the admin flag
        #[arg(long)]
        admin: bool,
    },

    /// List all accounts
    List,

    /// Delete an account
    Remove { username: String },

    /// Set an account's credit balance
    Credit { username: String, credits: i64 },

    /// Check a username/password pair
    Verify {
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            idea,
            idea_file,
            language,
            username,
            db,
            out_dir,
            logo,
            verbose,
        } => {
            setup_logging(verbose);
            generate(idea, idea_file, language, username, db, out_dir, logo).await
        }
        Commands::History { username, db, verbose } => {
            setup_logging(verbose);
            history(username, db)
        }
        Commands::Export {
            output,
            format,
            username,
            db,
            verbose,
        } => {
            setup_logging(verbose);
            export(output, format, username, db)
        }
        Commands::User { command, db, verbose } => {
            setup_logging(verbose);
            user_command(command, db)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

#[allow(clippy::too_many_arguments)]
async fn generate(
    idea: Option<String>,
    idea_file: Option<PathBuf>,
    language: Language,
    username: String,
    db: PathBuf,
    out_dir: PathBuf,
    logo: Option<PathBuf>,
) -> Result<()> {
    let idea = match (idea, idea_file) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read idea file {path:?}"))?,
        (None, None) => bail!("either --idea or --idea-file is required"),
    };
    let idea = idea.trim().to_string();
    if idea.is_empty() {
        bail!("the business idea is empty");
    }

    let store = Store::open(&db).context("Failed to open database")?;
    let user = store
        .get_user(&username)?
        .with_context(|| format!("unknown user: {username}"))?;
    if user.credits <= 0 {
        bail!("no credits remaining for {username}");
    }

    let config = ChatConfig::from_env()?;
    let client = ChatClient::new(config);
    let builder = ReportBuilder::new(client)
        .with_store(&store)
        .with_render_config(RenderConfig {
            logo_path: logo,
            ..Default::default()
        });

    info!(username = user.username, language = %language, "building report");
    let built = builder.build(&idea, language, &user.username).await?;

    if let Some(err) = &built.persist_error {
        warn!("report could not be stored ({err}); artifacts are still written");
    }

    let artifacts = ArtifactDir::new(&out_dir).context("Failed to create output directory")?;
    let (txt_path, pdf_path) =
        artifacts.write_artifacts(&user.username, Utc::now(), &built.transcript, &built.document)?;

    // One credit per successful build, spent only after the build
    store.update_credits(&user.username, user.credits - 1)?;

    info!("Report {} complete", built.report_id);
    println!("Transcript: {}", txt_path.display());
    println!("Report:     {}", pdf_path.display());
    println!("Credits remaining: {}", user.credits - 1);
    Ok(())
}

fn history(username: Option<String>, db: PathBuf) -> Result<()> {
    let store = Store::open(&db).context("Failed to open database")?;
    let reports = store.fetch_reports(username.as_deref())?;

    if reports.is_empty() {
        println!("No reports found");
        return Ok(());
    }
    for report in reports {
        let preview: String = report.idea.chars().take(60).collect();
        println!(
            "{}  {}  {:5}  [{}]  {}",
            report.created_at.format("%Y-%m-%d %H:%M"),
            report.id,
            report.language,
            report.owner,
            preview
        );
    }
    Ok(())
}

fn export(
    output: PathBuf,
    format: ExportFormat,
    username: Option<String>,
    db: PathBuf,
) -> Result<()> {
    let store = Store::open(&db).context("Failed to open database")?;
    let reports = store.fetch_reports(username.as_deref())?;
    if reports.is_empty() {
        bail!("no reports to export");
    }

    let bytes = zip_reports(&reports, format).context("Failed to build zip archive")?;
    fs::write(&output, bytes).with_context(|| format!("Failed to write {output:?}"))?;
    info!("Exported {} reports to {:?}", reports.len(), output);
    Ok(())
}

fn user_command(command: UserCommands, db: PathBuf) -> Result<()> {
    let store = Store::open(&db).context("Failed to open database")?;

    match command {
        UserCommands::Add {
            username,
            password,
            email,
            name,
            credits,
            admin,
        } => {
            store.create_user(&NewUser {
                username: &username,
                password: &password,
                email: &email,
                name: &name,
                credits,
                is_admin: admin,
            })?;
            println!("Created user {username} with {credits} credits");
        }
        UserCommands::List => {
            for user in store.list_users()? {
                println!(
                    "{:20} {:30} credits={:3} admin={} last_login={}",
                    user.username,
                    user.email,
                    user.credits,
                    user.is_admin,
                    user.last_login
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "never".to_string())
                );
            }
        }
        UserCommands::Remove { username } => {
            store.delete_user(&username)?;
            println!("Deleted user {username}");
        }
        UserCommands::Credit { username, credits } => {
            store.update_credits(&username, credits)?;
            println!("Set credits for {username} to {credits}");
        }
        UserCommands::Verify { username, password } => {
            match store.verify_user(&username, &password)? {
                Some(user) => println!("OK: {} ({} credits)", user.username, user.credits),
                None => bail!("invalid credentials for {username}"),
            }
        }
    }
    Ok(())
}
