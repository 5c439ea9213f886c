//! Washi command line binary.
//!
//! A thin surface over the document core: reports and blocks live in a
//! SQLite file, every command acts as the local user, and `report show`
//! prints the same HTML the renderer hands any other host.
//!
//! Usage:
//!   washi report new "Q3 Review" --description "Quarterly numbers"
//!   washi report list
//!   washi report show <report-id>
//!   washi block add-text <report-id> "Intro" --style heading1
//!   washi block import-csv <report-id> data.csv
//!   washi block reorder <report-id> <dragged-prefix> <target-prefix>
//!   washi toc <report-id>

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use washi_doc::{render_block, style_html, DropEdge, Placement, RenderMode, ReportDocument};
use washi_store::{BlockStore, NewReport, ReportStore, SqliteStore};
use washi_types::{
    resolve_block_prefix, BlockContent, Report, ReportId, TextContent, TextStyle, UserId,
};

#[derive(Parser, Debug)]
#[command(name = "washi")]
#[command(about = "Block-based report documents")]
struct Args {
    /// SQLite database file
    #[arg(long, default_value = "washi.db")]
    db: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage reports
    #[command(subcommand)]
    Report(ReportCommand),

    /// Manage blocks within a report
    #[command(subcommand)]
    Block(BlockCommand),

    /// Print a report's table of contents
    Toc { report: String },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Create a report
    New {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// List this user's reports
    List,

    /// Render a report's blocks as HTML
    Show { report: String },

    /// Delete a report and all of its blocks
    Delete { report: String },
}

#[derive(Subcommand, Debug)]
enum BlockCommand {
    /// Append a text block
    AddText {
        report: String,
        text: String,
        #[arg(long, default_value = "paragraph")]
        style: TextStyle,
    },

    /// Append a table block imported from a CSV file
    ImportCsv {
        report: String,
        file: String,
    },

    /// Move a block before (or after) another, by ID prefix
    Reorder {
        report: String,
        dragged: String,
        target: String,
        /// Drop after the target instead of before it
        #[arg(long)]
        after: bool,
    },

    /// Delete a block by ID prefix
    Delete { report: String, block: String },
}

fn parse_report_id(s: &str) -> Result<ReportId> {
    ReportId::parse(s).with_context(|| format!("invalid report id '{}'", s))
}

async fn open_document(store: Arc<SqliteStore>, report: &str) -> Result<ReportDocument> {
    let id = parse_report_id(report)?;
    let doc = ReportDocument::open(store, id, Some(UserId::local())).await?;
    Ok(doc)
}

fn resolve_block(doc: &ReportDocument, prefix: &str) -> Result<washi_types::BlockId> {
    let id = resolve_block_prefix(doc.blocks().iter().map(|b| b.id), prefix)?;
    Ok(id)
}

fn print_report_line(report: &Report) {
    match &report.description {
        Some(description) => println!("{}  {}  ({})", report.id, report.title, description),
        None => println!("{}  {}", report.id, report.title),
    }
}

async fn run_report(store: Arc<SqliteStore>, command: ReportCommand) -> Result<()> {
    match command {
        ReportCommand::New { title, description } => {
            let report = store
                .create_report(NewReport {
                    title,
                    description,
                    created_by: UserId::local(),
                })
                .await?;
            print_report_line(&report);
        }
        ReportCommand::List => {
            for report in store.list_reports_for_user(UserId::local()).await? {
                print_report_line(&report);
            }
        }
        ReportCommand::Show { report } => {
            let id = parse_report_id(&report)?;
            let report = match store.get_report(id).await? {
                Some(report) => report,
                None => bail!("no report {}", id),
            };
            let doc = ReportDocument::open(Arc::clone(&store) as Arc<dyn BlockStore>, id, None)
                .await?;
            println!("<article data-report-id=\"{}\">", report.id.to_hex());
            for block in doc.blocks() {
                println!("{}", render_block(block, RenderMode::View, false));
            }
            println!("</article>");
        }
        ReportCommand::Delete { report } => {
            let id = parse_report_id(&report)?;
            store.delete_report(id).await?;
            println!("deleted {}", id);
        }
    }
    Ok(())
}

async fn run_block(store: Arc<SqliteStore>, command: BlockCommand) -> Result<()> {
    match command {
        BlockCommand::AddText { report, text, style } => {
            let mut doc = open_document(store, &report).await?;
            let content = BlockContent::Text(TextContent {
                html: style_html(style, &text),
                text,
                style,
                ..Default::default()
            });
            let id = doc.create_block(content, Placement::End).await?;
            println!("{}", id.short());
        }
        BlockCommand::ImportCsv { report, file } => {
            let csv = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file))?;
            let mut doc = open_document(store, &report).await?;
            let id = doc.create_table_from_csv(&csv, Placement::End).await?;
            println!("{}", id.short());
        }
        BlockCommand::Reorder { report, dragged, target, after } => {
            let mut doc = open_document(store, &report).await?;
            let dragged = resolve_block(&doc, &dragged)?;
            let target = resolve_block(&doc, &target)?;
            let edge = if after { DropEdge::After } else { DropEdge::Before };
            doc.reorder(dragged, target, edge).await?;
            for block in doc.blocks() {
                println!("{:>3}  {}  {}", block.position, block.id.short(), block.kind());
            }
        }
        BlockCommand::Delete { report, block } => {
            let mut doc = open_document(store, &report).await?;
            let id = resolve_block(&doc, &block)?;
            doc.delete_block(id).await?;
            println!("deleted {}", id.short());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "washi=info,warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let store = Arc::new(SqliteStore::open(&args.db)?);
    tracing::debug!(db = %args.db, "store opened");

    match args.command {
        Command::Report(command) => run_report(store, command).await,
        Command::Block(command) => run_block(store, command).await,
        Command::Toc { report } => {
            let doc = open_document(store, &report).await?;
            for entry in doc.table_of_contents() {
                let indent = "  ".repeat((entry.level - 1) as usize);
                println!("{}{}  {}", indent, entry.id.short(), entry.text);
            }
            Ok(())
        }
    }
}
