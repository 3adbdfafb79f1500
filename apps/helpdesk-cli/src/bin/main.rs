//! helpdesk: command-line front end for the support dashboard.
//!
//! Every command prints JSON on stdout; logs go to stderr (`RUST_LOG`,
//! default `helpdesk=info`).

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use helpdesk_chart::{compute_bar_geometry, compute_line_geometry, effective_max, headline, BarDatum, BarOptions, LineOptions, Point, XValue};
use helpdesk_core::config::{AppConfig, Config};
use helpdesk_core::settings::{FileStore, SettingKey, SettingsManager};
use helpdesk_filter::{ContactFilter, ContactSort, InboxFilter, InboxSort};
use helpdesk_views::{ContactsView, ConversationThread, Dashboard, InboxView, Metric, ReportsView};

#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(version, about = "Support dashboard: contacts, inbox, charts and settings")]
struct Cli {
    /// Skip simulated latency
    #[arg(long, global = true)]
    instant: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, filter and sort the contacts directory
    Contacts {
        #[arg(short, long, default_value = "")]
        search: String,
        /// all | starred | active | inactive | pending
        #[arg(short, long, default_value = "all")]
        filter: String,
        #[arg(short, long)]
        tag: Vec<String>,
        /// name | company | lastContact | interactions
        #[arg(long, default_value = "name")]
        sort: String,
    },

    /// Search and filter the inbox
    Inbox(InboxArgs),

    /// Open a conversation thread, optionally sending a reply
    Thread {
        id: String,
        /// Message to send; waits for the simulated customer reply
        #[arg(long)]
        send: Option<String>,
    },

    /// Reports page figures
    Report {
        /// conversations | responses
        #[arg(long, default_value = "conversations")]
        metric: String,
        #[arg(long)]
        width: Option<f64>,
    },

    /// Home page charts
    Dashboard {
        #[arg(long)]
        width: Option<f64>,
    },

    /// Compute chart geometry
    Chart {
        #[command(subcommand)]
        kind: ChartCommand,
    },

    /// Show or change stored settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Args)]
struct InboxArgs {
    #[arg(short, long, default_value = "")]
    search: String,
    /// open | pending | resolved | unassigned
    #[arg(long)]
    status: Vec<String>,
    /// Agent id, e.g. sarah_williams
    #[arg(long)]
    agent: Vec<String>,
    /// reply | categorize | escalate
    #[arg(long)]
    ai: Vec<String>,
    /// Treat AI features as disabled
    #[arg(long)]
    no_ai: bool,
    #[arg(short, long)]
    tag: Vec<String>,
    /// natural | subject | sender
    #[arg(long, default_value = "natural")]
    sort: String,
}

#[derive(Subcommand)]
enum ChartCommand {
    /// Bar heights for a list of values
    Bar {
        #[arg(long)]
        max: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        label: Vec<String>,
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
    /// Line and area paths for `x:y` points (x may be a label)
    Line {
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(required = true, allow_negative_numbers = true)]
        points: Vec<String>,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    Set {
        key: String,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
    Reset,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("helpdesk=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_point(raw: &str) -> anyhow::Result<Point> {
    let (x, y) = raw.rsplit_once(':').ok_or_else(|| anyhow!("point '{raw}' is not in x:y form"))?;
    let y: f64 = y.parse().with_context(|| format!("point '{raw}' has a non-numeric y"))?;
    let x = match x.parse::<f64>() {
        Ok(n) => XValue::Number(n),
        Err(_) => XValue::Label(x.to_string()),
    };
    Ok(Point { x, y })
}

fn contacts(search: String, filter: &str, tags: Vec<String>, sort: &str) -> anyhow::Result<()> {
    let mut view = ContactsView::from_seed()?;
    view.set_search(search);
    view.set_filter(filter.parse::<ContactFilter>().unwrap_or_default());
    view.set_sort(sort.parse::<ContactSort>().unwrap_or_default());
    for tag in &tags {
        view.toggle_tag(tag);
    }
    print_json(&json!({
        "summary": view.summary(),
        "stats": view.stats(),
        "tags": view.all_tags(),
        "contacts": view.visible(),
    }))
}

async fn inbox(args: InboxArgs, app: &AppConfig) -> anyhow::Result<()> {
    let mut view = InboxView::from_seed(&app.delays)?;
    *view.filter_mut() = InboxFilter::from_selection(args.status.as_slice(), args.agent.as_slice(), args.ai.as_slice(), !args.no_ai);
    for tag in &args.tag {
        view.toggle_tag(tag);
    }
    view.set_sort(args.sort.parse::<InboxSort>().unwrap_or_default());
    view.search(args.search).await.context("inbox update task failed")?;
    print_json(&json!({
        "summary": view.summary(),
        "unread": view.unread_count(),
        "conversations": view.results(),
    }))
}

async fn thread(id: &str, send: Option<String>, app: &AppConfig) -> anyhow::Result<()> {
    let mut thread = ConversationThread::open(id, &app.delays)?;
    if let Some(text) = send {
        thread.set_draft(text);
        if let Some(handles) = thread.send_message() {
            handles.reply.await.context("reply task failed")?;
            handles.suggestions.await.context("suggestion task failed")?;
        }
    } else {
        thread.regenerate_suggestions().await.context("suggestion task failed")?;
    }
    print_json(&json!({
        "conversation": thread.conversation(),
        "messages": thread.messages(),
        "suggestions": thread.suggestions(),
    }))
}

fn report(metric: &str, width: Option<f64>, app: &AppConfig) -> anyhow::Result<()> {
    let mut view = ReportsView::from_seed(&app.delays, &app.charts)?;
    let metric = match metric {
        "responses" => Metric::Responses,
        _ => Metric::Conversations,
    };
    view.set_metric(metric);
    if let Some(width) = width {
        view.resize_trend(width, app.charts.line_height);
    }
    let headline = view.trend_headline();
    print_json(&json!({
        "totals": view.totals(),
        "responseBuckets": view.response_buckets(),
        "trend": { "title": view.trend_title(), "headline": headline, "geometry": view.trend() },
        "conversationBars": view.conversation_bars(),
        "responseTimeBars": view.response_time_bars(),
        "responseTimeLine": view.response_time_line(),
        "satisfaction": view.satisfaction(),
        "team": view.team(),
    }))
}

fn dashboard(width: Option<f64>, app: &AppConfig) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::from_seed(&app.charts)?;
    if let Some(width) = width {
        dashboard.resize_engagement(width);
    }
    let headline = dashboard.engagement_headline();
    print_json(&json!({
        "weeklyTotal": dashboard.weekly_total(),
        "weeklyBars": dashboard.weekly_bars(),
        "engagement": { "headline": headline, "geometry": dashboard.engagement() },
    }))
}

fn chart(kind: ChartCommand, app: &AppConfig) -> anyhow::Result<()> {
    match kind {
        ChartCommand::Bar { max, height, label, values } => {
            let mut options = BarOptions::from(&app.charts).with_labels(label);
            options.max_value = max;
            if let Some(h) = height {
                options.height = h;
            }
            let data: Vec<BarDatum> = values.iter().copied().map(BarDatum::from).collect();
            print_json(&json!({
                "effectiveMax": effective_max(&values, &options),
                "bars": compute_bar_geometry(&data, &options),
            }))
        }
        ChartCommand::Line { width, height, title, points } => {
            let points = points.iter().map(|p| parse_point(p)).collect::<anyhow::Result<Vec<_>>>()?;
            let defaults = LineOptions::from(&app.charts);
            let options = LineOptions { width: width.unwrap_or(defaults.width), height: height.unwrap_or(defaults.height) };
            let geometry = compute_line_geometry(&points, &options);
            print_json(&json!({
                "headline": headline(geometry.latest_value, &title),
                "geometry": geometry,
            }))
        }
    }
}

fn settings(action: SettingsCommand, app: &AppConfig) -> anyhow::Result<()> {
    let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let path = app.settings_path(&base);
    let mut manager = SettingsManager::load(FileStore::new(&path), app.settings.storage_key.clone());
    match action {
        SettingsCommand::Show => {}
        SettingsCommand::Set { key, value } => {
            let key: SettingKey = key.parse()?;
            manager.update(key, value);
            manager.save().with_context(|| format!("saving settings to {}", path.display()))?;
        }
        SettingsCommand::Reset => {
            manager.reset();
            manager.save().with_context(|| format!("saving settings to {}", path.display()))?;
        }
    }
    print_json(&json!({
        "path": path.display().to_string(),
        "settings": manager.settings().entries(),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let mut app = config.app()?;
    if cli.instant {
        app.delays = app.delays.instant();
    }
    tracing::debug!(env = config.env_name(), "configuration loaded");

    match cli.command {
        Commands::Contacts { search, filter, tag, sort } => contacts(search, &filter, tag, &sort),
        Commands::Inbox(args) => inbox(args, &app).await,
        Commands::Thread { id, send } => thread(&id, send, &app).await,
        Commands::Report { metric, width } => report(&metric, width, &app),
        Commands::Dashboard { width } => dashboard(width, &app),
        Commands::Chart { kind } => chart(kind, &app),
        Commands::Settings { action } => settings(action, &app),
    }
}
