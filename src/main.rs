use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use togglapi::dates::{DateRange, parse_date};
use togglapi::{
    Client, ClientRepository, Project, ProjectRepository, TimeEntry, TimeEntryRepository,
    TogglApi, TogglRestClient, WorkspaceRepository, format_timestamp, parse_timestamp,
};

mod config;

use config::{ClientConfig, Overrides, Sources};

#[derive(Parser)]
#[command(name = "togglapi", version, about = "Query and create Toggl workspaces, clients, projects and time entries")]
struct Cli {
    /// Toggl API token (defaults to $TOGGL_API_TOKEN or ~/.togglapi)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Base URL of the Toggl REST API
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Minimum pause between two requests, in milliseconds
    #[arg(long, global = true)]
    pause_ms: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all workspaces
    Workspaces,
    /// List all clients
    Clients,
    /// List projects of one workspace, or of every workspace
    Projects {
        #[arg(long)]
        workspace: Option<u64>,
    },
    /// List time entries in a date range (default: today)
    TimeEntries(RangeArgs),
    /// Create a client
    CreateClient {
        #[arg(long)]
        workspace: u64,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Create a project
    CreateProject {
        #[arg(long)]
        workspace: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        client: Option<u64>,
        #[arg(long)]
        billable: bool,
        #[arg(long)]
        private: bool,
    },
    /// Create a time entry; timestamps look like 2015-01-01T00:00:01+01:00
    CreateTimeEntry {
        #[arg(long)]
        workspace: u64,
        #[arg(long)]
        project: Option<u64>,
        #[arg(long)]
        start: String,
        #[arg(long)]
        stop: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        billable: bool,
    },
    /// Store the API token in ~/.togglapi
    Login { token: String },
}

#[derive(Args)]
struct RangeArgs {
    /// Single day (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["start", "end", "last_month"])]
    date: Option<String>,
    /// First day of the range (YYYY-MM-DD)
    #[arg(long, conflicts_with = "last_month")]
    start: Option<String>,
    /// Last day of the range (YYYY-MM-DD), defaults to today
    #[arg(long, conflicts_with = "last_month")]
    end: Option<String>,
    /// The month up to today
    #[arg(long)]
    last_month: bool,
}

impl RangeArgs {
    fn to_range(&self) -> Result<DateRange> {
        if self.last_month {
            return Ok(DateRange::last_month());
        }
        let parse = |value: &Option<String>| value.as_deref().map(parse_date).transpose();
        let range = DateRange::from_options(parse(&self.date)?, parse(&self.start)?, parse(&self.end)?)?;
        Ok(range)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Login { token } = &cli.command {
        let path = config::write_token(token).context("failed to store the API token")?;
        println!("Token saved to {}", path.display());
        return Ok(());
    }

    let overrides = Overrides {
        token: cli.token.clone(),
        base_url: cli.base_url.clone(),
        pause_ms: cli.pause_ms,
    };
    let api = connect(config::resolve(&overrides, &Sources::load()))?;

    match &cli.command {
        Command::Workspaces => {
            let workspaces = api.fetch_workspaces()?;
            print_list(cli.json, "Workspaces:", &workspaces, |workspace| {
                workspace.name.clone()
            })
        }
        Command::Clients => {
            let clients = api.fetch_clients()?;
            print_list(cli.json, "Clients:", &clients, |client| client.name.clone())
        }
        Command::Projects { workspace } => {
            let workspace_ids = match workspace {
                Some(id) => vec![*id],
                None => api.fetch_workspaces()?.into_iter().map(|w| w.id).collect(),
            };
            let mut projects = Vec::new();
            for workspace_id in workspace_ids {
                projects.extend(api.fetch_projects(workspace_id)?);
            }
            print_list(cli.json, "Projects:", &projects, |project| project.name.clone())
        }
        Command::TimeEntries(args) => {
            let range = args.to_range()?;
            let (start, end) = range.bounds();
            let entries = api.fetch_time_entries(start, end)?;
            let heading = format!("Time Entries ({}):", range.label());
            print_list(cli.json, &heading, &entries, describe_time_entry)
        }
        Command::CreateClient {
            workspace,
            name,
            notes,
        } => {
            let client = Client {
                wid: *workspace,
                name: name.clone(),
                notes: notes.clone(),
                ..Client::default()
            };
            let created = api.create_client(&client)?;
            print_created(cli.json, &created, format!("Created client {} ({})", created.name, created.id))
        }
        Command::CreateProject {
            workspace,
            name,
            client,
            billable,
            private,
        } => {
            let project = Project {
                wid: *workspace,
                cid: *client,
                name: name.clone(),
                billable: *billable,
                is_private: *private,
                active: true,
                ..Project::default()
            };
            let created = api.create_project(&project)?;
            print_created(cli.json, &created, format!("Created project {} ({})", created.name, created.id))
        }
        Command::CreateTimeEntry {
            workspace,
            project,
            start,
            stop,
            description,
            billable,
        } => {
            let start = parse_timestamp(start).context("invalid --start")?;
            let stop = parse_timestamp(stop).context("invalid --stop")?;
            if stop < start {
                bail!("--stop must not be before --start");
            }
            let entry = TimeEntry {
                wid: *workspace,
                pid: *project,
                billable: *billable,
                start: Some(start),
                stop: Some(stop),
                duration: Some((stop - start).num_seconds()),
                description: description.clone(),
                ..TimeEntry::default()
            };
            let created = api.create_time_entry(&entry)?;
            let line = format!("Created time entry {}: {}", created.id, describe_time_entry(&created));
            print_created(cli.json, &created, line)
        }
        Command::Login { .. } => Ok(()),
    }
}

fn connect(config: ClientConfig) -> Result<TogglApi> {
    let token = config.token.ok_or_else(|| {
        anyhow!(
            "no API token found; pass --token, set {} or run `togglapi login <token>`",
            config::TOKEN_ENV
        )
    })?;
    let mut builder = TogglRestClient::builder(config.base_url, token)
        .pause_between_requests(config.pause_between_requests);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(TogglApi::from_client(builder.build()?))
}

fn describe_time_entry(entry: &TimeEntry) -> String {
    let stamp = |value: &Option<chrono::DateTime<chrono::FixedOffset>>| {
        value
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_else(|| "running".to_string())
    };
    format!("{} - {}: {}", stamp(&entry.start), stamp(&entry.stop), entry.description)
}

fn print_list<T: Serialize>(
    json: bool,
    heading: &str,
    items: &[T],
    line: impl Fn(&T) -> String,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }
    println!("{heading}");
    for item in items {
        println!("{}", line(item));
    }
    Ok(())
}

fn print_created<T: Serialize>(json: bool, item: &T, line: String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{line}");
    }
    Ok(())
}
