use anyhow::{Result, anyhow, bail};
use chrono::Local;
use futures::future::join_all;
use goteam::cli::{self, Command};
use goteam::config::Config;
use goteam::context::StandardContext;
use goteam::manager::{AddKind, LocationManager, TaskManager};
use goteam::model::display::location_line;
use goteam::model::parser::SyntaxType;
use goteam::model::{Location, SearchState, Task, TaskDisplay};
use goteam::remote::{FileStore, RecordClass, RemoteStore};
use log::LevelFilter;
use std::env;
use std::sync::Arc;
use tokio::task::JoinHandle;

const BINARY_NAME: &str = "goteam";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match cli::parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run '{} --help' for usage.", BINARY_NAME);
            std::process::exit(2);
        }
    };

    if cli.command == Command::Help {
        cli::print_help(BINARY_NAME);
        return Ok(());
    }

    let ctx = StandardContext::new(cli.root.clone());
    let config = Config::load_or_default(&ctx)?;
    cli::init_logging(if cli.verbose {
        LevelFilter::Debug
    } else {
        config.log_level_filter()
    });

    let task_store: Arc<dyn RemoteStore> = Arc::new(FileStore::for_context(&ctx, RecordClass::Task)?);
    let location_store: Arc<dyn RemoteStore> =
        Arc::new(FileStore::for_context(&ctx, RecordClass::Location)?);
    let mut tasks = TaskManager::new(task_store, &config.user_name);
    let mut locations = LocationManager::new(location_store, &config.user_name);
    let today = Local::now().date_naive();

    let mut pending: Vec<JoinHandle<()>> = Vec::new();

    match cli.command {
        Command::Help => {}
        Command::Add(text) => {
            locations.all_locations(true).await?;
            let vocabulary = config.vocabulary(locations.locations());
            let task = Task::new(&text, &vocabulary, today);
            println!("{}", task.list_line());
            pending.push(tasks.add(task));
        }
        Command::Edit { id, text } => {
            tasks.all_tasks(true).await?;
            locations.all_locations(true).await?;
            let id = resolve_task_id(&tasks, &id)?;
            let task = tasks
                .find(&id)
                .cloned()
                .ok_or_else(|| anyhow!("No task with id {}", id))?;
            let vocabulary = config.vocabulary(locations.locations());
            pending.extend(tasks.confirm_input(task, &text, &vocabulary, today));
            if let Some(task) = tasks.find(&id) {
                println!("{}", task.list_line());
            }
        }
        Command::List(query) => {
            let all = tasks.all_tasks(true).await?;
            let mut search = SearchState::new();
            search.set_query(query.unwrap_or_default());
            for task in search.visible_tasks(all) {
                println!("{}", task.list_line());
            }
        }
        Command::Remove(id) => {
            tasks.all_tasks(true).await?;
            let id = resolve_task_id(&tasks, &id)?;
            if let Some((task, handle)) = tasks.delete(&id) {
                println!("Deleted: {}", task.name.trim_end());
                pending.push(handle);
            }
        }
        Command::Parse(text) => {
            locations.all_locations(true).await?;
            let vocabulary = config.vocabulary(locations.locations());
            let extraction = vocabulary.extract(&text, today);
            for token in extraction.tokens(&text) {
                let span = &text[token.start..token.end];
                match token.kind {
                    SyntaxType::Text => println!("  text        {:?}", span),
                    SyntaxType::Annotation(kind) => println!("  {:<11} {:?}", format!("{:?}", kind), span),
                }
            }
            let task = Task::new(&text, &vocabulary, today);
            println!("name: {:?}", task.name);
            println!("annotations: {}", task.annotation_summary());
        }
        Command::LocationAdd {
            latitude,
            longitude,
            title,
            subtitle,
        } => {
            locations.all_locations(true).await?;
            let mut location = Location::new(latitude, longitude).with_title(title);
            location.subtitle = subtitle;
            let line = location_line(&location);
            let (kind, handle) = locations.add(location);
            match kind {
                AddKind::Create => println!("Created {}", line),
                AddKind::Edit => println!("Updated {}", line),
            }
            pending.push(handle);
        }
        Command::LocationList(query) => {
            let all = locations.all_locations(true).await?;
            let mut search = SearchState::new();
            search.set_query(query.unwrap_or_default());
            for location in search.visible_locations(all) {
                println!("{}", location_line(location));
            }
        }
        Command::LocationRemove {
            latitude,
            longitude,
        } => {
            locations.all_locations(true).await?;
            let id = Location::coordinate_id(latitude, longitude);
            match locations.delete(&id) {
                Some((location, handle)) => {
                    println!("Deleted {}", location_line(&location));
                    pending.push(handle);
                }
                None => bail!("No saved location at {}", id),
            }
        }
    }

    for result in join_all(pending).await {
        if let Err(e) = result {
            log::warn!("Background write did not finish: {}", e);
        }
    }
    Ok(())
}

/// Full id, or a prefix that matches exactly one task.
fn resolve_task_id(tasks: &TaskManager, prefix: &str) -> Result<String> {
    if tasks.find(prefix).is_some() {
        return Ok(prefix.to_string());
    }
    let mut matches = tasks.tasks().iter().filter(|t| t.id().starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id().to_string()),
        (None, _) => bail!("No task with id {}", prefix),
        (Some(_), Some(_)) => bail!("Id prefix {} is ambiguous", prefix),
    }
}
