use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use dosetick_core::{DosetickConfig, Medication, MedicationId};
use dosetick_notify::{NotifierSet, TerminalNotifier, TracingNotifier};
use dosetick_scheduler::{Clock, ReminderEngine, ReminderHandle, SystemClock};
use dosetick_store::MedicationStore;

mod cli;
mod prompt;

use cli::{Cli, Command};
use prompt::PromptCommand;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dosetick=info".into()),
        )
        .init();

    let args = Cli::parse();

    // config: explicit flag > DOSETICK_CONFIG env > ~/.dosetick/dosetick.toml
    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var("DOSETICK_CONFIG").ok());
    let config = DosetickConfig::load_or_default(config_path.as_deref());

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");
    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    let store = MedicationStore::new(db)?;

    match args.command.unwrap_or(Command::Run) {
        Command::Add { name, time, days } => {
            let med = store.add(&name, &time, days)?;
            println!("added {}  {}  {}", med.id, med.time, med.name);
        }
        Command::List => {
            for med in store.list_all()? {
                println!("{}  {}  {}{}", med.id, med.time, med.name, days_suffix(&med));
            }
        }
        Command::Remove { id } => {
            store.remove(&MedicationId::from(id.as_str()))?;
            println!("removed {id}");
        }
        Command::Take { id } => {
            store.record_taken(&MedicationId::from(id.as_str()), SystemClock.now())?;
            println!("recorded {id} as taken");
        }
        Command::Run => run_reminders(config, store).await?,
    }

    Ok(())
}

/// Wire the engine, delivery router and persistence round-trip, then drive
/// the interactive prompt until quit/Ctrl-C.
async fn run_reminders(config: DosetickConfig, store: MedicationStore) -> anyhow::Result<()> {
    let store = Arc::new(store);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Notification channel: engine → delivery router
    let (notify_tx, notify_rx) = mpsc::channel(256);
    // Taken channel: engine → persistence round-trip
    let (taken_tx, taken_rx) = mpsc::channel::<Medication>(256);

    let mut sinks = NotifierSet::new();
    sinks.register(Box::new(TerminalNotifier::new()));
    sinks.register(Box::new(TracingNotifier::new()));
    tokio::spawn(sinks.run(notify_rx));

    let engine = ReminderEngine::new(
        config.reminder.clone(),
        Arc::clone(&clock),
        notify_tx,
        Some(taken_tx),
    );
    let (handle, commands) = ReminderHandle::channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let engine_task = tokio::spawn(engine.run(commands, shutdown_rx));

    // Taken router: persist each acknowledged dose, then push the refreshed
    // list back into the engine — the taken medication drops out of it.
    let taken_store = Arc::clone(&store);
    let taken_clock = Arc::clone(&clock);
    let taken_handle = handle.clone();
    tokio::spawn(async move {
        let mut taken_rx = taken_rx;
        while let Some(med) = taken_rx.recv().await {
            if let Err(e) = taken_store.record_taken(&med.id, taken_clock.now()) {
                warn!(medication_id = %med.id, error = %e, "failed to persist taken dose");
                continue;
            }
            match taken_store.due_today(taken_clock.now()) {
                Ok(meds) => {
                    if taken_handle.set_medications(meds).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "failed to reload medication list"),
            }
        }
    });

    // Fresh day's list at local midnight — doses taken yesterday come back.
    let midnight_store = Arc::clone(&store);
    let midnight_clock = Arc::clone(&clock);
    let midnight_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            let now = midnight_clock.now();
            let next = (now.date() + chrono::Duration::days(1))
                .and_hms_opt(0, 0, 1)
                .expect("midnight is always a valid time");
            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            match midnight_store.due_today(midnight_clock.now()) {
                Ok(meds) => {
                    if midnight_handle.set_medications(meds).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "failed to load the day's medication list"),
            }
        }
    });

    handle.set_medications(store.due_today(clock.now())?).await?;
    info!("dosetick running; type 'take <id>' to acknowledge a dose, 'quit' to exit");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }
            line = lines.next_line() => match line? {
                None => break,
                Some(line) => match prompt::parse(&line) {
                    Ok(PromptCommand::Take(id)) => {
                        if handle.acknowledge(id).await.is_err() {
                            break;
                        }
                    }
                    Ok(PromptCommand::Quit) => break,
                    Ok(PromptCommand::Empty) => {}
                    Err(msg) => println!("{msg}"),
                },
            }
        }
    }

    let _ = shutdown_tx.send(true);
    engine_task.await?;
    Ok(())
}

fn days_suffix(med: &Medication) -> String {
    match &med.days {
        None => String::new(),
        Some(days) => {
            let tags: Vec<String> = days.iter().map(|d| d.to_string()).collect();
            format!("  [{}]", tags.join(","))
        }
    }
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
