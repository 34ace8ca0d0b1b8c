mod cli;
mod cmd;

use clap::Parser;
use cli::{AdherenceAction, Cli, Commands, MedAction, ReminderAction};
use pillbox::core::EngineError;
use pillbox::output;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let user = cli.user.as_deref();
    let human = cli.human;

    let result = match cli.command {
        Commands::Init { skip } => cmd::init::run(skip),
        Commands::Med { action } => match action {
            MedAction::Add { name, note } => cmd::med::run_add(&name, note.as_deref(), user, human),
            MedAction::List => cmd::med::run_list(user, human),
        },
        Commands::Reminder { action } => match action {
            ReminderAction::Add {
                medicine,
                time,
                recurrence,
                days,
                dose,
                start,
                end,
                prescription,
                note,
            } => cmd::reminder::run_add(
                cmd::reminder::AddArgs {
                    medicine: &medicine,
                    time: &time,
                    recurrence: &recurrence,
                    days: days.as_deref(),
                    dose: dose.as_deref(),
                    start,
                    end,
                    prescription: prescription.as_deref(),
                    note: note.as_deref(),
                },
                user,
                human,
            ),
            ReminderAction::List {
                active,
                medicine,
                page,
                per_page,
            } => cmd::reminder::run_list(active, medicine.as_deref(), page, per_page, user, human),
            ReminderAction::Update {
                id,
                time,
                recurrence,
                days,
                dose,
                start,
                end,
                active,
                note,
            } => cmd::reminder::run_update(
                cmd::reminder::UpdateArgs {
                    id: &id,
                    time: time.as_deref(),
                    recurrence: recurrence.as_deref(),
                    days: days.as_deref(),
                    dose: dose.as_deref(),
                    start,
                    end,
                    active,
                    note: note.as_deref(),
                },
                user,
                human,
            ),
            ReminderAction::Delete { id } => cmd::reminder::run_delete(&id, user, human),
            ReminderAction::Today => cmd::reminder::run_today(user, human),
            ReminderAction::Status { id, date } => {
                cmd::reminder::run_status(&id, date, user, human)
            }
            ReminderAction::Take { id, note } => {
                cmd::reminder::run_take(&id, note.as_deref(), user, human)
            }
            ReminderAction::Skip { id, note } => {
                cmd::reminder::run_skip(&id, note.as_deref(), user, human)
            }
            ReminderAction::Sweep => cmd::reminder::run_sweep(user, human),
            ReminderAction::History {
                from,
                to,
                status,
                medicine,
                page,
                per_page,
            } => cmd::reminder::run_history(
                cmd::reminder::HistoryArgs {
                    from,
                    to,
                    status: status.as_deref(),
                    medicine: medicine.as_deref(),
                    page,
                    per_page,
                },
                user,
                human,
            ),
        },
        Commands::Adherence { action } => match action {
            AdherenceAction::Stats { from, to } => cmd::adherence::run_stats(from, to, user, human),
            AdherenceAction::Daily { days } => cmd::adherence::run_daily(days, user, human),
            AdherenceAction::Streak => cmd::adherence::run_streak(user, human),
            AdherenceAction::ByMedicine { from, to } => {
                cmd::adherence::run_by_medicine(from, to, user, human)
            }
        },
        Commands::Tick { job } => cmd::tick::run(job, human),
    };

    if let Err(e) = result {
        let code = e
            .downcast_ref::<EngineError>()
            .map(EngineError::code)
            .unwrap_or("general_error");
        let err = output::error("", code, &e.to_string());
        eprintln!("{}", serde_json::to_string(&err).unwrap());
        process::exit(1);
    }
}
