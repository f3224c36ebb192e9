//! Daytally CLI - daily task tracking with completion analytics.

use clap::Parser;
use daytally::cli::{
    CategoryCommands, Cli, Commands, ConfigCommands, NoteCommands, StatsCommands, SystemCommands,
    TaskCommands,
};
use daytally::commands::{self, Context, Output, TaskNew};
use daytally::config::{ConfigOverrides, OWNER_ENV, OutputFormat, ValueSource, resolve_config};
use daytally::models::{DateRange, NoteKind, Points, Quadrant};
use daytally::storage::{TaskUpdate, get_data_dir};
use std::env;
use std::process;

fn main() {
    daytally::logging::init();

    let cli = Cli::parse();
    let mut human = cli.human_readable;

    if let Err(e) = run(cli, &mut human) {
        tracing::debug!(error = ?e, "command failed");
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Resolve data dir and configuration, then run the command.
///
/// `human` is updated once the configured output format is known, so errors
/// are reported in the same format as results.
fn run(cli: Cli, human: &mut bool) -> Result<(), daytally::Error> {
    let data_dir = get_data_dir(cli.data_dir.as_deref())?;

    let mut overrides = ConfigOverrides::new();
    if let Some(owner) = cli.owner {
        let owner = owner.trim().to_string();
        if owner.is_empty() {
            return Err(daytally::Error::InvalidInput(
                "owner must not be empty".to_string(),
            ));
        }
        let source = if env::var(OWNER_ENV).ok().as_deref().map(str::trim) == Some(owner.as_str()) {
            ValueSource::EnvVar(OWNER_ENV.to_string())
        } else {
            ValueSource::CliFlag
        };
        overrides = overrides.with_owner(owner, source);
    }
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }

    let config = resolve_config(&data_dir, &overrides)?;
    *human = config.is_human();

    let today = chrono::Local::now().date_naive();
    let ctx = Context::new(data_dir, config, today);
    run_command(cli.command, &ctx, *human)
}

fn run_command(command: Commands, ctx: &Context, human: bool) -> Result<(), daytally::Error> {
    match command {
        Commands::Task { command } => match command {
            TaskCommands::Add {
                title,
                category,
                regular,
                points,
                important,
                urgent,
                date,
            } => {
                let mut store = ctx.open_storage()?;
                let result = commands::task_add(
                    &mut store,
                    ctx,
                    TaskNew {
                        title,
                        category,
                        regular,
                        points,
                        important,
                        urgent,
                        date,
                    },
                )?;
                output(&result, human);
            }
            TaskCommands::Show { id } => {
                let store = ctx.open_storage()?;
                output(&commands::task_show(&store, ctx.owner(), &id)?, human);
            }
            TaskCommands::Update {
                id,
                title,
                category,
                points,
                important,
                urgent,
            } => {
                let update = TaskUpdate {
                    title,
                    category,
                    points: points.map(Points::new).transpose()?,
                    is_important: important,
                    is_urgent: urgent,
                };
                let mut store = ctx.open_storage()?;
                let result = commands::task_update(&mut store, ctx.owner(), &id, update)?;
                output(&result, human);
            }
            TaskCommands::Done { id, day } => {
                let day = ctx.day(day.as_deref())?;
                let mut store = ctx.open_storage()?;
                let result = commands::task_set_completion(&mut store, ctx.owner(), &id, day, true)?;
                output(&result, human);
            }
            TaskCommands::Undo { id, day } => {
                let day = ctx.day(day.as_deref())?;
                let mut store = ctx.open_storage()?;
                let result =
                    commands::task_set_completion(&mut store, ctx.owner(), &id, day, false)?;
                output(&result, human);
            }
            TaskCommands::Delete { id, context } => {
                let context_date = context.as_deref().map(|c| ctx.day(Some(c))).transpose()?;
                let mut store = ctx.open_storage()?;
                let result =
                    commands::archive_or_delete(&mut store, ctx.owner(), &id, context_date)?;
                output(&result, human);
            }
            TaskCommands::List { day, from, to } => {
                let range = match (from, to) {
                    (Some(from), Some(to)) => ctx.range(Some(from.as_str()), Some(to.as_str()), None)?,
                    _ => DateRange::single(ctx.day(day.as_deref())?),
                };
                let query = ctx.query(range)?;
                let store = ctx.open_storage()?;
                output(&commands::task_list(&store, &query)?, human);
            }
        },

        Commands::Week { date } => {
            let day = ctx.day(date.as_deref())?;
            let store = ctx.open_storage()?;
            output(&commands::week(&store, ctx.owner(), day)?, human);
        }

        Commands::Journal { command } => run_note(NoteKind::Journal, command, ctx, human)?,
        Commands::Gratitude { command } => run_note(NoteKind::Gratitude, command, ctx, human)?,

        Commands::Stats { command } => {
            let (range_args, select) = match &command {
                StatsCommands::Daily { range }
                | StatsCommands::Tasks { range }
                | StatsCommands::Categories { range }
                | StatsCommands::Summary { range } => (range, None),
                StatsCommands::Quadrants { range, select } => (range, select.as_deref()),
            };
            let range = ctx.range(
                range_args.from.as_deref(),
                range_args.to.as_deref(),
                range_args.days,
            )?;
            let select = select.map(Quadrant::parse).transpose()?;
            let query = ctx.query(range)?;
            let store = ctx.open_storage()?;

            match command {
                StatsCommands::Daily { .. } => output(&commands::stats_daily(&store, &query)?, human),
                StatsCommands::Tasks { .. } => output(&commands::stats_tasks(&store, &query)?, human),
                StatsCommands::Quadrants { .. } => output(
                    &commands::stats_quadrants(&store, &query, select)?,
                    human,
                ),
                StatsCommands::Categories { .. } => {
                    output(&commands::stats_categories(&store, &query)?, human)
                }
                StatsCommands::Summary { .. } => {
                    output(&commands::stats_summary(&store, &query)?, human)
                }
            }
        }

        Commands::Category { command } => match command {
            CategoryCommands::List => {
                let store = ctx.open_storage()?;
                output(&commands::category_list(&store, ctx.owner())?, human);
            }
            CategoryCommands::Add { name, color } => {
                let mut store = ctx.open_storage()?;
                let result =
                    commands::category_add(&mut store, ctx.owner(), &name, color.as_deref())?;
                output(&result, human);
            }
        },

        Commands::Config { command } => match command {
            ConfigCommands::Show => output(&commands::config_show(ctx)?, human),
            ConfigCommands::Set { key, value } => {
                output(&commands::config_set(&ctx.data_dir, &key, &value)?, human)
            }
        },

        Commands::System { command } => match command {
            SystemCommands::Init => output(&commands::init(&ctx.data_dir)?, human),
            SystemCommands::Info => output(&commands::info(ctx)?, human),
        },
    }
    Ok(())
}

fn run_note(
    kind: NoteKind,
    command: NoteCommands,
    ctx: &Context,
    human: bool,
) -> Result<(), daytally::Error> {
    match command {
        NoteCommands::Set { text, date } => {
            let day = ctx.day(date.as_deref())?;
            let mut store = ctx.open_storage()?;
            let result = commands::note_set(&mut store, ctx.owner(), kind, day, &text)?;
            output(&result, human);
        }
        NoteCommands::Show { date, from, to } => match (from, to) {
            (Some(from), Some(to)) => {
                let range = ctx.range(Some(from.as_str()), Some(to.as_str()), None)?;
                let query = ctx.query(range)?;
                let store = ctx.open_storage()?;
                output(&commands::note_list(&store, &query, kind)?, human);
            }
            _ => {
                let day = ctx.day(date.as_deref())?;
                let store = ctx.open_storage()?;
                output(&commands::note_show(&store, ctx.owner(), kind, day)?, human);
            }
        },
    }
    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
