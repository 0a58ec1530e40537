use super::render::{print_messages, render_book_table, render_config};
use super::setup::{
    print_grouped_help, print_help_for_command, print_subcommand_help, BrowseCommands, Cli,
    Commands, EditCommands, FieldAssignment, FilterArgs, MiscCommands, RegisterMode,
};
use bookshelf::api::configure;
use bookshelf::commands::config::ConfigAction;
use bookshelf::commands::register::IsbnBatch;
use bookshelf::commands::{CmdMessage, CmdResult, MessageLevel};
use bookshelf::config::CatalogConfig;
use bookshelf::error::{CatalogError, Result};
use bookshelf::init::{config_dir, initialize, CatalogContext};
use bookshelf::logging::init_logging;
use bookshelf::model::{BookField, BookId};
use clap::Parser;
use std::path::Path;

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.help {
        if cli.command.is_none() {
            print_grouped_help();
        } else {
            print_subcommand_help(&cli.command);
        }
        return Ok(());
    }

    init_logging(cli.verbose)?;
    let dir = config_dir()?;

    // Config and help never talk to the server.
    match cli.command {
        Some(Commands::Misc(MiscCommands::Config { key, value })) => {
            return handle_config(&dir, key, value)
        }
        Some(Commands::Misc(MiscCommands::Help { command })) => return handle_help(command),
        _ => {}
    }

    let mut ctx = initialize(&dir, cli.server.as_deref())?;

    match cli.command {
        Some(Commands::Browse(cmd)) => match cmd {
            BrowseCommands::List { filter, sort } => handle_list(&mut ctx, filter, sort),
            BrowseCommands::Search { term, sort } => handle_search(&mut ctx, &term, sort),
        },
        Some(Commands::Edit(cmd)) => match cmd {
            EditCommands::Edit { set, delete } => handle_edit(&mut ctx, set, delete),
            EditCommands::Register { mode } => match mode {
                RegisterMode::Isbn { isbns } => handle_register_isbns(&mut ctx, isbns),
                RegisterMode::Manual(args) => handle_register_manual(&mut ctx, args.into_entry()),
            },
        },
        Some(Commands::Misc(_)) => Ok(()),
        None => handle_list(&mut ctx, FilterArgs::default(), Vec::new()),
    }
}

fn handle_list(ctx: &mut CatalogContext, filter: FilterArgs, sort: Vec<BookField>) -> Result<()> {
    let loaded = ctx.api.load();
    ctx.api.set_criteria(filter.into_criteria());
    for field in sort {
        ctx.api.toggle_sort(field);
    }

    let result = ctx.api.list();
    print_books(ctx, &result);
    print_messages(&loaded.messages);
    print_messages(&result.messages);
    Ok(())
}

fn handle_search(ctx: &mut CatalogContext, term: &str, sort: Vec<BookField>) -> Result<()> {
    let loaded = ctx.api.load();
    for field in sort {
        ctx.api.toggle_sort(field);
    }

    let result = ctx.api.search(term);
    print_books(ctx, &result);
    print_messages(&loaded.messages);
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(
    ctx: &mut CatalogContext,
    sets: Vec<FieldAssignment>,
    deletes: Vec<BookId>,
) -> Result<()> {
    if sets.is_empty() && deletes.is_empty() {
        return Err(CatalogError::Validation(
            "Nothing to edit: pass --set ID:FIELD=VALUE or --delete ID".to_string(),
        ));
    }

    let loaded = ctx.api.load();
    if ctx.api.records().is_empty() && loaded.has_level(MessageLevel::Warning) {
        // Saving now would replace the server catalog with an empty one.
        print_messages(&loaded.messages);
        return Err(CatalogError::Load(
            "catalog could not be loaded, nothing was saved".to_string(),
        ));
    }
    print_messages(&loaded.messages);

    let mut messages: Vec<CmdMessage> = ctx.api.toggle_edit_mode()?.messages;
    for assignment in &sets {
        let result = ctx
            .api
            .set_field(&assignment.id, assignment.field, &assignment.value)?;
        messages.extend(result.messages);
    }
    for id in &deletes {
        messages.extend(ctx.api.delete(id)?.messages);
    }
    print_messages(&messages);

    let saved = ctx.api.toggle_edit_mode()?;
    print_messages(&saved.messages);
    Ok(())
}

fn handle_register_isbns(ctx: &mut CatalogContext, isbns: Vec<String>) -> Result<()> {
    let batch = IsbnBatch::from_inputs(isbns)?;
    let result = ctx.api.register_isbns(&batch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_register_manual(
    ctx: &mut CatalogContext,
    entry: bookshelf::commands::register::ManualEntry,
) -> Result<()> {
    let result = ctx.api.register_manual(&entry)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(dir: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = configure(dir, action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config.list_all()));
        }
    }
    print_messages(&result.messages);

    if result.has_level(MessageLevel::Error) {
        return Err(CatalogError::Config(format!(
            "valid keys are: {}",
            CatalogConfig::KEYS.join(", ")
        )));
    }
    Ok(())
}

fn handle_help(command: Option<String>) -> Result<()> {
    match command {
        Some(name) => print_help_for_command(&name),
        None => print_grouped_help(),
    }
    Ok(())
}

fn print_books(ctx: &CatalogContext, result: &CmdResult) {
    print!(
        "{}",
        render_book_table(
            &result.listed_books,
            &ctx.api.sort_state(),
            ctx.api.records().len()
        )
    );
}
