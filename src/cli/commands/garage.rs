use crate::cli::core::{require_arg, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "new-garage",
            "Create an empty garage and make it current",
            "new-garage <name>",
            cmd_new_garage,
        ),
        CommandDefinition::new("open", "Open a stored garage", "open <name>", cmd_open),
        CommandDefinition::new("garages", "List stored garages", "garages", cmd_garages),
        CommandDefinition::new("save", "Save the current garage", "save", cmd_save),
        CommandDefinition::new(
            "backup",
            "Snapshot the current garage",
            "backup [note]",
            cmd_backup,
        ),
        CommandDefinition::new(
            "backups",
            "List snapshots of the current garage",
            "backups",
            cmd_backups,
        ),
        CommandDefinition::new(
            "restore",
            "Replace the current garage with a snapshot",
            "restore <backup number|file name>",
            cmd_restore,
        ),
    ]
}

fn cmd_new_garage(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: new-garage <name>".into(),
        ));
    }
    context.manager.create(name);
    context.active_vehicle = None;
    io::print_success(format!("New garage created: `{}`.", name));
    io::print_info("Use `save` to store it.");
    Ok(())
}

fn cmd_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, "open <name>")?;
    let warnings = context.manager.load(name)?;
    context.report_load(&warnings);
    context.active_vehicle = None;
    context.storage.record_last_garage(Some(name))?;
    let garage = context.manager.current()?;
    io::print_success(format!(
        "Opened `{}` ({} vehicles, {} fuel entries).",
        garage.name,
        garage.vehicles.len(),
        garage.entry_count()
    ));
    Ok(())
}

fn cmd_garages(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let names = context.manager.storage().list_garages()?;
    if names.is_empty() {
        io::print_info("No garages stored yet.");
        return Ok(());
    }
    output_section("Garages");
    for name in names {
        io::print_info(format!("  {}", name));
    }
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.manager.save()?;
    let name = context
        .manager
        .current_name()
        .map(str::to_string)
        .ok_or(CommandError::GarageNotLoaded)?;
    context.storage.record_last_garage(Some(&name))?;
    io::print_success(format!(
        "Garage saved to {}.",
        context.storage.garage_path(&name).display()
    ));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = args.join(" ");
    let note = Some(note.trim()).filter(|note| !note.is_empty());
    let file_name = context.manager.backup(note)?;
    io::print_success(format!("Backup created: {}", file_name));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.manager.list_backups()?;
    if backups.is_empty() {
        io::print_info("No backups yet. Use `backup [note]` to create one.");
        return Ok(());
    }
    output_section("Backups");
    for (index, name) in backups.iter().enumerate() {
        io::print_info(format!("  {:>2}. {}", index + 1, name));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = require_arg(args, 0, "restore <backup number|file name>")?;
    let backups = context.manager.list_backups()?;
    let chosen = match key.parse::<usize>() {
        Ok(position) => position
            .checked_sub(1)
            .and_then(|index| backups.get(index))
            .cloned(),
        Err(_) => backups.iter().find(|name| name.as_str() == key).cloned(),
    };
    let Some(backup) = chosen else {
        return Err(CommandError::InvalidArguments(format!(
            "no backup matches `{}`",
            key
        )));
    };
    if !context.confirm(&format!("Replace the current garage with `{}`?", backup))? {
        io::print_info("Restore cancelled.");
        return Ok(());
    }
    context.manager.restore(&backup)?;
    context.active_vehicle = None;
    io::print_success(format!("Restored `{}`.", backup));
    Ok(())
}
