use crate::cli::core::{parse_number, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;

use super::CommandDefinition;

const SET_USAGE: &str = "config set \
    <locale|currency|average-window|interval-km|interval-months|backup-retention> <value>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View or change preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!("usage: {}", SET_USAGE)));
            }
            let value = args[2..].join(" ");
            set_config_value(context, args[1], value.trim())?;
            context.persist_config()?;
            io::print_success(format!("Updated `{}`.", args[1]));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output_section("Preferences");
    io::print_info(format!("  locale           : {}", config.locale));
    io::print_info(format!("  currency         : {}", config.currency));
    io::print_info(format!("  average-window   : {}", config.average_window));
    io::print_info(format!(
        "  interval         : {} km / {} months",
        config.default_service_interval.distance_km, config.default_service_interval.months
    ));
    io::print_info(format!("  backup-retention : {}", config.backup_retention));
    io::print_info(format!("  file             : {}", context.config_manager.path().display()));
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let config = &mut context.config;
    match key.to_lowercase().as_str() {
        "locale" => config.locale = value.to_string(),
        "currency" => config.currency = value.to_uppercase(),
        "average-window" => config.average_window = positive(value, "average window")?,
        "interval-km" => {
            config.default_service_interval.distance_km = positive(value, "interval distance")?
        }
        "interval-months" => {
            config.default_service_interval.months = positive(value, "interval months")?
        }
        "backup-retention" => {
            config.backup_retention = positive(value, "backup retention")?;
            io::print_info("Retention applies from the next start.");
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{}`",
                other
            )))
        }
    }
    Ok(())
}

fn positive<T>(value: &str, field: &str) -> Result<T, CommandError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed: T = parse_number(value, field)?;
    if parsed <= T::default() {
        return Err(CommandError::InvalidArguments(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(parsed)
}
