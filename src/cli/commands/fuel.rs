use crate::cli::core::{
    parse_date, parse_number, pick, require_arg, short_id, CommandError, CommandResult,
    ShellContext,
};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::core::efficiency;
use crate::core::services::{FuelEntryInput, FuelService};

use super::CommandDefinition;

const ADD_USAGE: &str = "add-fuel <date> <odometer_km> <litres> <total_price> \
    [--partial] [--station <name>] [--price-per-litre <price>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add-fuel",
            "Record a fill-up for the selected vehicle",
            ADD_USAGE,
            cmd_add_fuel,
        ),
        CommandDefinition::new(
            "fuel",
            "List fill-ups of the selected vehicle, newest first",
            "fuel [limit]",
            cmd_fuel,
        ),
        CommandDefinition::new(
            "delete-fuel",
            "Delete a fill-up",
            "delete-fuel <entry number|id prefix>",
            cmd_delete_fuel,
        ),
        CommandDefinition::new(
            "average",
            "Average consumption over the most recent full tanks",
            "average [window]",
            cmd_average,
        ),
    ]
}

struct FuelOptions {
    is_full_tank: bool,
    station_name: String,
    price_per_litre: Option<f64>,
}

fn parse_options(args: &[&str]) -> Result<FuelOptions, CommandError> {
    let mut options = FuelOptions {
        is_full_tank: true,
        station_name: String::new(),
        price_per_litre: None,
    };
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        match *flag {
            "--partial" => options.is_full_tank = false,
            "--full" => options.is_full_tank = true,
            "--station" => {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments("--station needs a name".into())
                })?;
                options.station_name = value.to_string();
            }
            "--price-per-litre" => {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments("--price-per-litre needs a value".into())
                })?;
                options.price_per_litre = Some(parse_number(value, "price per litre")?);
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{}`",
                    other
                )))
            }
        }
    }
    Ok(options)
}

fn cmd_add_fuel(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let date = parse_date(require_arg(args, 0, ADD_USAGE)?)?;
    let odometer_km: u32 = parse_number(require_arg(args, 1, ADD_USAGE)?, "odometer")?;
    let litres: f64 = parse_number(require_arg(args, 2, ADD_USAGE)?, "litres")?;
    let total_price: f64 = parse_number(require_arg(args, 3, ADD_USAGE)?, "total price")?;
    let options = parse_options(&args[4..])?;
    let vehicle = context.resolve_vehicle(None)?;

    let input = FuelEntryInput {
        vehicle_id: vehicle.id,
        date,
        station_name: options.station_name,
        odometer_km,
        litres,
        total_price,
        price_per_litre: options.price_per_litre,
        is_full_tank: options.is_full_tank,
    };
    let entry =
        context.with_garage_mut(|garage, ctx| Ok(FuelService::add_entry(garage, ctx, input)?))?;

    io::print_success(format!(
        "Fill-up recorded: {:.2} L for {} at {} km [{}]",
        entry.litres,
        context.format_money(entry.total_price),
        entry.odometer_km,
        short_id(entry.id)
    ));
    match entry.consumption_l_per_100km {
        Some(value) => io::print_info(format!("Consumption: {:.1} L/100 km", value)),
        None if entry.is_full_tank => {
            io::print_info("Consumption: n/a (no earlier full tank to compare)")
        }
        None => io::print_info("Consumption: n/a (partial fill)"),
    }
    Ok(())
}

fn cmd_fuel(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(raw) => Some(parse_number::<usize>(raw, "limit")?),
        None => None,
    };
    let vehicle = context.resolve_vehicle(None)?;
    let entries = context.with_garage(|garage, ctx| {
        Ok(FuelService::entries_for_vehicle(garage, ctx, vehicle.id)?)
    })?;
    if entries.is_empty() {
        io::print_info("No fill-ups recorded yet.");
        return Ok(());
    }

    output_section(format!("Fuel log: {}", vehicle.display_name()));
    for (index, entry) in entries.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
        let consumption = entry
            .consumption_l_per_100km
            .map(|value| format!("{:.1} L/100km", value))
            .unwrap_or_else(|| "-".into());
        let price = entry
            .price_per_litre
            .map(|value| format!("{:.3}/L", value))
            .unwrap_or_else(|| "-".into());
        io::print_info(format!(
            "  {:>2}. {}  {:>9} km  {:>7.2} L  {:>12}  {:>9}  {:<5} {:>14}  {} [{}]",
            index + 1,
            entry.date,
            entry.odometer_km,
            entry.litres,
            context.format_money(entry.total_price),
            price,
            if entry.is_full_tank { "full" } else { "part" },
            consumption,
            entry.station_name,
            short_id(entry.id)
        ));
    }
    Ok(())
}

fn cmd_delete_fuel(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = require_arg(args, 0, "delete-fuel <entry number|id prefix>")?;
    let vehicle = context.resolve_vehicle(None)?;
    let entries = context.with_garage(|garage, ctx| {
        Ok(FuelService::entries_for_vehicle(garage, ctx, vehicle.id)?)
    })?;
    let entry = pick(&entries, key, |entry| entry.id)
        .cloned()
        .ok_or_else(|| CommandError::InvalidArguments(format!("no fill-up matches `{}`", key)))?;

    let prompt = format!(
        "Delete fill-up of {} at {} km?",
        entry.date, entry.odometer_km
    );
    if !context.confirm(&prompt)? {
        io::print_info("Delete cancelled.");
        return Ok(());
    }
    context.with_garage_mut(|garage, ctx| Ok(FuelService::delete_entry(garage, ctx, entry.id)?))?;
    io::print_success(format!("Deleted fill-up [{}].", short_id(entry.id)));
    Ok(())
}

fn cmd_average(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let window = match args.first() {
        Some(raw) => parse_number::<usize>(raw, "window")?,
        None => context.config.average_window,
    };
    let vehicle = context.resolve_vehicle(None)?;
    let entries = context.with_garage(|garage, ctx| {
        Ok(FuelService::entries_for_vehicle(garage, ctx, vehicle.id)?)
    })?;
    let samples = efficiency::recent_consumption_values(&entries, window).len();
    match efficiency::average_consumption(&entries, window) {
        Some(value) => io::print_success(format!(
            "Average of {} measured fill-up{} (window {}): {:.1} L/100 km",
            samples,
            if samples == 1 { "" } else { "s" },
            window,
            value
        )),
        None => io::print_info("Not enough full-tank fill-ups for an average yet."),
    }
    Ok(())
}
