use crate::cli::core::{
    parse_date, parse_number, require_arg, short_id, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::core::services::{VehicleInput, VehicleService};
use crate::garage::ServiceInterval;

use super::CommandDefinition;

const ADD_USAGE: &str = "add-vehicle <brand> <model> <year> <odometer_km> \
    [last_service_km] [last_service_date] [interval_km] [interval_months]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add-vehicle",
            "Register a vehicle and select it",
            ADD_USAGE,
            cmd_add_vehicle,
        ),
        CommandDefinition::new("vehicles", "List your vehicles", "vehicles", cmd_vehicles),
        CommandDefinition::new(
            "use",
            "Select the vehicle other commands act on",
            "use <vehicle number|id prefix>",
            cmd_use,
        ),
        CommandDefinition::new(
            "odometer",
            "Correct the current odometer of the selected vehicle",
            "odometer <km>",
            cmd_odometer,
        ),
        CommandDefinition::new(
            "delete-vehicle",
            "Delete a vehicle together with its fuel entries",
            "delete-vehicle [vehicle number|id prefix]",
            cmd_delete_vehicle,
        ),
    ]
}

fn cmd_add_vehicle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let brand = require_arg(args, 0, ADD_USAGE)?;
    let model = require_arg(args, 1, ADD_USAGE)?;
    let year: i32 = parse_number(require_arg(args, 2, ADD_USAGE)?, "year")?;
    let current_odometer_km: u32 = parse_number(require_arg(args, 3, ADD_USAGE)?, "odometer")?;
    let last_service_odometer_km = match args.get(4) {
        Some(raw) => parse_number(raw, "last service odometer")?,
        None => current_odometer_km,
    };
    let last_service_date = match args.get(5) {
        Some(raw) => parse_date(raw)?,
        None => context.today(),
    };
    let defaults = context.config.default_service_interval;
    let service_interval = ServiceInterval::new(
        match args.get(6) {
            Some(raw) => parse_number(raw, "interval distance")?,
            None => defaults.distance_km,
        },
        match args.get(7) {
            Some(raw) => parse_number(raw, "interval months")?,
            None => defaults.months,
        },
    );

    let input = VehicleInput {
        brand: brand.to_string(),
        model: model.to_string(),
        year,
        service_interval,
        current_odometer_km,
        last_service_odometer_km,
        last_service_date,
    };
    let vehicle =
        context.with_garage_mut(|garage, ctx| Ok(VehicleService::add(garage, ctx, input)?))?;
    context.active_vehicle = Some(vehicle.id);
    io::print_success(format!(
        "Vehicle added: {} [{}]",
        vehicle.display_name(),
        short_id(vehicle.id)
    ));
    Ok(())
}

fn cmd_vehicles(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let vehicles =
        context.with_garage(|garage, ctx| Ok(VehicleService::list_for_owner(garage, ctx)?))?;
    if vehicles.is_empty() {
        io::print_info("No vehicles yet. Use `add-vehicle` to register one.");
        return Ok(());
    }
    output_section("Vehicles");
    for (index, vehicle) in vehicles.iter().enumerate() {
        let marker = if context.active_vehicle == Some(vehicle.id) {
            "*"
        } else {
            " "
        };
        io::print_info(format!(
            "{} {:>2}. {:<28} {:>9} km  [{}]",
            marker,
            index + 1,
            vehicle.display_name(),
            vehicle.current_odometer_km,
            short_id(vehicle.id)
        ));
    }
    Ok(())
}

fn cmd_use(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = require_arg(args, 0, "use <vehicle number|id prefix>")?;
    let vehicle = context.resolve_vehicle(Some(key))?;
    context.active_vehicle = Some(vehicle.id);
    io::print_success(format!("Using {}.", vehicle.display_name()));
    Ok(())
}

fn cmd_odometer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let odometer_km: u32 = parse_number(require_arg(args, 0, "odometer <km>")?, "odometer")?;
    let vehicle = context.resolve_vehicle(None)?;
    if odometer_km < vehicle.current_odometer_km {
        io::print_warning(format!(
            "Lowering odometer from {} km to {} km.",
            vehicle.current_odometer_km, odometer_km
        ));
    }
    context.with_garage_mut(|garage, ctx| {
        Ok(VehicleService::update_odometer(garage, ctx, vehicle.id, odometer_km)?)
    })?;
    io::print_success(format!("Odometer set to {} km.", odometer_km));
    Ok(())
}

fn cmd_delete_vehicle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let vehicle = context.resolve_vehicle(args.first().copied())?;
    let prompt = format!(
        "Delete {} and all of its fuel entries?",
        vehicle.display_name()
    );
    if !context.confirm(&prompt)? {
        io::print_info("Delete cancelled.");
        return Ok(());
    }
    context.with_garage_mut(|garage, ctx| {
        Ok(VehicleService::delete(garage, ctx, vehicle.id)?)
    })?;
    if context.active_vehicle == Some(vehicle.id) {
        context.active_vehicle = None;
    }
    io::print_success(format!("Deleted {}.", vehicle.display_name()));
    Ok(())
}
