use crate::cli::core::{parse_date, parse_number, require_arg, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::core::maintenance::MaintenanceStatus;
use crate::core::services::MaintenanceService;
use crate::garage::Vehicle;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "status",
            "Show oil-change status for the selected vehicle or all vehicles",
            "status [all|vehicle number|id prefix]",
            cmd_status,
        ),
        CommandDefinition::new(
            "record-service",
            "Record an oil change for the selected vehicle",
            "record-service <date> <odometer_km>",
            cmd_record_service,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let show_all = match args.first() {
        Some(arg) => arg.eq_ignore_ascii_case("all"),
        None => context.active_vehicle.is_none(),
    };

    if show_all {
        let rows = context
            .with_garage(|garage, ctx| Ok(MaintenanceService::fleet_status(garage, ctx)?))?;
        if rows.is_empty() {
            io::print_info("No vehicles yet. Use `add-vehicle` to register one.");
            return Ok(());
        }
        output_section("Service status");
        for (vehicle, status) in &rows {
            print_summary_line(vehicle, status);
        }
        return Ok(());
    }

    let vehicle = context.resolve_vehicle(args.first().copied())?;
    let status = context.with_garage(|garage, ctx| {
        Ok(MaintenanceService::status(garage, ctx, vehicle.id)?)
    })?;
    print_detail(&vehicle, &status);
    Ok(())
}

fn cmd_record_service(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "record-service <date> <odometer_km>";
    let date = parse_date(require_arg(args, 0, usage)?)?;
    let odometer_km: u32 = parse_number(require_arg(args, 1, usage)?, "odometer")?;
    let vehicle = context.resolve_vehicle(None)?;
    let updated = context.with_garage_mut(|garage, ctx| {
        Ok(MaintenanceService::record_service(
            garage,
            ctx,
            vehicle.id,
            date,
            odometer_km,
        )?)
    })?;
    io::print_success(format!(
        "Service recorded for {} on {} at {} km.",
        updated.display_name(),
        date,
        odometer_km
    ));
    let status = context.with_garage(|garage, ctx| {
        Ok(MaintenanceService::status(garage, ctx, updated.id)?)
    })?;
    io::print_info(format!(
        "Next service at {} km or on {}.",
        status.next_service_odometer_km, status.next_service_date
    ));
    Ok(())
}

fn print_summary_line(vehicle: &Vehicle, status: &MaintenanceStatus) {
    let line = format!(
        "  {:<28} {:>7} km  {:>5} days  next {}",
        vehicle.display_name(),
        status.distance_remaining_km,
        status.days_remaining,
        status.next_service_date
    );
    if status.is_overdue() {
        io::print_warning(format!("{} OVERDUE", line.trim_start()));
    } else {
        io::print_info(line);
    }
}

fn print_detail(vehicle: &Vehicle, status: &MaintenanceStatus) {
    output_section(format!("Service status: {}", vehicle.display_name()));
    io::print_info(format!(
        "  Last service : {} at {} km",
        status.last_service_date, status.last_service_odometer_km
    ));
    io::print_info(format!(
        "  Next service : {} or {} km",
        status.next_service_date, status.next_service_odometer_km
    ));
    io::print_info(format!("  Odometer     : {} km", vehicle.current_odometer_km));
    io::print_info(format!(
        "  Remaining    : {} km, {} days",
        status.distance_remaining_km, status.days_remaining
    ));
    if status.overdue_by_distance {
        io::print_warning(format!(
            "Oil change overdue by {} km.",
            -status.distance_remaining_km
        ));
    }
    if status.overdue_by_time {
        io::print_warning(format!(
            "Oil change was due on {}.",
            status.next_service_date
        ));
    }
    if !status.is_overdue() {
        io::print_success("Oil change not due yet.");
    }
}
