//! Shell context, dispatch, and argument helpers shared by all commands.

use std::io;

use chrono::NaiveDate;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    core::{
        clock::{Clock, SystemClock},
        garage_manager::GarageManager,
        services::{ServiceContext, ServiceError, VehicleService},
        session::Session,
    },
    errors::GarageError,
    garage::{Garage, Vehicle},
    storage::JsonStorage,
    utils::paths,
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::io as cli_io;
use super::output::{self, OutputPreferences};

const LOCAL_USER_ENV: &str = "USER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: GarageManager,
    pub storage: JsonStorage,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub session: Session,
    pub clock: SystemClock,
    pub active_vehicle: Option<Uuid>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        output::set_preferences(OutputPreferences {
            plain: mode == CliMode::Script,
        });

        let base = paths::app_data_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new(Some(base), Some(config.backup_retention))?;
        let manager = GarageManager::new(Box::new(storage.clone()));
        let clock = SystemClock;
        let session = restore_session(&storage, &clock)?;

        let mut app = ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            manager,
            storage,
            config_manager,
            config,
            session,
            clock,
            active_vehicle: None,
            running: true,
        };
        app.auto_load_last()?;
        Ok(app)
    }

    fn auto_load_last(&mut self) -> Result<(), CliError> {
        if self.mode != CliMode::Interactive {
            return Ok(());
        }
        let Some(name) = self.storage.read_state()?.last_garage else {
            return Ok(());
        };
        match self.manager.load(&name) {
            Ok(warnings) => {
                self.report_load(&warnings);
                cli_io::print_success(format!("Automatically opened last garage `{}`.", name));
            }
            Err(err) => debug!(garage = %name, error = %err, "last garage not reopened"),
        }
        Ok(())
    }

    pub(crate) fn report_load(&self, warnings: &[String]) {
        for warning in warnings {
            cli_io::print_warning(warning);
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        let garage = self.manager.current_name().unwrap_or("no garage");
        match self.active_vehicle_name() {
            Some(vehicle) => format!("fuel [{} | {}]> ", garage, vehicle),
            None => format!("fuel [{}]> ", garage),
        }
    }

    fn active_vehicle_name(&self) -> Option<String> {
        let id = self.active_vehicle?;
        let garage = self.manager.current().ok()?;
        garage.vehicle_ref(id).map(Vehicle::display_name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?")?)
    }

    /// Asks before destructive actions; script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(prompt)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::GarageNotLoaded => {
                cli_io::print_error("No garage open. Use `new-garage` or `open` first.");
                Ok(())
            }
            CommandError::NoActiveVehicle => {
                cli_io::print_error("No vehicle selected. Use `use <vehicle>` first.");
                cli_io::print_hint("`vehicles` lists the numbers to pick from.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn with_garage<T>(
        &self,
        f: impl FnOnce(&Garage, &ServiceContext<'_>) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        let ctx = ServiceContext::new(&self.session, &self.clock);
        let garage = self.manager.current()?;
        f(garage, &ctx)
    }

    pub(crate) fn with_garage_mut<T>(
        &mut self,
        f: impl FnOnce(&mut Garage, &ServiceContext<'_>) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        let ctx = ServiceContext::new(&self.session, &self.clock);
        let garage = self.manager.current_mut()?;
        f(garage, &ctx)
    }

    /// Resolves a vehicle argument (list number or id prefix), falling back
    /// to the active vehicle when none is given.
    pub(crate) fn resolve_vehicle(&self, arg: Option<&str>) -> Result<Vehicle, CommandError> {
        self.with_garage(|garage, ctx| {
            let vehicles = VehicleService::list_for_owner(garage, ctx)?;
            match arg {
                Some(key) => pick(&vehicles, key, |vehicle| vehicle.id)
                    .cloned()
                    .ok_or_else(|| {
                        CommandError::InvalidArguments(format!("no vehicle matches `{}`", key))
                    }),
                None => {
                    let id = self.active_vehicle.ok_or(CommandError::NoActiveVehicle)?;
                    vehicles
                        .into_iter()
                        .find(|vehicle| vehicle.id == id)
                        .ok_or(CommandError::NoActiveVehicle)
                }
            }
        })
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub(crate) fn format_money(&self, amount: f64) -> String {
        format!("{:.2} {}", amount, self.config.currency)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}

/// Loads the stored session, renewing it when expired, or creates a new local one.
fn restore_session(storage: &JsonStorage, clock: &dyn Clock) -> Result<Session, CliError> {
    let mut state = storage.read_state()?;
    let now = clock.now();
    let session = match state.session.take() {
        Some(mut session) => {
            if session.is_expired(now) {
                let expiry = session.renew(now);
                debug!(%expiry, "renewed expired local session");
            }
            session
        }
        None => {
            let user = std::env::var(LOCAL_USER_ENV).unwrap_or_else(|_| "driver".into());
            Session::local(format!("{}@localhost", user))
        }
    };
    state.session = Some(session.clone());
    storage.write_state(&state)?;
    Ok(session)
}

/// Picks an item by 1-based list position or by a prefix of its id.
///
/// A number outside the list is retried as an id prefix.
pub(crate) fn pick<'a, T>(items: &'a [T], key: &str, id: impl Fn(&T) -> Uuid) -> Option<&'a T> {
    let by_position = key
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| items.get(index));
    if by_position.is_some() {
        return by_position;
    }
    let needle = key.to_lowercase();
    let mut matches = items
        .iter()
        .filter(|item| id(item).simple().to_string().starts_with(&needle));
    let first = matches.next();
    if matches.next().is_some() {
        warn!(key, "ambiguous id prefix");
        return None;
    }
    first
}

pub(crate) fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_number<T: std::str::FromStr>(
    input: &str,
    field: &str,
) -> Result<T, CommandError> {
    input
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid {} `{}`", field, input)))
}

pub(crate) fn require_arg<'a>(
    args: &[&'a str],
    index: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] GarageError),
    #[error("{0}")]
    Input(String),
    #[error("{0}")]
    Command(String),
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No garage open. Use `new-garage` or `open` first.")]
    GarageNotLoaded,
    #[error("No vehicle selected. Use `use <vehicle>` first.")]
    NoActiveVehicle,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(GarageError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<GarageError> for CommandError {
    fn from(err: GarageError) -> Self {
        match err {
            GarageError::NotLoaded => CommandError::GarageNotLoaded,
            other => CommandError::Core(other),
        }
    }
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Garage(err) => err.into(),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}
