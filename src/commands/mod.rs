//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod bulk_crop_command;
pub mod command_traits;
pub mod crop_command;
pub mod info_command;
pub mod path_name_command;
pub mod session;

pub use bulk_crop_command::BulkCropCommand;
pub use command_traits::{Command, CommandFactory, CommandOutcome};
pub use crop_command::CropCommand;
pub use info_command::InfoCommand;
pub use path_name_command::PathNameCommand;
pub use session::{log_failure, CropSession};

use clap::ArgMatches;

use crate::api::CropKit;
use crate::crop::CropKind;
use crate::errors::{CropError, CropResult};
use crate::utils::timed_input::TimedInput;

/// Subcommand names understood by [`CropkitCommandFactory`]
pub const GRID_CROP: &str = "grid-crop";
pub const RAND_CROP: &str = "rand-crop";
pub const BULK_CROP: &str = "bulk-crop";
pub const INFO: &str = "info";
pub const PATH_NAME: &str = "path-name";

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the chosen subcommand and creates
/// the appropriate command instance for execution.
pub struct CropkitCommandFactory;

impl CropkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        CropkitCommandFactory
    }
}

impl Default for CropkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for CropkitCommandFactory {
    fn create_command(&self, args: &ArgMatches, kit: &'a CropKit) -> CropResult<Box<dyn Command + 'a>> {
        match args.subcommand() {
            Some((GRID_CROP, _)) => Ok(Box::new(CropCommand::new(CropKind::Grid, kit, TimedInput::new()?))),
            Some((RAND_CROP, _)) => Ok(Box::new(CropCommand::new(CropKind::Rand, kit, TimedInput::new()?))),
            Some((BULK_CROP, sub)) => {
                let kind = sub
                    .get_one::<String>("crop_type")
                    .ok_or_else(|| CropError::GenericError("Missing crop type".to_string()))?
                    .parse::<CropKind>()?;
                Ok(Box::new(BulkCropCommand::new(kind, kit, TimedInput::new()?)))
            }
            Some((INFO, _)) => Ok(Box::new(InfoCommand::new(kit))),
            Some((PATH_NAME, sub)) => {
                let path = sub
                    .get_one::<String>("path")
                    .ok_or_else(|| CropError::GenericError("Missing path".to_string()))?;
                Ok(Box::new(PathNameCommand::new(path.as_str(), kit)))
            }
            Some((other, _)) => Err(CropError::GenericError(format!("Unknown command \"{}\"", other))),
            None => Err(CropError::GenericError("No command given; see --help".to_string())),
        }
    }
}

/// Runs a command and returns the process exit code
///
/// Commands log their own failures, so only the outcome is mapped here.
pub fn run_command(command: &dyn Command) -> i32 {
    match command.execute() {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
