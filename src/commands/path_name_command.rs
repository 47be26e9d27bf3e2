//! Path name command
//!
//! Prints a path in the form the JSON configs expect: absolute, quoted and
//! escaped, so it can be pasted straight into `image_location` and friends.

use crate::api::CropKit;
use crate::commands::command_traits::{Command, CommandOutcome};
use crate::commands::session::reported;
use crate::errors::CropResult;

/// Command for printing a path as a JSON-ready string
pub struct PathNameCommand<'a> {
    /// Path as given on the command line
    path: String,
    kit: &'a CropKit,
}

impl<'a> PathNameCommand<'a> {
    pub fn new(path: impl Into<String>, kit: &'a CropKit) -> Self {
        PathNameCommand {
            path: path.into(),
            kit,
        }
    }
}

impl<'a> Command for PathNameCommand<'a> {
    fn execute(&self) -> CropResult<CommandOutcome> {
        println!("{}", self.kit.path_name(&self.path).map_err(reported)?);
        Ok(CommandOutcome::Completed)
    }
}
