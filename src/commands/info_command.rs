//! Package and app data information command

use crate::api::CropKit;
use crate::commands::command_traits::{Command, CommandOutcome};
use crate::crop::CropKind;
use crate::errors::CropResult;

/// Command for printing the package details and where cropkit keeps its state
pub struct InfoCommand<'a> {
    kit: &'a CropKit,
}

impl<'a> InfoCommand<'a> {
    pub fn new(kit: &'a CropKit) -> Self {
        InfoCommand { kit }
    }

    /// The text printed by the command
    pub fn render(&self) -> String {
        let app_data = self.kit.app_data();
        let mut text = format!(
            "{} {}\n{}\n-\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_DESCRIPTION")
        );
        text.push_str(&format!("App data folder: {}\n", app_data.root().display()));
        for kind in CropKind::ALL {
            text.push_str(&format!(
                "{}-crop config: {}\n",
                kind,
                app_data.strategy_config(kind).display()
            ));
        }
        text.push_str(&format!("bulk-crop config: {}\n", app_data.bulk_crop_config().display()));
        text.push_str(&format!("Log file: {}", app_data.log_file().display()));
        text
    }
}

impl<'a> Command for InfoCommand<'a> {
    fn execute(&self) -> CropResult<CommandOutcome> {
        println!("{}", self.render());
        Ok(CommandOutcome::Completed)
    }
}
