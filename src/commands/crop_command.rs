//! Single-image crop commands
//!
//! `grid-crop` and `rand-crop` show the strategy's shared config, ask the
//! operator to confirm it, and crop the one image it names.

use log::info;

use crate::api::CropKit;
use crate::commands::command_traits::{Command, CommandOutcome};
use crate::commands::session::{reported, CropSession};
use crate::crop::CropKind;
use crate::errors::CropResult;
use crate::utils::timed_input::{ask_to_continue, TimedInput, STRATEGY_CONFIRM_TIMEOUT};

/// Command for cropping one image with a grid or random strategy
pub struct CropCommand<'a> {
    /// Strategy to run
    kind: CropKind,
    /// Library facade
    kit: &'a CropKit,
    /// Source of the confirmation answer
    input: TimedInput,
}

impl<'a> CropCommand<'a> {
    pub fn new(kind: CropKind, kit: &'a CropKit, input: TimedInput) -> Self {
        CropCommand { kind, kit, input }
    }
}

impl<'a> Command for CropCommand<'a> {
    fn execute(&self) -> CropResult<CommandOutcome> {
        let config_path = self.kit.config_path(self.kind);
        println!("\"cropkit {}-crop\" command config:", self.kind);
        println!("{}", config_path.display());
        println!("{}", self.kit.config_text(&config_path).map_err(reported)?.trim_end());
        println!("-");

        let answer = ask_to_continue(&self.input, STRATEGY_CONFIRM_TIMEOUT).map_err(|e| reported(e.into()))?;
        if !answer.proceeds() {
            println!("Aborted the image cropping process");
            return Ok(CommandOutcome::Aborted);
        }

        let session = CropSession::start(
            &format!("cropkit {}-crop", self.kind),
            &self.kit.app_data().log_file(),
        );
        let crops = session.finish(self.kit.crop(self.kind))?;
        info!("Saved {} crops in total", crops);
        Ok(CommandOutcome::Completed)
    }
}
