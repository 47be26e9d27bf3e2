//! Bulk crop command
//!
//! Shows the bulk config, asks the operator to confirm it, and runs the
//! chosen strategy over every image of the bulk input folder.

use std::io::IsTerminal;

use log::info;

use crate::api::CropKit;
use crate::commands::command_traits::{Command, CommandOutcome};
use crate::commands::session::{reported, CropSession};
use crate::crop::CropKind;
use crate::errors::CropResult;
use crate::utils::timed_input::{ask_to_continue, TimedInput, BULK_CONFIRM_TIMEOUT};

/// Command for cropping a whole folder of images
pub struct BulkCropCommand<'a> {
    /// Strategy applied to each image
    kind: CropKind,
    /// Library facade
    kit: &'a CropKit,
    /// Source of the confirmation answer
    input: TimedInput,
}

impl<'a> BulkCropCommand<'a> {
    pub fn new(kind: CropKind, kit: &'a CropKit, input: TimedInput) -> Self {
        BulkCropCommand { kind, kit, input }
    }
}

impl<'a> Command for BulkCropCommand<'a> {
    fn execute(&self) -> CropResult<CommandOutcome> {
        let config_path = self.kit.app_data().bulk_crop_config();
        println!("\"cropkit bulk-crop\", crop type \"{}\", command config:", self.kind);
        println!("{}", config_path.display());
        println!("{}", self.kit.config_text(&config_path).map_err(reported)?.trim_end());
        println!("-");

        let answer = ask_to_continue(&self.input, BULK_CONFIRM_TIMEOUT).map_err(|e| reported(e.into()))?;
        if !answer.proceeds() {
            println!("Aborted the cropping process");
            return Ok(CommandOutcome::Aborted);
        }

        let session = CropSession::start(
            &format!("cropkit bulk {} cropping", self.kind),
            &self.kit.app_data().log_file(),
        );
        let show_progress = std::io::stderr().is_terminal();
        let report = session.finish(self.kit.bulk_crop(self.kind, show_progress))?;
        info!("Cropped {} images into {} crops", report.images, report.crops);
        Ok(CommandOutcome::Completed)
    }
}
