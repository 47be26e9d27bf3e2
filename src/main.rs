use clap::error::ErrorKind;
use clap::{Arg, Command as ClapCommand};
use log::error;
use std::process;

use cropkit::api::CropKit;
use cropkit::commands::{
    run_command, CommandFactory, CropkitCommandFactory, BULK_CROP, GRID_CROP, INFO, PATH_NAME, RAND_CROP,
};
use cropkit::config::app_data::APP_DATA_ENV;
use cropkit::config::AppData;
use cropkit::utils::logger::Logger;
use cropkit::utils::timed_input::{echo_one_line, READ_LINE_COMMAND};

fn cli() -> ClapCommand {
    ClapCommand::new("cropkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Crop large images into dataset tiles on a grid or at random")
        .subcommand_required(true)
        .arg(
            Arg::new("app-data")
                .long("app-data")
                .help(format!(
                    "Folder holding the configs and the log (default: ${} or ./cropkit_app_data)",
                    APP_DATA_ENV
                ))
                .value_name("DIR")
                .global(true)
                .required(false),
        )
        .subcommand(
            ClapCommand::new(GRID_CROP)
                .about("Crop one image on a grid using grid_crop_config.json"),
        )
        .subcommand(
            ClapCommand::new(RAND_CROP)
                .about("Crop one image at random positions using rand_crop_config.json"),
        )
        .subcommand(
            ClapCommand::new(BULK_CROP)
                .about("Crop every image of a folder using bulk_crop_config.json")
                .arg(
                    Arg::new("crop_type")
                        .help("Strategy applied to each image")
                        .value_parser(["grid", "rand"])
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(ClapCommand::new(INFO).about("Show package details and where the configs live"))
        .subcommand(
            ClapCommand::new(PATH_NAME)
                .about("Print a path as an absolute, quoted string for the configs")
                .arg(Arg::new("path").help("Path to convert").required(true).index(1)),
        )
        .subcommand(
            ClapCommand::new(READ_LINE_COMMAND)
                .about("Read one line from stdin and echo it")
                .hide(true),
        )
}

fn main() {
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(1),
            }
        }
    };

    if matches.subcommand_name() == Some(READ_LINE_COMMAND) {
        match echo_one_line() {
            Ok(true) => process::exit(0),
            _ => process::exit(1),
        }
    }

    let app_data = match AppData::locate(matches.get_one::<String>("app-data").map(String::as_str)) {
        Ok(app_data) => app_data,
        Err(e) => {
            eprintln!("Error locating app data: {}", e);
            process::exit(1);
        }
    };

    let logger = match Logger::new(&app_data.log_file()) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };
    logger.init_global_logger();

    let kit = CropKit::new(app_data);
    if let Err(e) = kit.app_data().ensure_defaults() {
        error!("Failed to prepare app data: {}", e);
        process::exit(1);
    }

    let factory = CropkitCommandFactory::new();

    let command_result = factory.create_command(&matches, &kit);
    match command_result {
        Ok(command) => process::exit(run_command(command.as_ref())),
        Err(e) => {
            error!("Failed to create command: {}", e);
            process::exit(1);
        }
    };
}
