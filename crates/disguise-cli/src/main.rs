use clap::{crate_authors, crate_description, crate_version, Arg, ArgAction, ArgMatches, Command};

use disguise_core::commands::{detect_file, disguise, reveal};
use disguise_core::{ComposeOptions, Result, Strategy};

use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("Disguise CLI")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg_required_else_help(true)
        .subcommand(
            Command::new("disguise")
                .about("Hides a file behind a cover image")
                .arg(
                    Arg::new("payload")
                        .short('d')
                        .long("data")
                        .value_name("payload file")
                        .required(true)
                        .help("File to hide behind the cover image"),
                )
                .arg(
                    Arg::new("cover")
                        .short('i')
                        .long("in")
                        .value_name("cover image")
                        .required(true)
                        .help("Cover image (JPEG, PNG, GIF or BMP), used readonly"),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("format tag")
                        .default_value("jpg")
                        .help("Output format tag: jpg, png, gif or bmp"),
                )
                .arg(
                    Arg::new("output_folder")
                        .short('o')
                        .long("out")
                        .value_name("output folder")
                        .required(true)
                        .help("The composite will be stored in that folder"),
                )
                .arg(
                    Arg::new("payload_first")
                        .long("payload-first")
                        .action(ArgAction::SetTrue)
                        .help(
                            "Write the payload before the cover so the composite \
                             stays usable as the payload when renamed (the file \
                             will no longer render as an image)",
                        ),
                ),
        )
        .subcommand(
            Command::new("reveal")
                .about("Recovers a hidden file from a composite")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("in")
                        .value_name("composite file")
                        .required(true)
                        .help("File that contains a hidden payload"),
                )
                .arg(
                    Arg::new("output_folder")
                        .short('o')
                        .long("out")
                        .value_name("output folder")
                        .required(true)
                        .help("The recovered payload will be stored in that folder"),
                ),
        )
        .subcommand(
            Command::new("detect")
                .about("Checks whether a file carries a hidden payload")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("in")
                        .value_name("suspect file")
                        .required(true)
                        .help("File to scan for a hidden payload"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("disguise", m)) => {
            let target = disguise(
                Path::new(m.get_one::<String>("payload").unwrap()),
                Path::new(m.get_one::<String>("cover").unwrap()),
                m.get_one::<String>("format").unwrap(),
                Path::new(m.get_one::<String>("output_folder").unwrap()),
                get_options(m),
            )?;

            println!("Composite written to {}", target.display());
        }
        Some(("reveal", m)) => {
            let target = reveal(
                Path::new(m.get_one::<String>("input").unwrap()),
                Path::new(m.get_one::<String>("output_folder").unwrap()),
            )?;

            println!("Payload recovered to {}", target.display());
        }
        Some(("detect", m)) => {
            let input = m.get_one::<String>("input").unwrap();
            match detect_file(Path::new(input))? {
                Some(detection) => {
                    println!("{input}: disguised file detected");
                    println!("  original name: {}", detection.metadata.original_name);
                    println!("  original size: {} bytes", detection.metadata.original_size);
                    println!("  original type: {}", detection.metadata.original_type);
                    println!("  format version: {}", detection.metadata.version);
                    println!("  strategy: {:?}", detection.strategy);
                }
                None => println!("{input}: no disguised payload found"),
            }
        }
        _ => unreachable!("arg_required_else_help prevents an empty subcommand"),
    }

    Ok(())
}

fn get_options(matches: &ArgMatches) -> ComposeOptions {
    let strategy = if matches.get_flag("payload_first") {
        Strategy::PayloadFirst
    } else {
        Strategy::CoverFirst
    };

    ComposeOptions::default().with_strategy(strategy)
}
