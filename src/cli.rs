//! Command-line interface implementation for Stencil.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for Stencil.
#[derive(Parser, Debug)]
#[command(author, version, about = "Stencil: project scaffolding with a directive template preprocessor", long_about = None)]
pub struct Args {
    /// Name of the project to generate
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Project language, as declared in the template manifest
    #[arg(short, long)]
    pub language: String,

    /// Language standard; "latest" picks the newest declared standard
    #[arg(short, long, default_value = "latest")]
    pub standard: String,

    /// Template kind (e.g. executable, library)
    #[arg(short, long)]
    pub kind: String,

    /// Template mode within the kind (e.g. console)
    #[arg(short, long)]
    pub mode: String,

    /// Optional features to install, comma separated or repeated
    #[arg(short, long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Directory containing the templates and the manifest
    #[arg(long, default_value = "templates")]
    pub templates: PathBuf,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// Prints a compact help when required arguments are missing; defers to
/// clap's default handling for every other argument error.
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help()
                    .unwrap();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
