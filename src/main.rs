//! Stencil's main application entry point and orchestration logic.
//! Handles command-line argument parsing and coordinates manifest loading,
//! template copying, preprocessing, and wildcard substitution.

use std::path::PathBuf;

use stencil::{
    cli::{get_args, Args},
    config::load_manifest,
    error::{default_error_handler, Error, Result},
    files::{copy_tree, rename_all, replace_all},
    logger::init_logger,
    processor::process_all,
    project::Project,
};

fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the template manifest
/// 2. Resolves and validates the project parameters
/// 3. Copies the common template tree and the selected features
/// 4. Runs the preprocessor over every generated file
/// 5. Substitutes wildcards in filenames and contents
/// 6. Writes the project info file and prints the summary
fn run(args: Args) -> Result<()> {
    let manifest = load_manifest(&args.templates)?;
    let project = Project::resolve(&args, &manifest)?;

    let destination = PathBuf::from(&project.name);
    if destination.exists() {
        return Err(Error::Project(format!(
            "Directory \"{}\" already exists.",
            destination.display()
        )));
    }

    copy_tree(&args.templates.join("common"), &destination)?;
    for feature in &project.features {
        copy_tree(&args.templates.join("features").join(feature), &destination)?;
    }

    process_all(&destination, &project.context())?;

    let wildcards = project.wildcards(&manifest.wildcards);
    rename_all(&destination, &wildcards)?;
    replace_all(&destination, &wildcards)?;

    project.save_info(&destination)?;
    project.print_summary();

    Ok(())
}
