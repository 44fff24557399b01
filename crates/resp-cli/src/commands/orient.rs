use crate::cli::OrientArgs;
use crate::commands::progress_bar;
use crate::error::{CliError, Result};
use respfit::core::io::xyz;
use respfit::engine::config::OrientationConfig;
use respfit::engine::conformer::Conformer;
use tracing::info;

pub fn run(args: OrientArgs) -> Result<()> {
    let (molecule, _) = xyz::read_from_path(&args.input)?;

    let content = std::fs::read_to_string(&args.config)?;
    let orientation_config: OrientationConfig =
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: args.config.clone(),
            source: anyhow::Error::new(e),
        })?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or_else(|| {
                CliError::Argument(format!(
                    "cannot derive a conformer name from '{}'",
                    args.input.display()
                ))
            })?,
    };

    let conformer = Conformer::builder(&name, molecule)
        .orientation_config(orientation_config)
        .build()?;
    info!(
        conformer = conformer.name(),
        n_orientations = conformer.n_orientations(),
        "generated orientations"
    );

    std::fs::create_dir_all(&args.outdir)?;
    let bar = progress_bar(conformer.n_orientations() as u64, "Writing orientations");
    for orientation in conformer.orientations() {
        let path = args.outdir.join(format!("{}.xyz", orientation.name()));
        xyz::write_to_path(orientation.molecule(), orientation.name(), &path)?;
        bar.inc(1);
    }
    bar.finish();

    println!(
        "Wrote {} orientations to {}",
        conformer.n_orientations(),
        args.outdir.display()
    );
    Ok(())
}
