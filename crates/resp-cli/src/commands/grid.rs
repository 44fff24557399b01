use crate::cli::GridArgs;
use crate::commands::progress_bar;
use crate::error::{CliError, Result};
use respfit::core::grid::{connolly_shells, vdw_surface};
use respfit::core::io::xyz;
use respfit::core::vdw::{RadiiConfig, RadiiSet};
use respfit::engine::config::GridConfig;
use respfit::engine::error::EngineError;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

fn build_config(args: &GridArgs) -> Result<GridConfig> {
    let mut radii = RadiiConfig::default();
    if let Some(name) = &args.radii {
        radii.set = name
            .parse::<RadiiSet>()
            .map_err(|_| CliError::Argument(format!("unknown radius set '{name}'")))?;
    }
    if let Some(path) = &args.radii_csv {
        radii.load_overrides(path).map_err(EngineError::from)?;
    }

    let mut builder = GridConfig::builder().radii(radii);
    if let Some(density) = args.density {
        builder = builder.density(density);
    }
    if let Some(factors) = &args.scale_factors {
        builder = builder.scale_factors(factors);
    }
    if let Some(rmin) = args.rmin {
        builder = builder.rmin(rmin);
    }
    if let Some(rmax) = args.rmax {
        builder = builder.rmax(rmax);
    }
    Ok(builder.build().map_err(EngineError::from)?)
}

pub fn run(args: GridArgs) -> Result<()> {
    let (molecule, title) = xyz::read_from_path(&args.input)?;
    info!(
        input = %args.input.display(),
        title = %title,
        n_atoms = molecule.n_atoms(),
        "read geometry"
    );

    let config = build_config(&args)?;
    let symbols = molecule.symbols();
    let coordinates = molecule.coordinates();

    let shells = connolly_shells(
        &symbols,
        &config.radii,
        &config.scale_factors,
        config.density,
    )
    .map_err(EngineError::from)?;

    let bar = progress_bar(shells.len() as u64, "Sampling shells");
    let mut surface = Vec::new();
    for shell in &shells {
        surface.extend(
            vdw_surface(shell, &coordinates, config.rmin, config.rmax)
                .map_err(EngineError::from)?,
        );
        bar.inc(1);
    }
    bar.finish();

    let file = File::create(&args.output)?;
    let mut writer = BufWriter::new(file);
    for point in &surface {
        writeln!(
            writer,
            "{:>15.8} {:>15.8} {:>15.8}",
            point.x, point.y, point.z
        )?;
    }
    writer.flush()?;

    info!(
        output = %args.output.display(),
        n_points = surface.len(),
        "wrote surface grid"
    );
    println!(
        "Wrote {} surface points ({} shells) to {}",
        surface.len(),
        shells.len(),
        args.output.display()
    );
    Ok(())
}
