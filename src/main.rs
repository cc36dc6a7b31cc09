use std::time::Instant;

use anyhow::{Context, Result};
use twts::grid::YeeCell;
use twts::sample::sample_plane;
use twts::settings;
use twts::twts::{TwtsFieldB, TwtsFieldE};

fn main() -> Result<()> {
    env_logger::init();

    let settings = settings::load_config()?;
    println!("{}", settings);

    let grid = settings.grid_spec();
    let e_field = TwtsFieldE::new(settings.pulse.clone(), grid.clone(), &YeeCell)
        .context("Failed to construct the E field")?;
    let b_field = TwtsFieldB::new(settings.pulse.clone(), grid, &YeeCell)
        .context("Failed to construct the B field")?;

    let step = e_field.step_for_time(settings.sample.time);
    println!(
        "Time delay: {:.6e} s, sampling step {} (t = {:.6e} s)",
        e_field.time_delay_si(),
        step,
        e_field.time_si(step)
    );

    let start = Instant::now();
    let plane = settings.sample.plane;
    let progress = settings.sample.progress;
    let e_sample = sample_plane(&e_field, plane, step, progress)?;
    let b_sample = sample_plane(&b_field, plane, step, progress)?;
    println!("{}", e_sample);
    println!("{}", b_sample);
    println!("Time taken: {:.2?}", start.elapsed());

    Ok(())
}
