use behr::GridConfig;
use behr::SwathGridder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Starting BEHR swath regridding...");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./data/config/behr_grid.json".to_string());
    let config = GridConfig::from_file(&config_path)?;

    let primary = config.fields().scalar_names()[config.fields().primary_index()].clone();

    let gridder = SwathGridder::new(config);
    let orbits = gridder.process()?;

    println!("Gridded {} orbit(s)", orbits.len());

    if let Some(first) = orbits.first() {
        let grid = &first.grid;
        let values = grid.scalar_field(&primary)?;
        let populated: Vec<f64> = grid
            .counts()
            .iter()
            .zip(values.iter())
            .filter(|&(&count, _)| count > 0)
            .map(|(_, &v)| v)
            .collect();

        println!("Orbit {} ({}):", first.orbit, first.time);
        println!(
            "  Populated cells: {} / {} ({:.1}%)",
            populated.len(),
            grid.bounds().ncells(),
            100.0 * populated.len() as f64 / grid.bounds().ncells() as f64
        );

        if !populated.is_empty() {
            println!(
                "  {} min: {:.3e}",
                primary,
                populated.iter().fold(f64::INFINITY, |a, &b| a.min(b))
            );
            println!(
                "  {} max: {:.3e}",
                primary,
                populated.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
            );
            println!(
                "  {} mean: {:.3e}",
                primary,
                populated.iter().sum::<f64>() / populated.len() as f64
            );
        }
    }

    Ok(())
}
