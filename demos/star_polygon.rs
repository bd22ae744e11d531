use std::f64::consts::PI;

use anyhow::Result;
use kirkloc::{Config, Kirkpatrick, PointLocator, Triangulator};
use rand::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let n = 2_000;
    let mut rng = rand::thread_rng();

    // Star-shaped polygon around the origin
    let mut angles: Vec<f64> = (0..n).map(|_| rng.gen::<f64>() * 2. * PI).collect();
    angles.sort_by(f64::total_cmp);
    let polygon: Vec<_> = angles
        .into_iter()
        .map(|theta| {
            let r = 0.5 + rng.gen::<f64>();
            [r * theta.cos(), r * theta.sin()]
        })
        .collect();

    let mut locator = Kirkpatrick::with_config(polygon, Config::default(), Triangulator)?;
    locator.preprocess()?;
    let inside = locator.polygon_triangles().count();
    let hierarchy = locator.into_hierarchy()?;
    println!("{}", hierarchy.stats());
    println!("{} triangle(s) inside the polygon", inside);

    let query: Vec<_> = (0..420_000)
        .map(|_| [3. * rng.gen::<f64>() - 1.5, 3. * rng.gen::<f64>() - 1.5])
        .collect();
    let located = hierarchy
        .par_locate_many(&query)
        .iter()
        .filter(|cell| cell.is_some())
        .count();
    println!("{} of {} query point(s) located", located, query.len());

    Ok(())
}
