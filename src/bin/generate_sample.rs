use anyhow::{Context, Result};

/// Deterministic measurement noise: splitmix64 uniforms, summed to an
/// approximately normal deviate (Irwin–Hall, n = 12).
struct Noise {
    state: u64,
    sigma: f64,
}

impl Noise {
    fn new(seed: u64, sigma: f64) -> Self {
        Noise { state: seed, sigma }
    }

    fn uniform(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        (z ^ (z >> 31)) as f64 / u64::MAX as f64
    }

    fn sample(&mut self) -> f64 {
        let sum: f64 = (0..12).map(|_| self.uniform()).sum();
        self.sigma * (sum - 6.0)
    }
}

/// A synthetic film: band gap (eV), thickness (nm), refractive index.
struct Film {
    name: &'static str,
    gap_ev: f64,
    thickness_nm: f64,
    index: f64,
}

/// Percent T and R of a film at one wavelength: a Tauc-like absorption edge
/// above the gap and interference fringes from the film thickness.
fn film_response(film: &Film, wavelength_nm: f64, noise: &mut Noise) -> (f64, f64) {
    let energy = 1240.0 / wavelength_nm;
    let alpha_per_nm = if energy > film.gap_ev {
        2e-3 * (energy - film.gap_ev).sqrt()
    } else {
        0.0
    };
    let phase = 4.0 * std::f64::consts::PI * film.index * film.thickness_nm / wavelength_nm;
    let r0 = ((film.index - 1.0) / (film.index + 1.0)).powi(2);
    let r = r0 * (1.0 + 0.6 * phase.cos());
    let t = (1.0 - r) * (-alpha_per_nm * film.thickness_nm).exp();

    (100.0 * t + noise.sample(), 100.0 * r + noise.sample())
}

fn main() -> Result<()> {
    let mut noise = Noise::new(42, 0.1);

    // Wavelengths: 1100 → 300 nm, step 2, as the instrument sweeps.
    let wavelengths: Vec<f64> = (0..=400).map(|i| 1100.0 - i as f64 * 2.0).collect();

    let films = [
        Film { name: "ZnO_A", gap_ev: 3.3, thickness_nm: 250.0, index: 2.0 },
        Film { name: "TiO2_B", gap_ev: 3.2, thickness_nm: 400.0, index: 2.4 },
        Film { name: "CdS_C", gap_ev: 2.4, thickness_nm: 180.0, index: 2.5 },
    ];

    // Column pairs: (name, label, values)
    let mut columns: Vec<(String, &str, Vec<f64>)> = vec![(
        "Baseline 100%T".to_string(),
        "%T",
        vec![100.0; wavelengths.len()],
    )];
    for film in &films {
        let (t, r): (Vec<f64>, Vec<f64>) = wavelengths
            .iter()
            .map(|&wl| film_response(film, wl, &mut noise))
            .unzip();
        columns.push((film.name.to_string(), "%T", t));
        columns.push((film.name.to_string(), "%R", r));
    }

    let output_path = "sample_tr.csv";
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(output_path)
        .context("creating output file")?;

    let names: Vec<&str> = columns
        .iter()
        .flat_map(|(name, _, _)| [name.as_str(), ""])
        .collect();
    writer.write_record(&names)?;

    let labels: Vec<&str> = columns
        .iter()
        .flat_map(|(_, label, _)| ["Wavelength (nm)", *label])
        .collect();
    writer.write_record(&labels)?;

    for (i, wl) in wavelengths.iter().enumerate() {
        let row: Vec<String> = columns
            .iter()
            .flat_map(|(_, _, values)| [format!("{wl:.1}"), format!("{:.4}", values[i])])
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;

    println!(
        "Wrote {} films ({} wavelengths each) to {output_path}",
        films.len(),
        wavelengths.len()
    );
    Ok(())
}
