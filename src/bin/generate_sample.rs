use serde::Serialize;

/// Output file, the path the dashboard reads at startup.
const OUTPUT_PATH: &str = "WK2_Airbnb_Amsterdam_listings_proj_solution.csv";

/// Dam Square.
const CENTER: (f64, f64) = (52.3731, 4.8926);

#[derive(Serialize)]
struct SampleListing {
    #[serde(rename = "")]
    index: usize,
    room_type: &'static str,
    host_is_superhost: &'static str,
    neighbourhood: &'static str,
    accommodates: u32,
    price_in_dollar: f64,
    review_scores_rating: Option<f64>,
    available: f64,
    five_day_dollar_price: f64,
    latitude: f64,
    longitude: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    // (room type, base nightly price, typical guests)
    let room_types = [
        ("Entire home/apt", 160.0, 4),
        ("Private room", 80.0, 2),
        ("Hotel room", 120.0, 2),
        ("Shared room", 40.0, 1),
    ];
    let neighbourhoods = ["Centrum-West", "De Pijp", "Jordaan", "Oost", "Westerpark", "Zuid"];

    let mut writer = csv::Writer::from_path(OUTPUT_PATH)?;
    let n_rows = 500;

    for index in 0..n_rows {
        let &(room_type, base_price, guests) = rng.pick(&room_types);
        let accommodates = (guests as f64 + rng.gauss(0.0, 1.0)).round().clamp(1.0, 16.0) as u32;
        let price_in_dollar = (base_price * (1.0 + rng.gauss(0.0, 0.35)).max(0.2) * 100.0).round() / 100.0;

        // Roughly one listing in twenty has no reviews yet.
        let review_scores_rating = (rng.next_f64() > 0.05)
            .then(|| (rng.gauss(4.6, 0.3).clamp(1.0, 5.0) * 100.0).round() / 100.0);

        writer.serialize(SampleListing {
            index,
            room_type,
            host_is_superhost: if rng.next_f64() < 0.3 { "t" } else { "f" },
            neighbourhood: *rng.pick(&neighbourhoods),
            accommodates,
            price_in_dollar,
            review_scores_rating,
            available: rng.next_f64(),
            five_day_dollar_price: price_in_dollar * 5.0,
            latitude: CENTER.0 + rng.gauss(0.0, 0.02),
            longitude: CENTER.1 + rng.gauss(0.0, 0.035),
        })?;
    }
    writer.flush()?;

    println!("Wrote {n_rows} listings to {OUTPUT_PATH}");
    Ok(())
}
