use std::path::PathBuf;

use anyhow::{Context, Result};

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

/// Indian digit grouping: 460000 → "4,60,000".
fn lakh_format(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, back) = rest.split_at(rest.len() - 2);
        groups.push(back);
        rest = front;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// A compensation cell in one of the shapes seen in scraped listings.
fn ctc_text(rng: &mut SimpleRng, base: f64) -> String {
    let low = ((base * (0.8 + 0.4 * rng.next_f64())) / 1000.0).round() as u64 * 1000;
    let high = low + (rng.below(5) as u64 + 1) * 50_000;
    match rng.below(10) {
        0 => "Not disclosed".to_string(),
        1 | 2 => format!("₹{}", lakh_format(low)),
        3 => {
            let range = format!("₹ {} - {} /year", lakh_format(low), lakh_format(high));
            format!("{range} {range}")
        }
        _ => format!("₹ {} - {} /year", lakh_format(low), lakh_format(high)),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("filtered_dataset.csv"));

    let mut rng = SimpleRng::new(42);

    let companies = [
        "Infosys", "TCS", "Wipro", "Zoho", "Freshworks", "Razorpay", "Swiggy", "Zomato",
        "Flipkart", "Paytm", "CRED", "Meesho", "PhonePe", "Ola", "Byju's", "Unacademy",
    ];
    let skills: [(&str, f64); 14] = [
        ("Python", 600_000.0),
        ("Java", 550_000.0),
        ("JavaScript", 450_000.0),
        ("React", 500_000.0),
        ("Node.js", 520_000.0),
        ("SQL", 400_000.0),
        ("Data Science", 750_000.0),
        ("Machine Learning", 900_000.0),
        ("DevOps", 800_000.0),
        ("Rust", 1_100_000.0),
        ("Go", 950_000.0),
        ("Android", 480_000.0),
        ("Flutter", 420_000.0),
        ("Digital Marketing", 300_000.0),
    ];
    let locations = [
        "Bangalore, Karnataka",
        "Mumbai, Maharashtra",
        "Pune, Maharashtra",
        "Hyderabad, Telangana",
        "Chennai, Tamil Nadu",
        "Delhi",
        "Gurgaon, Haryana",
        "Noida, Uttar Pradesh",
        "Kolkata, West Bengal",
        "Ahmedabad, Gujarat",
        "Jaipur, Rajasthan",
        "Remote",
    ];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record(["company_name", "skill_required", "location", "ctc"])?;

    let n_rows = 600;
    for _ in 0..n_rows {
        // Bias toward the head of each list so rankings are not flat.
        let skill_idx = rng.below(skills.len()).min(rng.below(skills.len()));
        let (skill, base) = skills[skill_idx];
        let location = locations[rng.below(locations.len()).min(rng.below(locations.len()))];
        let company = *rng.pick(&companies);
        let ctc = ctc_text(&mut rng, base);
        writer.write_record([company, skill, location, ctc.as_str()])?;
    }
    writer.flush()?;

    println!("Wrote {n_rows} postings to {}", output_path.display());
    Ok(())
}
