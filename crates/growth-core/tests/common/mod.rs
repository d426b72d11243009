use growth_core::{PercentileEngine, ReferenceTable, TableBuilder, RANK_LABELS};

/// Standard normal quantiles of the 15 reference ranks.
pub const Z: [f64; 15] = [
    -3.090, -2.326, -1.881, -1.645, -1.282, -1.036, -0.674, 0.0, 0.674, 1.036, 1.282, 1.645,
    1.881, 2.326, 3.090,
];

/// Median height in cm at `years` for a curved growth profile: fast infant
/// growth flattening out towards adolescence.
pub fn median(base: f64, years: f64) -> f64 {
    base + 25.0 * (1.0 - (-years / 1.2).exp()) + 5.8 * years
}

/// Monthly reference file text, 0 to 228 months, with decimal commas.
pub fn reference_csv(base: f64) -> String {
    let mut out = format!("Month;{}\n", RANK_LABELS.join(";"));
    for months in 0..=228u32 {
        let years = months as f64 / 12.0;
        let sd = 1.9 + 0.3 * years;
        let cols: Vec<String> = Z
            .iter()
            .map(|z| format!("{:.4}", median(base, years) + z * sd).replace('.', ","))
            .collect();
        out.push_str(&format!("{months};{}\n", cols.join(";")));
    }
    out
}

pub fn tables() -> (ReferenceTable, ReferenceTable) {
    let builder = TableBuilder::default();
    let boys = builder.parse_str(&reference_csv(49.9)).expect("boys table");
    let girls = builder.parse_str(&reference_csv(49.1)).expect("girls table");
    (boys, girls)
}

pub fn engine() -> PercentileEngine {
    let (boys, girls) = tables();
    growth_core::build_engine(&boys, &girls).expect("engine")
}
