//! Shared fixtures for the integration tests.
//!
//! Generates a dataset with the real file layout: `id`, `diagnosis`, thirty
//! features and a trailing empty column. Class centres are close to the
//! published per-class means, with deterministic ±15% jitter.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use nuclei_predictor::schema::FEATURE_NAMES;

const BENIGN_CENTRE: [f64; 30] = [
    12.15, 17.91, 78.08, 462.8, 0.0925, 0.0801, 0.0461, 0.0257, 0.174, 0.0629, //
    0.284, 1.22, 2.00, 21.1, 0.0072, 0.0214, 0.0260, 0.0099, 0.0206, 0.0036, //
    13.38, 23.52, 87.0, 558.9, 0.125, 0.183, 0.166, 0.0744, 0.270, 0.0794,
];

const MALIGNANT_CENTRE: [f64; 30] = [
    17.46, 21.60, 115.4, 978.4, 0.1029, 0.1452, 0.1608, 0.0880, 0.1929, 0.0627, //
    0.609, 1.21, 4.32, 72.7, 0.0068, 0.0323, 0.0418, 0.0151, 0.0205, 0.0041, //
    21.13, 29.32, 141.4, 1422.0, 0.145, 0.375, 0.451, 0.182, 0.323, 0.0915,
];

fn jitter(row: u64, col: u64) -> f64 {
    let mixed = row
        .wrapping_mul(2_654_435_761)
        .wrapping_add(col.wrapping_mul(40_503))
        .wrapping_add(17);
    ((mixed % 1000) as f64 / 500.0) - 1.0
}

/// Build CSV text with `benign` + `malignant` rows, classes interleaved
pub fn synthetic_csv(benign: usize, malignant: usize) -> String {
    let mut lines = vec![format!("id,diagnosis,{},", FEATURE_NAMES.join(","))];
    let total = benign + malignant;
    let mut remaining_benign = benign;
    let mut remaining_malignant = malignant;

    for i in 0..total {
        // Spread malignant rows evenly through the file
        let take_malignant = remaining_malignant > 0
            && (remaining_benign == 0 || (i * malignant) % total < malignant);
        let (code, centre) = if take_malignant {
            remaining_malignant -= 1;
            ("M", &MALIGNANT_CENTRE)
        } else {
            remaining_benign -= 1;
            ("B", &BENIGN_CENTRE)
        };

        let values: Vec<String> = centre
            .iter()
            .enumerate()
            .map(|(j, c)| format!("{}", c * (1.0 + 0.15 * jitter(i as u64, j as u64))))
            .collect();
        lines.push(format!("{},{},{},", 840_000 + i, code, values.join(",")));
    }
    lines.join("\n")
}

/// Write a synthetic dataset under `dir` and return its path
pub fn write_dataset(dir: &Path, benign: usize, malignant: usize) -> PathBuf {
    let path = dir.join("data.csv");
    fs::write(&path, synthetic_csv(benign, malignant)).unwrap();
    path
}
