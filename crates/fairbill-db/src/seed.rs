//! Sample government catalog.
//!
//! Ceilings are in paise. Loaded by `fairbill init` and the `seed` binary
//! when the catalog tables are empty.

use fairbill_core::{ItemType, NewCatalogItem};

/// `(name, category, min, max, unit)`
const SAMPLE_MEDICINES: &[(&str, &str, i64, i64, &str)] = &[
    ("Paracetamol 500mg", "Pain Relief", 200, 500, "tablet"),
    ("Amoxicillin 250mg", "Antibiotic", 500, 1200, "capsule"),
    ("Metformin 500mg", "Diabetes", 300, 800, "tablet"),
    ("Atorvastatin 10mg", "Cholesterol", 800, 2000, "tablet"),
    ("Omeprazole 20mg", "Gastric", 400, 1000, "capsule"),
];

/// `(name, category, min, max)`
const SAMPLE_PROCEDURES: &[(&str, &str, i64, i64)] = &[
    ("Blood Test - Complete", "Diagnostic", 20_000, 50_000),
    ("X-Ray Chest", "Imaging", 30_000, 80_000),
    ("ECG", "Cardiac", 15_000, 40_000),
    ("Ultrasound Abdomen", "Imaging", 50_000, 150_000),
    ("General Consultation", "Consultation", 20_000, 60_000),
];

/// Sample rows for one catalog table.
pub fn sample_catalog(item_type: ItemType) -> Vec<NewCatalogItem> {
    match item_type {
        ItemType::Medicine => SAMPLE_MEDICINES
            .iter()
            .map(|&(name, category, min, max, unit)| {
                NewCatalogItem::new(name, category, min, max, Some(unit))
            })
            .collect(),
        ItemType::Procedure => SAMPLE_PROCEDURES
            .iter()
            .map(|&(name, category, min, max)| NewCatalogItem::new(name, category, min, max, None))
            .collect(),
    }
}
