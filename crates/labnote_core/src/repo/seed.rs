//! Sample collection used when storage holds no entries yet.

use crate::model::entry::{Entry, EntryStatus};
use chrono::NaiveDate;

struct Sample {
    id: &'static str,
    title: &'static str,
    date: (i32, u32, u32),
    tags: &'static [&'static str],
    status: EntryStatus,
    body: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "exp-001",
        title: "RNA-Seq Differential Expression Analysis",
        date: (2025, 1, 15),
        tags: &["RNA-Seq", "DESeq2", "transcriptomics"],
        status: EntryStatus::Complete,
        body: include_str!("samples/exp-001.md"),
    },
    Sample {
        id: "exp-002",
        title: "Variant Calling Pipeline \u{2014} WGS Cohort",
        date: (2025, 2, 3),
        tags: &["WGS", "GATK", "variant-calling", "genomics"],
        status: EntryStatus::Complete,
        body: include_str!("samples/exp-002.md"),
    },
    Sample {
        id: "exp-003",
        title: "Single-Cell ATAC-Seq Clustering",
        date: (2025, 2, 20),
        tags: &["scATAC-seq", "ArchR", "epigenomics", "clustering"],
        status: EntryStatus::InProgress,
        body: include_str!("samples/exp-003.md"),
    },
    Sample {
        id: "exp-004",
        title: "Metagenomics \u{2014} Gut Microbiome 16S Analysis",
        date: (2025, 3, 8),
        tags: &["metagenomics", "16S", "QIIME2", "microbiome"],
        status: EntryStatus::Complete,
        body: include_str!("samples/exp-004.md"),
    },
    Sample {
        id: "exp-005",
        title: "Protein Structure Prediction \u{2014} AlphaFold2 Batch",
        date: (2025, 3, 22),
        tags: &["AlphaFold2", "structural-biology", "protein"],
        status: EntryStatus::InProgress,
        body: include_str!("samples/exp-005.md"),
    },
];

/// Returns the built-in sample experiments in collection order.
pub fn sample_entries() -> Vec<Entry> {
    SAMPLES
        .iter()
        .map(|sample| {
            let (year, month, day) = sample.date;
            Entry {
                id: sample.id.to_string(),
                title: sample.title.to_string(),
                date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN),
                tags: sample.tags.iter().map(|tag| tag.to_string()).collect(),
                status: sample.status,
                body: sample.body.to_string(),
                attachments: Vec::new(),
                images: Vec::new(),
            }
        })
        .collect()
}
