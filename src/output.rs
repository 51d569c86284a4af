//! CSV output and the end-of-run summary.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::record::EventRecord;

pub fn write_csv(records: &[EventRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_csv(path: &Path) -> Result<Vec<EventRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Value counts over the merged record set, printed after a run.
#[derive(Debug, Default)]
pub struct Summary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_subtype: BTreeMap<String, usize>,
    pub by_country: BTreeMap<String, usize>,
}

impl Summary {
    pub fn of(records: &[EventRecord]) -> Self {
        let mut summary = Summary {
            total: records.len(),
            ..Default::default()
        };
        for r in records {
            *summary.by_type.entry(r.event_type.as_str().to_string()).or_default() += 1;
            *summary
                .by_subtype
                .entry(r.event_subtype.as_str().to_string())
                .or_default() += 1;
            *summary.by_country.entry(r.country.clone()).or_default() += 1;
        }
        summary
    }

    pub fn print(&self) {
        println!("\n=== Extraction summary ===");
        println!("Events: {}", self.total);
        print_counts("By type", &self.by_type);
        print_counts("By subtype", &self.by_subtype);
        print_counts("By country", &self.by_country);
    }
}

fn print_counts(label: &str, counts: &BTreeMap<String, usize>) {
    println!("\n{label}:");
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (key, count) in sorted {
        println!("  {count:>6}  {key}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EventSubtype, EventType, UNKNOWN};

    fn record(name: &str, country: &str, toll: u32) -> EventRecord {
        EventRecord {
            death_toll: Some(toll),
            event_name: name.to_string(),
            city: UNKNOWN.to_string(),
            country: country.to_string(),
            date: "1912-04-15".to_string(),
            details: String::new(),
            event_type: EventType::HumanAccident,
            event_subtype: EventSubtype::MaritimeAccident,
            source_url: "https://en.wikipedia.org/wiki/X".to_string(),
        }
    }

    #[test]
    fn csv_round_trip_preserves_records() {
        let path = std::env::temp_dir().join("disaster_scraper_output_test.csv");
        let records = vec![record("Titanic sinking", "United Kingdom", 1500)];
        write_csv(&records, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let header = raw.lines().next().unwrap();
        assert_eq!(
            header,
            "Death toll,Event,City,Country,Date,Details,Event Type,Event Subtype,URL"
        );

        let back = read_csv(&path).unwrap();
        assert_eq!(back, records);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn summary_counts_by_country() {
        let records = vec![
            record("a", "Japan", 1),
            record("b", "Japan", 2),
            record("c", "Poland", 3),
        ];
        let summary = Summary::of(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_country["Japan"], 2);
        assert_eq!(summary.by_country["Poland"], 1);
        assert_eq!(summary.by_type["human_accident"], 3);
    }
}
