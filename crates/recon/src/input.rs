//! TSV sources into rows and street entries.
//!
//! Both sources are tab separated with a header line and no quoting. Rows
//! too short to carry a house number are skipped.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;

use streetcheck_config::RelationConfig;

use crate::error::ReconError;
use crate::model::{ObservedRow, ReferenceIndex, ReferenceRow, StreetEntry};

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader)
}

fn input_error(source: &str, err: csv::Error) -> ReconError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    ReconError::Input {
        source: source.into(),
        line,
        message: err.to_string(),
    }
}

/// Read observed rows: `id, street, housenumber, postcode, housename,
/// conscriptionnumber, ...`.
pub fn read_observed_tsv<R: Read>(reader: R) -> Result<Vec<ObservedRow>, ReconError> {
    let mut rows = Vec::new();
    for record in tsv_reader(reader).records() {
        let record = record.map_err(|e| input_error("observed", e))?;
        if record.len() < 3 {
            log::warn!(
                "observed input, line {}: {} column(s), skipping",
                record.position().map(|p| p.line()).unwrap_or(0),
                record.len()
            );
            continue;
        }
        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        rows.push(ObservedRow {
            id: field(0),
            street: field(1),
            housenumber: field(2),
            postcode: field(3),
            housename: field(4),
            conscriptionnumber: field(5),
            tail: record.iter().skip(6).map(str::to_string).collect(),
        });
    }
    Ok(rows)
}

/// Read reference rows: `county, settlement, street, housenumber`.
pub fn read_reference_tsv<R: Read>(reader: R) -> Result<Vec<ReferenceRow>, ReconError> {
    let mut rows = Vec::new();
    for record in tsv_reader(reader).records() {
        let record = record.map_err(|e| input_error("reference", e))?;
        if record.len() < 4 {
            log::warn!(
                "reference input, line {}: {} column(s), skipping",
                record.position().map(|p| p.line()).unwrap_or(0),
                record.len()
            );
            continue;
        }
        rows.push(ReferenceRow {
            county: record[0].to_string(),
            settlement: record[1].to_string(),
            street: record[2].to_string(),
            housenumber: record[3].to_string(),
        });
    }
    Ok(rows)
}

/// Group observed rows by street, keeping first-seen street order.
pub fn group_observed(rows: &[ObservedRow]) -> Vec<StreetEntry> {
    let mut order: Vec<StreetEntry> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        if row.street.is_empty() {
            continue;
        }
        let slot = *index.entry(row.street.as_str()).or_insert_with(|| {
            order.push(StreetEntry::new(row.street.clone(), Vec::new()));
            order.len() - 1
        });
        if let Some(token) = row.house_number_token() {
            order[slot].house_numbers.push(token.to_string());
        }
    }
    order
}

/// Reference streets of a relation, keyed by reference name.
///
/// Each street collects its numbers from the relation's county and the
/// settlements [`RelationConfig::ref_settlements`] selects for it.
pub fn reference_entries(relation: &RelationConfig, index: &ReferenceIndex) -> Vec<StreetEntry> {
    let Some(county) = relation.refmegye.as_deref() else {
        return Vec::new();
    };

    let mut settlements: Vec<String> = relation.reftelepules.iter().cloned().collect();
    for street in relation.filters.keys() {
        for settlement in relation.ref_settlements(street) {
            if !settlements.contains(&settlement) {
                settlements.push(settlement);
            }
        }
    }

    let names: BTreeSet<&str> = index.streets(county, &settlements).collect();

    names
        .into_iter()
        .filter_map(|ref_name| {
            let osm_name = relation.osm_street_name(ref_name);
            let numbers: Vec<String> = relation
                .ref_settlements(osm_name)
                .iter()
                .flat_map(|s| index.house_numbers(county, s, ref_name).iter().cloned())
                .collect();
            (!numbers.is_empty()).then(|| StreetEntry::new(ref_name, numbers))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBSERVED: &str = "\
@id\taddr:street\taddr:housenumber\taddr:postcode\taddr:housename\taddr:conscriptionnumber\taddr:flats
1\tTörökugrató utca\t1\t1111\t\t\t
2\tTörökugrató utca\t2\t1111\t\t\t
3\tTűzkő utca\t9\t1111\t\t\t1-4
4\tTörökugrató utca\t\t1111\t\t42/1\t
5\tTűzkő utca\t\t1111\tVilla\t\t
6\t\t7\t1111\t\t\t
7\tshort
";

    const REFERENCE: &str = "\
megye\ttelepules\tstreet\thousenumber
01\t011\tTörökugrató utca\t1
01\t011\tTörökugrató utca\t10
01\t012\tTörökugrató utca\t12
01\t011\tTűzkő utca\t9
01\t013\tOther utca\t3
02\t011\tTűzkő utca\t99
";

    #[test]
    fn observed_rows() {
        let rows = read_observed_tsv(OBSERVED.as_bytes()).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].id, "1");
        assert_eq!(rows[0].street, "Törökugrató utca");
        assert_eq!(rows[2].tail, vec!["1-4"]);
        assert_eq!(rows[3].house_number_token(), Some("42/1"));
        assert_eq!(rows[4].house_number_token(), None);
        assert_eq!(rows[4].housename, "Villa");
    }

    #[test]
    fn observed_grouping() {
        let rows = read_observed_tsv(OBSERVED.as_bytes()).unwrap();
        let streets = group_observed(&rows);
        assert_eq!(streets.len(), 2);
        assert_eq!(streets[0].name, "Törökugrató utca");
        assert_eq!(streets[0].house_numbers, vec!["1", "2", "42/1"]);
        assert_eq!(streets[1].name, "Tűzkő utca");
        assert_eq!(streets[1].house_numbers, vec!["9"]);
    }

    #[test]
    fn reference_index() {
        let rows = read_reference_tsv(REFERENCE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 6);
        let index = ReferenceIndex::from_rows(rows);
        assert_eq!(index.house_numbers("01", "011", "Törökugrató utca"), ["1", "10"]);
        assert!(index.house_numbers("01", "099", "Törökugrató utca").is_empty());
    }

    #[test]
    fn reference_settlement_selection() {
        let index = ReferenceIndex::from_rows(read_reference_tsv(REFERENCE.as_bytes()).unwrap());
        let relation = RelationConfig::from_yaml(
            r#"
refmegye: "01"
reftelepules: "011"
filters:
  Törökugrató utca:
    ranges:
      - {start: "1", end: "1"}
      - {start: "2", end: "12", reftelepules: "012"}
"#,
        )
        .unwrap();
        let entries = reference_entries(&relation, &index);
        assert_eq!(
            entries,
            vec![
                StreetEntry::new("Törökugrató utca", vec!["1".into(), "10".into(), "12".into()]),
                StreetEntry::new("Tűzkő utca", vec!["9".into()]),
            ]
        );
    }

    #[test]
    fn reference_without_county_is_empty() {
        let index = ReferenceIndex::from_rows(read_reference_tsv(REFERENCE.as_bytes()).unwrap());
        assert!(reference_entries(&RelationConfig::default(), &index).is_empty());
    }
}
