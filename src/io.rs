use std::path::Path;

use serde::de::DeserializeOwned;
use serde_derive::{Deserialize, Serialize};

use crate::error::Result;

pub type UserIdx = usize;
pub type ItemIdx = usize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemRecord {
    #[serde(alias = "item")]
    pub hotel: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivityRecord {
    pub user: String,
    #[serde(alias = "item")]
    pub hotel: String,
}

impl ActivityRecord {
    pub fn new(user: &str, hotel: &str) -> Self {
        ActivityRecord {
            user: user.to_string(),
            hotel: hotel.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRecord {
    pub user: String,
    pub hotel: String,
}

pub fn read_users<P: AsRef<Path>>(path: P) -> Result<Vec<UserRecord>> {
    read_records(path)
}

pub fn read_items<P: AsRef<Path>>(path: P) -> Result<Vec<ItemRecord>> {
    read_records(path)
}

pub fn read_activity<P: AsRef<Path>>(path: P) -> Result<Vec<ActivityRecord>> {
    read_records(path)
}

/// Reads a tab separated file with a header row into typed records.
/// Columns that the record type does not name are ignored.
pub fn read_records<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)?;
    collect_records(reader)
}

pub fn read_records_from<T, R>(source: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: std::io::Read,
{
    let reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(source);
    collect_records(reader)
}

fn collect_records<T, R>(mut reader: csv::Reader<R>) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: std::io::Read,
{
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

pub fn write_predictions<P: AsRef<Path>>(path: P, predictions: &[PredictionRecord]) -> Result<()> {
    let writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    write_records(writer, predictions)
}

pub fn write_predictions_to<W: std::io::Write>(
    sink: W,
    predictions: &[PredictionRecord],
) -> Result<()> {
    let writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(sink);
    write_records(writer, predictions)
}

fn write_records<T: serde::Serialize, W: std::io::Write>(
    mut writer: csv::Writer<W>,
    records: &[T],
) -> Result<()> {
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod io_test {
    use super::*;

    #[test]
    fn should_read_activity_with_either_item_column() {
        let hotels = "user\thotel\tdate\nu1\th1\t2016-01-01\nu2\th3\t2016-01-02\n";
        let records: Vec<ActivityRecord> = read_records_from(hotels.as_bytes()).unwrap();
        assert_eq!(
            vec![ActivityRecord::new("u1", "h1"), ActivityRecord::new("u2", "h3")],
            records
        );

        let items = "user\titem\nu1\th2\n";
        let records: Vec<ActivityRecord> = read_records_from(items.as_bytes()).unwrap();
        assert_eq!(vec![ActivityRecord::new("u1", "h2")], records);
    }

    #[test]
    fn should_fail_on_missing_column() {
        let data = "client\nu1\n";
        let records: Result<Vec<UserRecord>> = read_records_from(data.as_bytes());
        assert!(records.is_err());
    }

    #[test]
    fn should_write_header_and_rows() {
        let predictions = vec![
            PredictionRecord {
                user: "u1".to_string(),
                hotel: "h9".to_string(),
            },
            PredictionRecord {
                user: "u2".to_string(),
                hotel: "h1".to_string(),
            },
        ];
        let mut sink: Vec<u8> = Vec::new();
        write_predictions_to(&mut sink, &predictions).unwrap();
        assert_eq!("user\thotel\nu1\th9\nu2\th1\n", String::from_utf8(sink).unwrap());
    }
}
