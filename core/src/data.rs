use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed table: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of a persisted vocabulary table.
///
/// Tables written before information was computed have no `Info` column;
/// such rows read back with `info == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(rename = "Word")]
    pub word: String,
    #[serde(rename = "Points")]
    pub points: f64,
    #[serde(rename = "Info", default)]
    pub info: f64,
}

impl TableRow {
    pub fn new(word: impl Into<String>, points: f64, info: f64) -> Self {
        Self {
            word: word.into(),
            points,
            info,
        }
    }
}

pub fn read_table<R: Read>(reader: R) -> Result<Vec<TableRow>, TableError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .map_err(TableError::from)
}

pub fn write_table<W: Write>(writer: W, rows: &[TableRow]) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Vec<TableRow>, TableError> {
    read_table(File::open(path)?)
}

pub fn save_table<P: AsRef<Path>>(path: P, rows: &[TableRow]) -> Result<(), TableError> {
    write_table(File::create(path)?, rows)
}

/// Plain word list, one word per line, every word weighted 1.
pub fn parse_words<'a, I>(lines: I) -> Vec<TableRow>
where
    I: Iterator<Item = &'a str>,
{
    lines
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| TableRow::new(l, 1., 0.))
        .collect()
}

/// Reads either a `Word,Points[,Info]` table or a plain word list,
/// depending on the header line.
pub fn load_words<P: AsRef<Path>>(path: P) -> Result<Vec<TableRow>, TableError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut first = String::new();
    reader.read_line(&mut first)?;

    if is_table_header(&first) {
        read_table(first.as_bytes().chain(reader))
    } else {
        let mut rest = String::new();
        reader.read_to_string(&mut rest)?;
        Ok(parse_words(first.lines().chain(rest.lines())))
    }
}

fn is_table_header(line: &str) -> bool {
    let mut fields = line.trim().split(',').map(str::trim);
    fields.next() == Some("Word") && fields.next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_round_trip() {
        let rows = vec![
            TableRow::new("crane", 120., 5.75),
            TableRow::new("slate", 80.5, 5.71),
        ];
        let mut buffer = Vec::new();
        write_table(&mut buffer, &rows).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("Word,Points,Info\n"));
        assert_eq!(read_table(buffer.as_slice()).unwrap(), rows);
    }

    #[test]
    fn missing_info_defaults_to_zero() {
        let rows = read_table("Word,Points\nabc,2\nbca, 3\n".as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![TableRow::new("abc", 2., 0.), TableRow::new("bca", 3., 0.)]
        );
    }

    #[test]
    fn malformed_points() {
        let err = read_table("Word,Points,Info\nabc,lots,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::Csv(_)));
    }

    #[test]
    fn load_words_detects_format() {
        let dir = tempfile::tempdir().unwrap();

        let list = dir.path().join("primes.txt");
        let mut file = File::create(&list).unwrap();
        writeln!(file, "10007\n10009\n\n10037").unwrap();
        let rows = load_words(&list).unwrap();
        assert_eq!(
            rows.iter().map(|r| r.word.as_str()).collect::<Vec<_>>(),
            vec!["10007", "10009", "10037"]
        );
        assert!(rows.iter().all(|r| r.points == 1.));

        let table = dir.path().join("words.csv");
        save_table(&table, &[TableRow::new("crane", 3., 0.)]).unwrap();
        assert_eq!(load_words(&table).unwrap(), vec![TableRow::new("crane", 3., 0.)]);
    }

    #[test]
    fn word_list_starting_with_words_is_not_a_table() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("english.txt");
        let mut file = File::create(&list).unwrap();
        writeln!(file, "Words\nWord\nworld").unwrap();

        let rows = load_words(&list).unwrap();
        assert_eq!(
            rows.iter().map(|r| r.word.as_str()).collect::<Vec<_>>(),
            vec!["Words", "Word", "world"]
        );
    }
}
