use crate::error::{GfResult, GroupForgeError};
use crate::scorer::GroupId;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// The loaded participant list. Records are immutable for the run; the row
/// index doubles as the participant index everywhere else in the crate.
#[derive(Debug, Clone)]
pub struct ParticipantTable {
    pub header: Option<Vec<String>>,
    pub records: Vec<Vec<String>>,
}

impl ParticipantTable {
    pub fn load_from_file<P: AsRef<Path>>(
        path: P,
        delimiter: u8,
        has_headers: bool,
    ) -> GfResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::load_from_reader(file, delimiter, has_headers)
    }

    pub fn load_from_reader<R: Read>(rdr: R, delimiter: u8, has_headers: bool) -> GfResult<Self> {
        // Headers and row shape are handled here rather than by the csv
        // reader, so ragged rows surface as a data error instead of being
        // silently skipped or truncated.
        let mut csv = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(rdr);

        let mut records: Vec<Vec<String>> = Vec::new();
        for result in csv.records() {
            let rec = result?;
            records.push(rec.iter().map(|f| f.to_string()).collect());
        }

        let header = if has_headers && !records.is_empty() {
            Some(records.remove(0))
        } else {
            None
        };

        if records.is_empty() {
            return Err(GroupForgeError::Data(
                "participant table is empty".to_string(),
            ));
        }

        let width = header
            .as_ref()
            .map(|h| h.len())
            .unwrap_or_else(|| records[0].len());
        let offset = 1 + has_headers as usize;
        for (i, rec) in records.iter().enumerate() {
            if rec.len() != width {
                return Err(GroupForgeError::Data(format!(
                    "row {} has {} fields, expected {}",
                    i + offset,
                    rec.len(),
                    width
                )));
            }
        }

        Ok(ParticipantTable { header, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.records.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Clone of the table minus its trailing column. Used when the last
    /// column carries a previously assigned group id.
    pub fn without_last_column(&self) -> GfResult<ParticipantTable> {
        if self.column_count() < 2 {
            return Err(GroupForgeError::Data(
                "expected at least one data column before the trailing group column".to_string(),
            ));
        }
        let trim = |row: &Vec<String>| row[..row.len() - 1].to_vec();
        Ok(ParticipantTable {
            header: self.header.as_ref().map(trim),
            records: self.records.iter().map(trim).collect(),
        })
    }

    /// Writes the table with each record's group id appended as a final
    /// column. Group ids are the stable integers in `[0, num_groups)`.
    pub fn write_with_groups<P: AsRef<Path>>(
        &self,
        path: P,
        delimiter: u8,
        assignment: &[GroupId],
    ) -> GfResult<()> {
        let file = File::create(path.as_ref())?;
        self.write_to_writer(file, delimiter, assignment)
    }

    pub fn write_to_writer<W: Write>(
        &self,
        wtr: W,
        delimiter: u8,
        assignment: &[GroupId],
    ) -> GfResult<()> {
        debug_assert_eq!(assignment.len(), self.records.len());

        let mut csv = WriterBuilder::new().delimiter(delimiter).from_writer(wtr);

        if let Some(header) = &self.header {
            let mut row = header.clone();
            row.push("group".to_string());
            csv.write_record(&row)?;
        }

        for (rec, &group) in self.records.iter().zip(assignment) {
            let mut row = rec.clone();
            row.push(group.to_string());
            csv.write_record(&row)?;
        }

        csv.flush()?;
        Ok(())
    }
}
