//! Multimeter recording of node state variables, one row per simulation step,
//! kept in memory and optionally streamed to a file.

use std::{
    fs::File,
    io::{BufWriter, Write},
};
use crate::error::{RecordError, SimulationError};


/// A registered recording of (variable, node, port) triplets sampled every step
pub struct Record {
    /// File the rows are streamed to, in memory only when empty
    pub file_name: String,
    /// Recorded variable names, one per sampled value
    pub var_names: Vec<String>,
    /// Global node indices, one per sampled value
    pub nodes: Vec<usize>,
    /// Receptor ports for port indexed variables, `0` for scalar variables
    pub ports: Vec<usize>,
    /// Sampled rows, each `[t, value, ...]` with one value per triplet
    pub rows: Vec<Vec<f32>>,
    writer: Option<BufWriter<File>>,
}

impl Record {
    /// Creates an empty record for the given triplets
    pub fn new(
        file_name: &str,
        var_names: Vec<String>,
        nodes: Vec<usize>,
        ports: Vec<usize>,
    ) -> Self {
        Record {
            file_name: file_name.to_string(),
            var_names,
            nodes,
            ports,
            rows: Vec::new(),
            writer: None,
        }
    }

    /// Opens the output file if one was named, called once at calibration
    pub fn open_file(&mut self) -> Result<(), SimulationError> {
        if !self.file_name.is_empty() {
            let file = File::create(&self.file_name)
                .map_err(|_| SimulationError::RecordFileUnwritable(self.file_name.clone()))?;
            self.writer = Some(BufWriter::new(file));
        }

        Ok(())
    }

    /// Appends one sampled row at the given time, streaming it to the
    /// output file as well when one is open
    pub fn push_row(&mut self, t: f32, values: Vec<f32>) -> Result<(), SimulationError> {
        if let Some(writer) = &mut self.writer {
            write!(writer, "{}", t)
                .map_err(|_| SimulationError::RecordFileUnwritable(self.file_name.clone()))?;
            for value in &values {
                write!(writer, "\t{}", value)
                    .map_err(|_| SimulationError::RecordFileUnwritable(self.file_name.clone()))?;
            }
            writeln!(writer)
                .map_err(|_| SimulationError::RecordFileUnwritable(self.file_name.clone()))?;
        }

        let mut row = Vec::with_capacity(values.len() + 1);
        row.push(t);
        row.extend(values);
        self.rows.push(row);

        Ok(())
    }

    /// Flushes any buffered file output, called after each simulate call
    pub fn flush_file(&mut self) -> Result<(), SimulationError> {
        if let Some(writer) = &mut self.writer {
            writer.flush()
                .map_err(|_| SimulationError::RecordFileUnwritable(self.file_name.clone()))?;
        }

        Ok(())
    }
}

/// The set of every created record
#[derive(Default)]
pub struct Multimeter {
    /// Created records in creation order, indexed by record id
    pub records: Vec<Record>,
}

impl Multimeter {
    /// Registers a record and returns its id
    pub fn create_record(
        &mut self,
        file_name: &str,
        var_names: Vec<String>,
        nodes: Vec<usize>,
        ports: Vec<usize>,
    ) -> usize {
        self.records.push(Record::new(file_name, var_names, nodes, ports));

        self.records.len() - 1
    }

    /// Opens every record's output file, called once at calibration
    pub fn open_files(&mut self) -> Result<(), SimulationError> {
        for record in self.records.iter_mut() {
            record.open_file()?;
        }

        Ok(())
    }

    /// Flushes every record's output file
    pub fn flush_files(&mut self) -> Result<(), SimulationError> {
        for record in self.records.iter_mut() {
            record.flush_file()?;
        }

        Ok(())
    }

    /// Returns the sampled rows of the given record in time order
    pub fn get_record_data(&self, i_record: usize) -> Result<&[Vec<f32>], RecordError> {
        match self.records.get(i_record) {
            Some(record) => Ok(&record.rows),
            None => Err(RecordError::RecordNotFound),
        }
    }
}
