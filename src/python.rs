use std::path::PathBuf;

use chrono::NaiveDate;
use pyo3::prelude::*;
use pyo3_polars::PyDataFrame;

use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::pipeline::Pipeline;
use crate::sink::{CsvSink, Table};
use crate::table::{performance_frame, read_csv_as_strings, summarize_events_frame};

#[pyclass]
pub struct RfidSynth {
    config: SynthConfig,
}

#[pymethods]
impl RfidSynth {
    #[new]
    #[pyo3(signature = (
        num_products = 1000,
        num_locations = 5,
        num_readers = 20,
        days = 7,
        success_probability = 0.85,
        read_frequencies = None,
        seed = None,
        reference_date = None,
        output_dir = "data",
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        num_products: usize,
        num_locations: usize,
        num_readers: u32,
        days: u32,
        success_probability: f64,
        read_frequencies: Option<Vec<u32>>,
        seed: Option<u64>,
        reference_date: Option<NaiveDate>,
        output_dir: &str,
    ) -> PyResult<Self> {
        let defaults = SynthConfig::default();
        let config = SynthConfig {
            num_products,
            num_locations,
            num_readers,
            days,
            success_probability,
            read_frequencies: read_frequencies.unwrap_or(defaults.read_frequencies.clone()),
            seed,
            reference_date,
            output_dir: PathBuf::from(output_dir),
            ..defaults
        };
        config.validate()?;
        Ok(Self { config })
    }

    /// Generate all tables in memory.
    ///
    /// Returns (products, read_events, location_performance).
    fn generate(&self) -> PyResult<(PyDataFrame, PyDataFrame, PyDataFrame)> {
        let pipeline = Pipeline::new(self.config.clone())?;
        let (_, mut sink) = pipeline.run_in_memory()?;
        let mut take = |table: Table| {
            sink.take(table)
                .ok_or_else(|| SynthError::InvalidData(format!("{table:?} was not produced")))
        };
        Ok((
            PyDataFrame(take(Table::Products)?),
            PyDataFrame(take(Table::ReadEvents)?),
            PyDataFrame(take(Table::LocationPerformance)?),
        ))
    }

    /// Generate and write the CSV files. Returns the seed that was used.
    #[pyo3(signature = (output_dir=None))]
    fn write_csv(&self, output_dir: Option<&str>) -> PyResult<u64> {
        let dir = output_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.output_dir.clone());
        let pipeline = Pipeline::new(self.config.clone())?;
        let mut sink = CsvSink::create(dir)?;
        let summary = pipeline.run(&mut sink)?;
        Ok(summary.seed)
    }

    /// Location summary of an existing read-event CSV.
    #[staticmethod]
    fn summarize_csv(path: &str) -> PyResult<PyDataFrame> {
        let df = read_csv_as_strings(PathBuf::from(path).as_path())?;
        let rows = summarize_events_frame(&df)?;
        Ok(PyDataFrame(performance_frame(&rows)?))
    }

    #[getter]
    fn seed(&self) -> Option<u64> {
        self.config.seed
    }
}
