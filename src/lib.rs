pub mod aggregation;
pub mod catalog;
pub mod config;
pub mod error;
pub mod faker;
pub mod pipeline;
pub mod schema;
pub mod simulator;
pub mod sink;
pub mod table;

#[cfg(feature = "python")]
mod python;

pub use aggregation::{aggregate, LocationAggregator, LocationPerformance};
pub use catalog::{CatalogGenerator, Product};
pub use config::{HourWindow, SynthConfig, ValueRange};
pub use error::SynthError;
pub use pipeline::{Pipeline, RunSummary};
pub use simulator::{EventSimulator, ProductReads, ReadEvent};
pub use sink::{CsvSink, MemorySink, RecordSink, Table};

/// Round half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(feature = "python")]
mod py_module {
    use pyo3::prelude::*;
    use pyo3::types::PyModule;

    use crate::schema;

    /// Export schema constants as Python submodules
    fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
        let product = PyModule::new(m.py(), "product")?;
        for name in schema::product::ALL {
            product.add(name.to_uppercase(), name)?;
        }
        m.add_submodule(&product)?;

        let read_event = PyModule::new(m.py(), "read_event")?;
        for name in schema::read_event::ALL {
            read_event.add(name.to_uppercase(), name)?;
        }
        m.add_submodule(&read_event)?;

        let performance = PyModule::new(m.py(), "performance")?;
        for name in schema::performance::ALL {
            performance.add(name.to_uppercase(), name)?;
        }
        m.add_submodule(&performance)?;

        Ok(())
    }

    #[pymodule]
    fn rfid_synth(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<crate::python::RfidSynth>()?;
        add_schema_exports(m)?;
        Ok(())
    }
}
