use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::aggregation::{LocationAggregator, LocationPerformance};
use crate::catalog::CatalogGenerator;
use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::simulator::{EventSimulator, ReadEvent};
use crate::sink::{MemorySink, RecordSink, Table};
use crate::table::{events_frame, performance_frame, products_frame};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub reference_date: NaiveDate,
    pub product_count: usize,
    pub event_count: u64,
    pub performance: Vec<LocationPerformance>,
}

pub struct Pipeline {
    config: SynthConfig,
    seed: u64,
    reference_date: NaiveDate,
}

impl Pipeline {
    /// Validates the configuration and pins the seed and reference date.
    pub fn new(config: SynthConfig) -> Result<Self, SynthError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let reference_date = config
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        Ok(Self {
            config,
            seed,
            reference_date,
        })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Generate all three tables into `sink`.
    ///
    /// Read events are folded into the location summary as they are produced
    /// and handed to the sink in batches of `event_batch_size`.
    pub fn run<S: RecordSink + ?Sized>(&self, sink: &mut S) -> Result<RunSummary, SynthError> {
        let catalog = CatalogGenerator::new(&self.config, self.reference_date)?;
        let simulator = EventSimulator::new(&self.config, self.reference_date)?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        sink.begin_run()?;

        info!(
            seed = self.seed,
            reference_date = %self.reference_date,
            products = self.config.num_products,
            "generating product data"
        );
        let products = catalog.generate(&mut rng);
        sink.write_batch(Table::Products, &mut products_frame(&products)?)?;

        info!(
            days = self.config.days,
            readers = self.config.num_readers,
            from = %simulator.window_start(),
            to = %simulator.window_end(),
            "generating RFID read events"
        );
        let batch_size = self.config.event_batch_size;
        let mut aggregator = LocationAggregator::new();
        let mut buffer: Vec<ReadEvent> = Vec::with_capacity(batch_size);
        let mut batches = 0usize;

        for product in &products {
            let reads = simulator.simulate_product(product, &mut rng);
            aggregator.extend(&reads.events);
            buffer.extend(reads.events);
            if buffer.len() >= batch_size {
                Self::flush_events(sink, &mut buffer)?;
                batches += 1;
            }
        }
        if !buffer.is_empty() || batches == 0 {
            Self::flush_events(sink, &mut buffer)?;
            batches += 1;
        }
        debug!(batches, "read events written");

        info!("calculating location metrics");
        let performance = aggregator.finish();
        sink.write_batch(
            Table::LocationPerformance,
            &mut performance_frame(&performance)?,
        )?;

        let summary = RunSummary {
            seed: self.seed,
            reference_date: self.reference_date,
            product_count: products.len(),
            event_count: aggregator.event_count(),
            performance,
        };
        info!(
            products = summary.product_count,
            events = summary.event_count,
            "data generation complete"
        );
        Ok(summary)
    }

    /// Run into a [`MemorySink`] and return it alongside the summary.
    pub fn run_in_memory(&self) -> Result<(RunSummary, MemorySink), SynthError> {
        let mut sink = MemorySink::new();
        let summary = self.run(&mut sink)?;
        Ok((summary, sink))
    }

    fn flush_events<S: RecordSink + ?Sized>(
        sink: &mut S,
        buffer: &mut Vec<ReadEvent>,
    ) -> Result<(), SynthError> {
        sink.write_batch(Table::ReadEvents, &mut events_frame(buffer)?)?;
        buffer.clear();
        Ok(())
    }
}
