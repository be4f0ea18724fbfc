use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::catalog::Product;
use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::{faker, round_to};

#[derive(Debug, Clone, PartialEq)]
pub struct ReadEvent {
    pub event_id: Uuid,
    pub tag_id: String,
    pub product_id: String,
    pub reader_id: String,
    pub timestamp: NaiveDateTime,
    pub read_success: bool,
    pub signal_strength: f64,
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
}

/// Events generated for a single product together with its drawn frequency.
#[derive(Debug, Clone)]
pub struct ProductReads {
    pub frequency: u32,
    pub events: Vec<ReadEvent>,
}

/// Draws one read frequency per product, then emits that many attempts on
/// every simulated day. Each attempt is a Bernoulli trial; the signal
/// strength is sampled afterwards from the range matching the outcome.
pub struct EventSimulator<'a> {
    config: &'a SynthConfig,
    window_start: NaiveDate,
}

impl<'a> EventSimulator<'a> {
    /// The window covers the `config.days` days before `reference_date`.
    pub fn new(config: &'a SynthConfig, reference_date: NaiveDate) -> Result<Self, SynthError> {
        config.validate()?;
        let window_start = reference_date
            .checked_sub_days(Days::new(u64::from(config.days)))
            .ok_or_else(|| SynthError::config("simulation window starts before the calendar"))?;
        Ok(Self {
            config,
            window_start,
        })
    }

    /// First simulated day (inclusive).
    pub fn window_start(&self) -> NaiveDate {
        self.window_start
    }

    /// Last simulated day (inclusive).
    pub fn window_end(&self) -> NaiveDate {
        self.window_start + Days::new(u64::from(self.config.days) - 1)
    }

    /// Simulate all days for one product.
    ///
    /// The frequency is drawn before any event so it holds for the whole
    /// window.
    pub fn simulate_product<R: Rng + ?Sized>(&self, product: &Product, rng: &mut R) -> ProductReads {
        let frequency = self.draw_frequency(rng);
        let mut events = Vec::with_capacity(frequency as usize * self.config.days as usize);

        for day in 0..self.config.days {
            let date = self.window_start + Days::new(u64::from(day));
            for _ in 0..frequency {
                events.push(self.read_attempt(product, date, rng));
            }
        }

        ProductReads { frequency, events }
    }

    /// Simulate every product, collecting all events in memory.
    pub fn simulate<R: Rng + ?Sized>(&self, products: &[Product], rng: &mut R) -> Vec<ReadEvent> {
        products
            .iter()
            .flat_map(|p| self.simulate_product(p, rng).events)
            .collect()
    }

    fn draw_frequency<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.config
            .read_frequencies
            .choose(rng)
            .copied()
            .unwrap_or_default()
    }

    fn read_attempt<R: Rng + ?Sized>(
        &self,
        product: &Product,
        date: NaiveDate,
        rng: &mut R,
    ) -> ReadEvent {
        let hours = self.config.business_hours;
        let hour = rng.gen_range(hours.start..=hours.end);
        let minute = rng.gen_range(0..60);
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);

        // Outcome first, then a signal consistent with it.
        let read_success = rng.gen::<f64>() < self.config.success_probability;
        let signal_strength = if read_success {
            let r = self.config.strong_signal;
            rng.gen_range(r.min..=r.max)
        } else {
            let r = self.config.weak_signal;
            rng.gen_range(r.min..r.max)
        };

        let temperature = self.config.temperature;
        let humidity = self.config.humidity;

        ReadEvent {
            event_id: faker::event_id(rng),
            tag_id: product.tag_id.clone(),
            product_id: product.product_id.clone(),
            reader_id: SynthConfig::reader_label(rng.gen_range(1..=self.config.num_readers)),
            timestamp: date.and_time(time),
            read_success,
            signal_strength,
            location: product.location.clone(),
            temperature: round_to(rng.gen_range(temperature.min..=temperature.max), 1),
            humidity: round_to(rng.gen_range(humidity.min..=humidity.max), 1),
        }
    }
}
