/// Column-name constants for the generated tables.
/// Single source of truth for the CSV headers and the Python exports.

// ── Product columns ─────────────────────────────────────────────────────────
pub mod product {
    pub const PRODUCT_ID: &str = "product_id";
    pub const PRODUCT_NAME: &str = "product_name";
    pub const CATEGORY: &str = "category";
    pub const PRICE: &str = "price";
    pub const LOCATION: &str = "location";
    pub const TAG_ID: &str = "tag_id";
    pub const DATE_ADDED: &str = "date_added";

    pub const ALL: [&str; 7] = [
        PRODUCT_ID,
        PRODUCT_NAME,
        CATEGORY,
        PRICE,
        LOCATION,
        TAG_ID,
        DATE_ADDED,
    ];
}

// ── Read event columns ──────────────────────────────────────────────────────
pub mod read_event {
    pub const EVENT_ID: &str = "event_id";
    pub const TAG_ID: &str = "tag_id";
    pub const PRODUCT_ID: &str = "product_id";
    pub const READER_ID: &str = "reader_id";
    pub const TIMESTAMP: &str = "timestamp";
    pub const READ_SUCCESS: &str = "read_success";
    pub const SIGNAL_STRENGTH: &str = "signal_strength";
    pub const LOCATION: &str = "location";
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";

    pub const ALL: [&str; 10] = [
        EVENT_ID,
        TAG_ID,
        PRODUCT_ID,
        READER_ID,
        TIMESTAMP,
        READ_SUCCESS,
        SIGNAL_STRENGTH,
        LOCATION,
        TEMPERATURE,
        HUMIDITY,
    ];
}

// ── Location performance columns ────────────────────────────────────────────
pub mod performance {
    pub const LOCATION: &str = "location";
    pub const SUCCESS_RATE: &str = "success_rate";
    pub const AVG_SIGNAL_STRENGTH: &str = "avg_signal_strength";
    pub const EVENT_COUNT: &str = "event_count";

    pub const ALL: [&str; 4] = [LOCATION, SUCCESS_RATE, AVG_SIGNAL_STRENGTH, EVENT_COUNT];
}

// ── Output file names ───────────────────────────────────────────────────────
pub mod files {
    pub const PRODUCTS: &str = "products.csv";
    pub const READ_EVENTS: &str = "rfid_reads.csv";
    pub const LOCATION_PERFORMANCE: &str = "location_performance.csv";
}

// ── Value formats ───────────────────────────────────────────────────────────
pub mod format {
    pub const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";
    pub const DATE: &str = "%Y-%m-%d";
}
