use chrono::{Days, NaiveDate};
use fake::faker::company::en::{Buzzword, BuzzwordMiddle, BuzzwordTail};
use fake::Fake;
use rand::Rng;
use uuid::Uuid;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Catch-phrase style product name, e.g. "Robust asynchronous firmware".
pub fn product_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let head: String = Buzzword().fake_with_rng(rng);
    let middle: String = BuzzwordMiddle().fake_with_rng(rng);
    let tail: String = BuzzwordTail().fake_with_rng(rng);
    format!("{head} {middle} {tail}")
}

/// Tag id in `TAG_XXXX-XXXX-XXXX` form, uppercase hex.
pub fn tag_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut out = String::with_capacity(18);
    out.push_str("TAG_");
    for group in 0..3 {
        if group > 0 {
            out.push('-');
        }
        for _ in 0..4 {
            out.push(HEX_DIGITS[rng.gen_range(0..16)] as char);
        }
    }
    out
}

/// Random (version 4) UUID built from RNG bytes rather than the OS source.
pub fn event_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let bytes: [u8; 16] = rng.gen();
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// A date in `[end - days_back, end]`.
pub fn date_between<R: Rng + ?Sized>(rng: &mut R, end: NaiveDate, days_back: u64) -> NaiveDate {
    let offset = rng.gen_range(0..=days_back);
    end.checked_sub_days(Days::new(offset)).unwrap_or(end)
}
