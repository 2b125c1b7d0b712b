/// External service adapters
///
/// The save-place flow depends on two third-party HTTP services. Each is
/// hidden behind a trait so handlers stay testable with in-process fakes:
///
/// - `Geocoder`: resolves a postal address to coordinates
/// - `ImageLabeler`: extracts descriptive labels from photo bytes
///
/// The production implementations (`GoogleGeocoder`, `GoogleVisionLabeler`)
/// are thin reqwest adapters over the corresponding Google REST APIs. No
/// timeouts, retries, or backoff are applied; a single failed call fails
/// the whole request.

pub mod geocode;
pub mod vision;

pub use geocode::{GeocodeError, Geocoder, GoogleGeocoder};
pub use vision::{GoogleVisionLabeler, ImageLabeler, LabelError};
