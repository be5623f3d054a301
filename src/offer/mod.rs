// Offer letter rendering
pub mod letter;
pub mod metrics;
pub mod pdf;

pub use letter::{offer_filename, OfferLetter};
pub use metrics::Font;
pub use pdf::PdfDocument;
