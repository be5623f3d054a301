use crate::models::{OfferData, OfferType};
use crate::offer::metrics::Font;
use crate::offer::pdf::PdfDocument;
use chrono::{Duration, NaiveDate};

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;

/// Days the candidate has to accept
const RESPONSE_WINDOW_DAYS: i64 = 7;

/// Everything that goes into an offer letter
#[derive(Debug, Clone)]
pub struct OfferLetter<'a> {
    pub candidate_name: &'a str,
    pub founder_name: Option<&'a str>,
    pub offer: &'a OfferData,
    pub start_date: Option<NaiveDate>,
    pub issued_on: NaiveDate,
}

impl OfferLetter<'_> {
    /// Lay the letter out as a PDF
    pub fn render(&self) -> Vec<u8> {
        let offer = self.offer;
        let full_time = offer.offer_type == OfferType::FullTime;
        let mut doc = PdfDocument::new();

        doc.add_text("OFFER LETTER", TITLE_SIZE, Font::HelveticaBold);
        doc.add_space(10.0);

        doc.add_text(&format!("Date: {}", format_date(self.issued_on)), BODY_SIZE, Font::Helvetica);
        doc.add_space(5.0);

        doc.add_text(&format!("Dear {},", self.candidate_name), BODY_SIZE, Font::Helvetica);
        doc.add_space(5.0);

        doc.add_text(
            &format!(
                "We are pleased to offer you the position of {} at our company. Based on your \
                 excellent performance during the trial project and our discussions, we believe \
                 you would be a valuable addition to our team.",
                offer.title
            ),
            BODY_SIZE,
            Font::Helvetica,
        );
        doc.add_space(5.0);

        doc.add_text("POSITION DETAILS:", HEADING_SIZE, Font::HelveticaBold);
        doc.add_space(5.0);

        doc.add_text(&format!("Position: {}", offer.title), BODY_SIZE, Font::Helvetica);
        let employment = if full_time { "Full-Time Employee" } else { "Contract/Freelance" };
        doc.add_text(&format!("Employment Type: {}", employment), BODY_SIZE, Font::Helvetica);

        match (offer.offer_type, offer.salary, offer.hourly_rate) {
            (OfferType::FullTime, Some(salary), _) if salary > 0 => {
                doc.add_text(
                    &format!("Annual Salary: ${}", group_thousands(salary)),
                    BODY_SIZE,
                    Font::Helvetica,
                );
            }
            (OfferType::Contract, _, Some(rate)) if rate > 0 => {
                doc.add_text(&format!("Hourly Rate: ${}/hour", rate), BODY_SIZE, Font::Helvetica);
            }
            _ => {}
        }

        if full_time {
            if let Some(equity) = offer.equity.filter(|e| *e > 0.0) {
                doc.add_text(
                    &format!("Equity: {}% of company shares", equity),
                    BODY_SIZE,
                    Font::Helvetica,
                );
                if let Some(vesting) = offer.vesting_schedule.as_deref().filter(|v| !v.trim().is_empty()) {
                    doc.add_text(&format!("Vesting Schedule: {}", vesting), BODY_SIZE, Font::Helvetica);
                }
            }
        }

        if let Some(start) = self.start_date {
            doc.add_text(&format!("Start Date: {}", format_date(start)), BODY_SIZE, Font::Helvetica);
        }
        doc.add_space(10.0);

        let benefits: Vec<&str> = offer
            .benefits
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .collect();
        if full_time && !benefits.is_empty() {
            doc.add_text("BENEFITS & PERKS:", HEADING_SIZE, Font::HelveticaBold);
            doc.add_space(5.0);
            for benefit in benefits {
                doc.add_text(&format!("\u{2022} {}", benefit), BODY_SIZE, Font::Helvetica);
            }
            doc.add_space(5.0);
        }

        if !offer.responsibilities.trim().is_empty() {
            doc.add_text("KEY RESPONSIBILITIES:", HEADING_SIZE, Font::HelveticaBold);
            doc.add_space(5.0);
            doc.add_text(offer.responsibilities.trim(), BODY_SIZE, Font::Helvetica);
            doc.add_space(10.0);
        }

        doc.add_text(
            "This offer is contingent upon successful completion of our standard background \
             check and reference verification process.",
            BODY_SIZE,
            Font::Helvetica,
        );
        doc.add_space(5.0);

        let respond_by = self.issued_on + Duration::days(RESPONSE_WINDOW_DAYS);
        doc.add_text(
            &format!(
                "Please confirm your acceptance of this offer by signing and returning this \
                 letter by {}. We are excited about the possibility of you joining our team and \
                 look forward to your response.",
                format_date(respond_by)
            ),
            BODY_SIZE,
            Font::Helvetica,
        );
        doc.add_space(10.0);

        doc.add_text("Sincerely,", BODY_SIZE, Font::Helvetica);
        doc.add_space(15.0);
        if let Some(founder) = self.founder_name.filter(|n| !n.trim().is_empty()) {
            doc.add_text(founder, BODY_SIZE, Font::Helvetica);
        }
        doc.add_text("Founder", BODY_SIZE, Font::Helvetica);
        doc.add_space(20.0);

        doc.add_text("Accepted by:", BODY_SIZE, Font::Helvetica);
        doc.add_space(15.0);
        doc.add_text("_________________________", BODY_SIZE, Font::Helvetica);
        doc.add_text(self.candidate_name, BODY_SIZE, Font::Helvetica);
        doc.add_space(10.0);
        doc.add_text("Date: _________________________", BODY_SIZE, Font::Helvetica);

        doc.finish()
    }
}

/// Attachment filename: `offer-letter-alex-chen.pdf`
pub fn offer_filename(candidate_name: &str) -> String {
    let slug = candidate_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("offer-letter-{}.pdf", slug)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
