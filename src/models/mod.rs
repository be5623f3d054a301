// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Availability, CandidateProfile, CompensationBenchmark, Match, MatchCandidate, MatchResult,
    MatchRole, MatchStatus, MatchWithDetails, Offer, OfferStatus, OfferType, Requisition, Role,
    ScoringWeights, Trial, TrialDetails, TrialStatus, TrialTemplate, Urgency, User, VibeCheck,
    VibeCheckStatus, WorkingStyle,
};
pub use requests::{
    BenchmarkQuery, CheckoutRequest, IntakeRequest, MatchQuery, MatchRequest, OfferData,
    OfferRequest, TrialRequest, VibeCheckQuery, VibeCheckRequest,
};
pub use responses::{
    BenchmarksResponse, CheckoutResponse, ErrorResponse, HealthResponse, IntakeResponse,
    MatchesResponse, OfferSentResponse, TrialTemplatesResponse, VibeCheckDetailsResponse,
    VibeCheckResponse, WebhookResponse,
};
