//! Screening of free-text fort requests before they reach a generation prompt.
//!
//! Checks run cheapest and most dangerous first: length, injection/security
//! markers, explicit language, then the softer topic heuristics.
//!
//! The keyword lists are plain regular-expression sources grouped in a
//! [`PatternSet`], so a deployment can tighten or relax the policy without
//! touching the pipeline.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

pub const MAX_INPUT_LENGTH: usize = 500;
/// Inputs longer than this must show some fort or travel intent.
pub const AMBIGUOUS_LENGTH_THRESHOLD: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case", rename_all_fields = "camelCase", tag = "kind")]
pub enum RejectionReason {
    #[error("Input too long. Maximum {max_length} characters allowed.")]
    TooLong { max_length: usize },
    #[error("Input contains suspicious content")]
    SuspiciousContent,
    #[error("Please use appropriate language. This is a family-friendly travel app.")]
    ExplicitContent,
    #[error("Please enter fort names or trekking-related requests. This app specializes in Maharashtra fort adventures.")]
    OffTopic,
    #[error("Please specify fort names or describe your trekking adventure. Example: \"Raigad fort\" or \"weekend trek near Pune\".")]
    AmbiguousRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid { sanitized_text: String },
    Invalid { reason: RejectionReason },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }
}

/// Regular-expression sources for every screening category.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub suspicious: Vec<String>,
    pub explicit: Vec<String>,
    pub off_topic: Vec<String>,
    pub on_topic: Vec<String>,
    pub travel_intent: Vec<String>,
}

fn sources(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            suspicious: sources(&[
                r"(?i)system|prompt|instruction|ignore|bypass",
                r"(?i)\b(api|key|token|secret|password)\b",
                r"(?i)<script|javascript:|data:",
                r"\{\{.*\}\}|\$\{.*\}",
            ]),
            explicit: sources(&[
                r"(?i)\b(fuck|shit|damn|hell|ass|bitch|bastard|crap)\b",
                r"(?i)\b(sex|porn|nude|naked|xxx|adult)\b",
                r"(?i)\b(kill|murder|death|die|suicide|violence)\b",
                r"(?i)\b(hate|racist|terrorism|bomb|weapon|gun)\b",
                r"(?i)\b(drug|cocaine|marijuana|weed|heroin|meth)\b",
                r"(?i)\b(rape|abuse|harassment|stalking)\b",
            ]),
            off_topic: sources(&[
                r"(?i)\b(recipe|cooking|food|restaurant|hotel|menu|dish|meal|cuisine)\b",
                r"(?i)\b(movie|song|music|video|entertainment|game|sport)\b",
                r"(?i)\b(shopping|market|mall|store|buy|sell|price)\b",
                r"(?i)\b(weather|climate|temperature|rain|sun|cloud)\b",
                r"(?i)\b(medical|doctor|medicine|hospital|health|treatment)\b",
                r"(?i)\b(technology|computer|software|app|website|internet)\b",
                r"(?i)\b(politics|government|election|vote|party|minister)\b",
                r"(?i)\b(business|company|job|work|office|salary|career)\b",
                r"(?i)\b(education|school|college|university|study|exam)\b",
                r"(?i)\b(book|novel|story|poem|literature|author|write)\b",
            ]),
            on_topic: sources(&[
                r"(?i)\b(fort|forts|qila|gad|garh|killa)\b",
                r"(?i)\b(trek|trekking|hike|hiking|climb|climbing)\b",
                r"(?i)\b(maharashtra|pune|mumbai|nashik|aurangabad|kolhapur|satara|sangli)\b",
                r"(?i)\b(maratha|shivaji|peshwa|mughal|british|sultanate)\b",
                r"(?i)\b(mountain|hill|peak|valley|range|sahyadri|western ghats)\b",
                r"(?i)\b(adventure|expedition|journey|trip|travel|visit)\b",
                r"(?i)\b(historical|heritage|ancient|medieval|ruins|architecture)\b",
                r"(?i)\b(raigad|sinhagad|lohagad|pratapgad|rajgad|torna|shivneri|purandar)\b",
            ]),
            travel_intent: sources(&[
                r"(?i)\b(trip|travel|visit|explore|adventure|weekend|day|getaway|tour|journey|beginners|easy|difficult|moderate)\b",
            ]),
        }
    }
}

/// Compiled screening policy.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    max_length: usize,
    ambiguous_length_threshold: usize,
    suspicious: Vec<Regex>,
    explicit: Vec<Regex>,
    off_topic: Vec<Regex>,
    on_topic: Vec<Regex>,
    travel_intent: Vec<Regex>,
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

fn any_match(patterns: &[Regex], input: &str) -> bool {
    patterns.iter().any(|p| p.is_match(input))
}

impl ValidationPolicy {
    pub fn from_patterns(patterns: &PatternSet) -> Result<Self, regex::Error> {
        Ok(Self {
            max_length: MAX_INPUT_LENGTH,
            ambiguous_length_threshold: AMBIGUOUS_LENGTH_THRESHOLD,
            suspicious: compile(&patterns.suspicious)?,
            explicit: compile(&patterns.explicit)?,
            off_topic: compile(&patterns.off_topic)?,
            on_topic: compile(&patterns.on_topic)?,
            travel_intent: compile(&patterns.travel_intent)?,
        })
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

/// The built-in policy, compiled on first use.
pub fn default_policy() -> &'static ValidationPolicy {
    static POLICY: OnceLock<ValidationPolicy> = OnceLock::new();
    POLICY.get_or_init(|| {
        ValidationPolicy::from_patterns(&PatternSet::default())
            .expect("built-in validation patterns compile")
    })
}

#[derive(Debug, Clone)]
pub struct InputValidator {
    policy: ValidationPolicy,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self {
            policy: default_policy().clone(),
        }
    }
}

impl InputValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn validate(&self, input: &str) -> ValidationOutcome {
        match self.check(input) {
            Ok(()) => ValidationOutcome::Valid {
                sanitized_text: sanitize(input),
            },
            Err(reason) => ValidationOutcome::Invalid { reason },
        }
    }

    fn check(&self, input: &str) -> Result<(), RejectionReason> {
        let policy = &self.policy;
        let length = input.chars().count();

        if length > policy.max_length {
            return Err(RejectionReason::TooLong {
                max_length: policy.max_length,
            });
        }

        if any_match(&policy.suspicious, input) {
            return Err(RejectionReason::SuspiciousContent);
        }

        if any_match(&policy.explicit, input) {
            return Err(RejectionReason::ExplicitContent);
        }

        // An on-topic match vetoes both topic checks below.
        let on_topic = any_match(&policy.on_topic, input);

        if !on_topic && any_match(&policy.off_topic, input) {
            return Err(RejectionReason::OffTopic);
        }

        if !on_topic
            && length > policy.ambiguous_length_threshold
            && !any_match(&policy.travel_intent, input)
        {
            return Err(RejectionReason::AmbiguousRequest);
        }

        Ok(())
    }
}

fn markup_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[<>"']"#).expect("valid regex"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Drops angle brackets and quotes, then normalizes whitespace.
pub fn sanitize(input: &str) -> String {
    let stripped = markup_regex().replace_all(input, "");
    whitespace_regex()
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

/// Validates with the built-in policy.
pub fn validate(input: &str) -> ValidationOutcome {
    InputValidator::default().validate(input)
}
