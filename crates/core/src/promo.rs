use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

pub const PROMO_CODE_PREFIX: &str = "SIERRA-";
pub const PROMO_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

const NOT_QUALIFIED_MESSAGE: &str = "The Early Riser promotion only runs from 8–10 AM Pacific Time. This user does not currently qualify.";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromoOutcome {
    Qualified { code: String },
    NotQualified,
}

impl PromoOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::Qualified { code } => format!(
                "This user qualifies for the Early Riser promotion! They may use discount code {code} for 10% off."
            ),
            Self::NotQualified => NOT_QUALIFIED_MESSAGE.to_string(),
        }
    }
}

/// Time-gated discount, open for local hours in `[start_hour, end_hour)`.
///
/// Codes are minted fresh on every qualifying call and never recorded, so two
/// calls inside the same window hand out two different codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EarlyRiserPromo {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for EarlyRiserPromo {
    fn default() -> Self {
        Self { start_hour: 8, end_hour: 10 }
    }
}

impl EarlyRiserPromo {
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        let hour = now.with_timezone(&PROMO_TIMEZONE).hour();
        (self.start_hour..self.end_hour).contains(&hour)
    }

    pub fn evaluate(&self, now: DateTime<Utc>) -> PromoOutcome {
        if self.is_open(now) {
            PromoOutcome::Qualified { code: mint_code() }
        } else {
            PromoOutcome::NotQualified
        }
    }
}

pub fn mint_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{PROMO_CODE_PREFIX}{}", id[..4].to_uppercase())
}
