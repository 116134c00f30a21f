//! Weighted aggregation of the five scored fields.

use crate::comparator::FieldComparison;
use rust_decimal::Decimal;

/// The five fields that enter the weighted confidence score. Supplemental
/// comparisons (secondary dates, prices, extension attributes) are reported
/// alongside but never change the score, which keeps scoring stable as the
/// canonical schema grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightedField {
    TradeReference,
    Notional,
    TradeDate,
    CounterpartyName,
    Currency,
}

impl WeightedField {
    pub const ALL: [Self; 5] = [
        Self::TradeReference,
        Self::Notional,
        Self::TradeDate,
        Self::CounterpartyName,
        Self::Currency,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TradeReference => "trade_reference",
            Self::Notional => "notional",
            Self::TradeDate => "trade_date",
            Self::CounterpartyName => "counterparty_name",
            Self::Currency => "currency",
        }
    }

    /// Fixed weight table. Must sum to 1.0.
    #[must_use]
    pub fn weight(&self) -> Decimal {
        match self {
            Self::TradeReference => Decimal::new(30, 2),
            Self::Notional => Decimal::new(25, 2),
            Self::TradeDate => Decimal::new(20, 2),
            Self::CounterpartyName => Decimal::new(15, 2),
            Self::Currency => Decimal::new(10, 2),
        }
    }
}

/// Comparator outputs for the five weighted fields.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedComparisons {
    pub trade_reference: FieldComparison,
    pub notional: FieldComparison,
    pub trade_date: FieldComparison,
    pub counterparty_name: FieldComparison,
    pub currency: FieldComparison,
}

impl WeightedComparisons {
    #[must_use]
    pub fn get(&self, field: WeightedField) -> &FieldComparison {
        match field {
            WeightedField::TradeReference => &self.trade_reference,
            WeightedField::Notional => &self.notional,
            WeightedField::TradeDate => &self.trade_date,
            WeightedField::CounterpartyName => &self.counterparty_name,
            WeightedField::Currency => &self.currency,
        }
    }
}

pub struct MatchScorer;

impl MatchScorer {
    /// Aggregates the five weighted comparator outputs into one confidence
    /// score, rounded to 2 decimal places. Deterministic and bounded to
    /// `[0, 1]` by construction (weights sum to 1, raw scores are bounded).
    #[must_use]
    pub fn score(comparisons: &WeightedComparisons) -> Decimal {
        WeightedField::ALL
            .iter()
            .map(|field| field.weight() * comparisons.get(*field).raw_score)
            .sum::<Decimal>()
            .round_dp(2)
    }
}
