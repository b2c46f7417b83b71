//! Air quality index classification
//!
//! Maps the provider's numeric air quality index (1-5 scale, open-ended
//! upward) onto a severity bucket and the display strings for it.

use serde::Serialize;

/// Severity bucket for a provider air quality index.
///
/// The raw index is bucketed exactly once; every display string derives
/// from the bucket, so label, style tag, and advisories cannot disagree
/// for the same input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AqiBucket {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Hazardous,
}

impl AqiBucket {
    /// Bucket a raw index value.
    ///
    /// The provider scale starts at 1; zero and negative values land in
    /// `Good` because the first inclusive bound catches them.
    #[must_use]
    pub fn from_index(aqi: i64) -> Self {
        if aqi <= 1 {
            Self::Good
        } else if aqi <= 2 {
            Self::Fair
        } else if aqi <= 3 {
            Self::Moderate
        } else if aqi <= 4 {
            Self::Poor
        } else if aqi <= 5 {
            Self::VeryPoor
        } else {
            Self::Hazardous
        }
    }

    /// Short category label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Hazardous => "Hazardous",
        }
    }

    /// CSS class the frontend uses to color the badge
    #[must_use]
    pub fn style_tag(self) -> &'static str {
        match self {
            Self::Good => "aqi-good",
            Self::Fair => "aqi-fair",
            Self::Moderate => "aqi-moderate",
            Self::Poor => "aqi-poor",
            Self::VeryPoor => "aqi-very-poor",
            Self::Hazardous => "aqi-hazardous",
        }
    }

    /// Health implication text for the bucket
    #[must_use]
    pub fn health_implication(self) -> &'static str {
        match self {
            Self::Good => {
                "Air quality is satisfactory, and air pollution poses little or no risk."
            }
            Self::Fair => {
                "Air quality is acceptable; however, for some pollutants there may be a moderate \
                 health concern for a very small number of people."
            }
            Self::Moderate => {
                "Members of sensitive groups may experience health effects. The general public is \
                 not likely to be affected."
            }
            Self::Poor => {
                "Everyone may begin to experience health effects; members of sensitive groups may \
                 experience more serious health effects."
            }
            Self::VeryPoor => "Health alert: everyone may experience more serious health effects.",
            Self::Hazardous => {
                "Health warnings of emergency conditions. The entire population is more likely to \
                 be affected."
            }
        }
    }

    /// Cautionary statement for the bucket
    #[must_use]
    pub fn cautionary_statement(self) -> &'static str {
        match self {
            Self::Good => "None",
            Self::Fair => {
                "Unusually sensitive people should consider reducing prolonged or heavy exertion."
            }
            Self::Moderate => {
                "Active children and adults, and people with respiratory disease, such as asthma, \
                 should limit prolonged outdoor exertion."
            }
            Self::Poor => {
                "Active children and adults, and people with respiratory disease, such as asthma, \
                 should avoid prolonged outdoor exertion; everyone else, especially children, \
                 should limit prolonged outdoor exertion."
            }
            Self::VeryPoor => {
                "Active children and adults, and people with respiratory disease, such as asthma, \
                 should avoid all outdoor exertion; everyone else, especially children, should \
                 limit outdoor exertion."
            }
            Self::Hazardous => "Everyone should avoid all outdoor exertion.",
        }
    }
}

/// Display strings for one air quality index value
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AqiClassification {
    /// The bucket the index fell into
    pub bucket: AqiBucket,
    /// Short category label
    pub label: &'static str,
    /// CSS class for the frontend badge
    pub style_tag: &'static str,
    /// Health implication text
    pub health_implication: &'static str,
    /// Cautionary statement
    pub cautionary_statement: &'static str,
}

/// Classify a raw air quality index into its display strings.
#[must_use]
pub fn classify(aqi: i64) -> AqiClassification {
    let bucket = AqiBucket::from_index(aqi);
    AqiClassification {
        bucket,
        label: bucket.label(),
        style_tag: bucket.style_tag(),
        health_implication: bucket.health_implication(),
        cautionary_statement: bucket.cautionary_statement(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-3, AqiBucket::Good)]
    #[case(0, AqiBucket::Good)]
    #[case(1, AqiBucket::Good)]
    #[case(2, AqiBucket::Fair)]
    #[case(3, AqiBucket::Moderate)]
    #[case(4, AqiBucket::Poor)]
    #[case(5, AqiBucket::VeryPoor)]
    #[case(6, AqiBucket::Hazardous)]
    #[case(42, AqiBucket::Hazardous)]
    fn test_bucket_ladder(#[case] aqi: i64, #[case] expected: AqiBucket) {
        assert_eq!(AqiBucket::from_index(aqi), expected);
    }

    #[test]
    fn test_zero_and_one_share_a_bucket() {
        // The scale starts at 1, but 0 hits the first inclusive bound.
        assert_eq!(classify(0), classify(1));
        assert_eq!(classify(0).label, "Good");
    }

    #[test]
    fn test_labels() {
        assert_eq!(classify(3).label, "Moderate");
        assert_eq!(classify(6).label, "Hazardous");
    }

    #[test]
    fn test_classify_is_idempotent() {
        for aqi in -2..8 {
            assert_eq!(classify(aqi), classify(aqi));
        }
    }

    #[test]
    fn test_outputs_stay_consistent_with_bucket() {
        for aqi in -2..8 {
            let classification = classify(aqi);
            let bucket = classification.bucket;
            assert_eq!(classification.label, bucket.label());
            assert_eq!(classification.style_tag, bucket.style_tag());
            assert_eq!(classification.health_implication, bucket.health_implication());
            assert_eq!(
                classification.cautionary_statement,
                bucket.cautionary_statement()
            );
        }
    }

    #[test]
    fn test_good_has_no_cautionary_statement() {
        assert_eq!(classify(1).cautionary_statement, "None");
    }
}
