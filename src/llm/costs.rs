//! Per-token pricing for OpenAI chat models (USD).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// (input, output) cost per token for a model, zero when unknown.
///
/// Dated snapshots (`gpt-4o-2024-08-06`) resolve to their family.
pub fn model_cost(model: &str) -> (Decimal, Decimal) {
    let model = model.to_ascii_lowercase();
    // Longest prefixes first: "gpt-4o-mini" also starts with "gpt-4o" and "gpt-4".
    if model.starts_with("gpt-4o-mini") {
        (dec!(0.00000015), dec!(0.0000006))
    } else if model.starts_with("gpt-4o") {
        (dec!(0.0000025), dec!(0.00001))
    } else if model.starts_with("gpt-4-turbo") {
        (dec!(0.00001), dec!(0.00003))
    } else if model.starts_with("gpt-4") {
        (dec!(0.00003), dec!(0.00006))
    } else if model.starts_with("gpt-3.5-turbo") {
        (dec!(0.0000005), dec!(0.0000015))
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpt4_pricing() {
        assert_eq!(model_cost("gpt-4"), (dec!(0.00003), dec!(0.00006)));
    }

    #[test]
    fn test_mini_is_not_priced_as_gpt4o() {
        assert_eq!(model_cost("gpt-4o-mini").0, dec!(0.00000015));
        assert_eq!(model_cost("GPT-4o-2024-08-06").0, dec!(0.0000025));
    }

    #[test]
    fn test_unknown_model_is_free() {
        assert_eq!(model_cost("llama-3-70b"), (Decimal::ZERO, Decimal::ZERO));
    }
}
