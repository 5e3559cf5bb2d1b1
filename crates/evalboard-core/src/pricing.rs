//! Model pricing and cost resolution
//!
//! Rates are expressed in USD per 1000 tokens. The resolver owns an immutable
//! [`PricingTable`] handed to it at construction; the embedded table is only
//! the default.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EvalboardError, EvalboardResult};

/// Embedded rates (model, input per 1K, output per 1K)
const BUILTIN_PRICING: &[(&str, f64, f64)] = &[
    // OpenAI
    ("gpt-4o", 0.0025, 0.01),
    ("gpt-4o-mini", 0.00015, 0.0006),
    ("gpt-4.1", 0.002, 0.008),
    ("gpt-4.1-mini", 0.0004, 0.0016),
    ("gpt-4.1-nano", 0.0001, 0.0004),
    ("gpt-5", 0.00125, 0.01),
    ("gpt-5-mini", 0.00025, 0.002),
    ("gpt-5-nano", 0.00005, 0.0004),
    ("o3", 0.002, 0.008),
    ("o4-mini", 0.0011, 0.0044),
    // Anthropic
    ("claude-3-7-sonnet-20250219", 0.003, 0.015),
    ("claude-sonnet-4-20250514", 0.003, 0.015),
    ("claude-opus-4-20250514", 0.015, 0.075),
    ("claude-opus-4-1-20250805", 0.015, 0.075),
    // Google
    ("gemini-2.5-pro", 0.00125, 0.01),
    ("gemini-2.5-flash", 0.0003, 0.0025),
    // Others
    ("deepseek-chat", 0.00027, 0.0011),
    ("deepseek-reasoner", 0.00055, 0.00219),
    ("grok-4", 0.003, 0.015),
    ("kimi-k2-0711-preview", 0.0006, 0.0025),
    ("qwen3-coder", 0.001, 0.005),
];

/// Token rates for one model, per 1000 tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Input rate (USD per 1K tokens)
    pub input: f64,

    /// Output rate (USD per 1K tokens)
    pub output: f64,
}

impl ModelPricing {
    /// Create a new pricing entry
    pub fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }

    /// Cost of the given token counts at these rates
    pub fn cost(&self, input_tokens: f64, output_tokens: f64) -> f64 {
        (input_tokens / 1000.0) * self.input + (output_tokens / 1000.0) * self.output
    }

    fn is_valid(&self) -> bool {
        self.input.is_finite() && self.output.is_finite() && self.input >= 0.0 && self.output >= 0.0
    }
}

/// Mapping from model identifier to its rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingTable {
    entries: BTreeMap<String, ModelPricing>,
}

impl PricingTable {
    /// A table with no models; every lookup misses
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The embedded table of known models
    pub fn builtin() -> Self {
        let entries = BUILTIN_PRICING
            .iter()
            .map(|(model, input, output)| (model.to_string(), ModelPricing::new(*input, *output)))
            .collect();
        Self { entries }
    }

    /// Add or replace one model
    pub fn with_model(mut self, model: impl Into<String>, pricing: ModelPricing) -> Self {
        self.entries.insert(model.into(), pricing);
        self
    }

    /// Overlay another table; its entries win on conflicts
    pub fn extend(&mut self, other: PricingTable) {
        self.entries.extend(other.entries);
    }

    /// Look up a model by exact identifier
    pub fn get(&self, model: &str) -> Option<&ModelPricing> {
        self.entries.get(model)
    }

    /// Iterate entries in model-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelPricing)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a table from a TOML or JSON file (chosen by extension)
    pub fn from_file(path: impl AsRef<Path>) -> EvalboardResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| EvalboardError::io(path, e))?;

        let table: PricingTable = if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content).map_err(|e| EvalboardError::parse(path, e))?
        } else {
            serde_json::from_str(&content).map_err(|e| EvalboardError::parse(path, e))?
        };

        table.validate()?;
        Ok(table)
    }

    /// Reject negative or non-finite rates
    pub fn validate(&self) -> EvalboardResult<()> {
        match self.entries.iter().find(|(_, pricing)| !pricing.is_valid()) {
            Some((model, pricing)) => Err(EvalboardError::invalid_config(format!(
                "pricing for '{}' must be finite and non-negative (input: {}, output: {})",
                model, pricing.input, pricing.output
            ))),
            None => Ok(()),
        }
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolves monetary cost for a model and token counts
#[derive(Debug, Clone, Default)]
pub struct PricingResolver {
    table: PricingTable,
}

impl PricingResolver {
    /// Create a resolver over the given table
    pub fn new(table: PricingTable) -> Self {
        Self { table }
    }

    /// The table this resolver reads from
    pub fn table(&self) -> &PricingTable {
        &self.table
    }

    /// Cost of `input_tokens`/`output_tokens` for `model`, or `None` if the
    /// model is not in the table. No rounding is applied.
    pub fn cost(&self, model: &str, input_tokens: f64, output_tokens: f64) -> Option<f64> {
        self.table
            .get(model)
            .map(|pricing| pricing.cost(input_tokens, output_tokens))
    }
}

/// Format a cost for display
pub fn format_cost(cost: f64) -> String {
    if cost < 0.01 {
        format!("${:.4}", cost)
    } else if cost < 1.0 {
        format!("${:.3}", cost)
    } else {
        format!("${:.2}", cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_gpt_4o_cost() {
        let resolver = PricingResolver::default();
        let cost = resolver.cost("gpt-4o", 1000.0, 500.0).unwrap();
        assert!(approx(cost, 0.0075));
    }

    #[test]
    fn test_unknown_model_is_none() {
        let resolver = PricingResolver::default();
        assert!(resolver.cost("not-a-model", 1000.0, 500.0).is_none());
        assert!(resolver.cost("not-a-model", 0.0, 0.0).is_none());
        assert!(resolver.cost("", 1.0, 1.0).is_none());
    }

    #[test]
    fn test_lookup_is_exact() {
        let resolver = PricingResolver::default();
        assert!(resolver.cost("GPT-4O", 1000.0, 0.0).is_none());
        assert!(resolver.cost("openai/gpt-4o", 1000.0, 0.0).is_none());
    }

    #[test]
    fn test_cost_is_linear() {
        let resolver = PricingResolver::default();
        let base = resolver.cost("claude-sonnet-4-20250514", 1200.0, 300.0).unwrap();
        let doubled = resolver.cost("claude-sonnet-4-20250514", 2400.0, 600.0).unwrap();
        assert!(approx(doubled, 2.0 * base));

        let input_only = resolver.cost("claude-sonnet-4-20250514", 1200.0, 0.0).unwrap();
        let output_only = resolver.cost("claude-sonnet-4-20250514", 0.0, 300.0).unwrap();
        assert!(approx(input_only + output_only, base));
    }

    #[test]
    fn test_injected_table() {
        let table = PricingTable::empty().with_model("local-model", ModelPricing::new(1.0, 2.0));
        let resolver = PricingResolver::new(table);

        assert!(approx(resolver.cost("local-model", 500.0, 250.0).unwrap(), 1.0));
        assert!(resolver.cost("gpt-4o", 500.0, 250.0).is_none());
    }

    #[test]
    fn test_extend_overrides_builtin() {
        let mut table = PricingTable::builtin();
        let before = table.len();
        table.extend(
            PricingTable::empty()
                .with_model("gpt-4o", ModelPricing::new(0.0, 0.0))
                .with_model("custom", ModelPricing::new(0.1, 0.2)),
        );

        assert_eq!(table.len(), before + 1);
        assert_eq!(table.get("gpt-4o"), Some(&ModelPricing::new(0.0, 0.0)));
    }

    #[test]
    fn test_validate_rejects_negative_rates() {
        let table = PricingTable::empty().with_model("bad", ModelPricing::new(-1.0, 0.0));
        assert!(matches!(
            table.validate(),
            Err(EvalboardError::InvalidConfig(_))
        ));
        assert!(PricingTable::builtin().validate().is_ok());
    }

    #[test]
    fn test_from_file_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("pricing.toml");
        std::fs::write(&toml_path, "[my-model]\ninput = 0.5\noutput = 1.5\n").unwrap();
        let table = PricingTable::from_file(&toml_path).unwrap();
        assert_eq!(table.get("my-model"), Some(&ModelPricing::new(0.5, 1.5)));

        let json_path = dir.path().join("pricing.json");
        std::fs::write(&json_path, r#"{"other": {"input": 0.1, "output": 0.2}}"#).unwrap();
        let table = PricingTable::from_file(&json_path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("other"), Some(&ModelPricing::new(0.1, 0.2)));
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(0.0075), "$0.0075");
        assert_eq!(format_cost(0.25), "$0.250");
        assert_eq!(format_cost(12.5), "$12.50");
    }
}
