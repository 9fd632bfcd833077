//! Cross-references between variants and the colors they were offered in.
//!
//! Lure codes combine the hundreds of a variant's model number with a color's
//! numeric company code: model `700` in color `12` is lure `712`.

use serde::Serialize;

use crate::colors::ColorIndex;
use crate::model::{ModelNumber, Variant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "value", rename_all = "lowercase")]
pub enum LegacyCode {
    /// Recorded on the variant for this particular color.
    Variant(String),
    /// The color's own pre-cutover ids, used when the variant has none.
    Color(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedColor {
    pub color_id: String,
    pub name: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_code: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_code: Option<LegacyCode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariantColors {
    pub standard: Vec<ResolvedColor>,
    pub rare: Vec<ResolvedColor>,
}

#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
    colors: &'a ColorIndex,
}

impl<'a> ColorResolver<'a> {
    pub fn new(colors: &'a ColorIndex) -> Self {
        Self { colors }
    }

    /// Never fails: an unknown color id resolves to itself as the name.
    pub fn resolve(&self, variant: &Variant, color_id: &str) -> ResolvedColor {
        let color = self.colors.get_by_id(color_id);

        let legacy_code = match variant.legacy_code_for(color_id) {
            Some(code) => Some(LegacyCode::Variant(code.to_string())),
            None => color
                .filter(|c| !c.pre1925_id.is_empty())
                .map(|c| LegacyCode::Color(c.pre1925_id.clone())),
        };

        let derived_code = color
            .and_then(|c| c.company_id.as_deref())
            .and_then(|code| derived_lure_code(&variant.number, code));

        ResolvedColor {
            color_id: color_id.to_string(),
            name: color
                .map(|c| c.name.clone())
                .unwrap_or_else(|| color_id.to_string()),
            found: color.is_some(),
            derived_code,
            legacy_code,
        }
    }

    pub fn resolve_variant_colors(&self, variant: &Variant) -> VariantColors {
        VariantColors {
            standard: variant
                .colors
                .iter()
                .map(|id| self.resolve(variant, id))
                .collect(),
            rare: variant
                .rare_colors
                .iter()
                .map(|id| self.resolve(variant, id))
                .collect(),
        }
    }
}

/// `floor(number / 100) * 100 + company_id`, when both sides are plain
/// non-negative integers.
pub fn derived_lure_code(number: &ModelNumber, company_id: &str) -> Option<u64> {
    let base = number.as_integer()? / 100 * 100;
    let code = crate::model::parse_digits(company_id)?;
    base.checked_add(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;
    use crate::variants::VariantIndex;
    use anyhow::Result;

    const FIXTURE: &str = include_str!("../tests/fixtures/catalog.json");

    fn fixture() -> Result<(ColorIndex, VariantIndex)> {
        let catalog = parse_catalog(FIXTURE)?;
        Ok((ColorIndex::rebuild(&catalog), VariantIndex::rebuild(&catalog)))
    }

    #[test]
    fn derived_code_uses_hundreds_of_model_number() {
        assert_eq!(derived_lure_code(&ModelNumber::from(700), "12"), Some(712));
        assert_eq!(derived_lure_code(&ModelNumber::from(2345), "00"), Some(2300));
        assert_eq!(derived_lure_code(&ModelNumber::from("700"), "01"), Some(701));
        assert_eq!(derived_lure_code(&ModelNumber::from(700), "Y12"), None);
        assert_eq!(derived_lure_code(&ModelNumber::from(700), ""), None);
        assert_eq!(derived_lure_code(&ModelNumber::from("Wiggle Fish"), "12"), None);
    }

    #[test]
    fn resolve_prefers_variant_legacy_code() -> Result<()> {
        let (colors, variants) = fixture()?;
        let pikie = variants.get_by_number("700")[0];
        let resolver = ColorResolver::new(&colors);

        let perch = resolver.resolve(pikie, "ccbc-00");
        assert_eq!(perch.name, "Perch Scale");
        assert_eq!(perch.derived_code, Some(700));
        assert_eq!(perch.legacy_code, Some(LegacyCode::Variant("2700".to_string())));

        let frog = resolver.resolve(pikie, "ccbc-12");
        assert_eq!(frog.derived_code, Some(712));
        assert_eq!(
            frog.legacy_code,
            Some(LegacyCode::Color(vec!["F".to_string(), "18".to_string()]))
        );

        let red_side = resolver.resolve(pikie, "ccbc-01");
        assert_eq!(red_side.legacy_code, None);
        Ok(())
    }

    #[test]
    fn resolve_degrades_to_raw_id_for_unknown_colors() -> Result<()> {
        let (colors, variants) = fixture()?;
        let pikie = variants.get_by_number("700")[0];
        let missing = ColorResolver::new(&colors).resolve(pikie, "ccbc-99");
        assert_eq!(missing.name, "ccbc-99");
        assert!(!missing.found);
        assert_eq!(missing.derived_code, None);
        assert_eq!(missing.legacy_code, None);
        Ok(())
    }

    #[test]
    fn resolve_variant_colors_splits_standard_and_rare() -> Result<()> {
        let (colors, variants) = fixture()?;
        let pikie = variants.get_by_number("700")[0];
        let resolved = ColorResolver::new(&colors).resolve_variant_colors(pikie);

        let standard: Vec<Option<u64>> = resolved.standard.iter().map(|c| c.derived_code).collect();
        assert_eq!(standard, vec![Some(700), Some(701), Some(712)]);

        let rare: Vec<&str> = resolved.rare.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(rare, vec!["Yellow Spotted", "ccbc-99"]);
        assert_eq!(resolved.rare[0].derived_code, None);
        Ok(())
    }

    #[test]
    fn non_numeric_model_number_has_no_derived_code() -> Result<()> {
        let (colors, variants) = fixture()?;
        let wiggle = variants.search("wiggle fish")[0];
        let frog = ColorResolver::new(&colors).resolve(wiggle, "ccbc-12");
        assert_eq!(frog.name, "Frog");
        assert_eq!(frog.derived_code, None);
        Ok(())
    }

    #[test]
    fn legacy_code_serializes_with_scope() -> Result<()> {
        let json = serde_json::to_value(LegacyCode::Variant("2700".to_string()))?;
        assert_eq!(json, serde_json::json!({"scope": "variant", "value": "2700"}));
        Ok(())
    }
}
