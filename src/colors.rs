//! Color index: every producer's colors in one searchable list.
//!
//! Colors are keyed by their global `id` and by the producer-local `companyId`,
//! which several producers may share.

use std::borrow::Cow;

use crate::catalog::Catalog;
use crate::index::{SearchIndex, Searchable};
use crate::model::Color;

pub type ColorIndex = SearchIndex<Color>;

impl Searchable for Color {
    fn primary_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn local_code(&self) -> Option<&str> {
        self.company_id.as_deref()
    }

    fn matchable_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = Vec::with_capacity(4 + self.pre1925_id.len());
        fields.push(Cow::Borrowed(self.id.as_str()));
        fields.push(Cow::Borrowed(self.name.as_str()));
        if let Some(code) = self.company_id.as_deref() {
            fields.push(Cow::Borrowed(code));
        }
        fields.extend(self.pre1925_id.iter().map(|id| Cow::Borrowed(id.as_str())));
        fields.push(Cow::Borrowed(self.producer_name.as_str()));
        fields
    }
}

impl SearchIndex<Color> {
    /// Flattens every producer's colors into one index, in document order.
    pub fn rebuild(catalog: &Catalog) -> Self {
        Self::new(flatten_colors(catalog)).with_hints(catalog.hints.clone())
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Color> {
        self.get_by_key(id)
    }

    /// Colors from any producer carrying this company code.
    pub fn get_by_company_id(&self, company_id: &str) -> Vec<&Color> {
        self.get_by_local_code(company_id)
    }
}

pub fn flatten_colors(catalog: &Catalog) -> Vec<Color> {
    let mut out = Vec::new();
    for producer in catalog.producers() {
        let Some(colors) = producer.colors.as_ref() else {
            continue;
        };
        out.extend(colors.iter().map(|c| Color {
            producer_id: producer.id.clone(),
            producer_name: producer.display_name().to_string(),
            ..c.clone()
        }));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;
    use anyhow::Result;

    const FIXTURE: &str = include_str!("../tests/fixtures/catalog.json");

    fn ids(colors: &[&Color]) -> Vec<String> {
        colors.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn rebuild_stamps_producer_and_skips_producers_without_colors() -> Result<()> {
        let index = ColorIndex::rebuild(&parse_catalog(FIXTURE)?);
        assert_eq!(index.len(), 9);

        let rainbow = index.get_by_id("heddon-12").expect("heddon-12 indexed");
        assert_eq!(rainbow.producer_id, "heddon");
        assert_eq!(rainbow.producer_name, "James Heddon's Sons");
        assert!(index.records().iter().all(|c| c.producer_id != "pflueger"));
        Ok(())
    }

    #[test]
    fn mutating_a_copy_leaves_the_catalog_alone() -> Result<()> {
        let catalog = parse_catalog(FIXTURE)?;
        let index = ColorIndex::rebuild(&catalog);
        let mut all = index.get_all();
        all[0].name = "Changed".to_string();

        assert_eq!(index.records()[0].name, "Perch Scale");
        let source = catalog.producers["ccbc"].colors.as_ref().unwrap();
        assert_eq!(source[0].name, "Perch Scale");
        assert!(source[0].producer_id.is_empty());
        Ok(())
    }

    #[test]
    fn exact_id_beats_substring_hits_in_any_case() -> Result<()> {
        let index = ColorIndex::rebuild(&parse_catalog(FIXTURE)?);
        assert_eq!(ids(&index.search("ccbc-00")), vec!["ccbc-00"]);
        assert_eq!(ids(&index.search("CCBC-00")), vec!["ccbc-00"]);
        Ok(())
    }

    #[test]
    fn company_code_spans_producers() -> Result<()> {
        let index = ColorIndex::rebuild(&parse_catalog(FIXTURE)?);
        assert_eq!(ids(&index.search("12")), vec!["ccbc-12", "heddon-12"]);
        assert_eq!(
            ids(&index.get_by_company_id("12")),
            vec!["ccbc-12", "heddon-12"]
        );
        assert!(index.get_by_company_id("42").is_empty());
        Ok(())
    }

    #[test]
    fn name_search_ranks_prefix_matches_first() -> Result<()> {
        let index = ColorIndex::rebuild(&parse_catalog(FIXTURE)?);
        let names: Vec<String> = index
            .search("frog")
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["Frog", "Frog Spot", "Green Frog"]);
        Ok(())
    }

    #[test]
    fn legacy_ids_and_producer_names_are_searchable() -> Result<()> {
        let index = ColorIndex::rebuild(&parse_catalog(FIXTURE)?);
        assert_eq!(ids(&index.search("18")), vec!["ccbc-12"]);
        assert_eq!(
            ids(&index.search("heddon's")),
            vec!["heddon-12", "heddon-2"]
        );
        Ok(())
    }
}
