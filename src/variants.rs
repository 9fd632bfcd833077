//! Variant index: lure models keyed by model number.
//!
//! Numbers compare by string form, so `700` and `"700"` find the same models.

use std::borrow::Cow;

use crate::catalog::Catalog;
use crate::index::{SearchIndex, Searchable};
use crate::model::Variant;

pub type VariantIndex = SearchIndex<Variant>;

impl Searchable for Variant {
    fn primary_key(&self) -> Cow<'_, str> {
        Cow::Owned(self.number.to_string())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn matchable_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            self.primary_key(),
            Cow::Borrowed(self.producer_name.as_str()),
        ]
    }
}

impl SearchIndex<Variant> {
    /// Flattens every producer's variants into one index, in document order.
    pub fn rebuild(catalog: &Catalog) -> Self {
        Self::new(flatten_variants(catalog))
    }

    /// Variants from any producer whose number reads the same as `number`.
    pub fn get_by_number(&self, number: &str) -> Vec<&Variant> {
        let number = number.trim();
        self.records()
            .iter()
            .filter(|v| v.number.to_string() == number)
            .collect()
    }
}

pub fn flatten_variants(catalog: &Catalog) -> Vec<Variant> {
    let mut out = Vec::new();
    for producer in catalog.producers() {
        let Some(variants) = producer.variants.as_ref() else {
            continue;
        };
        out.extend(variants.iter().map(|v| Variant {
            producer_id: producer.id.clone(),
            producer_name: producer.display_name().to_string(),
            ..v.clone()
        }));
    }
    out
}
