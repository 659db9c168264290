use artconnect_common::crafts::Craft;
use itertools::Itertools;

/// Search box plus the category and region dropdowns of the explore page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CraftFilter {
    pub query: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
}

impl CraftFilter {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Query is a case-insensitive substring match over title, description,
    /// artisan, region and tags; category and region must match exactly.
    pub fn matches(&self, craft: &Craft) -> bool {
        let fields = &craft.fields;

        let matches_query = match non_empty(&self.query) {
            None => true,
            Some(query) => {
                let needle = query.to_lowercase();
                [
                    &fields.title,
                    &fields.description,
                    &fields.artisan_name,
                    &fields.region,
                ]
                .into_iter()
                .chain(fields.tags.iter())
                .any(|haystack| haystack.to_lowercase().contains(&needle))
            }
        };

        let matches_category =
            non_empty(&self.category).is_none_or(|category| fields.category == category);
        let matches_region = non_empty(&self.region).is_none_or(|region| fields.region == region);

        matches_query && matches_category && matches_region
    }

    /// Matching crafts in input order
    pub fn apply<'a>(&self, crafts: &'a [Craft]) -> Vec<&'a Craft> {
        crafts.iter().filter(|craft| self.matches(craft)).collect()
    }
}

// empty dropdown / search box means "no constraint", whitespace is searched literally
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Distinct values offered in the dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub categories: Vec<String>,
    pub regions: Vec<String>,
}

pub fn facets(crafts: &[Craft]) -> Facets {
    Facets {
        categories: crafts
            .iter()
            .map(|c| c.fields.category.clone())
            .sorted()
            .dedup()
            .collect(),
        regions: crafts
            .iter()
            .map(|c| c.fields.region.clone())
            .sorted()
            .dedup()
            .collect(),
    }
}
