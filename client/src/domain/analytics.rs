use artconnect_common::crafts::Craft;

/// Dashboard totals over a set of crafts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngagementStats {
    pub craft_count: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_shares: u64,
    pub total_comments: u64,
    /// Most viewed craft, earliest wins a tie
    pub top_craft: Option<Craft>,
}

impl EngagementStats {
    pub fn from_crafts(crafts: &[Craft]) -> Self {
        let mut stats = Self {
            craft_count: crafts.len(),
            ..Self::default()
        };

        for craft in crafts {
            let engagement = &craft.engagement;
            stats.total_views += engagement.views;
            stats.total_likes += engagement.likes;
            stats.total_shares += engagement.shares;
            stats.total_comments += engagement.comments;
        }

        stats.top_craft = crafts
            .iter()
            .reduce(|top, craft| {
                if craft.engagement.views > top.engagement.views {
                    craft
                } else {
                    top
                }
            })
            .cloned();

        stats
    }
}

#[cfg(test)]
mod tests {
    use artconnect_common::crafts::Engagement;
    use artconnect_common::test_utils::sample_catalog;

    use super::*;

    #[test]
    fn empty_set_has_no_top_craft() {
        let stats = EngagementStats::from_crafts(&[]);
        assert_eq!(stats, EngagementStats::default());
    }

    #[test]
    fn totals_and_top_craft() {
        let catalog = sample_catalog();
        let stats = EngagementStats::from_crafts(&catalog);

        assert_eq!(stats.craft_count, 3);
        assert_eq!(stats.total_views, 1247 + 892 + 654);
        assert_eq!(stats.total_likes, 89 + 67 + 45);
        assert_eq!(stats.total_shares, 23 + 18 + 12);
        assert_eq!(stats.total_comments, 15 + 12 + 8);
        assert_eq!(
            stats.top_craft.map(|c| c.fields.title),
            Some("Handwoven Silk Saree".to_string())
        );
    }

    #[test]
    fn tie_keeps_earliest() {
        let mut catalog = sample_catalog();
        for craft in catalog.iter_mut() {
            craft.engagement = Engagement { views: 10, ..Engagement::default() };
        }
        let stats = EngagementStats::from_crafts(&catalog);
        assert_eq!(stats.top_craft.map(|c| c.id), Some(catalog[0].id));
    }
}
