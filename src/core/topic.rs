use crate::core::patterns::PatternRule;
use crate::domain::model::TopicTag;
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;

/// Hashtag markers used by the confession channel.
pub const DEFAULT_MARKERS: [(&str, TopicTag); 6] = [
    ("#studies✍🏼", TopicTag::Studies),
    ("#advice🗣️", TopicTag::Advice),
    ("#random✨", TopicTag::Random),
    ("#love❤️", TopicTag::Love),
    ("#campus🏛", TopicTag::Campus),
    ("#rant🤬", TopicTag::Rant),
];

/// Reduces a marker such as `#Studies✍🏼` to its lookup key `studies`.
pub fn normalize_marker(marker: &str) -> String {
    marker
        .trim()
        .trim_start_matches('#')
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Read-only marker table, fixed before a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMapping {
    markers: HashMap<String, TopicTag>,
}

impl Default for TopicMapping {
    fn default() -> Self {
        let markers = DEFAULT_MARKERS
            .iter()
            .map(|(marker, tag)| (normalize_marker(marker), *tag))
            .collect();
        Self { markers }
    }
}

impl TopicMapping {
    /// Default markers extended (or overridden) by configured aliases.
    pub fn with_aliases<'a, I>(aliases: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a TopicTag)>,
    {
        let mut mapping = Self::default();
        for (marker, tag) in aliases {
            let key = normalize_marker(marker);
            if key.is_empty() {
                return Err(EtlError::InvalidConfigValueError {
                    field: "topics".to_string(),
                    value: marker.clone(),
                    reason: "marker must contain a word after '#'".to_string(),
                });
            }
            mapping.markers.insert(key, *tag);
        }
        Ok(mapping)
    }

    pub fn get(&self, marker: &str) -> Option<TopicTag> {
        self.markers.get(&normalize_marker(marker)).copied()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TopicExtractor {
    mapping: TopicMapping,
    first_tag: PatternRule,
}

impl Default for TopicExtractor {
    fn default() -> Self {
        Self::new(TopicMapping::default())
    }
}

impl TopicExtractor {
    pub fn new(mapping: TopicMapping) -> Self {
        Self {
            mapping,
            first_tag: PatternRule::first_tag(),
        }
    }

    /// Word part of the leading hashtag, if the text starts with one.
    pub fn leading_tag<'t>(&self, raw_text: &'t str) -> Option<&'t str> {
        self.first_tag.capture(raw_text)
    }

    pub fn extract(&self, raw_text: &str) -> TopicTag {
        self.leading_tag(raw_text)
            .and_then(|tag| self.mapping.get(tag))
            .unwrap_or(TopicTag::Unknown)
    }
}
