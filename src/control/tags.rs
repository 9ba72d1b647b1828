//! conditional tags: named page predicates authors can target
//!
//! each tag is a predicate over [`PageFlags`].
//! attribute keys are accepted with or without the `is_` prefix, so both
//! `is_front_page` and `front_page` name the same tag.

use std::fmt;

use strsim::levenshtein;

/// page classification supplied by the host for the current request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageFlags {
    /// blog posts index
    pub home: bool,
    pub front_page: bool,
    /// single post of any non-page type
    pub single: bool,
    pub page: bool,
    pub attachment: bool,
    pub category: bool,
    pub tag: bool,
    /// custom taxonomy archive
    pub tax: bool,
    pub author: bool,
    pub date: bool,
    pub post_type_archive: bool,
    pub search: bool,
    pub not_found: bool,
    /// page 2 or later of a paginated listing
    pub paged: bool,
    pub feed: bool,
    pub privacy_policy: bool,
}

/// a conditional tag an author can flag in `hideConditionalTags`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionalTag {
    Home,
    FrontPage,
    Single,
    Page,
    Singular,
    Attachment,
    Archive,
    Category,
    Tag,
    Tax,
    Author,
    Date,
    PostTypeArchive,
    Search,
    NotFound,
    Paged,
    Feed,
    PrivacyPolicy,
}

/// every tag, in attribute-schema order
const ALL_TAGS: [ConditionalTag; 18] = [
    ConditionalTag::Home,
    ConditionalTag::FrontPage,
    ConditionalTag::Single,
    ConditionalTag::Page,
    ConditionalTag::Singular,
    ConditionalTag::Attachment,
    ConditionalTag::Archive,
    ConditionalTag::Category,
    ConditionalTag::Tag,
    ConditionalTag::Tax,
    ConditionalTag::Author,
    ConditionalTag::Date,
    ConditionalTag::PostTypeArchive,
    ConditionalTag::Search,
    ConditionalTag::NotFound,
    ConditionalTag::Paged,
    ConditionalTag::Feed,
    ConditionalTag::PrivacyPolicy,
];

impl ConditionalTag {
    /// resolve an attribute key like `is_search` or `search`
    pub fn from_key(key: &str) -> Option<Self> {
        let name = normalize_key(key);
        Self::all().find(|tag| tag.name() == name)
    }

    /// the attribute name without the `is_` prefix
    pub fn name(&self) -> &'static str {
        match self {
            ConditionalTag::Home => "home",
            ConditionalTag::FrontPage => "front_page",
            ConditionalTag::Single => "single",
            ConditionalTag::Page => "page",
            ConditionalTag::Singular => "singular",
            ConditionalTag::Attachment => "attachment",
            ConditionalTag::Archive => "archive",
            ConditionalTag::Category => "category",
            ConditionalTag::Tag => "tag",
            ConditionalTag::Tax => "tax",
            ConditionalTag::Author => "author",
            ConditionalTag::Date => "date",
            ConditionalTag::PostTypeArchive => "post_type_archive",
            ConditionalTag::Search => "search",
            ConditionalTag::NotFound => "404",
            ConditionalTag::Paged => "paged",
            ConditionalTag::Feed => "feed",
            ConditionalTag::PrivacyPolicy => "privacy_policy",
        }
    }

    /// check whether the tag holds for the given page
    pub fn holds(&self, page: &PageFlags) -> bool {
        match self {
            ConditionalTag::Home => page.home,
            ConditionalTag::FrontPage => page.front_page,
            ConditionalTag::Single => page.single,
            ConditionalTag::Page => page.page,
            ConditionalTag::Singular => page.single || page.page || page.attachment,
            ConditionalTag::Attachment => page.attachment,
            ConditionalTag::Archive => {
                page.category
                    || page.tag
                    || page.tax
                    || page.author
                    || page.date
                    || page.post_type_archive
            }
            ConditionalTag::Category => page.category,
            ConditionalTag::Tag => page.tag,
            ConditionalTag::Tax => page.tax,
            ConditionalTag::Author => page.author,
            ConditionalTag::Date => page.date,
            ConditionalTag::PostTypeArchive => page.post_type_archive,
            ConditionalTag::Search => page.search,
            ConditionalTag::NotFound => page.not_found,
            ConditionalTag::Paged => page.paged,
            ConditionalTag::Feed => page.feed,
            ConditionalTag::PrivacyPolicy => page.privacy_policy,
        }
    }

    /// every known tag
    pub fn all() -> impl Iterator<Item = ConditionalTag> {
        ALL_TAGS.into_iter()
    }

    /// closest known tag name for an unrecognized key
    pub fn suggest(key: &str) -> Option<&'static str> {
        let name = normalize_key(key);
        Self::all()
            .map(|tag| (tag.name(), levenshtein(&name, tag.name())))
            .filter(|(_, distance)| *distance <= 2)
            .min_by_key(|(_, distance)| *distance)
            .map(|(n, _)| n)
    }
}

impl fmt::Display for ConditionalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "is_{}", self.name())
    }
}

fn normalize_key(key: &str) -> String {
    let lower = key.trim().to_lowercase();
    match lower.strip_prefix("is_") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}
