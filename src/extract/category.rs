use crate::models::{Category, CategoryHint};

/// Title keywords in priority order. The first keyword found decides.
const CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    ("konser", Category::Music),
    ("tiyatro", Category::Theatre),
    ("stand-up", Category::StandUp),
    ("stand up", Category::StandUp),
    ("bale", Category::Arts),
    ("opera", Category::Arts),
    ("dans", Category::Arts),
    ("gösteri", Category::Arts),
    ("festival", Category::Festival),
    ("parti", Category::Party),
    ("dj", Category::Party),
    ("çocuk", Category::Family),
    ("aile", Category::Family),
    ("spor", Category::Sports),
    ("müzikal", Category::Theatre),
    ("workshop", Category::Education),
    ("seminer", Category::Education),
];

/// Settles a block's category from its hint and title.
pub fn resolve_category(hint: CategoryHint, title: &str) -> Category {
    match hint {
        CategoryHint::Fixed(category) => category,
        CategoryHint::Detect => detect_category(title),
    }
}

pub fn detect_category(title: &str) -> Category {
    let lowered = title.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Arts)
}
