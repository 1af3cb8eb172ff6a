//! Default values and fixed enumerations
//!
//! All fallback literals used by the normalization and create paths live
//! here; nothing else in the codebase repeats them inline.

/// Author defaults applied when a payload omits author fields
pub const DEFAULT_AUTHOR_NAME: &str = "Admin User";
pub const DEFAULT_AUTHOR_EMAIL: &str = "admin@presswork.dev";
pub const DEFAULT_AUTHOR_IMAGE: &str =
    "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&dpr=1";

/// Placeholder used when a post has neither an uploaded image nor an image URL
pub const DEFAULT_POST_IMAGE: &str = "https://via.placeholder.com/800x400?text=Blog+Image";

/// Fixed set of blog categories
pub const CATEGORIES: &[&str] = &[
    "Technology",
    "Design",
    "Mobile Development",
    "Web Development",
    "AI/ML",
    "Cybersecurity",
    "Business",
    "Tutorial",
];

/// Accepted budget buckets on contact submissions
pub const BUDGET_BUCKETS: &[&str] = &["under-10k", "10k-25k", "25k-50k", "50k-100k", "over-100k"];

/// Accepted timeline buckets on contact submissions
pub const TIMELINE_BUCKETS: &[&str] =
    &["asap", "1-3-months", "3-6-months", "6-12-months", "flexible"];

/// Field length caps enforced on blog posts and comments
pub const MAX_TITLE_LEN: usize = 500;
pub const MAX_EXCERPT_LEN: usize = 1000;
pub const MAX_CONTENT_LEN: usize = 10_000_000;
pub const MAX_COMMENT_LEN: usize = 5000;

/// Upload size caps in bytes
pub const MAX_BLOG_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_AVATAR_BYTES: usize = 3 * 1024 * 1024;
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}
