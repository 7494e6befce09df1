pub mod normalize;
pub mod similarity;

pub use normalize::{combined_text, normalize_text};
pub use similarity::{similarity, text_similarity, PreparedText};
