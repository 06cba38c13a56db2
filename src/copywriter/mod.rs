pub mod prompts;
pub mod score;

use serde::{Deserialize, Serialize};

use crate::ai::{AiError, GenerationOptions, TextGenerator};

pub use prompts::build_prompt;
pub use score::score_content;

// ── Golden Ratio ──────────────────────────────────────

/// The golden ratio. Template proportions, default lengths and the
/// length heuristic all derive from this one value.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Default copy length in words: round(150 × φ).
pub const DEFAULT_TARGET_LENGTH: u32 = 243;

/// Optimal SEO length in words: round(300 × φ).
pub const OPTIMAL_SEO_LENGTH: u32 = 485;

// ── Types ─────────────────────────────────────────────

/// Kind of marketing copy being generated. Unknown slugs resolve to
/// `ProductDescription`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    ProductDescription,
    BlogPost,
    LandingPage,
    Email,
    SocialMedia,
    AdCopy,
    VideoScript,
}

impl ContentType {
    pub const ALL: [ContentType; 7] = [
        Self::ProductDescription,
        Self::BlogPost,
        Self::LandingPage,
        Self::Email,
        Self::SocialMedia,
        Self::AdCopy,
        Self::VideoScript,
    ];

    pub fn from_slug(s: &str) -> Self {
        match s.trim() {
            "blog-post" => Self::BlogPost,
            "landing-page" => Self::LandingPage,
            "email" => Self::Email,
            "social-media" => Self::SocialMedia,
            "ad-copy" => Self::AdCopy,
            "video-script" => Self::VideoScript,
            _ => Self::ProductDescription,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::ProductDescription => "product-description",
            Self::BlogPost => "blog-post",
            Self::LandingPage => "landing-page",
            Self::Email => "email",
            Self::SocialMedia => "social-media",
            Self::AdCopy => "ad-copy",
            Self::VideoScript => "video-script",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ProductDescription => "Product description",
            Self::BlogPost => "Blog post",
            Self::LandingPage => "Landing page",
            Self::Email => "Email",
            Self::SocialMedia => "Social media post",
            Self::AdCopy => "Ad copy",
            Self::VideoScript => "Video script",
        }
    }
}

impl From<String> for ContentType {
    fn from(s: String) -> Self {
        Self::from_slug(&s)
    }
}

impl From<ContentType> for String {
    fn from(ct: ContentType) -> Self {
        ct.slug().to_string()
    }
}

/// Parameters for one copy generation. Lives for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyRequest {
    pub content_type: ContentType,
    pub topic: String,
    #[serde(default)]
    pub key_points: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub voice: String,
    #[serde(default = "default_target_length")]
    pub target_length: u32,
}

fn default_target_length() -> u32 {
    DEFAULT_TARGET_LENGTH
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyResult {
    pub text: String,
    pub score: u8,
    pub tips: Vec<String>,
}

// ── Pipeline ──────────────────────────────────────────

/// Build the prompt, hand it to the generator, then score what came back
/// against `keyword`. An empty generation counts as a collaborator failure.
pub fn generate_copy(
    generator: &dyn TextGenerator,
    request: &CopyRequest,
    keyword: &str,
    options: &GenerationOptions,
) -> Result<CopyResult, AiError> {
    let prompt = build_prompt(request);
    log::debug!(
        "[copywriter] {} prompt built ({} chars)",
        request.content_type.slug(),
        prompt.len()
    );

    let text = generator.generate(&prompt, options)?;
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AiError("AI returned an empty response".into()));
    }

    let report = score_content(&text, keyword);
    log::debug!(
        "[copywriter] scored {} ({} tips)",
        report.score,
        report.tips.len()
    );

    Ok(CopyResult {
        text,
        score: report.score,
        tips: report.tips,
    })
}
