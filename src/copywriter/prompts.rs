use std::borrow::Cow;

use super::{ContentType, CopyRequest, PHI};

/// Voice slug → phrase used verbatim in generated prompts.
pub const VOICE_DESCRIPTORS: [(&str, &str); 5] = [
    ("professional", "professional, authoritative and trustworthy"),
    ("friendly", "warm, friendly and conversational"),
    ("luxury", "elegant, exclusive and sophisticated"),
    ("playful", "playful, witty and energetic"),
    ("inspiring", "inspiring, motivational and uplifting"),
];

/// Resolve a voice slug to its descriptor. Unknown voices pass through as-is.
pub fn voice_description(voice: &str) -> Cow<'_, str> {
    let key = voice.trim();
    VOICE_DESCRIPTORS
        .iter()
        .find(|(slug, _)| *slug == key)
        .map(|(_, desc)| Cow::Borrowed(*desc))
        .unwrap_or(Cow::Borrowed(voice))
}

/// Golden split as display percentages: (1/φ, 1 − 1/φ) → ("61.8%", "38.2%").
fn golden_split() -> (String, String) {
    let major = 100.0 / PHI;
    (format!("{:.1}%", major), format!("{:.1}%", 100.0 - major))
}

/// System prompt sent alongside every copy generation.
pub fn copywriter_system() -> String {
    "You are an expert marketing copywriter. You write persuasive, SEO-friendly copy \
     and format it with simple HTML (h2, h3, p, ul/li, strong). \
     Return only the copy itself, without commentary or markdown fences."
        .to_string()
}

/// Build the generation prompt for a copy request.
pub fn build_prompt(req: &CopyRequest) -> String {
    let voice = voice_description(&req.voice);
    let (major, minor) = golden_split();
    let topic = &req.topic;
    let points = &req.key_points;
    let audience = &req.audience;
    let words = req.target_length;

    match req.content_type {
        ContentType::ProductDescription => format!(
            "Write a compelling product description for: {topic}\n\n\
             Key features and points:\n{points}\n\n\
             Target audience: {audience}\n\
             Tone of voice: {voice}\n\
             Length: approximately {words} words\n\n\
             Structure (golden ratio):\n\
             - {major} benefits: what the customer gains, emotionally and practically\n\
             - {minor} features: concrete specifications and details\n\
             End with a clear call to action."
        ),
        ContentType::BlogPost => format!(
            "Write an engaging, SEO-optimized blog post about: {topic}\n\n\
             Points to cover:\n{points}\n\n\
             Target audience: {audience}\n\
             Tone of voice: {voice}\n\
             Length: approximately {words} words\n\n\
             Structure (golden ratio):\n\
             - {minor} introduction: hook the reader and frame the problem\n\
             - {major} body: subheadings (h2) with practical, detailed sections\n\
             Close with a short conclusion and a call to action."
        ),
        ContentType::LandingPage => format!(
            "Write high-converting landing page copy for: {topic}\n\n\
             Key selling points:\n{points}\n\n\
             Target audience: {audience}\n\
             Tone of voice: {voice}\n\
             Length: approximately {words} words\n\n\
             Structure (golden ratio):\n\
             - {major} emotional: headline, pain points, desired outcome, testimonials\n\
             - {minor} logical: features, pricing rationale, guarantees\n\
             Include a headline, subheadline and at least two call-to-action buttons."
        ),
        ContentType::Email => format!(
            "Write a marketing email about: {topic}\n\n\
             Key points:\n{points}\n\n\
             Target audience: {audience}\n\
             Tone of voice: {voice}\n\
             Length: approximately {words} words\n\n\
             Structure (golden ratio):\n\
             - {major} value: why this matters to the reader right now\n\
             - {minor} call to action: one clear next step\n\
             Start with a subject line and a preview line."
        ),
        ContentType::SocialMedia => format!(
            "Write a social media post about: {topic}\n\n\
             Key points:\n{points}\n\n\
             Target audience: {audience}\n\
             Tone of voice: {voice}\n\
             Length: approximately {words} words\n\n\
             Structure (golden ratio):\n\
             - {major} hook and story: stop the scroll, then tell it\n\
             - {minor} call to action and 3-5 relevant hashtags"
        ),
        ContentType::AdCopy => format!(
            "Write advertising copy for: {topic}\n\n\
             Key selling points:\n{points}\n\n\
             Target audience: {audience}\n\
             Tone of voice: {voice}\n\
             Length: approximately {words} words\n\n\
             Structure (golden ratio):\n\
             - {major} benefit-led headline and promise\n\
             - {minor} proof: numbers, social proof, guarantee\n\
             Provide three headline variants and end with a call to action."
        ),
        ContentType::VideoScript => format!(
            "Write a video script about: {topic}\n\n\
             Key points:\n{points}\n\n\
             Target audience: {audience}\n\
             Tone of voice: {voice}\n\
             Length: approximately {words} spoken words\n\n\
             Structure (golden ratio):\n\
             - {minor} setup: hook in the first five seconds, introduce the problem\n\
             - {major} payoff: solution, demonstration, call to action\n\
             Mark scenes and include on-screen text suggestions."
        ),
    }
}

/// System prompt for brand voice analysis
pub fn brand_voice_system() -> String {
    "You are a brand strategist. You analyze writing samples and describe their voice \
     precisely enough that another writer could imitate it."
        .to_string()
}

/// Analyze a writing sample and describe its brand voice
pub fn analyze_brand_voice(sample: &str) -> String {
    format!(
        "Analyze the brand voice of the following text:\n\n{}\n\n\
         Describe in 3-5 sentences: tone, vocabulary, sentence length and rhythm, \
         formality, and any recurring stylistic devices. \
         Write the description so it can be used directly as a tone-of-voice instruction.",
        sample
    )
}
