pub mod brand_voice;
pub mod note;
pub mod option;
pub mod user;
