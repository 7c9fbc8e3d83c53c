pub mod prompts;
pub mod studio;
pub mod templates;

pub use studio::{Studio, MAX_IDEAS_PER_PLATFORM};
pub use templates::{template_for, BusinessMode, GrowthMode, SystemInstruction, TemplateKey};
