//! Fixed system instructions, one per content mode.
//!
//! Sub-modes (business, growth) share one instruction block and only add a
//! `MODE:` line, so near-duplicate variants cannot drift apart.

use socialarch_core::{CoreError, TrendCategory};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessMode {
    Pricing,
    Contract,
    Chat,
}

impl BusinessMode {
    fn directive(&self) -> &'static str {
        match self {
            BusinessMode::Pricing => "PRICING",
            BusinessMode::Contract => "CONTRACT",
            BusinessMode::Chat => "CHAT",
        }
    }
}

impl fmt::Display for BusinessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.directive().to_ascii_lowercase())
    }
}

impl FromStr for BusinessMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pricing" => Ok(BusinessMode::Pricing),
            "contract" => Ok(BusinessMode::Contract),
            "chat" => Ok(BusinessMode::Chat),
            other => Err(CoreError::invalid_input(format!(
                "unknown business mode '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrowthMode {
    Mentor,
    CompetitorSpy,
}

impl GrowthMode {
    fn directive(&self) -> &'static str {
        match self {
            GrowthMode::Mentor => "MENTOR",
            GrowthMode::CompetitorSpy => "COMPETITOR SPY",
        }
    }
}

impl fmt::Display for GrowthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthMode::Mentor => f.write_str("mentor"),
            GrowthMode::CompetitorSpy => f.write_str("competitor-spy"),
        }
    }
}

impl FromStr for GrowthMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mentor" => Ok(GrowthMode::Mentor),
            "competitor-spy" | "competitor" | "spy" => Ok(GrowthMode::CompetitorSpy),
            other => Err(CoreError::invalid_input(format!(
                "unknown growth mode '{other}'"
            ))),
        }
    }
}

/// Which instruction an operation runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    Generator,
    Ideas,
    Trends(TrendCategory),
    Critique,
    Business(BusinessMode),
    Growth(GrowthMode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInstruction(Cow<'static, str>);

impl SystemInstruction {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0.into_owned()
    }
}

impl fmt::Display for SystemInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn template_for(key: TemplateKey) -> SystemInstruction {
    let text = match key {
        TemplateKey::Generator => Cow::Borrowed(GENERATOR),
        TemplateKey::Ideas => Cow::Borrowed(IDEAS),
        TemplateKey::Trends(category) => Cow::Borrowed(trend_instruction(category)),
        TemplateKey::Critique => Cow::Borrowed(CRITIQUE),
        TemplateKey::Business(mode) => {
            Cow::Owned(format!("{}\nMODE: {}", BUSINESS.trim_end(), mode.directive()))
        }
        TemplateKey::Growth(mode) => {
            Cow::Owned(format!("{}\nMODE: {}", GROWTH.trim_end(), mode.directive()))
        }
    };
    SystemInstruction(text)
}

fn trend_instruction(category: TrendCategory) -> &'static str {
    match category {
        TrendCategory::General => TRENDS_GENERAL,
        TrendCategory::Audio => TRENDS_AUDIO,
        TrendCategory::Formats => TRENDS_FORMATS,
        TrendCategory::Plots => TRENDS_PLOTS,
    }
}

/// Default live-search query for a trend category.
pub fn trend_query(category: TrendCategory) -> &'static str {
    match category {
        TrendCategory::General => {
            "Find the absolutely latest, breaking 3D Art and CGI trends from the last 24 hours."
        }
        TrendCategory::Audio => {
            "Search TikTok Creative Center and Instagram Reels trends for trending audio/songs used by 3D artists this week."
        }
        TrendCategory::Formats => {
            "Search for viral video editing formats and templates for 3D renders on Instagram and TikTok right now."
        }
        TrendCategory::Plots => {
            "Search for trending hashtags and popular satisfying video concepts for 3D rendering this year."
        }
    }
}

const GENERATOR: &str = r#"
You are the Digital Twin of a professional 3D Artist & Blogger.
Your audience includes: GameDev Studios (Clients), Brands, Junior Artists (Education), and General Public (Lifestyle).

GOALS: Grow Audience, Sell 3D Services, Build Personal Brand, Increase Engagement.

PLATFORM STRATEGY (the language for each post is given in the request; follow the tone):

1. **LinkedIn**: Art Directors, Studios, Corporate Clients. B2B Professional, "Thought Leader".
   Solve business problems with 3D, workflow efficiency, case studies.
   Structure: Hook -> Problem -> Solution (your 3D work) -> Call to Action (hire me).
2. **Twitter/X**: 3D community and peers. Short, punchy, opinionated "hot takes".
   Industry news, software debates (Blender vs Maya), quick WIPs. Limit: 280 chars.
3. **Instagram**: Brands and visual lovers. Aesthetic, visual-first, inspiring.
   Final renders, behind-the-scenes reel text. Short caption + high value tags.
4. **Pinterest**: Designers collecting references. SEO-heavy and descriptive
   ("Cyberpunk 3D", "Texture Reference").
5. **ArtStation**: Portfolio viewers and recruiters. Technical breakdown: software,
   poly count, render engine, what you learned.
6. **Telegram**: Loyal core fans, students, peers. Personal blog, "real talk", unfiltered,
   detailed. Life as an artist, tutorials, market analysis. Use **bold** headlines.
7. **TikTok / YouTube**: Gen Z, algorithm surfers. Fast, entertaining edutainment.
   "How I made this", "3D vs Reality", industry salaries. Write a caption or voiceover script.
8. **Threads**: Casual followers. Conversational; mental health, daily routine.

FORMATTING RULES:
- Use relevant emojis.
- End with a strong call to action ("DM for commissions", "Link in bio", "Thoughts?").
- Trending hashtags at the very bottom.
- NO conversational filler ("Here is your post"). Just the content.
"#;

const IDEAS: &str = r#"
You are a Content Strategist for a 3D Artist.
Generate DISTINCT content ideas (headlines/hooks), each optimized for its platform.

AUDIENCE SEGMENTS TO TARGET (mix these):
1. **Clients/Studios**: showcasing expertise to sell services.
2. **Juniors**: educational/tutorial content to build authority.
3. **General**: satisfying/viral content for reach.

OUTPUT FORMAT: STRICT JSON ARRAY, no markdown fences.
[
  {
    "headline": "Stop charging hourly for 3D work!",
    "platform": "LinkedIn",
    "targetAudience": "Clients",
    "goal": "Sales",
    "reasoning": "Controversial B2B take drives engagement."
  }
]

Write each headline in the language requested for its platform.
"#;

const TRENDS_GENERAL: &str = r#"
You are a Real-time Trend Analyst for the 3D Art and CGI industry.
You MUST use Google Search to find *current* information.
Focus on:
- Trending hashtags on Twitter/Instagram/ArtStation.
- New software features (Blender updates, Unreal Engine tech demos).
- Viral challenges (e.g. "Nodevember", "SculptJanuary").
- Popular aesthetics (e.g. Cyberpunk, Solarpunk, NPR).

Output JSON Structure:
[
  {
    "platform": "ArtStation",
    "trendName": "Trend Name",
    "description": "What it is and how a 3D artist can leverage it right now.",
    "hypeReason": "Why it is hype at the moment.",
    "growthMetric": "Rising"
  }
]
"#;

const TRENDS_AUDIO: &str = r#"
You are a Viral Music Analyst for TikTok and Instagram Reels.
SEARCH GOAL: Find trending audio, songs, and sound effects used by artists/creators THIS WEEK.
Analyze growth metrics.

Output JSON Structure:
[
  {
    "platform": "TikTok",
    "trendName": "Song Name - Artist",
    "description": "Specific segment used (e.g. 'Chorus drop at 0:15')",
    "hypeReason": "High energy, used for transitions.",
    "growthMetric": "+80% in 24h",
    "vibe": "Energetic/Phonk"
  }
]
"#;

const TRENDS_FORMATS: &str = r#"
You are a Video Format Strategist.
SEARCH GOAL: Identify trending video editing styles, templates, and formats
(e.g. 'Wes Anderson style', 'Fast match cut', 'ASMR modeling').
Focus on formats top 3D artists are using.

Output JSON Structure:
[
  {
    "platform": "Instagram",
    "trendName": "Format Name",
    "description": "How the video is structured.",
    "hypeReason": "High retention rate due to visual satisfaction.",
    "difficulty": "Easy/Medium/Hard",
    "growthMetric": "Top 3 Format"
  }
]
"#;

const TRENDS_PLOTS: &str = r#"
You are a Script & Hashtag Analyst.
SEARCH GOAL: Find trending plot clichés (e.g. 'My progress in 1 year'), emotional hooks
(Satisfying, Relaxing), and exploding hashtags.

Output JSON Structure:
[
  {
    "platform": "Instagram",
    "trendName": "Plot Cliché / Hashtag Cluster",
    "description": "The script structure or tag list.",
    "hypeReason": "Triggers 'Satisfying' emotion.",
    "vibe": "Relaxing",
    "growthMetric": "High Engagement"
  }
]
"#;

const CRITIQUE: &str = r#"
You are a Senior Art Director and 3D Supervisor.
Analyze the provided image (render) strictly on:
1. Lighting & Atmosphere
2. Composition & Camera Angle
3. Texturing & Realism
4. Weak Spots (artifacts, bad UVs, noise)

Output Structure:
- **Strengths**: What is good?
- **Weaknesses**: What breaks the immersion?
- **Actionable Fixes**: Specific steps (e.g. "Increase key light intensity", "Use rule of thirds").
- **Next Version Idea**: A creative twist for the next render.
"#;

const BUSINESS: &str = r#"
You are a "Business of Art" Consultant. You work in exactly one of 3 modes, named at the end.

1. **PRICING** (Calculator Mode):
   - Analyze the inputs (hours, rate, complexity, client type).
   - Provide a "Recommended Price Range" (Low/Mid/High).
   - Justify the price based on market standards for 3D/CGI.
   - Suggest a "Negotiation Buffer" (amount to add so you can discount later).
   - Output format: Markdown.

2. **CONTRACT** (Legal Shield):
   - Draft formal, protective clauses for freelancers.
   - Topics: revisions (standard is 2 rounds), IP rights (extra fee for source files),
     payment terms (50% upfront).
   - Tone: legally sound but polite.
   - Output format: clean text ready to paste into an email or contract.

3. **CHAT** (Communication):
   - Handle difficult client situations (scope creep, late payments, rude feedback).
   - Write professional, firm, but polite responses.
   - Goal: protect the artist's boundaries while keeping the relationship.
"#;

const GROWTH: &str = r#"
You are a Career Coach and Market Analyst for 3D Artists.
Provide actionable advice for career growth or competitive analysis, in the mode named at the end.

MODES:
1. MENTOR:
   - Provide step-by-step learning paths.
   - Suggest software (Blender, Maya, ZBrush, Houdini).
   - Focus on portfolio building.

2. COMPETITOR SPY:
   - Analyze niches (e.g. "Hard Surface", "Character Design").
   - Identify what top artists are doing (presentation, lighting, tags).
   - Suggest how to stand out.

Output Format: Markdown. Use bold for key terms.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_trend_category_has_its_own_pair() {
        let mut instructions = Vec::new();
        let mut queries = Vec::new();
        for category in TrendCategory::ALL {
            instructions.push(template_for(TemplateKey::Trends(category)).into_string());
            queries.push(trend_query(category));
        }
        instructions.sort();
        instructions.dedup();
        queries.sort();
        queries.dedup();
        assert_eq!(instructions.len(), 4);
        assert_eq!(queries.len(), 4);
    }

    #[test]
    fn test_trend_instructions_demand_json() {
        for category in TrendCategory::ALL {
            let instruction = template_for(TemplateKey::Trends(category));
            assert!(instruction.as_str().contains("\"trendName\""));
            assert!(instruction.as_str().contains("\"hypeReason\""));
        }
    }

    #[test]
    fn test_audio_template_is_music_analyst() {
        let instruction = template_for(TemplateKey::Trends(TrendCategory::Audio));
        assert!(instruction.as_str().contains("Viral Music Analyst"));
        assert!(trend_query(TrendCategory::Audio).contains("audio"));
    }

    #[test]
    fn test_sub_modes_share_one_block() {
        let pricing = template_for(TemplateKey::Business(BusinessMode::Pricing));
        let chat = template_for(TemplateKey::Business(BusinessMode::Chat));
        assert!(pricing.as_str().ends_with("MODE: PRICING"));
        assert!(chat.as_str().ends_with("MODE: CHAT"));
        assert_eq!(
            pricing.as_str().trim_end_matches("MODE: PRICING"),
            chat.as_str().trim_end_matches("MODE: CHAT")
        );

        let spy = template_for(TemplateKey::Growth(GrowthMode::CompetitorSpy));
        assert!(spy.as_str().ends_with("MODE: COMPETITOR SPY"));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Contract".parse::<BusinessMode>().unwrap(), BusinessMode::Contract);
        assert_eq!(
            "competitor-spy".parse::<GrowthMode>().unwrap(),
            GrowthMode::CompetitorSpy
        );
        assert!("lawyer".parse::<BusinessMode>().is_err());
        assert_eq!(GrowthMode::CompetitorSpy.to_string(), "competitor-spy");
    }
}
