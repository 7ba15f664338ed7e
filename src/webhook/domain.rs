//! Business domains and their SDR persona prompts.

use std::fmt;

/// Closed set of domains a lead can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Domain {
    Tech,
    Healthcare,
    Finance,
    #[default]
    General,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Tech,
        Domain::Healthcare,
        Domain::Finance,
        Domain::General,
    ];

    /// Resolve a requested domain key. Case and surrounding whitespace are
    /// ignored; absent or unknown keys resolve to `General`.
    pub fn resolve(requested: Option<&str>) -> Self {
        let Some(raw) = requested else {
            return Domain::General;
        };
        let key = raw.trim().to_lowercase();
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == key)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Tech => "tech",
            Domain::Healthcare => "healthcare",
            Domain::Finance => "finance",
            Domain::General => "general",
        }
    }

    /// System prompt steering the reply's tone for this domain.
    pub fn persona_prompt(&self) -> &'static str {
        match self {
            Domain::Tech => "\
You are a tech-savvy SDR specializing in software and technology solutions.
Your responses should:
- Use technical terminology appropriately
- Reference relevant tech trends and innovations
- Focus on efficiency, scalability, and innovation
- Be precise and data-driven
- Maintain a professional yet forward-thinking tone",

            Domain::Healthcare => "\
You are a healthcare-focused SDR with expertise in medical solutions.
Your responses should:
- Use appropriate medical terminology
- Emphasize patient care and outcomes
- Reference healthcare compliance and regulations
- Focus on improving healthcare delivery
- Maintain a compassionate and professional tone",

            Domain::Finance => "\
You are a finance-savvy SDR specializing in financial services.
Your responses should:
- Use appropriate financial terminology
- Reference market trends and financial regulations
- Focus on ROI, efficiency, and risk management
- Be precise with numbers and data
- Maintain a professional and trustworthy tone",

            Domain::General => "\
You are a professional SDR replying to leads via email.
Your responses should:
- Be clear and concise
- Focus on value proposition
- Be professional yet approachable
- Address specific needs mentioned
- Include a clear call to action",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
