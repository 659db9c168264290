use chrono::{DateTime, Utc};
use serde::Serialize;

const GREETING: &str = "Welcome to ArtConnect! I'm here to help you discover traditional crafts, \
connect with artisans, and learn about cultural heritage. How can I assist you today?";

const FALLBACK: &str = "That's a great question! I can help you explore traditional crafts, find \
lessons, connect with artisans, or discover trending techniques. Feel free to ask about specific \
crafts, regions, or learning paths. What would you like to explore?";

pub const QUICK_ACTIONS: [&str; 4] = [
    "Find pottery lessons",
    "Browse crafts by region",
    "Audio narration help",
    "Trending crafts today",
];

/// Keyword rule, the first rule with a keyword contained in the input wins
#[derive(Debug, Clone, Copy)]
struct Rule {
    keywords: &'static [&'static str],
    reply: &'static str,
}

const RULES: [Rule; 4] = [
    Rule {
        keywords: &["pottery", "ceramic"],
        reply: "I'd love to help you with pottery! We have pottery lessons from master potters and \
traditional ceramic workshops from many cultures. Would you like beginner-friendly options or \
advanced techniques?",
    },
    Rule {
        keywords: &["textile", "weaving"],
        reply: "Textile arts are fascinating! From Peruvian weaving to Nordic knitting, we have \
stories and techniques from all over. Are you interested in specific patterns or in exploring \
different cultural approaches?",
    },
    Rule {
        keywords: &["region", "country"],
        reply: "Our artisans come from all over the world! Which region interests you? We have \
crafts from Asia, Europe, Africa, the Americas, and Oceania, each with its own techniques and \
stories.",
    },
    Rule {
        keywords: &["learn", "lesson"],
        reply: "Perfect! We have interactive lessons for every skill level. Start with the \
fundamentals or dive into specific techniques; many lessons include audio narration and \
step-by-step guidance. What craft interests you most?",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Scripted assistant of the chat widget
#[derive(Debug, Clone)]
pub struct Assistant {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new()
    }
}

impl Assistant {
    /// Conversation opened with the greeting
    pub fn new() -> Self {
        let mut assistant = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        assistant.push(GREETING.to_string(), Sender::Bot);
        assistant
    }

    /// Canned reply for `input`
    pub fn reply_to(input: &str) -> &'static str {
        let input = input.to_lowercase();
        RULES
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| input.contains(keyword)))
            .map_or(FALLBACK, |rule| rule.reply)
    }

    /// Record the user's message and the bot's answer; blank input is ignored
    pub fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.push(input.to_string(), Sender::User);
        self.push(Self::reply_to(input).to_string(), Sender::Bot);
        self.messages.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, content: String, sender: Sender) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            content,
            sender,
            timestamp: Utc::now(),
        });
        self.next_id += 1;
    }
}
