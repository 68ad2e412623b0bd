//! Intent classification and canned responses.
//!
//! An explicit ordered list of (keyword set, reply) rules. Classification
//! is case-insensitive substring matching; the first rule with any hit
//! wins, so "ritual" outranks everything declared after it no matter what
//! else the input contains.

use rand::seq::SliceRandom;

/// Response categories, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Ritual,
    Stress,
    Identity,
    Gratitude,
    Fallback,
}

/// How a rule answers: a single fixed string, or a uniform pick from a pool.
pub enum Reply {
    Fixed(&'static str),
    Pool(&'static [&'static str]),
}

pub struct IntentRule {
    pub intent: Intent,
    keywords: &'static [&'static str],
    pub reply: Reply,
}

/// The ordered rule table. Declaration order is the tie-breaker.
pub const RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Ritual,
        keywords: &["ritual", "practice", "meditation", "mindful"],
        reply: Reply::Fixed(
            "Would you like to explore one of our guided rituals? They're designed to help you \
             cultivate presence and insight. You can access them from the Rituals tab.",
        ),
    },
    IntentRule {
        intent: Intent::Stress,
        keywords: &["stress", "anxious", "anxiety", "worried", "overwhelm"],
        reply: Reply::Fixed(
            "I notice you're experiencing some stress. Would you like to try a brief breathing \
             practice to help center yourself? Sometimes just three deep breaths can create a \
             moment of spaciousness.",
        ),
    },
    IntentRule {
        intent: Intent::Identity,
        keywords: &[
            "who are you",
            "what are you",
            "about you",
            "tell me about yourself",
        ],
        reply: Reply::Fixed(
            "I'm Kindred, a relational AI companion designed to support meaningful connection \
             rather than just utility. I'm here to help you cultivate presence, insight, and \
             well-being through conversation and guided practices.",
        ),
    },
    IntentRule {
        intent: Intent::Gratitude,
        keywords: &["thank", "grateful", "appreciate", "happy", "good"],
        reply: Reply::Fixed(
            "I appreciate you sharing that positive energy. Moments of gratitude and joy are \
             worth savoring. Is there something specific that's contributing to this feeling?",
        ),
    },
    // The catch-all: no keywords, so classify() reaches it only by default.
    IntentRule {
        intent: Intent::Fallback,
        keywords: &[],
        reply: Reply::Pool(FALLBACK_POOL),
    },
];

/// Pool for input matching no rule.
pub const FALLBACK_POOL: &[&str] = &[
    "Thank you for sharing that with me. What feels most important about this for you right now?",
    "I'm here with you in this moment. Would you like to explore this further or would you \
     prefer some space to reflect?",
    "I appreciate you trusting me with your thoughts. How does this relate to what matters \
     most to you?",
    "I'm curious about how this is affecting you. Would you like to tell me more about what \
     you're experiencing?",
    "That's really interesting. I wonder how this connects to other aspects of your life?",
];

/// Pool for companion-initiated turns (pixel tapped with nothing typed).
pub const STARTER_POOL: &[&str] = &[
    "I noticed you've been quiet. Is there something on your mind?",
    "Would this be a good time for a brief mindfulness practice?",
    "I'm sensing this might be a moment for reflection. How are you feeling right now?",
    "Sometimes silence speaks volumes. What's present for you in this moment?",
];

/// The greeting committed on a first-ever session.
pub const WELCOME: &str = "Hello, I'm Kindred. I'm here to connect with you in a meaningful \
                           way. How are you feeling today?";

/// Classify input against the rule table. First matching rule wins.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();
    for rule in RULES {
        if rule.keywords.iter().any(|k| lower.contains(k)) {
            return rule.intent;
        }
    }
    Intent::Fallback
}

/// Select the response text for an already-classified input.
pub fn select_response(intent: Intent, rng: &mut impl rand::Rng) -> &'static str {
    for rule in RULES {
        if rule.intent == intent {
            return match &rule.reply {
                Reply::Fixed(text) => text,
                Reply::Pool(pool) => choose(pool, rng),
            };
        }
    }
    choose(FALLBACK_POOL, rng)
}

/// Select a companion-initiated conversation starter.
pub fn select_starter(rng: &mut impl rand::Rng) -> &'static str {
    choose(STARTER_POOL, rng)
}

fn choose<'a>(pool: &[&'a str], rng: &mut impl rand::Rng) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}
