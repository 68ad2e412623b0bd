//! The predefined ritual catalog.
//!
//! Four guided practices, each a fixed linear sequence of steps. The
//! catalog is immutable static data; sessions over it live in the flow
//! engine.

#[derive(Debug)]
pub struct RitualStep {
    pub title: &'static str,
    pub content: &'static str,
}

pub struct RitualDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub steps: &'static [RitualStep],
}

pub const RITUALS: &[RitualDefinition] = &[
    RitualDefinition {
        id: "morning-reflection",
        title: "Morning Reflection",
        description: "Start your day with presence and intention",
        steps: &[
            RitualStep {
                title: "Welcome",
                content: "This morning reflection ritual will help you start your day with \
                          presence and intention. Find a comfortable position and take a moment \
                          to settle in. We'll begin with a few deep breaths to center yourself.",
            },
            RitualStep {
                title: "Breath Awareness",
                content: "Take three deep breaths, inhaling slowly through your nose and \
                          exhaling fully through your mouth. Feel your body becoming more \
                          relaxed with each breath. Notice the sensations of breathing without \
                          trying to change anything.",
            },
            RitualStep {
                title: "Body Check-In",
                content: "Bring your awareness to your body. Notice any areas of tension or \
                          comfort. There's no need to change anything—simply observe with \
                          curiosity and kindness. How does your body feel in this moment?",
            },
            RitualStep {
                title: "Emotional Weather",
                content: "Now check in with your emotional state. What's the weather pattern of \
                          your emotions right now? Stormy, sunny, foggy, or something else? \
                          Just notice without judgment, acknowledging whatever is present.",
            },
            RitualStep {
                title: "Setting Intention",
                content: "Consider what quality you'd like to bring into your day. Perhaps it's \
                          patience, curiosity, courage, or compassion. Choose one quality and \
                          set an intention to embody it today.",
            },
            RitualStep {
                title: "Completion",
                content: "Take one more deep breath, carrying your intention with you. As you \
                          move into your day, remember that you can return to this sense of \
                          presence at any time. Your morning reflection is complete.",
            },
        ],
    },
    RitualDefinition {
        id: "gratitude-practice",
        title: "Gratitude Practice",
        description: "Cultivate appreciation for life's gifts",
        steps: &[
            RitualStep {
                title: "Welcome",
                content: "This gratitude practice will help you cultivate appreciation for the \
                          gifts in your life. Find a comfortable position where you can be \
                          alert yet relaxed. We'll begin with a few moments to settle in.",
            },
            RitualStep {
                title: "Centering",
                content: "Take three deep breaths, allowing your body to relax and your mind to \
                          become more present. With each exhale, let go of any tension or \
                          preoccupations.",
            },
            RitualStep {
                title: "Simple Gratitude",
                content: "Bring to mind something simple that you're grateful for today. It \
                          might be a basic comfort like clean water, a warm bed, or the taste \
                          of your morning coffee. Take a moment to really feel your \
                          appreciation for this simple gift.",
            },
            RitualStep {
                title: "Relationship Gratitude",
                content: "Now consider a person in your life whom you appreciate. This could be \
                          someone who has supported you, taught you something valuable, or \
                          simply brings joy to your life. Feel your gratitude for their \
                          presence.",
            },
            RitualStep {
                title: "Unexpected Gratitude",
                content: "Think of something challenging or difficult that ultimately led to \
                          growth or learning. Can you find gratitude even for the obstacles \
                          that have shaped you? This doesn't mean the difficulty was good, \
                          just that you can appreciate what came from it.",
            },
            RitualStep {
                title: "Embodied Gratitude",
                content: "Notice how gratitude feels in your body. Perhaps there's warmth in \
                          your chest, relaxation in your shoulders, or a slight smile on your \
                          face. Let this feeling of appreciation permeate your entire being.",
            },
            RitualStep {
                title: "Completion",
                content: "As we complete this practice, consider how you might carry this sense \
                          of gratitude with you throughout your day. Perhaps you could pause \
                          briefly at different moments to notice something you appreciate. \
                          Your gratitude practice is complete.",
            },
        ],
    },
    RitualDefinition {
        id: "evening-release",
        title: "Evening Release",
        description: "Let go of the day and prepare for rest",
        steps: &[
            RitualStep {
                title: "Welcome",
                content: "This evening release ritual will help you let go of the day and \
                          prepare for restful sleep. Find a comfortable position, preferably \
                          sitting or lying down in a quiet space. We'll begin with a few \
                          moments to transition from the activities of your day.",
            },
            RitualStep {
                title: "Breath Awareness",
                content: "Take three deep breaths, inhaling slowly through your nose and \
                          exhaling fully through your mouth. With each exhale, imagine \
                          releasing the energy of the day. Allow your breathing to find its \
                          natural rhythm.",
            },
            RitualStep {
                title: "Day Review",
                content: "Gently review your day, as if watching a movie of the past 24 hours. \
                          Notice the events, interactions, and feelings without judgment or \
                          analysis. Simply observe what happened and how you experienced it.",
            },
            RitualStep {
                title: "Acknowledging Challenges",
                content: "If there were any difficult moments or unresolved situations from \
                          your day, acknowledge them now. You might silently say, \"I see \
                          you\" to each challenge. Then imagine placing them in a container \
                          that you can set aside until tomorrow.",
            },
            RitualStep {
                title: "Recognizing Gifts",
                content: "Bring to mind one or two positive moments from your day, however \
                          small they might be. Perhaps a kind interaction, a moment of beauty, \
                          or an accomplishment. Take a moment to savor these experiences.",
            },
            RitualStep {
                title: "Body Relaxation",
                content: "Bring your awareness to your body, starting with your feet and moving \
                          upward. Notice any areas of tension and invite them to soften with \
                          each exhale. Allow your body to become increasingly heavy and \
                          relaxed.",
            },
            RitualStep {
                title: "Completion",
                content: "As you prepare for sleep, imagine that you're complete with this day. \
                          There's nothing more to do or solve right now. Give yourself \
                          permission to rest fully, knowing that you can return to life's \
                          activities tomorrow with renewed energy. Your evening release is \
                          complete.",
            },
        ],
    },
    RitualDefinition {
        id: "mindful-breathing",
        title: "Mindful Breathing",
        description: "Return to your breath and center yourself",
        steps: &[
            RitualStep {
                title: "Welcome",
                content: "This mindful breathing practice will help you center yourself and \
                          cultivate presence. You can do this practice anywhere, anytime you \
                          need a moment of calm. Find a comfortable position where your spine \
                          can be relatively straight.",
            },
            RitualStep {
                title: "Posture Check",
                content: "Take a moment to check your posture. Sit with dignity, as if a string \
                          were gently pulling the crown of your head upward. Let your \
                          shoulders relax down and back. Place your hands in a comfortable \
                          position.",
            },
            RitualStep {
                title: "Finding Your Breath",
                content: "Bring your attention to your breathing. You don't need to control or \
                          change your breath in any way—simply notice the natural rhythm of \
                          inhalation and exhalation. You might notice the sensation of air \
                          passing through your nostrils, the rise and fall of your chest, or \
                          the expansion and contraction of your abdomen.",
            },
            RitualStep {
                title: "Counting Breaths",
                content: "To help focus your attention, try counting your breaths. Count \
                          \"one\" on the inhale, \"two\" on the exhale, \"three\" on the next \
                          inhale, and so on up to ten. Then start again at one. If you lose \
                          track, simply begin again with \"one\" on your next inhale.",
            },
            RitualStep {
                title: "Working with Wandering",
                content: "You'll likely notice your mind wandering away from your breath. This \
                          is completely normal and part of the practice. When you notice your \
                          attention has wandered, gently acknowledge it, and then return your \
                          focus to your breathing. Each time you do this, you're \
                          strengthening your capacity for presence.",
            },
            RitualStep {
                title: "Expanding Awareness",
                content: "Now, while maintaining awareness of your breath as an anchor, gently \
                          expand your attention to include your body as a whole. Notice the \
                          sensations of sitting, the points of contact with the floor or \
                          chair, and the overall feeling of being present in your body.",
            },
            RitualStep {
                title: "Completion",
                content: "As we complete this practice, take a moment to appreciate the time \
                          you've given yourself for mindful breathing. Remember that you can \
                          return to your breath as an anchor of presence at any time \
                          throughout your day. Your mindful breathing practice is complete.",
            },
        ],
    },
];

/// Look up a ritual by id.
pub fn find(id: &str) -> Option<&'static RitualDefinition> {
    RITUALS.iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_rituals_with_six_or_seven_steps() {
        assert_eq!(RITUALS.len(), 4);
        for ritual in RITUALS {
            assert!(
                (6..=7).contains(&ritual.steps.len()),
                "{} has {} steps",
                ritual.id,
                ritual.steps.len()
            );
            assert_eq!(ritual.steps.first().unwrap().title, "Welcome");
            assert_eq!(ritual.steps.last().unwrap().title, "Completion");
        }
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in RITUALS.iter().enumerate() {
            for b in &RITUALS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn find_resolves_known_ids_only() {
        assert!(find("morning-reflection").is_some());
        assert!(find("gratitude-practice").is_some());
        assert!(find("midnight-snack").is_none());
    }
}
