//! Quick prompts offered when the coach chat is empty

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptTopic {
    Warmup,
    Nutrition,
    Technique,
}

impl PromptTopic {
    pub fn emoji(&self) -> &'static str {
        match self {
            PromptTopic::Warmup => "🔥",
            PromptTopic::Nutrition => "🥗",
            PromptTopic::Technique => "📐",
        }
    }
}

pub struct QuickPrompt {
    pub topic: PromptTopic,
    /// Button caption
    pub label: &'static str,
    /// Message actually sent to the coach
    pub text: &'static str,
}

pub const QUICK_PROMPTS: &[QuickPrompt] = &[
    QuickPrompt {
        topic: PromptTopic::Warmup,
        label: "What's a good warm-up for leg day?",
        text: "What's a good warm-up for leg day?",
    },
    QuickPrompt {
        topic: PromptTopic::Nutrition,
        label: "Suggest a post-workout snack.",
        text: "Can you suggest a healthy post-workout snack?",
    },
    QuickPrompt {
        topic: PromptTopic::Technique,
        label: "How can I improve my bench press form?",
        text: "How can I improve my bench press form?",
    },
];

/// Menu line for a prompt, numbered from 1
pub fn format_prompt(index: usize, prompt: &QuickPrompt) -> String {
    format!("[{}] {} {}", index + 1, prompt.topic.emoji(), prompt.label)
}
