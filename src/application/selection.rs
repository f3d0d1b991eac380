//! Which models take part in the next round.

/// A selectable model as the user sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSlot {
    /// Stable key used for stored API keys and result slots
    pub key: &'static str,
    /// Label shown next to the toggle
    pub label: &'static str,
    /// Logical model identifier understood by the dispatcher
    pub logical_name: &'static str,
}

const fn slot(key: &'static str, label: &'static str, logical_name: &'static str) -> ModelSlot {
    ModelSlot {
        key,
        label,
        logical_name,
    }
}

pub static MODEL_SLOTS: &[ModelSlot] = &[
    slot("gpt-4o-mini", "gpt-4o-mini", "gpt-4o-mini"),
    slot("claude", "Claude 3.5 Sonnet", "Claude 3.5 Sonnet"),
    slot("claude_haiku", "Claude Haiku", "Claude Haiku"),
    slot("grok2", "Grok-2", "Grok2"),
    slot("gemini", "Gemini 1.5 Flash", "Gemini 1.5 Flash"),
    slot("commandR", "Command R+", "Command R+"),
    slot("mistral", "Mistral Large", "Mistral Large"),
    slot("openrouter", "OpenRouter", "OpenRouter"),
    slot("llama3", "Llama 3", "Llama3"),
    slot("codestral", "Codestral", "Codestral"),
    slot("mixtral", "Mixtral 8x7B", "Mixtral 8x7B"),
    slot("phi3", "Phi-3", "Phi-3"),
];

pub fn find_slot(key: &str) -> Option<&'static ModelSlot> {
    MODEL_SLOTS.iter().find(|slot| slot.key == key)
}

/// Enabled models, kept in the order they were switched on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSelection {
    enabled: Vec<&'static str>,
}

impl ModelSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one model. Returns the new state, or `None` for an unknown key.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let slot = find_slot(key)?;
        if let Some(index) = self.enabled.iter().position(|k| *k == slot.key) {
            self.enabled.remove(index);
            Some(false)
        } else {
            self.enabled.push(slot.key);
            Some(true)
        }
    }

    /// Enable everything not yet enabled, in catalog order.
    pub fn select_all(&mut self) {
        for slot in MODEL_SLOTS {
            if !self.is_enabled(slot.key) {
                self.enabled.push(slot.key);
            }
        }
    }

    pub fn deselect_all(&mut self) {
        self.enabled.clear();
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        self.enabled.iter().any(|k| *k == key)
    }

    pub fn active_count(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Enabled slots in enable order.
    pub fn enabled(&self) -> Vec<&'static ModelSlot> {
        self.enabled.iter().filter_map(|key| find_slot(key)).collect()
    }
}
