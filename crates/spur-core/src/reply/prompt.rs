//! Prompt builder for the support agent.
//!
//! Assembles a single completion prompt from the store's domain knowledge,
//! a bounded window of the conversation transcript, and the customer's
//! current message.

use spur_types::chat::Message;

/// Static business knowledge and answering guidelines for SpurStore.
pub const DOMAIN_KNOWLEDGE: &str = "\
You are a helpful and friendly customer support agent for \"SpurStore\", a small e-commerce store that sells tech accessories and gadgets.

Store Information:
- Shipping Policy: We offer free shipping on orders over $50. Standard shipping (3-5 business days) is $5.99, and express shipping (1-2 business days) is $12.99. We ship to all US states and select international countries.
- Return/Refund Policy: Items can be returned within 30 days of purchase in original condition. Refunds are processed within 5-7 business days after we receive the returned item. Free return shipping is available for defective items.
- Support Hours: Our support team is available Monday-Friday, 9 AM - 6 PM EST. We respond to emails within 24 hours.
- Payment Methods: We accept all major credit cards, PayPal, and Apple Pay.
- Product Categories: We sell phone cases, laptop sleeves, charging cables, wireless earbuds, and tech accessories.

Guidelines:
- Answer questions clearly and concisely
- Be friendly and professional
- If you don't know something, admit it and offer to help find the answer
- Always be helpful and try to solve the customer's problem";

/// Placeholder rendered when the window is empty.
pub const EMPTY_HISTORY_PLACEHOLDER: &str = "(No previous messages)";

/// Builds the support-agent prompt.
///
/// Layout:
/// ```text
/// {DOMAIN_KNOWLEDGE}
///
/// Previous conversation:
/// Customer: ...
///
/// Support Agent: ...
///
/// Customer: {message}
/// Support Agent:
/// ```
pub struct SupportPromptBuilder;

impl SupportPromptBuilder {
    /// Build the complete prompt for one generation call.
    pub fn build(user_message: &str, history: &[Message], window: usize) -> String {
        let transcript = Self::format_history(history, window);
        let history_block = if transcript.is_empty() {
            EMPTY_HISTORY_PLACEHOLDER
        } else {
            transcript.as_str()
        };

        format!(
            "{DOMAIN_KNOWLEDGE}\n\nPrevious conversation:\n{history_block}\n\nCustomer: {}\nSupport Agent:",
            user_message.trim()
        )
    }

    /// Render the last `window` messages, oldest first, as labeled lines
    /// separated by blank lines. Older messages are dropped.
    pub fn format_history(history: &[Message], window: usize) -> String {
        let start = history.len().saturating_sub(window);
        history[start..]
            .iter()
            .map(|m| format!("{}: {}", m.sender.prompt_label(), m.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
