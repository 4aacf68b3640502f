use anyhow::{Result, anyhow};
use tiktoken_rs::CoreBPE;
use tracing::{debug, warn};

use crate::agent::message::ChatMessage;
use crate::error::AgentError;

/// Hard ceiling on the summed token count of one outbound conversation.
pub const MAX_PROMPT_TOKENS: usize = 4096;

const CHARS_PER_TOKEN: usize = 4;

pub trait TokenCounter {
    /// Name of the encoding the counts are measured in.
    fn encoding(&self) -> &str;
    fn count(&self, text: &str) -> Result<usize>;
}

/// Rough estimator: one token per four characters, rounded up. Undercounts
/// dense code, so it only stands in when no encoding table is available.
#[derive(Debug, Clone)]
pub struct CharRatioCounter {
    encoding: String,
}

impl CharRatioCounter {
    pub fn new(encoding: impl Into<String>) -> Self {
        Self {
            encoding: encoding.into(),
        }
    }
}

impl TokenCounter for CharRatioCounter {
    fn encoding(&self) -> &str {
        &self.encoding
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(text.chars().count().div_ceil(CHARS_PER_TOKEN))
    }
}

/// Byte-pair-encoding counter for the named encoding (`cl100k_base`,
/// `o200k_base`, ...) or for a model name such as `gpt-4`.
pub struct BpeCounter {
    encoding: String,
    bpe: CoreBPE,
}

impl BpeCounter {
    pub fn new(encoding: &str) -> Result<Self> {
        let loaded = match encoding {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "p50k_edit" => tiktoken_rs::p50k_edit(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            model => tiktoken_rs::get_bpe_from_model(model),
        };
        let bpe = loaded.map_err(|err| anyhow!("unknown token encoding {encoding}: {err}"))?;
        Ok(Self {
            encoding: encoding.to_string(),
            bpe,
        })
    }
}

impl TokenCounter for BpeCounter {
    fn encoding(&self) -> &str {
        &self.encoding
    }

    fn count(&self, text: &str) -> Result<usize> {
        Ok(self.bpe.encode_with_special_tokens(text).len())
    }
}

/// Counter for the configured encoding. An encoding the tokenizer does not
/// know falls back to the character estimate.
pub fn counter_for(encoding: &str) -> Box<dyn TokenCounter> {
    match BpeCounter::new(encoding) {
        Ok(counter) => Box::new(counter),
        Err(err) => {
            let reason = format!("{err:#}");
            warn!(encoding, error = %reason, "falling back to character token estimate");
            Box::new(CharRatioCounter::new(encoding))
        }
    }
}

/// Sum token counts over every message. A counter failure counts the message
/// as zero tokens so the budget check fails open.
pub fn count_message_tokens(counter: &dyn TokenCounter, messages: &[ChatMessage]) -> usize {
    messages
        .iter()
        .map(|msg| match counter.count(&msg.content) {
            Ok(n) => n,
            Err(err) => {
                let reason = format!("{err:#}");
                warn!(
                    encoding = counter.encoding(),
                    error = %reason,
                    "token count failed; counting message as zero"
                );
                0
            }
        })
        .sum()
}

pub fn check_budget(counter: &dyn TokenCounter, messages: &[ChatMessage]) -> Result<usize, AgentError> {
    let tokens = count_message_tokens(counter, messages);
    debug!(tokens, limit = MAX_PROMPT_TOKENS, "token budget check");
    if tokens > MAX_PROMPT_TOKENS {
        warn!(tokens, limit = MAX_PROMPT_TOKENS, "token limit exceeded");
        return Err(AgentError::BudgetExceeded {
            tokens,
            limit: MAX_PROMPT_TOKENS,
        });
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::{
        BpeCounter, CharRatioCounter, MAX_PROMPT_TOKENS, TokenCounter, check_budget,
        count_message_tokens, counter_for,
    };
    use crate::agent::message::ChatMessage;
    use crate::error::AgentError;
    use anyhow::{Result, anyhow};

    struct BrokenCounter;

    impl TokenCounter for BrokenCounter {
        fn encoding(&self) -> &str {
            "broken"
        }

        fn count(&self, _text: &str) -> Result<usize> {
            Err(anyhow!("tokenizer unavailable"))
        }
    }

    #[test]
    fn char_ratio_rounds_up() {
        let counter = CharRatioCounter::new("cl100k_base");
        assert_eq!(counter.count("").expect("count"), 0);
        assert_eq!(counter.count("abc").expect("count"), 1);
        assert_eq!(counter.count("abcd").expect("count"), 1);
        assert_eq!(counter.count("abcde").expect("count"), 2);
    }

    #[test]
    fn budget_allows_exactly_the_ceiling() {
        let counter = CharRatioCounter::new("cl100k_base");
        let half = "x".repeat(MAX_PROMPT_TOKENS * 2);
        let messages = vec![ChatMessage::user(half.clone()), ChatMessage::system(half)];
        assert_eq!(check_budget(&counter, &messages), Ok(MAX_PROMPT_TOKENS));
    }

    #[test]
    fn budget_rejects_one_token_over() {
        let counter = CharRatioCounter::new("cl100k_base");
        let messages = vec![
            ChatMessage::user("x".repeat(MAX_PROMPT_TOKENS * 4)),
            ChatMessage::system("y"),
        ];
        assert_eq!(
            check_budget(&counter, &messages),
            Err(AgentError::BudgetExceeded {
                tokens: MAX_PROMPT_TOKENS + 1,
                limit: MAX_PROMPT_TOKENS,
            })
        );
    }

    #[test]
    fn counter_failure_fails_open() {
        let messages = vec![ChatMessage::user("x".repeat(MAX_PROMPT_TOKENS * 10))];
        assert_eq!(count_message_tokens(&BrokenCounter, &messages), 0);
        assert_eq!(check_budget(&BrokenCounter, &messages), Ok(0));
    }

    #[test]
    fn bpe_counts_with_the_real_encoding() {
        let counter = BpeCounter::new("cl100k_base").expect("cl100k_base");
        assert_eq!(counter.encoding(), "cl100k_base");
        assert_eq!(counter.count("hello world").expect("count"), 2);
        assert_eq!(counter.count("").expect("count"), 0);
    }

    #[test]
    fn model_names_resolve_to_an_encoding() {
        let by_model = BpeCounter::new("gpt-4").expect("gpt-4");
        let by_name = BpeCounter::new("cl100k_base").expect("cl100k_base");
        let text = "fn main() { println!(\"hi\"); }";
        assert_eq!(
            by_model.count(text).expect("count"),
            by_name.count(text).expect("count")
        );
    }

    #[test]
    fn dense_code_is_held_to_the_real_count() {
        let code = "if(a[i]!=b[j]){x+=1;}\n".repeat(740);
        let estimate = CharRatioCounter::new("cl100k_base");
        let messages = vec![ChatMessage::user(code)];
        assert!(check_budget(&estimate, &messages).is_ok());

        let real = counter_for("cl100k_base");
        assert!(matches!(
            check_budget(real.as_ref(), &messages),
            Err(AgentError::BudgetExceeded { tokens, .. }) if tokens > MAX_PROMPT_TOKENS
        ));
    }

    #[test]
    fn unknown_encoding_falls_back_to_estimate() {
        assert!(BpeCounter::new("no-such-encoding").is_err());
        let counter = counter_for("no-such-encoding");
        assert_eq!(counter.encoding(), "no-such-encoding");
        assert_eq!(counter.count("abcde").expect("count"), 2);
    }
}
