//! [`Command`] for parsing an order out of a free-form text.

use std::{str::FromStr as _, sync::LazyLock};

use common::operations::Perform;
use derive_more::{Display, Error, From};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::product,
    error::{Categorize, Kind},
    infra::{
        llm::{self, Prompt},
        Llm,
    },
    Service,
};

use super::Command;

/// [`Command`] for extracting a [`ParsedOrder`] out of a free-form text
/// (typically a transcribed voice command) with an [`Llm`].
#[derive(Clone, Debug)]
pub struct ParseOrder {
    /// Free-form text to parse.
    pub command: String,
}

/// Order extracted by the [`ParseOrder`] [`Command`].
#[derive(Clone, Debug)]
pub struct ParsedOrder {
    /// Lowercased name of the ordered product.
    pub product_name: product::NameFragment,

    /// Ordered quantity, as extracted.
    pub quantity: Decimal,
}

impl<Db, Ai> Command<ParseOrder> for Service<Db, Ai>
where
    Ai: Llm<Perform<Prompt>, Ok = String, Err = Traced<llm::Error>>,
{
    type Ok = ParsedOrder;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ParseOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let command = cmd.command.trim();
        if command.is_empty() {
            return Err(tracerr::new!(E::EmptyCommand));
        }

        let text = self
            .llm()
            .execute(Perform(prompt(command)))
            .await
            .inspect_err(|e| log::warn!("text generation failed: {e}"))
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let parsed = parse_reply(&text).map_err(|e| {
            log::warn!(reply = %text, "cannot parse text generation reply: {e}");
            tracerr::new!(e)
        })?;
        log::debug!(
            product = %parsed.product_name,
            quantity = %parsed.quantity,
            "order parsed",
        );

        Ok(parsed)
    }
}

/// Builds the extraction [`Prompt`] for the provided `command`.
fn prompt(command: &str) -> Prompt {
    format!(
        "Extract the product and quantity from this user command. \
         Respond ONLY with a valid JSON object containing \"productName\" \
         and \"quantity\" keys. No other text.\n\n\
         User command: \"{command}\"\n\nJSON:",
    )
    .into()
}

/// Parses the raw `reply` of an [`Llm`] into a [`ParsedOrder`].
fn parse_reply(reply: &str) -> Result<ParsedOrder, ExecutionError> {
    use ExecutionError as E;

    let json = json_span(reply).ok_or(E::NoJson)?;
    let object = serde_json::from_str::<Value>(json)?;

    let quantity = match object.get("quantity") {
        Some(Value::Number(n)) => {
            number(&n.to_string()).ok_or(E::MissingQuantity)?
        }
        Some(Value::String(s)) => {
            first_number(s).ok_or_else(|| E::MalformedQuantity(s.clone()))?
        }
        _ => return Err(E::MissingQuantity),
    };

    let product_name = object
        .get("productName")
        .and_then(Value::as_str)
        .and_then(product::NameFragment::new)
        .ok_or(E::MissingProductName)?;

    Ok(ParsedOrder {
        product_name,
        quantity,
    })
}

/// Returns the span between the first `{` and the last `}` of the provided
/// `text`, inclusively.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parses the provided JSON number representation into a [`Decimal`].
fn number(repr: &str) -> Option<Decimal> {
    Decimal::from_str(repr)
        .or_else(|_| Decimal::from_scientific(repr))
        .ok()
}

/// Extracts the first integer or decimal number mentioned in the provided
/// `text`.
fn first_number(text: &str) -> Option<Decimal> {
    /// Regular expression matching an unsigned integer or decimal number.
    static REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"[0-9]+(\.[0-9]+)?").expect("valid regex")
    });

    REGEX.find(text).and_then(|m| Decimal::from_str(m.as_str()).ok())
}

/// Error of [`ParseOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Provided text is blank.
    #[display("Command text cannot be empty.")]
    #[from(ignore)]
    EmptyCommand,

    /// [`Llm`] failed.
    #[display("Failed to process order with AI.")]
    Llm(llm::Error),

    /// [`Llm`] reply contains a JSON-like span which is not valid JSON.
    #[display("Invalid JSON format from AI.")]
    MalformedJson(serde_json::Error),

    /// Quantity mentions no number.
    #[display("Quantity in AI response is malformed: {_0}")]
    #[from(ignore)]
    MalformedQuantity(#[error(not(source))] String),

    /// Product name is missing or is not a non-empty string.
    #[display("ProductName missing or invalid in AI response.")]
    #[from(ignore)]
    MissingProductName,

    /// Quantity is missing or is neither a number nor a string.
    #[display("Quantity field missing or invalid in AI response.")]
    #[from(ignore)]
    MissingQuantity,

    /// [`Llm`] reply contains no JSON-like span.
    #[display("No valid JSON found in AI response.")]
    #[from(ignore)]
    NoJson,
}

impl Categorize for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::EmptyCommand
            | Self::MalformedQuantity(_)
            | Self::MissingProductName
            | Self::MissingQuantity => Kind::InvalidInput,
            Self::Llm(_) | Self::MalformedJson(_) | Self::NoJson => {
                Kind::Upstream
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{first_number, json_span, parse_reply, ExecutionError};

    #[test]
    fn extracts_json_span() {
        assert_eq!(json_span("{\"a\":1}"), Some("{\"a\":1}"));
        assert_eq!(
            json_span("Sure! ```json\n{\"a\":{\"b\":2}}\n``` done"),
            Some("{\"a\":{\"b\":2}}"),
        );
        assert_eq!(json_span("no json here"), None);
        assert_eq!(json_span("} reversed {"), None);
        assert_eq!(json_span("{ unclosed"), None);
    }

    #[test]
    fn extracts_first_number() {
        assert_eq!(first_number("5 kg"), Some(Decimal::from(5)));
        assert_eq!(first_number("about 2.5 kilos"), Some(Decimal::new(25, 1)));
        assert_eq!(first_number("10 or 20"), Some(Decimal::from(10)));
        assert_eq!(first_number("a dozen"), None);
        assert_eq!(first_number("५ kg (5 kg)"), Some(Decimal::from(5)));
        assert_eq!(first_number("७.५ or 7.5"), Some(Decimal::new(75, 1)));
    }

    #[test]
    fn parses_numeric_quantity() {
        let parsed =
            parse_reply(r#"{"productName": "Tomatoes", "quantity": 10}"#)
                .expect("valid reply");

        assert_eq!(parsed.product_name.as_ref(), "tomatoes");
        assert_eq!(parsed.quantity, Decimal::from(10));
    }

    #[test]
    fn parses_textual_quantity() {
        let parsed = parse_reply(
            "Here you go: {\"productName\": \"ONIONS\", \"quantity\": \"3.5 kg\"}",
        )
        .expect("valid reply");

        assert_eq!(parsed.product_name.as_ref(), "onions");
        assert_eq!(parsed.quantity, Decimal::new(35, 1));
    }

    #[test]
    fn rejects_reply_without_json() {
        let err = parse_reply("I cannot help with that").expect_err("no json");
        assert!(matches!(err, ExecutionError::NoJson));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_reply("{productName: tomatoes}").expect_err("bad json");
        assert!(matches!(err, ExecutionError::MalformedJson(_)));
    }

    #[test]
    fn rejects_quantity_without_number() {
        let err = parse_reply(r#"{"productName": "rice", "quantity": "some"}"#)
            .expect_err("no number");
        assert!(matches!(err, ExecutionError::MalformedQuantity(q) if q == "some"));
    }

    #[test]
    fn rejects_missing_fields() {
        let err =
            parse_reply(r#"{"productName": "rice"}"#).expect_err("no quantity");
        assert!(matches!(err, ExecutionError::MissingQuantity));

        let err = parse_reply(r#"{"productName": "  ", "quantity": 2}"#)
            .expect_err("blank name");
        assert!(matches!(err, ExecutionError::MissingProductName));

        let err = parse_reply(r#"{"productName": 7, "quantity": 2}"#)
            .expect_err("non-string name");
        assert!(matches!(err, ExecutionError::MissingProductName));
    }
}
